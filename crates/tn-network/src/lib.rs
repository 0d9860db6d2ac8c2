//! `tn-network` — the single entry point the UI layer talks to.
//!
//! # Lifecycle
//!
//! ```text
//! GeoJSON ──parse──▶ TrailFeature[] ──┬──▶ SegmentCatalog (metadata, picking)
//!                                     └──▶ TrailGraph + CoordinateIndex ──▶ Islands
//! ```
//!
//! Everything is built once by [`RouteNetwork::initialize`] and is read-only
//! afterwards; only the highlight state changes.
//!
//! # Frames
//!
//! | Operation          | Input frame  | Output frame                    |
//! |--------------------|--------------|---------------------------------|
//! | `snap_to_network`  | geodetic     | geodetic (exact source coordinate) |
//! | `route`            | geodetic     | projected geometry + geodetic copy |
//! | `pick_segment`     | geodetic     | —                               |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use tn_core::GeoPoint;
//! use tn_network::{NetworkConfig, RouteNetwork};
//!
//! let network = RouteNetwork::initialize(include_str!("trails.geojson"), NetworkConfig::default())?;
//! if let Some(route) = network.route(&[GeoPoint::new(13.40, 55.85), GeoPoint::new(13.52, 55.80)])? {
//!     println!("{:.1} km", route.distance_km());
//! }
//! ```

pub mod cell;
pub mod config;
pub mod error;
pub mod network;
pub mod source;


pub use cell::NetworkCell;
pub use config::NetworkConfig;
pub use error::{LoadError, NetworkError, NetworkResult};
pub use network::{Route, RouteNetwork, RouteNetworkBuilder};
pub use source::parse_features;
