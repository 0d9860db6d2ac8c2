//! `tn-core` — foundational types for the `trailnet` routing engine.
//!
//! This crate is a dependency of every other `tn-*` crate.  It has no `tn-*`
//! dependencies and minimal external ones (only `thiserror`, plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module           | Contents                                              |
//! |------------------|-------------------------------------------------------|
//! | [`ids`]          | `PointId`, `VertexId`, `EdgeId`, `FeatureId`, `IslandId` |
//! | [`geo`]          | `GeoPoint` (geodetic), `ProjectedPoint` (metric)      |
//! | [`projection`]   | `Projection`, `TransverseMercator` (SWEREF99 TM)      |
//! | [`error`]        | `GeoError`, `GeoResult`                               |
//!
//! # Coordinate frames
//!
//! Every value that crosses the library boundary is a [`GeoPoint`].  Every
//! distance, nearest-neighbour query, and display geometry is a
//! [`ProjectedPoint`].  The only way from one to the other is through a
//! [`Projection`].
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod projection;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{GeoError, GeoResult};
pub use geo::{GeoPoint, ProjectedPoint};
pub use ids::{EdgeId, FeatureId, IslandId, PointId, VertexId};
pub use projection::{Projection, TransverseMercator};
