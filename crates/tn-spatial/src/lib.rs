//! `tn-spatial` — trail graph, spatial indexing, and routing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`index`]   | `CoordinateIndex` (R-tree over point positions)             |
//! | [`graph`]   | `TrailGraph` (compacted CSR), `TrailGraphBuilder`           |
//! | [`router`]  | `Router` trait, `TrailPath`, `DijkstraRouter`               |
//! | [`islands`] | `Islands` — connected-component labels                      |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public config types.    |

pub mod error;
pub mod graph;
pub mod index;
pub mod islands;
pub mod router;

#[cfg(test)]
mod tests;

pub use error::{SpatialError, SpatialResult};
pub use graph::{PointPlacement, TrailGraph, TrailGraphBuilder, VertexKeying};
pub use index::{CoordinateIndex, IndexedPoint};
pub use islands::Islands;
pub use router::{DijkstraRouter, Router, TrailPath};
