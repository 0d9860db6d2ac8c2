//! `tn-catalog` — what each trail feature *is*, independent of routing.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`feature`]   | `TrailFeature`, `Geometry`, `Relation`, `RelationTags`    |
//! | [`catalog`]   | `SegmentCatalog`, `SegmentInfo`, `describe`               |
//! | [`highlight`] | `HighlightState`, `HighlightObserver`                     |
//! | [`style`]     | `Color`, `Palette`, `resolve_style`, `StyleResolver`      |
//! | [`error`]     | `CatalogError`, `CatalogResult<T>`                        |
//!
//! The renderer owns drawing and pixel hit-testing.  This crate interprets
//! the feature it resolves and decides which colour each feature gets.

pub mod catalog;
pub mod error;
pub mod feature;
pub mod highlight;
pub mod style;


pub use catalog::{describe, SegmentCatalog, SegmentInfo};
pub use error::{CatalogError, CatalogResult};
pub use feature::{Geometry, Relation, RelationTags, TrailFeature};
pub use highlight::{HighlightObserver, HighlightState, NoopHighlightObserver};
pub use style::{resolve_style, Color, Palette, StyleResolver};
