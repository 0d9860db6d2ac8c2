//! Spatial-subsystem error type.

use thiserror::Error;

use tn_core::{PointId, VertexId};

/// Errors produced by `tn-spatial`.
///
/// A disconnected pair of points is not an error; routing reports it as
/// `Ok(None)`.
#[derive(Debug, Error, PartialEq)]
pub enum SpatialError {
    #[error("vertex {0} not found in trail graph")]
    VertexNotFound(VertexId),

    #[error("point {0} not found in trail graph")]
    PointNotFound(PointId),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
