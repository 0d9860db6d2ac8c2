//! Façade error types.

use thiserror::Error;

use tn_catalog::CatalogError;
use tn_core::GeoError;
use tn_spatial::SpatialError;

/// Malformed source data.  The host treats any of these as fatal.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("GeoJSON parse error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("expected a FeatureCollection, found a {0}")]
    NotFeatureCollection(&'static str),

    #[error("feature {index}: missing geometry")]
    MissingGeometry { index: usize },

    #[error("feature {index}: unsupported geometry type {kind}")]
    UnsupportedGeometry { index: usize, kind: &'static str },

    #[error("feature {index}: LineString needs at least 2 positions, found {found}")]
    ShortLine { index: usize, found: usize },

    #[error("feature {index}: {source}")]
    Coordinate { index: usize, source: GeoError },

    #[error("feature {index}: malformed @relations: {reason}")]
    Relations { index: usize, reason: String },

    #[error("source contains no LineString features")]
    NoTrails,

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("failed to load trail network: {0}")]
    Load(#[from] LoadError),

    #[error("route network already initialized")]
    AlreadyInitialized,

    #[error("trail network has no vertices")]
    EmptyNetwork,

    #[error("invalid query point: {0}")]
    InvalidPoint(#[from] GeoError),

    #[error("routing error: {0}")]
    Spatial(#[from] SpatialError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
