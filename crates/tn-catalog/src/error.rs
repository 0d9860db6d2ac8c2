//! Catalog error type.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("invalid colour {0:?}, expected #rrggbb")]
    InvalidColor(String),

    #[error("feature ids must be dense and in order: found {found} at position {position}")]
    FeatureOrder { position: usize, found: u32 },
}

pub type CatalogResult<T> = Result<T, CatalogError>;
