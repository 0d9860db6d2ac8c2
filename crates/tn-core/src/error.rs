//! Coordinate error type.
//!
//! Sub-crates define their own error enums and wrap `GeoError` as one
//! variant via `#[from]`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GeoError {
    #[error("position has {0} ordinates, expected at least 2")]
    ShortPosition(usize),

    #[error("non-finite coordinate ({lon}, {lat})")]
    NonFinite { lon: f64, lat: f64 },

    #[error("coordinate ({lon}, {lat}) outside the geodetic range")]
    OutOfRange { lon: f64, lat: f64 },

    #[error("coordinate ({lon}, {lat}) has no finite projection")]
    Unprojectable { lon: f64, lat: f64 },
}

pub type GeoResult<T> = Result<T, GeoError>;
