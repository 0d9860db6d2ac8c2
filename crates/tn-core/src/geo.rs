//! Geodetic and projected coordinate types.
//!
//! The two frames are distinct types.  `GeoPoint` is what users
//! click and what the source data stores; `ProjectedPoint` is what distances
//! are measured in.  Convert with a [`Projection`](crate::Projection).

use std::fmt;

use crate::{GeoError, GeoResult};

/// A geodetic coordinate in degrees, stored `(lon, lat)` like GeoJSON.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Build from a GeoJSON position (`[lon, lat, ..]`).  Extra ordinates
    /// (elevation) are ignored.  Only finiteness is checked here; the range
    /// check belongs to the projection (see `Projection::check`).
    pub fn from_position(position: &[f64]) -> GeoResult<Self> {
        match position {
            [lon, lat, ..] => Self::new(*lon, *lat).finite(),
            _ => Err(GeoError::ShortPosition(position.len())),
        }
    }

    /// Reject NaN and infinite ordinates.
    pub fn finite(self) -> GeoResult<Self> {
        if !self.lon.is_finite() || !self.lat.is_finite() {
            return Err(GeoError::NonFinite { lon: self.lon, lat: self.lat });
        }
        Ok(self)
    }

    /// Reject coordinates outside `[-180, 180] x [-90, 90]`.
    pub fn in_geodetic_range(self) -> GeoResult<Self> {
        if !(-180.0..=180.0).contains(&self.lon) || !(-90.0..=90.0).contains(&self.lat) {
            return Err(GeoError::OutOfRange { lon: self.lon, lat: self.lat });
        }
        Ok(self)
    }

    /// Exact identity key: the raw bit patterns, with `-0.0` folded into
    /// `0.0` so the two zeros deduplicate.
    #[inline]
    pub fn exact_key(self) -> (u64, u64) {
        ((self.lon + 0.0).to_bits(), (self.lat + 0.0).to_bits())
    }

    /// Haversine great-circle distance in metres (mean Earth radius).
    ///
    /// Routing never uses this; it exists to sanity-check projected
    /// distances.
    pub fn haversine_m(self, other: GeoPoint) -> f64 {
        const R: f64 = 6_371_008.8;

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);
        2.0 * R * a.sqrt().atan2((1.0 - a).sqrt())
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.7}, {:.7})", self.lon, self.lat)
    }
}

/// A point in a projected metric frame.  `x` is easting, `y` northing,
/// both in metres.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
}

impl ProjectedPoint {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Planar Euclidean distance.
    #[inline]
    pub fn distance(self, other: ProjectedPoint) -> f64 {
        self.distance_2(other).sqrt()
    }

    /// Squared planar distance; cheaper for comparisons.
    #[inline]
    pub fn distance_2(self, other: ProjectedPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    #[inline]
    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl From<[f64; 2]> for ProjectedPoint {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for ProjectedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.2}, {:.2}]", self.x, self.y)
    }
}
