//! Geodetic ↔ projected frame conversion.
//!
//! The network is a regional trail system, so a single conformal projection
//! is accurate enough to measure distances in plain Euclidean metres.  The
//! default is SWEREF99 TM (EPSG:3006), the Swedish national grid.
//!
//! # Transverse Mercator
//!
//! Forward and inverse use the Krüger series to fourth order in the third
//! flattening `n` (the "Gauss conformal projection" formulas published for
//! SWEREF 99).  Within a 6° zone the round trip is exact to well below a
//! millimetre.

use crate::{GeoError, GeoPoint, GeoResult, ProjectedPoint};

// ── Projection ────────────────────────────────────────────────────────────────

/// The projection used between the geodetic and the display frame.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Projection {
    /// SWEREF99 TM (EPSG:3006).
    #[default]
    Sweref99Tm,
    /// Identity: `x = lon`, `y = lat`.  For sources that are already metric.
    Planar,
    /// Any other transverse Mercator grid.
    TransverseMercator(TransverseMercator),
}

impl Projection {
    /// Geodetic → projected.
    pub fn to_projected(&self, p: GeoPoint) -> ProjectedPoint {
        match self {
            Projection::Sweref99Tm => TransverseMercator::SWEREF99_TM.forward(p),
            Projection::Planar => ProjectedPoint::new(p.lon, p.lat),
            Projection::TransverseMercator(tm) => tm.forward(p),
        }
    }

    /// Projected → geodetic.
    pub fn to_geographic(&self, p: ProjectedPoint) -> GeoPoint {
        match self {
            Projection::Sweref99Tm => TransverseMercator::SWEREF99_TM.inverse(p),
            Projection::Planar => GeoPoint::new(p.x, p.y),
            Projection::TransverseMercator(tm) => tm.inverse(p),
        }
    }

    /// Validate that `p` is a legal input for this projection.
    ///
    /// `Planar` accepts any finite pair; the geodetic projections require
    /// finite degrees in range.
    pub fn check(&self, p: GeoPoint) -> GeoResult<GeoPoint> {
        let p = p.finite()?;
        match self {
            Projection::Planar => Ok(p),
            Projection::Sweref99Tm | Projection::TransverseMercator(_) => p.in_geodetic_range(),
        }
    }

    /// Checked geodetic → projected.  Besides [`check`](Self::check), this
    /// rejects points the series maps to infinity, such as the equator 90°
    /// from a transverse Mercator central meridian.
    pub fn project(&self, p: GeoPoint) -> GeoResult<ProjectedPoint> {
        let pos = self.to_projected(self.check(p)?);
        if !pos.x.is_finite() || !pos.y.is_finite() {
            return Err(GeoError::Unprojectable { lon: p.lon, lat: p.lat });
        }
        Ok(pos)
    }
}

// ── TransverseMercator ────────────────────────────────────────────────────────

/// Parameters of a transverse Mercator grid.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransverseMercator {
    /// Ellipsoid semi-major axis, metres.
    pub semi_major_axis: f64,
    /// Ellipsoid flattening.
    pub flattening: f64,
    /// Longitude of the central meridian, degrees.
    pub central_meridian: f64,
    /// Scale factor on the central meridian.
    pub scale: f64,
    pub false_northing: f64,
    pub false_easting: f64,
}

/// GRS 80 ellipsoid.
const GRS80_A: f64 = 6_378_137.0;
const GRS80_F: f64 = 1.0 / 298.257_222_101;

impl TransverseMercator {
    /// SWEREF99 TM: UTM zone 33 geometry on GRS 80.
    pub const SWEREF99_TM: TransverseMercator = TransverseMercator {
        semi_major_axis:  GRS80_A,
        flattening:       GRS80_F,
        central_meridian: 15.0,
        scale:            0.9996,
        false_northing:   0.0,
        false_easting:    500_000.0,
    };

    /// Northern-hemisphere UTM zone on GRS 80.
    pub fn utm(zone: u8) -> Self {
        Self {
            central_meridian: zone as f64 * 6.0 - 183.0,
            ..Self::SWEREF99_TM
        }
    }

    /// Third flattening `n` and the rectifying radius scaled by `k0`.
    fn series_base(&self) -> (f64, f64) {
        let f = self.flattening;
        let n = f / (2.0 - f);
        let n2 = n * n;
        let a_roof = self.semi_major_axis / (1.0 + n) * (1.0 + n2 / 4.0 + n2 * n2 / 64.0);
        (n, self.scale * a_roof)
    }

    fn e2(&self) -> f64 {
        let f = self.flattening;
        f * (2.0 - f)
    }

    /// Geodetic → grid.
    pub fn forward(&self, p: GeoPoint) -> ProjectedPoint {
        let (n, k0a) = self.series_base();
        let e2 = self.e2();
        let (n2, n3, n4) = (n * n, n * n * n, n * n * n * n);

        let a = e2;
        let b = (5.0 * e2 * e2 - e2 * e2 * e2) / 6.0;
        let c = (104.0 * e2.powi(3) - 45.0 * e2.powi(4)) / 120.0;
        let d = 1237.0 * e2.powi(4) / 1260.0;

        let beta = [
            n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0 + 41.0 * n4 / 180.0,
            13.0 * n2 / 48.0 - 3.0 * n3 / 5.0 + 557.0 * n4 / 1440.0,
            61.0 * n3 / 240.0 - 103.0 * n4 / 140.0,
            49561.0 * n4 / 161_280.0,
        ];

        let phi = p.lat.to_radians();
        let d_lambda = (p.lon - self.central_meridian).to_radians();

        let s2 = phi.sin().powi(2);
        let phi_star = phi - phi.sin() * phi.cos() * (a + b * s2 + c * s2 * s2 + d * s2 * s2 * s2);

        let xi = (phi_star.tan() / d_lambda.cos()).atan();
        let eta = (phi_star.cos() * d_lambda.sin()).atanh();

        let mut north = xi;
        let mut east = eta;
        for (j, b) in beta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            north += b * (k * xi).sin() * (k * eta).cosh();
            east += b * (k * xi).cos() * (k * eta).sinh();
        }

        ProjectedPoint::new(
            k0a * east + self.false_easting,
            k0a * north + self.false_northing,
        )
    }

    /// Grid → geodetic.
    pub fn inverse(&self, p: ProjectedPoint) -> GeoPoint {
        let (n, k0a) = self.series_base();
        let e2 = self.e2();
        let (n2, n3, n4) = (n * n, n * n * n, n * n * n * n);

        let delta = [
            n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0 - n4 / 360.0,
            n2 / 48.0 + n3 / 15.0 - 437.0 * n4 / 1440.0,
            17.0 * n3 / 480.0 - 37.0 * n4 / 840.0,
            4397.0 * n4 / 161_280.0,
        ];

        let a_star = e2 + e2.powi(2) + e2.powi(3) + e2.powi(4);
        let b_star = -(7.0 * e2.powi(2) + 17.0 * e2.powi(3) + 30.0 * e2.powi(4)) / 6.0;
        let c_star = (224.0 * e2.powi(3) + 889.0 * e2.powi(4)) / 120.0;
        let d_star = -(4279.0 * e2.powi(4)) / 1260.0;

        let xi = (p.y - self.false_northing) / k0a;
        let eta = (p.x - self.false_easting) / k0a;

        let mut xi_p = xi;
        let mut eta_p = eta;
        for (j, d) in delta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi_p -= d * (k * xi).sin() * (k * eta).cosh();
            eta_p -= d * (k * xi).cos() * (k * eta).sinh();
        }

        let phi_star = (xi_p.sin() / eta_p.cosh()).asin();
        let d_lambda = (eta_p.sinh() / xi_p.cos()).atan();

        let s2 = phi_star.sin().powi(2);
        let phi = phi_star
            + phi_star.sin()
                * phi_star.cos()
                * (a_star + b_star * s2 + c_star * s2 * s2 + d_star * s2 * s2 * s2);

        GeoPoint::new(self.central_meridian + d_lambda.to_degrees(), phi.to_degrees())
    }
}

impl Default for TransverseMercator {
    fn default() -> Self {
        Self::SWEREF99_TM
    }
}
