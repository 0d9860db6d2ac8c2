//! Network configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config:
//!
//! ```json
//! {
//!   "projection": { "kind": "sweref99_tm" },
//!   "vertex_keying": { "kind": "exact" },
//!   "palette": { "base": "#4466aa", "highlight": "#ff4422" },
//!   "pick_tolerance_m": 25.0
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use tn_catalog::Palette;
use tn_core::Projection;
use tn_spatial::VertexKeying;

use crate::{NetworkError, NetworkResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Geodetic → display frame.  Default: SWEREF99 TM.
    pub projection: Projection,
    /// How coincident coordinates are merged into one vertex.
    pub vertex_keying: VertexKeying,
    /// Base and highlight trail colours.
    pub palette: Palette,
    /// Geometric pick radius for [`pick_segment`], metres.
    ///
    /// [`pick_segment`]: crate::RouteNetwork::pick_segment
    pub pick_tolerance_m: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            projection: Projection::Sweref99Tm,
            vertex_keying: VertexKeying::Exact,
            palette: Palette::default(),
            pick_tolerance_m: 25.0,
        }
    }
}

impl NetworkConfig {
    /// Config for sources that are already in a metric frame.
    pub fn planar() -> Self {
        Self { projection: Projection::Planar, ..Self::default() }
    }

    pub fn from_json_str(json: &str) -> NetworkResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| NetworkError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> NetworkResult<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> NetworkResult<()> {
        if !self.pick_tolerance_m.is_finite() || self.pick_tolerance_m < 0.0 {
            return Err(NetworkError::Config(format!(
                "pick_tolerance_m must be a non-negative number, got {}",
                self.pick_tolerance_m
            )));
        }
        if let VertexKeying::Grid { precision } = self.vertex_keying {
            if !precision.is_finite() || precision <= 0.0 {
                return Err(NetworkError::Config(format!(
                    "vertex_keying.precision must be positive, got {precision}"
                )));
            }
        }
        Ok(())
    }
}
