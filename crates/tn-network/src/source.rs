//! GeoJSON source parsing.
//!
//! The source is an osmtogeojson-style FeatureCollection.  Relation
//! memberships live in the `@relations` property:
//!
//! ```json
//! "@relations": [{ "rel": 123, "role": "", "reltags": { "name": "…", "distance": "12" } }]
//! ```
//!
//! Parsing is strict: anything malformed is a [`LoadError`] naming the
//! offending feature by position.

use std::collections::BTreeMap;

use geojson::{GeoJson, JsonObject, Value};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::debug;

use tn_catalog::{Geometry, Relation, RelationTags, TrailFeature};
use tn_core::{FeatureId, GeoPoint, Projection};

use crate::LoadError;

#[derive(Deserialize)]
struct RawRelation {
    #[serde(default)]
    rel: Option<i64>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    reltags: BTreeMap<String, JsonValue>,
}

/// Parse a FeatureCollection into trail features, ids in source order.
///
/// Coordinates are checked against `projection` (a geodetic projection
/// rejects out-of-range degrees).  A collection without any LineString is
/// rejected.
pub fn parse_features(source: &str, projection: &Projection) -> Result<Vec<TrailFeature>, LoadError> {
    let collection = match source.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(fc) => fc,
        GeoJson::Feature(_) => return Err(LoadError::NotFeatureCollection("Feature")),
        GeoJson::Geometry(_) => return Err(LoadError::NotFeatureCollection("Geometry")),
    };

    let mut features = Vec::with_capacity(collection.features.len());
    for (index, feature) in collection.features.into_iter().enumerate() {
        let geometry = feature.geometry.ok_or(LoadError::MissingGeometry { index })?;
        let geometry = convert_geometry(index, geometry.value, projection)?;
        let relations = parse_relations(index, feature.properties.as_ref())?;
        features.push(TrailFeature::new(FeatureId(index as u32), geometry, relations));
    }

    if !features.iter().any(|f| f.line().is_some()) {
        return Err(LoadError::NoTrails);
    }
    debug!(features = features.len(), "parsed trail source");
    Ok(features)
}

fn convert_position(index: usize, position: &[f64], projection: &Projection) -> Result<GeoPoint, LoadError> {
    GeoPoint::from_position(position)
        .and_then(|p| projection.project(p).map(|_| p))
        .map_err(|source| LoadError::Coordinate { index, source })
}

fn convert_geometry(index: usize, value: Value, projection: &Projection) -> Result<Geometry, LoadError> {
    match value {
        Value::Point(position) => Ok(Geometry::Point(convert_position(index, &position, projection)?)),
        Value::LineString(positions) => {
            if positions.len() < 2 {
                return Err(LoadError::ShortLine { index, found: positions.len() });
            }
            let coords = positions
                .iter()
                .map(|p| convert_position(index, p, projection))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Geometry::LineString(coords))
        }
        other => Err(LoadError::UnsupportedGeometry { index, kind: kind_of(&other) }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

fn parse_relations(index: usize, properties: Option<&JsonObject>) -> Result<Vec<Relation>, LoadError> {
    let raw = match properties.and_then(|p| p.get("@relations")) {
        None | Some(JsonValue::Null) => return Ok(Vec::new()),
        Some(v) => v.clone(),
    };
    let raw: Vec<RawRelation> = serde_json::from_value(raw)
        .map_err(|e| LoadError::Relations { index, reason: e.to_string() })?;

    Ok(raw
        .into_iter()
        .map(|r| Relation {
            id: r.rel,
            role: r.role,
            tags: RelationTags::from_pairs(r.reltags.into_iter().map(|(k, v)| {
                let v = match v {
                    JsonValue::String(s) => s,
                    other => other.to_string(),
                };
                (k, v)
            })),
        })
        .collect())
}
