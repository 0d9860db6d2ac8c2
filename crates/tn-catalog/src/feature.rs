//! Trail features and their relation memberships.
//!
//! Source features come from an OSM extract: each line piece lists the
//! route relations it belongs to, and each relation carries free-form
//! string tags.  The two tags the application relies on (`name` and
//! `distance`) are typed fields; everything else lands in `extra`.

use std::collections::BTreeMap;

use tn_core::{FeatureId, GeoPoint};

// ── Geometry ──────────────────────────────────────────────────────────────────

/// The geometry kinds a trail source may contain.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Geometry {
    /// A marker (trailhead, shelter…).  Never part of the routable graph.
    Point(GeoPoint),
    /// A trail piece.
    LineString(Vec<GeoPoint>),
}

impl Geometry {
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::LineString(_) => "LineString",
        }
    }
}

// ── RelationTags ──────────────────────────────────────────────────────────────

/// Tags of one relation.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelationTags {
    /// Human-readable name, e.g. `"Skåneleden SL1 etapp 3"`.
    pub name: Option<String>,
    /// Declared distance, verbatim from the source.
    pub distance: Option<String>,
    /// Every other tag.
    pub extra: BTreeMap<String, String>,
}

impl RelationTags {
    /// Sort `(key, value)` pairs into the typed fields and `extra`.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut tags = RelationTags::default();
        for (k, v) in pairs {
            let (k, v) = (k.into(), v.into());
            match k.as_str() {
                "name" => tags.name = Some(v),
                "distance" => tags.distance = Some(v),
                _ => {
                    tags.extra.insert(k, v);
                }
            }
        }
        tags
    }

    /// Look up any tag by key, typed or not.
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "name" => self.name.as_deref(),
            "distance" => self.distance.as_deref(),
            _ => self.extra.get(key).map(String::as_str),
        }
    }

    /// Declared distance in kilometres, if it starts with a number.
    ///
    /// Accepts `"12.5"`, `"12,5 km"`, `"8 km"`.  OSM's `distance` tag is in
    /// kilometres unless a unit says otherwise; `m` is the only other unit
    /// recognised.
    pub fn distance_km(&self) -> Option<f64> {
        let raw = self.distance.as_deref()?.trim();
        let end = raw
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == ','))
            .unwrap_or(raw.len());
        let value: f64 = raw[..end].replace(',', ".").parse().ok()?;
        match raw[end..].trim() {
            "m" => Some(value / 1_000.0),
            _ => Some(value),
        }
    }
}

// ── Relation ──────────────────────────────────────────────────────────────────

/// Membership of a feature in a relation.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Relation {
    /// OSM relation id, when known.
    pub id: Option<i64>,
    /// Member role (often empty).
    pub role: Option<String>,
    pub tags: RelationTags,
}

// ── TrailFeature ──────────────────────────────────────────────────────────────

/// One source feature with its metadata.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrailFeature {
    pub id: FeatureId,
    pub geometry: Geometry,
    /// Relation memberships in source order.  Empty for connectors.
    pub relations: Vec<Relation>,
}

impl TrailFeature {
    pub fn new(id: FeatureId, geometry: Geometry, relations: Vec<Relation>) -> Self {
        Self { id, geometry, relations }
    }

    /// The relation that identifies this feature: the first one listed.
    pub fn primary_relation(&self) -> Option<&Relation> {
        self.relations.first()
    }

    /// `name` of the primary relation.
    pub fn name(&self) -> Option<&str> {
        self.primary_relation().and_then(|r| r.tags.name.as_deref())
    }

    /// A line with no relation memberships: pure connectivity scaffolding.
    pub fn is_connector(&self) -> bool {
        self.relations.is_empty()
    }

    pub fn line(&self) -> Option<&[GeoPoint]> {
        match &self.geometry {
            Geometry::LineString(coords) => Some(coords),
            Geometry::Point(_) => None,
        }
    }
}
