//! Segment catalog and hit-testing.
//!
//! # Picking
//!
//! Normally the renderer resolves a screen pixel to a feature and the UI
//! calls [`SegmentCatalog::segment_at`].  For hosts without a renderer-side
//! hit test, [`SegmentCatalog::pick`] does the same job geometrically: an
//! R-tree over every line piece in the projected frame, queried with a
//! tolerance in metres.

use rstar::primitives::{GeomWithData, Line};
use rstar::{PointDistance, RTree};

use tn_core::{FeatureId, ProjectedPoint, Projection};

use crate::feature::{Geometry, RelationTags, TrailFeature};
use crate::{CatalogError, CatalogResult};

// ── SegmentInfo ───────────────────────────────────────────────────────────────

/// What the UI shows for a selected segment.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentInfo {
    pub feature: FeatureId,
    /// Tags of the feature's primary relation.
    pub tags: RelationTags,
}

impl SegmentInfo {
    pub fn name(&self) -> Option<&str> {
        self.tags.name.as_deref()
    }

    pub fn distance(&self) -> Option<&str> {
        self.tags.distance.as_deref()
    }
}

/// Describe a picked feature.
///
/// Returns the primary relation's tags, or `None` for an untagged connector,
/// which must never surface as a selectable segment.
pub fn describe(feature: &TrailFeature) -> Option<SegmentInfo> {
    feature.primary_relation().map(|r| SegmentInfo {
        feature: feature.id,
        tags: r.tags.clone(),
    })
}

// ── SegmentCatalog ────────────────────────────────────────────────────────────

type Piece = GeomWithData<Line<[f64; 2]>, FeatureId>;

/// All source features, indexed by `FeatureId`, plus a line-piece R-tree
/// for geometric picking.  Immutable once built.
pub struct SegmentCatalog {
    features: Vec<TrailFeature>,
    pieces: RTree<Piece>,
}

impl SegmentCatalog {
    /// Build from features whose ids are `0..n` in order.
    pub fn new(features: Vec<TrailFeature>, projection: Projection) -> CatalogResult<Self> {
        if let Some((position, f)) = features
            .iter()
            .enumerate()
            .find(|(i, f)| f.id.index() != *i)
        {
            return Err(CatalogError::FeatureOrder { position, found: f.id.0 });
        }

        let mut pieces = Vec::new();
        for f in &features {
            match &f.geometry {
                Geometry::LineString(coords) => {
                    let projected: Vec<ProjectedPoint> =
                        coords.iter().map(|&c| projection.to_projected(c)).collect();
                    for w in projected.windows(2) {
                        pieces.push(GeomWithData::new(
                            Line::new(w[0].to_array(), w[1].to_array()),
                            f.id,
                        ));
                    }
                }
                Geometry::Point(_) => {}
            }
        }

        Ok(Self { features, pieces: RTree::bulk_load(pieces) })
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn feature(&self, id: FeatureId) -> Option<&TrailFeature> {
        self.features.get(id.index())
    }

    pub fn features(&self) -> &[TrailFeature] {
        &self.features
    }

    /// [`describe`] by id.  `None` for unknown ids and for connectors.
    pub fn segment_at(&self, id: FeatureId) -> Option<SegmentInfo> {
        self.feature(id).and_then(describe)
    }

    /// The line feature closest to `pos`, if within `tolerance` metres.
    /// Equidistant candidates resolve to the lowest id.
    pub fn pick(&self, pos: ProjectedPoint, tolerance: f64) -> Option<FeatureId> {
        let q = pos.to_array();
        self.pieces
            .locate_within_distance(q, tolerance * tolerance)
            .map(|piece| (piece.geom().distance_2(&q), piece.data))
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(_, id)| id)
    }

    /// Every feature whose primary relation is called `name`, i.e. what a
    /// highlight of `name` paints.
    pub fn features_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a TrailFeature> + 'a {
        self.features.iter().filter(move |f| f.name() == Some(name))
    }

    /// Distinct relation names in first-seen order.
    pub fn relation_names(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for name in self.features.iter().filter_map(TrailFeature::name) {
            if !seen.contains(&name) {
                seen.push(name);
            }
        }
        seen
    }

    /// Count of LineString features without relations.
    pub fn connector_count(&self) -> usize {
        self.features
            .iter()
            .filter(|f| f.line().is_some() && f.is_connector())
            .count()
    }
}
