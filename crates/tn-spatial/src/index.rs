//! Nearest-point spatial index.
//!
//! An R-tree (via `rstar`) over the projected position of every graph
//! point, chain interiors included.  Points have zero extent, so every
//! envelope is degenerate; the nearest-neighbour query is rstar's
//! branch-and-bound traversal.
//!
//! Distances are planar Euclidean in the projected frame.  For a regional
//! network the projection's scale error is far below snapping precision.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use tn_core::{PointId, ProjectedPoint};

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone)]
struct PointEntry {
    point: [f64; 2], // [x, y]
    id: PointId,
}

impl RTreeObject for PointEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for PointEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── CoordinateIndex ───────────────────────────────────────────────────────────

/// A point returned by an index query.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IndexedPoint {
    pub id: PointId,
    pub pos: ProjectedPoint,
}

impl From<&PointEntry> for IndexedPoint {
    fn from(e: &PointEntry) -> Self {
        IndexedPoint { id: e.id, pos: ProjectedPoint::from(e.point) }
    }
}

/// Read-only nearest-neighbour index over point positions.
pub struct CoordinateIndex {
    tree: RTree<PointEntry>,
}

impl CoordinateIndex {
    /// Bulk-load all entries at once (O(N log N)).
    ///
    /// An empty input yields an empty index; every query on it returns
    /// nothing, so callers must check [`is_empty`](Self::is_empty) if they
    /// need a guaranteed answer.
    pub fn build(entries: impl IntoIterator<Item = (ProjectedPoint, PointId)>) -> Self {
        let entries: Vec<PointEntry> = entries
            .into_iter()
            .map(|(pos, id)| PointEntry { point: pos.to_array(), id })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// The closest indexed point to `query`, which must be finite.
    ///
    /// Returns `None` only if the index is empty.
    pub fn nearest(&self, query: ProjectedPoint) -> Option<IndexedPoint> {
        self.tree
            .nearest_neighbor(&query.to_array())
            .map(IndexedPoint::from)
    }

    /// Up to `k` closest points, sorted by ascending distance.
    pub fn k_nearest(&self, query: ProjectedPoint, k: usize) -> Vec<IndexedPoint> {
        self.tree
            .nearest_neighbor_iter(&query.to_array())
            .take(k)
            .map(IndexedPoint::from)
            .collect()
    }
}
