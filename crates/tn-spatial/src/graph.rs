//! Trail graph representation and builder.
//!
//! # Points, vertices, chains
//!
//! Every distinct source coordinate becomes a **point** (`PointId`).  A point
//! is promoted to a **vertex** (`VertexId`) when it ends a source polyline or
//! has a number of distinct neighbours other than two.  Runs of degree-2
//! points between two vertices are compacted into a single **chain** that
//! keeps the full point sequence for geometry reconstruction.
//!
//! # Data layout
//!
//! Each chain is exposed as two directed edges (forward and reverse) in
//! **Compressed Sparse Row (CSR)** format.  Given a `VertexId v`, its
//! outgoing edges occupy:
//!
//! ```text
//! edge_*[ vertex_out_start[v] .. vertex_out_start[v+1] ]
//! ```
//!
//! # Placement
//!
//! Every point is either a vertex or sits at one position inside exactly
//! one chain ([`PointPlacement`]).  Chains carry cumulative projected
//! lengths so the router can leave an interior point towards either end.
//!
//! # Spatial index
//!
//! A [`CoordinateIndex`] over every point in the projected frame is built
//! alongside, so snapping can land on chain interiors as well as vertices.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use tn_core::{EdgeId, GeoPoint, PointId, ProjectedPoint, Projection, VertexId};

use crate::index::CoordinateIndex;

// ── VertexKeying ──────────────────────────────────────────────────────────────

/// How source coordinates are identified as the same point.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum VertexKeying {
    /// Bit-exact coordinate identity (only `-0.0`/`0.0` are folded).
    #[default]
    Exact,
    /// Round the source coordinates (degrees for geodetic data) to a grid
    /// of `precision` before comparing.  The first coordinate seen in a
    /// cell is the one kept.
    Grid { precision: f64 },
}

impl VertexKeying {
    fn key(self, p: GeoPoint) -> (u64, u64) {
        match self {
            VertexKeying::Exact => p.exact_key(),
            VertexKeying::Grid { precision } => (
                (p.lon / precision).round() as i64 as u64,
                (p.lat / precision).round() as i64 as u64,
            ),
        }
    }
}

// ── PointPlacement ────────────────────────────────────────────────────────────

/// Where a point sits in the compacted graph.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointPlacement {
    Vertex(VertexId),
    /// `chains[chain][position]`, strictly between the chain's end vertices.
    Interior { chain: u32, position: usize },
}

// ── TrailGraph ────────────────────────────────────────────────────────────────

/// Undirected trail graph, compacted, stored as directed CSR edges.
///
/// Immutable once built.  Do not construct directly; use
/// [`TrailGraphBuilder`].
pub struct TrailGraph {
    // ── Point data ────────────────────────────────────────────────────────
    /// Source coordinate of each point.  Indexed by `PointId`.
    pub point_geo: Vec<GeoPoint>,
    /// Projected coordinate of each point.  Indexed by `PointId`.
    pub point_proj: Vec<ProjectedPoint>,

    // ── Vertex data ───────────────────────────────────────────────────────
    /// The point each vertex sits on.  Indexed by `VertexId`.
    pub vertex_point: Vec<PointId>,
    /// CSR row pointer; length = `vertex_count + 1`.
    pub vertex_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId) ─────────────────────────────────────
    pub edge_from: Vec<VertexId>,
    pub edge_to: Vec<VertexId>,
    /// Projected length of the edge's chain, metres.  Dijkstra cost.
    pub edge_length: Vec<f64>,
    /// Chain index backing each edge.
    pub edge_chain: Vec<u32>,
    /// `true` if the edge walks its chain back to front.
    pub edge_reversed: Vec<bool>,

    // ── Chains ────────────────────────────────────────────────────────────
    /// Point sequence of each compacted chain, vertex to vertex.
    pub chains: Vec<Vec<PointId>>,

    point_vertex: Vec<VertexId>,
    point_interior: Vec<Option<(u32, u32)>>,
    chain_ends: Vec<(VertexId, VertexId)>,
    chain_measure: Vec<Vec<f64>>,
    point_lookup: FxHashMap<(u64, u64), PointId>,
    keying: VertexKeying,
    projection: Projection,
    index: CoordinateIndex,
}

impl TrailGraph {
    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn vertex_count(&self) -> usize {
        self.vertex_point.len()
    }

    /// Number of directed edges (twice the chain count).
    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    pub fn point_count(&self) -> usize {
        self.point_geo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_point.is_empty()
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn index(&self) -> &CoordinateIndex {
        &self.index
    }

    // ── Vertices ──────────────────────────────────────────────────────────

    #[inline]
    pub fn contains(&self, v: VertexId) -> bool {
        v.index() < self.vertex_point.len()
    }

    /// Source coordinate of a vertex.
    #[inline]
    pub fn vertex_geo(&self, v: VertexId) -> GeoPoint {
        self.point_geo[self.vertex_point[v.index()].index()]
    }

    /// The vertex sitting on `p`, if `p` survived compaction as a vertex.
    pub fn vertex_at(&self, p: PointId) -> Option<VertexId> {
        self.point_vertex
            .get(p.index())
            .copied()
            .filter(|v| *v != VertexId::INVALID)
    }

    /// Look up the point for a geodetic coordinate under this graph's keying.
    pub fn find_point(&self, p: GeoPoint) -> Option<PointId> {
        self.point_lookup.get(&self.keying.key(p)).copied()
    }

    /// Look up the vertex for a geodetic coordinate, if one exists there.
    pub fn find_vertex(&self, p: GeoPoint) -> Option<VertexId> {
        self.find_point(p).and_then(|pt| self.vertex_at(pt))
    }

    /// Nearest point (vertex or chain interior) to a projected position.
    /// `None` only for an empty graph.
    pub fn nearest_point(&self, pos: ProjectedPoint) -> Option<PointId> {
        self.index.nearest(pos).map(|hit| hit.id)
    }

    // ── Points & chains ───────────────────────────────────────────────────

    #[inline]
    pub fn contains_point(&self, p: PointId) -> bool {
        p.index() < self.point_geo.len()
    }

    /// Vertex or chain slot of `p`; `None` for an unknown id.
    pub fn placement(&self, p: PointId) -> Option<PointPlacement> {
        if let Some(v) = self.vertex_at(p) {
            return Some(PointPlacement::Vertex(v));
        }
        let (chain, position) = (*self.point_interior.get(p.index())?)?;
        Some(PointPlacement::Interior { chain, position: position as usize })
    }

    /// The vertex that stands in for `p` in connectivity questions: `p`
    /// itself if it is a vertex, otherwise the start of its chain.
    pub fn anchor_vertex(&self, p: PointId) -> Option<VertexId> {
        match self.placement(p)? {
            PointPlacement::Vertex(v) => Some(v),
            PointPlacement::Interior { chain, .. } => Some(self.chain_ends(chain).0),
        }
    }

    /// Start and end vertex of a chain, in stored point order.
    pub fn chain_ends(&self, chain: u32) -> (VertexId, VertexId) {
        self.chain_ends[chain as usize]
    }

    /// Projected distance from the chain's first point to each of its
    /// points; the last entry is the chain length.
    pub fn chain_measure(&self, chain: u32) -> &[f64] {
        &self.chain_measure[chain as usize]
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `v`.
    #[inline]
    pub fn out_edges(&self, v: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.vertex_out_start[v.index()] as usize;
        let end   = self.vertex_out_start[v.index() + 1] as usize;
        (start..end).map(EdgeId::from_index)
    }

    #[inline]
    pub fn out_degree(&self, v: VertexId) -> usize {
        let start = self.vertex_out_start[v.index()] as usize;
        let end   = self.vertex_out_start[v.index() + 1] as usize;
        end - start
    }

    /// Points of edge `e` in travel order, both end vertices included.
    pub fn edge_points(&self, e: EdgeId) -> Box<dyn Iterator<Item = PointId> + '_> {
        let chain = &self.chains[self.edge_chain[e.index()] as usize];
        if self.edge_reversed[e.index()] {
            Box::new(chain.iter().rev().copied())
        } else {
            Box::new(chain.iter().copied())
        }
    }
}

// ── TrailGraphBuilder ─────────────────────────────────────────────────────────

/// Construct a [`TrailGraph`] from polylines, then call
/// [`build`](Self::build).
///
/// Construction is deterministic: identical input (in identical order)
/// yields identical ids.
///
/// # Example
///
/// ```
/// use tn_core::{GeoPoint, Projection};
/// use tn_spatial::TrailGraphBuilder;
///
/// let mut b = TrailGraphBuilder::new(Projection::Planar);
/// b.add_line(&[GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 5.0), GeoPoint::new(0.0, 10.0)]);
/// let g = b.build();
/// assert_eq!(g.vertex_count(), 2); // (0,5) is compacted away
/// assert_eq!(g.edge_count(), 2);   // one chain, both directions
/// ```
pub struct TrailGraphBuilder {
    projection: Projection,
    keying: VertexKeying,
    point_geo: Vec<GeoPoint>,
    point_proj: Vec<ProjectedPoint>,
    point_lookup: FxHashMap<(u64, u64), PointId>,
    neighbors: Vec<Vec<PointId>>,
    line_end: Vec<bool>,
    segment_count: usize,
}

impl TrailGraphBuilder {
    pub fn new(projection: Projection) -> Self {
        Self::with_keying(projection, VertexKeying::Exact)
    }

    pub fn with_keying(projection: Projection, keying: VertexKeying) -> Self {
        Self {
            projection,
            keying,
            point_geo: Vec::new(),
            point_proj: Vec::new(),
            point_lookup: FxHashMap::default(),
            neighbors: Vec::new(),
            line_end: Vec::new(),
            segment_count: 0,
        }
    }

    pub fn point_count(&self) -> usize {
        self.point_geo.len()
    }

    fn intern(&mut self, p: GeoPoint) -> PointId {
        let key = self.keying.key(p);
        if let Some(&id) = self.point_lookup.get(&key) {
            return id;
        }
        let id = PointId::from_index(self.point_geo.len());
        self.point_geo.push(p);
        self.point_proj.push(self.projection.to_projected(p));
        self.neighbors.push(Vec::new());
        self.line_end.push(false);
        self.point_lookup.insert(key, id);
        id
    }

    /// Add one polyline.  Consecutive repeats of the same point are skipped;
    /// a line that collapses to a single point still contributes that point
    /// as an isolated vertex.
    pub fn add_line(&mut self, coords: &[GeoPoint]) {
        let ids: Vec<PointId> = coords.iter().map(|&c| self.intern(c)).collect();
        let (Some(&first), Some(&last)) = (ids.first(), ids.last()) else {
            return;
        };
        self.line_end[first.index()] = true;
        self.line_end[last.index()] = true;

        let mut segments = 0;
        for w in ids.windows(2) {
            let (a, b) = (w[0], w[1]);
            if a == b {
                continue;
            }
            self.neighbors[a.index()].push(b);
            self.neighbors[b.index()].push(a);
            segments += 1;
        }
        if segments == 0 {
            warn!(point = %self.point_geo[first.index()], "polyline collapses to a single point");
        }
        self.segment_count += segments;
    }

    /// Consume the builder and produce a [`TrailGraph`].
    pub fn build(self) -> TrailGraph {
        let mut neighbors = self.neighbors;
        for n in &mut neighbors {
            n.sort_unstable();
            n.dedup();
        }
        let point_count = self.point_geo.len();

        // ── Vertices ──────────────────────────────────────────────────────
        let mut point_vertex = vec![VertexId::INVALID; point_count];
        let mut vertex_point = Vec::new();
        for p in 0..point_count {
            if self.line_end[p] || neighbors[p].len() != 2 {
                point_vertex[p] = VertexId::from_index(vertex_point.len());
                vertex_point.push(PointId::from_index(p));
            }
        }

        // ── Chains ────────────────────────────────────────────────────────
        // Walk from every vertex along every unvisited segment until the
        // next vertex.  Each segment is consumed exactly once.
        let mut visited: FxHashSet<(PointId, PointId)> = FxHashSet::default();
        let seg_key = |a: PointId, b: PointId| if a < b { (a, b) } else { (b, a) };

        let mut chains: Vec<Vec<PointId>> = Vec::new();
        let mut chain_ends: Vec<(VertexId, VertexId)> = Vec::new();
        let mut chain_measure: Vec<Vec<f64>> = Vec::new();

        for &start in &vertex_point {
            for &first in &neighbors[start.index()] {
                if !visited.insert(seg_key(start, first)) {
                    continue;
                }
                let mut chain = vec![start, first];
                let mut length = self.point_proj[start.index()].distance(self.point_proj[first.index()]);
                let mut measure = vec![0.0, length];
                let (mut prev, mut cur) = (start, first);
                while !point_vertex[cur.index()].is_valid() {
                    // Degree-2 interior point: continue through the other side.
                    let nb = &neighbors[cur.index()];
                    let next = if nb[0] == prev { nb[1] } else { nb[0] };
                    visited.insert(seg_key(cur, next));
                    length += self.point_proj[cur.index()].distance(self.point_proj[next.index()]);
                    chain.push(next);
                    measure.push(length);
                    (prev, cur) = (cur, next);
                }
                chain_ends.push((point_vertex[start.index()], point_vertex[cur.index()]));
                chain_measure.push(measure);
                chains.push(chain);
            }
        }
        debug_assert_eq!(
            visited.len(),
            neighbors.iter().map(Vec::len).sum::<usize>() / 2,
            "every distinct segment belongs to exactly one chain"
        );

        let mut point_interior = vec![None; point_count];
        for (c, chain) in chains.iter().enumerate() {
            let interior = &chain[1..chain.len() - 1];
            for (offset, p) in interior.iter().enumerate() {
                point_interior[p.index()] = Some((c as u32, offset as u32 + 1));
            }
        }

        // ── Directed edges, sorted by source vertex (stable) ──────────────
        let mut raw: Vec<(VertexId, VertexId, u32, bool)> = Vec::with_capacity(chains.len() * 2);
        for (c, &(a, b)) in chain_ends.iter().enumerate() {
            raw.push((a, b, c as u32, false));
            raw.push((b, a, c as u32, true));
        }
        raw.sort_by_key(|e| e.0);

        let vertex_count = vertex_point.len();
        let mut vertex_out_start = vec![0u32; vertex_count + 1];
        for e in &raw {
            vertex_out_start[e.0.index() + 1] += 1;
        }
        for i in 1..=vertex_count {
            vertex_out_start[i] += vertex_out_start[i - 1];
        }

        let edge_from:     Vec<VertexId> = raw.iter().map(|e| e.0).collect();
        let edge_to:       Vec<VertexId> = raw.iter().map(|e| e.1).collect();
        let edge_chain:    Vec<u32>      = raw.iter().map(|e| e.2).collect();
        let edge_reversed: Vec<bool>     = raw.iter().map(|e| e.3).collect();
        let edge_length:   Vec<f64>      = raw.iter().map(|e| chain_length(&chain_measure, e.2)).collect();

        let index = CoordinateIndex::build(
            self.point_proj
                .iter()
                .enumerate()
                .map(|(p, &pos)| (pos, PointId::from_index(p))),
        );

        debug!(
            points = point_count,
            segments = self.segment_count,
            vertices = vertex_count,
            chains = chains.len(),
            "trail graph compacted"
        );

        TrailGraph {
            point_geo: self.point_geo,
            point_proj: self.point_proj,
            vertex_point,
            vertex_out_start,
            edge_from,
            edge_to,
            edge_length,
            edge_chain,
            edge_reversed,
            chains,
            point_vertex,
            point_interior,
            chain_ends,
            chain_measure,
            point_lookup: self.point_lookup,
            keying: self.keying,
            projection: self.projection,
            index,
        }
    }
}

fn chain_length(measure: &[Vec<f64>], chain: u32) -> f64 {
    measure[chain as usize].last().copied().unwrap_or(0.0)
}
