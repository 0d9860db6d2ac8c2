//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! The network façade calls routing via the [`Router`] trait, so an A* or a
//! contraction-hierarchy router can be swapped in without touching the
//! façade.  The default [`DijkstraRouter`] is ample for a regional trail
//! network of a few thousand vertices.
//!
//! # Chain interiors
//!
//! Snapped endpoints are points, and a point inside a compacted chain is not
//! a vertex.  Such a point reaches the graph through either end vertex of
//! its chain, at the partial chain length; [`Router::point_path`] joins
//! those partial walks to a vertex-to-vertex route.
//!
//! # Cost units
//!
//! Edge cost is the projected chain length in metres (`f64`).  Heap entries
//! are ordered by `(cost, VertexId)`, so among equal-cost candidates the
//! lower vertex id settles first and repeated queries give the same path.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use tn_core::{EdgeId, GeoPoint, PointId, ProjectedPoint, VertexId};

use crate::graph::{PointPlacement, TrailGraph};
use crate::{SpatialError, SpatialResult};

// ── TrailPath ─────────────────────────────────────────────────────────────────

/// The result of a routing query.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailPath {
    pub from: PointId,
    pub to: PointId,
    /// Whole edges traversed in order.  Partial chains at either end are in
    /// `points` only.
    pub edges: Vec<EdgeId>,
    /// Point sequence from `from` to `to`, shared points not repeated.
    pub points: Vec<PointId>,
    /// Length along the network, metres.
    pub weight: f64,
}

impl TrailPath {
    /// `true` if source and destination are the same point.
    pub fn is_trivial(&self) -> bool {
        self.points.len() <= 1
    }

    /// Path geometry in the projected (display) frame.
    pub fn projected(&self, graph: &TrailGraph) -> Vec<ProjectedPoint> {
        self.points.iter().map(|p| graph.point_proj[p.index()]).collect()
    }

    /// Path geometry as source geodetic coordinates.
    pub fn geographic(&self, graph: &TrailGraph) -> Vec<GeoPoint> {
        self.points.iter().map(|p| graph.point_geo[p.index()]).collect()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
///
/// Implementations must be `Send + Sync`; the graph is shared read-only.
pub trait Router: Send + Sync {
    /// Shortest path from `from` to `to`.
    ///
    /// - `Ok(None)`: the vertices lie on different islands.
    /// - `Err(VertexNotFound)`: either id is not a vertex of `graph`.
    /// - `from == to` yields a trivial path of weight 0.
    fn shortest_path(
        &self,
        graph: &TrailGraph,
        from: VertexId,
        to: VertexId,
    ) -> SpatialResult<Option<TrailPath>>;

    /// Shortest path between two points, either of which may lie inside a
    /// chain.  Same contract as [`shortest_path`](Self::shortest_path),
    /// with `Err(PointNotFound)` for unknown ids.
    ///
    /// The provided version tries every pair of exit vertices through
    /// `shortest_path`, plus the direct walk when both points share a chain.
    fn point_path(
        &self,
        graph: &TrailGraph,
        from: PointId,
        to: PointId,
    ) -> SpatialResult<Option<TrailPath>> {
        let departures = departures(graph, from)?;
        let arrivals = arrivals(graph, to)?;

        let mut best = along_chain(graph, from, to);
        for d in &departures {
            for a in &arrivals {
                let Some(mid) = self.shortest_path(graph, d.vertex, a.vertex)? else {
                    continue;
                };
                let weight = d.cost + mid.weight + a.cost;
                if best.as_ref().is_none_or(|b| weight < b.weight) {
                    best = Some(stitch(graph, d, mid.edges, a, weight));
                }
            }
        }
        Ok(best)
    }
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra over the CSR trail graph.
///
/// Interior endpoints seed the search with both partial chain lengths, so a
/// point-to-point query is still a single search.
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn shortest_path(
        &self,
        graph: &TrailGraph,
        from: VertexId,
        to: VertexId,
    ) -> SpatialResult<Option<TrailPath>> {
        for v in [from, to] {
            if !graph.contains(v) {
                return Err(SpatialError::VertexNotFound(v));
            }
        }
        let at = |v: VertexId| Approach {
            vertex: v,
            cost: 0.0,
            points: vec![graph.vertex_point[v.index()]],
        };
        Ok(dijkstra(graph, &[at(from)], &[at(to)], None))
    }

    fn point_path(
        &self,
        graph: &TrailGraph,
        from: PointId,
        to: PointId,
    ) -> SpatialResult<Option<TrailPath>> {
        let departures = departures(graph, from)?;
        let arrivals = arrivals(graph, to)?;
        Ok(dijkstra(graph, &departures, &arrivals, along_chain(graph, from, to)))
    }
}

// ── Chain ends ────────────────────────────────────────────────────────────────

/// A walk between an endpoint and one end vertex of its chain.
#[derive(Debug, Clone)]
struct Approach {
    vertex: VertexId,
    cost: f64,
    /// Travel order, endpoint and vertex both included.
    points: Vec<PointId>,
}

/// Ways to leave `p`: itself if it is a vertex, else towards both chain ends.
fn departures(graph: &TrailGraph, p: PointId) -> SpatialResult<Vec<Approach>> {
    match graph.placement(p).ok_or(SpatialError::PointNotFound(p))? {
        PointPlacement::Vertex(vertex) => Ok(vec![Approach { vertex, cost: 0.0, points: vec![p] }]),
        PointPlacement::Interior { chain, position } => {
            let points = &graph.chains[chain as usize];
            let measure = graph.chain_measure(chain);
            let total = measure[measure.len() - 1];
            let (start, end) = graph.chain_ends(chain);
            Ok(vec![
                Approach {
                    vertex: start,
                    cost: measure[position],
                    points: points[..=position].iter().rev().copied().collect(),
                },
                Approach {
                    vertex: end,
                    cost: total - measure[position],
                    points: points[position..].to_vec(),
                },
            ])
        }
    }
}

/// Ways to reach `p`; the departures walked backwards.
fn arrivals(graph: &TrailGraph, p: PointId) -> SpatialResult<Vec<Approach>> {
    let mut approaches = departures(graph, p)?;
    for a in &mut approaches {
        a.points.reverse();
    }
    Ok(approaches)
}

/// The walk that never leaves a chain: `from == to`, or two interior points
/// of the same chain.
fn along_chain(graph: &TrailGraph, from: PointId, to: PointId) -> Option<TrailPath> {
    if from == to {
        return Some(TrailPath { from, to, edges: vec![], points: vec![from], weight: 0.0 });
    }
    let (
        PointPlacement::Interior { chain, position: i },
        PointPlacement::Interior { chain: other, position: j },
    ) = (graph.placement(from)?, graph.placement(to)?)
    else {
        return None;
    };
    if chain != other {
        return None;
    }
    let points = &graph.chains[chain as usize];
    let measure = graph.chain_measure(chain);
    let (points, weight) = if i < j {
        (points[i..=j].to_vec(), measure[j] - measure[i])
    } else {
        (points[j..=i].iter().rev().copied().collect(), measure[i] - measure[j])
    };
    Some(TrailPath { from, to, edges: vec![], points, weight })
}

fn stitch(
    graph: &TrailGraph,
    departure: &Approach,
    edges: Vec<EdgeId>,
    arrival: &Approach,
    weight: f64,
) -> TrailPath {
    let mut points = departure.points.clone();
    for &e in &edges {
        points.extend(graph.edge_points(e).skip(1));
    }
    points.extend(arrival.points.iter().skip(1));
    let from = departure.points[0];
    let to = points[points.len() - 1];
    TrailPath { from, to, edges, points, weight }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Non-negative finite cost with a total order.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Cost(f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Multi-source, multi-target Dijkstra.  Each source vertex starts at its
/// departure cost; reaching a target vertex completes a candidate at the
/// arrival cost.  The search stops once no open label can beat the best
/// candidate, which starts as `direct` when there is one.
fn dijkstra(
    graph: &TrailGraph,
    sources: &[Approach],
    targets: &[Approach],
    direct: Option<TrailPath>,
) -> Option<TrailPath> {
    let n = graph.vertex_count();
    let mut dist      = vec![f64::INFINITY; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];
    let mut seed      = vec![usize::MAX; n];

    // Min-heap: Reverse makes BinaryHeap (max) behave as min-heap.
    let mut heap: BinaryHeap<Reverse<(Cost, VertexId)>> = BinaryHeap::new();
    for (i, s) in sources.iter().enumerate() {
        if s.cost < dist[s.vertex.index()] {
            dist[s.vertex.index()] = s.cost;
            seed[s.vertex.index()] = i;
            heap.push(Reverse((Cost(s.cost), s.vertex)));
        }
    }

    let mut best = direct.as_ref().map_or(f64::INFINITY, |p| p.weight);
    let mut finish: Option<(VertexId, &Approach)> = None;

    while let Some(Reverse((Cost(cost), vertex))) = heap.pop() {
        if cost >= best {
            break;
        }
        // Skip stale heap entries.
        if cost > dist[vertex.index()] {
            continue;
        }

        for arrival in targets.iter().filter(|a| a.vertex == vertex) {
            if cost + arrival.cost < best {
                best = cost + arrival.cost;
                finish = Some((vertex, arrival));
            }
        }

        for edge in graph.out_edges(vertex) {
            let neighbor = graph.edge_to[edge.index()];
            let new_cost = cost + graph.edge_length[edge.index()];

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((Cost(new_cost), neighbor)));
            }
        }
    }

    let Some((end, arrival)) = finish else {
        return direct;
    };

    let mut edges = Vec::new();
    let mut cur = end;
    while prev_edge[cur.index()].is_valid() {
        let e = prev_edge[cur.index()];
        edges.push(e);
        cur = graph.edge_from[e.index()];
    }
    edges.reverse();

    let departure = sources.get(seed[cur.index()])?;
    Some(stitch(graph, departure, edges, arrival, best))
}
