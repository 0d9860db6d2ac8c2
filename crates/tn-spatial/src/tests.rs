//! Unit tests for tn-spatial.
//!
//! All tests use hand-crafted planar networks so distances are exact.

#[cfg(test)]
mod helpers {
    use tn_core::{GeoPoint, PointId, Projection, VertexId};
    use crate::{TrailGraph, TrailGraphBuilder};

    pub fn p(x: f64, y: f64) -> GeoPoint {
        GeoPoint::new(x, y)
    }

    /// "L" network plus a detached segment:
    ///
    /// ```text
    ///   B(0,10) ── C(10,10)        E(100,110)
    ///   │                          │
    ///   A(0,0)                     D(100,100)
    /// ```
    pub fn l_network() -> TrailGraph {
        let mut b = TrailGraphBuilder::new(Projection::Planar);
        b.add_line(&[p(0.0, 0.0), p(0.0, 10.0)]);
        b.add_line(&[p(0.0, 10.0), p(10.0, 10.0)]);
        b.add_line(&[p(100.0, 100.0), p(100.0, 110.0)]);
        b.build()
    }

    pub fn vertex(g: &TrailGraph, x: f64, y: f64) -> VertexId {
        g.find_vertex(p(x, y)).expect("vertex exists")
    }

    pub fn point(g: &TrailGraph, x: f64, y: f64) -> PointId {
        g.find_point(p(x, y)).expect("point exists")
    }
}

// ── Builder & compaction ──────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use tn_core::{GeoPoint, PointId, Projection};
    use crate::{PointPlacement, TrailGraphBuilder, VertexKeying};
    use super::helpers::{l_network, p, point, vertex};

    #[test]
    fn empty_build() {
        let g = TrailGraphBuilder::new(Projection::Planar).build();
        assert!(g.is_empty());
        assert_eq!(g.edge_count(), 0);
        assert!(g.index().is_empty());
    }

    #[test]
    fn l_network_shape() {
        let g = l_network();
        // A, B, C, D, E are all line ends.
        assert_eq!(g.vertex_count(), 5);
        assert_eq!(g.chain_count(), 3);
        assert_eq!(g.edge_count(), 6);
        assert_eq!(g.out_degree(vertex(&g, 0.0, 10.0)), 2);
        assert_eq!(g.out_degree(vertex(&g, 0.0, 0.0)), 1);
    }

    #[test]
    fn straight_polyline_compacts_to_one_chain() {
        let mut b = TrailGraphBuilder::new(Projection::Planar);
        b.add_line(&[p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(3.0, 0.0), p(4.0, 0.0)]);
        let g = b.build();
        assert_eq!(g.point_count(), 5);
        assert_eq!(g.vertex_count(), 2);
        assert_eq!(g.chain_count(), 1);
        assert_eq!(g.chains[0].len(), 5);
        assert_eq!(g.edge_length[0], 4.0);
    }

    #[test]
    fn interior_junction_becomes_vertex() {
        // A cross: the shared middle point has four neighbours.
        let mut b = TrailGraphBuilder::new(Projection::Planar);
        b.add_line(&[p(-1.0, 0.0), p(0.0, 0.0), p(1.0, 0.0)]);
        b.add_line(&[p(0.0, -1.0), p(0.0, 0.0), p(0.0, 1.0)]);
        let g = b.build();
        let centre = vertex(&g, 0.0, 0.0);
        assert_eq!(g.out_degree(centre), 4);
        assert_eq!(g.chain_count(), 4);
    }

    #[test]
    fn joined_lines_keep_their_endpoints() {
        // Two features meeting end to end: the joint has degree 2 but is a
        // line end, so it stays a vertex.
        let mut b = TrailGraphBuilder::new(Projection::Planar);
        b.add_line(&[p(0.0, 0.0), p(1.0, 0.0)]);
        b.add_line(&[p(1.0, 0.0), p(2.0, 0.0)]);
        let g = b.build();
        assert!(g.find_vertex(p(1.0, 0.0)).is_some());
        assert_eq!(g.chain_count(), 2);
    }

    #[test]
    fn closed_ring_is_one_self_loop() {
        let mut b = TrailGraphBuilder::new(Projection::Planar);
        b.add_line(&[p(0.0, 0.0), p(3.0, 0.0), p(3.0, 4.0), p(0.0, 0.0)]);
        let g = b.build();
        assert_eq!(g.vertex_count(), 1);
        assert_eq!(g.chain_count(), 1);
        assert_eq!(g.edge_length[0], 12.0);
    }

    #[test]
    fn duplicate_segments_collapse() {
        let mut b = TrailGraphBuilder::new(Projection::Planar);
        b.add_line(&[p(0.0, 0.0), p(5.0, 0.0)]);
        b.add_line(&[p(5.0, 0.0), p(0.0, 0.0)]);
        let g = b.build();
        assert_eq!(g.chain_count(), 1);
    }

    #[test]
    fn repeated_coordinates_are_skipped() {
        let mut b = TrailGraphBuilder::new(Projection::Planar);
        b.add_line(&[p(0.0, 0.0), p(0.0, 0.0), p(0.0, 2.0)]);
        b.add_line(&[p(7.0, 7.0), p(7.0, 7.0)]);
        let g = b.build();
        assert_eq!(g.chain_count(), 1);
        // The collapsed line is an isolated vertex.
        let lonely = vertex(&g, 7.0, 7.0);
        assert_eq!(g.out_degree(lonely), 0);
    }

    #[test]
    fn exact_keying_keeps_near_duplicates_apart() {
        let mut b = TrailGraphBuilder::new(Projection::Planar);
        b.add_line(&[p(0.0, 0.0), p(1.0, 0.0)]);
        b.add_line(&[p(1.000_000_001, 0.0), p(2.0, 0.0)]);
        let g = b.build();
        assert_eq!(g.vertex_count(), 4);
    }

    #[test]
    fn grid_keying_merges_near_duplicates() {
        let mut b = TrailGraphBuilder::with_keying(
            Projection::Planar,
            VertexKeying::Grid { precision: 1e-5 },
        );
        b.add_line(&[p(0.0, 0.0), p(1.0, 0.0)]);
        b.add_line(&[p(1.000_000_001, 0.0), p(2.0, 0.0)]);
        let g = b.build();
        assert_eq!(g.vertex_count(), 3);
        // First-seen coordinate wins.
        assert_eq!(g.vertex_geo(vertex(&g, 1.0, 0.0)), GeoPoint::new(1.0, 0.0));
    }

    #[test]
    fn build_is_deterministic() {
        let a = l_network();
        let b = l_network();
        assert_eq!(a.vertex_point, b.vertex_point);
        assert_eq!(a.edge_from, b.edge_from);
        assert_eq!(a.edge_to, b.edge_to);
        assert_eq!(a.chains, b.chains);
    }

    #[test]
    fn every_point_is_indexed() {
        let mut b = TrailGraphBuilder::new(Projection::Planar);
        b.add_line(&[p(0.0, 0.0), p(0.0, 5.0), p(0.0, 10.0), p(10.0, 10.0)]);
        b.add_line(&[p(0.0, 10.0), p(-4.0, 13.0)]);
        let g = b.build();
        assert_eq!(g.index().len(), g.point_count());
        for (i, &pos) in g.point_proj.iter().enumerate() {
            let id = PointId::from_index(i);
            assert_eq!(g.nearest_point(pos), Some(id));
        }
    }

    #[test]
    fn interior_points_have_a_chain_slot() {
        let mut b = TrailGraphBuilder::new(Projection::Planar);
        b.add_line(&[p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(3.0, 0.0), p(4.0, 0.0)]);
        let g = b.build();
        let (start, end) = (vertex(&g, 0.0, 0.0), vertex(&g, 4.0, 0.0));

        assert_eq!(g.chain_ends(0), (start, end));
        assert_eq!(g.chain_measure(0), &[0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(
            g.placement(point(&g, 2.0, 0.0)),
            Some(PointPlacement::Interior { chain: 0, position: 2 })
        );
        assert_eq!(g.placement(point(&g, 4.0, 0.0)), Some(PointPlacement::Vertex(end)));
        assert_eq!(g.anchor_vertex(point(&g, 3.0, 0.0)), Some(start));
        assert_eq!(g.placement(PointId(99)), None);
        assert!(!g.contains_point(PointId(99)));
    }
}

// ── Coordinate index ──────────────────────────────────────────────────────────

#[cfg(test)]
mod index {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use tn_core::{PointId, ProjectedPoint};
    use crate::CoordinateIndex;

    #[test]
    fn empty_index_returns_none() {
        let idx = CoordinateIndex::build(std::iter::empty::<(ProjectedPoint, PointId)>());
        assert!(idx.is_empty());
        assert!(idx.nearest(ProjectedPoint::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn nearest_matches_linear_scan() {
        let mut rng = SmallRng::seed_from_u64(7);
        let pts: Vec<ProjectedPoint> = (0..500)
            .map(|_| ProjectedPoint::new(rng.gen_range(0.0..1_000.0), rng.gen_range(0.0..1_000.0)))
            .collect();
        let idx = CoordinateIndex::build(pts.iter().enumerate().map(|(i, &p)| (p, PointId::from_index(i))));

        for _ in 0..200 {
            let q = ProjectedPoint::new(rng.gen_range(-100.0..1_100.0), rng.gen_range(-100.0..1_100.0));
            let hit = idx.nearest(q).unwrap();
            let best = pts.iter().map(|p| p.distance_2(q)).fold(f64::INFINITY, f64::min);
            assert_eq!(hit.pos.distance_2(q), best);
        }
    }

    #[test]
    fn k_nearest_order() {
        let idx = CoordinateIndex::build([
            (ProjectedPoint::new(0.0, 0.0), PointId(0)),
            (ProjectedPoint::new(5.0, 0.0), PointId(1)),
            (ProjectedPoint::new(1.0, 0.0), PointId(2)),
        ]);
        let ids: Vec<_> = idx.k_nearest(ProjectedPoint::new(0.0, 0.0), 3).iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![PointId(0), PointId(2), PointId(1)]);
    }
}

// ── Dijkstra routing ──────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use tn_core::{GeoPoint, PointId, Projection, VertexId};
    use crate::{DijkstraRouter, Router, SpatialError, SpatialResult, TrailGraph, TrailGraphBuilder, TrailPath};
    use super::helpers::{l_network, p, point, vertex};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    /// Geometry length agrees with the reported weight.
    fn assert_consistent(g: &TrailGraph, path: &TrailPath) {
        let pts = path.projected(g);
        let len: f64 = pts.windows(2).map(|w| w[0].distance(w[1])).sum();
        assert!(close(len, path.weight), "geometry {len} vs weight {}", path.weight);
        assert_eq!(path.points.first(), Some(&path.from));
        assert_eq!(path.points.last(), Some(&path.to));
    }

    /// Routes vertex pairs with Dijkstra and leaves chain interiors to the
    /// provided `point_path`.
    struct VertexOnly;

    impl Router for VertexOnly {
        fn shortest_path(
            &self,
            graph: &TrailGraph,
            from: VertexId,
            to: VertexId,
        ) -> SpatialResult<Option<TrailPath>> {
            DijkstraRouter.shortest_path(graph, from, to)
        }
    }

    fn random_network(rng: &mut SmallRng) -> TrailGraph {
        let coords: Vec<GeoPoint> = (0..12)
            .map(|_| p(rng.gen_range(0..20) as f64, rng.gen_range(0..20) as f64))
            .collect();
        let mut b = TrailGraphBuilder::new(Projection::Planar);
        for _ in 0..14 {
            let len = rng.gen_range(2..5);
            let line: Vec<GeoPoint> = (0..len).map(|_| coords[rng.gen_range(0..coords.len())]).collect();
            b.add_line(&line);
        }
        b.build()
    }

    /// All-pairs shortest distances, Floyd–Warshall over `d`.
    fn floyd_warshall(d: &mut [Vec<f64>]) {
        let n = d.len();
        for k in 0..n {
            for i in 0..n {
                for j in 0..n {
                    let via = d[i][k] + d[k][j];
                    if via < d[i][j] {
                        d[i][j] = via;
                    }
                }
            }
        }
    }

    #[test]
    fn l_route_goes_through_the_corner() {
        let g = l_network();
        let (a, c) = (vertex(&g, 0.0, 0.0), vertex(&g, 10.0, 10.0));
        let path = DijkstraRouter.shortest_path(&g, a, c).unwrap().unwrap();
        assert_eq!(path.weight, 20.0);
        assert_eq!(path.edges.len(), 2);
        assert_eq!(
            path.geographic(&g),
            vec![p(0.0, 0.0), p(0.0, 10.0), p(10.0, 10.0)]
        );
    }

    #[test]
    fn reverse_route_reverses_geometry() {
        let g = l_network();
        let (a, c) = (vertex(&g, 0.0, 0.0), vertex(&g, 10.0, 10.0));
        let fwd = DijkstraRouter.shortest_path(&g, a, c).unwrap().unwrap();
        let back = DijkstraRouter.shortest_path(&g, c, a).unwrap().unwrap();
        let mut rev = fwd.points.clone();
        rev.reverse();
        assert_eq!(back.points, rev);
        assert_eq!(back.weight, fwd.weight);
    }

    #[test]
    fn disconnected_islands_yield_none() {
        let g = l_network();
        let a = vertex(&g, 0.0, 0.0);
        let d = vertex(&g, 100.0, 100.0);
        assert_eq!(DijkstraRouter.shortest_path(&g, a, d), Ok(None));
    }

    #[test]
    fn trivial_same_vertex() {
        let g = l_network();
        let b = vertex(&g, 0.0, 10.0);
        let path = DijkstraRouter.shortest_path(&g, b, b).unwrap().unwrap();
        assert!(path.is_trivial());
        assert_eq!(path.weight, 0.0);
        assert_eq!(path.geographic(&g), vec![p(0.0, 10.0)]);
    }

    #[test]
    fn unknown_vertex_is_an_error() {
        let g = l_network();
        let a = vertex(&g, 0.0, 0.0);
        assert_eq!(
            DijkstraRouter.shortest_path(&g, a, VertexId(99)),
            Err(SpatialError::VertexNotFound(VertexId(99)))
        );
    }

    #[test]
    fn interior_points_are_kept_in_geometry() {
        let mut b = TrailGraphBuilder::new(Projection::Planar);
        b.add_line(&[p(0.0, 0.0), p(3.0, 4.0), p(6.0, 0.0)]);
        let g = b.build();
        let path = DijkstraRouter
            .shortest_path(&g, vertex(&g, 6.0, 0.0), vertex(&g, 0.0, 0.0))
            .unwrap()
            .unwrap();
        assert_eq!(path.weight, 10.0);
        assert_eq!(path.geographic(&g), vec![p(6.0, 0.0), p(3.0, 4.0), p(0.0, 0.0)]);
    }

    #[test]
    fn prefers_shorter_of_parallel_chains() {
        // Two chains between (0,0) and (10,0): straight (10) and a detour (~14.1).
        let mut b = TrailGraphBuilder::new(Projection::Planar);
        b.add_line(&[p(0.0, 0.0), p(10.0, 0.0)]);
        b.add_line(&[p(0.0, 0.0), p(5.0, 5.0), p(10.0, 0.0)]);
        let g = b.build();
        let path = DijkstraRouter
            .shortest_path(&g, vertex(&g, 0.0, 0.0), vertex(&g, 10.0, 0.0))
            .unwrap()
            .unwrap();
        assert_eq!(path.weight, 10.0);
        assert_eq!(path.points.len(), 2);
    }

    #[test]
    fn repeated_queries_agree() {
        // Square: two equal-weight routes between opposite corners.
        let mut b = TrailGraphBuilder::new(Projection::Planar);
        b.add_line(&[p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)]);
        b.add_line(&[p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0)]);
        let g = b.build();
        let (s, t) = (vertex(&g, 0.0, 0.0), vertex(&g, 1.0, 1.0));
        let first = DijkstraRouter.shortest_path(&g, s, t).unwrap();
        for _ in 0..10 {
            assert_eq!(DijkstraRouter.shortest_path(&g, s, t).unwrap(), first);
        }
    }

    #[test]
    fn unknown_point_is_an_error() {
        let g = l_network();
        let a = point(&g, 0.0, 0.0);
        assert_eq!(
            DijkstraRouter.point_path(&g, PointId(99), a),
            Err(SpatialError::PointNotFound(PointId(99)))
        );
    }

    #[test]
    fn start_inside_a_chain_uses_the_partial_length() {
        let mut b = TrailGraphBuilder::new(Projection::Planar);
        b.add_line(&[p(0.0, 0.0), p(0.0, 5.0), p(0.0, 10.0)]);
        b.add_line(&[p(0.0, 10.0), p(10.0, 10.0)]);
        let g = b.build();
        let (mid, c) = (point(&g, 0.0, 5.0), point(&g, 10.0, 10.0));

        let path = DijkstraRouter.point_path(&g, mid, c).unwrap().unwrap();
        assert_eq!(path.weight, 15.0);
        assert_eq!(path.geographic(&g), vec![p(0.0, 5.0), p(0.0, 10.0), p(10.0, 10.0)]);
        assert_eq!(path.edges.len(), 1);

        let back = DijkstraRouter.point_path(&g, c, mid).unwrap().unwrap();
        assert_eq!(back.weight, 15.0);
        assert_eq!(back.geographic(&g), vec![p(10.0, 10.0), p(0.0, 10.0), p(0.0, 5.0)]);
    }

    #[test]
    fn two_points_on_one_chain_walk_between_them() {
        let mut b = TrailGraphBuilder::new(Projection::Planar);
        b.add_line(&[p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(3.0, 0.0), p(4.0, 0.0)]);
        let g = b.build();
        let (from, to) = (point(&g, 3.0, 0.0), point(&g, 1.0, 0.0));

        let path = DijkstraRouter.point_path(&g, from, to).unwrap().unwrap();
        assert_eq!(path.weight, 2.0);
        assert!(path.edges.is_empty());
        assert!(!path.is_trivial());
        assert_eq!(path.geographic(&g), vec![p(3.0, 0.0), p(2.0, 0.0), p(1.0, 0.0)]);
    }

    #[test]
    fn same_point_is_trivial() {
        let mut b = TrailGraphBuilder::new(Projection::Planar);
        b.add_line(&[p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)]);
        let g = b.build();
        let mid = point(&g, 1.0, 0.0);
        let path = DijkstraRouter.point_path(&g, mid, mid).unwrap().unwrap();
        assert!(path.is_trivial());
        assert_eq!(path.weight, 0.0);
    }

    #[test]
    fn ring_interiors_may_go_round_the_junction() {
        // A single-vertex ring: (1,0) and (0,1) are 2 apart through the
        // origin but ~21 apart along the ring's interior.
        let mut b = TrailGraphBuilder::new(Projection::Planar);
        b.add_line(&[p(0.0, 0.0), p(1.0, 0.0), p(5.0, 10.0), p(0.0, 1.0), p(0.0, 0.0)]);
        let g = b.build();
        let (from, to) = (point(&g, 1.0, 0.0), point(&g, 0.0, 1.0));

        let path = DijkstraRouter.point_path(&g, from, to).unwrap().unwrap();
        assert!(close(path.weight, 2.0), "{}", path.weight);
        assert_eq!(path.geographic(&g), vec![p(1.0, 0.0), p(0.0, 0.0), p(0.0, 1.0)]);
        assert_consistent(&g, &path);
    }

    #[test]
    fn interior_endpoint_on_another_island_is_unroutable() {
        let mut b = TrailGraphBuilder::new(Projection::Planar);
        b.add_line(&[p(0.0, 0.0), p(0.0, 5.0), p(0.0, 10.0)]);
        b.add_line(&[p(50.0, 0.0), p(50.0, 5.0), p(50.0, 10.0)]);
        let g = b.build();
        let (a, b) = (point(&g, 0.0, 5.0), point(&g, 50.0, 5.0));
        assert_eq!(DijkstraRouter.point_path(&g, a, b), Ok(None));
        assert_eq!(VertexOnly.point_path(&g, a, b), Ok(None));
    }

    /// Compare point-to-point routes against Floyd–Warshall over the
    /// uncompacted segment graph.
    #[test]
    fn point_paths_optimal_against_brute_force() {
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..20 {
            let g = random_network(&mut rng);
            let n = g.point_count();

            let mut d = vec![vec![f64::INFINITY; n]; n];
            for (i, row) in d.iter_mut().enumerate() {
                row[i] = 0.0;
            }
            for chain in &g.chains {
                for w in chain.windows(2) {
                    let (a, b) = (w[0].index(), w[1].index());
                    let len = g.point_proj[a].distance(g.point_proj[b]);
                    d[a][b] = d[a][b].min(len);
                    d[b][a] = d[b][a].min(len);
                }
            }
            floyd_warshall(&mut d);

            for i in 0..n {
                for j in 0..n {
                    let (from, to) = (PointId::from_index(i), PointId::from_index(j));
                    let got = DijkstraRouter.point_path(&g, from, to).unwrap();
                    let fallback = VertexOnly.point_path(&g, from, to).unwrap();
                    match got {
                        None => {
                            assert!(d[i][j].is_infinite(), "missed route {i}->{j}");
                            assert!(fallback.is_none());
                        }
                        Some(path) => {
                            assert!(close(path.weight, d[i][j]), "{i}->{j}: {} vs {}", path.weight, d[i][j]);
                            assert_consistent(&g, &path);
                            let fallback = fallback.expect("provided point_path finds it too");
                            assert!(close(fallback.weight, path.weight));
                            assert_consistent(&g, &fallback);
                        }
                    }
                }
            }
        }
    }

    /// Compare against Floyd–Warshall on random small networks.
    #[test]
    fn optimal_against_brute_force() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..20 {
            let g = random_network(&mut rng);
            let n = g.vertex_count();

            let mut d = vec![vec![f64::INFINITY; n]; n];
            for (v, row) in d.iter_mut().enumerate() {
                row[v] = 0.0;
            }
            for e in 0..g.edge_count() {
                let (u, v) = (g.edge_from[e].index(), g.edge_to[e].index());
                d[u][v] = d[u][v].min(g.edge_length[e]);
            }
            floyd_warshall(&mut d);

            for i in 0..n {
                for j in 0..n {
                    let got = DijkstraRouter
                        .shortest_path(&g, VertexId::from_index(i), VertexId::from_index(j))
                        .unwrap();
                    match got {
                        None => assert!(d[i][j].is_infinite(), "missed route {i}->{j}"),
                        Some(path) => {
                            assert!(close(path.weight, d[i][j]), "{i}->{j}: {} vs {}", path.weight, d[i][j]);
                            assert_consistent(&g, &path);
                        }
                    }
                }
            }
        }
    }
}

// ── Islands ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod islands {
    use tn_core::IslandId;
    use crate::Islands;
    use super::helpers::{l_network, vertex};

    #[test]
    fn l_network_has_two_islands() {
        let g = l_network();
        let islands = Islands::compute(&g);
        assert_eq!(islands.count(), 2);
        let (a, c, d) = (vertex(&g, 0.0, 0.0), vertex(&g, 10.0, 10.0), vertex(&g, 100.0, 100.0));
        assert!(islands.same_island(a, c));
        assert!(!islands.same_island(a, d));
        assert_eq!(islands.largest(), islands.island_of(a));
        assert_eq!(islands.size(islands.island_of(d).unwrap()), 2);
        assert_eq!(islands.size(IslandId(9)), 0);
    }
}
