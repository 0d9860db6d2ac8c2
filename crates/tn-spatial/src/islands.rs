//! Connected-component labelling.
//!
//! The source data is known to contain islands: clusters of trail with no
//! connection to the rest.  Labelling them once at load time lets the
//! façade answer "is there a route?" without searching, and lets the
//! network checker report them.

use std::collections::VecDeque;

use tn_core::{IslandId, VertexId};

use crate::graph::TrailGraph;

/// Island label of every vertex.  Islands are numbered in order of their
/// lowest vertex id.
#[derive(Debug, Clone)]
pub struct Islands {
    labels: Vec<IslandId>,
    sizes: Vec<usize>,
}

impl Islands {
    /// Breadth-first labelling over the CSR adjacency, O(V + E).
    pub fn compute(graph: &TrailGraph) -> Self {
        let n = graph.vertex_count();
        let mut labels = vec![IslandId::INVALID; n];
        let mut sizes = Vec::new();
        let mut queue = VecDeque::new();

        for seed in 0..n {
            if labels[seed] != IslandId::INVALID {
                continue;
            }
            let island = IslandId::from_index(sizes.len());
            labels[seed] = island;
            queue.push_back(VertexId::from_index(seed));
            let mut size = 0;

            while let Some(v) = queue.pop_front() {
                size += 1;
                for e in graph.out_edges(v) {
                    let w = graph.edge_to[e.index()];
                    if labels[w.index()] == IslandId::INVALID {
                        labels[w.index()] = island;
                        queue.push_back(w);
                    }
                }
            }
            sizes.push(size);
        }

        Self { labels, sizes }
    }

    /// Number of islands.
    pub fn count(&self) -> usize {
        self.sizes.len()
    }

    pub fn island_of(&self, v: VertexId) -> Option<IslandId> {
        self.labels.get(v.index()).copied()
    }

    /// `true` if both vertices exist and share an island.
    pub fn same_island(&self, a: VertexId, b: VertexId) -> bool {
        matches!((self.island_of(a), self.island_of(b)), (Some(x), Some(y)) if x == y)
    }

    /// Vertex count of an island.
    pub fn size(&self, island: IslandId) -> usize {
        self.sizes.get(island.index()).copied().unwrap_or(0)
    }

    /// The island with the most vertices (lowest id on ties).
    pub fn largest(&self) -> Option<IslandId> {
        self.sizes
            .iter()
            .enumerate()
            .max_by(|(ia, a), (ib, b)| a.cmp(b).then(ib.cmp(ia)))
            .map(|(i, _)| IslandId::from_index(i))
    }
}
