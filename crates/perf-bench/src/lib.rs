// ----------------------------
// Benchmark inputs
// ----------------------------

use common::types::{Cost, VertexId};
use cost_graph_core::{DirectedGraph, GraphStore};

/// Vertex count for the Held-Karp run; the DP table grows as `2^n · n`.
pub const TSP_VERTICES: usize = 16;

/// Vertex count for the Bellman-Ford run.
pub const WALK_VERTICES: usize = 400;

/// Out-degree of every vertex in the Bellman-Ford graph.
pub const WALK_OUT_DEGREE: usize = 8;

/// Deterministic pseudo-random cost in `1..=modulus`, varied by edge so the
/// compiler cannot fold the workload.
fn cost_for(u: usize, v: usize, modulus: Cost) -> Cost {
    let mixed = (u as u64)
        .wrapping_mul(2_654_435_761)
        .wrapping_add((v as u64).wrapping_mul(40_503))
        .rotate_left(13);
    (mixed % modulus as u64) as Cost + 1
}

/// Complete digraph on `n` vertices, every ordered pair costed.
pub fn complete_digraph(n: usize) -> DirectedGraph {
    let mut graph = DirectedGraph::new();
    for u in 0..n {
        for v in 0..n {
            if u != v {
                add_costed(&mut graph, u, v, cost_for(u, v, 100));
            }
        }
    }
    graph
}

/// Ring-like digraph where vertex `u` reaches the next `out_degree` vertices.
/// Longer hops cost more, so cheap walks take many short steps.
pub fn ring_digraph(n: usize, out_degree: usize) -> DirectedGraph {
    let mut graph = DirectedGraph::new();
    for u in 0..n {
        for step in 1..=out_degree.min(n.saturating_sub(1)) {
            let v = (u + step) % n;
            let cost = cost_for(u, v, 20) + step as Cost * 4;
            add_costed(&mut graph, u, v, cost);
        }
    }
    graph
}

fn add_costed(graph: &mut DirectedGraph, u: usize, v: usize, cost: Cost) {
    let (s, t) = (u as VertexId, v as VertexId);
    if graph.add_edge(s, t).is_ok() {
        let _ = graph.modify_cost(s, t, cost);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_digraph_has_every_ordered_pair() {
        let graph = complete_digraph(5);
        assert_eq!(graph.vertex_count(), 5);
        assert_eq!(graph.edge_count(), 20);
        assert!(graph.costs().all(|(_, c)| (1..=100).contains(&c)));
    }

    #[test]
    fn ring_digraph_degrees() {
        let graph = ring_digraph(10, 3);
        assert_eq!(graph.edge_count(), 30);
        assert_eq!(graph.degree(0).unwrap(), (3, 3));
    }
}
