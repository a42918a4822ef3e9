use super::csr::GraphCSR;
use super::directed::DirectedGraph;
use super::traits::ShortestWalkSolver;
use common::{
    cost,
    error::Error,
    types::{Cost, VertexId, Walk},
};
use tracing::{debug, trace};

/// Lowest-cost walk solver using length-indexed Bellman-Ford relaxation.
///
/// For every walk length `k` in `0..n` (n = vertex count) it computes the
/// cheapest walk from the source that uses exactly `k` edges. Only the source
/// has a finite length-0 cost; there is no row before length 0. One extra
/// relaxation round past length `n-1` detects negative cycles reachable from
/// the source.
///
/// Costs `O(n · (n + m))` time and `O(n²)` memory for the predecessor table.
pub struct BellmanFordSolver;

impl BellmanFordSolver {
    /// Rebuilds the walk by following per-length predecessor edges back from `target`.
    ///
    /// `pred_edge_idx[k][v]` is the CSR edge that reached `v` with a walk of
    /// exactly `k` edges. Walking `length` steps back from the target must
    /// land on the source, since only the source is finite at length 0.
    ///
    /// # Errors
    /// Returns `Error::NoPath` if the predecessor chain is broken.
    pub fn reconstruct_walk(
        &self,
        graph: &GraphCSR,
        pred_edge_idx: &[Vec<Option<usize>>],
        source: usize,
        target: usize,
        length: usize,
        total: Cost,
    ) -> Result<Walk, Error> {
        let broken = || Error::NoPath(graph.vertex_ids[source], graph.vertex_ids[target]);

        let mut vertices = Vec::with_capacity(length + 1);
        let mut current = target;
        vertices.push(graph.vertex_ids[current]);

        for k in (1..=length).rev() {
            let edge_idx = pred_edge_idx[k][current].ok_or_else(broken)?;
            current = graph.edge_source_by_index[edge_idx];
            vertices.push(graph.vertex_ids[current]);
        }

        if current != source {
            return Err(broken());
        }

        vertices.reverse();
        Ok(Walk {
            vertices,
            cost: total,
        })
    }

    /// One relaxation round: extends every finite walk in `previous` by one edge.
    ///
    /// Returns the next row and the edge that produced each of its entries.
    fn relax(
        graph: &GraphCSR,
        previous: &[Option<Cost>],
    ) -> Result<(Vec<Option<Cost>>, Vec<Option<usize>>), Error> {
        let n = graph.num_nodes;
        let mut next = vec![None; n];
        let mut pred = vec![None; n];

        for u in 0..n {
            if previous[u].is_none() {
                continue;
            }
            for i in graph.outbound_range(u) {
                let v = graph.edge_targets[i];
                let weight = graph.edge_costs[i].ok_or(Error::MissingCost(
                    graph.vertex_ids[u],
                    graph.vertex_ids[v],
                ))?;
                let candidate = cost::extend(previous[u], weight)?;
                if cost::improves(candidate, next[v]) {
                    next[v] = candidate;
                    pred[v] = Some(i);
                }
            }
        }

        Ok((next, pred))
    }
}

impl ShortestWalkSolver for BellmanFordSolver {
    /// Finds the cheapest walk of at most `n-1` edges from `source` to `target`.
    ///
    /// # Returns
    /// - `Ok(walk)` → vertices in source → target order and the total cost.
    /// - `Err(Error::NegativeCycleDetected)` → a negative cycle is reachable from `source`.
    /// - `Err(Error::NoPath(..))` → `target` is unreachable.
    /// - `Err(Error::MissingCost(..))` → a reachable edge has no recorded cost.
    /// - `Err(Error::VertexNotFound(..))` → an endpoint is not in the graph.
    fn lowest_cost_walk(
        &self,
        graph: &DirectedGraph,
        source: VertexId,
        target: VertexId,
    ) -> Result<Walk, Error> {
        let csr = GraphCSR::from_directed(graph);
        let s = csr.index_of(source)?;
        let t = csr.index_of(target)?;

        if s == t {
            return Ok(Walk::trivial(source));
        }

        let n = csr.num_nodes;
        debug!(
            vertices = n,
            edges = csr.edge_targets.len(),
            source,
            target,
            "Starting lowest cost walk search"
        );

        // Length 0: only the source is reachable.
        let mut row = vec![None; n];
        row[s] = Some(0);

        let mut best = row.clone();
        let mut best_len = vec![0usize; n];
        let mut pred_edge_idx: Vec<Vec<Option<usize>>> = vec![vec![None; n]];

        for k in 1..n {
            let (next, pred) = Self::relax(&csr, &row)?;
            for v in 0..n {
                if cost::improves(next[v], best[v]) {
                    best[v] = next[v];
                    best_len[v] = k;
                }
            }
            pred_edge_idx.push(pred);
            row = next;

            trace!(length = k, "Relaxation round complete");
            if row.iter().all(Option::is_none) {
                // No walk of length k exists, so none of any greater length does.
                break;
            }
        }

        // One more round: any improvement over the best walk of at most n-1
        // edges means the costs keep dropping, i.e. a reachable negative cycle.
        if pred_edge_idx.len() == n {
            let (extra, _) = Self::relax(&csr, &row)?;
            if (0..n).any(|v| cost::improves(extra[v], best[v])) {
                debug!(source, "Negative cycle reachable from source");
                return Err(Error::NegativeCycleDetected);
            }
        }

        let total = best[t].ok_or(Error::NoPath(source, target))?;
        let walk = self.reconstruct_walk(&csr, &pred_edge_idx, s, t, best_len[t], total)?;

        debug!(cost = walk.cost, edges = walk.len(), "Lowest cost walk found");
        Ok(walk)
    }
}

#[cfg(test)]
mod bellman_ford_tests {
    use super::*;
    use crate::traits::GraphStore;

    fn build_graph(edges: &[(VertexId, VertexId, Cost)]) -> DirectedGraph {
        let mut g = DirectedGraph::new();
        for &(s, t, c) in edges {
            g.add_edge(s, t).unwrap();
            g.modify_cost(s, t, c).unwrap();
        }
        g
    }

    #[test]
    fn source_equals_target_is_trivial() {
        let g = build_graph(&[(1, 2, 3)]);
        let walk = BellmanFordSolver.lowest_cost_walk(&g, 2, 2).unwrap();
        assert_eq!(walk, Walk::trivial(2));
    }

    #[test]
    fn source_equals_target_skips_cycle_detection() {
        let g = build_graph(&[(1, 2, -1), (2, 1, -1)]);
        let walk = BellmanFordSolver.lowest_cost_walk(&g, 1, 1).unwrap();
        assert_eq!(walk.cost, 0);
    }

    #[test]
    fn prefers_cheaper_longer_walk() {
        let g = build_graph(&[(1, 4, 10), (1, 2, 1), (2, 3, 1), (3, 4, 1)]);
        let walk = BellmanFordSolver.lowest_cost_walk(&g, 1, 4).unwrap();
        assert_eq!(walk.vertices, vec![1, 2, 3, 4]);
        assert_eq!(walk.cost, 3);
    }

    #[test]
    fn negative_edges_without_negative_cycle() {
        let g = build_graph(&[(1, 2, 4), (1, 3, 2), (3, 2, -3), (2, 4, 1)]);
        let walk = BellmanFordSolver.lowest_cost_walk(&g, 1, 4).unwrap();
        assert_eq!(walk.vertices, vec![1, 3, 2, 4]);
        assert_eq!(walk.cost, 0);
    }

    #[test]
    fn detects_negative_triangle() {
        let g = build_graph(&[(1, 2, -1), (2, 3, -1), (3, 1, -1)]);
        let result = BellmanFordSolver.lowest_cost_walk(&g, 1, 3);
        assert_eq!(result, Err(Error::NegativeCycleDetected));
    }

    #[test]
    fn negative_self_loop_is_a_negative_cycle() {
        let g = build_graph(&[(1, 2, 1), (2, 2, -1), (2, 3, 1)]);
        let result = BellmanFordSolver.lowest_cost_walk(&g, 1, 3);
        assert_eq!(result, Err(Error::NegativeCycleDetected));
    }

    #[test]
    fn unreachable_negative_cycle_is_ignored() {
        let g = build_graph(&[(1, 2, 5), (3, 4, -2), (4, 3, -2)]);
        let walk = BellmanFordSolver.lowest_cost_walk(&g, 1, 2).unwrap();
        assert_eq!(walk.cost, 5);
    }

    #[test]
    fn zero_cost_cycle_is_not_negative() {
        let g = build_graph(&[(1, 2, 2), (2, 1, -2), (2, 3, 1)]);
        let walk = BellmanFordSolver.lowest_cost_walk(&g, 1, 3).unwrap();
        assert_eq!(walk.vertices, vec![1, 2, 3]);
        assert_eq!(walk.cost, 3);
    }

    #[test]
    fn unreachable_target_is_no_path() {
        let mut g = build_graph(&[(1, 2, 1)]);
        g.add_vertex(3).unwrap();
        assert_eq!(
            BellmanFordSolver.lowest_cost_walk(&g, 1, 3),
            Err(Error::NoPath(1, 3))
        );
        assert_eq!(
            BellmanFordSolver.lowest_cost_walk(&g, 2, 1),
            Err(Error::NoPath(2, 1))
        );
    }

    #[test]
    fn absent_endpoint_is_reported() {
        let g = build_graph(&[(1, 2, 1)]);
        assert_eq!(
            BellmanFordSolver.lowest_cost_walk(&g, 1, 9),
            Err(Error::VertexNotFound(9))
        );
    }

    #[test]
    fn reachable_uncosted_edge_is_rejected() {
        let mut g = build_graph(&[(1, 2, 1)]);
        g.add_edge(2, 3).unwrap();
        assert_eq!(
            BellmanFordSolver.lowest_cost_walk(&g, 1, 3),
            Err(Error::MissingCost(2, 3))
        );
    }

    #[test]
    fn unreachable_uncosted_edge_is_harmless() {
        let mut g = build_graph(&[(1, 2, 1)]);
        g.add_edge(3, 4).unwrap();
        let walk = BellmanFordSolver.lowest_cost_walk(&g, 1, 2).unwrap();
        assert_eq!(walk.cost, 1);
    }

    #[test]
    fn vertex_ids_need_not_be_dense() {
        let g = build_graph(&[(-40, 1000, 3), (1000, 7, -1)]);
        let walk = BellmanFordSolver.lowest_cost_walk(&g, -40, 7).unwrap();
        assert_eq!(walk.vertices, vec![-40, 1000, 7]);
        assert_eq!(walk.cost, 2);
    }

    #[test]
    fn walk_cost_matches_its_edges() {
        let g = build_graph(&[
            (0, 1, 4),
            (0, 2, 1),
            (2, 1, 2),
            (1, 3, 1),
            (2, 3, 5),
            (3, 4, 3),
        ]);
        let walk = BellmanFordSolver.lowest_cost_walk(&g, 0, 4).unwrap();
        let summed: Cost = walk
            .edges()
            .iter()
            .map(|&(s, t)| g.get_cost(s, t).unwrap())
            .sum();
        assert_eq!(summed, walk.cost);
        assert_eq!(walk.cost, 7);
    }

    #[test]
    fn large_linear_graph() {
        let n = 300;
        let edges: Vec<(VertexId, VertexId, Cost)> = (0..n - 1).map(|i| (i, i + 1, 1)).collect();
        let g = build_graph(&edges);
        let walk = BellmanFordSolver.lowest_cost_walk(&g, 0, n - 1).unwrap();
        assert_eq!(walk.cost, n - 1);
        assert_eq!(walk.vertices.len(), n as usize);
    }

    #[test]
    fn large_circular_graph_with_negative_cycle() {
        let n = 200;
        let edges: Vec<(VertexId, VertexId, Cost)> =
            (0..n).map(|i| (i, (i + 1) % n, if i == 0 { -n } else { 1 })).collect();
        let g = build_graph(&edges);
        assert_eq!(
            BellmanFordSolver.lowest_cost_walk(&g, 5, 6),
            Err(Error::NegativeCycleDetected)
        );
    }
}
