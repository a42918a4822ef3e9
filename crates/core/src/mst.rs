use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use super::components::DepthFirstComponents;
use super::traits::{ComponentFinder, GraphStore, SpanningTreeBuilder};
use super::undirected::UndirectedGraph;
use common::{
    error::Error,
    types::{Cost, SpanningTree, TreeEdge, VertexId},
};
use tracing::debug;

/// Minimum spanning tree builder using Prim's algorithm with a binary heap.
///
/// The tree grows from a root and only ever covers the component containing
/// it; on a disconnected graph the result is the minimum spanning tree of that
/// single component. Use [`PrimBuilder::build_spanning`] to reject such graphs
/// or [`PrimBuilder::spanning_forest`] to get one tree per component.
///
/// Edges without a recorded cost are never selected.
///
/// Runs in `O(E log V)`.
pub struct PrimBuilder;

impl PrimBuilder {
    /// Like [`SpanningTreeBuilder::build`], but fails with `Infeasible` unless
    /// the tree reaches every vertex of the graph.
    pub fn build_spanning(&self, graph: &UndirectedGraph) -> Result<SpanningTree, Error> {
        let tree = self.build(graph)?;
        if tree.vertex_count() != graph.vertex_count() {
            return Err(Error::Infeasible);
        }
        Ok(tree)
    }

    /// One minimum spanning tree per connected component, in component order.
    pub fn spanning_forest(&self, graph: &UndirectedGraph) -> Result<Vec<SpanningTree>, Error> {
        DepthFirstComponents
            .components(graph)
            .into_iter()
            .map(|component| self.build_from(graph, component[0]))
            .collect()
    }
}

impl SpanningTreeBuilder for PrimBuilder {
    fn build_from(&self, graph: &UndirectedGraph, root: VertexId) -> Result<SpanningTree, Error> {
        graph.find_vertex(root).ok_or(Error::VertexNotFound(root))?;

        let mut in_tree: HashSet<VertexId> = HashSet::new();
        let mut best: HashMap<VertexId, (Cost, VertexId)> = HashMap::new();
        let mut queue: BinaryHeap<Reverse<(Cost, VertexId)>> = BinaryHeap::new();
        let mut edges = Vec::new();
        let mut total_cost: Cost = 0;

        in_tree.insert(root);
        let mut frontier = root;

        loop {
            for &neighbour in graph.neighbours(frontier)? {
                if in_tree.contains(&neighbour) {
                    continue;
                }
                let Some(cost) = graph.get_cost(frontier, neighbour) else {
                    continue;
                };
                let cheaper = best.get(&neighbour).is_none_or(|&(known, _)| cost < known);
                if cheaper {
                    best.insert(neighbour, (cost, frontier));
                    queue.push(Reverse((cost, neighbour)));
                }
            }

            // Stale heap entries belong to vertices attached earlier through a cheaper edge.
            let next = loop {
                match queue.pop() {
                    Some(Reverse((_, vertex))) if in_tree.contains(&vertex) => continue,
                    other => break other,
                }
            };
            let Some(Reverse((cost, vertex))) = next else {
                break;
            };

            let (_, parent) = best[&vertex];
            in_tree.insert(vertex);
            edges.push(TreeEdge {
                child: vertex,
                parent,
                cost,
            });
            total_cost = total_cost.checked_add(cost).ok_or(Error::CostOverflow)?;
            frontier = vertex;
        }

        debug!(
            root,
            covered = edges.len() + 1,
            total_cost,
            "Minimum spanning tree built"
        );
        Ok(SpanningTree {
            root,
            edges,
            total_cost,
        })
    }
}
