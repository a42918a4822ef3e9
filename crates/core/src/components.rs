use std::collections::HashSet;

use super::traits::{ComponentFinder, GraphStore};
use super::undirected::UndirectedGraph;
use common::types::{Component, VertexId};

/// Connected components via iterative depth-first search.
///
/// Vertices are visited in store order; every unvisited vertex starts a new
/// traversal, and everything that traversal discovers forms one component,
/// listed in discovery (pre-)order. An explicit stack replaces recursion so
/// long chains cannot exhaust the call stack.
pub struct DepthFirstComponents;

impl DepthFirstComponents {
    fn traverse(
        graph: &UndirectedGraph,
        start: VertexId,
        visited: &mut HashSet<VertexId>,
    ) -> Component {
        let mut component = Vec::new();
        let mut stack = vec![start];

        while let Some(vertex) = stack.pop() {
            if !visited.insert(vertex) {
                continue;
            }
            component.push(vertex);

            // Pushed in reverse so the first neighbour is explored first,
            // matching the recursive visiting order.
            let neighbours = graph.neighbours(vertex).unwrap_or_default();
            stack.extend(
                neighbours
                    .iter()
                    .rev()
                    .copied()
                    .filter(|n| !visited.contains(n)),
            );
        }

        component
    }
}

impl ComponentFinder for DepthFirstComponents {
    fn components(&self, graph: &UndirectedGraph) -> Vec<Component> {
        let mut visited = HashSet::with_capacity(graph.vertex_count());
        let mut components = Vec::new();

        for &vertex in graph.vertices() {
            if !visited.contains(&vertex) {
                components.push(Self::traverse(graph, vertex, &mut visited));
            }
        }

        tracing::debug!(count = components.len(), "Connected components found");
        components
    }
}
