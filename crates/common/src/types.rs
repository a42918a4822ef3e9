/// Opaque vertex identifier. Two vertices are equal iff their identifiers are equal.
pub type VertexId = i64;

/// Integer edge cost. Negative values are allowed.
pub type Cost = i64;

/// Type alias for a single edge: (source, target).
///
/// Directed graphs treat the pair as ordered. Undirected graphs consider
/// `(a, b)` and `(b, a)` the same edge and keep whichever orientation was
/// used to insert it.
pub type Edge = (VertexId, VertexId);

/// A lowest-cost walk from a source to a target.
///
/// Fields:
/// - `vertices`: The walk in source → target order. Vertices may repeat.
/// - `cost`: Sum of the edge costs along the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Walk {
    pub vertices: Vec<VertexId>,
    pub cost: Cost,
}

impl Walk {
    /// The zero-edge walk that starts and ends at `vertex`.
    pub fn trivial(vertex: VertexId) -> Self {
        Walk {
            vertices: vec![vertex],
            cost: 0,
        }
    }

    /// Number of edges traversed.
    pub fn len(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consecutive (source, target) pairs of the walk.
    pub fn edges(&self) -> Vec<Edge> {
        self.vertices.windows(2).map(|w| (w[0], w[1])).collect()
    }
}

/// A minimum-cost Hamiltonian cycle.
///
/// `tour` starts at the requested start vertex and lists every vertex of the
/// graph exactly once; the closing edge from the last vertex back to the
/// start is implied and included in `cost`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HamiltonianCycle {
    pub tour: Vec<VertexId>,
    pub cost: Cost,
}

impl HamiltonianCycle {
    /// All edges of the cycle, including the closing edge back to the start.
    pub fn edges(&self) -> Vec<Edge> {
        let n = self.tour.len();
        (0..n)
            .map(|i| (self.tour[i], self.tour[(i + 1) % n]))
            .collect()
    }
}

/// One edge selected into a spanning tree: `child` was attached through `parent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeEdge {
    pub child: VertexId,
    pub parent: VertexId,
    pub cost: Cost,
}

/// A spanning tree over the component reachable from `root`.
///
/// Fields:
/// - `root`: The vertex the tree was grown from.
/// - `edges`: Selected edges in the order they were attached.
/// - `total_cost`: Sum of the selected edge costs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanningTree {
    pub root: VertexId,
    pub edges: Vec<TreeEdge>,
    pub total_cost: Cost,
}

impl SpanningTree {
    /// Vertices covered by the tree, root first, in attachment order.
    pub fn vertices(&self) -> Vec<VertexId> {
        std::iter::once(self.root)
            .chain(self.edges.iter().map(|e| e.child))
            .collect()
    }

    pub fn vertex_count(&self) -> usize {
        self.edges.len() + 1
    }
}

/// Vertices of one connected component, in discovery order.
pub type Component = Vec<VertexId>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trivial_walk_has_no_edges() {
        let walk = Walk::trivial(4);
        assert_eq!(walk.vertices, vec![4]);
        assert_eq!(walk.cost, 0);
        assert!(walk.is_empty());
        assert!(walk.edges().is_empty());
    }

    #[test]
    fn walk_edges_follow_vertex_order() {
        let walk = Walk {
            vertices: vec![1, 2, 1, 3],
            cost: 5,
        };
        assert_eq!(walk.len(), 3);
        assert_eq!(walk.edges(), vec![(1, 2), (2, 1), (1, 3)]);
    }

    #[test]
    fn hamiltonian_cycle_edges_close_the_tour() {
        let cycle = HamiltonianCycle {
            tour: vec![0, 2, 1],
            cost: 9,
        };
        assert_eq!(cycle.edges(), vec![(0, 2), (2, 1), (1, 0)]);
    }

    #[test]
    fn spanning_tree_vertices_start_at_root() {
        let tree = SpanningTree {
            root: 7,
            edges: vec![
                TreeEdge { child: 3, parent: 7, cost: 1 },
                TreeEdge { child: 5, parent: 3, cost: 2 },
            ],
            total_cost: 3,
        };
        assert_eq!(tree.vertices(), vec![7, 3, 5]);
        assert_eq!(tree.vertex_count(), 3);
    }
}
