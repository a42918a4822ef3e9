use super::directed::DirectedGraph;
use super::undirected::UndirectedGraph;
use common::{
    error::Error,
    types::{Component, Cost, Edge, HamiltonianCycle, SpanningTree, VertexId, Walk},
};

/// Contract shared by the directed and undirected stores.
///
/// Mutators are applied completely or not at all. Lookups return `None`
/// for absent elements; only mutators and per-vertex queries fail.
pub trait GraphStore: Clone {
    /// Fails with `VertexAlreadyExists` if `id` is already stored.
    fn add_vertex(&mut self, id: VertexId) -> Result<VertexId, Error>;

    /// Removes the vertex and every edge (and edge cost) incident to it.
    fn remove_vertex(&mut self, id: VertexId) -> Result<VertexId, Error>;

    /// Inserts an edge, creating missing endpoints. Fails with `EdgeAlreadyExists`
    /// if the pair is already connected.
    fn add_edge(&mut self, source: VertexId, target: VertexId) -> Result<Edge, Error>;

    /// Removes the edge and its recorded cost.
    fn remove_edge(&mut self, source: VertexId, target: VertexId) -> Result<Edge, Error>;

    fn find_vertex(&self, id: VertexId) -> Option<VertexId>;

    fn find_edge(&self, source: VertexId, target: VertexId) -> Option<Edge>;

    /// `None` both for an absent edge and for an edge without a cost;
    /// use [`GraphStore::find_edge`] to tell them apart.
    fn get_cost(&self, source: VertexId, target: VertexId) -> Option<Cost>;

    /// Inserts or overwrites the cost of an existing edge. Never creates the edge.
    fn modify_cost(
        &mut self,
        source: VertexId,
        target: VertexId,
        cost: Cost,
    ) -> Result<Cost, Error>;

    /// Vertices in insertion order. The borrow keeps the order stable while iterating.
    fn vertices(&self) -> &[VertexId];

    fn vertex_count(&self) -> usize {
        self.vertices().len()
    }

    fn edge_count(&self) -> usize;

    /// Every edge exactly once.
    fn edges(&self) -> Vec<Edge>;

    fn is_empty(&self) -> bool {
        self.vertices().is_empty()
    }
}

/// Lowest-cost walk between two vertices of a directed graph.
pub trait ShortestWalkSolver {
    /// Returns the cheapest walk from `source` to `target`.
    ///
    /// Fails with `NegativeCycleDetected` if a negative-cost cycle is reachable
    /// from `source`, or `NoPath` if `target` is unreachable.
    fn lowest_cost_walk(
        &self,
        graph: &DirectedGraph,
        source: VertexId,
        target: VertexId,
    ) -> Result<Walk, Error>;
}

/// Exact minimum-cost Hamiltonian cycle (Traveling Salesman) over a directed graph.
pub trait HamiltonianCycleSolver {
    /// Returns the cheapest cycle that starts at `start` and visits every vertex once.
    ///
    /// Fails with `Infeasible` if no such cycle exists.
    fn min_cost_cycle(
        &self,
        graph: &DirectedGraph,
        start: VertexId,
    ) -> Result<HamiltonianCycle, Error>;
}

/// Minimum spanning tree over an undirected graph.
pub trait SpanningTreeBuilder {
    /// Builds the tree of the component containing `root`. Vertices outside
    /// that component are not covered.
    fn build_from(&self, graph: &UndirectedGraph, root: VertexId) -> Result<SpanningTree, Error>;

    /// Builds from the first vertex in store order.
    fn build(&self, graph: &UndirectedGraph) -> Result<SpanningTree, Error> {
        let root = *graph.vertices().first().ok_or(Error::EmptyGraph)?;
        self.build_from(graph, root)
    }
}

/// Partition of an undirected graph into connected components.
pub trait ComponentFinder {
    fn components(&self, graph: &UndirectedGraph) -> Vec<Component>;
}
