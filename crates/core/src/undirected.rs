use std::collections::HashMap;

use super::directed::DirectedGraph;
use super::traits::GraphStore;
use common::cost;
use common::error::Error;
use common::types::{Cost, Edge, VertexId};

/// Order-independent key of an undirected edge.
fn key(a: VertexId, b: VertexId) -> Edge {
    if a <= b { (a, b) } else { (b, a) }
}

/// Undirected graph with one adjacency list per vertex and per-edge costs.
///
/// An edge is stored once, under its order-independent key, and reachable
/// from the adjacency lists of both endpoints. `find_edge` and `edges_of`
/// report it in the orientation it was inserted with.
#[derive(Debug, Clone, Default)]
pub struct UndirectedGraph {
    order: Vec<VertexId>,
    adjacency: HashMap<VertexId, Vec<VertexId>>,
    edges: HashMap<Edge, Edge>,
    costs: HashMap<Edge, Cost>,
}

impl UndirectedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of incident edges. A self-loop counts once.
    pub fn degree(&self, id: VertexId) -> Result<usize, Error> {
        self.adjacency
            .get(&id)
            .map(Vec::len)
            .ok_or(Error::VertexNotFound(id))
    }

    /// Snapshot of the edges incident to `id`.
    pub fn edges_of(&self, id: VertexId) -> Result<Vec<Edge>, Error> {
        let neighbours = self.adjacency.get(&id).ok_or(Error::VertexNotFound(id))?;
        Ok(neighbours.iter().map(|&n| self.edges[&key(id, n)]).collect())
    }

    /// Vertices adjacent to `id`, in edge insertion order.
    pub fn neighbours(&self, id: VertexId) -> Result<&[VertexId], Error> {
        self.adjacency
            .get(&id)
            .map(Vec::as_slice)
            .ok_or(Error::VertexNotFound(id))
    }

    /// Every recorded `(edge, cost)` pair.
    pub fn costs(&self) -> impl Iterator<Item = (Edge, Cost)> + '_ {
        self.costs.iter().map(|(k, &c)| (self.edges[k], c))
    }

    fn ensure_vertex(&mut self, id: VertexId) {
        if !self.adjacency.contains_key(&id) {
            self.order.push(id);
            self.adjacency.insert(id, Vec::new());
        }
    }

    fn detach(&mut self, a: VertexId, b: VertexId) -> Option<Edge> {
        let edge = self.edges.remove(&key(a, b))?;
        self.costs.remove(&key(a, b));
        if let Some(list) = self.adjacency.get_mut(&a) {
            remove_first(list, b);
        }
        if a != b {
            if let Some(list) = self.adjacency.get_mut(&b) {
                remove_first(list, a);
            }
        }
        Some(edge)
    }
}

fn remove_first(list: &mut Vec<VertexId>, value: VertexId) {
    if let Some(pos) = list.iter().position(|&x| x == value) {
        list.remove(pos);
    }
}

impl GraphStore for UndirectedGraph {
    fn add_vertex(&mut self, id: VertexId) -> Result<VertexId, Error> {
        if self.adjacency.contains_key(&id) {
            return Err(Error::VertexAlreadyExists(id));
        }
        self.ensure_vertex(id);
        Ok(id)
    }

    fn remove_vertex(&mut self, id: VertexId) -> Result<VertexId, Error> {
        let neighbours = self
            .adjacency
            .get(&id)
            .cloned()
            .ok_or(Error::VertexNotFound(id))?;
        for n in neighbours {
            self.detach(id, n);
        }
        self.adjacency.remove(&id);
        self.order.retain(|&v| v != id);
        Ok(id)
    }

    fn add_edge(&mut self, source: VertexId, target: VertexId) -> Result<Edge, Error> {
        if self.edges.contains_key(&key(source, target)) {
            return Err(Error::EdgeAlreadyExists(source, target));
        }
        self.ensure_vertex(source);
        self.ensure_vertex(target);

        self.edges.insert(key(source, target), (source, target));
        if let Some(list) = self.adjacency.get_mut(&source) {
            list.push(target);
        }
        if source != target {
            if let Some(list) = self.adjacency.get_mut(&target) {
                list.push(source);
            }
        }
        Ok((source, target))
    }

    fn remove_edge(&mut self, source: VertexId, target: VertexId) -> Result<Edge, Error> {
        self.detach(source, target)
            .ok_or(Error::EdgeNotFound(source, target))
    }

    fn find_vertex(&self, id: VertexId) -> Option<VertexId> {
        self.adjacency.contains_key(&id).then_some(id)
    }

    fn find_edge(&self, source: VertexId, target: VertexId) -> Option<Edge> {
        self.edges.get(&key(source, target)).copied()
    }

    fn get_cost(&self, source: VertexId, target: VertexId) -> Option<Cost> {
        self.costs.get(&key(source, target)).copied()
    }

    fn modify_cost(
        &mut self,
        source: VertexId,
        target: VertexId,
        cost: Cost,
    ) -> Result<Cost, Error> {
        if !self.edges.contains_key(&key(source, target)) {
            return Err(Error::EdgeNotFound(source, target));
        }
        self.costs.insert(key(source, target), cost);
        Ok(cost)
    }

    fn vertices(&self) -> &[VertexId] {
        &self.order
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Each unordered pair once, grouped by the first endpoint that reaches it.
    fn edges(&self) -> Vec<Edge> {
        let mut seen = std::collections::HashSet::with_capacity(self.edges.len());
        let mut out = Vec::with_capacity(self.edges.len());
        for &v in &self.order {
            for &n in &self.adjacency[&v] {
                let k = key(v, n);
                if seen.insert(k) {
                    out.push(self.edges[&k]);
                }
            }
        }
        out
    }
}

/// Collapses a directed graph into an undirected one.
///
/// Opposite directed edges `(u, v)` and `(v, u)` become a single edge that
/// keeps the cheaper recorded cost.
impl From<&DirectedGraph> for UndirectedGraph {
    fn from(directed: &DirectedGraph) -> Self {
        let mut graph = UndirectedGraph::new();
        for &v in directed.vertices() {
            graph.ensure_vertex(v);
        }
        for (s, t) in directed.edges() {
            if graph.find_edge(s, t).is_none() {
                graph.edges.insert(key(s, t), (s, t));
                if let Some(list) = graph.adjacency.get_mut(&s) {
                    list.push(t);
                }
                if s != t {
                    if let Some(list) = graph.adjacency.get_mut(&t) {
                        list.push(s);
                    }
                }
            }
            let merged = cost::min_cost(graph.get_cost(s, t), directed.get_cost(s, t));
            if let Some(c) = merged {
                graph.costs.insert(key(s, t), c);
            }
        }
        graph
    }
}

/// Structural equality: same vertex set, edge set and costs. Edge orientation
/// and insertion order are ignored.
impl PartialEq for UndirectedGraph {
    fn eq(&self, other: &Self) -> bool {
        self.order.len() == other.order.len()
            && self.order.iter().all(|v| other.adjacency.contains_key(v))
            && self.edges.len() == other.edges.len()
            && self.edges.keys().all(|k| other.edges.contains_key(k))
            && self.costs == other.costs
    }
}

impl Eq for UndirectedGraph {}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> UndirectedGraph {
        let mut g = UndirectedGraph::new();
        for (s, t, c) in [(1, 2, 1), (2, 3, 2), (3, 4, 3), (4, 1, 4)] {
            g.add_edge(s, t).unwrap();
            g.modify_cost(s, t, c).unwrap();
        }
        g
    }

    #[test]
    fn reverse_pair_is_the_same_edge() {
        let mut g = UndirectedGraph::new();
        g.add_edge(1, 2).unwrap();
        assert_eq!(g.add_edge(2, 1), Err(Error::EdgeAlreadyExists(2, 1)));
        assert_eq!(g.find_edge(2, 1), Some((1, 2)));
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn cost_is_shared_by_both_orientations() {
        let mut g = UndirectedGraph::new();
        g.add_edge(1, 2).unwrap();
        g.modify_cost(2, 1, 9).unwrap();
        assert_eq!(g.get_cost(1, 2), Some(9));
        assert_eq!(g.get_cost(2, 1), Some(9));
    }

    #[test]
    fn edge_reachable_from_both_endpoints() {
        let g = square();
        assert_eq!(g.degree(1), Ok(2));
        assert!(g.edges_of(1).unwrap().contains(&(1, 2)));
        assert!(g.edges_of(2).unwrap().contains(&(1, 2)));
        assert_eq!(g.neighbours(1).unwrap(), &[2, 4]);
    }

    #[test]
    fn self_loop_counts_once() {
        let mut g = UndirectedGraph::new();
        g.add_edge(3, 3).unwrap();
        assert_eq!(g.degree(3), Ok(1));
        assert_eq!(g.edges_of(3).unwrap(), vec![(3, 3)]);
        g.remove_vertex(3).unwrap();
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn remove_edge_in_either_orientation() {
        let mut g = square();
        assert_eq!(g.remove_edge(2, 1), Ok((1, 2)));
        assert_eq!(g.degree(1), Ok(1));
        assert_eq!(g.degree(2), Ok(1));
        assert_eq!(g.get_cost(1, 2), None);
        assert_eq!(g.remove_edge(1, 2), Err(Error::EdgeNotFound(1, 2)));
    }

    #[test]
    fn remove_vertex_cascades() {
        let mut g = square();
        g.remove_vertex(1).unwrap();
        assert_eq!(g.degree(1), Err(Error::VertexNotFound(1)));
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.degree(2), Ok(1));
        assert_eq!(g.degree(4), Ok(1));
        assert_eq!(g.costs().count(), 2);
    }

    #[test]
    fn modify_cost_on_missing_edge_fails() {
        let mut g = square();
        assert_eq!(g.modify_cost(1, 3, 5), Err(Error::EdgeNotFound(1, 3)));
        assert!(g.find_edge(1, 3).is_none());
    }

    #[test]
    fn edges_deduplicates_pairs() {
        let g = square();
        let edges = g.edges();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges, vec![(1, 2), (4, 1), (2, 3), (3, 4)]);
    }

    #[test]
    fn equality_ignores_orientation() {
        let mut a = UndirectedGraph::new();
        a.add_edge(1, 2).unwrap();
        a.modify_cost(1, 2, 3).unwrap();

        let mut b = UndirectedGraph::new();
        b.add_edge(2, 1).unwrap();
        b.modify_cost(2, 1, 3).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn from_directed_keeps_cheaper_of_opposite_edges() {
        let mut d = DirectedGraph::new();
        d.add_edge(1, 2).unwrap();
        d.add_edge(2, 1).unwrap();
        d.add_edge(2, 3).unwrap();
        d.add_vertex(4).unwrap();
        d.modify_cost(1, 2, 8).unwrap();
        d.modify_cost(2, 1, 5).unwrap();

        let u = UndirectedGraph::from(&d);
        assert_eq!(u.vertex_count(), 4);
        assert_eq!(u.edge_count(), 2);
        assert_eq!(u.get_cost(1, 2), Some(5));
        assert_eq!(u.get_cost(2, 3), None);
        assert_eq!(u.degree(4), Ok(0));
    }
}
