use std::collections::{HashMap, HashSet};

use super::traits::GraphStore;
use common::error::Error;
use common::types::{Cost, Edge, VertexId};

/// Directed graph with inbound and outbound adjacency views and per-edge costs.
///
/// `outbound[s]` lists the targets of edges leaving `s`, `inbound[t]` lists the
/// sources of edges entering `t`. Both views, the edge set and the cost map are
/// updated together so an edge is never visible in one and missing in another.
#[derive(Debug, Clone, Default)]
pub struct DirectedGraph {
    order: Vec<VertexId>,
    inbound: HashMap<VertexId, Vec<VertexId>>,
    outbound: HashMap<VertexId, Vec<VertexId>>,
    edges: HashSet<Edge>,
    costs: HashMap<Edge, Cost>,
}

impl DirectedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `(inbound_count, outbound_count)`.
    pub fn degree(&self, id: VertexId) -> Result<(usize, usize), Error> {
        match (self.inbound.get(&id), self.outbound.get(&id)) {
            (Some(ins), Some(outs)) => Ok((ins.len(), outs.len())),
            _ => Err(Error::VertexNotFound(id)),
        }
    }

    /// Snapshot of the edges entering `id`.
    pub fn inbound_edges(&self, id: VertexId) -> Result<Vec<Edge>, Error> {
        let sources = self.inbound.get(&id).ok_or(Error::VertexNotFound(id))?;
        Ok(sources.iter().map(|&s| (s, id)).collect())
    }

    /// Snapshot of the edges leaving `id`.
    pub fn outbound_edges(&self, id: VertexId) -> Result<Vec<Edge>, Error> {
        let targets = self.outbound.get(&id).ok_or(Error::VertexNotFound(id))?;
        Ok(targets.iter().map(|&t| (id, t)).collect())
    }

    /// Every recorded `(edge, cost)` pair.
    pub fn costs(&self) -> impl Iterator<Item = (Edge, Cost)> + '_ {
        self.costs.iter().map(|(&e, &c)| (e, c))
    }

    fn ensure_vertex(&mut self, id: VertexId) {
        if !self.outbound.contains_key(&id) {
            self.order.push(id);
            self.inbound.insert(id, Vec::new());
            self.outbound.insert(id, Vec::new());
        }
    }

    /// Drops an edge from every view. Returns false if it was not present.
    fn detach(&mut self, source: VertexId, target: VertexId) -> bool {
        if !self.edges.remove(&(source, target)) {
            return false;
        }
        self.costs.remove(&(source, target));
        if let Some(targets) = self.outbound.get_mut(&source) {
            remove_first(targets, target);
        }
        if let Some(sources) = self.inbound.get_mut(&target) {
            remove_first(sources, source);
        }
        true
    }
}

fn remove_first(list: &mut Vec<VertexId>, value: VertexId) {
    if let Some(pos) = list.iter().position(|&x| x == value) {
        list.remove(pos);
    }
}

impl GraphStore for DirectedGraph {
    fn add_vertex(&mut self, id: VertexId) -> Result<VertexId, Error> {
        if self.outbound.contains_key(&id) {
            return Err(Error::VertexAlreadyExists(id));
        }
        self.ensure_vertex(id);
        Ok(id)
    }

    fn remove_vertex(&mut self, id: VertexId) -> Result<VertexId, Error> {
        let targets = self.outbound.get(&id).cloned().ok_or(Error::VertexNotFound(id))?;
        let sources = self.inbound.get(&id).cloned().unwrap_or_default();

        // A self-loop shows up in both lists; detach() ignores the second hit.
        for target in targets {
            self.detach(id, target);
        }
        for source in sources {
            self.detach(source, id);
        }

        self.outbound.remove(&id);
        self.inbound.remove(&id);
        self.order.retain(|&v| v != id);
        Ok(id)
    }

    fn add_edge(&mut self, source: VertexId, target: VertexId) -> Result<Edge, Error> {
        if self.edges.contains(&(source, target)) {
            return Err(Error::EdgeAlreadyExists(source, target));
        }
        self.ensure_vertex(source);
        self.ensure_vertex(target);

        self.edges.insert((source, target));
        if let Some(targets) = self.outbound.get_mut(&source) {
            targets.push(target);
        }
        if let Some(sources) = self.inbound.get_mut(&target) {
            sources.push(source);
        }
        Ok((source, target))
    }

    fn remove_edge(&mut self, source: VertexId, target: VertexId) -> Result<Edge, Error> {
        if self.detach(source, target) {
            Ok((source, target))
        } else {
            Err(Error::EdgeNotFound(source, target))
        }
    }

    fn find_vertex(&self, id: VertexId) -> Option<VertexId> {
        self.outbound.contains_key(&id).then_some(id)
    }

    fn find_edge(&self, source: VertexId, target: VertexId) -> Option<Edge> {
        self.edges.get(&(source, target)).copied()
    }

    fn get_cost(&self, source: VertexId, target: VertexId) -> Option<Cost> {
        self.costs.get(&(source, target)).copied()
    }

    fn modify_cost(
        &mut self,
        source: VertexId,
        target: VertexId,
        cost: Cost,
    ) -> Result<Cost, Error> {
        if !self.edges.contains(&(source, target)) {
            return Err(Error::EdgeNotFound(source, target));
        }
        self.costs.insert((source, target), cost);
        Ok(cost)
    }

    fn vertices(&self) -> &[VertexId] {
        &self.order
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Enumerated through the inbound view, vertex by vertex.
    fn edges(&self) -> Vec<Edge> {
        self.order
            .iter()
            .flat_map(|&t| self.inbound[&t].iter().map(move |&s| (s, t)))
            .collect()
    }
}

/// Structural equality: same vertex set, edge set and costs, regardless of
/// insertion order.
impl PartialEq for DirectedGraph {
    fn eq(&self, other: &Self) -> bool {
        self.order.len() == other.order.len()
            && self.order.iter().all(|v| other.outbound.contains_key(v))
            && self.edges == other.edges
            && self.costs == other.costs
    }
}

impl Eq for DirectedGraph {}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> DirectedGraph {
        let mut g = DirectedGraph::new();
        g.add_edge(1, 2).unwrap();
        g.add_edge(2, 3).unwrap();
        g.add_edge(3, 1).unwrap();
        g.modify_cost(1, 2, 4).unwrap();
        g.modify_cost(2, 3, -2).unwrap();
        g.modify_cost(3, 1, 7).unwrap();
        g
    }

    #[test]
    fn add_vertex_then_find() {
        let mut g = DirectedGraph::new();
        assert_eq!(g.add_vertex(5), Ok(5));
        assert_eq!(g.find_vertex(5), Some(5));
        assert_eq!(g.add_vertex(5), Err(Error::VertexAlreadyExists(5)));
        assert_eq!(g.vertex_count(), 1);
    }

    #[test]
    fn add_edge_creates_missing_endpoints() {
        let mut g = DirectedGraph::new();
        g.add_edge(1, 2).unwrap();
        assert_eq!(g.vertices(), &[1, 2]);
        assert_eq!(g.degree(1), Ok((0, 1)));
        assert_eq!(g.degree(2), Ok((1, 0)));
    }

    #[test]
    fn duplicate_edge_respects_direction() {
        let mut g = DirectedGraph::new();
        g.add_edge(1, 2).unwrap();
        assert_eq!(g.add_edge(1, 2), Err(Error::EdgeAlreadyExists(1, 2)));
        assert_eq!(g.add_edge(2, 1), Ok((2, 1)));
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn find_edge_is_directional() {
        let g = triangle();
        assert_eq!(g.find_edge(1, 2), Some((1, 2)));
        assert_eq!(g.find_edge(2, 1), None);
    }

    #[test]
    fn get_cost_distinguishes_nothing_but_find_edge_does() {
        let mut g = DirectedGraph::new();
        g.add_edge(1, 2).unwrap();
        assert_eq!(g.get_cost(1, 2), None);
        assert_eq!(g.get_cost(5, 6), None);
        assert!(g.find_edge(1, 2).is_some());
        assert!(g.find_edge(5, 6).is_none());

        assert_eq!(g.modify_cost(1, 2, 0), Ok(0));
        assert_eq!(g.get_cost(1, 2), Some(0));
    }

    #[test]
    fn modify_cost_on_missing_edge_fails_without_creating_it() {
        let mut g = triangle();
        assert_eq!(g.modify_cost(2, 1, 3), Err(Error::EdgeNotFound(2, 1)));
        assert!(g.find_edge(2, 1).is_none());
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn remove_edge_clears_both_views_and_cost() {
        let mut g = triangle();
        assert_eq!(g.remove_edge(1, 2), Ok((1, 2)));
        assert_eq!(g.remove_edge(1, 2), Err(Error::EdgeNotFound(1, 2)));
        assert!(g.outbound_edges(1).unwrap().is_empty());
        assert!(g.inbound_edges(2).unwrap().is_empty());
        assert_eq!(g.get_cost(1, 2), None);

        // Re-adding the edge must not resurrect the old cost.
        g.add_edge(1, 2).unwrap();
        assert_eq!(g.get_cost(1, 2), None);
    }

    #[test]
    fn remove_vertex_cascades() {
        let mut g = triangle();
        assert_eq!(g.remove_vertex(2), Ok(2));

        assert_eq!(g.degree(2), Err(Error::VertexNotFound(2)));
        assert_eq!(g.edge_count(), 1);
        assert!(g.outbound_edges(1).unwrap().is_empty());
        assert!(g.inbound_edges(3).unwrap().is_empty());
        assert_eq!(g.get_cost(1, 2), None);
        assert_eq!(g.get_cost(2, 3), None);
        assert_eq!(g.get_cost(3, 1), Some(7));
        assert_eq!(g.costs().count(), 1);
        assert_eq!(g.vertices(), &[1, 3]);
    }

    #[test]
    fn remove_vertex_with_self_loop() {
        let mut g = DirectedGraph::new();
        g.add_edge(1, 1).unwrap();
        g.add_edge(1, 2).unwrap();
        assert_eq!(g.degree(1), Ok((1, 2)));

        g.remove_vertex(1).unwrap();
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.degree(2), Ok((0, 0)));
    }

    #[test]
    fn remove_missing_vertex_fails() {
        let mut g = DirectedGraph::new();
        assert_eq!(g.remove_vertex(3), Err(Error::VertexNotFound(3)));
    }

    #[test]
    fn edge_snapshots_fail_for_absent_vertex() {
        let g = triangle();
        assert_eq!(g.inbound_edges(9), Err(Error::VertexNotFound(9)));
        assert_eq!(g.outbound_edges(9), Err(Error::VertexNotFound(9)));
    }

    #[test]
    fn edges_lists_every_edge_once() {
        let g = triangle();
        let mut edges = g.edges();
        edges.sort();
        assert_eq!(edges, vec![(1, 2), (2, 3), (3, 1)]);
    }

    #[test]
    fn clone_is_independent() {
        let original = triangle();
        let mut copy = original.clone();
        assert_eq!(copy, original);

        copy.modify_cost(1, 2, 100).unwrap();
        copy.remove_vertex(3).unwrap();

        assert_eq!(original.get_cost(1, 2), Some(4));
        assert_eq!(original.edge_count(), 3);
        assert_ne!(copy, original);
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let mut a = DirectedGraph::new();
        a.add_edge(1, 2).unwrap();
        a.add_vertex(3).unwrap();

        let mut b = DirectedGraph::new();
        b.add_vertex(3).unwrap();
        b.add_vertex(2).unwrap();
        b.add_edge(1, 2).unwrap();

        assert_eq!(a, b);
    }
}
