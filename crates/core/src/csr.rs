use std::collections::HashMap;

use super::directed::DirectedGraph;
use super::traits::GraphStore;
use common::error::Error;
use common::types::{Cost, VertexId};

/// Read-only Compressed Sparse Row (CSR) snapshot of a [`DirectedGraph`].
///
/// Solvers that sweep every edge many times work on this dense layout instead
/// of the hash-keyed store:
/// - `node_pointers[u]..node_pointers[u+1]` → outbound edges of dense node `u`
/// - `edge_targets[i]` → dense target of edge `i`
/// - `edge_costs[i]` → recorded cost of edge `i` (`None` if uncosted)
/// - `edge_source_by_index[i]` → dense source of edge `i`
///
/// Dense node `i` corresponds to `vertex_ids[i]`, which follows the store's
/// vertex order.
#[derive(Debug, Clone)]
pub struct GraphCSR {
    pub num_nodes: usize,
    pub vertex_ids: Vec<VertexId>,
    pub node_pointers: Vec<usize>,
    pub edge_targets: Vec<usize>,
    pub edge_costs: Vec<Option<Cost>>,
    pub edge_source_by_index: Vec<usize>,
    index: HashMap<VertexId, usize>,
}

impl GraphCSR {
    /// Builds the snapshot from the store's current vertices, edges and costs.
    ///
    /// Uses the two-pass counting technique: the first pass counts outbound
    /// edges per node, a prefix sum turns counts into offsets, and the second
    /// pass scatters each edge into its source's block.
    pub fn from_directed(graph: &DirectedGraph) -> Self {
        let vertex_ids: Vec<VertexId> = graph.vertices().to_vec();
        let num_nodes = vertex_ids.len();
        let index: HashMap<VertexId, usize> = vertex_ids
            .iter()
            .enumerate()
            .map(|(i, &v)| (v, i))
            .collect();

        let edges: Vec<(usize, usize, Option<Cost>)> = graph
            .edges()
            .into_iter()
            .map(|(s, t)| (index[&s], index[&t], graph.get_cost(s, t)))
            .collect();
        let m = edges.len();

        let mut node_pointers = vec![0; num_nodes + 1];
        for &(u, _, _) in &edges {
            node_pointers[u + 1] += 1;
        }
        for i in 1..=num_nodes {
            node_pointers[i] += node_pointers[i - 1];
        }

        let mut edge_targets = vec![0; m];
        let mut edge_costs = vec![None; m];
        let mut edge_source_by_index = vec![0; m];
        let mut cursor = node_pointers.clone();

        for &(u, v, cost) in &edges {
            let pos = cursor[u];
            edge_targets[pos] = v;
            edge_costs[pos] = cost;
            edge_source_by_index[pos] = u;
            cursor[u] += 1;
        }

        Self {
            num_nodes,
            vertex_ids,
            node_pointers,
            edge_targets,
            edge_costs,
            edge_source_by_index,
            index,
        }
    }

    /// Dense index of a vertex id.
    pub fn index_of(&self, vertex: VertexId) -> Result<usize, Error> {
        self.index
            .get(&vertex)
            .copied()
            .ok_or(Error::VertexNotFound(vertex))
    }

    /// Edge index range of the outbound block of dense node `u`.
    pub fn outbound_range(&self, u: usize) -> std::ops::Range<usize> {
        self.node_pointers[u]..self.node_pointers[u + 1]
    }

    /// Row-major `num_nodes × num_nodes` matrix of edge costs; `None` where
    /// there is no edge or the edge is uncosted.
    pub fn cost_matrix(&self) -> Vec<Option<Cost>> {
        let n = self.num_nodes;
        let mut matrix = vec![None; n * n];
        for u in 0..n {
            for i in self.outbound_range(u) {
                matrix[u * n + self.edge_targets[i]] = self.edge_costs[i];
            }
        }
        matrix
    }
}
