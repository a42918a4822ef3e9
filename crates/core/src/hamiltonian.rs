use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::csr::GraphCSR;
use super::directed::DirectedGraph;
use super::traits::HamiltonianCycleSolver;
use common::{
    cost,
    error::Error,
    types::{Cost, HamiltonianCycle, VertexId},
};
use tracing::{debug, trace, warn};

/// Default cap on the vertex count accepted by [`HeldKarpSolver`].
pub const DEFAULT_MAX_VERTICES: usize = 18;

/// Largest cap that can be configured. Predecessors are stored as `u8` and the
/// table for 24 vertices already runs to gigabytes.
pub const HARD_MAX_VERTICES: usize = 24;

/// Default ceiling on the memory the DP and predecessor tables may take together.
pub const DEFAULT_MAX_TABLE_BYTES: usize = 1 << 31;

/// Bytes per `(subset, vertex)` cell: one cost plus one predecessor.
const CELL_BYTES: usize = std::mem::size_of::<Option<Cost>>() + std::mem::size_of::<u8>();

const NO_PRED: u8 = u8::MAX;

/// Exact Traveling Salesman solver using Held-Karp subset dynamic programming.
///
/// `g[S][v]` is the cheapest walk that leaves the start vertex, visits exactly
/// the set `S` of other vertices and ends at `v ∈ S`. Subsets are processed in
/// increasing size, so every `g[S \ {v}][u]` is final before it is read.
///
/// # Complexity
/// `O(2^n · n²)` time and `O(2^n · n)` memory. Only small graphs (tens of
/// vertices at most) are tractable, which is why the solver refuses graphs
/// above its configured vertex cap before allocating anything.
///
/// Missing edges and edges without a recorded cost are unusable transitions.
#[derive(Debug, Clone)]
pub struct HeldKarpSolver {
    max_vertices: usize,
    max_table_bytes: usize,
    cancel: Option<Arc<AtomicBool>>,
}

impl Default for HeldKarpSolver {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_VERTICES)
    }
}

impl HeldKarpSolver {
    /// Creates a solver accepting at most `max_vertices` vertices (capped at
    /// [`HARD_MAX_VERTICES`]).
    pub fn new(max_vertices: usize) -> Self {
        Self {
            max_vertices: max_vertices.min(HARD_MAX_VERTICES),
            max_table_bytes: DEFAULT_MAX_TABLE_BYTES,
            cancel: None,
        }
    }

    /// Attaches a flag that aborts the run with `Error::Cancelled` once set.
    /// It is polled between subset sizes.
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Replaces the table memory ceiling (see [`DEFAULT_MAX_TABLE_BYTES`]).
    pub fn with_table_limit(mut self, bytes: usize) -> Self {
        self.max_table_bytes = bytes;
        self
    }

    pub fn max_vertices(&self) -> usize {
        self.max_vertices
    }

    /// Allocates both tables for `m` non-start vertices, failing with
    /// `TableTooLarge` instead of aborting when the memory is not available.
    fn allocate_tables(&self, m: usize) -> Result<(Vec<Option<Cost>>, Vec<u8>), Error> {
        let entries = 1usize
            .checked_shl(m as u32)
            .and_then(|subsets| subsets.checked_mul(m));
        let bytes = entries.and_then(|e| e.checked_mul(CELL_BYTES));

        let too_large = || Error::TableTooLarge {
            bytes: bytes.unwrap_or(usize::MAX),
            limit: self.max_table_bytes,
        };

        let entries = match (entries, bytes) {
            (Some(entries), Some(bytes)) if bytes <= self.max_table_bytes => entries,
            _ => {
                warn!(
                    vertices = m + 1,
                    limit = self.max_table_bytes,
                    "Held-Karp table exceeds the memory limit"
                );
                return Err(too_large());
            }
        };

        let mut table: Vec<Option<Cost>> = Vec::new();
        let mut pred: Vec<u8> = Vec::new();
        table
            .try_reserve_exact(entries)
            .map_err(|_| too_large())?;
        pred.try_reserve_exact(entries).map_err(|_| too_large())?;
        table.resize(entries, None);
        pred.resize(entries, NO_PRED);

        Ok((table, pred))
    }

    fn check_cancelled(&self) -> Result<(), Error> {
        match &self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(Error::Cancelled),
            _ => Ok(()),
        }
    }

    /// Walks predecessors back from `(full set, last)`, shrinking the subset
    /// exactly as the forward pass grew it.
    ///
    /// `others[j]` is the vertex id behind subset bit `j`. Returns the tour in
    /// visiting order, starting with `start`.
    pub fn reconstruct_tour(
        &self,
        start: VertexId,
        others: &[VertexId],
        pred: &[u8],
        last: usize,
    ) -> Result<Vec<VertexId>, Error> {
        let m = others.len();
        let mut mask = (1usize << m) - 1;
        let mut current = last;
        let mut backwards = Vec::with_capacity(m);

        loop {
            backwards.push(others[current]);
            let previous = pred[mask * m + current];
            if previous == NO_PRED {
                break;
            }
            mask ^= 1 << current;
            current = previous as usize;
        }

        if backwards.len() != m {
            return Err(Error::Infeasible);
        }

        let mut tour = Vec::with_capacity(m + 1);
        tour.push(start);
        tour.extend(backwards.into_iter().rev());
        Ok(tour)
    }
}

impl HamiltonianCycleSolver for HeldKarpSolver {
    fn min_cost_cycle(
        &self,
        graph: &DirectedGraph,
        start: VertexId,
    ) -> Result<HamiltonianCycle, Error> {
        let csr = GraphCSR::from_directed(graph);
        let s = csr.index_of(start)?;
        let n = csr.num_nodes;

        if n > self.max_vertices {
            warn!(
                vertices = n,
                limit = self.max_vertices,
                "Graph too large for exact Hamiltonian cycle search"
            );
            return Err(Error::TooManyVertices {
                count: n,
                limit: self.max_vertices,
            });
        }

        let matrix = csr.cost_matrix();
        let weight = |u: usize, v: usize| matrix[u * n + v];

        if n == 1 {
            // The only cycle through a lone vertex is its self-loop.
            let cost = weight(s, s).ok_or(Error::Infeasible)?;
            return Ok(HamiltonianCycle {
                tour: vec![start],
                cost,
            });
        }

        debug!(vertices = n, start, "Starting Held-Karp search");

        let others: Vec<usize> = (0..n).filter(|&v| v != s).collect();
        let m = others.len();
        let subsets = 1usize << m;
        let full = subsets - 1;

        let (mut table, mut pred) = self.allocate_tables(m)?;

        for j in 0..m {
            table[(1 << j) * m + j] = weight(s, others[j]);
        }

        for size in 2..=m {
            self.check_cancelled()?;

            for mask in (1..subsets).filter(|mask| mask.count_ones() as usize == size) {
                for j in (0..m).filter(|&j| mask & (1 << j) != 0) {
                    let rest = mask ^ (1 << j);
                    let mut best: Option<Cost> = None;
                    let mut best_pred = NO_PRED;

                    for i in (0..m).filter(|&i| rest & (1 << i) != 0) {
                        let Some(w) = weight(others[i], others[j]) else {
                            continue;
                        };
                        let candidate = cost::extend(table[rest * m + i], w)?;
                        if cost::improves(candidate, best) {
                            best = candidate;
                            best_pred = i as u8;
                        }
                    }

                    table[mask * m + j] = best;
                    pred[mask * m + j] = best_pred;
                }
            }

            trace!(size, "Subset size complete");
        }
        self.check_cancelled()?;

        let mut best: Option<Cost> = None;
        let mut last = None;
        for j in 0..m {
            let Some(w) = weight(others[j], s) else {
                continue;
            };
            let candidate = cost::extend(table[full * m + j], w)?;
            if cost::improves(candidate, best) {
                best = candidate;
                last = Some(j);
            }
        }

        let (cost, last) = match (best, last) {
            (Some(cost), Some(last)) => (cost, last),
            _ => {
                debug!(start, "No Hamiltonian cycle exists");
                return Err(Error::Infeasible);
            }
        };

        let ids: Vec<VertexId> = others.iter().map(|&v| csr.vertex_ids[v]).collect();
        let tour = self.reconstruct_tour(start, &ids, &pred, last)?;

        debug!(cost, "Minimum cost Hamiltonian cycle found");
        Ok(HamiltonianCycle { tour, cost })
    }
}
