use std::fmt;

use crate::types::VertexId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A vertex with this identifier is already stored.
    VertexAlreadyExists(VertexId),

    /// The vertex is not present in the graph.
    VertexNotFound(VertexId),

    /// An edge between the pair already exists (direction respected only for directed graphs).
    EdgeAlreadyExists(VertexId, VertexId),

    /// The edge is not present in the graph.
    EdgeNotFound(VertexId, VertexId),

    /// The edge exists but carries no recorded cost.
    MissingCost(VertexId, VertexId),

    /// A negative-cost cycle is reachable from the walk source.
    NegativeCycleDetected,

    /// The walk target cannot be reached from the source.
    NoPath(VertexId, VertexId),

    /// No Hamiltonian cycle / spanning tree satisfying the request exists.
    Infeasible,

    /// The operation needs at least one vertex.
    EmptyGraph,

    /// The exact TSP table would exceed the configured vertex limit.
    TooManyVertices { count: usize, limit: usize },

    /// The exact TSP table needs more memory than the solver may allocate.
    TableTooLarge { bytes: usize, limit: usize },

    /// The computation was stopped through its cancellation flag.
    Cancelled,

    /// Accumulated cost left the i64 range.
    CostOverflow,
}

impl Error {
    /// True for failures caused by the graph's structure (duplicates or absent elements).
    pub fn is_structure_error(&self) -> bool {
        matches!(
            self,
            Error::VertexAlreadyExists(_)
                | Error::VertexNotFound(_)
                | Error::EdgeAlreadyExists(..)
                | Error::EdgeNotFound(..)
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::VertexAlreadyExists(v) => write!(f, "Vertex {} already exists.", v),

            Error::VertexNotFound(v) => write!(f, "Vertex {} is not in the graph.", v),

            Error::EdgeAlreadyExists(s, t) => write!(f, "Edge ({}, {}) already exists.", s, t),

            Error::EdgeNotFound(s, t) => write!(f, "Edge ({}, {}) is not in the graph.", s, t),

            Error::MissingCost(s, t) => write!(f, "Edge ({}, {}) has no recorded cost.", s, t),

            Error::NegativeCycleDetected => {
                write!(f, "Negative cost cycle reachable from the source vertex.")
            }

            Error::NoPath(s, t) => write!(f, "No walk exists from {} to {}.", s, t),

            Error::Infeasible => write!(f, "No feasible solution exists for this graph."),

            Error::EmptyGraph => write!(f, "The graph has no vertices."),

            Error::TooManyVertices { count, limit } => write!(
                f,
                "Graph has {} vertices; the exact solver is limited to {}.",
                count, limit
            ),

            Error::Cancelled => write!(f, "Computation cancelled."),

            Error::TableTooLarge { bytes, limit } => write!(
                f,
                "The exact solver needs {} bytes of table memory; the limit is {}.",
                bytes, limit
            ),
            Error::CostOverflow => write!(f, "Cost arithmetic overflowed."),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure_errors_are_grouped() {
        assert!(Error::VertexAlreadyExists(1).is_structure_error());
        assert!(Error::VertexNotFound(1).is_structure_error());
        assert!(Error::EdgeAlreadyExists(1, 2).is_structure_error());
        assert!(Error::EdgeNotFound(1, 2).is_structure_error());

        assert!(!Error::NegativeCycleDetected.is_structure_error());
        assert!(!Error::NoPath(1, 2).is_structure_error());
        assert!(!Error::Infeasible.is_structure_error());
        assert!(!Error::TableTooLarge { bytes: 2, limit: 1 }.is_structure_error());
    }

    #[test]
    fn display_names_the_offending_elements() {
        assert_eq!(
            Error::EdgeNotFound(3, 7).to_string(),
            "Edge (3, 7) is not in the graph."
        );
        assert_eq!(
            Error::TooManyVertices { count: 30, limit: 20 }.to_string(),
            "Graph has 30 vertices; the exact solver is limited to 20."
        );
    }
}
