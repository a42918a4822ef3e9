pub mod components;
pub mod csr;
pub mod directed;
pub mod hamiltonian;
pub mod mst;
pub mod traits;
pub mod undirected;
pub mod walk;

pub use components::DepthFirstComponents;
pub use csr::GraphCSR;
pub use directed::DirectedGraph;
pub use hamiltonian::HeldKarpSolver;
pub use mst::PrimBuilder;
pub use traits::{
    ComponentFinder, GraphStore, HamiltonianCycleSolver, ShortestWalkSolver, SpanningTreeBuilder,
};
pub use undirected::UndirectedGraph;
pub use walk::BellmanFordSolver;
