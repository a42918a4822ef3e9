use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::error::Error;
use cost_graph_core::{DirectedGraph, UndirectedGraph};

/// Which store variant the session is working with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphKind {
    Directed,
    Undirected,
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GraphKind::Directed => write!(f, "directed"),
            GraphKind::Undirected => write!(f, "undirected"),
        }
    }
}

impl FromStr for GraphKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "directed" | "d" => Ok(GraphKind::Directed),
            "undirected" | "u" => Ok(GraphKind::Undirected),
            other => Err(Error::InvalidCommand(format!(
                "unknown graph kind '{}', expected directed or undirected",
                other
            ))),
        }
    }
}

/// The graph a session operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveGraph {
    Directed(DirectedGraph),
    Undirected(UndirectedGraph),
}

impl ActiveGraph {
    pub fn new(kind: GraphKind) -> Self {
        match kind {
            GraphKind::Directed => ActiveGraph::Directed(DirectedGraph::new()),
            GraphKind::Undirected => ActiveGraph::Undirected(UndirectedGraph::new()),
        }
    }

    pub fn kind(&self) -> GraphKind {
        match self {
            ActiveGraph::Directed(_) => GraphKind::Directed,
            ActiveGraph::Undirected(_) => GraphKind::Undirected,
        }
    }
}

/// Runs `$body` with `$g` bound to whichever store the [`ActiveGraph`] holds.
/// Both stores implement `GraphStore`, so the body can use the shared contract.
#[macro_export]
macro_rules! with_store {
    ($graph:expr, $g:ident => $body:expr) => {
        match $graph {
            $crate::types::ActiveGraph::Directed($g) => $body,
            $crate::types::ActiveGraph::Undirected($g) => $body,
        }
    };
}

/// Shared handle: mutations take the write lock, algorithms clone a snapshot under the read lock.
pub type SharedGraph = Arc<RwLock<ActiveGraph>>;

/// Where the initial graph comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Empty(GraphKind),
    File(GraphKind, PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_kind_parses_long_and_short_names() {
        assert_eq!("directed".parse::<GraphKind>().unwrap(), GraphKind::Directed);
        assert_eq!("U".parse::<GraphKind>().unwrap(), GraphKind::Undirected);
        assert!("mixed".parse::<GraphKind>().is_err());
    }

    #[test]
    fn active_graph_reports_its_kind() {
        assert_eq!(ActiveGraph::new(GraphKind::Directed).kind(), GraphKind::Directed);
        assert_eq!(
            ActiveGraph::new(GraphKind::Undirected).kind(),
            GraphKind::Undirected
        );
    }
}
