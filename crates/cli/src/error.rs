use thiserror::Error;

use super::types::GraphKind;
use common::error::Error as GraphError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Graph operation failed: {0}")]
    GraphError(#[from] GraphError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Malformed graph file at line {line}: {reason}")]
    MalformedFile { line: u64, reason: String },

    #[error("Configuration error: {0}")]
    ConfigLoadError(String),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("This operation needs a {0} graph.")]
    WrongGraphKind(GraphKind),

    #[error("Cannot generate graph: {0}")]
    GeneratorLimit(String),

    #[error("Background solver task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}
