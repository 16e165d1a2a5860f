//! Graph traversal error types.

use thiserror::Error;

/// Errors that can occur while traversing a graph.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The enumerator was asked to expand a node identifier absent from the
    /// graph. Only possible after closure violations were ignored; treated as
    /// a contract violation rather than silently skipped.
    #[error("Unknown node in graph: {0} (were validation results honored?)")]
    UnknownNode(String),
}
