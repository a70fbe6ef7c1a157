//! Error types for graph mutations, node contracts and port construction

use thiserror::Error;

use crate::snapshot::Edge;

/// Errors raised by the structural graph operations and the sync cycle.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A node with this id is already registered in the graph.
    #[error("node id `{0}` is already present in the graph")]
    DuplicateId(String),

    /// The referenced node id is not registered in the graph.
    #[error("unknown node `{0}`")]
    UnknownNode(String),

    /// The edge is not in the current edge list (compared by its 4-tuple).
    #[error("edge `{0}` is not in the current edge list")]
    UnknownEdge(Edge),

    /// The referenced port name does not exist on the node.
    #[error("node `{node}` has no port named `{port}`")]
    UnknownPort { node: String, port: String },

    /// The two ports of an edge carry incompatible restriction tags.
    /// `None` means the port declares no restriction.
    #[error("incompatible port restrictions between `{source_node}.{source_handle}` and `{target}.{target_handle}`")]
    TagMismatch {
        source_node: String,
        source_handle: String,
        source_restriction: Option<String>,
        target: String,
        target_handle: String,
        target_restriction: Option<String>,
    },

    /// The port already holds its maximum number of connections.
    #[error("port `{port}` on node `{node}` accepts at most {limit} connection(s)")]
    ConnectionLimit {
        node: String,
        port: String,
        limit: usize,
    },

    /// An edge endpoint could not be resolved during an adjacency rebuild.
    /// The caller must filter orphan edges before rebuilding.
    #[error("adjacency rebuild could not resolve `{node}` port `{port}`")]
    LookupFailure { node: String, port: String },

    /// A node implementation failed while servicing a contract call.
    #[error(transparent)]
    Node(#[from] NodeError),
}

/// Errors raised by node implementations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NodeError {
    /// The node class did not override a required contract operation.
    /// A development-time defect, not a recoverable condition.
    #[error("node class `{class}` does not implement `{operation}`")]
    NotImplemented {
        class: String,
        operation: &'static str,
    },

    /// A node-authored update failed, e.g. on malformed upstream data.
    #[error("{0}")]
    Failed(String),
}

impl NodeError {
    pub fn not_implemented(class: impl Into<String>, operation: &'static str) -> Self {
        Self::NotImplemented {
            class: class.into(),
            operation,
        }
    }
}

/// Violation of the port construction invariant: a displayed name requires a
/// left or right placement and an explicit offset.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PortConfigError {
    #[error("port `{0}` can only display its name when placed left or right")]
    DisplayNamePlacement(String),

    #[error("port `{0}` can only display its name when an offset is provided")]
    DisplayNameOffset(String),
}
