use crate::core::Cancelled;
use crate::plan::{EdgeId, NodeId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("edge not found: {0}")]
    EdgeNotFound(EdgeId),

    #[error("referential integrity violated: node {0} does not exist")]
    ReferentialIntegrity(NodeId),

    #[error("duplicate node id: {0}")]
    DuplicateNode(NodeId),

    #[error("duplicate edge id: {0}")]
    DuplicateEdge(EdgeId),

    #[error("self-loop on node {0} is not allowed")]
    SelfLoop(NodeId),

    #[error("a connection from node {0} is in progress; complete or cancel it first")]
    ConnectionInProgress(NodeId),

    #[error("no connection is in progress")]
    NotConnecting,

    #[error("unknown template: {0}")]
    UnknownTemplate(String),

    #[error("nothing to undo")]
    NothingToUndo,
}

impl GraphError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GraphError::NodeNotFound(_) | GraphError::EdgeNotFound(_) | GraphError::UnknownTemplate(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Cancelled(#[from] Cancelled),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
