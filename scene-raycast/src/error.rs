use thiserror::Error;

use crate::NodeId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Expected an ordered list of root nodes, got a single node")]
    NotASequence,

    #[error("Unknown node {0}")]
    UnknownNode(NodeId),

    #[error("Node {0} is not a level of detail node")]
    NotALod(NodeId),

    #[error("Adding node {child} to {parent} would create a cycle")]
    CyclicHierarchy { parent: NodeId, child: NodeId },

    #[error("Invalid scene description: {0}")]
    InvalidScene(String),

    #[error("Serialization error: {0}")]
    SerializationError(Box<dyn std::error::Error + Send + Sync>),

    #[error("Deserialization error: {0}")]
    DeserializationError(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, Error>;
