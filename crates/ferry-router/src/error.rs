//! Error types for the router.

use ferry_ens::NodeId;
use thiserror::Error;

/// Result type for router operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in router operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Node was never registered with the router
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    /// A node cannot meet itself
    #[error("Node {0} cannot encounter itself")]
    SelfEncounter(NodeId),

    /// Value table error
    #[error("Value table error: {0}")]
    Table(#[from] ferry_qtable::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
