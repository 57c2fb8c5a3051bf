//! DOM error types

use thiserror::Error;

use crate::node::NodeId;

#[derive(Error, Debug)]
pub enum DomError {
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("Node is not an element: {0}")]
    NotAnElement(NodeId),

    #[error("Cannot append {child} under {parent}: it would contain itself")]
    Hierarchy { parent: NodeId, child: NodeId },

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Invalid location: {0}")]
    InvalidLocation(#[from] url::ParseError),
}
