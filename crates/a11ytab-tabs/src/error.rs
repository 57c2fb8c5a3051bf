//! Tab group error types

use a11ytab_dom::{DomError, NodeId};
use thiserror::Error;

use crate::state::Lifecycle;

#[derive(Error, Debug)]
pub enum TabError {
    #[error("Trigger {trigger} references a missing panel: {target}")]
    Resolution { trigger: String, target: String },

    #[error("Cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: Lifecycle,
    },

    #[error("Tab group has no triggers")]
    Empty,

    #[error("Element is not a trigger of this group: {0}")]
    UnknownTrigger(NodeId),

    #[error("Trigger index out of range: {0}")]
    OutOfRange(usize),

    #[error("No trigger carries the selected marker")]
    NoSelection,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("DOM error: {0}")]
    Dom(#[from] DomError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
