//! Core error types

use thiserror::Error;

use crate::page::GroupId;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("DOM error: {0}")]
    Dom(#[from] a11ytab_dom::DomError),

    #[error("Tab error: {0}")]
    Tab(#[from] a11ytab_tabs::TabError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown tab group: {0}")]
    UnknownGroup(GroupId),
}
