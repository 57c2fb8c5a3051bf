//! a11ytab
//!
//! Accessible tab groups over a host document. A [`Page`] owns the document
//! and any number of independent [`TabGroup`]s and routes UI events to the
//! group whose listener they reach.

mod error;
mod page;

pub use error::CoreError;
pub use page::{GroupId, Page};

pub use a11ytab_dom::{
    DispatchedEvent, Document, DomError, EventKind, Host, Key, ListenerId, Modifiers, NodeId,
    Selector, UiEvent,
};
pub use a11ytab_tabs::{
    resolve_key, ClassPair, Config, Direction, EventNames, Hooks, Lifecycle, ResolvedConfig,
    SelectOptions, TabError, TabGroup, TabTrigger, Transition,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
///
/// Honors `RUST_LOG`, defaulting to `info`. Safe to call more than once.
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt().with_env_filter(filter).with_target(true).try_init();
}
