//! a11ytab host environment
//!
//! Everything the tab component needs from "the page" goes through the
//! [`Host`] trait: element lookup, attributes, class lists, input focus,
//! the location fragment, custom events and listener registration.
//! [`Document`] is the in-memory implementation used by tests and demos.

mod document;
mod element;
mod error;
mod event;
mod host;
mod node;
mod selector;

pub use document::Document;
pub use error::DomError;
pub use event::{DispatchedEvent, EventKind, Key, ListenerId, Modifiers, UiEvent};
pub use host::Host;
pub use node::NodeId;
pub use selector::Selector;

pub type Result<T> = std::result::Result<T, DomError>;
