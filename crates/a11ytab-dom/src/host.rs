//! Host environment seam
//!
//! The tab component never touches a global document or window. All page
//! access goes through a `Host`, so a real browser binding and the
//! in-memory [`Document`](crate::Document) are interchangeable.

use crate::event::{EventKind, ListenerId};
use crate::node::NodeId;
use crate::selector::Selector;
use crate::Result;

pub trait Host {
    /// Elements under `scope` matching `selector`, in document order.
    /// The scope itself is never part of the result.
    fn query_all(&self, scope: NodeId, selector: &Selector) -> Result<Vec<NodeId>>;

    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> Result<()>;

    /// Removing an absent attribute succeeds.
    fn remove_attribute(&self, node: NodeId, name: &str) -> Result<()>;

    fn has_class(&self, node: NodeId, class: &str) -> bool;

    fn add_class(&self, node: NodeId, class: &str) -> Result<()>;

    fn remove_class(&self, node: NodeId, class: &str) -> Result<()>;

    /// Move input focus to `node`.
    fn focus(&self, node: NodeId) -> Result<()>;

    fn focused(&self) -> Option<NodeId>;

    /// Location fragment including the leading `#`, `None` when empty.
    fn location_hash(&self) -> Option<String>;

    /// Accepts the fragment with or without its leading `#`.
    fn set_location_hash(&self, hash: &str) -> Result<()>;

    /// Dispatch a bubbling, cancelable custom event on the document.
    fn dispatch_custom_event(&self, name: &str) -> Result<()>;

    fn add_listener(&self, node: NodeId, kind: EventKind) -> Result<ListenerId>;

    /// Returns false when the listener was not registered.
    fn remove_listener(&self, id: ListenerId) -> bool;

    /// Listeners registered on `node` for `kind`, in registration order.
    fn listeners_on(&self, node: NodeId, kind: EventKind) -> Vec<ListenerId>;
}
