//! In-memory document
//!
//! A small element tree implementing [`Host`]. Clones are cheap handles to
//! the same shared tree, so the page and every component attached to it see
//! the same state.

use parking_lot::Mutex;
use percent_encoding::percent_decode_str;
use scraper::{ElementRef, Html};
use std::sync::Arc;
use url::Url;

use crate::element::ElementNode;
use crate::error::DomError;
use crate::event::{DispatchedEvent, EventKind, ListenerId};
use crate::host::Host;
use crate::node::{ElementData, Node, NodeData, NodeId};
use crate::selector::Selector;
use crate::Result;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

#[derive(Clone)]
pub struct Document {
    tree: Arc<Mutex<Tree>>,
}

struct Tree {
    nodes: Vec<Node>,
    body: NodeId,
    /// `None` until a location is set; behaves like `about:blank`.
    location: Option<Url>,
    focused: Option<NodeId>,
    listeners: Vec<Listener>,
    next_listener: u64,
    dispatched: Vec<DispatchedEvent>,
}

struct Listener {
    id: ListenerId,
    node: NodeId,
    kind: EventKind,
}

impl Document {
    pub fn new() -> Self {
        let body = Node {
            parent: None,
            children: Vec::new(),
            data: NodeData::Element(ElementData::new("body")),
        };

        Self {
            tree: Arc::new(Mutex::new(Tree {
                nodes: vec![body],
                body: NodeId(0),
                location: None,
                focused: None,
                listeners: Vec::new(),
                next_listener: 1,
                dispatched: Vec::new(),
            })),
        }
    }

    /// Parse an HTML fragment and import it under `body`.
    pub fn parse_html(markup: &str) -> Self {
        let html = Html::parse_fragment(markup);
        if !html.errors.is_empty() {
            tracing::debug!(errors = html.errors.len(), "HTML fragment parsed with recoverable errors");
        }

        let document = Self::new();
        {
            let mut tree = document.tree.lock();
            let body = tree.body;
            for child in html.root_element().children() {
                if let Some(element) = ElementRef::wrap(child) {
                    import_element(&mut tree, body, element);
                } else if let Some(text) = child.value().as_text() {
                    tree.insert(Some(body), NodeData::Text((&**text).to_owned()));
                }
            }
        }

        document
    }

    /// Replace the location URL, e.g. `https://example.com/page#panel-2`.
    pub fn with_location(self, location: &str) -> Result<Self> {
        let url = Url::parse(location)?;
        self.tree.lock().location = Some(url);
        Ok(self)
    }

    pub fn location(&self) -> Option<Url> {
        self.tree.lock().location.clone()
    }

    pub fn body(&self) -> NodeId {
        self.tree.lock().body
    }

    /// Create a detached element.
    pub fn create_element(&self, tag: &str) -> NodeId {
        self.tree
            .lock()
            .insert(None, NodeData::Element(ElementData::new(tag)))
    }

    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<()> {
        let mut tree = self.tree.lock();
        tree.element(parent)?;
        tree.node(child)?;
        if tree.is_inclusive_ancestor(child, parent) {
            return Err(DomError::Hierarchy { parent, child });
        }
        let previous = tree.nodes[child.0].parent;
        if let Some(previous) = previous {
            tree.nodes[previous.0].children.retain(|c| *c != child);
        }
        tree.nodes[child.0].parent = Some(parent);
        tree.nodes[parent.0].children.push(child);
        Ok(())
    }

    /// Create an element with `attributes` and append it to `parent`.
    pub fn append_element(
        &self,
        parent: NodeId,
        tag: &str,
        attributes: &[(&str, &str)],
    ) -> Result<NodeId> {
        let mut data = ElementData::new(tag);
        for (name, value) in attributes {
            data.set_attribute(name, value);
        }

        let mut tree = self.tree.lock();
        tree.element(parent)?;
        Ok(tree.insert(Some(parent), NodeData::Element(data)))
    }

    pub fn append_text(&self, parent: NodeId, text: &str) -> Result<NodeId> {
        let mut tree = self.tree.lock();
        tree.element(parent)?;
        Ok(tree.insert(Some(parent), NodeData::Text(text.to_string())))
    }

    pub fn tag_name(&self, node: NodeId) -> Option<String> {
        let tree = self.tree.lock();
        tree.element(node).ok().map(|el| el.tag.clone())
    }

    pub fn outer_html(&self, node: NodeId) -> Result<String> {
        let tree = self.tree.lock();
        let mut out = String::new();
        tree.serialize(node, &mut out)?;
        Ok(out)
    }

    pub fn inner_html(&self, node: NodeId) -> Result<String> {
        let tree = self.tree.lock();
        let mut out = String::new();
        for &child in &tree.node(node)?.children {
            tree.serialize(child, &mut out)?;
        }
        Ok(out)
    }

    /// Custom events dispatched so far, oldest first.
    pub fn dispatched_events(&self) -> Vec<DispatchedEvent> {
        self.tree.lock().dispatched.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.tree.lock().listeners.len()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tree = self.tree.lock();
        f.debug_struct("Document")
            .field("nodes", &tree.nodes.len())
            .field("location", &tree.location.as_ref().map(Url::as_str))
            .field("listeners", &tree.listeners.len())
            .finish()
    }
}

impl Host for Document {
    fn query_all(&self, scope: NodeId, selector: &Selector) -> Result<Vec<NodeId>> {
        let tree = self.tree.lock();
        tree.node(scope)?;

        let candidates = tree
            .descendants(scope)
            .into_iter()
            .filter_map(|id| ElementNode::new(&tree.nodes, id));

        Ok(selector
            .filter(candidates)
            .into_iter()
            .map(|element| element.id())
            .collect())
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let tree = self.tree.lock();
        let body = tree.body;
        tree.descendants(body).into_iter().find(|&node| {
            matches!(&tree.nodes[node.0].data, NodeData::Element(el) if el.attribute("id") == Some(id))
        })
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.tree.lock().node(node).ok().and_then(|n| n.parent)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        let tree = self.tree.lock();
        tree.element(node)
            .ok()
            .and_then(|el| el.attribute(name).map(str::to_string))
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> Result<()> {
        self.tree.lock().element_mut(node)?.set_attribute(name, value);
        Ok(())
    }

    fn remove_attribute(&self, node: NodeId, name: &str) -> Result<()> {
        self.tree.lock().element_mut(node)?.remove_attribute(name);
        Ok(())
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        let tree = self.tree.lock();
        tree.element(node).map(|el| el.has_class(class)).unwrap_or(false)
    }

    fn add_class(&self, node: NodeId, class: &str) -> Result<()> {
        self.tree.lock().element_mut(node)?.add_class(class);
        Ok(())
    }

    fn remove_class(&self, node: NodeId, class: &str) -> Result<()> {
        self.tree.lock().element_mut(node)?.remove_class(class);
        Ok(())
    }

    fn focus(&self, node: NodeId) -> Result<()> {
        let mut tree = self.tree.lock();
        tree.element(node)?;
        tree.focused = Some(node);
        Ok(())
    }

    fn focused(&self) -> Option<NodeId> {
        self.tree.lock().focused
    }

    fn location_hash(&self) -> Option<String> {
        let tree = self.tree.lock();
        tree.location
            .as_ref()
            .and_then(Url::fragment)
            .filter(|f| !f.is_empty())
            .map(|f| format!("#{}", percent_decode_str(f).decode_utf8_lossy()))
    }

    fn set_location_hash(&self, hash: &str) -> Result<()> {
        let fragment = hash.strip_prefix('#').unwrap_or(hash);
        let mut tree = self.tree.lock();
        let mut location = match tree.location.take() {
            Some(location) => location,
            None => Url::parse("about:blank")?,
        };
        if fragment.is_empty() {
            location.set_fragment(None);
        } else {
            location.set_fragment(Some(fragment));
        }
        tree.location = Some(location);
        Ok(())
    }

    fn dispatch_custom_event(&self, name: &str) -> Result<()> {
        tracing::trace!(event = %name, "Dispatching custom event");
        self.tree.lock().dispatched.push(DispatchedEvent::new(name));
        Ok(())
    }

    fn add_listener(&self, node: NodeId, kind: EventKind) -> Result<ListenerId> {
        let mut tree = self.tree.lock();
        tree.element(node)?;
        let id = ListenerId(tree.next_listener);
        tree.next_listener += 1;
        tree.listeners.push(Listener { id, node, kind });
        Ok(id)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        let mut tree = self.tree.lock();
        let before = tree.listeners.len();
        tree.listeners.retain(|l| l.id != id);
        tree.listeners.len() != before
    }

    fn listeners_on(&self, node: NodeId, kind: EventKind) -> Vec<ListenerId> {
        self.tree
            .lock()
            .listeners
            .iter()
            .filter(|l| l.node == node && l.kind == kind)
            .map(|l| l.id)
            .collect()
    }
}

impl Tree {
    fn insert(&mut self, parent: Option<NodeId>, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            data,
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id.0).ok_or(DomError::UnknownNode(id))
    }

    fn element(&self, id: NodeId) -> Result<&ElementData> {
        match &self.node(id)?.data {
            NodeData::Element(el) => Ok(el),
            NodeData::Text(_) => Err(DomError::NotAnElement(id)),
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData> {
        let node = self.nodes.get_mut(id.0).ok_or(DomError::UnknownNode(id))?;
        match &mut node.data {
            NodeData::Element(el) => Ok(el),
            NodeData::Text(_) => Err(DomError::NotAnElement(id)),
        }
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id.0).and_then(|n| n.parent);
        }
        false
    }

    /// Pre-order descendants of `scope`, excluding `scope`.
    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match self.nodes.get(scope.0) {
            Some(node) => node.children.iter().rev().copied().collect(),
            None => return out,
        };

        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    fn serialize(&self, id: NodeId, out: &mut String) -> Result<()> {
        match &self.node(id)?.data {
            NodeData::Text(text) => escape_into(text, false, out),
            NodeData::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for (name, value) in &el.attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_into(value, true, out);
                    out.push('"');
                }
                out.push('>');

                if VOID_ELEMENTS.contains(&el.tag.as_str()) {
                    return Ok(());
                }

                for &child in &self.nodes[id.0].children {
                    self.serialize(child, out)?;
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
        Ok(())
    }
}

fn import_element(tree: &mut Tree, parent: NodeId, element: ElementRef<'_>) {
    let source = element.value();
    let mut data = ElementData::new(source.name());
    for (name, value) in source.attrs() {
        data.set_attribute(name, value);
    }

    let id = tree.insert(Some(parent), NodeData::Element(data));
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            import_element(tree, id, child_element);
        } else if let Some(text) = child.value().as_text() {
            tree.insert(Some(id), NodeData::Text((&**text).to_owned()));
        }
    }
}

fn escape_into(input: &str, attribute: bool, out: &mut String) {
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MARKUP: &str = r##"<div id="tabs"><ul class="a11ytb-list"><li class="a11ytb-listitem"><a class="a11ytb-button" href="#p0" id="t0">One</a></li></ul><div class="a11ytb-panel" id="p0">First &amp; only</div></div>"##;

    #[test]
    fn test_parse_and_serialize_round_trip() {
        let doc = Document::parse_html(MARKUP);
        assert_eq!(doc.inner_html(doc.body()).unwrap(), MARKUP);
    }

    #[test]
    fn test_query_all_in_document_order() {
        let doc = Document::parse_html(
            r#"<div id="root"><a class="tab" id="a"></a><span><a class="tab" id="b"></a></span><a class="tab" id="c"></a></div>"#,
        );
        let root = doc.element_by_id("root").unwrap();
        let sel = Selector::parse(".tab").unwrap();

        let found: Vec<String> = doc
            .query_all(root, &sel)
            .unwrap()
            .into_iter()
            .filter_map(|n| doc.attribute(n, "id"))
            .collect();
        assert_eq!(found, vec!["a", "b", "c"]);

        // The scope itself never matches
        let self_sel = Selector::parse("#root").unwrap();
        assert!(doc.query_all(root, &self_sel).unwrap().is_empty());
    }

    #[test]
    fn test_attributes_and_classes() {
        let doc = Document::parse_html(MARKUP);
        let tab = doc.element_by_id("t0").unwrap();

        doc.set_attribute(tab, "aria-selected", "true").unwrap();
        assert_eq!(doc.attribute(tab, "aria-selected").as_deref(), Some("true"));

        doc.add_class(tab, "is-active").unwrap();
        assert!(doc.has_class(tab, "is-active"));
        doc.remove_class(tab, "is-active").unwrap();
        assert!(!doc.has_class(tab, "is-active"));

        doc.remove_attribute(tab, "aria-selected").unwrap();
        // Removing twice is fine
        doc.remove_attribute(tab, "aria-selected").unwrap();
        assert!(doc.attribute(tab, "aria-selected").is_none());
        assert_eq!(doc.inner_html(doc.body()).unwrap(), MARKUP);
    }

    #[test]
    fn test_location_hash() {
        let doc = Document::new()
            .with_location("https://example.com/docs#p1")
            .unwrap();
        assert_eq!(doc.location_hash().as_deref(), Some("#p1"));

        doc.set_location_hash("p2").unwrap();
        assert_eq!(doc.location_hash().as_deref(), Some("#p2"));
        assert_eq!(
            doc.location().unwrap().as_str(),
            "https://example.com/docs#p2"
        );

        let blank = Document::new();
        assert!(blank.location_hash().is_none());
        blank.set_location_hash("#p0").unwrap();
        assert_eq!(blank.location_hash().as_deref(), Some("#p0"));

        doc.set_location_hash("#").unwrap();
        assert!(doc.location_hash().is_none());
    }

    #[test]
    fn test_listener_registry() {
        let doc = Document::new();
        let button = doc
            .append_element(doc.body(), "button", &[("id", "b")])
            .unwrap();

        let click = doc.add_listener(button, EventKind::Click).unwrap();
        let key = doc.add_listener(button, EventKind::KeyDown).unwrap();
        assert_eq!(doc.listeners_on(button, EventKind::Click), vec![click]);
        assert_eq!(doc.listener_count(), 2);

        assert!(doc.remove_listener(click));
        assert!(!doc.remove_listener(click));
        assert!(doc.listeners_on(button, EventKind::Click).is_empty());
        assert_eq!(doc.listeners_on(button, EventKind::KeyDown), vec![key]);
    }

    #[test]
    fn test_unknown_and_text_nodes() {
        let doc = Document::new();
        let text = doc.append_text(doc.body(), "hello").unwrap();

        assert!(matches!(
            doc.set_attribute(text, "id", "x"),
            Err(DomError::NotAnElement(_))
        ));
        assert!(matches!(
            doc.focus(NodeId(99)),
            Err(DomError::UnknownNode(_))
        ));
        assert_eq!(doc.inner_html(doc.body()).unwrap(), "hello");
    }

    #[test]
    fn test_custom_events_and_focus() {
        let doc = Document::parse_html(MARKUP);
        let tab = doc.element_by_id("t0").unwrap();

        doc.focus(tab).unwrap();
        assert_eq!(doc.focused(), Some(tab));

        doc.dispatch_custom_event("a11ytab:afterFocus").unwrap();
        let events = doc.dispatched_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "a11ytab:afterFocus");
        assert!(events[0].bubbles && events[0].cancelable);
    }

    #[test]
    fn test_location_hash_is_decoded() {
        let doc = Document::new()
            .with_location("https://example.com/cv#r%C3%A9sum%C3%A9")
            .unwrap();
        assert_eq!(doc.location_hash().as_deref(), Some("#résumé"));

        doc.set_location_hash("#données").unwrap();
        assert_eq!(doc.location_hash().as_deref(), Some("#données"));
        assert_eq!(
            doc.location().unwrap().as_str(),
            "https://example.com/cv#donn%C3%A9es"
        );
    }

    #[test]
    fn test_append_child_rejects_cycles() {
        let doc = Document::new();
        let body = doc.body();
        let outer = doc.append_element(body, "div", &[]).unwrap();
        let inner = doc.append_element(outer, "span", &[]).unwrap();

        assert!(matches!(
            doc.append_child(body, body),
            Err(DomError::Hierarchy { .. })
        ));
        assert!(matches!(
            doc.append_child(inner, outer),
            Err(DomError::Hierarchy { .. })
        ));
        assert_eq!(doc.inner_html(body).unwrap(), "<div><span></span></div>");

        // Moving a node under a sibling subtree is fine
        let other = doc.append_element(body, "p", &[]).unwrap();
        doc.append_child(other, inner).unwrap();
        assert_eq!(
            doc.inner_html(body).unwrap(),
            "<div></div><p><span></span></p>"
        );
    }
}
