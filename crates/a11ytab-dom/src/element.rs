//! `selectors::Element` view over the node arena

use scraper::selector::{CssLocalName, CssString, Simple};
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::bloom::BloomFilter;
use selectors::matching::{ElementSelectorFlags, MatchingContext};
use selectors::{Element, OpaqueElement, SelectorImpl};
use std::fmt;

use crate::node::{ElementData, Node, NodeData, NodeId};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

type NamespaceUrl = <Simple as SelectorImpl>::NamespaceUrl;

/// Borrowed element of the arena, matchable by scraper selectors.
#[derive(Clone, Copy)]
pub(crate) struct ElementNode<'a> {
    nodes: &'a [Node],
    id: NodeId,
    data: &'a ElementData,
}

impl<'a> ElementNode<'a> {
    /// `None` for text nodes and unknown ids.
    pub(crate) fn new(nodes: &'a [Node], id: NodeId) -> Option<Self> {
        match &nodes.get(id.0)?.data {
            NodeData::Element(data) => Some(Self { nodes, id, data }),
            NodeData::Text(_) => None,
        }
    }

    pub(crate) fn id(&self) -> NodeId {
        self.id
    }

    fn node(&self) -> &'a Node {
        &self.nodes[self.id.0]
    }

    fn siblings(&self) -> &'a [NodeId] {
        match self.node().parent {
            Some(parent) => &self.nodes[parent.0].children,
            None => &[],
        }
    }

    fn position(&self) -> Option<usize> {
        self.siblings().iter().position(|&id| id == self.id)
    }

    fn first_element<I>(&self, ids: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a NodeId>,
    {
        ids.into_iter()
            .find_map(|&id| ElementNode::new(self.nodes, id))
    }
}

impl fmt::Debug for ElementNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}> {}", self.data.tag, self.id)
    }
}

impl Element for ElementNode<'_> {
    type Impl = Simple;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self.node())
    }

    fn parent_element(&self) -> Option<Self> {
        self.node()
            .parent
            .and_then(|parent| ElementNode::new(self.nodes, parent))
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        let position = self.position()?;
        self.first_element(self.siblings()[..position].iter().rev())
    }

    fn next_sibling_element(&self) -> Option<Self> {
        let position = self.position()?;
        self.first_element(&self.siblings()[position + 1..])
    }

    fn first_element_child(&self) -> Option<Self> {
        self.first_element(&self.node().children)
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, local_name: &CssLocalName) -> bool {
        self.data.tag.as_str() == &*local_name.0
    }

    fn has_namespace(&self, ns: &NamespaceUrl) -> bool {
        &**ns == HTML_NAMESPACE
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.data.tag == other.data.tag
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&NamespaceUrl>,
        local_name: &CssLocalName,
        operation: &AttrSelectorOperation<&CssString>,
    ) -> bool {
        // Imported and scripted attributes never carry a namespace
        if let NamespaceConstraint::Specific(url) = ns {
            if !url.is_empty() {
                return false;
            }
        }

        self.data
            .attribute(&local_name.0)
            .is_some_and(|value| operation.eval_str(value))
    }

    fn match_non_ts_pseudo_class(
        &self,
        _pc: &<Simple as SelectorImpl>::NonTSPseudoClass,
        _context: &mut MatchingContext<'_, Simple>,
    ) -> bool {
        false
    }

    fn match_pseudo_element(
        &self,
        _pe: &<Simple as SelectorImpl>::PseudoElement,
        _context: &mut MatchingContext<'_, Simple>,
    ) -> bool {
        false
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        matches!(self.data.tag.as_str(), "a" | "area") && self.data.attribute("href").is_some()
    }

    fn is_html_slot_element(&self) -> bool {
        self.data.tag == "slot"
    }

    fn has_id(&self, id: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.data
            .attribute("id")
            .is_some_and(|value| case_sensitivity.eq(id.0.as_bytes(), value.as_bytes()))
    }

    fn has_class(&self, name: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.data.attribute("class").is_some_and(|classes| {
            classes
                .split_ascii_whitespace()
                .any(|class| case_sensitivity.eq(name.0.as_bytes(), class.as_bytes()))
        })
    }

    fn has_custom_state(&self, _name: &CssLocalName) -> bool {
        false
    }

    fn imported_part(&self, _name: &CssLocalName) -> Option<CssLocalName> {
        None
    }

    fn is_part(&self, _name: &CssLocalName) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.node().children.iter().all(|&id| match &self.nodes[id.0].data {
            NodeData::Element(_) => false,
            NodeData::Text(text) => text.is_empty(),
        })
    }

    fn is_root(&self) -> bool {
        self.node().parent.is_none()
    }

    fn add_element_unique_hashes(&self, _filter: &mut BloomFilter) -> bool {
        false
    }
}
