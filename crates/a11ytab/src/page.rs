//! Page coordinator
//!
//! Owns the document and every tab group attached to it. UI events enter
//! here and bubble from their target up through its ancestors; each listener
//! found on the way hands the event to the group that registered it.

use a11ytab_dom::{Document, Host, Key, Modifiers, NodeId, Selector, UiEvent};
use a11ytab_tabs::{Config, Lifecycle, TabGroup};
use std::fmt;

use crate::error::CoreError;
use crate::Result;

/// Attribute on a group root holding its JSON options.
pub const OPTIONS_ATTRIBUTE: &str = "data-a11ytab-options";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(usize);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group#{}", self.0)
    }
}

pub struct Page {
    document: Document,
    groups: Vec<TabGroup<Document>>,
}

impl Page {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            groups: Vec::new(),
        }
    }

    pub fn from_html(markup: &str) -> Self {
        Self::new(Document::parse_html(markup))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Build a detached group rooted at `root`.
    pub fn attach(&mut self, root: NodeId, config: &Config) -> Result<GroupId> {
        let group = TabGroup::new(self.document.clone(), root, config)?;
        Ok(self.push(group))
    }

    /// Add a group that was built on this page's document.
    pub fn attach_group(&mut self, group: TabGroup<Document>) -> GroupId {
        self.push(group)
    }

    /// One group per element matching `selector`, all sharing `config`.
    pub fn attach_all(&mut self, selector: &str, config: &Config) -> Result<Vec<GroupId>> {
        let selector = Selector::parse(selector)?;
        let roots = self.document.query_all(self.document.body(), &selector)?;

        roots
            .into_iter()
            .map(|root| self.attach(root, config))
            .collect()
    }

    /// Like [`attach_all`](Self::attach_all), reading each group's options
    /// from its `data-a11ytab-options` JSON attribute (defaults when absent).
    pub fn attach_declared(&mut self, selector: &str) -> Result<Vec<GroupId>> {
        let selector = Selector::parse(selector)?;
        let roots = self.document.query_all(self.document.body(), &selector)?;

        let mut ids = Vec::with_capacity(roots.len());
        for root in roots {
            let config = match self.document.attribute(root, OPTIONS_ATTRIBUTE) {
                Some(json) => serde_json::from_str::<Config>(&json)?,
                None => Config::default(),
            };
            ids.push(self.attach(root, &config)?);
        }
        Ok(ids)
    }

    pub fn group(&self, id: GroupId) -> Option<&TabGroup<Document>> {
        self.groups.get(id.0)
    }

    pub fn group_mut(&mut self, id: GroupId) -> Option<&mut TabGroup<Document>> {
        self.groups.get_mut(id.0)
    }

    pub fn groups(&self) -> impl Iterator<Item = (GroupId, &TabGroup<Document>)> {
        self.groups.iter().enumerate().map(|(i, g)| (GroupId(i), g))
    }

    pub fn initialize(&mut self, id: GroupId, preferred: Option<NodeId>) -> Result<()> {
        let group = self.group_mut(id).ok_or(CoreError::UnknownGroup(id))?;
        Ok(group.initialize(preferred)?)
    }

    /// Initialize every detached group.
    ///
    /// Groups are independent: one failing does not stop the others. The
    /// first error is returned after all groups were attempted.
    pub fn initialize_all(&mut self) -> Result<()> {
        let mut first_error = None;

        for (i, group) in self.groups.iter_mut().enumerate() {
            if group.state() != Lifecycle::Detached {
                continue;
            }
            if let Err(e) = group.initialize(None) {
                tracing::error!(group = %GroupId(i), error = %e, "Failed to initialize tab group");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    pub fn destroy_all(&mut self) {
        for group in &mut self.groups {
            group.destroy();
        }
    }

    /// Returns whether default handling was prevented.
    pub fn click(&mut self, target: NodeId) -> Result<bool> {
        self.dispatch(&mut UiEvent::click(target))
    }

    /// Returns whether default handling was prevented.
    pub fn key_down(&mut self, target: NodeId, key: Key, modifiers: Modifiers) -> Result<bool> {
        self.dispatch(&mut UiEvent::key_down(target, key, modifiers))
    }

    /// Deliver `event` along its bubble path. Returns whether default
    /// handling was prevented.
    pub fn dispatch(&mut self, event: &mut UiEvent) -> Result<bool> {
        tracing::trace!(kind = %event.kind(), target = %event.target(), "Dispatching UI event");

        let mut node = Some(event.target());
        while let Some(current) = node {
            for listener in self.document.listeners_on(current, event.kind()) {
                if let Some(group) = self.groups.iter_mut().find(|g| g.owns_listener(listener)) {
                    event.set_current_target(current);
                    group.handle_event(event)?;
                }
            }
            node = self.document.parent(current);
        }

        Ok(event.is_default_prevented())
    }

    /// Change the location fragment and let hash-navigating groups follow.
    /// Returns the groups whose selection changed.
    pub fn set_location_hash(&mut self, hash: &str) -> Result<Vec<GroupId>> {
        self.document.set_location_hash(hash)?;

        let mut changed = Vec::new();
        for (i, group) in self.groups.iter_mut().enumerate() {
            if group.sync_with_location()? {
                changed.push(GroupId(i));
            }
        }
        Ok(changed)
    }

    fn push(&mut self, group: TabGroup<Document>) -> GroupId {
        let id = GroupId(self.groups.len());
        tracing::debug!(group = %id, root = %group.root(), "Attached tab group");
        self.groups.push(group);
        id
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("document", &self.document)
            .field("groups", &self.groups)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use a11ytab_tabs::TabError;

    const TWO_GROUPS: &str = r##"
        <section class="tabs" id="a">
          <ul class="a11ytb-list">
            <li class="a11ytb-listitem"><a class="a11ytb-button" href="#a0" id="at0"><span id="label">A0</span></a></li>
            <li class="a11ytb-listitem"><a class="a11ytb-button" href="#a1" id="at1">A1</a></li>
          </ul>
          <div id="a0">a0</div><div id="a1">a1</div>
        </section>
        <section class="tabs" data-a11ytab-options='{"tabSelectedClass":"on"}' id="b">
          <ul class="a11ytb-list">
            <li class="a11ytb-listitem"><a class="a11ytb-button" href="#b0" id="bt0">B0</a></li>
            <li class="a11ytb-listitem"><a class="a11ytb-button" href="#b1" id="bt1">B1</a></li>
            <li class="a11ytb-listitem"><a class="a11ytb-button" href="#b2" id="bt2">B2</a></li>
          </ul>
          <div id="b0">b0</div><div id="b1">b1</div><div id="b2">b2</div>
        </section>"##;

    fn node(page: &Page, id: &str) -> NodeId {
        page.document().element_by_id(id).unwrap()
    }

    #[test]
    fn test_groups_are_independent() {
        let mut page = Page::from_html(TWO_GROUPS);
        let ids = page.attach_all(".tabs", &Config::default()).unwrap();
        assert_eq!(ids.len(), 2);
        page.initialize_all().unwrap();

        let bt0 = node(&page, "bt0");
        assert!(page.key_down(bt0, Key::ArrowLeft, Modifiers::NONE).unwrap());

        assert_eq!(page.group(ids[0]).unwrap().selected(), Some(0));
        assert_eq!(page.group(ids[1]).unwrap().selected(), Some(2));
    }

    #[test]
    fn test_click_bubbles_from_descendant() {
        let mut page = Page::from_html(TWO_GROUPS);
        let ids = page.attach_all(".tabs", &Config::default()).unwrap();
        page.initialize_all().unwrap();

        let at1 = node(&page, "at1");
        assert!(page.click(at1).unwrap());
        assert_eq!(page.group(ids[0]).unwrap().selected(), Some(1));

        // Clicking the span inside the first trigger reaches its listener
        let label = node(&page, "label");
        assert!(page.click(label).unwrap());
        assert_eq!(page.group(ids[0]).unwrap().selected(), Some(0));
    }

    #[test]
    fn test_events_after_destroy_are_not_routed() {
        let mut page = Page::from_html(TWO_GROUPS);
        page.attach_all(".tabs", &Config::default()).unwrap();
        page.initialize_all().unwrap();
        page.destroy_all();

        assert_eq!(page.document().listener_count(), 0);
        let at1 = node(&page, "at1");
        assert!(!page.click(at1).unwrap());
    }

    #[test]
    fn test_attach_declared_reads_options() {
        let mut page = Page::from_html(TWO_GROUPS);
        let ids = page.attach_declared(".tabs").unwrap();
        page.initialize_all().unwrap();

        let a = page.group(ids[0]).unwrap();
        let b = page.group(ids[1]).unwrap();
        assert!(a.config().tab_classes.selected.is_none());
        assert_eq!(b.config().tab_classes.selected.as_deref(), Some("on"));
        assert!(page.document().has_class(node(&page, "bt0"), "on"));
    }

    #[test]
    fn test_attach_declared_rejects_bad_json() {
        let mut page = Page::from_html(
            r#"<div class="tabs" data-a11ytab-options="{not json"><a class="a11ytb-button" href="x">x</a></div>"#,
        );
        assert!(matches!(
            page.attach_declared(".tabs"),
            Err(CoreError::Serialization(_))
        ));
    }

    #[test]
    fn test_initialize_all_continues_past_failures() {
        let markup = TWO_GROUPS.replace(r##"href="#a1""##, r##"href="#gone""##);
        let mut page = Page::from_html(&markup);
        let ids = page.attach_all(".tabs", &Config::default()).unwrap();

        assert!(matches!(
            page.initialize_all(),
            Err(CoreError::Tab(TabError::Resolution { .. }))
        ));
        assert!(!page.group(ids[0]).unwrap().is_active());
        assert!(page.group(ids[1]).unwrap().is_active());
    }

    #[test]
    fn test_location_hash_drives_hash_navigating_groups() {
        let mut page = Page::from_html(TWO_GROUPS);
        let config = Config {
            hash_navigation: true,
            ..Config::default()
        };
        let a = page.attach(node(&page, "a"), &config).unwrap();
        let b = page.attach(node(&page, "b"), &Config::default()).unwrap();
        page.initialize_all().unwrap();

        assert_eq!(page.set_location_hash("#a1").unwrap(), vec![a]);
        assert_eq!(page.group(a).unwrap().selected(), Some(1));
        assert_eq!(page.group(b).unwrap().selected(), Some(0));

        assert!(matches!(
            page.initialize(GroupId(9), None),
            Err(CoreError::UnknownGroup(_))
        ));
    }
}
