//! Tab group
//!
//! Owns the ordered trigger/panel pairs captured at construction and projects
//! the selection onto the document: roles, relations, `aria-selected`,
//! `aria-hidden`, a roving tabindex and the optional state classes.

use a11ytab_dom::{Document, EventKind, Host, ListenerId, NodeId, UiEvent};
use uuid::Uuid;

use crate::config::{Config, ResolvedConfig};
use crate::discovery::{self, TabTrigger};
use crate::error::TabError;
use crate::hooks::{Hooks, Transition};
use crate::input::{self, Direction};
use crate::state::Lifecycle;
use crate::Result;

const TRIGGER_ATTRIBUTES: &[&str] = &["role", "aria-selected", "aria-controls", "tabindex"];
const PANEL_ATTRIBUTES: &[&str] = &["role", "aria-hidden", "aria-labelledby"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectOptions {
    /// Move input focus to the selected trigger
    pub move_focus: bool,
}

impl SelectOptions {
    pub fn focused() -> Self {
        Self { move_focus: true }
    }
}

pub struct TabGroup<H: Host = Document> {
    host: H,
    root: NodeId,
    config: ResolvedConfig,
    containers: Vec<NodeId>,
    items: Vec<NodeId>,
    triggers: Vec<TabTrigger>,
    /// Parallel to `triggers`; resolved on the first `initialize`
    panels: Vec<NodeId>,
    state: Lifecycle,
    selected: Option<usize>,
    listeners: Vec<ListenerId>,
    /// Triggers that received a generated id
    generated_ids: Vec<NodeId>,
    /// Configured state classes each element carried before initialization
    class_snapshot: Vec<(NodeId, String)>,
    hooks: Hooks,
}

impl<H: Host> TabGroup<H> {
    /// Discover triggers under `root`. Nothing is written to the document.
    pub fn new(host: H, root: NodeId, config: &Config) -> Result<Self> {
        let config = config.resolve()?;
        let found = discovery::discover(&host, root, &config)?;

        tracing::debug!(
            group = %root,
            triggers = found.triggers.len(),
            containers = found.containers.len(),
            "Discovered tab group"
        );

        Ok(Self {
            host,
            root,
            config,
            containers: found.containers,
            items: found.items,
            triggers: found.triggers,
            panels: Vec::new(),
            state: Lifecycle::Detached,
            selected: None,
            listeners: Vec::new(),
            generated_ids: Vec::new(),
            class_snapshot: Vec::new(),
            hooks: Hooks::default(),
        })
    }

    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == Lifecycle::Active
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn triggers(&self) -> &[TabTrigger] {
        &self.triggers
    }

    /// Empty until the group has been initialized.
    pub fn panels(&self) -> &[NodeId] {
        &self.panels
    }

    /// Index of the selected trigger; `None` unless active.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_trigger(&self) -> Option<NodeId> {
        self.selected.map(|i| self.triggers[i].node)
    }

    pub fn selected_panel(&self) -> Option<NodeId> {
        self.selected.and_then(|i| self.panels.get(i).copied())
    }

    pub fn owns_listener(&self, id: ListenerId) -> bool {
        self.listeners.contains(&id)
    }

    /// Apply roles, select the initial trigger and register listeners.
    ///
    /// A no-op when already active. Panels are resolved before anything is
    /// written, so a `Resolution` error leaves the document untouched.
    pub fn initialize(&mut self, preferred: Option<NodeId>) -> Result<()> {
        if self.state.is_terminal() {
            return Err(TabError::InvalidState {
                operation: "initialize",
                state: self.state,
            });
        }
        if self.is_active() {
            tracing::debug!(group = %self.root, "Tab group already initialized");
            return Ok(());
        }

        if self.triggers.is_empty() {
            return Err(TabError::Empty);
        }

        let panels = discovery::resolve_panels(&self.host, &self.triggers)?;
        let initial = discovery::initial_index(&self.host, &self.triggers, &self.config, preferred)?;
        self.panels = panels;

        self.snapshot_classes();
        self.apply_roles()?;
        // Still detached here, so no notifications fire for the first selection
        self.project(initial, self.config.focus_on_load)?;
        self.register_listeners()?;
        self.transition(Lifecycle::Active)?;

        tracing::info!(
            group = %self.root,
            triggers = self.triggers.len(),
            selected = initial,
            "Tab group initialized"
        );

        Ok(())
    }

    /// Remove every attribute, class, id and listener this group added.
    ///
    /// Never fails: removal is best effort and already-missing attributes are
    /// ignored. A group that was never initialized simply becomes destroyed.
    pub fn destroy(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        if self.state == Lifecycle::Detached {
            self.state = Lifecycle::Destroyed;
            return;
        }

        for id in std::mem::take(&mut self.listeners) {
            if !self.host.remove_listener(id) {
                tracing::warn!(group = %self.root, listener = %id, "Listener already removed");
            }
        }

        for &node in self.containers.iter().chain(&self.items) {
            self.best_effort(node, "role", self.host.remove_attribute(node, "role"));
        }
        for trigger in &self.triggers {
            for name in TRIGGER_ATTRIBUTES {
                self.best_effort(trigger.node, name, self.host.remove_attribute(trigger.node, name));
            }
        }
        for &panel in &self.panels {
            for name in PANEL_ATTRIBUTES {
                self.best_effort(panel, name, self.host.remove_attribute(panel, name));
            }
        }

        self.restore_classes();

        for node in std::mem::take(&mut self.generated_ids) {
            self.best_effort(node, "id", self.host.remove_attribute(node, "id"));
        }

        self.selected = None;
        self.state = Lifecycle::Destroyed;
        tracing::info!(group = %self.root, "Tab group destroyed");
    }

    /// Select `trigger`, deselecting every other trigger and panel.
    pub fn select(&mut self, trigger: NodeId, options: SelectOptions) -> Result<()> {
        self.ensure_active("select")?;
        let index =
            discovery::position_of(&self.triggers, trigger).ok_or(TabError::UnknownTrigger(trigger))?;
        self.project(index, options.move_focus)
    }

    pub fn select_index(&mut self, index: usize, options: SelectOptions) -> Result<()> {
        self.ensure_active("select")?;
        let trigger = self
            .triggers
            .get(index)
            .map(|t| t.node)
            .ok_or(TabError::OutOfRange(index))?;
        self.select(trigger, options)
    }

    pub fn select_previous(&mut self) -> Result<()> {
        self.step(Direction::Previous)
    }

    pub fn select_next(&mut self) -> Result<()> {
        self.step(Direction::Next)
    }

    /// Select `trigger` and move input focus to it. Without a trigger the
    /// current selection is re-applied and focused.
    pub fn focus(&mut self, trigger: Option<NodeId>) -> Result<()> {
        self.ensure_active("focus")?;
        match trigger {
            Some(node) => self.select(node, SelectOptions::focused()),
            None => {
                let index = self.selected.ok_or(TabError::NoSelection)?;
                self.project(index, true)
            }
        }
    }

    /// Follow an external location change (back/forward navigation).
    ///
    /// Returns true when the selection changed.
    pub fn sync_with_location(&mut self) -> Result<bool> {
        if !self.is_active() || !self.config.hash_navigation {
            return Ok(false);
        }

        let Some(hash) = self.host.location_hash() else {
            return Ok(false);
        };

        match self
            .triggers
            .iter()
            .position(|t| t.target.as_deref() == Some(hash.as_str()))
        {
            Some(index) if Some(index) != self.selected => {
                self.project(index, false)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Entry point for events delivered to this group's listeners.
    ///
    /// `current_target` must be one of the triggers; anything else is ignored.
    pub fn handle_event(&mut self, event: &mut UiEvent) -> Result<()> {
        if !self.is_active() {
            tracing::debug!(group = %self.root, state = %self.state, "Ignoring event");
            return Ok(());
        }

        let Some(index) = discovery::position_of(&self.triggers, event.current_target()) else {
            return Ok(());
        };

        match event.kind() {
            EventKind::Click => self.on_click(index, event),
            EventKind::KeyDown => self.on_key_down(event),
        }
    }

    fn on_click(&mut self, index: usize, event: &mut UiEvent) -> Result<()> {
        let modifiers = event.modifiers();
        if modifiers.meta || modifiers.alt {
            return Ok(());
        }

        event.prevent_default();
        self.project(index, true)
    }

    fn on_key_down(&mut self, event: &mut UiEvent) -> Result<()> {
        match input::resolve_key(event) {
            Some(direction) => {
                event.prevent_default();
                self.step(direction)
            }
            None => Ok(()),
        }
    }

    fn step(&mut self, direction: Direction) -> Result<()> {
        self.ensure_active(match direction {
            Direction::Previous => "select previous",
            Direction::Next => "select next",
        })?;

        let current = self.marked_index()?;
        let target = input::step(current, self.triggers.len(), direction);
        self.project(target, true)
    }

    /// Index of the trigger carrying `aria-selected="true"` in the document.
    fn marked_index(&self) -> Result<usize> {
        self.triggers
            .iter()
            .position(|t| self.host.attribute(t.node, "aria-selected").as_deref() == Some("true"))
            .ok_or(TabError::NoSelection)
    }

    fn ensure_active(&self, operation: &'static str) -> Result<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(TabError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }

    fn transition(&mut self, next: Lifecycle) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(TabError::InvalidState {
                operation: next.as_str(),
                state: self.state,
            });
        }

        tracing::debug!(group = %self.root, from = %self.state, to = %next, "Tab group state transition");
        self.state = next;
        Ok(())
    }

    fn snapshot_classes(&mut self) {
        let mut snapshot = Vec::new();
        for trigger in &self.triggers {
            for class in self.config.tab_classes.iter() {
                if self.host.has_class(trigger.node, class) {
                    snapshot.push((trigger.node, class.to_string()));
                }
            }
        }
        for &panel in &self.panels {
            for class in self.config.panel_classes.iter() {
                if self.host.has_class(panel, class) {
                    snapshot.push((panel, class.to_string()));
                }
            }
        }
        self.class_snapshot = snapshot;
    }

    fn restore_classes(&self) {
        let pairs = self
            .triggers
            .iter()
            .map(|t| (t.node, &self.config.tab_classes))
            .chain(self.panels.iter().map(|&p| (p, &self.config.panel_classes)));

        for (node, classes) in pairs {
            for class in classes.iter() {
                let had_class = self
                    .class_snapshot
                    .iter()
                    .any(|(n, c)| *n == node && c == class);
                let result = if had_class {
                    self.host.add_class(node, class)
                } else {
                    self.host.remove_class(node, class)
                };
                self.best_effort(node, class, result);
            }
        }
    }

    fn apply_roles(&mut self) -> Result<()> {
        for &container in &self.containers {
            self.host.set_attribute(container, "role", "tablist")?;
        }
        for &item in &self.items {
            self.host.set_attribute(item, "role", "presentation")?;
        }

        let mut generated = Vec::new();
        for (trigger, &panel) in self.triggers.iter().zip(&self.panels) {
            let panel_id = trigger.panel_id().unwrap_or_default();
            self.host.set_attribute(trigger.node, "role", "tab")?;
            self.host.set_attribute(trigger.node, "aria-controls", panel_id)?;
            self.host.set_attribute(trigger.node, "aria-selected", "false")?;
            self.host.set_attribute(trigger.node, "tabindex", "-1")?;

            let label = match self.host.attribute(trigger.node, "id") {
                Some(id) => id,
                None => {
                    let id = format!("a11ytab-tab-{}", Uuid::new_v4().simple());
                    self.host.set_attribute(trigger.node, "id", &id)?;
                    generated.push(trigger.node);
                    id
                }
            };

            self.host.set_attribute(panel, "role", "tabpanel")?;
            self.host.set_attribute(panel, "aria-hidden", "true")?;
            self.host.set_attribute(panel, "aria-labelledby", &label)?;
        }
        self.generated_ids = generated;

        Ok(())
    }

    fn register_listeners(&mut self) -> Result<()> {
        let mut listeners = Vec::with_capacity(self.triggers.len() * 2);
        for trigger in &self.triggers {
            listeners.push(self.host.add_listener(trigger.node, EventKind::Click)?);
            listeners.push(self.host.add_listener(trigger.node, EventKind::KeyDown)?);
        }
        self.listeners = listeners;
        Ok(())
    }

    /// Full deselect-then-select pass for `index`.
    fn project(&mut self, index: usize, move_focus: bool) -> Result<()> {
        let notify = self.is_active();
        let transition = Transition {
            from: self.selected,
            to: index,
        };

        self.deselect_triggers()?;
        if notify {
            self.notify_before_deselect(&transition)?;
        }

        self.select_trigger(index, move_focus)?;
        self.deselect_panels()?;
        self.reveal_panel(index)?;
        self.selected = Some(index);

        if notify {
            if self.config.hash_navigation {
                if let Some(target) = &self.triggers[index].target {
                    self.host.set_location_hash(target)?;
                }
            }
            self.notify_after_select(&transition)?;
        }

        tracing::debug!(
            group = %self.root,
            from = ?transition.from,
            to = transition.to,
            focus = move_focus,
            "Selected tab"
        );

        Ok(())
    }

    fn deselect_triggers(&self) -> Result<()> {
        let classes = &self.config.tab_classes;
        for trigger in &self.triggers {
            if let Some(class) = &classes.selected {
                self.host.remove_class(trigger.node, class)?;
            }
            if let Some(class) = &classes.unselected {
                self.host.add_class(trigger.node, class)?;
            }
            self.host.set_attribute(trigger.node, "tabindex", "-1")?;
            self.host.set_attribute(trigger.node, "aria-selected", "false")?;
        }
        Ok(())
    }

    fn select_trigger(&self, index: usize, move_focus: bool) -> Result<()> {
        let node = self.triggers[index].node;
        let classes = &self.config.tab_classes;

        if let Some(class) = &classes.unselected {
            self.host.remove_class(node, class)?;
        }
        if let Some(class) = &classes.selected {
            self.host.add_class(node, class)?;
        }
        if move_focus {
            self.host.focus(node)?;
        }
        self.host.set_attribute(node, "tabindex", "0")?;
        self.host.set_attribute(node, "aria-selected", "true")?;
        Ok(())
    }

    fn deselect_panels(&self) -> Result<()> {
        let classes = &self.config.panel_classes;
        for &panel in &self.panels {
            if let Some(class) = &classes.selected {
                self.host.remove_class(panel, class)?;
            }
            if let Some(class) = &classes.unselected {
                self.host.add_class(panel, class)?;
            }
            self.host.set_attribute(panel, "aria-hidden", "true")?;
        }
        Ok(())
    }

    fn reveal_panel(&self, index: usize) -> Result<()> {
        let panel = self.panels[index];
        let classes = &self.config.panel_classes;

        if let Some(class) = &classes.unselected {
            self.host.remove_class(panel, class)?;
        }
        if let Some(class) = &classes.selected {
            self.host.add_class(panel, class)?;
        }
        self.host.set_attribute(panel, "aria-hidden", "false")?;
        Ok(())
    }

    fn notify_before_deselect(&mut self, transition: &Transition) -> Result<()> {
        if let Some(name) = self
            .config
            .events
            .as_ref()
            .and_then(|e| e.before_deselect.as_deref())
        {
            self.host.dispatch_custom_event(name)?;
        }
        self.hooks.fire_before_deselect(transition);
        Ok(())
    }

    fn notify_after_select(&mut self, transition: &Transition) -> Result<()> {
        if let Some(name) = self
            .config
            .events
            .as_ref()
            .and_then(|e| e.after_select.as_deref())
        {
            self.host.dispatch_custom_event(name)?;
        }
        self.hooks.fire_after_select(transition);
        Ok(())
    }

    fn best_effort(&self, node: NodeId, what: &str, result: a11ytab_dom::Result<()>) {
        if let Err(e) = result {
            tracing::warn!(group = %self.root, node = %node, what = %what, error = %e, "Teardown step failed");
        }
    }
}

impl<H: Host> std::fmt::Debug for TabGroup<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabGroup")
            .field("root", &self.root)
            .field("state", &self.state)
            .field("triggers", &self.triggers.len())
            .field("selected", &self.selected)
            .finish()
    }
}
