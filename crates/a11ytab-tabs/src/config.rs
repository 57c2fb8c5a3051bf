//! Tab group configuration
//!
//! `Config` is the serializable option set (camelCase keys when loaded from
//! JSON). It is resolved once, at construction, into a [`ResolvedConfig`]
//! with parsed selectors and validated class names.

use a11ytab_dom::Selector;
use serde::{Deserialize, Serialize};

use crate::error::TabError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Element(s) receiving `role="tablist"`; the group root when nothing matches
    pub trigger_container_selector: String,
    /// Wrappers around each trigger receiving `role="presentation"`
    pub trigger_item_selector: String,
    /// The clickable, focusable triggers
    pub trigger_selector: String,
    /// Trigger attribute holding the `#id` of its panel
    pub target_attribute: String,
    /// Class added to the selected trigger; also marks the initial selection
    pub tab_selected_class: Option<String>,
    pub tab_unselected_class: Option<String>,
    pub panel_selected_class: Option<String>,
    pub panel_unselected_class: Option<String>,
    /// Element id of the trigger to select on load
    pub initial_trigger: Option<String>,
    /// Move input focus to the initially selected trigger
    pub focus_on_load: bool,
    /// Mirror the selection into the location fragment
    pub hash_navigation: bool,
    /// Dispatch the custom events below on the document
    pub dispatch_events: bool,
    pub after_select_event: Option<String>,
    pub before_deselect_event: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trigger_container_selector: ".a11ytb-list".to_string(),
            trigger_item_selector: ".a11ytb-listitem".to_string(),
            trigger_selector: ".a11ytb-button".to_string(),
            target_attribute: "href".to_string(),
            tab_selected_class: None,
            tab_unselected_class: None,
            panel_selected_class: None,
            panel_unselected_class: None,
            initial_trigger: None,
            focus_on_load: false,
            hash_navigation: false,
            dispatch_events: false,
            after_select_event: Some("a11ytab:afterFocus".to_string()),
            before_deselect_event: Some("a11ytab:beforeBlur".to_string()),
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn resolve(&self) -> Result<ResolvedConfig> {
        let target_attribute = self.target_attribute.trim();
        if target_attribute.is_empty() {
            return Err(TabError::Config("targetAttribute cannot be empty".to_string()));
        }

        let events = if self.dispatch_events {
            Some(EventNames {
                after_select: event_name("afterSelectEvent", &self.after_select_event)?,
                before_deselect: event_name("beforeDeselectEvent", &self.before_deselect_event)?,
            })
        } else {
            None
        };

        Ok(ResolvedConfig {
            container: selector("triggerContainerSelector", &self.trigger_container_selector)?,
            item: selector("triggerItemSelector", &self.trigger_item_selector)?,
            trigger: selector("triggerSelector", &self.trigger_selector)?,
            target_attribute: target_attribute.to_string(),
            tab_classes: ClassPair {
                selected: class_name("tabSelectedClass", &self.tab_selected_class)?,
                unselected: class_name("tabUnselectedClass", &self.tab_unselected_class)?,
            },
            panel_classes: ClassPair {
                selected: class_name("panelSelectedClass", &self.panel_selected_class)?,
                unselected: class_name("panelUnselectedClass", &self.panel_unselected_class)?,
            },
            initial_trigger: self
                .initial_trigger
                .as_deref()
                .map(|id| id.trim_start_matches('#').to_string())
                .filter(|id| !id.is_empty()),
            focus_on_load: self.focus_on_load,
            hash_navigation: self.hash_navigation,
            events,
        })
    }
}

/// Configuration after validation; immutable for the lifetime of a group.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub container: Selector,
    pub item: Selector,
    pub trigger: Selector,
    pub target_attribute: String,
    pub tab_classes: ClassPair,
    pub panel_classes: ClassPair,
    pub initial_trigger: Option<String>,
    pub focus_on_load: bool,
    pub hash_navigation: bool,
    /// `None` when custom events are disabled
    pub events: Option<EventNames>,
}

/// Optional classes toggled on selection changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassPair {
    pub selected: Option<String>,
    pub unselected: Option<String>,
}

impl ClassPair {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.selected
            .as_deref()
            .into_iter()
            .chain(self.unselected.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventNames {
    pub after_select: Option<String>,
    pub before_deselect: Option<String>,
}

fn selector(field: &str, value: &str) -> Result<Selector> {
    Selector::parse(value).map_err(|e| TabError::Config(format!("{field}: {e}")))
}

fn class_name(field: &str, value: &Option<String>) -> Result<Option<String>> {
    match value.as_deref().map(str::trim) {
        None => Ok(None),
        Some("") => Err(TabError::Config(format!("{field} cannot be empty"))),
        Some(class) if class.contains(char::is_whitespace) => Err(TabError::Config(format!(
            "{field} must be a single class name: {class}"
        ))),
        Some(class) => Ok(Some(class.to_string())),
    }
}

fn event_name(field: &str, value: &Option<String>) -> Result<Option<String>> {
    match value.as_deref().map(str::trim) {
        None => Ok(None),
        Some("") => Err(TabError::Config(format!("{field} cannot be empty"))),
        Some(name) => Ok(Some(name.to_string())),
    }
}
