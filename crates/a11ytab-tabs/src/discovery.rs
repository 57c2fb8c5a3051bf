//! Element discovery
//!
//! Locates the tablist container(s), item wrappers and triggers under a root
//! and pairs every trigger with the panel its target reference points at.

use a11ytab_dom::{Host, NodeId};

use crate::config::ResolvedConfig;
use crate::error::TabError;
use crate::Result;

/// A trigger and the panel reference it declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabTrigger {
    pub node: NodeId,
    /// Raw value of the target attribute, e.g. `#panel-1`
    pub target: Option<String>,
}

impl TabTrigger {
    /// Panel element id referenced by this trigger.
    pub fn panel_id(&self) -> Option<&str> {
        self.target
            .as_deref()
            .and_then(|t| t.strip_prefix('#'))
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Discovered {
    pub containers: Vec<NodeId>,
    pub items: Vec<NodeId>,
    pub triggers: Vec<TabTrigger>,
}

pub(crate) fn discover<H: Host>(
    host: &H,
    root: NodeId,
    config: &ResolvedConfig,
) -> Result<Discovered> {
    let mut containers = host.query_all(root, &config.container)?;
    if containers.is_empty() {
        containers.push(root);
    }

    let items = host.query_all(root, &config.item)?;
    let triggers = host
        .query_all(root, &config.trigger)?
        .into_iter()
        .map(|node| TabTrigger {
            node,
            target: host.attribute(node, &config.target_attribute),
        })
        .collect();

    Ok(Discovered {
        containers,
        items,
        triggers,
    })
}

/// Resolve `panel[i]` for every `trigger[i]`. Touches nothing.
pub(crate) fn resolve_panels<H: Host>(host: &H, triggers: &[TabTrigger]) -> Result<Vec<NodeId>> {
    triggers
        .iter()
        .map(|trigger| {
            trigger
                .panel_id()
                .and_then(|id| host.element_by_id(id))
                .ok_or_else(|| TabError::Resolution {
                    trigger: describe(host, trigger.node),
                    target: trigger.target.clone().unwrap_or_default(),
                })
        })
        .collect()
}

/// Pick the trigger selected on load.
///
/// Precedence: location fragment (hash navigation only), the caller's
/// preferred trigger, the configured initial trigger id, the first trigger
/// already carrying the selected class, then the first trigger.
pub(crate) fn initial_index<H: Host>(
    host: &H,
    triggers: &[TabTrigger],
    config: &ResolvedConfig,
    preferred: Option<NodeId>,
) -> Result<usize> {
    if config.hash_navigation {
        if let Some(hash) = host.location_hash() {
            if let Some(index) = triggers
                .iter()
                .position(|t| t.target.as_deref() == Some(hash.as_str()))
            {
                return Ok(index);
            }
        }
    }

    if let Some(node) = preferred {
        return position_of(triggers, node).ok_or(TabError::UnknownTrigger(node));
    }

    if let Some(id) = &config.initial_trigger {
        let node = host
            .element_by_id(id)
            .ok_or_else(|| TabError::Config(format!("initialTrigger #{id} does not exist")))?;
        return position_of(triggers, node).ok_or(TabError::UnknownTrigger(node));
    }

    if let Some(class) = &config.tab_classes.selected {
        if let Some(index) = triggers.iter().position(|t| host.has_class(t.node, class)) {
            return Ok(index);
        }
    }

    Ok(0)
}

pub(crate) fn position_of(triggers: &[TabTrigger], node: NodeId) -> Option<usize> {
    triggers.iter().position(|t| t.node == node)
}

fn describe<H: Host>(host: &H, node: NodeId) -> String {
    match host.attribute(node, "id") {
        Some(id) => format!("#{id}"),
        None => node.to_string(),
    }
}
