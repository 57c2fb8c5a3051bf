//! Selection change notifications

use serde::{Deserialize, Serialize};

/// A selection change, as trigger indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: Option<usize>,
    pub to: usize,
}

pub type Callback = Box<dyn FnMut(&Transition)>;

/// Callbacks run synchronously once the group is active.
#[derive(Default)]
pub struct Hooks {
    before_deselect: Option<Callback>,
    after_select: Option<Callback>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs after every trigger has been deselected, before the new one is selected.
    pub fn before_deselect<F>(mut self, f: F) -> Self
    where
        F: FnMut(&Transition) + 'static,
    {
        self.before_deselect = Some(Box::new(f));
        self
    }

    /// Runs once the new trigger is selected and its panel revealed.
    pub fn after_select<F>(mut self, f: F) -> Self
    where
        F: FnMut(&Transition) + 'static,
    {
        self.after_select = Some(Box::new(f));
        self
    }

    pub(crate) fn fire_before_deselect(&mut self, transition: &Transition) {
        if let Some(f) = self.before_deselect.as_mut() {
            f(transition);
        }
    }

    pub(crate) fn fire_after_select(&mut self, transition: &Transition) {
        if let Some(f) = self.after_select.as_mut() {
            f(transition);
        }
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("before_deselect", &self.before_deselect.is_some())
            .field("after_select", &self.after_select.is_some())
            .finish()
    }
}
