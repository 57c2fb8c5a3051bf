//! Tab group lifecycle
//!
//! ```text
//! Detached
//!   ↓ initialize
//! Active
//!   ↓ destroy
//! Destroyed (terminal)
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    /// Constructed, nothing applied to the document yet
    Detached,
    /// Attributes applied, listeners registered, one trigger selected
    Active,
    /// Everything removed again; the group must not be reused
    Destroyed,
}

impl Lifecycle {
    pub fn can_transition_to(&self, target: Lifecycle) -> bool {
        match (self, target) {
            (Lifecycle::Detached, Lifecycle::Active) => true,
            (Lifecycle::Active, Lifecycle::Destroyed) => true,
            // Tearing down a group that was never initialized
            (Lifecycle::Detached, Lifecycle::Destroyed) => true,
            (a, b) if *a == b => true,
            _ => false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Lifecycle::Destroyed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Lifecycle::Detached => "detached",
            Lifecycle::Active => "active",
            Lifecycle::Destroyed => "destroyed",
        }
    }
}

impl std::fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Lifecycle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "detached" => Ok(Lifecycle::Detached),
            "active" => Ok(Lifecycle::Active),
            "destroyed" => Ok(Lifecycle::Destroyed),
            _ => Err(format!("Unknown lifecycle state: {}", s)),
        }
    }
}
