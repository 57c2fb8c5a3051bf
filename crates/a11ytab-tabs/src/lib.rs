//! a11ytab tab groups
//!
//! Turns trigger links and content panels into an accessible tab interface:
//! ARIA roles and relations, a roving tabindex, arrow key navigation with
//! wraparound and optional location fragment sync.
//!
//! ```text
//! Detached --initialize--> Active --destroy--> Destroyed
//! ```

mod config;
mod discovery;
mod error;
mod group;
mod hooks;
mod input;
mod state;

pub use config::{ClassPair, Config, EventNames, ResolvedConfig};
pub use discovery::TabTrigger;
pub use error::TabError;
pub use group::{SelectOptions, TabGroup};
pub use hooks::{Hooks, Transition};
pub use input::{resolve_key, Direction};
pub use state::Lifecycle;

pub type Result<T> = std::result::Result<T, TabError>;
