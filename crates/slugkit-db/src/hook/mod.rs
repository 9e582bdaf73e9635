//! The pre-save slug hook and the pieces it is built from.

pub mod change;
pub mod registry;
pub mod resolver;
pub mod scope;
pub mod slug_hook;
pub mod source;

pub use registry::HookRegistry;
pub use resolver::{CollisionPolicy, Resolution};
pub use scope::Scope;
pub use slug_hook::{HookOptions, SlugHook, SlugOutcome};
