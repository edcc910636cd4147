//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! the battle loop and provider implementations can stay focused on their own
//! concerns.

pub mod errors;
pub mod providers;
pub mod registry;

pub use errors::{ProviderKind, Result, RuntimeError};
pub use providers::{ActionProvider, PassActionProvider};
pub use registry::ProviderRegistry;
