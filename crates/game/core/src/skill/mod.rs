//! Skill definitions, the static registry, and per-battle cooldown state.
//!
//! Skills are immutable data loaded once and shared between battles (the
//! registry is usually wrapped in an `Arc`). Cooldown expiry is mutable
//! per-battle data and lives in [`CooldownTracker`], keyed by
//! `(EntityId, SkillId)`.

mod cooldown;
mod definition;
mod registry;

pub use cooldown::CooldownTracker;
pub use definition::{Skill, SkillId, TargetType};
pub use registry::{SkillError, SkillRegistry};
