//! Combatant state: identity, resource pools, attributes and status effects.
//!
//! Everything an entity carries during one battle lives here. The pools are
//! only reachable through clamping primitives so `0 <= health <= max_health`
//! and `0 <= mana <= max_mana` hold after every mutation.
mod attributes;
mod entity;
mod resistance;
mod status;

pub use attributes::{Attributes, StatModifier};
pub use entity::{CombatEntity, CombatFlags, EntityId, Role, Team};
pub use resistance::{Element, Resistances};
pub use status::{ControlKind, StatusEffect, StatusEffectKind, StatusEffects};
