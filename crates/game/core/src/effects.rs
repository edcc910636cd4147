//! Status effect engine: apply, tick, expire and remove effects.
//!
//! Every path that adds an effect instance applies its [`StatModifier`] once,
//! and every path that drops an instance (expiry, cleanse, clear) reverts it
//! once. Refreshing an existing non-stackable effect touches only its
//! duration. Control flags are recomputed after each mutation.
//!
//! [`StatModifier`]: crate::state::StatModifier

use crate::state::{CombatEntity, StatusEffect};

/// How an effect landed on its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusApplication {
    /// First instance with this name.
    Added,
    /// Another instance of a stackable effect.
    Stacked,
    /// Existing non-stackable effect; duration set to the longer of the two.
    Refreshed { duration: u32 },
    /// Target is defeated; nothing changed.
    Ignored,
}

/// Per-effect result of one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectTick {
    pub name: String,
    /// Health actually removed by damage over time.
    pub damage: u32,
    /// Health actually restored by healing over time.
    pub healing: u32,
    /// Remaining duration after the tick.
    pub remaining: u32,
    /// Effect reached zero duration and was removed.
    pub expired: bool,
}

/// Applies and advances status effects on entities.
///
/// Stateless: all effect state lives on the entities themselves.
#[derive(Clone, Copy, Debug, Default)]
pub struct StatusEffectEngine;

impl StatusEffectEngine {
    pub fn new() -> Self {
        Self
    }

    /// Applies an effect to an entity.
    pub fn apply(&self, entity: &mut CombatEntity, effect: &StatusEffect) -> StatusApplication {
        if !entity.is_alive() {
            return StatusApplication::Ignored;
        }

        let application = if effect.stackable {
            let stacked = entity.status_effects().has(&effect.name);
            self.attach(entity, effect.clone());
            if stacked {
                StatusApplication::Stacked
            } else {
                StatusApplication::Added
            }
        } else if let Some(existing) = entity.status_effects_mut().get_mut(&effect.name) {
            existing.duration = existing.duration.max(effect.duration);
            StatusApplication::Refreshed {
                duration: existing.duration,
            }
        } else {
            self.attach(entity, effect.clone());
            StatusApplication::Added
        };

        entity.refresh_control_flags();
        application
    }

    /// Runs one turn of every active effect, in application order.
    ///
    /// Damage and healing over time are applied first, then the duration is
    /// decremented; effects reaching zero have their modifier reverted and
    /// are removed.
    pub fn tick(&self, entity: &mut CombatEntity) -> Vec<EffectTick> {
        let mut ticks = Vec::with_capacity(entity.status_effects().len());

        for index in 0..entity.status_effects().len() {
            let (name, damage_per_turn, healing_per_turn) = {
                let effect = &entity.status_effects_mut().as_mut_slice()[index];
                (
                    effect.name.clone(),
                    effect.damage_per_turn,
                    effect.healing_per_turn,
                )
            };

            let damage = entity.take_damage(damage_per_turn);
            let healing = entity.heal(healing_per_turn);

            let effect = &mut entity.status_effects_mut().as_mut_slice()[index];
            effect.duration = effect.duration.saturating_sub(1);

            ticks.push(EffectTick {
                name,
                damage,
                healing,
                remaining: effect.duration,
                expired: effect.duration == 0,
            });
        }

        let expired = entity
            .status_effects_mut()
            .drain_where(|effect| effect.duration == 0);
        for effect in &expired {
            self.revert(entity, effect);
        }

        entity.refresh_control_flags();
        ticks
    }

    /// Removes every instance of the named effect (cleanse), reverting their
    /// modifiers. Returns the removed instances.
    pub fn remove(&self, entity: &mut CombatEntity, name: &str) -> Vec<StatusEffect> {
        let removed = entity
            .status_effects_mut()
            .drain_where(|effect| effect.name == name);
        for effect in &removed {
            self.revert(entity, effect);
        }
        entity.refresh_control_flags();
        removed
    }

    /// Removes every effect, reverting all modifiers.
    pub fn clear(&self, entity: &mut CombatEntity) -> Vec<StatusEffect> {
        let removed = entity.status_effects_mut().drain_where(|_| true);
        for effect in &removed {
            self.revert(entity, effect);
        }
        entity.refresh_control_flags();
        removed
    }

    fn attach(&self, entity: &mut CombatEntity, effect: StatusEffect) {
        if let Some(modifier) = &effect.modifier {
            entity.attributes_mut().apply_modifier(modifier);
        }
        entity.status_effects_mut().push(effect);
    }

    fn revert(&self, entity: &mut CombatEntity, effect: &StatusEffect) {
        if let Some(modifier) = &effect.modifier {
            entity.attributes_mut().revert_modifier(modifier);
        }
    }
}
