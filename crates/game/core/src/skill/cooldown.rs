use std::collections::HashMap;

use super::SkillId;
use crate::state::EntityId;

/// Per-battle cooldown expiry timestamps keyed by `(entity, skill)`.
#[derive(Clone, Debug, Default)]
pub struct CooldownTracker {
    ready_at: HashMap<(EntityId, SkillId), f64>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Combat-clock time at which the skill becomes available again, if it
    /// was ever put on cooldown.
    pub fn ready_at(&self, entity: EntityId, skill: SkillId) -> Option<f64> {
        self.ready_at.get(&(entity, skill)).copied()
    }

    /// Checks whether the cooldown for `(entity, skill)` has elapsed at `now`.
    pub fn is_ready(&self, entity: EntityId, skill: SkillId, now: f64) -> bool {
        self.ready_at(entity, skill)
            .is_none_or(|ready_at| ready_at <= now)
    }

    /// Records the next-available time for `(entity, skill)`.
    pub fn schedule(&mut self, entity: EntityId, skill: SkillId, ready_at: f64) {
        self.ready_at.insert((entity, skill), ready_at);
    }

    /// Drops every cooldown belonging to an entity.
    pub fn clear_entity(&mut self, entity: EntityId) {
        self.ready_at.retain(|(owner, _), _| *owner != entity);
    }

    pub fn len(&self) -> usize {
        self.ready_at.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ready_at.is_empty()
    }
}
