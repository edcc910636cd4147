//! Provider that replays a fixed list of decisions.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use combat_core::{CombatAction, CombatContext, EntityId};
use tokio::sync::Mutex;

use crate::api::{ActionProvider, Result};

/// Hands out pre-recorded decisions per entity, in order.
///
/// An entity whose script has run out passes. Useful for tests and for
/// replaying a recorded battle against the same seed.
#[derive(Debug, Default)]
pub struct ScriptedActionProvider {
    scripts: Mutex<HashMap<EntityId, VecDeque<Option<CombatAction>>>>,
}

impl ScriptedActionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an action to the performer's script.
    pub fn then(mut self, action: CombatAction) -> Self {
        self.push(action.performer, Some(action));
        self
    }

    /// Appends a pass to `entity`'s script.
    pub fn then_pass(mut self, entity: EntityId) -> Self {
        self.push(entity, None);
        self
    }

    pub fn push(&mut self, entity: EntityId, decision: Option<CombatAction>) {
        self.scripts
            .get_mut()
            .entry(entity)
            .or_default()
            .push_back(decision);
    }

    /// Decisions still queued for `entity`.
    pub async fn remaining(&self, entity: EntityId) -> usize {
        self.scripts
            .lock()
            .await
            .get(&entity)
            .map_or(0, VecDeque::len)
    }
}

#[async_trait]
impl ActionProvider for ScriptedActionProvider {
    async fn provide_action(
        &self,
        entity: EntityId,
        _context: &CombatContext,
    ) -> Result<Option<CombatAction>> {
        let next = self
            .scripts
            .lock()
            .await
            .get_mut(&entity)
            .and_then(VecDeque::pop_front)
            .flatten();
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{CombatEntity, Role, SkillId, Team};

    #[tokio::test]
    async fn replays_in_order_then_passes() {
        let hero = EntityId(0);
        let provider = ScriptedActionProvider::new()
            .then(CombatAction::new(hero, EntityId(1), SkillId(3)))
            .then_pass(hero)
            .then(CombatAction::attack(hero, EntityId(2)));
        let context = CombatContext {
            actor: CombatEntity::new("Hero", Team::Player, Role::Striker, 50, 0),
            allies: vec![],
            enemies: vec![],
            available_skills: vec![],
            turn: 1,
            clock: 0.0,
            aggressor: None,
        };

        assert_eq!(provider.remaining(hero).await, 3);
        let first = provider.provide_action(hero, &context).await.expect("first");
        assert_eq!(first.map(|action| action.skill), Some(SkillId(3)));
        assert_eq!(provider.provide_action(hero, &context).await.expect("pass"), None);
        let third = provider.provide_action(hero, &context).await.expect("third");
        assert_eq!(third.map(|action| action.target), Some(EntityId(2)));
        assert_eq!(provider.provide_action(hero, &context).await.expect("empty"), None);
        assert_eq!(provider.remaining(EntityId(9)).await, 0);
    }
}
