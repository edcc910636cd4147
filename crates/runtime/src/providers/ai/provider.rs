//! AI action provider.

use async_trait::async_trait;
use combat_core::{CombatAction, CombatContext, EntityId, RandomSource};
use tokio::sync::Mutex;

use super::behavior::Behavior;
use super::decision::AiDecisionEngine;
use crate::api::{ActionProvider, Result};
use crate::rng::StdRandom;

/// Runs an [`AiDecisionEngine`] for every entity bound to it.
///
/// One instance usually serves every combatant of a behavior, drawing from a
/// single shared random source.
pub struct AiActionProvider {
    engine: AiDecisionEngine,
    rng: Mutex<Box<dyn RandomSource>>,
}

impl AiActionProvider {
    pub fn new(behavior: Behavior, rng: impl RandomSource + 'static) -> Self {
        Self {
            engine: AiDecisionEngine::new(behavior),
            rng: Mutex::new(Box::new(rng)),
        }
    }

    /// Provider with a [`StdRandom`] seeded from `seed`.
    pub fn seeded(behavior: Behavior, seed: u64) -> Self {
        Self::new(behavior, StdRandom::seed_from_u64(seed))
    }

    pub fn behavior(&self) -> Behavior {
        self.engine.behavior()
    }
}

#[async_trait]
impl ActionProvider for AiActionProvider {
    async fn provide_action(
        &self,
        entity: EntityId,
        context: &CombatContext,
    ) -> Result<Option<CombatAction>> {
        if context.actor_id() != entity {
            tracing::warn!(
                "AI asked to act for {} with a snapshot of {}, passing",
                entity,
                context.actor_id()
            );
            return Ok(None);
        }

        let mut rng = self.rng.lock().await;
        let decision = self.engine.decide(context, &mut **rng);

        if decision.is_none() {
            tracing::debug!("{} sees no living enemy, passing", entity);
        }
        Ok(decision.map(|decision| decision.action))
    }
}

impl std::fmt::Debug for AiActionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiActionProvider")
            .field("behavior", &self.engine.behavior())
            .finish_non_exhaustive()
    }
}
