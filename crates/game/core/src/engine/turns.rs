use super::{CombatEngine, CombatEvent, CombatOutcome, CombatPhase, EngineError, SkipReason};
use crate::state::EntityId;

/// Result of [`CombatEngine::begin_turn`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnBegin {
    /// The entity is waiting for an action; follow with
    /// [`CombatEngine::submit_action`] and/or [`CombatEngine::end_turn`].
    Ready(EntityId),
    /// The entity could not act. The turn is already closed.
    Skipped { entity: EntityId, reason: SkipReason },
    /// The battle is over; no further turns will be issued.
    Finished(CombatOutcome),
    /// Nothing was scheduled.
    Idle,
}

/// Result of [`CombatEngine::end_turn`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnSummary {
    pub entity: EntityId,
    pub turn: u64,
    /// Whether an action was resolved during the turn.
    pub acted: bool,
    /// Set when this turn ended the battle.
    pub outcome: Option<CombatOutcome>,
}

impl CombatEngine {
    /// Starts the next turn.
    ///
    /// Dequeues the next entity, then ticks its status effects in
    /// application order. An entity killed by those effects, or one that
    /// started the turn stunned, has its turn closed immediately.
    pub fn begin_turn(&mut self) -> Result<TurnBegin, EngineError> {
        match self.phase {
            CombatPhase::NotStarted => return Err(EngineError::NotStarted),
            CombatPhase::Finished(outcome) => return Ok(TurnBegin::Finished(outcome)),
            CombatPhase::Active => {}
        }
        if let Some(current) = self.current {
            return Err(EngineError::TurnInProgress(current));
        }

        let Some(entry) = self.queue.dequeue() else {
            return Ok(match self.check_end() {
                Some(outcome) => TurnBegin::Finished(outcome),
                None => TurnBegin::Idle,
            });
        };

        let id = entry.entity;
        if !self.entity(id).is_some_and(|entity| entity.is_alive()) {
            self.emit(CombatEvent::TurnSkipped {
                entity: id,
                reason: SkipReason::Anomaly,
            });
            if let Some(outcome) = self.check_end() {
                return Ok(TurnBegin::Finished(outcome));
            }
            return Ok(TurnBegin::Skipped {
                entity: id,
                reason: SkipReason::Anomaly,
            });
        }

        self.turn += 1;
        self.current = Some(id);
        self.emit(CombatEvent::TurnStarted {
            entity: id,
            turn: self.turn,
        });

        // a stun that wears off on this tick still costs the turn
        let stunned = self.entity(id).is_some_and(|entity| entity.is_stunned());
        self.tick_effects(id);
        let alive = self.entity(id).is_some_and(|entity| entity.is_alive());

        if !alive {
            self.handle_defeat(id);
            self.skip(id, SkipReason::DefeatedByEffects);
            return Ok(TurnBegin::Skipped {
                entity: id,
                reason: SkipReason::DefeatedByEffects,
            });
        }

        if stunned {
            self.skip(id, SkipReason::Stunned);
            return Ok(TurnBegin::Skipped {
                entity: id,
                reason: SkipReason::Stunned,
            });
        }

        Ok(TurnBegin::Ready(id))
    }

    /// Closes the current turn.
    ///
    /// Clears `HAS_ACTED`, re-enqueues the entity with a fresh roll if it is
    /// alive, advances the clock by the turn duration and finishes the
    /// battle if a team has been wiped out.
    pub fn end_turn(&mut self) -> Result<TurnSummary, EngineError> {
        match self.phase {
            CombatPhase::NotStarted => return Err(EngineError::NotStarted),
            CombatPhase::Finished(_) => return Err(EngineError::Finished),
            CombatPhase::Active => {}
        }
        let entity = self.current.ok_or(EngineError::NoActiveTurn)?;
        let acted = self.entity(entity).is_some_and(|e| e.has_acted());
        let turn = self.turn;
        let outcome = self.close_turn(entity);

        Ok(TurnSummary {
            entity,
            turn,
            acted,
            outcome,
        })
    }

    fn tick_effects(&mut self, id: EntityId) {
        let effects = self.effects;
        let Some(entity) = self.entity_mut(id) else {
            return;
        };
        let ticks = effects.tick(entity);

        for tick in ticks {
            let expired = tick.expired;
            self.emit(CombatEvent::StatusTicked {
                entity: id,
                effect: tick.name.clone(),
                damage: tick.damage,
                healing: tick.healing,
                remaining: tick.remaining,
            });
            if expired {
                self.emit(CombatEvent::StatusExpired {
                    entity: id,
                    effect: tick.name,
                });
            }
        }
    }

    fn skip(&mut self, id: EntityId, reason: SkipReason) {
        self.emit(CombatEvent::TurnSkipped { entity: id, reason });
        self.close_turn(id);
    }

    fn close_turn(&mut self, id: EntityId) -> Option<CombatOutcome> {
        self.emit(CombatEvent::TurnEnded {
            entity: id,
            turn: self.turn,
        });

        if let Some(entity) = self.entities.get_mut(id.0 as usize) {
            entity.set_acted(false);
            if entity.is_alive() {
                self.queue.enqueue(entity, self.rng.as_mut());
            }
        }

        self.current = None;
        self.machine.reset();
        self.clock += self.config.turn_duration;
        self.check_end()
    }
}
