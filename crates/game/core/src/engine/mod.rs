//! Battle orchestration.
//!
//! The [`CombatEngine`] owns every per-battle component (turn queue, status
//! effect engine, cooldowns, damage calculator, threat table, combo tracker,
//! state machine, RNG) and is the only place battle state is mutated.
//!
//! A turn is split into three synchronous steps so that an async host can
//! await input between them:
//!
//! 1. [`CombatEngine::begin_turn`]: dequeue, tick status effects, skip stunned
//! 2. [`CombatEngine::submit_action`]: validate then resolve one action
//! 3. [`CombatEngine::end_turn`]: re-enqueue, advance the clock, check the end
//!
//! Observable changes are buffered as [`CombatEvent`]s and handed out by
//! [`CombatEngine::drain_events`].

mod errors;
mod events;
mod machine;
mod resolve;
mod turns;

pub use errors::{EngineError, SetupError};
pub use events::{CombatEvent, CombatOutcome, SkipReason};
pub use machine::{
    AttackState, CastState, CombatState, IdleState, StateMachine, StateName, StateUpdate,
};
pub use resolve::ActionOutcome;
pub use turns::{TurnBegin, TurnSummary};

use std::sync::Arc;

use crate::combat::{ComboTracker, DamageCalculator, ThreatTable};
use crate::config::CombatConfig;
use crate::context::CombatContext;
use crate::effects::StatusEffectEngine;
use crate::rng::RandomSource;
use crate::skill::{CooldownTracker, SkillRegistry};
use crate::state::{CombatEntity, EntityId, Team};
use crate::turn::TurnQueue;

/// Lifecycle of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CombatPhase {
    NotStarted,
    Active,
    Finished(CombatOutcome),
}

/// One battle.
///
/// Entities keep their slot (and id) after defeat; `EntityId(n)` is the
/// n-th entity in roster order, players first.
pub struct CombatEngine {
    config: CombatConfig,
    skills: Arc<SkillRegistry>,
    entities: Vec<CombatEntity>,
    cooldowns: CooldownTracker,
    effects: StatusEffectEngine,
    damage: DamageCalculator,
    queue: TurnQueue,
    combos: ComboTracker,
    threat: ThreatTable,
    machine: StateMachine,
    rng: Box<dyn RandomSource>,
    turn: u64,
    clock: f64,
    current: Option<EntityId>,
    phase: CombatPhase,
    events: Vec<CombatEvent>,
}

impl CombatEngine {
    /// Validates both rosters and assigns entity ids.
    ///
    /// Every skill an entity knows must exist in `skills`, every entity needs
    /// a positive max health, and each roster needs at least one living
    /// member.
    pub fn new(
        config: CombatConfig,
        skills: Arc<SkillRegistry>,
        players: Vec<CombatEntity>,
        enemies: Vec<CombatEntity>,
        rng: impl RandomSource + 'static,
    ) -> Result<Self, SetupError> {
        for (team, roster) in [(Team::Player, &players), (Team::Enemy, &enemies)] {
            if !roster.iter().any(CombatEntity::is_alive) {
                return Err(SetupError::EmptyRoster(team));
            }
        }

        let mut entities = Vec::with_capacity(players.len() + enemies.len());
        let rosters = players
            .into_iter()
            .map(|entity| (Team::Player, entity))
            .chain(enemies.into_iter().map(|entity| (Team::Enemy, entity)));

        for (index, (team, mut entity)) in rosters.enumerate() {
            if entity.max_health() == 0 {
                return Err(SetupError::ZeroMaxHealth(entity.name));
            }
            if let Some(&skill) = entity.skills.iter().find(|id| !skills.contains(**id)) {
                return Err(SetupError::UnknownSkill {
                    entity: entity.name,
                    skill,
                });
            }
            entity.id = EntityId(index as u32);
            entity.team = team;
            entity.set_acted(false);
            entities.push(entity);
        }

        Ok(Self {
            queue: TurnQueue::new(config.priority_step).with_rounds(config.turn_rounds),
            combos: ComboTracker::new(config.combo_window),
            config,
            skills,
            entities,
            cooldowns: CooldownTracker::new(),
            effects: StatusEffectEngine::new(),
            damage: DamageCalculator::new(),
            threat: ThreatTable::new(),
            machine: StateMachine::new(),
            rng: Box::new(rng),
            turn: 0,
            clock: 0.0,
            current: None,
            phase: CombatPhase::NotStarted,
            events: Vec::new(),
        })
    }

    /// Activates the battle and schedules every living entity.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.phase != CombatPhase::NotStarted {
            return Err(EngineError::AlreadyStarted);
        }

        self.phase = CombatPhase::Active;
        self.emit(CombatEvent::CombatStarted {
            players: self.members(Team::Player).count(),
            enemies: self.members(Team::Enemy).count(),
        });

        for entity in &self.entities {
            self.queue.enqueue(entity, self.rng.as_mut());
        }
        Ok(())
    }

    /// Ends the battle with [`CombatOutcome::Cancelled`].
    ///
    /// Returns `false` if it had already finished. Resource pools are
    /// left as they are; they are always within bounds.
    pub fn cancel(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        self.finish(CombatOutcome::Cancelled);
        true
    }

    /// Snapshot of what `entity` can see, for action providers.
    pub fn context_for(&self, entity: EntityId) -> Result<CombatContext, EngineError> {
        let actor = self.entity(entity).ok_or(EngineError::UnknownEntity(entity))?;

        let allies = self
            .members(actor.team)
            .filter(|ally| ally.id != entity)
            .cloned()
            .collect();
        let enemies = self.members(actor.team.opponent()).cloned().collect();
        let available_skills = self
            .skills
            .usable_by(actor, &self.cooldowns, self.clock)
            .cloned()
            .collect();
        let aggressor = self.threat.highest_threat_target(entity, |source| {
            self.entity(source).is_some_and(|attacker| attacker.is_alive())
        });

        Ok(CombatContext {
            actor: actor.clone(),
            allies,
            enemies,
            available_skills,
            turn: self.turn,
            clock: self.clock,
            aggressor,
        })
    }

    /// Takes every event buffered since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    // ===== accessors =====

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn skills(&self) -> &Arc<SkillRegistry> {
        &self.skills
    }

    pub fn entity(&self, id: EntityId) -> Option<&CombatEntity> {
        self.entities.get(id.0 as usize)
    }

    pub fn entities(&self) -> &[CombatEntity] {
        &self.entities
    }

    /// Members of `team` in id order, defeated ones included.
    pub fn members(&self, team: Team) -> impl Iterator<Item = &CombatEntity> {
        self.entities.iter().filter(move |entity| entity.team == team)
    }

    pub fn living(&self, team: Team) -> impl Iterator<Item = &CombatEntity> {
        self.members(team).filter(|entity| entity.is_alive())
    }

    pub fn phase(&self) -> CombatPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == CombatPhase::Active
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, CombatPhase::Finished(_))
    }

    pub fn outcome(&self) -> Option<CombatOutcome> {
        match self.phase {
            CombatPhase::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Turns started so far.
    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// Combat clock in seconds.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Entity whose turn is in progress.
    pub fn current_actor(&self) -> Option<EntityId> {
        self.current
    }

    pub fn turn_queue(&self) -> &TurnQueue {
        &self.queue
    }

    pub fn threat(&self) -> &ThreatTable {
        &self.threat
    }

    pub fn combos(&self) -> &ComboTracker {
        &self.combos
    }

    pub fn cooldowns(&self) -> &CooldownTracker {
        &self.cooldowns
    }

    pub fn state_machine(&self) -> &StateMachine {
        &self.machine
    }

    // ===== internals =====

    fn emit(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut CombatEntity> {
        self.entities.get_mut(id.0 as usize)
    }

    /// Drops a defeated entity from every per-battle collection.
    fn handle_defeat(&mut self, id: EntityId) {
        self.queue.remove_all(id);
        self.threat.clear_threat(id);
        self.combos.reset(id);
        self.cooldowns.clear_entity(id);

        let effects = self.effects;
        let Some(entity) = self.entity_mut(id) else {
            return;
        };
        effects.clear(entity);
        entity.set_acted(false);
        let team = entity.team;

        self.emit(CombatEvent::CombatantDefeated { entity: id, team });
    }

    /// Finishes the battle if at most one team has living members.
    fn check_end(&mut self) -> Option<CombatOutcome> {
        if let CombatPhase::Finished(outcome) = self.phase {
            return Some(outcome);
        }

        let players = self.living(Team::Player).next().is_some();
        let enemies = self.living(Team::Enemy).next().is_some();
        let outcome = match (players, enemies) {
            (true, true) => return None,
            (true, false) => CombatOutcome::Victory(Team::Player),
            (false, true) => CombatOutcome::Victory(Team::Enemy),
            (false, false) => CombatOutcome::Draw,
        };

        self.finish(outcome);
        Some(outcome)
    }

    fn finish(&mut self, outcome: CombatOutcome) {
        if self.is_finished() {
            return;
        }
        self.phase = CombatPhase::Finished(outcome);
        self.queue.clear();
        self.machine.reset();
        self.current = None;
        self.emit(CombatEvent::CombatEnded { outcome });
    }
}

impl core::fmt::Debug for CombatEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CombatEngine")
            .field("phase", &self.phase)
            .field("turn", &self.turn)
            .field("clock", &self.clock)
            .field("current", &self.current)
            .field("entities", &self.entities.len())
            .field("queued", &self.queue.len())
            .finish_non_exhaustive()
    }
}
