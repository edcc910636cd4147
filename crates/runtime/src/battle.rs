//! Battle orchestration on top of [`CombatEngine`].
//!
//! A [`Battle`] owns one engine, the providers that decide for each
//! combatant and the event bus observers subscribe to. The only suspension
//! point is waiting for a provider, which is raced against the turn timeout
//! and the cancellation signal. Battles are independent values, so a host can
//! run as many as it likes with [`Battle::spawn`].

use std::sync::Arc;

use combat_content::{CombatantTemplate, ControllerSpec, RosterSpec};
use combat_core::{
    CombatAction, CombatEngine, CombatEntity, CombatError, CombatEvent, CombatOutcome, EntityId,
    RandomSource, SkillRegistry, Team, TurnBegin,
};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::{ActionProvider, ProviderKind, ProviderRegistry, Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::events::{Event, EventBus, Topic};
use crate::providers::{AiActionProvider, Behavior};
use crate::rng::StdRandom;

/// Final state of a finished battle.
#[derive(Debug, Clone)]
pub struct BattleReport {
    pub outcome: CombatOutcome,
    /// Turns started, skipped ones included.
    pub turns: u64,
    /// Combat clock when the battle ended.
    pub clock: f64,
    /// Events published over the whole battle.
    pub events: u64,
    /// Every combatant in id order, defeated ones included.
    pub entities: Vec<CombatEntity>,
}

impl BattleReport {
    pub fn winner(&self) -> Option<Team> {
        self.outcome.winner()
    }

    pub fn survivors(&self, team: Team) -> impl Iterator<Item = &CombatEntity> {
        self.entities
            .iter()
            .filter(move |entity| entity.team == team && entity.is_alive())
    }
}

/// Stops a running battle from another task.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    /// Requests cancellation. The battle ends with
    /// [`CombatOutcome::Cancelled`] at its next check.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// A battle running on its own task.
#[derive(Debug)]
pub struct BattleHandle {
    join: JoinHandle<Result<BattleReport>>,
    cancel: CancelHandle,
    bus: EventBus,
}

impl BattleHandle {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.bus.subscribe(topic)
    }

    /// Waits for the battle task to finish.
    pub async fn join(self) -> Result<BattleReport> {
        self.join.await.map_err(RuntimeError::WorkerJoin)?
    }
}

/// One battle: engine, providers and event bus.
pub struct Battle {
    engine: CombatEngine,
    providers: ProviderRegistry,
    bus: EventBus,
    config: RuntimeConfig,
    cancel_tx: Arc<watch::Sender<bool>>,
    cancel_rx: watch::Receiver<bool>,
    sequence: u64,
}

impl Battle {
    pub fn builder() -> BattleBuilder {
        BattleBuilder::new()
    }

    pub fn engine(&self) -> &CombatEngine {
        &self.engine
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.bus.subscribe(topic)
    }

    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    /// Providers may be swapped between turns, e.g. when a player disconnects.
    pub fn providers_mut(&mut self) -> &mut ProviderRegistry {
        &mut self.providers
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            tx: Arc::clone(&self.cancel_tx),
        }
    }

    /// Events published so far.
    pub fn events_published(&self) -> u64 {
        self.sequence
    }

    /// Runs the battle on a new task.
    pub fn spawn(self) -> BattleHandle {
        let cancel = self.cancel_handle();
        let bus = self.bus.clone();
        let join = tokio::spawn(self.run());
        BattleHandle { join, cancel, bus }
    }

    /// Runs turns until the battle ends.
    pub async fn run(mut self) -> Result<BattleReport> {
        while self.step().await?.is_none() {}
        Ok(self.report())
    }

    /// Runs a single turn, starting the battle first if needed.
    ///
    /// Returns the outcome once the battle is over.
    pub async fn step(&mut self) -> Result<Option<CombatOutcome>> {
        if let Some(outcome) = self.engine.outcome() {
            return Ok(Some(outcome));
        }

        if !self.engine.is_active() {
            self.engine.start()?;
            info!(
                "Battle started: {} players vs {} enemies",
                self.engine.members(Team::Player).count(),
                self.engine.members(Team::Enemy).count()
            );
            self.publish_pending();
        }

        if self.is_cancelled() {
            info!("Battle cancelled");
            return Ok(Some(self.cancel_now()));
        }
        if let Some(max_turns) = self.config.max_turns
            && self.engine.turn() >= max_turns
        {
            warn!("Battle reached the {} turn limit, cancelling", max_turns);
            return Ok(Some(self.cancel_now()));
        }

        match self.engine.begin_turn()? {
            TurnBegin::Ready(entity) => {
                self.publish_pending();
                self.take_turn(entity).await?;
            }
            TurnBegin::Skipped { entity, reason } => {
                debug!("Turn of {} skipped: {:?}", entity, reason);
            }
            TurnBegin::Finished(_) => {}
            TurnBegin::Idle => {
                warn!("Turn queue is empty while both teams stand, cancelling");
                self.engine.cancel();
            }
        }

        self.publish_pending();
        Ok(self.engine.outcome())
    }

    fn report(&self) -> BattleReport {
        BattleReport {
            outcome: self.engine.outcome().unwrap_or(CombatOutcome::Cancelled),
            turns: self.engine.turn(),
            clock: self.engine.clock(),
            events: self.sequence,
            entities: self.engine.entities().to_vec(),
        }
    }

    /// Asks the entity's provider for actions until one resolves, the entity
    /// passes, or it runs out of attempts; then closes the turn.
    async fn take_turn(&mut self, entity: EntityId) -> Result<()> {
        let attempts = self.config.max_action_attempts.max(1);

        for attempt in 1..=attempts {
            let action = match self.request_action(entity).await {
                Decision::Act(action) => action,
                Decision::Pass => {
                    debug!("{} passes", entity);
                    break;
                }
                Decision::Cancelled => return Ok(()),
            };

            match self.engine.submit_action(action) {
                Ok(outcome) => {
                    debug!(
                        "{} used {} on {:?}: {} damage, {} healing",
                        entity,
                        outcome.skill,
                        outcome.targets,
                        outcome.total_damage(),
                        outcome.total_healing()
                    );
                    break;
                }
                Err(err) => {
                    warn!(
                        severity = err.severity().as_str(),
                        code = err.error_code(),
                        "Rejected action from {} (attempt {}/{}): {}",
                        entity,
                        attempt,
                        attempts,
                        err
                    );
                }
            }
        }

        self.engine.end_turn()?;
        Ok(())
    }

    /// Awaits the provider against the turn timeout and cancellation.
    ///
    /// Provider failures never end the battle; the entity passes instead.
    async fn request_action(&mut self, entity: EntityId) -> Decision {
        let provider = match self.providers.get_for_entity(entity) {
            Ok(provider) => provider,
            Err(err) => {
                warn!("No provider for {}, passing: {}", entity, err);
                return Decision::Pass;
            }
        };
        let context = match self.engine.context_for(entity) {
            Ok(context) => context,
            Err(err) => {
                warn!("No combat context for {}, passing: {}", entity, err);
                return Decision::Pass;
            }
        };
        let timeout = self.config.turn_timeout;

        let result = tokio::select! {
            biased;
            _ = wait_for_cancel(&mut self.cancel_rx) => {
                info!("Battle cancelled while waiting for {}", entity);
                self.cancel_now();
                return Decision::Cancelled;
            }
            result = provider.provide_action(entity, &context) => result,
            _ = tokio::time::sleep(timeout) => {
                warn!("{} did not act within {:?}, passing", entity, timeout);
                return Decision::Pass;
            }
        };

        match result {
            Ok(Some(action)) => Decision::Act(action),
            Ok(None) => Decision::Pass,
            Err(RuntimeError::ActionProviderChannelClosed) => {
                // nobody is listening anymore, stop asking
                warn!("Input for {} disconnected, passing from now on", entity);
                self.providers.bind_entity(entity, ProviderKind::Pass);
                Decision::Pass
            }
            Err(err) => {
                warn!("Provider for {} failed, passing: {}", entity, err);
                Decision::Pass
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        *self.cancel_rx.borrow()
    }

    fn cancel_now(&mut self) -> CombatOutcome {
        self.engine.cancel();
        self.publish_pending();
        self.engine.outcome().unwrap_or(CombatOutcome::Cancelled)
    }

    /// Stamps and publishes everything the engine buffered.
    fn publish_pending(&mut self) {
        let turn = self.engine.turn();
        for payload in self.engine.drain_events() {
            log_event(&payload);
            let event = Event {
                sequence: self.sequence,
                turn,
                payload,
            };
            self.sequence += 1;
            self.bus.publish(event);
        }
    }
}

impl std::fmt::Debug for Battle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Battle")
            .field("engine", &self.engine)
            .field("providers", &self.providers)
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}

/// What a provider call came back with.
enum Decision {
    Act(CombatAction),
    Pass,
    Cancelled,
}

/// Resolves once cancellation has been requested. Never resolves if every
/// sender is gone.
async fn wait_for_cancel(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

fn log_event(event: &CombatEvent) {
    match event {
        CombatEvent::CombatantDefeated { entity, team } => {
            info!("{} ({}) was defeated", entity, team);
        }
        CombatEvent::CombatEnded { outcome } => {
            info!("Battle ended: {}", outcome);
        }
        CombatEvent::ComboTriggered { entity, count } => {
            debug!("{} extended a combo to {}", entity, count);
        }
        CombatEvent::TurnSkipped { entity, reason } => {
            debug!("{} skipped: {:?}", entity, reason);
        }
        other => tracing::trace!("{:?}", other),
    }
}

/// Provider kind a roster template asks for.
///
/// AI combatants use their named behavior, or their role's default when the
/// name is missing or unknown.
pub fn provider_kind_for(template: &CombatantTemplate) -> ProviderKind {
    match template.controller {
        ControllerSpec::Interactive => ProviderKind::Interactive,
        ControllerSpec::Pass => ProviderKind::Pass,
        ControllerSpec::Ai => {
            let fallback = Behavior::for_role(template.role);
            let behavior = match template.behavior.as_deref() {
                None => fallback,
                Some(name) => name.parse().unwrap_or_else(|_| {
                    warn!(
                        "Unknown behavior '{}' for '{}', using {}",
                        name, template.name, fallback
                    );
                    fallback
                }),
            };
            ProviderKind::Ai(behavior)
        }
    }
}

/// Builder for [`Battle`] with flexible configuration.
pub struct BattleBuilder {
    config: RuntimeConfig,
    skills: Option<Arc<SkillRegistry>>,
    players: Vec<CombatEntity>,
    enemies: Vec<CombatEntity>,
    providers: ProviderRegistry,
    ai_providers: bool,
    rng: Option<Box<dyn RandomSource>>,
    bus: Option<EventBus>,
}

impl BattleBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            skills: None,
            players: Vec::new(),
            enemies: Vec::new(),
            providers: ProviderRegistry::new(),
            ai_providers: false,
            rng: None,
            bus: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Skill catalog. Defaults to the basic attack only.
    pub fn skills(self, skills: SkillRegistry) -> Self {
        self.shared_skills(Arc::new(skills))
    }

    pub fn shared_skills(mut self, skills: Arc<SkillRegistry>) -> Self {
        self.skills = Some(skills);
        self
    }

    pub fn players(mut self, players: Vec<CombatEntity>) -> Self {
        self.players = players;
        self
    }

    pub fn enemies(mut self, enemies: Vec<CombatEntity>) -> Self {
        self.enemies = enemies;
        self
    }

    /// Both teams from a roster, with each combatant bound to the provider
    /// kind its template names.
    pub fn roster(mut self, roster: &RosterSpec) -> Self {
        self.players = roster.player_entities();
        self.enemies = roster.enemy_entities();
        for (index, template) in roster.templates().enumerate() {
            self.providers
                .bind_entity(EntityId(index as u32), provider_kind_for(template));
        }
        self
    }

    /// Replace the whole provider registry.
    pub fn providers(mut self, providers: ProviderRegistry) -> Self {
        self.providers = providers;
        self
    }

    pub fn provider(mut self, kind: ProviderKind, provider: impl ActionProvider + 'static) -> Self {
        self.providers.register(kind, provider);
        self
    }

    pub fn bind(mut self, entity: EntityId, kind: ProviderKind) -> Self {
        self.providers.bind_entity(entity, kind);
        self
    }

    /// Kind used by entities without a binding.
    pub fn default_provider(mut self, kind: ProviderKind) -> Self {
        self.providers.set_default(kind);
        self
    }

    /// Register an [`AiActionProvider`] for every behavior not registered
    /// yet, seeded from the configured seed.
    pub fn with_ai_providers(mut self) -> Self {
        self.ai_providers = true;
        self
    }

    /// Random source for the engine. Defaults to a [`StdRandom`] built
    /// from the configured seed.
    pub fn rng(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    /// Publish on an existing bus instead of a fresh one.
    pub fn event_bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Validates the setup and builds the battle.
    ///
    /// # Errors
    ///
    /// `ProviderNotSet` if some entity resolves to an unregistered provider
    /// kind, `Setup` if the engine rejects the rosters.
    pub fn build(mut self) -> Result<Battle> {
        if self.ai_providers {
            for (offset, behavior) in Behavior::ALL.into_iter().enumerate() {
                let kind = ProviderKind::Ai(behavior);
                if self.providers.has(kind) {
                    continue;
                }
                let rng = StdRandom::from_seed_or_entropy(
                    self.config
                        .seed
                        .map(|seed| seed.wrapping_add(offset as u64 + 1)),
                );
                self.providers
                    .register(kind, AiActionProvider::new(behavior, rng));
            }
        }

        if let Some(&kind) = self.providers.missing_kinds().first() {
            return Err(RuntimeError::ProviderNotSet { kind });
        }

        let skills = self
            .skills
            .unwrap_or_else(|| Arc::new(SkillRegistry::new()));
        let rng = self
            .rng
            .unwrap_or_else(|| Box::new(StdRandom::from_seed_or_entropy(self.config.seed)));
        let engine = CombatEngine::new(
            self.config.combat.clone(),
            skills,
            self.players,
            self.enemies,
            rng,
        )?;

        let bus = self
            .bus
            .unwrap_or_else(|| EventBus::with_capacity(self.config.event_buffer_size));
        let (cancel_tx, cancel_rx) = watch::channel(false);

        debug!(
            "Battle built with {} combatants and {} providers",
            engine.entities().len(),
            self.providers.provider_count()
        );

        Ok(Battle {
            engine,
            providers: self.providers,
            bus,
            config: self.config,
            cancel_tx: Arc::new(cancel_tx),
            cancel_rx,
            sequence: 0,
        })
    }
}
