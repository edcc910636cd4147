//! Async host for turn-based battles.
//!
//! This crate drives a [`combat_core::CombatEngine`] turn by turn, asks
//! [`ActionProvider`]s for every decision, and republishes engine events on a
//! topic-based broadcast bus.
//!
//! Modules are organized by responsibility:
//! - [`battle`] hosts the battle loop and its builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`providers`] holds the AI, channel and scripted providers
//! - [`config`] and [`rng`] carry host-side settings and randomness
pub mod api;
pub mod battle;
pub mod config;
pub mod events;
pub mod providers;
pub mod rng;

pub use api::{
    ActionProvider, PassActionProvider, ProviderKind, ProviderRegistry, Result, RuntimeError,
};
pub use battle::{
    Battle, BattleBuilder, BattleHandle, BattleReport, CancelHandle, provider_kind_for,
};
pub use config::RuntimeConfig;
pub use events::{Event, EventBus, Topic};
pub use providers::{
    ActionRequest, AiActionProvider, AiDecisionEngine, Behavior, ChannelActionProvider,
    ScriptedActionProvider,
};
pub use rng::StdRandom;
