//! Event publishing for battles.
//!
//! The battle loop drains [`combat_core::CombatEvent`]s from the engine after
//! every step, stamps them with a sequence number and publishes them here.

mod bus;

pub use bus::{Event, EventBus, Topic};
