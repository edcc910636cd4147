//! Rule-based AI for combatants.
//!
//! # Core Components
//!
//! - [`Behavior`]: personality, defaulted from the combatant's role
//! - [`AiDecisionEngine`]: category, target and skill selection
//! - [`AiActionProvider`]: the engine behind the [`crate::ActionProvider`] trait

pub mod behavior;
pub mod decision;
pub mod provider;

pub use behavior::{ActionCategory, Behavior, CategoryWeights};
pub use decision::{AiDecision, AiDecisionEngine};
pub use provider::AiActionProvider;
