//! Action provider implementations for different combatant controllers.

pub mod ai;
pub mod channel;
pub mod scripted;

pub use ai::{AiActionProvider, AiDecisionEngine, Behavior};
pub use channel::{ActionRequest, ChannelActionProvider};
pub use scripted::ScriptedActionProvider;
