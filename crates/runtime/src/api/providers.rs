//! Asynchronous abstraction for sourcing combatant intent.
//!
//! Runtime users plug in [`ActionProvider`] implementations so a battle can
//! run with human input, scripted fixtures, or AI policies.
use async_trait::async_trait;
use combat_core::{CombatAction, CombatContext, EntityId};

use super::errors::Result;

/// Trait for choosing an action from a battle snapshot.
///
/// Different implementations can handle:
/// - Player input (from UI/CLI or the network)
/// - AI decisions
/// - Scripted/replayed actions
/// - Testing fixtures
#[async_trait]
pub trait ActionProvider: Send + Sync {
    /// Choose an action for `entity`.
    ///
    /// `Ok(None)` passes the turn. The battle races this call against its
    /// turn timeout, so implementations may take as long as they need; a
    /// late answer is simply dropped.
    async fn provide_action(
        &self,
        entity: EntityId,
        context: &CombatContext,
    ) -> Result<Option<CombatAction>>;
}

/// A provider that always passes.
/// Useful for testing or as a fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassActionProvider;

#[async_trait]
impl ActionProvider for PassActionProvider {
    async fn provide_action(
        &self,
        _entity: EntityId,
        _context: &CombatContext,
    ) -> Result<Option<CombatAction>> {
        Ok(None)
    }
}
