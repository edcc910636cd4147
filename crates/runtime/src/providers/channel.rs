//! Action provider backed by an mpsc channel.
//!
//! Each turn the battle sends an [`ActionRequest`] and waits for the answer
//! on a oneshot. Whatever sits on the other end (a terminal prompt, a network
//! session) only has to call [`ActionRequest::respond`].

use async_trait::async_trait;
use combat_core::{CombatAction, CombatContext, EntityId};
use tokio::sync::{mpsc, oneshot};

use crate::api::{ActionProvider, Result, RuntimeError};

/// One pending decision.
#[derive(Debug)]
pub struct ActionRequest {
    pub entity: EntityId,
    pub context: CombatContext,
    reply: oneshot::Sender<Option<CombatAction>>,
}

impl ActionRequest {
    /// Answers the request. `None` passes the turn.
    ///
    /// Returns `false` if the battle stopped waiting (turn timeout or
    /// cancellation).
    pub fn respond(self, action: Option<CombatAction>) -> bool {
        self.reply.send(action).is_ok()
    }

    pub fn pass(self) -> bool {
        self.respond(None)
    }

    /// Whether the battle is still waiting for this answer.
    pub fn is_pending(&self) -> bool {
        !self.reply.is_closed()
    }
}

/// Forwards decisions to an external input adapter.
#[derive(Debug, Clone)]
pub struct ChannelActionProvider {
    requests: mpsc::Sender<ActionRequest>,
}

impl ChannelActionProvider {
    /// Creates the provider and the receiver the input adapter reads from.
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<ActionRequest>) {
        let (requests, rx) = mpsc::channel(buffer.max(1));
        (Self { requests }, rx)
    }
}

#[async_trait]
impl ActionProvider for ChannelActionProvider {
    async fn provide_action(
        &self,
        entity: EntityId,
        context: &CombatContext,
    ) -> Result<Option<CombatAction>> {
        let (reply, response) = oneshot::channel();
        let request = ActionRequest {
            entity,
            context: context.clone(),
            reply,
        };

        self.requests
            .send(request)
            .await
            .map_err(|_| RuntimeError::ActionProviderChannelClosed)?;

        response.await.map_err(RuntimeError::ReplyChannelClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{CombatEntity, Role, Team};

    fn context() -> CombatContext {
        CombatContext {
            actor: CombatEntity::new("Hero", Team::Player, Role::Striker, 50, 0),
            allies: vec![],
            enemies: vec![],
            available_skills: vec![],
            turn: 1,
            clock: 0.0,
            aggressor: None,
        }
    }

    #[tokio::test]
    async fn forwards_the_answer() {
        let (provider, mut requests) = ChannelActionProvider::new(4);
        let responder = tokio::spawn(async move {
            let request = requests.recv().await.expect("request");
            assert_eq!(request.entity, EntityId(0));
            assert!(request.is_pending());
            request.respond(Some(CombatAction::attack(EntityId(0), EntityId(1))))
        });

        let action = provider
            .provide_action(EntityId(0), &context())
            .await
            .expect("answered");
        assert_eq!(action, Some(CombatAction::attack(EntityId(0), EntityId(1))));
        assert!(responder.await.expect("responder"));
    }

    #[tokio::test]
    async fn closed_receiver_is_an_error() {
        let (provider, requests) = ChannelActionProvider::new(1);
        drop(requests);

        let result = provider.provide_action(EntityId(0), &context()).await;
        assert!(matches!(
            result,
            Err(RuntimeError::ActionProviderChannelClosed)
        ));
    }

    #[tokio::test]
    async fn dropped_request_is_an_error() {
        let (provider, mut requests) = ChannelActionProvider::new(1);
        tokio::spawn(async move {
            let _ = requests.recv().await;
        });

        let result = provider.provide_action(EntityId(0), &context()).await;
        assert!(matches!(result, Err(RuntimeError::ReplyChannelClosed(_))));
    }
}
