//! Topic-based event bus implementation.

use std::collections::HashMap;

use combat_core::CombatEvent;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Battle start/end and defeats
    Lifecycle,
    /// Turn flow and performed actions
    Turn,
    /// Damage, healing and combos
    Damage,
    /// Status effect application, ticks and expiry
    Status,
}

impl Topic {
    pub const ALL: [Topic; 4] = [Topic::Lifecycle, Topic::Turn, Topic::Damage, Topic::Status];

    /// Topic a combat event is published on.
    pub fn of(event: &CombatEvent) -> Self {
        match event {
            CombatEvent::CombatStarted { .. }
            | CombatEvent::CombatantDefeated { .. }
            | CombatEvent::CombatEnded { .. } => Topic::Lifecycle,
            CombatEvent::TurnStarted { .. }
            | CombatEvent::TurnEnded { .. }
            | CombatEvent::TurnSkipped { .. }
            | CombatEvent::ActionPerformed { .. } => Topic::Turn,
            CombatEvent::DamageDealt { .. }
            | CombatEvent::HealingDone { .. }
            | CombatEvent::ComboTriggered { .. } => Topic::Damage,
            CombatEvent::StatusApplied { .. }
            | CombatEvent::StatusTicked { .. }
            | CombatEvent::StatusExpired { .. } => Topic::Status,
        }
    }
}

/// A combat event stamped with its position in the battle's event stream.
///
/// `sequence` is global across topics, so subscribers of several topics can
/// merge their streams back into engine order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub sequence: u64,
    /// Engine turn counter when the event was published.
    pub turn: u64,
    pub payload: CombatEvent,
}

impl Event {
    pub fn topic(&self) -> Topic {
        Topic::of(&self.payload)
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Every topic channel exists from construction on,
/// so publishing and subscribing never wait on a lock. Dropping a receiver
/// unsubscribes it.
#[derive(Clone)]
pub struct EventBus {
    channels: HashMap<Topic, broadcast::Sender<Event>>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let channels = Topic::ALL
            .into_iter()
            .map(|topic| (topic, broadcast::channel(capacity).0))
            .collect();

        Self { channels }
    }

    /// Publish an event to its corresponding topic.
    ///
    /// Returns the number of receivers that got it. Slow receivers lag
    /// rather than block the publisher.
    pub fn publish(&self, event: Event) -> usize {
        let topic = event.topic();

        match self.channels.get(&topic).map(|tx| tx.send(event)) {
            Some(Ok(receivers)) => receivers,
            _ => {
                // No subscribers for this topic - this is normal, not an error
                tracing::trace!("No subscribers for topic {:?}", topic);
                0
            }
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        match self.channels.get(&topic) {
            Some(tx) => tx.subscribe(),
            // unreachable: every topic gets a channel in `with_capacity`
            None => broadcast::channel(1).1,
        }
    }

    /// Subscribe to multiple topics
    ///
    /// Returns receivers for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }

    /// Current number of receivers on `topic`.
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.channels
            .get(&topic)
            .map_or(0, |tx| tx.receiver_count())
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("topics", &self.channels.len())
            .finish()
    }
}
