use crate::rng::RandomSource;
use crate::state::{CombatEntity, EntityId};

/// A scheduled turn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurnEntry {
    pub round: u64,
    pub priority: f64,
    pub entity: EntityId,
}

impl TurnEntry {
    /// Dequeue order: earlier round first, then higher priority.
    fn runs_before(&self, round: u64, priority: f64) -> bool {
        self.round < round || (self.round == round && self.priority.total_cmp(&priority).is_gt())
    }
}

/// Priority queue of pending turns.
///
/// Priorities are `initiative + jitter` with jitter drawn from the injected
/// [`RandomSource`]; collisions within a round are resolved by bumping the
/// new priority by `priority_step` until it is unique, so the order is
/// always total.
///
/// By default every entry sits in round 0 and [`TurnQueue::dequeue`] always
/// returns the highest priority. With rounds enabled, anything enqueued lands
/// in the round after the one currently being dequeued, so an entity
/// re-enqueued after its turn waits until everyone else has acted.
#[derive(Clone, Debug)]
pub struct TurnQueue {
    entries: Vec<TurnEntry>,
    priority_step: f64,
    rounds: bool,
    round: u64,
}

impl TurnQueue {
    pub fn new(priority_step: f64) -> Self {
        Self {
            entries: Vec::new(),
            priority_step,
            rounds: false,
            round: 0,
        }
    }

    /// Group entries into rounds instead of strict priority order.
    pub fn with_rounds(mut self, rounds: bool) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn uses_rounds(&self) -> bool {
        self.rounds
    }

    /// Round of the most recently dequeued entry. Always 0 without rounds.
    pub fn round(&self) -> u64 {
        self.round
    }

    /// Schedules a turn for `entity` and returns the assigned priority.
    ///
    /// Defeated entities are not scheduled.
    pub fn enqueue(&mut self, entity: &CombatEntity, rng: &mut dyn RandomSource) -> Option<f64> {
        if !entity.is_alive() {
            return None;
        }

        let base = f64::from(entity.attributes().initiative) + rng.next_f64();
        Some(self.insert(entity.id, base))
    }

    /// Inserts at `priority`, bumped until unique within its round.
    pub fn insert(&mut self, entity: EntityId, priority: f64) -> f64 {
        let round = if self.rounds { self.round + 1 } else { 0 };
        let mut priority = priority;
        while self
            .entries
            .iter()
            .any(|entry| entry.round == round && entry.priority == priority)
        {
            priority += self.priority_step;
        }

        let position = self
            .entries
            .iter()
            .position(|entry| !entry.runs_before(round, priority))
            .unwrap_or(self.entries.len());
        self.entries.insert(
            position,
            TurnEntry {
                round,
                priority,
                entity,
            },
        );
        priority
    }

    /// Removes and returns the next entry.
    pub fn dequeue(&mut self) -> Option<TurnEntry> {
        if self.entries.is_empty() {
            return None;
        }
        let entry = self.entries.remove(0);
        self.round = entry.round;
        Some(entry)
    }

    pub fn peek(&self) -> Option<&TurnEntry> {
        self.entries.first()
    }

    /// Drops every entry for `entity` and returns how many were removed.
    pub fn remove_all(&mut self, entity: EntityId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.entity != entity);
        before - self.entries.len()
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.entries.iter().any(|entry| entry.entity == entity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in the order they will be dequeued.
    pub fn iter(&self) -> impl Iterator<Item = &TurnEntry> {
        self.entries.iter()
    }
}

impl Default for TurnQueue {
    fn default() -> Self {
        Self::new(crate::CombatConfig::DEFAULT_PRIORITY_STEP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::PcgRng;
    use crate::state::{Attributes, Role, Team};

    /// Always returns the same value, forcing priority collisions.
    struct Constant;

    impl RandomSource for Constant {
        fn next_u32(&mut self) -> u32 {
            0
        }
    }

    fn combatant(id: u32, initiative: i32) -> CombatEntity {
        let mut entity = CombatEntity::new(format!("c{id}"), Team::Player, Role::Striker, 10, 0)
            .with_attributes(Attributes::new(1, 1, 1, 1).with_initiative(initiative));
        entity.id = EntityId(id);
        entity
    }

    #[test]
    fn higher_initiative_acts_first() {
        let mut queue = TurnQueue::default();
        let mut rng = PcgRng::new(3);
        for (id, initiative) in [(0, 2), (1, 10), (2, 5)] {
            queue.enqueue(&combatant(id, initiative), &mut rng);
        }

        let order: Vec<EntityId> = std::iter::from_fn(|| queue.dequeue())
            .map(|entry| entry.entity)
            .collect();
        assert_eq!(order, vec![EntityId(1), EntityId(2), EntityId(0)]);
        assert!(queue.dequeue().is_none());
    }

    #[test]
    fn colliding_priorities_are_bumped_apart() {
        let mut queue = TurnQueue::new(0.001);
        let mut rng = Constant;
        let first = queue.enqueue(&combatant(0, 4), &mut rng);
        let second = queue.enqueue(&combatant(1, 4), &mut rng);
        let third = queue.enqueue(&combatant(2, 4), &mut rng);

        assert_eq!(first, Some(4.0));
        assert!(second.is_some_and(|p| p > 4.0 && p < 4.002));
        assert!(third.zip(second).is_some_and(|(t, s)| t > s));
        let priorities: Vec<f64> = queue.iter().map(|entry| entry.priority).collect();
        assert!(priorities.windows(2).all(|pair| pair[0] > pair[1]));
    }

    #[test]
    fn dequeue_always_takes_the_highest_priority() {
        let mut queue = TurnQueue::default();
        let mut rng = PcgRng::new(11);
        let fast = combatant(0, 50);
        let slow = combatant(1, 1);
        queue.enqueue(&fast, &mut rng);
        queue.enqueue(&slow, &mut rng);

        let first = queue.dequeue().expect("fast is queued");
        assert_eq!(first.entity, fast.id);
        queue.enqueue(&fast, &mut rng);

        let second = queue.dequeue().expect("both are queued");
        assert_eq!((second.entity, second.round), (fast.id, 0));
        assert!(second.priority >= 50.0);
        assert_eq!(queue.peek().map(|entry| entry.entity), Some(slow.id));
    }

    #[test]
    fn with_rounds_requeued_entities_wait_for_the_next_round() {
        let mut queue = TurnQueue::default().with_rounds(true);
        let mut rng = PcgRng::new(11);
        let fast = combatant(0, 50);
        let slow = combatant(1, 1);
        queue.enqueue(&fast, &mut rng);
        queue.enqueue(&slow, &mut rng);

        let first = queue.dequeue().expect("fast is queued");
        assert_eq!((first.entity, first.round), (fast.id, 1));
        queue.enqueue(&fast, &mut rng);

        let second = queue.dequeue().expect("slow is queued");
        assert_eq!((second.entity, second.round), (slow.id, 1));
        queue.enqueue(&slow, &mut rng);

        let order: Vec<(EntityId, u64)> = queue.iter().map(|e| (e.entity, e.round)).collect();
        assert_eq!(order, vec![(fast.id, 2), (slow.id, 2)]);
    }

    #[test]
    fn dead_entities_are_skipped() {
        let mut queue = TurnQueue::default();
        let mut corpse = combatant(0, 9);
        corpse.take_damage(100);
        assert_eq!(queue.enqueue(&corpse, &mut PcgRng::new(1)), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn remove_all_drops_duplicates() {
        let mut queue = TurnQueue::default();
        queue.insert(EntityId(4), 1.0);
        queue.insert(EntityId(4), 3.0);
        queue.insert(EntityId(5), 2.0);

        assert_eq!(queue.remove_all(EntityId(4)), 2);
        assert!(!queue.contains(EntityId(4)));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.peek().map(|entry| entry.entity), Some(EntityId(5)));
    }
}
