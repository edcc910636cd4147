use std::collections::HashMap;

use crate::state::EntityId;

/// Recent attacks of one entity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComboChain {
    attacks: Vec<String>,
    last_attack: f64,
}

impl ComboChain {
    fn start(name: &str, timestamp: f64) -> Self {
        Self {
            attacks: vec![name.to_owned()],
            last_attack: timestamp,
        }
    }

    pub fn len(&self) -> usize {
        self.attacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attacks.is_empty()
    }

    /// Attack names in the order they landed.
    pub fn attacks(&self) -> &[String] {
        &self.attacks
    }

    pub fn last_attack(&self) -> f64 {
        self.last_attack
    }
}

/// Detects chains of attacks landing within `window` seconds of each other.
#[derive(Clone, Debug)]
pub struct ComboTracker {
    window: f64,
    chains: HashMap<EntityId, ComboChain>,
}

impl ComboTracker {
    pub fn new(window: f64) -> Self {
        Self {
            window,
            chains: HashMap::new(),
        }
    }

    pub fn window(&self) -> f64 {
        self.window
    }

    /// Records an attack at combat time `timestamp`.
    ///
    /// Returns `true` when the attack extends an existing chain. A first
    /// attack, or one landing more than `window` after the previous, starts
    /// a fresh chain of length 1 and returns `false`.
    pub fn register_attack(&mut self, entity: EntityId, name: &str, timestamp: f64) -> bool {
        let window = self.window;
        match self.chains.get_mut(&entity) {
            Some(chain) if timestamp - chain.last_attack <= window => {
                chain.attacks.push(name.to_owned());
                chain.last_attack = timestamp;
                chain.attacks.len() > 1
            }
            _ => {
                self.chains.insert(entity, ComboChain::start(name, timestamp));
                false
            }
        }
    }

    /// Current chain length, 0 when the entity has none.
    pub fn combo_count(&self, entity: EntityId) -> usize {
        self.chains.get(&entity).map_or(0, ComboChain::len)
    }

    pub fn chain(&self, entity: EntityId) -> Option<&ComboChain> {
        self.chains.get(&entity)
    }

    pub fn reset(&mut self, entity: EntityId) {
        self.chains.remove(&entity);
    }

    pub fn clear(&mut self) {
        self.chains.clear();
    }
}

impl Default for ComboTracker {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HERO: EntityId = EntityId(0);

    #[test]
    fn attacks_inside_window_extend_chain() {
        let mut tracker = ComboTracker::default();
        assert!(!tracker.register_attack(HERO, "Slash", 0.0));
        assert!(tracker.register_attack(HERO, "Slash", 0.5));
        assert!(tracker.register_attack(HERO, "Thrust", 1.5));
        assert_eq!(tracker.combo_count(HERO), 3);
        assert_eq!(
            tracker.chain(HERO).map(ComboChain::attacks),
            Some(&["Slash".to_owned(), "Slash".to_owned(), "Thrust".to_owned()][..])
        );
    }

    #[test]
    fn gap_beyond_window_restarts_chain() {
        let mut tracker = ComboTracker::new(1.0);
        tracker.register_attack(HERO, "Slash", 0.0);
        tracker.register_attack(HERO, "Slash", 0.8);
        assert_eq!(tracker.combo_count(HERO), 2);

        assert!(!tracker.register_attack(HERO, "Slash", 2.5));
        assert_eq!(tracker.combo_count(HERO), 1);
    }

    #[test]
    fn chains_are_per_entity_and_resettable() {
        let mut tracker = ComboTracker::default();
        tracker.register_attack(HERO, "Slash", 0.0);
        assert_eq!(tracker.combo_count(EntityId(7)), 0);

        tracker.reset(HERO);
        assert_eq!(tracker.combo_count(HERO), 0);
        assert!(!tracker.register_attack(HERO, "Slash", 0.1));
    }
}
