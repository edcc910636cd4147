//! Runtime configuration.

use std::env;
use std::time::Duration;

use combat_core::CombatConfig;

/// Settings for one [`crate::Battle`].
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub combat: CombatConfig,
    /// How long a provider may take before the turn is passed.
    pub turn_timeout: Duration,
    /// Per-topic broadcast capacity.
    pub event_buffer_size: usize,
    /// Rejected actions tolerated per turn before the entity passes.
    pub max_action_attempts: u32,
    /// Safety cap; reaching it cancels the battle.
    pub max_turns: Option<u64>,
    /// Seed for the battle RNG and the AI providers. Entropy when unset.
    pub seed: Option<u64>,
}

impl RuntimeConfig {
    pub const DEFAULT_TURN_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_EVENT_BUFFER: usize = 100;
    pub const DEFAULT_MAX_ACTION_ATTEMPTS: u32 = 3;

    pub fn new(combat: CombatConfig) -> Self {
        Self {
            combat,
            ..Self::default()
        }
    }

    pub fn with_turn_timeout(mut self, turn_timeout: Duration) -> Self {
        self.turn_timeout = turn_timeout;
        self
    }

    pub fn with_max_turns(mut self, max_turns: u64) -> Self {
        self.max_turns = Some(max_turns);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `COMBAT_TURN_TIMEOUT_MS` - Provider deadline per turn (default: 30000)
    /// - `COMBAT_EVENT_BUFFER` - Broadcast capacity per topic (default: 100)
    /// - `COMBAT_MAX_ACTION_ATTEMPTS` - Rejections before passing (default: 3)
    /// - `COMBAT_MAX_TURNS` - Turn cap (default: none)
    /// - `COMBAT_SEED` - RNG seed (default: entropy)
    /// - `COMBAT_COMBO_WINDOW` - Combo window in seconds (default: 1.0)
    /// - `COMBAT_TURN_ROUNDS` - `true` to schedule turns in rounds (default: false)
    ///
    /// Unparsable values are ignored.
    pub fn from_env() -> Self {
        Self::default().merge_env()
    }

    /// Overrides fields of `self` with whatever the environment sets.
    pub fn merge_env(mut self) -> Self {
        if let Some(millis) = read_env::<u64>("COMBAT_TURN_TIMEOUT_MS") {
            self.turn_timeout = Duration::from_millis(millis);
        }
        if let Some(capacity) = read_env::<usize>("COMBAT_EVENT_BUFFER") {
            self.event_buffer_size = capacity.max(1);
        }
        if let Some(attempts) = read_env::<u32>("COMBAT_MAX_ACTION_ATTEMPTS") {
            self.max_action_attempts = attempts.max(1);
        }
        if let Some(max_turns) = read_env::<u64>("COMBAT_MAX_TURNS") {
            self.max_turns = Some(max_turns);
        }
        if let Some(seed) = read_env::<u64>("COMBAT_SEED") {
            self.seed = Some(seed);
        }
        if let Some(window) = read_env::<f64>("COMBAT_COMBO_WINDOW")
            && window >= 0.0
        {
            self.combat.combo_window = window;
        }
        if let Some(rounds) = read_env::<bool>("COMBAT_TURN_ROUNDS") {
            self.combat.turn_rounds = rounds;
        }

        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            combat: CombatConfig::default(),
            turn_timeout: Self::DEFAULT_TURN_TIMEOUT,
            event_buffer_size: Self::DEFAULT_EVENT_BUFFER,
            max_action_attempts: Self::DEFAULT_MAX_ACTION_ATTEMPTS,
            max_turns: None,
            seed: None,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.turn_timeout, Duration::from_secs(30));
        assert_eq!(config.event_buffer_size, 100);
        assert_eq!(config.max_action_attempts, 3);
        assert_eq!(config.max_turns, None);
        assert_eq!(config.combat, CombatConfig::default());
    }

    #[test]
    fn builder_helpers() {
        let config = RuntimeConfig::new(CombatConfig::default().with_combo_window(4.0))
            .with_turn_timeout(Duration::from_millis(50))
            .with_max_turns(10)
            .with_seed(7);
        assert_eq!(config.combat.combo_window, 4.0);
        assert_eq!(config.turn_timeout, Duration::from_millis(50));
        assert_eq!(config.max_turns, Some(10));
        assert_eq!(config.seed, Some(7));
    }
}
