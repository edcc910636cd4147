/// Combat configuration constants and tunable parameters.
///
/// One config is handed to each [`crate::CombatEngine`]; nothing here is
/// process-wide.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Maximum gap (combat-clock seconds) between two attacks of the same
    /// entity for them to count as one chain.
    pub combo_window: f64,

    /// Combat-clock seconds that elapse at the end of every turn.
    ///
    /// Cooldowns and combo windows are measured against this clock.
    pub turn_duration: f64,

    /// Increment applied to a turn priority until it no longer collides with
    /// an existing queue entry.
    pub priority_step: f64,

    /// Schedule turns in rounds: an entity re-enqueued after its turn waits
    /// until every other living entity has acted. Off by default, in which
    /// case the highest priority always acts next.
    pub turn_rounds: bool,
}

impl CombatConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_COMBO_WINDOW: f64 = 1.0;
    pub const DEFAULT_TURN_DURATION: f64 = 1.0;
    pub const DEFAULT_PRIORITY_STEP: f64 = 0.001;

    pub fn new() -> Self {
        Self {
            combo_window: Self::DEFAULT_COMBO_WINDOW,
            turn_duration: Self::DEFAULT_TURN_DURATION,
            priority_step: Self::DEFAULT_PRIORITY_STEP,
            turn_rounds: false,
        }
    }

    pub fn with_combo_window(mut self, combo_window: f64) -> Self {
        self.combo_window = combo_window;
        self
    }

    pub fn with_turn_duration(mut self, turn_duration: f64) -> Self {
        self.turn_duration = turn_duration;
        self
    }

    pub fn with_turn_rounds(mut self, turn_rounds: bool) -> Self {
        self.turn_rounds = turn_rounds;
        self
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
