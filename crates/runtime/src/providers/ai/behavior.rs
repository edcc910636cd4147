//! AI personalities and the action categories they weigh.

use combat_core::{RandomSource, Role};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// How an AI-controlled combatant tends to play.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Behavior {
    /// Goes for the kill.
    Aggressive,
    /// Protects itself and hits the strongest enemy.
    Defensive,
    /// Keeps the team alive.
    Support,
    #[default]
    Balanced,
}

impl Behavior {
    pub const ALL: [Behavior; 4] = [
        Behavior::Aggressive,
        Behavior::Defensive,
        Behavior::Support,
        Behavior::Balanced,
    ];

    /// Default behavior for a combat role.
    pub const fn for_role(role: Role) -> Self {
        match role {
            Role::Tank => Behavior::Defensive,
            Role::Striker => Behavior::Aggressive,
            Role::Healer => Behavior::Support,
            Role::Caster => Behavior::Balanced,
        }
    }

    /// Weights of the random category draw.
    pub const fn weights(self) -> CategoryWeights {
        match self {
            Behavior::Aggressive => CategoryWeights::new(80, 10, 10),
            Behavior::Defensive => CategoryWeights::new(30, 50, 20),
            Behavior::Support => CategoryWeights::new(30, 20, 50),
            Behavior::Balanced => CategoryWeights::new(50, 25, 25),
        }
    }
}

/// What kind of action the AI is looking for this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum ActionCategory {
    Attack,
    Defend,
    Heal,
}

/// Relative odds of each [`ActionCategory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryWeights {
    pub attack: u32,
    pub defend: u32,
    pub heal: u32,
}

impl CategoryWeights {
    pub const fn new(attack: u32, defend: u32, heal: u32) -> Self {
        Self {
            attack,
            defend,
            heal,
        }
    }

    /// Weighted draw. All-zero weights fall back to attacking.
    pub fn pick(&self, rng: &mut dyn RandomSource) -> ActionCategory {
        match rng.pick_weighted(&[self.attack, self.defend, self.heal]) {
            Some(1) => ActionCategory::Defend,
            Some(2) => ActionCategory::Heal,
            _ => ActionCategory::Attack,
        }
    }
}
