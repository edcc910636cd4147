use core::fmt;

use crate::effects::StatusApplication;
use crate::skill::SkillId;
use crate::state::{Element, EntityId, Team};

/// How a battle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatOutcome {
    /// The named team is the only one with living members.
    Victory(Team),
    /// Both teams lost their last members in the same step.
    Draw,
    /// Stopped by the host before either team was defeated.
    Cancelled,
}

impl CombatOutcome {
    pub fn winner(&self) -> Option<Team> {
        match self {
            Self::Victory(team) => Some(*team),
            Self::Draw | Self::Cancelled => None,
        }
    }
}

impl fmt::Display for CombatOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Victory(team) => write!(f, "{team} victory"),
            Self::Draw => f.write_str("draw"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Why an entity did not get to act on its turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkipReason {
    Stunned,
    /// Died from damage over time at the start of its turn.
    DefeatedByEffects,
    /// Dequeued while defeated or missing; the queue was out of sync.
    Anomaly,
}

/// Everything observable that happens in a battle, in emission order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatEvent {
    CombatStarted {
        players: usize,
        enemies: usize,
    },
    TurnStarted {
        entity: EntityId,
        turn: u64,
    },
    TurnEnded {
        entity: EntityId,
        turn: u64,
    },
    TurnSkipped {
        entity: EntityId,
        reason: SkipReason,
    },
    ActionPerformed {
        performer: EntityId,
        skill: SkillId,
        targets: Vec<EntityId>,
    },
    DamageDealt {
        attacker: EntityId,
        target: EntityId,
        amount: u32,
        critical: bool,
        element: Option<Element>,
    },
    HealingDone {
        healer: EntityId,
        target: EntityId,
        amount: u32,
    },
    StatusApplied {
        target: EntityId,
        effect: String,
        application: StatusApplication,
    },
    StatusTicked {
        entity: EntityId,
        effect: String,
        damage: u32,
        healing: u32,
        remaining: u32,
    },
    StatusExpired {
        entity: EntityId,
        effect: String,
    },
    ComboTriggered {
        entity: EntityId,
        count: usize,
    },
    CombatantDefeated {
        entity: EntityId,
        team: Team,
    },
    CombatEnded {
        outcome: CombatOutcome,
    },
}

impl CombatEvent {
    /// Short stable name, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CombatStarted { .. } => "combat_started",
            Self::TurnStarted { .. } => "turn_started",
            Self::TurnEnded { .. } => "turn_ended",
            Self::TurnSkipped { .. } => "turn_skipped",
            Self::ActionPerformed { .. } => "action_performed",
            Self::DamageDealt { .. } => "damage_dealt",
            Self::HealingDone { .. } => "healing_done",
            Self::StatusApplied { .. } => "status_applied",
            Self::StatusTicked { .. } => "status_ticked",
            Self::StatusExpired { .. } => "status_expired",
            Self::ComboTriggered { .. } => "combo_triggered",
            Self::CombatantDefeated { .. } => "combatant_defeated",
            Self::CombatEnded { .. } => "combat_ended",
        }
    }
}
