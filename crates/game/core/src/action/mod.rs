//! Combat commands and their validation errors.
//!
//! A [`CombatAction`] is produced by an input adapter or the AI, consumed
//! once by [`crate::CombatEngine::submit_action`], then discarded.

use crate::error::{CombatError, ErrorSeverity};
use crate::skill::{SkillError, SkillId};
use crate::state::EntityId;

/// Optional ground target for positional skills.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetPosition {
    pub x: f64,
    pub y: f64,
}

impl TargetPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One entity using one skill on one target.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatAction {
    pub performer: EntityId,
    pub target: EntityId,
    pub skill: SkillId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub position: Option<TargetPosition>,
}

impl CombatAction {
    pub fn new(performer: EntityId, target: EntityId, skill: SkillId) -> Self {
        Self {
            performer,
            target,
            skill,
            position: None,
        }
    }

    /// Basic attack against `target`.
    pub fn attack(performer: EntityId, target: EntityId) -> Self {
        Self::new(performer, target, SkillId::BASIC_ATTACK)
    }

    pub fn with_position(mut self, position: TargetPosition) -> Self {
        self.position = Some(position);
        self
    }
}

/// Reasons a submitted action was rejected. A rejected action leaves the
/// battle untouched.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ActionError {
    #[error("combat is not active")]
    CombatNotActive,

    #[error("it is {expected}'s turn, not {provided}'s")]
    NotCurrentActor {
        expected: EntityId,
        provided: EntityId,
    },

    #[error("performer is defeated")]
    ActorDefeated,

    #[error("performer already acted this turn")]
    AlreadyActed,

    #[error(transparent)]
    Skill(#[from] SkillError),

    #[error("unknown target {0}")]
    UnknownTarget(EntityId),

    #[error("target {0} is defeated")]
    TargetDefeated(EntityId),
}

impl CombatError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Skill(error) => error.severity(),
            Self::CombatNotActive | Self::AlreadyActed => ErrorSeverity::Recoverable,
            Self::NotCurrentActor { .. }
            | Self::ActorDefeated
            | Self::UnknownTarget(_)
            | Self::TargetDefeated(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CombatNotActive => "ACTION_COMBAT_NOT_ACTIVE",
            Self::NotCurrentActor { .. } => "ACTION_NOT_CURRENT_ACTOR",
            Self::ActorDefeated => "ACTION_ACTOR_DEFEATED",
            Self::AlreadyActed => "ACTION_ALREADY_ACTED",
            Self::Skill(error) => error.error_code(),
            Self::UnknownTarget(_) => "ACTION_UNKNOWN_TARGET",
            Self::TargetDefeated(_) => "ACTION_TARGET_DEFEATED",
        }
    }
}
