//! Engine-level error types.

use crate::error::{CombatError, ErrorSeverity};
use crate::skill::SkillId;
use crate::state::{EntityId, Team};

/// Rejected battle setups. Returned before any turn runs.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("{0} roster has no living combatants")]
    EmptyRoster(Team),

    #[error("combatant '{entity}' references unknown {skill}")]
    UnknownSkill { entity: String, skill: SkillId },

    #[error("combatant '{0}' has zero max health")]
    ZeroMaxHealth(String),
}

impl CombatError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyRoster(_) => "SETUP_EMPTY_ROSTER",
            Self::UnknownSkill { .. } => "SETUP_UNKNOWN_SKILL",
            Self::ZeroMaxHealth(_) => "SETUP_ZERO_MAX_HEALTH",
        }
    }
}

/// Turn-step calls made out of order.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("combat has not started")]
    NotStarted,

    #[error("combat already started")]
    AlreadyStarted,

    #[error("combat is finished")]
    Finished,

    #[error("turn of {0} is still in progress")]
    TurnInProgress(EntityId),

    #[error("no turn is in progress")]
    NoActiveTurn,

    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),
}

impl CombatError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Finished => ErrorSeverity::Recoverable,
            Self::UnknownEntity(_) => ErrorSeverity::Validation,
            Self::NotStarted
            | Self::AlreadyStarted
            | Self::TurnInProgress(_)
            | Self::NoActiveTurn => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotStarted => "ENGINE_NOT_STARTED",
            Self::AlreadyStarted => "ENGINE_ALREADY_STARTED",
            Self::Finished => "ENGINE_FINISHED",
            Self::TurnInProgress(_) => "ENGINE_TURN_IN_PROGRESS",
            Self::NoActiveTurn => "ENGINE_NO_ACTIVE_TURN",
            Self::UnknownEntity(_) => "ENGINE_UNKNOWN_ENTITY",
        }
    }
}
