//! Deterministic combat rules shared across hosts.
//!
//! `combat-core` defines the canonical rules of a turn-based battle (entities,
//! skills, status effects, damage, turn order) and exposes pure APIs that can
//! be driven by the async runtime, tests, or offline balancing tools.
//! All battle state mutation flows through [`engine::CombatEngine`], and the
//! supporting crates depend on the types re-exported here.
pub mod action;
pub mod combat;
pub mod config;
pub mod context;
pub mod effects;
pub mod engine;
pub mod error;
pub mod rng;
pub mod skill;
pub mod state;
pub mod turn;

pub use action::{ActionError, CombatAction, TargetPosition};
pub use combat::{ComboTracker, DamageCalculator, DamageResult, ThreatTable};
pub use config::CombatConfig;
pub use context::CombatContext;
pub use effects::{EffectTick, StatusApplication, StatusEffectEngine};
pub use engine::{
    ActionOutcome, CombatEngine, CombatEvent, CombatOutcome, CombatPhase, EngineError, SetupError,
    SkipReason, CombatState, StateMachine, StateName, StateUpdate, TurnBegin, TurnSummary,
};
pub use error::{CombatError, ErrorSeverity};
pub use rng::{PcgRng, RandomSource};
pub use skill::{CooldownTracker, Skill, SkillError, SkillId, SkillRegistry, TargetType};
pub use state::{
    Attributes, CombatEntity, CombatFlags, ControlKind, Element, EntityId, Resistances, Role,
    StatModifier, StatusEffect, StatusEffectKind, StatusEffects, Team,
};
pub use turn::{TurnEntry, TurnQueue};
