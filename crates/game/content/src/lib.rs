//! Data-driven combat content and loaders.
//!
//! This crate reads static battle content from RON/TOML data files:
//! - Skill catalogs (RON)
//! - Rosters of combatant templates for both teams (RON)
//! - Combat tuning (TOML)
//!
//! Everything here produces `combat-core` values; nothing is kept alive once
//! a battle has been set up.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    CombatantTemplate, ConfigLoader, ContentFactory, ControllerSpec, LoadResult, RosterLoader,
    RosterSpec, SkillLoader,
};
