//! Simulator configuration and content loading.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use combat_content::{ConfigLoader, ContentFactory, RosterLoader, RosterSpec, SkillLoader};
use combat_core::{CombatConfig, SkillRegistry};
use combat_runtime::RuntimeConfig;

/// Where the simulator reads its content from.
#[derive(Clone, Debug)]
pub struct SimConfig {
    pub data_dir: PathBuf,
    pub skills_path: Option<PathBuf>,
    pub roster_path: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
}

impl SimConfig {
    /// Content shipped with `combat-content`.
    pub const DEFAULT_DATA_DIR: &'static str =
        concat!(env!("CARGO_MANIFEST_DIR"), "/../game/content/data");

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `COMBAT_DATA_DIR` - Directory with `combat.toml`, `skills.ron`, `roster.ron`
    /// - `COMBAT_SKILLS_PATH` - Skill catalog, overrides the data directory
    /// - `COMBAT_ROSTER_PATH` - Roster, overrides the data directory
    /// - `COMBAT_CONFIG_PATH` - Combat tuning, overrides the data directory
    pub fn from_env() -> Self {
        Self {
            data_dir: read_path("COMBAT_DATA_DIR")
                .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_DATA_DIR)),
            skills_path: read_path("COMBAT_SKILLS_PATH"),
            roster_path: read_path("COMBAT_ROSTER_PATH"),
            config_path: read_path("COMBAT_CONFIG_PATH"),
        }
    }

    pub fn load_combat_config(&self) -> Result<CombatConfig> {
        match &self.config_path {
            Some(path) => ConfigLoader::load(path),
            None => self.factory().load_config(),
        }
        .context("loading combat config")
    }

    /// Combat config from file, then `COMBAT_*` runtime overrides on top.
    pub fn load_runtime_config(&self) -> Result<RuntimeConfig> {
        Ok(RuntimeConfig::new(self.load_combat_config()?).merge_env())
    }

    pub fn load_skills(&self) -> Result<SkillRegistry> {
        match &self.skills_path {
            Some(path) => SkillLoader::load(path),
            None => self.factory().load_skills(),
        }
        .context("loading skills")
    }

    pub fn load_roster(&self, skills: &SkillRegistry) -> Result<RosterSpec> {
        let roster = match &self.roster_path {
            Some(path) => RosterLoader::load(path)?,
            None => self.factory().load_roster(skills)?,
        };
        roster.validate(skills).context("validating roster")?;
        Ok(roster)
    }

    fn factory(&self) -> ContentFactory {
        ContentFactory::new(&self.data_dir)
    }
}

fn read_path(key: &str) -> Option<PathBuf> {
    env::var_os(key)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shipped() -> SimConfig {
        SimConfig {
            data_dir: PathBuf::from(SimConfig::DEFAULT_DATA_DIR),
            skills_path: None,
            roster_path: None,
            config_path: None,
        }
    }

    #[test]
    fn loads_shipped_content() {
        let sim = shipped();
        let skills = sim.load_skills().unwrap();
        let roster = sim.load_roster(&skills).unwrap();
        assert!(!roster.players.is_empty());
        assert!(!roster.enemies.is_empty());
        assert!(sim.load_combat_config().is_ok());
    }

    #[test]
    fn path_overrides_take_precedence() {
        let sim = SimConfig {
            skills_path: Some(PathBuf::from("/nonexistent/skills.ron")),
            ..shipped()
        };
        let err = sim.load_skills().unwrap_err();
        assert!(format!("{err:#}").contains("loading skills"));
    }
}
