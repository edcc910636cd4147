//! Content factory for loading a whole battle setup from a data directory.

use std::path::{Path, PathBuf};

use combat_core::{CombatConfig, SkillRegistry};

use crate::loaders::{ConfigLoader, LoadResult, RosterLoader, RosterSpec, SkillLoader};

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── combat.toml
/// ├── skills.ron
/// └── roster.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const CONFIG_FILE: &'static str = "combat.toml";
    pub const SKILLS_FILE: &'static str = "skills.ron";
    pub const ROSTER_FILE: &'static str = "roster.ron";

    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat tuning from `combat.toml`, or defaults if it is absent.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join(Self::CONFIG_FILE);
        if !path.exists() {
            return Ok(CombatConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the skill catalog from `skills.ron`.
    pub fn load_skills(&self) -> LoadResult<SkillRegistry> {
        SkillLoader::load(&self.data_dir.join(Self::SKILLS_FILE))
    }

    /// Load the roster from `roster.ron` and check its skill references.
    pub fn load_roster(&self, skills: &SkillRegistry) -> LoadResult<RosterSpec> {
        let roster = RosterLoader::load(&self.data_dir.join(Self::ROSTER_FILE))?;
        roster.validate(skills)?;
        Ok(roster)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn loads_a_full_data_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(
            dir.path().join(ContentFactory::SKILLS_FILE),
            "#![enable(unwrap_newtypes)]\n[(id: 1, name: \"Cleave\", damage: 12)]",
        )
        .expect("write skills");
        std::fs::write(
            dir.path().join(ContentFactory::ROSTER_FILE),
            "#![enable(unwrap_newtypes)]\n(players: [(name: \"A\", max_health: 10, skills: [1])], \
             enemies: [(name: \"B\", max_health: 10)])",
        )
        .expect("write roster");

        let factory = ContentFactory::new(dir.path());
        let config = factory.load_config().expect("defaults without combat.toml");
        assert_eq!(config, CombatConfig::default());

        let skills = factory.load_skills().expect("skills");
        let roster = factory.load_roster(&skills).expect("roster");
        assert_eq!(roster.templates().count(), 2);
    }

    #[test]
    fn shipped_data_loads() {
        let factory = ContentFactory::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"));
        let config = factory.load_config().expect("shipped config");
        let skills = factory.load_skills().expect("shipped skills");
        let roster = factory.load_roster(&skills).expect("shipped roster");
        assert!(config.combo_window > 0.0);
        assert!(config.turn_rounds);
        assert!(!roster.players.is_empty());
        assert!(!roster.enemies.is_empty());
    }
}
