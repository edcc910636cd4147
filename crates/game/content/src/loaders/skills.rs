//! Skill catalog loader.

use std::path::Path;

use combat_core::{Skill, SkillRegistry};

use crate::loaders::{LoadResult, read_file};

/// Loader for skill catalogs from RON files.
pub struct SkillLoader;

impl SkillLoader {
    /// Load a skill catalog into a registry.
    ///
    /// RON format: `Vec<Skill>`. The basic attack (id 0) is always present;
    /// an entry with id 0 replaces the built-in one.
    pub fn load(path: &Path) -> LoadResult<SkillRegistry> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse a skill catalog from RON text.
    pub fn parse(content: &str) -> LoadResult<SkillRegistry> {
        let skills: Vec<Skill> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill catalog RON: {}", e))?;

        for skill in &skills {
            anyhow::ensure!(
                skill.cast_time >= 0.0 && skill.cooldown >= 0.0,
                "skill '{}' has a negative cast time or cooldown",
                skill.name
            );
        }

        SkillRegistry::from_skills(skills)
            .map_err(|e| anyhow::anyhow!("Invalid skill catalog: {}", e))
    }
}
