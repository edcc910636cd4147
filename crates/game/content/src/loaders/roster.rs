//! Roster loader.
//!
//! A roster lists the combatants of both teams as templates. Templates are
//! turned into [`CombatEntity`] values at battle setup; the engine assigns
//! ids in roster order, players first.

use std::path::Path;

use combat_core::{Attributes, CombatEntity, Element, Role, SkillId, SkillRegistry, Team};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Who chooses a combatant's actions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerSpec {
    /// AI decision engine, behavior taken from the template or its role.
    #[default]
    Ai,
    /// An external input adapter (human or network).
    Interactive,
    /// Always passes.
    Pass,
}

/// Data-file description of one combatant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombatantTemplate {
    pub name: String,
    #[serde(default)]
    pub role: Role,
    pub max_health: u32,
    #[serde(default)]
    pub max_mana: u32,
    #[serde(default)]
    pub attributes: Attributes,
    /// `(element, percent)` pairs; unlisted elements stay at 0.
    #[serde(default)]
    pub resistances: Vec<(Element, f64)>,
    #[serde(default)]
    pub skills: Vec<SkillId>,
    #[serde(default)]
    pub controller: ControllerSpec,
    /// AI behavior name (`Aggressive`, `Defensive`, `Support`, `Balanced`).
    #[serde(default)]
    pub behavior: Option<String>,
}

impl CombatantTemplate {
    /// Builds a full-health entity for `team`.
    pub fn to_entity(&self, team: Team) -> CombatEntity {
        let entity = CombatEntity::new(
            self.name.clone(),
            team,
            self.role,
            self.max_health,
            self.max_mana,
        )
        .with_attributes(self.attributes)
        .with_skills(self.skills.iter().copied());

        self.resistances
            .iter()
            .fold(entity, |entity, &(element, percent)| {
                entity.with_resistance(element, percent)
            })
    }
}

/// Both teams of a battle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterSpec {
    pub players: Vec<CombatantTemplate>,
    pub enemies: Vec<CombatantTemplate>,
}

impl RosterSpec {
    pub fn player_entities(&self) -> Vec<CombatEntity> {
        self.players
            .iter()
            .map(|template| template.to_entity(Team::Player))
            .collect()
    }

    pub fn enemy_entities(&self) -> Vec<CombatEntity> {
        self.enemies
            .iter()
            .map(|template| template.to_entity(Team::Enemy))
            .collect()
    }

    /// Templates in engine id order (players first).
    pub fn templates(&self) -> impl Iterator<Item = &CombatantTemplate> {
        self.players.iter().chain(&self.enemies)
    }

    /// Checks every referenced skill exists in `skills`.
    pub fn validate(&self, skills: &SkillRegistry) -> LoadResult<()> {
        for template in self.templates() {
            if let Some(missing) = template.skills.iter().find(|id| !skills.contains(**id)) {
                anyhow::bail!(
                    "combatant '{}' references unknown {}",
                    template.name,
                    missing
                );
            }
        }
        Ok(())
    }
}

/// Loader for rosters from RON files.
pub struct RosterLoader;

impl RosterLoader {
    /// Load a roster from a RON file.
    ///
    /// RON format: `RosterSpec { players: [...], enemies: [...] }`.
    pub fn load(path: &Path) -> LoadResult<RosterSpec> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse a roster from RON text.
    pub fn parse(content: &str) -> LoadResult<RosterSpec> {
        let roster: RosterSpec = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse roster RON: {}", e))?;

        anyhow::ensure!(!roster.players.is_empty(), "roster has no players");
        anyhow::ensure!(!roster.enemies.is_empty(), "roster has no enemies");
        if let Some(template) = roster.templates().find(|template| template.max_health == 0) {
            anyhow::bail!("combatant '{}' has zero max_health", template.name);
        }

        Ok(roster)
    }
}
