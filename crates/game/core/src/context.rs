//! Read-only battle snapshot handed to action providers.

use crate::skill::{Skill, SkillId};
use crate::state::{CombatEntity, EntityId};

/// What an acting entity can see when choosing its action.
///
/// Built by [`crate::CombatEngine::context_for`]. Entities and skills are
/// cloned so the snapshot can cross task boundaries while the engine keeps
/// running.
#[derive(Clone, Debug)]
pub struct CombatContext {
    pub actor: CombatEntity,
    /// Members of the actor's team, actor excluded, in id order.
    pub allies: Vec<CombatEntity>,
    /// Members of the opposing team in id order, defeated ones included.
    pub enemies: Vec<CombatEntity>,
    /// Skills the actor could use right now.
    pub available_skills: Vec<Skill>,
    pub turn: u64,
    /// Combat clock in seconds.
    pub clock: f64,
    /// Living attacker with the most accumulated threat against the actor.
    pub aggressor: Option<EntityId>,
}

impl CombatContext {
    pub fn actor_id(&self) -> EntityId {
        self.actor.id
    }

    pub fn health_percent(&self) -> f64 {
        self.actor.health_percent()
    }

    pub fn mana_percent(&self) -> f64 {
        self.actor.mana_percent()
    }

    pub fn living_enemies(&self) -> impl Iterator<Item = &CombatEntity> {
        self.enemies.iter().filter(|entity| entity.is_alive())
    }

    pub fn living_allies(&self) -> impl Iterator<Item = &CombatEntity> {
        self.allies.iter().filter(|entity| entity.is_alive())
    }

    pub fn has_living_enemies(&self) -> bool {
        self.living_enemies().next().is_some()
    }

    pub fn skill(&self, id: SkillId) -> Option<&Skill> {
        self.available_skills.iter().find(|skill| skill.id == id)
    }

    /// Looks up any entity visible in the snapshot.
    pub fn entity(&self, id: EntityId) -> Option<&CombatEntity> {
        std::iter::once(&self.actor)
            .chain(&self.allies)
            .chain(&self.enemies)
            .find(|entity| entity.id == id)
    }
}
