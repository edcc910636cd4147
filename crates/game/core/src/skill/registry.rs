use std::collections::BTreeMap;

use super::{CooldownTracker, Skill, SkillId};
use crate::error::{CombatError, ErrorSeverity};
use crate::state::{CombatEntity, EntityId};

/// Reasons a skill cannot be used right now.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SkillError {
    #[error("unknown skill {0}")]
    UnknownSkill(SkillId),

    #[error("entity {entity} does not know {skill}")]
    NotKnown { entity: EntityId, skill: SkillId },

    #[error("insufficient mana: {required} required, {available} available")]
    InsufficientMana { required: u32, available: u32 },

    #[error("{skill} is on cooldown until {ready_at:.2}")]
    OnCooldown { skill: SkillId, ready_at: f64 },

    #[error("entity {0} is silenced")]
    Silenced(EntityId),

    #[error("skill id {0} is already registered")]
    DuplicateSkill(SkillId),
}

impl CombatError for SkillError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InsufficientMana { .. } | Self::OnCooldown { .. } | Self::Silenced(_) => {
                ErrorSeverity::Recoverable
            }
            Self::UnknownSkill(_) | Self::NotKnown { .. } => ErrorSeverity::Validation,
            Self::DuplicateSkill(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownSkill(_) => "SKILL_UNKNOWN",
            Self::NotKnown { .. } => "SKILL_NOT_KNOWN",
            Self::InsufficientMana { .. } => "SKILL_INSUFFICIENT_MANA",
            Self::OnCooldown { .. } => "SKILL_ON_COOLDOWN",
            Self::Silenced(_) => "SKILL_SILENCED",
            Self::DuplicateSkill(_) => "SKILL_DUPLICATE",
        }
    }
}

/// Static skill catalog.
///
/// Always contains [`Skill::basic_attack`] under [`SkillId::BASIC_ATTACK`].
#[derive(Clone, Debug)]
pub struct SkillRegistry {
    skills: BTreeMap<SkillId, Skill>,
}

impl SkillRegistry {
    /// Creates a registry holding only the basic attack.
    pub fn new() -> Self {
        let mut skills = BTreeMap::new();
        skills.insert(SkillId::BASIC_ATTACK, Skill::basic_attack());
        Self { skills }
    }

    /// Builds a registry from a list of definitions.
    ///
    /// A definition with id 0 replaces the built-in basic attack.
    pub fn from_skills(skills: impl IntoIterator<Item = Skill>) -> Result<Self, SkillError> {
        let mut registry = Self::new();
        let mut basic_replaced = false;
        for skill in skills {
            if skill.id == SkillId::BASIC_ATTACK && !basic_replaced {
                basic_replaced = true;
                registry.skills.insert(skill.id, skill);
                continue;
            }
            registry.register(skill)?;
        }
        Ok(registry)
    }

    /// Adds a definition. Ids must be unique.
    pub fn register(&mut self, skill: Skill) -> Result<(), SkillError> {
        if self.skills.contains_key(&skill.id) {
            return Err(SkillError::DuplicateSkill(skill.id));
        }
        self.skills.insert(skill.id, skill);
        Ok(())
    }

    pub fn get(&self, id: SkillId) -> Option<&Skill> {
        self.skills.get(&id)
    }

    pub fn contains(&self, id: SkillId) -> bool {
        self.skills.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Iterates definitions in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Skill> {
        self.skills.values()
    }

    /// Checks that `entity` may use `skill` at combat time `now`.
    ///
    /// Requirements, in order: the skill exists, the entity knows it, a
    /// silenced entity only uses zero-mana skills, mana covers the cost, and
    /// the cooldown has elapsed.
    pub fn can_use(
        &self,
        entity: &CombatEntity,
        skill: SkillId,
        cooldowns: &CooldownTracker,
        now: f64,
    ) -> Result<&Skill, SkillError> {
        let definition = self.get(skill).ok_or(SkillError::UnknownSkill(skill))?;

        if !entity.knows(skill) {
            return Err(SkillError::NotKnown {
                entity: entity.id,
                skill,
            });
        }

        if entity.is_silenced() && definition.mana_cost > 0 {
            return Err(SkillError::Silenced(entity.id));
        }

        if entity.mana() < definition.mana_cost {
            return Err(SkillError::InsufficientMana {
                required: definition.mana_cost,
                available: entity.mana(),
            });
        }

        if let Some(ready_at) = cooldowns.ready_at(entity.id, skill) {
            if ready_at > now {
                return Err(SkillError::OnCooldown { skill, ready_at });
            }
        }

        Ok(definition)
    }

    /// Pays for a skill: deducts mana and, when the skill has a cooldown,
    /// schedules `now + cooldown`. No other side effects.
    pub fn use_skill(
        &self,
        entity: &mut CombatEntity,
        skill: SkillId,
        cooldowns: &mut CooldownTracker,
        now: f64,
    ) -> Result<&Skill, SkillError> {
        let definition = self.can_use(entity, skill, cooldowns, now)?;

        if !entity.spend_mana(definition.mana_cost) {
            return Err(SkillError::InsufficientMana {
                required: definition.mana_cost,
                available: entity.mana(),
            });
        }

        if definition.cooldown > 0.0 {
            cooldowns.schedule(entity.id, skill, now + definition.cooldown);
        }

        Ok(definition)
    }

    /// Every skill `entity` could use right now, in id order.
    pub fn usable_by<'a>(
        &'a self,
        entity: &'a CombatEntity,
        cooldowns: &'a CooldownTracker,
        now: f64,
    ) -> impl Iterator<Item = &'a Skill> + 'a {
        self.skills
            .keys()
            .filter_map(move |&id| self.can_use(entity, id, cooldowns, now).ok())
    }
}

impl Default for SkillRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ControlKind, Role, StatusEffect, Team};
    use crate::StatusEffectEngine;

    fn registry() -> SkillRegistry {
        SkillRegistry::from_skills([
            Skill::new(SkillId(1), "Fireball")
                .with_damage(25)
                .with_mana_cost(10)
                .with_cooldown(2.0),
            Skill::new(SkillId(2), "Jab").with_damage(5),
        ])
        .expect("unique ids")
    }

    fn mage() -> CombatEntity {
        CombatEntity::new("Mage", Team::Player, Role::Caster, 60, 15)
            .with_skills([SkillId(1), SkillId(2)])
    }

    #[test]
    fn use_deducts_mana_and_schedules_cooldown() {
        let registry = registry();
        let mut cooldowns = CooldownTracker::new();
        let mut mage = mage();

        registry
            .use_skill(&mut mage, SkillId(1), &mut cooldowns, 10.0)
            .expect("usable");
        assert_eq!(mage.mana(), 5);
        assert_eq!(cooldowns.ready_at(mage.id, SkillId(1)), Some(12.0));

        let err = registry.can_use(&mage, SkillId(1), &cooldowns, 11.0).unwrap_err();
        assert_eq!(
            err,
            SkillError::InsufficientMana {
                required: 10,
                available: 5
            }
        );
    }

    #[test]
    fn zero_cooldown_skills_never_schedule() {
        let registry = registry();
        let mut cooldowns = CooldownTracker::new();
        let mut mage = mage();

        registry
            .use_skill(&mut mage, SkillId(2), &mut cooldowns, 0.0)
            .expect("usable");
        assert!(cooldowns.is_empty());
    }

    #[test]
    fn cooldown_blocks_until_elapsed() {
        let registry = registry();
        let mut cooldowns = CooldownTracker::new();
        let mut mage = mage();
        mage.restore_mana(100);

        registry
            .use_skill(&mut mage, SkillId(1), &mut cooldowns, 0.0)
            .expect("usable");
        mage.restore_mana(100);

        assert!(matches!(
            registry.can_use(&mage, SkillId(1), &cooldowns, 1.0),
            Err(SkillError::OnCooldown { ready_at, .. }) if ready_at == 2.0
        ));
        assert!(registry.can_use(&mage, SkillId(1), &cooldowns, 2.0).is_ok());
    }

    #[test]
    fn unknown_and_unlearned_skills_are_rejected() {
        let registry = registry();
        let cooldowns = CooldownTracker::new();
        let novice = CombatEntity::new("Novice", Team::Player, Role::Striker, 30, 0);

        assert_eq!(
            registry.can_use(&novice, SkillId(99), &cooldowns, 0.0).unwrap_err(),
            SkillError::UnknownSkill(SkillId(99))
        );
        assert!(matches!(
            registry.can_use(&novice, SkillId(2), &cooldowns, 0.0),
            Err(SkillError::NotKnown { .. })
        ));
        assert!(registry
            .can_use(&novice, SkillId::BASIC_ATTACK, &cooldowns, 0.0)
            .is_ok());
    }

    #[test]
    fn silence_blocks_mana_skills_only() {
        let registry = registry();
        let cooldowns = CooldownTracker::new();
        let mut mage = mage();
        StatusEffectEngine::new().apply(
            &mut mage,
            &StatusEffect::control("Hush", 2, ControlKind::Silence),
        );

        assert!(matches!(
            registry.can_use(&mage, SkillId(1), &cooldowns, 0.0),
            Err(SkillError::Silenced(_))
        ));
        assert!(registry.can_use(&mage, SkillId(2), &cooldowns, 0.0).is_ok());

        let usable: Vec<SkillId> = registry.usable_by(&mage, &cooldowns, 0.0).map(|s| s.id).collect();
        assert_eq!(usable, vec![SkillId::BASIC_ATTACK, SkillId(2)]);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut registry = registry();
        assert_eq!(
            registry.register(Skill::new(SkillId(2), "Again")),
            Err(SkillError::DuplicateSkill(SkillId(2)))
        );
    }
}
