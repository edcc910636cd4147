use core::fmt;

use crate::state::{Element, StatusEffect};

/// Identifier of a skill in a [`super::SkillRegistry`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillId(pub u32);

impl SkillId {
    /// The zero-mana attack every entity knows.
    pub const BASIC_ATTACK: SkillId = SkillId(0);
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "skill:{}", self.0)
    }
}

/// Which entities a skill affects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetType {
    /// The performer only; the action target is ignored.
    #[cfg_attr(feature = "serde", serde(rename = "Self"))]
    SelfOnly,
    /// The action target.
    #[default]
    Single,
    /// Every living member of the performer's opposing team.
    AllEnemies,
    /// Every living member of the performer's team, performer included.
    AllAllies,
    /// The action target and every other living member of its team.
    Area,
}

/// Immutable skill definition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub healing: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mana_cost: u32,
    /// Combat-clock seconds spent casting before the skill resolves.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cast_time: f64,
    /// Combat-clock seconds before the performer may use it again.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub element: Option<Element>,
    /// Effect template applied to every affected entity.
    #[cfg_attr(feature = "serde", serde(default))]
    pub status_effect: Option<StatusEffect>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub target: TargetType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub range: f64,
}

impl Skill {
    pub fn new(id: SkillId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            damage: 0,
            healing: 0,
            mana_cost: 0,
            cast_time: 0.0,
            cooldown: 0.0,
            element: None,
            status_effect: None,
            target: TargetType::Single,
            range: 1.0,
        }
    }

    /// The registry's built-in basic attack: strength-only damage, free.
    pub fn basic_attack() -> Self {
        Self::new(SkillId::BASIC_ATTACK, "Attack")
    }

    pub fn with_damage(mut self, damage: u32) -> Self {
        self.damage = damage;
        self
    }

    pub fn with_healing(mut self, healing: u32) -> Self {
        self.healing = healing;
        self
    }

    pub fn with_mana_cost(mut self, mana_cost: u32) -> Self {
        self.mana_cost = mana_cost;
        self
    }

    pub fn with_cast_time(mut self, cast_time: f64) -> Self {
        self.cast_time = cast_time;
        self
    }

    pub fn with_cooldown(mut self, cooldown: f64) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    pub fn with_status_effect(mut self, effect: StatusEffect) -> Self {
        self.status_effect = Some(effect);
        self
    }

    pub fn with_target(mut self, target: TargetType) -> Self {
        self.target = target;
        self
    }

    /// Deals damage when resolved.
    ///
    /// Skills with explicit damage are offensive, and so is any skill that
    /// neither heals nor applies an effect (the basic attack).
    pub fn is_offensive(&self) -> bool {
        self.damage > 0 || (self.healing == 0 && self.status_effect.is_none())
    }

    pub fn is_healing(&self) -> bool {
        self.healing > 0
    }

    /// Targets the performer's own side rather than the opponents.
    pub fn is_supportive(&self) -> bool {
        matches!(self.target, TargetType::SelfOnly | TargetType::AllAllies)
    }

    pub fn requires_cast(&self) -> bool {
        self.cast_time > 0.0
    }
}
