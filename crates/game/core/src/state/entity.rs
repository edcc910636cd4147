use core::fmt;

use bitflags::bitflags;

use super::attributes::Attributes;
use super::resistance::{Element, Resistances};
use super::status::{ControlKind, StatusEffects};
use crate::skill::SkillId;

/// Unique identifier of a combatant within one battle.
///
/// Ids are assigned by the engine at setup in roster order (players first).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Side an entity fights on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Team {
    Player,
    Enemy,
}

impl Team {
    /// The opposing side.
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Team::Player => "player",
            Team::Enemy => "enemy",
        };
        write!(f, "{}", label)
    }
}

/// Combat role, used by hosts to pick a default AI behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    Tank,
    #[default]
    Striker,
    Caster,
    Healer,
}

bitflags! {
    /// Per-turn and control flags of a combatant.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CombatFlags: u8 {
        /// Already performed an action this turn.
        const HAS_ACTED = 0b0000_0001;
        /// Under a stun effect; turns are skipped.
        const STUNNED   = 0b0000_0010;
        /// Under a silence effect; mana skills are blocked.
        const SILENCED  = 0b0000_0100;
    }
}

/// A combatant for the duration of one battle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatEntity {
    pub id: EntityId,
    pub name: String,
    pub team: Team,
    pub role: Role,
    health: u32,
    max_health: u32,
    mana: u32,
    max_mana: u32,
    attributes: Attributes,
    flags: CombatFlags,
    pub resistances: Resistances,
    pub skills: Vec<SkillId>,
    effects: StatusEffects,
}

impl CombatEntity {
    /// Creates an entity at full health and mana.
    pub fn new(
        name: impl Into<String>,
        team: Team,
        role: Role,
        max_health: u32,
        max_mana: u32,
    ) -> Self {
        Self {
            id: EntityId::default(),
            name: name.into(),
            team,
            role,
            health: max_health,
            max_health,
            mana: max_mana,
            max_mana,
            attributes: Attributes::default(),
            flags: CombatFlags::empty(),
            resistances: Resistances::default(),
            skills: Vec::new(),
            effects: StatusEffects::empty(),
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_resistance(mut self, element: Element, percent: f64) -> Self {
        self.resistances.set(element, percent);
        self
    }

    pub fn with_skills(mut self, skills: impl IntoIterator<Item = SkillId>) -> Self {
        self.skills.extend(skills);
        self
    }

    /// Starts the entity below full health (clamped to `max_health`).
    pub fn with_health(mut self, health: u32) -> Self {
        self.health = health.min(self.max_health);
        self
    }

    /// Starts the entity below full mana (clamped to `max_mana`).
    pub fn with_mana(mut self, mana: u32) -> Self {
        self.mana = mana.min(self.max_mana);
        self
    }

    // ===== resources =====

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn mana(&self) -> u32 {
        self.mana
    }

    pub fn max_mana(&self) -> u32 {
        self.max_mana
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Health as a fraction of maximum in `[0, 1]`.
    pub fn health_percent(&self) -> f64 {
        if self.max_health == 0 {
            return 0.0;
        }
        f64::from(self.health) / f64::from(self.max_health)
    }

    /// Mana as a fraction of maximum in `[0, 1]`; 0 for entities without mana.
    pub fn mana_percent(&self) -> f64 {
        if self.max_mana == 0 {
            return 0.0;
        }
        f64::from(self.mana) / f64::from(self.max_mana)
    }

    /// Reduces health, clamped at 0. Returns the health actually removed.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.health);
        self.health -= dealt;
        dealt
    }

    /// Restores health, clamped at `max_health`. Returns the health actually
    /// restored. Defeated entities cannot be healed.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if !self.is_alive() {
            return 0;
        }
        let restored = amount.min(self.max_health - self.health);
        self.health += restored;
        restored
    }

    /// Deducts mana if enough is available. Returns false (and changes
    /// nothing) otherwise.
    pub fn spend_mana(&mut self, amount: u32) -> bool {
        if self.mana < amount {
            return false;
        }
        self.mana -= amount;
        true
    }

    /// Restores mana, clamped at `max_mana`. Returns the mana actually restored.
    pub fn restore_mana(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max_mana - self.mana);
        self.mana += restored;
        restored
    }

    // ===== attributes & flags =====

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub(crate) fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    pub fn flags(&self) -> CombatFlags {
        self.flags
    }

    pub fn has_acted(&self) -> bool {
        self.flags.contains(CombatFlags::HAS_ACTED)
    }

    pub fn is_stunned(&self) -> bool {
        self.flags.contains(CombatFlags::STUNNED)
    }

    pub fn is_silenced(&self) -> bool {
        self.flags.contains(CombatFlags::SILENCED)
    }

    pub(crate) fn set_acted(&mut self, acted: bool) {
        self.flags.set(CombatFlags::HAS_ACTED, acted);
    }

    /// Recomputes `STUNNED` / `SILENCED` from the active control effects.
    pub(crate) fn refresh_control_flags(&mut self) {
        let stunned = self.effects.has_control(ControlKind::Stun);
        let silenced = self.effects.has_control(ControlKind::Silence);
        self.flags.set(CombatFlags::STUNNED, stunned);
        self.flags.set(CombatFlags::SILENCED, silenced);
    }

    // ===== skills & effects =====

    /// Checks whether the entity has access to a skill. The basic attack is
    /// always known.
    pub fn knows(&self, skill: SkillId) -> bool {
        skill == SkillId::BASIC_ATTACK || self.skills.contains(&skill)
    }

    pub fn status_effects(&self) -> &StatusEffects {
        &self.effects
    }

    pub(crate) fn status_effects_mut(&mut self) -> &mut StatusEffects {
        &mut self.effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knight() -> CombatEntity {
        CombatEntity::new("Knight", Team::Player, Role::Tank, 100, 40)
    }

    #[test]
    fn damage_clamps_at_zero() {
        let mut entity = knight();
        assert_eq!(entity.take_damage(30), 30);
        assert_eq!(entity.health(), 70);
        assert_eq!(entity.take_damage(500), 70);
        assert_eq!(entity.health(), 0);
        assert!(!entity.is_alive());
        assert_eq!(entity.take_damage(10), 0);
    }

    #[test]
    fn healing_clamps_at_max_and_skips_the_dead() {
        let mut entity = knight();
        entity.take_damage(20);
        assert_eq!(entity.heal(50), 20);
        assert_eq!(entity.health(), 100);

        entity.take_damage(100);
        assert_eq!(entity.heal(50), 0);
        assert_eq!(entity.health(), 0);
    }

    #[test]
    fn mana_is_all_or_nothing_and_clamped() {
        let mut entity = knight();
        assert!(entity.spend_mana(30));
        assert_eq!(entity.mana(), 10);
        assert!(!entity.spend_mana(11));
        assert_eq!(entity.mana(), 10);
        assert_eq!(entity.restore_mana(100), 30);
        assert_eq!(entity.mana(), 40);
    }

    #[test]
    fn arbitrary_sequences_keep_pools_in_bounds() {
        let mut entity = knight().with_health(55).with_mana(12);
        let amounts = [0, 7, 130, 3, 99, 1, 250, 45, 45, 45];
        for (step, amount) in amounts.iter().copied().enumerate() {
            match step % 4 {
                0 => {
                    entity.take_damage(amount);
                }
                1 => {
                    entity.heal(amount);
                }
                2 => {
                    entity.spend_mana(amount);
                }
                _ => {
                    entity.restore_mana(amount);
                }
            }
            assert!(entity.health() <= entity.max_health());
            assert!(entity.mana() <= entity.max_mana());
        }
    }

    #[test]
    fn percentages_handle_empty_pools() {
        let entity = CombatEntity::new("Golem", Team::Enemy, Role::Tank, 80, 0).with_health(20);
        assert_eq!(entity.health_percent(), 0.25);
        assert_eq!(entity.mana_percent(), 0.0);
    }

    #[test]
    fn basic_attack_is_always_known() {
        let entity = knight().with_skills([SkillId(3)]);
        assert!(entity.knows(SkillId::BASIC_ATTACK));
        assert!(entity.knows(SkillId(3)));
        assert!(!entity.knows(SkillId(4)));
    }

    #[test]
    fn team_opponent_is_symmetric() {
        assert_eq!(Team::Player.opponent(), Team::Enemy);
        assert_eq!(Team::Enemy.opponent().opponent(), Team::Enemy);
    }
}
