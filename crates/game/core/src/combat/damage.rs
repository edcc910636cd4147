//! Damage and healing calculation.

use crate::rng::RandomSource;
use crate::skill::Skill;
use crate::state::{CombatEntity, Element};

/// Result of a damage calculation. Never stored, only reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageResult {
    pub amount: u32,
    pub critical: bool,
    pub element: Option<Element>,
}

/// Deterministic damage/heal formulas.
///
/// # Formula
///
/// ```text
/// base    = skill.damage + attacker.strength
/// if critical: base *= 2
/// reduced = max(base - target.defense, 1)
/// if element:  reduced = round(reduced * (1 - resistance / 100))
/// final   = max(reduced, 1)
/// ```
///
/// The critical roll is the only random input; [`Self::calculate_with_critical`]
/// takes it as a parameter so the result is fully reproducible.
#[derive(Clone, Copy, Debug, Default)]
pub struct DamageCalculator;

impl DamageCalculator {
    /// Multiplier applied to the base on a critical hit.
    pub const CRITICAL_MULTIPLIER: i64 = 2;

    /// Lowest damage any hit can deal.
    pub const MINIMUM_DAMAGE: u32 = 1;

    pub fn new() -> Self {
        Self
    }

    /// Rolls for a critical hit using the attacker's critical chance and
    /// resolves the damage.
    pub fn calculate_damage(
        &self,
        attacker: &CombatEntity,
        target: &CombatEntity,
        skill: &Skill,
        rng: &mut dyn RandomSource,
    ) -> DamageResult {
        let critical = rng.chance(attacker.attributes().critical_chance);
        self.calculate_with_critical(attacker, target, skill, critical)
    }

    /// Resolves damage for a fixed critical outcome.
    pub fn calculate_with_critical(
        &self,
        attacker: &CombatEntity,
        target: &CombatEntity,
        skill: &Skill,
        critical: bool,
    ) -> DamageResult {
        let mut base = i64::from(skill.damage) + i64::from(attacker.attributes().strength);
        if critical {
            base *= Self::CRITICAL_MULTIPLIER;
        }

        let minimum = i64::from(Self::MINIMUM_DAMAGE);
        let reduced = (base - i64::from(target.attributes().defense)).max(minimum);

        let amount = match skill.element {
            Some(element) => {
                let scaled = (reduced as f64 * target.resistances.multiplier(element)).round();
                (scaled as i64).max(minimum)
            }
            None => reduced,
        };

        DamageResult {
            amount: u32::try_from(amount).unwrap_or(u32::MAX),
            critical,
            element: skill.element,
        }
    }

    /// Healing is the skill's flat value; no critical or defense adjustment.
    pub fn calculate_healing(&self, skill: &Skill) -> u32 {
        skill.healing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::PcgRng;
    use crate::skill::SkillId;
    use crate::state::{Attributes, Role, Team};

    fn attacker(strength: i32, critical_chance: f64) -> CombatEntity {
        CombatEntity::new("Raider", Team::Enemy, Role::Striker, 50, 0).with_attributes(
            Attributes::new(strength, 0, 0, 0).with_critical_chance(critical_chance),
        )
    }

    fn defender(defense: i32) -> CombatEntity {
        CombatEntity::new("Guard", Team::Player, Role::Tank, 80, 0)
            .with_attributes(Attributes::new(0, 0, defense, 0))
    }

    fn strike() -> Skill {
        Skill::new(SkillId(1), "Strike").with_damage(25)
    }

    #[test]
    fn plain_hit_subtracts_defense() {
        let result =
            DamageCalculator::new().calculate_with_critical(&attacker(10, 0.0), &defender(5), &strike(), false);
        assert_eq!(result.amount, 30);
        assert!(!result.critical);
        assert_eq!(result.element, None);
    }

    #[test]
    fn fire_resistance_halves_elemental_damage() {
        let target = defender(5).with_resistance(Element::Fire, 50.0);
        let skill = strike().with_element(Element::Fire);
        let result = DamageCalculator::new().calculate_with_critical(&attacker(10, 0.0), &target, &skill, false);
        assert_eq!(result.amount, 15);
        assert_eq!(result.element, Some(Element::Fire));
    }

    #[test]
    fn critical_doubles_base_before_defense() {
        let result =
            DamageCalculator::new().calculate_with_critical(&attacker(10, 100.0), &defender(5), &strike(), true);
        assert_eq!(result.amount, 65);
        assert!(result.critical);
    }

    #[test]
    fn damage_never_drops_below_one() {
        let calculator = DamageCalculator::new();
        let weak = Skill::new(SkillId(2), "Poke").with_damage(1);
        assert_eq!(
            calculator
                .calculate_with_critical(&attacker(0, 0.0), &defender(500), &weak, false)
                .amount,
            1
        );

        let immune = defender(0).with_resistance(Element::Dark, 100.0);
        let dark = weak.with_element(Element::Dark);
        assert_eq!(
            calculator
                .calculate_with_critical(&attacker(0, 0.0), &immune, &dark, false)
                .amount,
            1
        );
    }

    #[test]
    fn rounding_goes_to_nearest() {
        // 31 * 0.75 = 23.25 -> 23, 30 * 0.75 = 22.5 -> 23
        let target = defender(4).with_resistance(Element::Water, 25.0);
        let skill = strike().with_element(Element::Water);
        let calculator = DamageCalculator::new();
        assert_eq!(
            calculator
                .calculate_with_critical(&attacker(10, 0.0), &target, &skill, false)
                .amount,
            23
        );
        let target = defender(5).with_resistance(Element::Water, 25.0);
        assert_eq!(
            calculator
                .calculate_with_critical(&attacker(10, 0.0), &target, &skill, false)
                .amount,
            23
        );
    }

    #[test]
    fn same_inputs_same_result() {
        let calculator = DamageCalculator::new();
        let first = calculator.calculate_with_critical(&attacker(12, 40.0), &defender(3), &strike(), true);
        for _ in 0..10 {
            assert_eq!(
                calculator.calculate_with_critical(&attacker(12, 40.0), &defender(3), &strike(), true),
                first
            );
        }
    }

    #[test]
    fn zero_critical_chance_never_crits() {
        let calculator = DamageCalculator::new();
        let mut rng = PcgRng::new(9);
        for _ in 0..100 {
            let result = calculator.calculate_damage(&attacker(10, 0.0), &defender(5), &strike(), &mut rng);
            assert!(!result.critical);
            assert_eq!(result.amount, 30);
        }
    }

    #[test]
    fn healing_is_flat() {
        let heal = Skill::new(SkillId(3), "Mend").with_healing(18);
        assert_eq!(DamageCalculator::new().calculate_healing(&heal), 18);
    }
}
