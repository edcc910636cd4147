//! Action validation and resolution.

use std::sync::Arc;

use super::machine::{AttackState, CastState, StateUpdate};
use super::{CombatEngine, CombatEvent, CombatPhase};
use crate::action::{ActionError, CombatAction};
use crate::combat::DamageResult;
use crate::effects::StatusApplication;
use crate::skill::{Skill, SkillId, TargetType};
use crate::state::EntityId;

/// What a resolved action did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActionOutcome {
    pub skill: SkillId,
    /// Affected entities in resolution order.
    pub targets: Vec<EntityId>,
    pub damage: Vec<(EntityId, DamageResult)>,
    pub healing: Vec<(EntityId, u32)>,
    pub statuses: Vec<(EntityId, StatusApplication)>,
    pub defeated: Vec<EntityId>,
    /// Chain length when the action extended a combo.
    pub combo: Option<usize>,
}

impl ActionOutcome {
    pub fn total_damage(&self) -> u32 {
        self.damage.iter().map(|(_, result)| result.amount).sum()
    }

    pub fn total_healing(&self) -> u32 {
        self.healing.iter().map(|(_, amount)| amount).sum()
    }
}

impl CombatEngine {
    /// Validates and resolves the current actor's action.
    ///
    /// Validation happens before any mutation, so a rejected action leaves
    /// the battle exactly as it was and the actor may submit another one.
    /// On success the actor is marked as having acted; call
    /// [`CombatEngine::end_turn`] to close the turn.
    pub fn submit_action(&mut self, action: CombatAction) -> Result<ActionOutcome, ActionError> {
        let skills = Arc::clone(&self.skills);
        let skill = self.validate(&skills, &action)?;
        let targets = self.resolve_targets(&action, skill);

        let performer = action.performer;
        let clock = self.clock;
        if let Some(entity) = self.entities.get_mut(performer.0 as usize) {
            skills.use_skill(entity, skill.id, &mut self.cooldowns, clock)?;
        }

        self.run_state(skill);

        self.emit(CombatEvent::ActionPerformed {
            performer,
            skill: skill.id,
            targets: targets.clone(),
        });

        let mut outcome = ActionOutcome {
            skill: skill.id,
            targets: targets.clone(),
            ..ActionOutcome::default()
        };

        for &target in &targets {
            self.apply_to_target(performer, target, skill, &mut outcome);
        }

        if skill.is_offensive() && !outcome.damage.is_empty() {
            let clock = self.clock;
            if self.combos.register_attack(performer, &skill.name, clock) {
                let count = self.combos.combo_count(performer);
                outcome.combo = Some(count);
                self.emit(CombatEvent::ComboTriggered {
                    entity: performer,
                    count,
                });
            }
        }

        if let Some(entity) = self.entity_mut(performer) {
            entity.set_acted(true);
        }
        self.machine.pop();

        Ok(outcome)
    }

    fn validate<'a>(
        &self,
        skills: &'a crate::skill::SkillRegistry,
        action: &CombatAction,
    ) -> Result<&'a Skill, ActionError> {
        if self.phase != CombatPhase::Active {
            return Err(ActionError::CombatNotActive);
        }
        let expected = self.current.ok_or(ActionError::CombatNotActive)?;
        if action.performer != expected {
            return Err(ActionError::NotCurrentActor {
                expected,
                provided: action.performer,
            });
        }

        let performer = self
            .entity(action.performer)
            .ok_or(ActionError::ActorDefeated)?;
        if !performer.is_alive() {
            return Err(ActionError::ActorDefeated);
        }
        if performer.has_acted() {
            return Err(ActionError::AlreadyActed);
        }

        let skill = skills.can_use(performer, action.skill, &self.cooldowns, self.clock)?;

        // team-wide and self skills ignore the action target
        if matches!(skill.target, TargetType::Single | TargetType::Area) {
            let target = self
                .entity(action.target)
                .ok_or(ActionError::UnknownTarget(action.target))?;
            if !target.is_alive() {
                return Err(ActionError::TargetDefeated(action.target));
            }
        }

        Ok(skill)
    }

    /// Affected entities for a validated action.
    ///
    /// Area skills hit the chosen target first, then every other living
    /// member of its team.
    fn resolve_targets(&self, action: &CombatAction, skill: &Skill) -> Vec<EntityId> {
        let performer_team = match self.entity(action.performer) {
            Some(entity) => entity.team,
            None => return Vec::new(),
        };

        match skill.target {
            TargetType::SelfOnly => vec![action.performer],
            TargetType::Single => vec![action.target],
            TargetType::AllEnemies => self
                .living(performer_team.opponent())
                .map(|entity| entity.id)
                .collect(),
            TargetType::AllAllies => self
                .living(performer_team)
                .map(|entity| entity.id)
                .collect(),
            TargetType::Area => {
                let Some(primary) = self.entity(action.target) else {
                    return Vec::new();
                };
                std::iter::once(primary.id)
                    .chain(
                        self.living(primary.team)
                            .map(|entity| entity.id)
                            .filter(|id| *id != primary.id),
                    )
                    .collect()
            }
        }
    }

    /// Runs the skill through Attack or Cast. Casting advances the combat
    /// clock by the cast time.
    fn run_state(&mut self, skill: &Skill) {
        if skill.requires_cast() {
            self.machine.push(Box::new(CastState::new(skill.cast_time)));
            while self.machine.update(skill.cast_time) == StateUpdate::Continue {}
            self.clock += skill.cast_time;
        } else {
            self.machine.push(Box::new(AttackState));
            self.machine.update(0.0);
        }
    }

    fn apply_to_target(
        &mut self,
        performer: EntityId,
        target: EntityId,
        skill: &Skill,
        outcome: &mut ActionOutcome,
    ) {
        let target_alive = self.entity(target).is_some_and(|entity| entity.is_alive());
        if !target_alive {
            return;
        }

        if skill.is_offensive() {
            let attacker = self.entities.get(performer.0 as usize);
            let defender = self.entities.get(target.0 as usize);
            let result = match (attacker, defender) {
                (Some(attacker), Some(defender)) => {
                    self.damage
                        .calculate_damage(attacker, defender, skill, self.rng.as_mut())
                }
                _ => return,
            };

            let Some(defender) = self.entities.get_mut(target.0 as usize) else {
                return;
            };
            defender.take_damage(result.amount);
            let defeated = !defender.is_alive();

            self.threat
                .add_threat(target, performer, f64::from(result.amount));
            outcome.damage.push((target, result));
            self.emit(CombatEvent::DamageDealt {
                attacker: performer,
                target,
                amount: result.amount,
                critical: result.critical,
                element: result.element,
            });

            if defeated {
                outcome.defeated.push(target);
                self.handle_defeat(target);
                return;
            }
        }

        if skill.is_healing() {
            let amount = self.damage.calculate_healing(skill);
            let Some(entity) = self.entity_mut(target) else {
                return;
            };
            let restored = entity.heal(amount);
            outcome.healing.push((target, restored));
            self.emit(CombatEvent::HealingDone {
                healer: performer,
                target,
                amount: restored,
            });
        }

        if let Some(effect) = &skill.status_effect {
            let effects = self.effects;
            let Some(entity) = self.entity_mut(target) else {
                return;
            };
            let application = effects.apply(entity, effect);
            if application != StatusApplication::Ignored {
                outcome.statuses.push((target, application));
                self.emit(CombatEvent::StatusApplied {
                    target,
                    effect: effect.name.clone(),
                    application,
                });
            }
        }
    }
}
