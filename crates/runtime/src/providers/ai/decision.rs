//! Rule-based action selection.
//!
//! A decision is made in three steps:
//!
//! 1. **Category**: attack, defend or heal, from the actor's health, the
//!    perceived threat and a weighted draw per [`Behavior`]
//! 2. **Target**: which enemy to hit, or which ally to look after
//! 3. **Skill**: the best-scoring usable skill of the category, falling back
//!    to the basic attack
//!
//! Everything reads from a [`CombatContext`] snapshot; randomness comes from
//! the injected [`RandomSource`], so a seeded source gives repeatable choices.

use combat_core::{
    CombatAction, CombatContext, CombatEntity, EntityId, RandomSource, Skill, SkillId,
    StatusEffectKind,
};

use super::behavior::{ActionCategory, Behavior};

/// Below this fraction of max health the actor counts as wounded.
pub const LOW_HEALTH: f64 = 0.3;
/// Below this fraction of max mana, skill scores are divided by their cost.
pub const LOW_MANA: f64 = 0.3;
/// Above this threat level the actor stops rolling for a category.
pub const HIGH_THREAT: f64 = 0.7;

const STRENGTH_SCALE: f64 = 20.0;
const WOUNDED_ENEMY_FACTOR: f64 = 1.5;
const ELEMENT_BONUS: f64 = 1.2;
const STATUS_BONUS: f64 = 1.3;

/// Outcome of one [`AiDecisionEngine::decide`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct AiDecision {
    pub category: ActionCategory,
    pub threat: f64,
    pub action: CombatAction,
    /// Score of the chosen skill; `None` when the basic-attack fallback was used.
    pub score: Option<f64>,
}

/// Picks actions for one [`Behavior`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AiDecisionEngine {
    behavior: Behavior,
}

impl AiDecisionEngine {
    pub const fn new(behavior: Behavior) -> Self {
        Self { behavior }
    }

    pub const fn behavior(&self) -> Behavior {
        self.behavior
    }

    /// Chooses an action, or `None` (pass) when no enemy is left standing.
    pub fn decide(
        &self,
        context: &CombatContext,
        rng: &mut dyn RandomSource,
    ) -> Option<AiDecision> {
        let actor = context.actor_id();
        let enemy = self
            .enemy_target(context)
            .or_else(|| context.living_enemies().next().map(|entity| entity.id))?;

        let threat = Self::threat_level(context);
        let category = self.choose_category(context, threat, rng);

        let best = context
            .available_skills
            .iter()
            .filter(|skill| Self::fits(skill, category))
            .map(|skill| (skill, self.score(skill, category, context.mana_percent())))
            .fold(None::<(&Skill, f64)>, |best, (skill, score)| match best {
                Some((_, best_score)) if best_score >= score => best,
                _ => Some((skill, score)),
            });

        let decision = match best {
            Some((skill, score)) => {
                let target = match category {
                    ActionCategory::Attack => enemy,
                    ActionCategory::Defend => actor,
                    ActionCategory::Heal => self.heal_target(context),
                };
                tracing::debug!(
                    "{:?} {} chose {} ({}) on {} [category={}, threat={:.2}, score={:.2}]",
                    self.behavior,
                    actor,
                    skill.name,
                    skill.id,
                    target,
                    category,
                    threat,
                    score
                );
                AiDecision {
                    category,
                    threat,
                    action: CombatAction::new(actor, target, skill.id),
                    score: Some(score),
                }
            }
            None => {
                tracing::debug!(
                    "{:?} {} has no {} skill ready, falling back to a basic attack on {}",
                    self.behavior,
                    actor,
                    category,
                    enemy
                );
                AiDecision {
                    category,
                    threat,
                    action: CombatAction::new(actor, enemy, SkillId::BASIC_ATTACK),
                    score: None,
                }
            }
        };

        Some(decision)
    }

    /// Mean danger posed by the living enemies, in `[0, 1]`.
    ///
    /// Each enemy contributes `strength / 20`, half again as much when it is
    /// itself wounded (and so likely to go all in).
    pub fn threat_level(context: &CombatContext) -> f64 {
        let (total, count) = context
            .living_enemies()
            .map(|enemy| {
                let base = f64::from(enemy.attributes().strength) / STRENGTH_SCALE;
                if enemy.health_percent() < LOW_HEALTH {
                    base * WOUNDED_ENEMY_FACTOR
                } else {
                    base
                }
            })
            .fold((0.0, 0u32), |(total, count), value| (total + value, count + 1));

        if count == 0 {
            return 0.0;
        }
        (total / f64::from(count)).clamp(0.0, 1.0)
    }

    pub fn choose_category(
        &self,
        context: &CombatContext,
        threat: f64,
        rng: &mut dyn RandomSource,
    ) -> ActionCategory {
        if context.health_percent() < LOW_HEALTH && self.behavior == Behavior::Defensive {
            return ActionCategory::Heal;
        }
        if threat > HIGH_THREAT {
            return match self.behavior {
                Behavior::Aggressive => ActionCategory::Attack,
                _ => ActionCategory::Defend,
            };
        }
        self.behavior.weights().pick(rng)
    }

    /// Enemy this behavior wants to hit.
    ///
    /// Aggressive finishes off the weakest, Defensive takes on the strongest,
    /// the others hit the first enemy still standing. Ties go to the lowest id.
    pub fn enemy_target(&self, context: &CombatContext) -> Option<EntityId> {
        let mut living = context.living_enemies();
        let target = match self.behavior {
            Behavior::Aggressive => living.fold(None::<&CombatEntity>, |best, enemy| match best {
                Some(best) if best.health() <= enemy.health() => Some(best),
                _ => Some(enemy),
            }),
            Behavior::Defensive => living.fold(None::<&CombatEntity>, |best, enemy| match best {
                Some(best) if best.attributes().strength >= enemy.attributes().strength => {
                    Some(best)
                }
                _ => Some(enemy),
            }),
            Behavior::Support | Behavior::Balanced => living.next(),
        };
        target.map(|entity| entity.id)
    }

    /// Who a heal goes to. Support picks the most injured of itself and its
    /// living allies; everyone else heals themselves.
    pub fn heal_target(&self, context: &CombatContext) -> EntityId {
        if self.behavior != Behavior::Support {
            return context.actor_id();
        }
        context
            .living_allies()
            .fold(&context.actor, |best, ally| {
                if ally.health_percent() < best.health_percent() {
                    ally
                } else {
                    best
                }
            })
            .id
    }

    /// Value of `skill` for `category`, adjusted for mana, element and
    /// status effect.
    pub fn score(&self, skill: &Skill, category: ActionCategory, mana_percent: f64) -> f64 {
        let mut score = match category {
            ActionCategory::Attack => f64::from(skill.damage),
            ActionCategory::Defend => {
                let magnitude = skill
                    .status_effect
                    .as_ref()
                    .and_then(|effect| effect.modifier)
                    .map_or(0, |modifier| modifier.magnitude());
                1.0 + f64::from(magnitude)
            }
            ActionCategory::Heal => f64::from(healing_value(skill)),
        };

        if mana_percent < LOW_MANA {
            score /= f64::from(skill.mana_cost) + 1.0;
        }
        if skill.element.is_some() {
            score *= ELEMENT_BONUS;
        }
        if skill.status_effect.is_some() {
            score *= STATUS_BONUS;
        }
        score
    }

    /// Whether `skill` belongs to `category`.
    fn fits(skill: &Skill, category: ActionCategory) -> bool {
        let heals = healing_value(skill) > 0;
        match category {
            ActionCategory::Attack => !skill.is_supportive() && !heals,
            ActionCategory::Defend => skill.is_supportive() && !heals,
            ActionCategory::Heal => heals,
        }
    }
}

/// Direct healing plus everything a heal-over-time effect would restore.
fn healing_value(skill: &Skill) -> u32 {
    let over_time = skill
        .status_effect
        .as_ref()
        .filter(|effect| effect.kind == StatusEffectKind::HoT)
        .map_or(0, |effect| effect.healing_per_turn * effect.duration);
    skill.healing + over_time
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{
        Attributes, Element, PcgRng, Role, StatModifier, StatusEffect, Team, TargetType,
    };

    fn entity(id: u32, team: Team, strength: i32) -> CombatEntity {
        let mut entity = CombatEntity::new(format!("e{id}"), team, Role::Striker, 100, 50)
            .with_attributes(Attributes::new(strength, 5, 5, 5));
        entity.id = EntityId(id);
        entity
    }

    fn context(
        actor: CombatEntity,
        allies: Vec<CombatEntity>,
        enemies: Vec<CombatEntity>,
    ) -> CombatContext {
        CombatContext {
            actor,
            allies,
            enemies,
            available_skills: vec![Skill::basic_attack()],
            turn: 1,
            clock: 0.0,
            aggressor: None,
        }
    }

    fn fortify() -> Skill {
        Skill::new(SkillId(2), "Fortify")
            .with_target(TargetType::SelfOnly)
            .with_mana_cost(10)
            .with_status_effect(StatusEffect::modifier(
                "Fortified",
                StatusEffectKind::Buff,
                2,
                StatModifier::defense(5),
            ))
    }

    #[test]
    fn threat_is_mean_scaled_strength() {
        let ctx = context(
            entity(0, Team::Player, 10),
            vec![],
            vec![entity(1, Team::Enemy, 10), entity(2, Team::Enemy, 6)],
        );
        let threat = AiDecisionEngine::threat_level(&ctx);
        assert!((threat - 0.4).abs() < 1e-9, "threat = {threat}");
    }

    #[test]
    fn wounded_enemies_are_more_threatening_and_threat_is_clamped() {
        let wounded = entity(1, Team::Enemy, 10).with_health(20);
        let ctx = context(entity(0, Team::Player, 10), vec![], vec![wounded]);
        assert!((AiDecisionEngine::threat_level(&ctx) - 0.75).abs() < 1e-9);

        let ctx = context(
            entity(0, Team::Player, 10),
            vec![],
            vec![entity(1, Team::Enemy, 60)],
        );
        assert_eq!(AiDecisionEngine::threat_level(&ctx), 1.0);
    }

    #[test]
    fn wounded_defender_heals() {
        let actor = entity(0, Team::Player, 10).with_health(20);
        let ctx = context(actor, vec![], vec![entity(1, Team::Enemy, 4)]);
        let mut rng = PcgRng::new(0);
        let engine = AiDecisionEngine::new(Behavior::Defensive);
        assert_eq!(
            engine.choose_category(&ctx, 0.2, &mut rng),
            ActionCategory::Heal
        );
    }

    #[test]
    fn high_threat_overrides_the_draw() {
        let ctx = context(
            entity(0, Team::Player, 10),
            vec![],
            vec![entity(1, Team::Enemy, 4)],
        );
        let mut rng = PcgRng::new(0);
        for _ in 0..20 {
            assert_eq!(
                AiDecisionEngine::new(Behavior::Aggressive).choose_category(&ctx, 0.9, &mut rng),
                ActionCategory::Attack
            );
            assert_eq!(
                AiDecisionEngine::new(Behavior::Support).choose_category(&ctx, 0.9, &mut rng),
                ActionCategory::Defend
            );
        }
    }

    #[test]
    fn enemy_target_follows_behavior() {
        let weak = entity(1, Team::Enemy, 4).with_health(30);
        let strong = entity(2, Team::Enemy, 15);
        let mut dead = entity(3, Team::Enemy, 30);
        dead.take_damage(1000);
        let ctx = context(entity(0, Team::Player, 10), vec![], vec![dead, strong, weak]);

        let target = |behavior| AiDecisionEngine::new(behavior).enemy_target(&ctx);
        assert_eq!(target(Behavior::Aggressive), Some(EntityId(1)));
        assert_eq!(target(Behavior::Defensive), Some(EntityId(2)));
        assert_eq!(target(Behavior::Balanced), Some(EntityId(2)));
        assert_eq!(target(Behavior::Support), Some(EntityId(2)));
    }

    #[test]
    fn support_heals_the_most_injured() {
        let actor = entity(0, Team::Player, 5).with_health(80);
        let injured = entity(1, Team::Player, 5).with_health(40);
        let ctx = context(actor, vec![injured], vec![entity(2, Team::Enemy, 5)]);

        assert_eq!(
            AiDecisionEngine::new(Behavior::Support).heal_target(&ctx),
            EntityId(1)
        );
        assert_eq!(
            AiDecisionEngine::new(Behavior::Balanced).heal_target(&ctx),
            EntityId(0)
        );
    }

    #[test]
    fn scoring_bonuses() {
        let engine = AiDecisionEngine::new(Behavior::Balanced);
        let plain = Skill::new(SkillId(1), "Slash").with_damage(10);
        let fire = plain.clone().with_element(Element::Fire);
        let poison = plain
            .clone()
            .with_mana_cost(4)
            .with_status_effect(StatusEffect::dot("Poisoned", 2, 3));

        assert_eq!(engine.score(&plain, ActionCategory::Attack, 1.0), 10.0);
        assert!((engine.score(&fire, ActionCategory::Attack, 1.0) - 12.0).abs() < 1e-9);
        assert!((engine.score(&poison, ActionCategory::Attack, 1.0) - 13.0).abs() < 1e-9);
        // low mana divides by cost + 1
        assert!((engine.score(&poison, ActionCategory::Attack, 0.1) - 2.6).abs() < 1e-9);

        let fortify = fortify();
        assert!((engine.score(&fortify, ActionCategory::Defend, 1.0) - 7.8).abs() < 1e-9);
    }

    #[test]
    fn picks_the_best_attack() {
        // a strong enemy pushes threat over the limit, so Aggressive always attacks
        let mut ctx = context(
            entity(0, Team::Player, 10),
            vec![],
            vec![entity(1, Team::Enemy, 40)],
        );
        ctx.available_skills
            .push(Skill::new(SkillId(3), "Twin Strike").with_damage(14));
        ctx.available_skills.push(
            Skill::new(SkillId(9), "Smite")
                .with_damage(12)
                .with_element(Element::Light),
        );

        let mut rng = PcgRng::new(3);
        let decision = AiDecisionEngine::new(Behavior::Aggressive)
            .decide(&ctx, &mut rng)
            .expect("enemy alive");

        assert_eq!(decision.category, ActionCategory::Attack);
        assert_eq!(decision.action.skill, SkillId(9));
        assert_eq!(decision.action.target, EntityId(1));
        assert!((decision.threat - 1.0).abs() < 1e-9);
    }

    #[test]
    fn falls_back_to_basic_attack() {
        let ctx = context(
            entity(0, Team::Player, 10),
            vec![],
            vec![entity(1, Team::Enemy, 40)],
        );
        let mut rng = PcgRng::new(9);
        // high threat sends a Support actor to Defend, and it has no defensive skill
        let decision = AiDecisionEngine::new(Behavior::Support)
            .decide(&ctx, &mut rng)
            .expect("enemy alive");

        assert_eq!(decision.category, ActionCategory::Defend);
        assert_eq!(decision.action, CombatAction::attack(EntityId(0), EntityId(1)));
        assert_eq!(decision.score, None);
    }

    #[test]
    fn defend_targets_self() {
        let mut ctx = context(
            entity(0, Team::Player, 10),
            vec![],
            vec![entity(1, Team::Enemy, 40)],
        );
        ctx.available_skills.push(fortify());
        let mut rng = PcgRng::new(4);

        let decision = AiDecisionEngine::new(Behavior::Defensive)
            .decide(&ctx, &mut rng)
            .expect("enemy alive");
        assert_eq!(decision.action.skill, SkillId(2));
        assert_eq!(decision.action.target, EntityId(0));
    }

    #[test]
    fn passes_without_living_enemies() {
        let mut enemy = entity(1, Team::Enemy, 5);
        enemy.take_damage(1000);
        let ctx = context(entity(0, Team::Player, 10), vec![], vec![enemy]);
        let mut rng = PcgRng::new(0);
        assert!(
            AiDecisionEngine::new(Behavior::Balanced)
                .decide(&ctx, &mut rng)
                .is_none()
        );
    }

    #[test]
    fn seeded_decisions_repeat() {
        let mut ctx = context(
            entity(0, Team::Player, 10),
            vec![entity(2, Team::Player, 8).with_health(50)],
            vec![entity(1, Team::Enemy, 6)],
        );
        ctx.available_skills.push(fortify());
        ctx.available_skills
            .push(Skill::new(SkillId(7), "Mend").with_healing(30));

        let engine = AiDecisionEngine::new(Behavior::Balanced);
        let run = |seed| {
            let mut rng = PcgRng::new(seed);
            (0..20)
                .filter_map(|_| engine.decide(&ctx, &mut rng))
                .map(|decision| decision.action)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }
}
