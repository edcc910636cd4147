//! Terminal input adapter for interactively controlled combatants.
//!
//! Reads one command per request from stdin:
//! - `<skill> <target>` uses a skill on an entity, e.g. `3 4`
//! - `<skill>` uses a skill on the default target
//! - empty line attacks the default target
//! - `pass` skips the turn
//!
//! The default target is whoever has built up the most threat against the
//! actor, or the first living enemy when nobody has.

use std::io::Write;

use anyhow::{Result, bail};
use combat_core::{CombatAction, CombatContext, EntityId, SkillId};
use combat_runtime::ActionRequest;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// A parsed prompt line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Pass,
    Use {
        skill: SkillId,
        target: Option<EntityId>,
    },
}

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let Some(first) = words.next() else {
            return Ok(Command::Use {
                skill: SkillId::BASIC_ATTACK,
                target: None,
            });
        };
        if first.eq_ignore_ascii_case("pass") {
            return Ok(Command::Pass);
        }

        let skill = SkillId(first.parse()?);
        let target = words.next().map(str::parse).transpose()?.map(EntityId);
        if words.next().is_some() {
            bail!("expected `<skill> [target]`");
        }
        Ok(Command::Use { skill, target })
    }

    /// Resolves the command against the acting entity's view.
    ///
    /// Returns `None` for a pass or when there is nothing to target.
    pub fn into_action(self, context: &CombatContext) -> Option<CombatAction> {
        match self {
            Command::Pass => None,
            Command::Use { skill, target } => {
                let target = target.or_else(|| default_target(context))?;
                Some(CombatAction::new(context.actor_id(), target, skill))
            }
        }
    }
}

fn default_target(context: &CombatContext) -> Option<EntityId> {
    context
        .aggressor
        .filter(|aggressor| context.living_enemies().any(|enemy| enemy.id == *aggressor))
        .or_else(|| context.living_enemies().next().map(|enemy| enemy.id))
}

/// Answers action requests from stdin until the battle drops the channel.
pub async fn run(mut requests: mpsc::Receiver<ActionRequest>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(request) = requests.recv().await {
        print_context(&request.context);

        let action = loop {
            let Some(line) = lines.next_line().await? else {
                tracing::warn!("stdin closed, passing remaining turns");
                break None;
            };
            match Command::parse(&line) {
                Ok(command) => break command.into_action(&request.context),
                Err(err) => eprintln!("  invalid command: {err}"),
            }
        };

        if !request.respond(action) {
            tracing::debug!("battle stopped waiting for input");
        }
    }

    Ok(())
}

fn print_context(context: &CombatContext) {
    let actor = &context.actor;
    println!();
    println!(
        "turn {} ({:.1}s) - {} {}: {}/{} hp, {}/{} mana",
        context.turn,
        context.clock,
        actor.id,
        actor.name,
        actor.health(),
        actor.max_health(),
        actor.mana(),
        actor.max_mana(),
    );
    for enemy in context.living_enemies() {
        println!(
            "  enemy {} {}: {}/{} hp",
            enemy.id.0,
            enemy.name,
            enemy.health(),
            enemy.max_health()
        );
    }
    if let Some(aggressor) = context.aggressor {
        println!("  most threatening: {}", aggressor.0);
    }
    for ally in context.living_allies() {
        println!(
            "  ally  {} {}: {}/{} hp",
            ally.id.0,
            ally.name,
            ally.health(),
            ally.max_health()
        );
    }
    for skill in &context.available_skills {
        println!("  skill {} {} ({} mana)", skill.id.0, skill.name, skill.mana_cost);
    }
    print!("> ");
    let _ = std::io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{CombatEntity, Role, Team};

    fn context() -> CombatContext {
        let mut actor = CombatEntity::new("Hero", Team::Player, Role::Striker, 50, 10);
        actor.id = EntityId(0);
        let mut dead = CombatEntity::new("Rat", Team::Enemy, Role::Striker, 10, 0);
        dead.id = EntityId(1);
        dead.take_damage(10);
        let mut orc = CombatEntity::new("Orc", Team::Enemy, Role::Tank, 40, 0);
        orc.id = EntityId(2);
        CombatContext {
            actor,
            allies: Vec::new(),
            enemies: vec![dead, orc],
            available_skills: Vec::new(),
            turn: 1,
            clock: 0.0,
            aggressor: None,
        }
    }

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("pass").unwrap(), Command::Pass);
        assert_eq!(Command::parse(" PASS ").unwrap(), Command::Pass);
        assert_eq!(
            Command::parse("3 4").unwrap(),
            Command::Use {
                skill: SkillId(3),
                target: Some(EntityId(4)),
            }
        );
        assert_eq!(
            Command::parse("").unwrap(),
            Command::Use {
                skill: SkillId::BASIC_ATTACK,
                target: None,
            }
        );
        assert!(Command::parse("fireball").is_err());
        assert!(Command::parse("1 2 3").is_err());
    }

    #[test]
    fn default_target_is_first_living_enemy() {
        let ctx = context();
        let action = Command::parse("").unwrap().into_action(&ctx).unwrap();
        assert_eq!(action, CombatAction::attack(EntityId(0), EntityId(2)));

        let action = Command::parse("5 1").unwrap().into_action(&ctx).unwrap();
        assert_eq!(action, CombatAction::new(EntityId(0), EntityId(1), SkillId(5)));

        assert_eq!(Command::Pass.into_action(&ctx), None);
    }

    #[test]
    fn default_target_prefers_the_aggressor() {
        let mut ctx = context();
        let mut wolf = CombatEntity::new("Wolf", Team::Enemy, Role::Striker, 30, 0);
        wolf.id = EntityId(3);
        ctx.enemies.push(wolf);

        ctx.aggressor = Some(EntityId(3));
        let action = Command::parse("").unwrap().into_action(&ctx).unwrap();
        assert_eq!(action.target, EntityId(3));

        // a defeated aggressor is ignored
        ctx.aggressor = Some(EntityId(1));
        let action = Command::parse("").unwrap().into_action(&ctx).unwrap();
        assert_eq!(action.target, EntityId(2));
    }
}
