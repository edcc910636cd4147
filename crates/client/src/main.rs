//! Headless combat simulator.
//!
//! Loads a roster from the content data directory and plays one battle.
//! AI combatants decide on their own; combatants marked `Interactive` in the
//! roster are driven from stdin.
//!
//! ```bash
//! cargo run -p combat-sim
//! COMBAT_SEED=7 RUST_LOG=combat_runtime=debug cargo run -p combat-sim
//! ```

mod config;
mod prompt;

use anyhow::Result;
use combat_content::ControllerSpec;
use combat_core::Team;
use combat_runtime::{Battle, BattleReport, ChannelActionProvider, ProviderKind};

use crate::config::SimConfig;

const INPUT_BUFFER: usize = 4;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let sim = SimConfig::from_env();
    let runtime_config = sim.load_runtime_config()?;
    let skills = sim.load_skills()?;
    let roster = sim.load_roster(&skills)?;

    tracing::info!("Starting combat simulation");
    tracing::info!("Data directory: {}", sim.data_dir.display());
    tracing::info!("Seed: {:?}", runtime_config.seed);
    tracing::info!(
        "Roster: {} players vs {} enemies",
        roster.players.len(),
        roster.enemies.len()
    );

    let mut builder = Battle::builder()
        .config(runtime_config)
        .skills(skills)
        .roster(&roster)
        .with_ai_providers();

    let interactive = roster
        .templates()
        .any(|template| template.controller == ControllerSpec::Interactive);
    let input_task = if interactive {
        let (input, requests) = ChannelActionProvider::new(INPUT_BUFFER);
        builder = builder.provider(ProviderKind::Interactive, input);
        Some(tokio::spawn(prompt::run(requests)))
    } else {
        None
    };

    let battle = builder.build()?;
    let handle = battle.spawn();
    let cancel = handle.cancel_handle();

    let join = handle.join();
    tokio::pin!(join);
    let report = tokio::select! {
        report = &mut join => report?,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, cancelling battle");
            cancel.cancel();
            join.await?
        }
    };

    if let Some(task) = input_task {
        task.abort();
    }

    print_report(&report);
    Ok(())
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_report(report: &BattleReport) {
    tracing::info!(
        outcome = %report.outcome,
        turns = report.turns,
        events = report.events,
        "Battle finished"
    );

    println!();
    println!(
        "{} after {} turns ({:.1}s on the combat clock)",
        report.outcome, report.turns, report.clock
    );
    for team in [Team::Player, Team::Enemy] {
        println!("{team}:");
        for entity in report.entities.iter().filter(|entity| entity.team == team) {
            println!(
                "  {:<16} {:>4}/{:<4} hp {:>4}/{:<4} mana",
                entity.name,
                entity.health(),
                entity.max_health(),
                entity.mana(),
                entity.max_mana()
            );
        }
    }
}
