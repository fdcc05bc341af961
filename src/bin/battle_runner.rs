//! Headless Battle Runner
//!
//! Loads a scenario (store snapshot + who attacks whom), resolves one battle
//! against an in-memory store and prints the report.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use warfront::army::{records_from_garrison, UnitRecord};
use warfront::battle::{fight, BattleContext, BattleReport, PersistenceFailure};
use warfront::core::error::Result;
use warfront::core::types::{CityId, FactionId};
use warfront::core::BattleConfig;
use warfront::store::{InMemoryStore, StoreSnapshot};

/// Headless Battle Runner - resolve one city battle from a scenario file
#[derive(Parser, Debug)]
#[command(name = "battle_runner")]
#[command(about = "Resolve one battle from a TOML scenario and print the report")]
struct Args {
    /// Scenario file (TOML)
    #[arg(long)]
    scenario: PathBuf,

    /// Battle config file (TOML); built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,

    /// Print the store contents after the battle as TOML
    #[arg(long)]
    dump_store: bool,

    /// Enable debug logging of every round
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// Scenario file layout
#[derive(Debug, Deserialize)]
struct Scenario {
    attacking_city: CityId,
    defending_city: CityId,
    #[serde(default)]
    user_faction: Option<FactionId>,
    /// Marching units; the whole home garrison when omitted
    #[serde(default)]
    attackers: Option<Vec<UnitRecord>>,
    /// Defending units; the defending city's garrison when omitted
    #[serde(default)]
    defenders: Option<Vec<UnitRecord>>,
    world: StoreSnapshot,
}

/// JSON output structure
#[derive(Serialize)]
struct RunnerOutput<'a> {
    report: &'a BattleReport,
    rounds: usize,
    captured: bool,
    failures: &'a [PersistenceFailure],
}

fn main() -> Result<()> {
    let args = Args::parse();

    let directive = if args.verbose {
        "warfront=debug"
    } else {
        "warfront=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => BattleConfig::load(path)?,
        None => BattleConfig::default(),
    };

    let scenario: Scenario = toml::from_str(&fs::read_to_string(&args.scenario)?)?;
    tracing::info!("Loaded scenario {}", args.scenario.display());

    let mut store = InMemoryStore::from_snapshot(scenario.world);
    let context = BattleContext::from_cities(
        &store,
        scenario.attacking_city,
        scenario.defending_city,
        scenario.user_faction,
    )?;

    let attackers = match scenario.attackers {
        Some(records) => records,
        None => records_from_garrison(&store, context.attacking_city)?,
    };
    let defenders = match scenario.defenders {
        Some(records) => records,
        None => records_from_garrison(&store, context.defending_city)?,
    };

    let resolution = fight(&mut store, &config, &context, &attackers, &defenders)?;

    match args.format.as_str() {
        "json" => {
            let output = RunnerOutput {
                report: &resolution.report,
                rounds: resolution.outcome.rounds.len(),
                captured: resolution.capture.is_some(),
                failures: &resolution.failures,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => {
            print!("{}", resolution.report);
            for failure in &resolution.failures {
                println!("Not saved ({:?}): {}", failure.phase, failure.error);
            }
        }
    }

    if args.dump_store {
        match toml::to_string(&store.snapshot()) {
            Ok(text) => println!("\n{}", text),
            Err(e) => tracing::warn!("Could not render store snapshot: {}", e),
        }
    }

    Ok(())
}
