//! Siege simulation binary.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `SIEGE_CONFIG` or `siege-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Build the initial world
//! 4. Run rounds until a verdict or the round limit
//! 5. Log the result and print the final snapshot as JSON

mod error;

use std::path::PathBuf;

use siege_core::config::SiegeConfig;
use siege_core::history::RoundHistory;
use siege_core::runner::{self, RunBounds};
use siege_core::world::WorldState;
use siege_types::WorldSnapshot;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Environment variable naming an alternative config file.
const CONFIG_PATH_ENV: &str = "SIEGE_CONFIG";

/// Config file looked up in the working directory.
const DEFAULT_CONFIG_PATH: &str = "siege-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, world construction, or a round fails.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration. Logging is not up yet, so remember where it
    //    came from and report it once the subscriber exists.
    let (config, source) = load_config()?;

    // 2. Initialize structured logging. RUST_LOG wins over the config file.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(
        source = source.as_deref().unwrap_or("defaults"),
        seed = config.world.seed,
        max_rounds = config.world.max_rounds,
        round_interval_ms = config.world.round_interval_ms,
        sweep = ?config.negotiation.sweep,
        "Configuration loaded"
    );

    // 3. Build the world.
    let mut world = WorldState::new(&config)?;

    // 4. Run the simulation.
    let mut history = RoundHistory::new();
    let bounds = RunBounds::from_config(&config.world);
    let result = runner::run_simulation(&mut world, bounds, &mut history).await?;

    // 5. Report.
    runner::log_simulation_end(&result);
    info!(
        rounds_recorded = history.len(),
        ledger_entries = world.ledger().len(),
        guards_created = world.guards_created(),
        "siege-engine shutdown complete"
    );
    print_report(&world.snapshot())?;

    Ok(())
}

/// Load the configuration.
///
/// A path given in `SIEGE_CONFIG` must exist. Without it, a missing
/// `siege-config.yaml` means defaults. Returns the config and the path it
/// was read from.
fn load_config() -> Result<(SiegeConfig, Option<String>), EngineError> {
    let path = match std::env::var_os(CONFIG_PATH_ENV) {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_PATH);
            if !path.exists() {
                return Ok((SiegeConfig::default(), None));
            }
            path
        }
    };
    let config = SiegeConfig::from_file(&path)?;
    Ok((config, Some(path.display().to_string())))
}

/// Print the final snapshot as pretty JSON on stdout.
fn print_report(snapshot: &WorldSnapshot) -> Result<(), EngineError> {
    let json = serde_json::to_string_pretty(snapshot)?;
    println!("{json}");
    Ok(())
}
