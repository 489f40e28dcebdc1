//! composer-host entry point.
//!
//! Builds a [`LayoutEngine`] from a TOML configuration file, optionally
//! replays a scenario against it, and reports the final layout.
//!
//! # Usage
//!
//! ```bash
//! composer-host --config composer.toml --scenario session.toml --json
//! RUST_LOG=composer_core=trace composer-host --scenario session.toml
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use composer_core::LayoutEngine;
use composer_host::application::session::{load_scenario, SessionRunner};
use composer_host::infrastructure::storage::config::load_config;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Video composition layout engine host.
///
/// Replays participant events against the layout engine and prints where each
/// participant ends up on the canvas.
#[derive(Debug, Parser)]
#[command(
    name = "composer-host",
    about = "Drive the composer layout engine from a scripted session",
    version
)]
struct Cli {
    /// Engine and logging configuration.  A missing file means defaults.
    #[arg(long, default_value = "composer.toml", env = "COMPOSER_CONFIG")]
    config: PathBuf,

    /// Scenario of `[[step]]` events to replay.
    #[arg(long, env = "COMPOSER_SCENARIO")]
    scenario: Option<PathBuf>,

    /// Print the final layout snapshot to stdout as JSON.
    #[arg(long)]
    json: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;

    // `RUST_LOG` wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.log_level)),
        )
        .init();

    let engine_config = config.engine.to_engine_config();
    info!(
        canvas = ?engine_config.canvas,
        mode = %engine_config.initial_mode,
        "composer host starting"
    );
    let engine = Arc::new(LayoutEngine::from_config(&engine_config));
    let mut runner = SessionRunner::new(Arc::clone(&engine));

    if let Some(path) = &cli.scenario {
        let scenario = load_scenario(path)
            .with_context(|| format!("failed to load scenario from {}", path.display()))?;
        let summary = runner.run(&scenario);
        info!(
            applied = summary.applied,
            rejected = summary.rejected,
            "scenario finished"
        );
    }

    let snapshot = engine.snapshot();
    if cli.json {
        let text =
            serde_json::to_string_pretty(&snapshot).context("failed to serialize snapshot")?;
        println!("{text}");
    } else {
        info!(mode = %snapshot.mode, canvas = ?snapshot.canvas, "final layout");
        for (index, slot) in snapshot.slots.iter().enumerate() {
            info!(slot = index, occupant = ?slot.occupant, geometry = ?slot.geometry, "slot");
        }
        let unplaced = snapshot.unplaced();
        if !unplaced.is_empty() {
            info!(?unplaced, "participants without a slot");
        }
    }

    Ok(())
}
