//! Play command - connect to a game server and play one game
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_config(), session::connect()
//! - Level 4: flag overrides

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use hexbot_core::{EngineConfig, HexPlayer};

use crate::session;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Game server host
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Game server port
    #[arg(long, default_value = "1234")]
    pub port: u16,

    /// Engine config file (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Search depth override
    #[arg(long)]
    pub depth: Option<u32>,

    /// Per-turn time budget override in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Random seed override
    #[arg(long)]
    pub seed: Option<u64>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
pub fn run(args: PlayArgs) -> Result<()> {
    let config = build_config(&args)?;
    tracing::info!(
        "Engine: depth {}, {} ms per turn, {:?} candidates",
        config.depth,
        config.turn_timeout_ms,
        config.candidates
    );

    let player = HexPlayer::new(config);
    let summary = session::connect(&args.host, args.port, player)?;

    match &summary.state {
        Some(state) => tracing::info!(
            "Game over after {} actions, final colour {:?}, {} stones on the board",
            summary.actions.len(),
            state.colour,
            state.board.stone_count()
        ),
        None => tracing::info!("Server closed before a game started"),
    }
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Config file (or defaults) with command-line overrides applied
pub fn build_config(args: &PlayArgs) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    apply_overrides(&mut config, args);
    Ok(config)
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn apply_overrides(config: &mut EngineConfig, args: &PlayArgs) {
    if let Some(depth) = args.depth {
        config.depth = depth;
    }
    if let Some(ms) = args.timeout_ms {
        config.turn_timeout_ms = ms;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
}
