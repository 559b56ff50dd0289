//! Analyze command - score a position and show the move the engine picks
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: analyze_position(), report()
//! - Level 3: (delegated to hexbot-core)
//! - Level 4: board and colour parsing

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use serde::Serialize;

use hexbot_core::{Action, Board, Color, EngineConfig, HexPlayer, Move};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Board rows separated by '/' or whitespace, e.g. "R00/0B0/000"
    #[arg(long)]
    pub board: String,

    /// Colour to move (R or B)
    #[arg(long, default_value = "R")]
    pub colour: String,

    /// Game turn of the position (2 allows a swap)
    #[arg(long, default_value = "3")]
    pub turn: u32,

    /// Engine config file (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Search depth override
    #[arg(long)]
    pub depth: Option<u32>,

    /// Random seed override
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Everything the engine says about one position
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub size: usize,
    pub to_move: Color,
    /// Score from Red's point of view; non-finite values mean a decided game
    pub red_score: f32,
    pub blue_score: f32,
    pub candidates: Vec<Move>,
    pub action: Option<Action>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run analyze command
pub fn run(args: AnalyzeArgs) -> Result<()> {
    let board = parse_board(&args.board)?;
    let colour = parse_colour(&args.colour)?;
    let config = load_config(&args)?;

    let analysis = analyze_position(&board, colour, args.turn, config);
    report(&board, &analysis, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Evaluate `board` for both colours and ask the engine for a move
pub fn analyze_position(board: &Board, colour: Color, turn: u32, config: EngineConfig) -> Analysis {
    let budget = config.turn_timeout();
    let mut player = HexPlayer::new(config);

    let red_score = player.evaluate(board, Color::Red);
    let blue_score = player.evaluate(board, Color::Blue);
    let mut candidates = player.candidates(board);
    candidates.sort();

    let action = match player.select_move(board, colour, turn, budget) {
        Ok(action) => Some(action),
        Err(e) => {
            tracing::warn!("No action selected: {}", e);
            None
        }
    };

    let stats = player.evaluator().stats();
    tracing::debug!(
        "Evaluations: {} hits, {} misses, {} searches",
        stats.hits,
        stats.misses,
        stats.searches
    );

    Analysis {
        size: board.size(),
        to_move: colour,
        red_score,
        blue_score,
        candidates,
        action,
    }
}

fn report(board: &Board, analysis: &Analysis, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(analysis).context("Failed to encode analysis")?;
        println!("{}", out);
        return Ok(());
    }

    println!("{}", board);
    println!("Red score:  {}", analysis.red_score);
    println!("Blue score: {}", analysis.blue_score);
    let listed: Vec<String> = analysis.candidates.iter().map(|m| m.to_string()).collect();
    println!("Candidates ({}): {}", listed.len(), listed.join(" "));
    match analysis.action {
        Some(Action::Place(mv)) => println!("{:?} plays {}", analysis.to_move, mv),
        Some(Action::Swap) => println!("{:?} swaps", analysis.to_move),
        None => println!("No legal move"),
    }
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Rows separated by '/', whitespace or newlines
pub fn parse_board(text: &str) -> Result<Board> {
    let rows: Vec<&str> = text
        .split(|c: char| c == '/' || c.is_whitespace())
        .filter(|r| !r.is_empty())
        .collect();
    Ok(Board::from_rows(&rows)?)
}

fn parse_colour(text: &str) -> Result<Color> {
    Color::from_wire(&text.trim().to_ascii_uppercase())
        .ok_or_else(|| anyhow!("colour must be R or B, got {:?}", text))
}

fn load_config(args: &AnalyzeArgs) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(depth) = args.depth {
        config.depth = depth;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    Ok(config)
}

// ============================================================================
// TESTS
// ============================================================================
