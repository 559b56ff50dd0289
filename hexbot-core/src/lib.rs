//! hexbot core - decision engine for the game of Hex
//!
//! This crate provides everything the player needs to pick a move:
//! - Board model with the four virtual sides
//! - Connectivity graph and three shortest-path engines
//! - Candidate move pruning along both players' best routes
//! - Memoized position evaluation from connection costs
//! - Alpha-beta minimax player with a turn budget and the swap rule

pub mod board;
pub mod error;
pub mod frontier;
pub mod graph;
pub mod paths;
pub mod moves;
pub mod cache;
pub mod eval;
pub mod ai;
pub mod config;

// Re-exports for convenient access
pub use board::{apply_opponent_update, Action, Board, Color, Move, Side};
pub use error::EngineError;
pub use graph::{ConnectivityGraph, Node};
pub use paths::{connection_cost, Path, PathEngine, VisitPolicy};
pub use moves::{candidate_moves, CandidatePolicy};
pub use eval::{EvalStats, Evaluator, WIN_VALUE};
pub use ai::{HexPlayer, Search};
pub use config::EngineConfig;
