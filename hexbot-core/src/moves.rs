//! Candidate move generation
//!
//! The search only looks at cells likely to change the outcome. By default
//! those are the free cells on either player's current best route, which
//! brings the branching factor down from every empty cell to roughly one
//! board width.

use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Color, Move, NEIGHBOR_OFFSETS};
use crate::graph::ConnectivityGraph;

/// How candidate moves are picked
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidatePolicy {
    /// Free cells on the A* route of each player
    #[default]
    ShortestPaths,
    /// Free cells up to `radius` steps along a hex ray from any stone
    ActiveRegion { radius: usize },
    /// Every free cell
    Exhaustive,
}

/// Shuffled candidate moves for `board`. Falls back to every free cell when
/// the policy finds nothing, so the result is empty only on a full board.
pub fn candidate_moves<R: Rng>(board: &Board, policy: CandidatePolicy, rng: &mut R) -> Vec<Move> {
    let mut moves = match policy {
        CandidatePolicy::ShortestPaths => path_moves(board),
        CandidatePolicy::ActiveRegion { radius } => region_moves(board, radius),
        CandidatePolicy::Exhaustive => Vec::new(),
    };
    if moves.is_empty() {
        moves = board.free_cells();
    }
    moves.shuffle(rng);
    moves
}

/// Free cells on Red's and Blue's current best routes, deduplicated, in
/// route order
pub fn path_moves(board: &Board) -> Vec<Move> {
    let mut graph = ConnectivityGraph::new(board, Color::Red);
    let mut seen = FxHashSet::default();
    let mut moves = Vec::new();

    for color in [Color::Red, Color::Blue] {
        graph.set_player(color);
        let Some((near, far)) = color.sides() else {
            continue;
        };
        if let Some(path) = graph.heuristic_path(near, far) {
            for mv in path.free_cells(board) {
                if seen.insert(mv) {
                    moves.push(mv);
                }
            }
        }
    }
    moves
}

/// Free cells within `radius` steps of a stone along the six hex rays
pub fn region_moves(board: &Board, radius: usize) -> Vec<Move> {
    let mut seen = FxHashSet::default();
    let mut moves = Vec::new();

    for (stone, color) in board.cells() {
        if color == Color::Free {
            continue;
        }
        for (dr, dc) in NEIGHBOR_OFFSETS {
            for step in 1..=radius as isize {
                let Some(mv) = board.offset(stone, dr * step, dc * step) else {
                    break;
                };
                if board.is_free(mv) && seen.insert(mv) {
                    moves.push(mv);
                }
            }
        }
    }
    moves
}
