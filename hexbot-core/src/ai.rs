//! Alpha-beta minimax player

use std::time::{Duration, Instant};

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::board::{Action, Board, Color, Move};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::eval::{Evaluator, WIN_VALUE};
use crate::moves::{candidate_moves, CandidatePolicy};

// ============================================================================
// MINIMAX WITH ALPHA-BETA
// ============================================================================

/// One minimax search over shared evaluator and RNG state
pub struct Search<'a, R: Rng> {
    evaluator: &'a mut Evaluator,
    rng: &'a mut R,
    policy: CandidatePolicy,
    /// Positions visited, leaves included
    pub nodes: u64,
}

impl<'a, R: Rng> Search<'a, R> {
    pub fn new(evaluator: &'a mut Evaluator, rng: &'a mut R, policy: CandidatePolicy) -> Self {
        Self {
            evaluator,
            rng,
            policy,
            nodes: 0,
        }
    }

    /// Score of `board` for `max_color`, searching `depth` plies. Leaves are
    /// always scored from `max_color`'s side whoever is to move.
    pub fn minimax(
        &mut self,
        board: &Board,
        depth: u32,
        maximizing: bool,
        max_color: Color,
        mut alpha: f32,
        mut beta: f32,
    ) -> f32 {
        self.nodes += 1;
        if depth == 0 {
            return self.evaluator.evaluate(board, max_color);
        }

        let moves = candidate_moves(board, self.policy, &mut *self.rng);
        if moves.is_empty() {
            return self.evaluator.evaluate(board, max_color);
        }

        if maximizing {
            let mut best = f32::NEG_INFINITY;
            for mv in moves {
                let child = board.with_stone(mv, max_color);
                best = best.max(self.minimax(&child, depth - 1, false, max_color, alpha, beta));
                if best >= beta {
                    break;
                }
                alpha = alpha.max(best);
            }
            best
        } else {
            let opponent = max_color.opponent();
            let mut best = f32::INFINITY;
            for mv in moves {
                let child = board.with_stone(mv, opponent);
                best = best.min(self.minimax(&child, depth - 1, true, max_color, alpha, beta));
                if best <= alpha {
                    break;
                }
                beta = beta.min(best);
            }
            best
        }
    }
}

// ============================================================================
// PLAYER
// ============================================================================

/// Engine state that lives for a whole game: evaluation memo, RNG, the
/// current search depth and the acceptance threshold.
pub struct HexPlayer {
    pub config: EngineConfig,
    evaluator: Evaluator,
    rng: ChaCha8Rng,
    depth: u32,
    acceptance_threshold: f32,
    examined: usize,
}

impl HexPlayer {
    pub fn new(config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            evaluator: Evaluator::from_config(&config),
            rng,
            depth: config.depth,
            acceptance_threshold: config.depth as f32 + config.acceptance_margin,
            examined: 0,
            config,
        }
    }

    /// Current search depth; drops to 1 once a forced win is seen
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn acceptance_threshold(&self) -> f32 {
        self.acceptance_threshold
    }

    /// Root candidates scored by the last placement search
    pub fn candidates_examined(&self) -> usize {
        self.examined
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Score `board` for `color` through the player's memo
    pub fn evaluate(&mut self, board: &Board, color: Color) -> f32 {
        self.evaluator.evaluate(board, color)
    }

    /// Candidate moves as the search would see them
    pub fn candidates(&mut self, board: &Board) -> Vec<Move> {
        candidate_moves(board, self.config.candidates, &mut self.rng)
    }

    /// Choose the action for `color` on game turn `turn` (1 = opening
    /// move) within `budget`.
    pub fn select_move(
        &mut self,
        board: &Board,
        color: Color,
        turn: u32,
        budget: Duration,
    ) -> Result<Action, EngineError> {
        if color == Color::Free {
            return Err(EngineError::NoPlayerColor);
        }

        if turn == 2 && self.should_swap(board) {
            tracing::info!("Swapping sides on turn {}", turn);
            return Ok(Action::Swap);
        }

        let mv = self.best_move(board, color, budget)?;
        self.acceptance_threshold += 1.0;
        Ok(Action::Place(mv))
    }

    /// Pie rule: keep out if either acute corner is taken, otherwise swap
    /// with the configured probability.
    pub fn should_swap(&mut self, board: &Board) -> bool {
        let last = board.size() - 1;
        if !board.is_free(Move::new(0, 0)) || !board.is_free(Move::new(last, last)) {
            return false;
        }
        self.rng.gen_bool(self.config.swap_probability.clamp(0.0, 1.0))
    }

    /// Score root candidates in order. A forced win ends the loop at once;
    /// otherwise the best so far is kept, and the loop stops when it beats
    /// the acceptance threshold or the budget runs out. The stop keeps the
    /// better move rather than swapping in the candidate that triggered it.
    fn best_move(&mut self, board: &Board, color: Color, budget: Duration) -> Result<Move, EngineError> {
        let start = Instant::now();
        let candidates = candidate_moves(board, self.config.candidates, &mut self.rng);
        let Some(&fallback) = candidates.first() else {
            return Err(EngineError::NoLegalMove);
        };

        let depth = self.depth;
        let threshold = self.acceptance_threshold;
        let mut search = Search::new(&mut self.evaluator, &mut self.rng, self.config.candidates);
        let mut best: Option<(Move, f32)> = None;
        let mut examined = 0usize;

        for mv in candidates.iter().copied() {
            let child = board.with_stone(mv, color);
            let score = search.minimax(
                &child,
                depth,
                false,
                color,
                f32::NEG_INFINITY,
                f32::INFINITY,
            );
            examined += 1;
            tracing::debug!("candidate {} scored {}", mv, score);

            if score == WIN_VALUE {
                best = Some((mv, score));
                self.depth = 1;
                tracing::info!("Forced win found at {}, search depth now 1", mv);
                break;
            }
            if best.map_or(score > f32::NEG_INFINITY, |(_, b)| score > b) {
                best = Some((mv, score));
            }
            if best.is_some_and(|(_, b)| b > threshold) {
                tracing::debug!("accepting score above threshold {}", threshold);
                break;
            }
            if start.elapsed() > budget {
                tracing::debug!(
                    "turn budget spent after {} of {} candidates",
                    examined,
                    candidates.len()
                );
                break;
            }
        }

        self.examined = examined;

        let chosen = match best {
            Some((mv, score)) => {
                tracing::info!(
                    "Chose {} (score {}, {} nodes, {:?})",
                    mv,
                    score,
                    search.nodes,
                    start.elapsed()
                );
                mv
            }
            None => {
                tracing::warn!("No candidate scored above -inf, playing {}", fallback);
                fallback
            }
        };
        Ok(chosen)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::{connection_cost, PathEngine, VisitPolicy};

    const LONG: Duration = Duration::from_secs(30);

    fn plain_minimax<R: Rng>(
        board: &Board,
        depth: u32,
        maximizing: bool,
        max_color: Color,
        evaluator: &mut Evaluator,
        rng: &mut R,
    ) -> f32 {
        if depth == 0 {
            return evaluator.evaluate(board, max_color);
        }
        let moves = candidate_moves(board, CandidatePolicy::ShortestPaths, &mut *rng);
        if moves.is_empty() {
            return evaluator.evaluate(board, max_color);
        }
        let mover = if maximizing { max_color } else { max_color.opponent() };
        let mut scores = Vec::with_capacity(moves.len());
        for mv in moves {
            let child = board.with_stone(mv, mover);
            scores.push(plain_minimax(&child, depth - 1, !maximizing, max_color, evaluator, &mut *rng));
        }
        if maximizing {
            scores.into_iter().fold(f32::NEG_INFINITY, f32::max)
        } else {
            scores.into_iter().fold(f32::INFINITY, f32::min)
        }
    }

    fn seeded(depth: u32) -> HexPlayer {
        HexPlayer::new(EngineConfig::with_depth(depth).with_seed(42))
    }

    #[test]
    fn test_alpha_beta_matches_plain_minimax() {
        let boards = [
            Board::new(3),
            Board::from_rows(&["R00", "0B0", "000"]).unwrap(),
            Board::from_rows(&["0B0", "R00", "00R"]).unwrap(),
            Board::from_rows(&["000", "BR0", "0B0"]).unwrap(),
        ];
        let mut evaluator = Evaluator::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for board in &boards {
            for depth in 1..=2 {
                for color in [Color::Red, Color::Blue] {
                    for maximizing in [true, false] {
                        let plain = plain_minimax(board, depth, maximizing, color, &mut evaluator, &mut rng);
                        let mut search = Search::new(&mut evaluator, &mut rng, CandidatePolicy::ShortestPaths);
                        let pruned = search.minimax(
                            board,
                            depth,
                            maximizing,
                            color,
                            f32::NEG_INFINITY,
                            f32::INFINITY,
                        );
                        assert_eq!(plain, pruned, "depth {} {:?} max={}\n{}", depth, color, maximizing, board);
                    }
                }
            }
        }
    }

    #[test]
    fn test_depth_zero_is_evaluation() {
        let board = Board::from_rows(&["R0", "00"]).unwrap();
        let mut evaluator = Evaluator::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let expected = evaluator.evaluate(&board, Color::Red);
        let mut search = Search::new(&mut evaluator, &mut rng, CandidatePolicy::ShortestPaths);
        assert_eq!(search.minimax(&board, 0, false, Color::Red, f32::NEG_INFINITY, f32::INFINITY), expected);
        assert_eq!(search.nodes, 1);
    }

    #[test]
    fn test_full_board_scores_as_leaf() {
        let board = Board::from_rows(&["RB", "RB"]).unwrap();
        let mut evaluator = Evaluator::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut search = Search::new(&mut evaluator, &mut rng, CandidatePolicy::ShortestPaths);
        let score = search.minimax(&board, 3, true, Color::Red, f32::NEG_INFINITY, f32::INFINITY);
        assert_eq!(score, f32::INFINITY);
    }

    #[test]
    fn test_takes_immediate_win() {
        let board = Board::from_rows(&["0R0", "0R0", "000"]).unwrap();
        let mut player = seeded(1);
        let action = player.select_move(&board, Color::Red, 5, LONG).unwrap();
        let Action::Place(mv) = action else {
            panic!("expected a stone, got {:?}", action);
        };
        let after = board.with_stone(mv, Color::Red);
        assert_eq!(
            connection_cost(&after, Color::Red, PathEngine::UniformCost, VisitPolicy::Exact),
            0.0
        );
    }

    #[test]
    fn test_forced_win_drops_depth() {
        let board = Board::from_rows(&["0R0", "0R0", "000"]).unwrap();
        let mut player = seeded(2);
        assert!(matches!(
            player.select_move(&board, Color::Red, 5, LONG),
            Ok(Action::Place(_))
        ));
        assert_eq!(player.depth(), 1);
    }

    #[test]
    fn test_zero_budget_still_moves() {
        let board = Board::new(5);
        let mut player = seeded(2);
        match player.select_move(&board, Color::Blue, 3, Duration::ZERO) {
            Ok(Action::Place(mv)) => assert!(board.is_free(mv)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_budget_shorter_than_one_search_keeps_first_score() {
        let board = Board::from_rows(&[
            "0000000", "00R0000", "000B000", "0000000", "000R000", "0000000", "0000000",
        ])
        .unwrap();
        let mut config = EngineConfig::with_depth(2).with_seed(4);
        config.candidates = CandidatePolicy::Exhaustive;
        let mut player = HexPlayer::new(config);
        match player.select_move(&board, Color::Blue, 5, Duration::from_nanos(1)) {
            Ok(Action::Place(mv)) => assert!(board.is_free(mv)),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(player.candidates_examined(), 1);
    }

    #[test]
    fn test_score_above_threshold_stops_search() {
        let board = Board::new(5);
        let mut config = EngineConfig::with_depth(1).with_seed(6);
        config.candidates = CandidatePolicy::Exhaustive;

        let mut eager = config.clone();
        eager.acceptance_margin = -100.0;
        let mut player = HexPlayer::new(eager);
        assert!(matches!(player.select_move(&board, Color::Red, 3, LONG), Ok(Action::Place(_))));
        assert_eq!(player.candidates_examined(), 1);

        let mut patient = config;
        patient.acceptance_margin = 100.0;
        let mut player = HexPlayer::new(patient);
        assert!(matches!(player.select_move(&board, Color::Red, 3, LONG), Ok(Action::Place(_))));
        assert_eq!(player.candidates_examined(), 25);
    }

    #[test]
    fn test_threshold_rises_each_stone() {
        let board = Board::new(3);
        let mut player = seeded(1);
        let before = player.acceptance_threshold();
        assert_eq!(before, 4.0);
        player.select_move(&board, Color::Red, 1, LONG).unwrap();
        assert_eq!(player.acceptance_threshold(), before + 1.0);
    }

    #[test]
    fn test_full_board_has_no_legal_move() {
        let board = Board::from_rows(&["RB", "BR"]).unwrap();
        let mut player = seeded(1);
        assert_eq!(
            player.select_move(&board, Color::Red, 5, LONG),
            Err(EngineError::NoLegalMove)
        );
        assert_eq!(
            player.select_move(&board, Color::Free, 5, LONG),
            Err(EngineError::NoPlayerColor)
        );
    }

    #[test]
    fn test_swap_policy() {
        let mut opening = Board::new(4);
        opening.place(Move::new(1, 2), Color::Red);

        let mut always = HexPlayer::new(EngineConfig {
            swap_probability: 1.0,
            depth: 1,
            seed: Some(1),
            ..Default::default()
        });
        assert_eq!(always.select_move(&opening, Color::Blue, 2, LONG), Ok(Action::Swap));
        // Only the second move of the game may swap
        assert!(matches!(
            always.select_move(&opening, Color::Blue, 4, LONG),
            Ok(Action::Place(_))
        ));

        let mut corner = Board::new(4);
        corner.place(Move::new(3, 3), Color::Red);
        assert!(!always.should_swap(&corner));

        let mut never = HexPlayer::new(EngineConfig {
            swap_probability: 0.0,
            depth: 1,
            seed: Some(1),
            ..Default::default()
        });
        assert!(matches!(
            never.select_move(&opening, Color::Blue, 2, LONG),
            Ok(Action::Place(_))
        ));
    }

    #[test]
    fn test_player_blocks_single_threat() {
        // Blue wins at 1,3 next move unless Red takes it
        let board = Board::from_rows(&["000R", "BBB0", "0000", "0000"]).unwrap();
        let mut player = seeded(1);
        assert_eq!(
            player.select_move(&board, Color::Red, 5, LONG),
            Ok(Action::Place(Move::new(1, 3)))
        );
    }
}
