//! Position evaluation
//!
//! A position is worth the difference between the opponent's connection
//! cost and the player's own: positive when the player is closer to joining
//! its sides. An infinite cost on either side turns into a `+inf`/`-inf`
//! score, i.e. a decided game.

use crate::board::{Board, Color};
use crate::cache::EvalCache;
use crate::config::EngineConfig;
use crate::graph::ConnectivityGraph;
use crate::paths::{PathEngine, VisitPolicy};

/// Score of a game already won by the perspective player
pub const WIN_VALUE: f32 = f32::INFINITY;

/// Cache counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvalStats {
    pub hits: u64,
    pub misses: u64,
    /// Distance searches run, two per miss
    pub searches: u64,
}

/// Memoizing evaluator
#[derive(Clone, Debug)]
pub struct Evaluator {
    engine: PathEngine,
    visit_policy: VisitPolicy,
    cache: EvalCache,
    stats: EvalStats,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl Evaluator {
    pub fn new(engine: PathEngine, visit_policy: VisitPolicy, cache_capacity: Option<usize>) -> Self {
        Self {
            engine,
            visit_policy,
            cache: EvalCache::new(cache_capacity),
            stats: EvalStats::default(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.engine, config.visit_policy, config.cache_capacity)
    }

    /// Signed score of `board` for `perspective`
    pub fn evaluate(&mut self, board: &Board, perspective: Color) -> f32 {
        // Scores are signed, so the same board scores differently per side
        let mut key = board.key();
        key.push(perspective.key_char());

        if let Some(score) = self.cache.get(&key) {
            self.stats.hits += 1;
            return score;
        }
        self.stats.misses += 1;

        let mut graph = ConnectivityGraph::new(board, perspective);
        let own = self.distance(&mut graph);

        graph.set_player(perspective.opponent());
        let theirs = self.distance(&mut graph);

        let score = score_from_distances(own, theirs);
        self.cache.insert(key, score);
        score
    }

    fn distance(&mut self, graph: &mut ConnectivityGraph) -> f32 {
        self.stats.searches += 1;
        graph.reset();
        graph.connection_cost(self.engine, self.visit_policy)
    }

    pub fn stats(&self) -> EvalStats {
        self.stats
    }

    pub fn cached_positions(&self) -> usize {
        self.cache.len()
    }
}

/// `theirs - own`. Both infinite cannot happen on a legal Hex position and
/// is scored as even.
pub fn score_from_distances(own: f32, theirs: f32) -> f32 {
    if own.is_infinite() && theirs.is_infinite() {
        return 0.0;
    }
    theirs - own
}
