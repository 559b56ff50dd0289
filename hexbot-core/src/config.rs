//! Engine configuration

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::moves::CandidatePolicy;
use crate::paths::{PathEngine, VisitPolicy};

/// Tunables for search, evaluation and the opening swap
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimax plies searched below each top-level candidate
    pub depth: u32,
    /// Wall-clock budget per turn in milliseconds
    pub turn_timeout_ms: u64,
    /// Chance of swapping on the second move of the game
    pub swap_probability: f64,
    /// Acceptance threshold starts at `depth + acceptance_margin`
    pub acceptance_margin: f32,
    /// How the search picks moves to try
    pub candidates: CandidatePolicy,
    /// Engine used for connection costs in evaluation
    pub engine: PathEngine,
    /// Revisit rule of the depth-first engine
    pub visit_policy: VisitPolicy,
    /// Maximum cached evaluations (None = unbounded)
    pub cache_capacity: Option<usize>,
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            depth: 2,
            turn_timeout_ms: 6000,
            swap_probability: 0.85,
            acceptance_margin: 3.0,
            candidates: CandidatePolicy::ShortestPaths,
            engine: PathEngine::DepthFirst,
            visit_policy: VisitPolicy::Exact,
            cache_capacity: Some(1 << 20),
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Config searching `depth` plies
    pub fn with_depth(depth: u32) -> Self {
        Self {
            depth,
            ..Default::default()
        }
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn turn_timeout(&self) -> Duration {
        Duration::from_millis(self.turn_timeout_ms)
    }

    /// Load from a JSON file; missing fields keep their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"depth": 3, "seed": 9}"#).unwrap();
        assert_eq!(config.depth, 3);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.turn_timeout_ms, 6000);
        assert_eq!(config.candidates, CandidatePolicy::ShortestPaths);
    }

    #[test]
    fn test_policy_variants_parse() {
        let config: EngineConfig = serde_json::from_str(
            r#"{"candidates": {"ActiveRegion": {"radius": 2}}, "visit_policy": "SharedVisited", "cache_capacity": null}"#,
        )
        .unwrap();
        assert_eq!(config.candidates, CandidatePolicy::ActiveRegion { radius: 2 });
        assert_eq!(config.visit_policy, VisitPolicy::SharedVisited);
        assert_eq!(config.cache_capacity, None);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("hexbot-config-{}.json", std::process::id()));
        let config = EngineConfig::with_depth(1).with_seed(5);
        config.save(&path).unwrap();
        let loaded = EngineConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }
}
