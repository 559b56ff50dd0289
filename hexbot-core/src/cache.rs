//! Memo table for position scores

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

/// Score memo keyed by canonical position strings. Unbounded when
/// `capacity` is `None`; otherwise the oldest entry is evicted first.
#[derive(Clone, Debug, Default)]
pub struct EvalCache {
    scores: FxHashMap<String, f32>,
    order: VecDeque<String>,
    capacity: Option<usize>,
}

impl EvalCache {
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            scores: FxHashMap::default(),
            order: VecDeque::new(),
            capacity,
        }
    }

    pub fn get(&self, key: &str) -> Option<f32> {
        self.scores.get(key).copied()
    }

    pub fn insert(&mut self, key: String, score: f32) {
        if let Some(capacity) = self.capacity {
            if capacity == 0 {
                return;
            }
            if !self.scores.contains_key(&key) {
                while self.scores.len() >= capacity {
                    match self.order.pop_front() {
                        Some(oldest) => {
                            self.scores.remove(&oldest);
                        }
                        None => break,
                    }
                }
                self.order.push_back(key.clone());
            }
        }
        self.scores.insert(key, score);
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
