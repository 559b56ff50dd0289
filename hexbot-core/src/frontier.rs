//! Re-prioritizable min-queue with lazy deletion

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

use rustc_hash::FxHashMap;

#[derive(Debug)]
struct Entry<K> {
    priority: f32,
    seq: u64,
    key: K,
}

impl<K> PartialEq for Entry<K> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K> Eq for Entry<K> {}

impl<K> PartialOrd for Entry<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> Ord for Entry<K> {
    // Reversed so the std max-heap pops the lowest priority, oldest first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-priority queue where pushing a key that is already queued replaces
/// its priority. Superseded and removed entries stay in the heap and are
/// skipped when they surface.
#[derive(Debug)]
pub struct PriorityFrontier<K> {
    heap: BinaryHeap<Entry<K>>,
    live: FxHashMap<K, u64>,
    counter: u64,
}

impl<K: Copy + Eq + Hash> Default for PriorityFrontier<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash> PriorityFrontier<K> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            live: FxHashMap::default(),
            counter: 0,
        }
    }

    /// Insert `key`, or re-prioritize it if already queued
    pub fn push(&mut self, key: K, priority: f32) {
        let seq = self.counter;
        self.counter += 1;
        self.live.insert(key, seq);
        self.heap.push(Entry { priority, seq, key });
    }

    /// Mark `key` removed. Returns false if it was not queued.
    pub fn remove(&mut self, key: K) -> bool {
        self.live.remove(&key).is_some()
    }

    pub fn contains(&self, key: K) -> bool {
        self.live.contains_key(&key)
    }

    /// Pop the live entry with the lowest priority
    pub fn pop(&mut self) -> Option<(K, f32)> {
        while let Some(entry) = self.heap.pop() {
            if self.live.get(&entry.key) == Some(&entry.seq) {
                self.live.remove(&entry.key);
                return Some((entry.key, entry.priority));
            }
        }
        None
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
