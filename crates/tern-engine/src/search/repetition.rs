//! Occurrence counts of position hashes along the current game line.

use std::collections::HashMap;

/// Counts how often each Zobrist key occurs on the path from the game start
/// to the node being searched. Keys whose count drops to zero are removed,
/// so the table only ever holds the live line.
#[derive(Debug, Default)]
pub struct RepetitionTable {
    counts: HashMap<u64, u16>,
}

impl RepetitionTable {
    /// Reserves room for `capacity` distinct keys up front.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            counts: HashMap::with_capacity(capacity),
        }
    }

    pub fn increment(&mut self, key: u64) {
        *self.counts.entry(key).or_default() += 1;
    }

    pub fn decrement(&mut self, key: u64) {
        if let Some(count) = self.counts.get_mut(&key) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(&key);
            }
        }
    }

    pub fn count(&self, key: u64) -> u16 {
        self.counts.get(&key).copied().unwrap_or(0)
    }
}
