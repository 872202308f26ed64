//! Transposition table keyed by the full Zobrist hash.
//!
//! Open addressing over a power-of-two slot array: a position lives in one
//! of [`PROBE_LIMIT`] consecutive slots starting at `key & mask`. Each
//! search worker owns its table, so all mutation goes through `&mut self`.
//!
//! Entries are hints. A probe returns whatever was stored for an identical
//! key and the search still generates moves and checks terminal states
//! itself.

use tern_core::Move;
use tracing::trace;

use super::negamax::MATE_THRESHOLD;

/// Slots inspected per probe or store before giving up.
pub const PROBE_LIMIT: usize = 8;

/// How a stored score relates to the true value of the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The score is exact.
    Exact,
    /// Failed high: the true score is at least this.
    Lower,
    /// Failed low: the true score is at most this.
    Upper,
}

/// One stored search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtEntry {
    pub key: u64,
    pub depth: u8,
    pub bound: Bound,
    /// Node-relative; convert with [`score_from_tt`] before use.
    pub score: i32,
    pub best_move: Move,
}

/// Mate scores are stored as distance from the node rather than from the
/// root so an entry stays valid when reached along a different path.
pub fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score > MATE_THRESHOLD {
        score + ply as i32
    } else if score < -MATE_THRESHOLD {
        score - ply as i32
    } else {
        score
    }
}

/// Reverses [`score_to_tt`].
pub fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score > MATE_THRESHOLD {
        score - ply as i32
    } else if score < -MATE_THRESHOLD {
        score + ply as i32
    } else {
        score
    }
}

pub struct TranspositionTable {
    slots: Vec<Option<TtEntry>>,
    mask: usize,
    used: usize,
}

impl TranspositionTable {
    /// A table with room for `capacity` entries, rounded down to a power of
    /// two. Storage is allocated once here and never grows.
    pub fn new(capacity: usize) -> Self {
        let len = match capacity {
            0 => 1,
            n if n.is_power_of_two() => n,
            n => n.next_power_of_two() >> 1,
        };
        Self {
            slots: vec![None; len],
            mask: len - 1,
            used: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Empty every slot without reallocating.
    pub fn clear(&mut self) {
        self.slots.fill(None);
        self.used = 0;
        trace!(capacity = self.slots.len(), "transposition table cleared");
    }

    fn probe_indices(&self, key: u64) -> impl Iterator<Item = usize> + use<> {
        let start = key as usize & self.mask;
        let mask = self.mask;
        let limit = PROBE_LIMIT.min(mask + 1);
        (0..limit).map(move |i| (start + i) & mask)
    }

    /// The entry stored for exactly `key`. An empty slot ends the probe:
    /// nothing is ever stored past one.
    pub fn probe(&self, key: u64) -> Option<TtEntry> {
        for index in self.probe_indices(key) {
            match self.slots[index] {
                Some(entry) if entry.key == key => return Some(entry),
                Some(_) => continue,
                None => return None,
            }
        }
        None
    }

    /// Store a result. An entry for the same key is overwritten in place
    /// (keeping its move if the new one has none); otherwise the first empty
    /// slot is used, and when the probe window is full the shallowest entry
    /// is evicted.
    pub fn store(&mut self, entry: TtEntry) {
        let mut victim: Option<usize> = None;
        for index in self.probe_indices(entry.key) {
            match self.slots[index] {
                Some(existing) if existing.key == entry.key => {
                    let best_move = if entry.best_move.is_null() {
                        existing.best_move
                    } else {
                        entry.best_move
                    };
                    self.slots[index] = Some(TtEntry { best_move, ..entry });
                    return;
                }
                Some(existing) => {
                    let shallower = victim
                        .and_then(|v| self.slots[v])
                        .is_none_or(|current| existing.depth < current.depth);
                    if shallower {
                        victim = Some(index);
                    }
                }
                None => {
                    self.slots[index] = Some(entry);
                    self.used += 1;
                    return;
                }
            }
        }
        if let Some(index) = victim {
            self.slots[index] = Some(entry);
        }
    }

    /// Occupancy in permille.
    pub fn hashfull(&self) -> usize {
        self.used * 1000 / self.slots.len()
    }
}

impl std::fmt::Debug for TranspositionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranspositionTable")
            .field("capacity", &self.slots.len())
            .field("used", &self.used)
            .finish()
    }
}
