//! Fancy magic bitboards for sliding pieces.
//!
//! Magic multipliers are searched for on first use with a fixed-seed
//! generator, so the tables are identical on every run and no magic
//! constants need to be shipped.

use std::sync::OnceLock;

use tracing::debug;

use crate::bitboard::Bitboard;

use super::tables::{BISHOP_DIRS, ROOK_DIRS, slide};

/// Per-rank generator seeds. Any seed finds magics; these find them quickly.
const SEEDS: [u64; 8] = [728, 10316, 55013, 32803, 12281, 15100, 16645, 255];

#[derive(Debug, Clone, Copy, Default)]
struct Magic {
    mask: u64,
    magic: u64,
    shift: u32,
    offset: usize,
}

impl Magic {
    #[inline(always)]
    fn index(&self, occupied: Bitboard) -> usize {
        let relevant = occupied.inner() & self.mask;
        self.offset + (relevant.wrapping_mul(self.magic) >> self.shift) as usize
    }
}

struct SlidingTables {
    rook: [Magic; 64],
    bishop: [Magic; 64],
    attacks: Vec<Bitboard>,
}

static TABLES: OnceLock<SlidingTables> = OnceLock::new();

/// Xorshift64* generator.
struct Prng(u64);

impl Prng {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 >> 12;
        self.0 ^= self.0 << 25;
        self.0 ^= self.0 >> 27;
        self.0.wrapping_mul(2_685_821_657_736_338_717)
    }

    /// Roughly one bit in eight set; good magics are sparse.
    fn sparse(&mut self) -> u64 {
        self.next() & self.next() & self.next()
    }
}

/// Relevant occupancy: the empty-board rays minus the edge squares a ray
/// ends on, since a blocker there changes nothing.
fn relevant_mask(sq: usize, dirs: &[(i8, i8); 4]) -> u64 {
    let rank_edges = (Bitboard::RANK_1 | Bitboard::RANK_8).inner() & !(0xFFu64 << (sq / 8 * 8));
    let file_edges = (Bitboard::FILE_A | Bitboard::FILE_H).inner() & !(Bitboard::FILE_A.inner() << (sq % 8));
    slide(sq, 0, dirs) & !(rank_edges | file_edges)
}

/// Find a collision-free multiplier for one square and write its attack sets
/// into `table` starting at `offset`.
fn find_magic(sq: usize, dirs: &[(i8, i8); 4], offset: usize, table: &mut Vec<Bitboard>) -> Magic {
    let mask = relevant_mask(sq, dirs);
    let bits = mask.count_ones();
    let size = 1usize << bits;

    let mut occupancies = Vec::with_capacity(size);
    let mut reference = Vec::with_capacity(size);
    let mut subset = 0u64;
    loop {
        occupancies.push(subset);
        reference.push(Bitboard::new(slide(sq, subset, dirs)));
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }

    table.resize(offset + size, Bitboard::EMPTY);
    let slots = &mut table[offset..offset + size];
    // Slot `i` holds a value from the current attempt only if `epoch[i] == attempt`.
    let mut epoch = vec![0u32; size];
    let mut rng = Prng(SEEDS[sq / 8]);
    let shift = 64 - bits;
    let mut attempt = 0u32;

    loop {
        let magic = rng.sparse();
        if (mask.wrapping_mul(magic) >> 56).count_ones() < 6 {
            continue;
        }
        attempt += 1;

        let mut ok = true;
        for (occ, attacks) in occupancies.iter().zip(&reference) {
            let idx = (occ.wrapping_mul(magic) >> shift) as usize;
            if epoch[idx] < attempt {
                epoch[idx] = attempt;
                slots[idx] = *attacks;
            } else if slots[idx] != *attacks {
                ok = false;
                break;
            }
        }

        if ok {
            return Magic { mask, magic, shift, offset };
        }
    }
}

fn build() -> SlidingTables {
    let mut attacks = Vec::new();
    let mut rook = [Magic::default(); 64];
    let mut bishop = [Magic::default(); 64];

    for sq in 0..64 {
        rook[sq] = find_magic(sq, &ROOK_DIRS, attacks.len(), &mut attacks);
    }
    for sq in 0..64 {
        bishop[sq] = find_magic(sq, &BISHOP_DIRS, attacks.len(), &mut attacks);
    }

    debug!(entries = attacks.len(), "sliding attack tables built");
    SlidingTables { rook, bishop, attacks }
}

#[inline]
fn tables() -> &'static SlidingTables {
    TABLES.get_or_init(build)
}

/// Force table construction. Called from `Position` constructors so the
/// first search does not pay for it.
pub(crate) fn init() {
    tables();
}

#[inline]
pub(crate) fn rook_attacks_lookup(sq: usize, occupied: Bitboard) -> Bitboard {
    let t = tables();
    t.attacks[t.rook[sq].index(occupied)]
}

#[inline]
pub(crate) fn bishop_attacks_lookup(sq: usize, occupied: Bitboard) -> Bitboard {
    let t = tables();
    t.attacks[t.bishop[sq].index(occupied)]
}

#[cfg(test)]
pub(super) fn rook_attacks_slow(sq: usize, occupied: u64) -> u64 {
    slide(sq, occupied, &ROOK_DIRS)
}

#[cfg(test)]
pub(super) fn bishop_attacks_slow(sq: usize, occupied: u64) -> u64 {
    slide(sq, occupied, &BISHOP_DIRS)
}
