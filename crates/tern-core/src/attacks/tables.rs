//! Compile-time leaper tables, ray geometry, and the ray walker that seeds the
//! sliding tables.

use crate::bitboard::Bitboard;

pub(super) const ROOK_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
pub(super) const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

const KNIGHT_DELTAS: [(i8, i8); 8] =
    [(-2, -1), (-2, 1), (-1, -2), (-1, 2), (1, -2), (1, 2), (2, -1), (2, 1)];
const KING_DELTAS: [(i8, i8); 8] =
    [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)];

#[inline]
const fn on_board(rank: i8, file: i8) -> bool {
    rank >= 0 && rank < 8 && file >= 0 && file < 8
}

#[inline]
const fn bit(rank: i8, file: i8) -> u64 {
    1u64 << (rank as u32 * 8 + file as u32)
}

const fn leaper_table(deltas: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0;
    while sq < 64 {
        let (rank, file) = ((sq / 8) as i8, (sq % 8) as i8);
        let mut bits = 0u64;
        let mut d = 0;
        while d < deltas.len() {
            let (r, f) = (rank + deltas[d].0, file + deltas[d].1);
            if on_board(r, f) {
                bits |= bit(r, f);
            }
            d += 1;
        }
        table[sq] = Bitboard::new(bits);
        sq += 1;
    }
    table
}

/// Walk each direction from `sq` until the edge or the first occupied
/// square, which is included.
pub(super) const fn slide(sq: usize, occupied: u64, dirs: &[(i8, i8); 4]) -> u64 {
    let (rank, file) = ((sq / 8) as i8, (sq % 8) as i8);
    let mut attacks = 0u64;
    let mut d = 0;
    while d < 4 {
        let (dr, df) = dirs[d];
        let (mut r, mut f) = (rank + dr, file + df);
        while on_board(r, f) {
            attacks |= bit(r, f);
            if occupied & bit(r, f) != 0 {
                break;
            }
            r += dr;
            f += df;
        }
        d += 1;
    }
    attacks
}

/// Unit step from `s1` towards `s2` if they share a rank, file or diagonal.
const fn step_between(s1: usize, s2: usize) -> Option<(i8, i8)> {
    if s1 == s2 {
        return None;
    }
    let dr = (s2 / 8) as i8 - (s1 / 8) as i8;
    let df = (s2 % 8) as i8 - (s1 % 8) as i8;
    if dr == 0 || df == 0 || dr.abs() == df.abs() {
        Some((dr.signum(), df.signum()))
    } else {
        None
    }
}

/// `full_line = false`: squares strictly between. `true`: the whole line
/// through both squares, edge to edge.
const fn ray_table(full_line: bool) -> [[Bitboard; 64]; 64] {
    let mut table = [[Bitboard::EMPTY; 64]; 64];
    let mut s1 = 0;
    while s1 < 64 {
        let mut s2 = 0;
        while s2 < 64 {
            if let Some((dr, df)) = step_between(s1, s2) {
                let (r1, f1) = ((s1 / 8) as i8, (s1 % 8) as i8);
                let mut bits = 0u64;
                if full_line {
                    bits |= bit(r1, f1);
                    let (mut r, mut f) = (r1 + dr, f1 + df);
                    while on_board(r, f) {
                        bits |= bit(r, f);
                        r += dr;
                        f += df;
                    }
                    let (mut r, mut f) = (r1 - dr, f1 - df);
                    while on_board(r, f) {
                        bits |= bit(r, f);
                        r -= dr;
                        f -= df;
                    }
                } else {
                    let target = s2 as u32;
                    let (mut r, mut f) = (r1 + dr, f1 + df);
                    while (r as u32 * 8 + f as u32) != target {
                        bits |= bit(r, f);
                        r += dr;
                        f += df;
                    }
                }
                table[s1][s2] = Bitboard::new(bits);
            }
            s2 += 1;
        }
        s1 += 1;
    }
    table
}

pub(crate) static KNIGHT_ATTACKS: [Bitboard; 64] = leaper_table(&KNIGHT_DELTAS);
pub(crate) static KING_ATTACKS: [Bitboard; 64] = leaper_table(&KING_DELTAS);
/// Index 0 = white (captures towards rank 8), 1 = black.
pub(crate) static PAWN_ATTACKS: [[Bitboard; 64]; 2] =
    [leaper_table(&[(1, -1), (1, 1)]), leaper_table(&[(-1, -1), (-1, 1)])];
pub(crate) static BETWEEN: [[Bitboard; 64]; 64] = ray_table(false);
pub(crate) static LINE: [[Bitboard; 64]; 64] = ray_table(true);
