//! Attack generation: compile-time leaper tables plus magic lookups for sliders.

mod magic;
mod tables;

use crate::bitboard::Bitboard;
use crate::piece::{Color, PieceKind};
use crate::square::Square;

use self::magic::{bishop_attacks_lookup, rook_attacks_lookup};
use self::tables::{BETWEEN, KING_ATTACKS, KNIGHT_ATTACKS, LINE, PAWN_ATTACKS};

pub(crate) use self::magic::init;

#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index()]
}

#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index()]
}

/// Squares a pawn of `color` on `sq` captures on.
#[inline]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index()]
}

#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    rook_attacks_lookup(sq.index(), occupied)
}

#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_attacks_lookup(sq.index(), occupied)
}

#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    rook_attacks(sq, occupied) | bishop_attacks(sq, occupied)
}

/// Pseudo-attacks of a `color` piece of `kind` on `sq`. Slider rays stop at
/// and include the first occupied square; whose piece stands there is the
/// caller's concern. `color` only matters for pawns.
#[inline]
pub fn attacks_for(kind: PieceKind, sq: Square, occupied: Bitboard, color: Color) -> Bitboard {
    match kind {
        PieceKind::Pawn => pawn_attacks(color, sq),
        PieceKind::Knight => knight_attacks(sq),
        PieceKind::Bishop => bishop_attacks(sq, occupied),
        PieceKind::Rook => rook_attacks(sq, occupied),
        PieceKind::Queen => queen_attacks(sq, occupied),
        PieceKind::King => king_attacks(sq),
    }
}

/// Squares strictly between `a` and `b`; empty unless they share a line.
#[inline]
pub fn between(a: Square, b: Square) -> Bitboard {
    BETWEEN[a.index()][b.index()]
}

/// The full edge-to-edge line through `a` and `b`; empty unless they share one.
#[inline]
pub fn line(a: Square, b: Square) -> Bitboard {
    LINE[a.index()][b.index()]
}
