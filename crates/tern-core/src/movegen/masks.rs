//! The three masks legal generation is built on: squares the opponent
//! attacks, squares that resolve a check, and the pieces pinned to our king.

use crate::attacks::{attacks_for, between, bishop_attacks, line, rook_attacks};
use crate::bitboard::Bitboard;
use crate::piece::{Color, PieceKind};
use crate::position::Position;
use crate::square::Square;

pub(super) struct Masks {
    pub(super) king: Square,
    /// Every square the opponent attacks, computed with our king lifted off
    /// the board so a king stepping back along a slider's ray stays attacked.
    pub(super) attacked: Bitboard,
    pub(super) checkers: Bitboard,
    /// FULL when not in check, the checker plus any interposing squares in
    /// single check, EMPTY in double check.
    pub(super) check: Bitboard,
    pub(super) pinned: Bitboard,
}

impl Masks {
    pub(super) fn new(pos: &Position) -> Masks {
        let us = pos.side_to_move();
        let king = pos.king_square(us);
        let checkers = pos.checkers(us);

        let check = match checkers.count() {
            0 => Bitboard::FULL,
            1 => match checkers.lsb() {
                Some(checker) => between(king, checker) | checkers,
                None => Bitboard::EMPTY,
            },
            _ => Bitboard::EMPTY,
        };

        Masks {
            king,
            attacked: attack_mask(pos, !us, pos.occupied().without(king)),
            checkers,
            check,
            pinned: pinned(pos, us, king),
        }
    }

    /// Where the piece on `sq` may go without exposing the king.
    #[inline]
    pub(super) fn pin(&self, sq: Square) -> Bitboard {
        if self.pinned.contains(sq) { line(self.king, sq) } else { Bitboard::FULL }
    }
}

fn attack_mask(pos: &Position, by: Color, occupied: Bitboard) -> Bitboard {
    let mut attacked = Bitboard::EMPTY;
    for kind in PieceKind::ALL {
        for sq in pos.colored(kind, by) {
            attacked |= attacks_for(kind, sq, occupied, by);
        }
    }
    attacked
}

/// Our pieces that are the only blocker between our king and an enemy
/// slider moving along that line.
fn pinned(pos: &Position, us: Color, king: Square) -> Bitboard {
    let them = pos.side(!us);
    let diagonal = (pos.pieces(PieceKind::Bishop) | pos.pieces(PieceKind::Queen)) & them;
    let orthogonal = (pos.pieces(PieceKind::Rook) | pos.pieces(PieceKind::Queen)) & them;
    let snipers = (bishop_attacks(king, Bitboard::EMPTY) & diagonal) | (rook_attacks(king, Bitboard::EMPTY) & orthogonal);

    let mut pinned = Bitboard::EMPTY;
    for sniper in snipers {
        let blockers = between(king, sniper) & pos.occupied();
        if !blockers.has_several() && (blockers & pos.side(us)).is_nonempty() {
            pinned |= blockers;
        }
    }
    pinned
}
