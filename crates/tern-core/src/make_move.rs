//! In-place move execution with incremental hash maintenance.
//!
//! There is no unmake: callers keep a copy of the position from before the
//! move and restore it.

use crate::attacks::pawn_attacks;
use crate::castling::{CastleSide, CastlingRights, castle_path};
use crate::chess_move::{Move, MoveFlag};
use crate::piece::{Color, Piece, PieceKind};
use crate::position::Position;
use crate::square::Square;
use crate::zobrist;

/// Castling rights lost when a move starts or ends on `sq`.
const fn rights_touching(sq: Square) -> &'static [(Color, CastleSide)] {
    match sq {
        Square::E1 => &[(Color::White, CastleSide::King), (Color::White, CastleSide::Queen)],
        Square::H1 => &[(Color::White, CastleSide::King)],
        Square::A1 => &[(Color::White, CastleSide::Queen)],
        Square::E8 => &[(Color::Black, CastleSide::King), (Color::Black, CastleSide::Queen)],
        Square::H8 => &[(Color::Black, CastleSide::King)],
        Square::A8 => &[(Color::Black, CastleSide::Queen)],
        _ => &[],
    }
}

impl Position {
    /// Apply `mv`, which must be legal here (or [`Move::PASS`]).
    ///
    /// A pass flips the side to move and its hash key and nothing else.
    pub fn make_move(&mut self, mv: Move) {
        let us = self.side_to_move();
        if mv.is_pass() {
            self.set_side_to_move(!us);
            return;
        }

        let (from, to) = (mv.source(), mv.dest());
        let Some(moving) = self.piece_on(from) else {
            debug_assert!(false, "make_move {mv} from empty square in {self:?}");
            return;
        };

        if let Some(ep) = self.en_passant() {
            self.xor_hash(zobrist::en_passant_file(ep.file()));
            self.set_en_passant(None);
        }

        let mut irreversible = moving.kind() == PieceKind::Pawn;

        match mv.flag() {
            MoveFlag::EnPassant => {
                if let Some(victim) = to.backward(us) {
                    self.remove_piece(victim);
                }
                self.move_piece(from, to);
            }
            MoveFlag::KingCastle | MoveFlag::QueenCastle => {
                let side = if mv.flag() == MoveFlag::KingCastle { CastleSide::King } else { CastleSide::Queen };
                let path = castle_path(us, side);
                self.move_piece(from, to);
                self.move_piece(path.rook_from, path.rook_to);
            }
            _ => {
                if self.remove_piece(to).is_some() {
                    irreversible = true;
                }
                match mv.promotion_piece() {
                    Some(promo) => {
                        self.remove_piece(from);
                        self.put_piece(Piece::new(promo.to_piece_kind(), us), to);
                    }
                    None => self.move_piece(from, to),
                }
                // Only record a target that an enemy pawn can actually take.
                if moving.kind() == PieceKind::Pawn && from.rank().abs_diff(to.rank()) == 2 {
                    let target = from
                        .forward(us)
                        .filter(|&ep| (pawn_attacks(us, ep) & self.colored(PieceKind::Pawn, !us)).is_nonempty());
                    if let Some(ep) = target {
                        self.xor_hash(zobrist::en_passant_file(ep.file()));
                        self.set_en_passant(Some(ep));
                    }
                }
            }
        }

        for sq in [from, to] {
            for &(color, side) in rights_touching(sq) {
                if self.castling_mut().revoke(color, side) {
                    self.xor_hash(zobrist::castling(CastlingRights::slot(color, side)));
                }
            }
        }

        let halfmove = if irreversible { 0 } else { self.halfmove_clock().saturating_add(1) };
        let fullmove = self.fullmove_number().saturating_add(u16::from(us == Color::Black));
        self.set_clocks(halfmove, fullmove);
        self.set_side_to_move(!us);
    }

    /// Copy-make: the position after `mv`, leaving `self` untouched.
    #[inline]
    pub fn with_move(&self, mv: Move) -> Position {
        let mut next = *self;
        next.make_move(mv);
        next
    }
}

#[cfg(test)]
mod tests {
    use crate::castling::CastleSide;
    use crate::chess_move::{Move, MoveFlag, PromotionPiece};
    use crate::piece::{Color, Piece};
    use crate::position::Position;
    use crate::square::Square;
    use crate::zobrist::hash_from_scratch;

    fn castle_position(side: &str) -> Position {
        format!("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R {side} KQkq - 0 1").parse().unwrap()
    }

    fn assert_hash(pos: &Position) {
        assert_eq!(pos.hash(), hash_from_scratch(pos), "hash drift in {pos:?}");
    }

    #[test]
    fn double_push_sets_en_passant_only_when_capturable() {
        let after = Position::starting_position().with_move(Move::new(Square::E2, Square::E4));
        assert_eq!(after.piece_on(Square::E4), Some(Piece::WHITE_PAWN));
        assert_eq!(after.piece_on(Square::E2), None);
        assert_eq!(after.en_passant(), None);
        assert_eq!(after.side_to_move(), Color::Black);
        assert_eq!(after.fullmove_number(), 1);
        assert_hash(&after);

        let pos: Position = "4k3/8/8/8/3p4/8/4P3/4K3 w - - 0 1".parse().unwrap();
        let after = pos.with_move(Move::new(Square::E2, Square::E4));
        assert_eq!(after.en_passant(), Some(Square::E3));
        assert_hash(&after);

        let black: Position = "4k3/3p4/8/8/8/8/8/4K3 b - - 0 1".parse().unwrap();
        let after = black.with_move(Move::new(Square::D7, Square::D5));
        assert_eq!(after.en_passant(), None);
        assert_hash(&after);
    }

    #[test]
    fn uncapturable_double_push_still_repeats() {
        // Same placement reached by a double push and by two single steps.
        let pos: Position = "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1".parse().unwrap();
        let doubled = pos.with_move(Move::new(Square::E2, Square::E4));
        let stepped: Position = "4k3/8/8/8/4P3/8/8/4K3 b - - 0 1".parse().unwrap();
        assert!(doubled.same_position(&stepped));
        assert_eq!(doubled.hash(), stepped.hash());
    }

    #[test]
    fn fullmove_counter_saturates() {
        let pos: Position = "4k3/8/8/8/8/8/8/4K3 b - - 0 65535".parse().unwrap();
        let after = pos.with_move(Move::new(Square::E8, Square::D8));
        assert_eq!(after.fullmove_number(), u16::MAX);
        assert_eq!(after.side_to_move(), Color::White);
        assert_hash(&after);
    }

    #[test]
    fn capture_resets_clock() {
        let mut pos: Position = "4k3/8/8/3p4/4P3/8/8/4K3 w - - 7 30".parse().unwrap();
        pos.make_move(Move::with_flag(Square::E4, Square::D5, MoveFlag::Capture));
        assert_eq!(pos.piece_on(Square::D5), Some(Piece::WHITE_PAWN));
        assert_eq!(pos.halfmove_clock(), 0);
        assert_eq!(pos.fullmove_number(), 30);
        assert_hash(&pos);
    }

    #[test]
    fn quiet_move_advances_clocks() {
        let mut pos = Position::starting_position();
        pos.make_move(Move::new(Square::G1, Square::F3));
        assert_eq!(pos.halfmove_clock(), 1);
        pos.make_move(Move::new(Square::G8, Square::F6));
        assert_eq!(pos.halfmove_clock(), 2);
        assert_eq!(pos.fullmove_number(), 2);
    }

    #[test]
    fn en_passant_removes_victim() {
        let mut pos: Position = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1".parse().unwrap();
        pos.make_move(Move::with_flag(Square::E5, Square::D6, MoveFlag::EnPassant));
        assert_eq!(pos.piece_on(Square::D6), Some(Piece::WHITE_PAWN));
        assert_eq!(pos.piece_on(Square::D5), None);
        assert_eq!(pos.piece_on(Square::E5), None);
        assert_eq!(pos.en_passant(), None);
        assert_hash(&pos);
    }

    #[test]
    fn promotions_substitute_piece() {
        let pos: Position = "3r3k/4P3/8/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
        for promo in PromotionPiece::ALL {
            for (to, capture) in [(Square::E8, false), (Square::D8, true)] {
                let after = pos.with_move(Move::with_flag(Square::E7, to, MoveFlag::promotion(promo, capture)));
                assert_eq!(after.piece_on(to), Some(Piece::new(promo.to_piece_kind(), Color::White)));
                assert_eq!(after.piece_on(Square::E7), None);
                assert_eq!(after.halfmove_clock(), 0);
                assert_hash(&after);
            }
        }
    }

    #[test]
    fn castling_moves_rook_and_drops_rights() {
        let pos = castle_position("w");
        let after = pos.with_move(Move::with_flag(Square::E1, Square::G1, MoveFlag::KingCastle));
        assert_eq!(after.piece_on(Square::G1), Some(Piece::WHITE_KING));
        assert_eq!(after.piece_on(Square::F1), Some(Piece::WHITE_ROOK));
        assert_eq!(after.piece_on(Square::H1), None);
        assert_eq!(after.king_square(Color::White), Square::G1);
        assert!(!after.castling().has(Color::White, CastleSide::King));
        assert!(!after.castling().has(Color::White, CastleSide::Queen));
        assert!(after.castling().has(Color::Black, CastleSide::Queen));
        assert_hash(&after);

        let after = pos.with_move(Move::with_flag(Square::E1, Square::C1, MoveFlag::QueenCastle));
        assert_eq!(after.piece_on(Square::C1), Some(Piece::WHITE_KING));
        assert_eq!(after.piece_on(Square::D1), Some(Piece::WHITE_ROOK));
        assert_hash(&after);

        let pos = castle_position("b");
        for (to, flag) in [(Square::G8, MoveFlag::KingCastle), (Square::C8, MoveFlag::QueenCastle)] {
            let after = pos.with_move(Move::with_flag(Square::E8, to, flag));
            assert_eq!(after.king_square(Color::Black), to);
            assert!(after.castling().has(Color::White, CastleSide::King));
            assert_hash(&after);
        }
    }

    #[test]
    fn rook_capture_revokes_victims_right() {
        let mut pos: Position = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
        pos.make_move(Move::with_flag(Square::A1, Square::A8, MoveFlag::Capture));
        assert!(!pos.castling().has(Color::White, CastleSide::Queen));
        assert!(!pos.castling().has(Color::Black, CastleSide::Queen));
        assert!(pos.castling().has(Color::White, CastleSide::King));
        assert!(pos.castling().has(Color::Black, CastleSide::King));
        assert_hash(&pos);
    }

    #[test]
    fn pass_flips_only_side() {
        let pos: Position = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 3 9".parse().unwrap();
        let after = pos.with_move(Move::PASS);
        assert_eq!(after.side_to_move(), Color::Black);
        assert_eq!(after.en_passant(), Some(Square::D6));
        assert_eq!(after.halfmove_clock(), 3);
        assert_eq!(after.fullmove_number(), 9);
        assert_eq!(after.hash(), pos.hash() ^ crate::zobrist::side_to_move());
        assert_eq!(after.with_move(Move::PASS), pos);
    }

    #[test]
    fn transpositions_share_hash() {
        let play = |moves: [(Square, Square); 4]| {
            let mut pos = Position::starting_position();
            for (from, to) in moves {
                pos.make_move(Move::new(from, to));
            }
            pos
        };
        let a = play([(Square::G1, Square::F3), (Square::G8, Square::F6), (Square::B1, Square::C3), (Square::B8, Square::C6)]);
        let b = play([(Square::B1, Square::C3), (Square::B8, Square::C6), (Square::G1, Square::F3), (Square::G8, Square::F6)]);
        assert_eq!(a.hash(), b.hash());
        assert!(a.same_position(&b));
    }
}
