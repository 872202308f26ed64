//! Legal move generation.
//!
//! Every generator writes into a caller-owned [`MoveList`] and never emits a
//! move that leaves the mover's king attacked.

mod king;
mod masks;
mod mode;
mod pawns;
mod pieces;

use crate::chess_move::{Move, PromotionPiece};
use crate::position::Position;
use crate::see::see;
use crate::square::Square;

use self::king::gen_king;
use self::masks::Masks;
use self::mode::{AllMoves, CapturesOnly, GenMode};
use self::pawns::gen_pawns;
use self::pieces::gen_pieces;

/// No reachable position has more than 218 legal moves.
pub const MAX_MOVES: usize = 256;

/// Fixed-capacity move buffer.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList { moves: [Move::NULL; MAX_MOVES], len: 0 }
    }

    /// Append `mv`. A push past capacity is dropped.
    #[inline]
    pub fn push(&mut self, mv: Move) {
        debug_assert!(self.len < MAX_MOVES, "move list overflow");
        if let Some(slot) = self.moves.get_mut(self.len) {
            *slot = mv;
            self.len += 1;
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Move] {
        &mut self.moves[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    #[inline]
    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }
}

impl Default for MoveList {
    fn default() -> MoveList {
        MoveList::new()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Move {
        &self.as_slice()[index]
    }
}

impl Extend<Move> for MoveList {
    fn extend<I: IntoIterator<Item = Move>>(&mut self, iter: I) {
        for mv in iter {
            self.push(mv);
        }
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

fn generate<M: GenMode>(pos: &Position, list: &mut MoveList) {
    list.clear();
    let masks = Masks::new(pos);
    // In double check only the king can move.
    if !masks.checkers.has_several() {
        gen_pawns::<M>(pos, &masks, list);
        gen_pieces::<M>(pos, &masks, list);
    }
    gen_king::<M>(pos, &masks, list);
}

/// All legal moves for the side to move. `list` is cleared first.
pub fn generate_legal_moves(pos: &Position, list: &mut MoveList) {
    generate::<AllMoves>(pos, list);
}

/// Legal captures only, en passant and capturing promotions included.
pub fn generate_captures(pos: &Position, list: &mut MoveList) {
    generate::<CapturesOnly>(pos, list);
}

/// Moves worth searching past the horizon, in three blocks: checking moves,
/// then the remaining promotions, then en passant and captures that do not
/// lose material by exchange. Returns the length of the checking block.
pub fn generate_noisy_moves(pos: &Position, list: &mut MoveList) -> usize {
    let mut all = MoveList::new();
    generate_legal_moves(pos, &mut all);

    list.clear();
    let mut promotions = MoveList::new();
    let mut captures = MoveList::new();
    for &mv in &all {
        if gives_check(pos, mv) {
            list.push(mv);
        } else if mv.is_promotion() {
            promotions.push(mv);
        } else if mv.is_en_passant() || (mv.is_capture() && see(pos, mv) >= 0) {
            captures.push(mv);
        }
    }

    let checks = list.len();
    list.extend(promotions.iter().copied());
    list.extend(captures.iter().copied());
    checks
}

/// Whether playing the legal move `mv` puts the opponent in check.
#[inline]
pub fn gives_check(pos: &Position, mv: Move) -> bool {
    pos.with_move(mv).is_in_check(!pos.side_to_move())
}

impl Position {
    /// Convenience wrapper around [`generate_legal_moves`].
    pub fn legal_moves(&self) -> MoveList {
        let mut list = MoveList::new();
        generate_legal_moves(self, &mut list);
        list
    }

    /// Resolve coordinate notation (`e2e4`, `e7e8q`) against the legal moves.
    /// Returns [`Move::NULL`] for malformed text or an illegal move.
    pub fn parse_move(&self, text: &str) -> Move {
        if !(4..=5).contains(&text.len()) {
            return Move::NULL;
        }
        let from = text.get(0..2).and_then(Square::from_algebraic);
        let to = text.get(2..4).and_then(Square::from_algebraic);
        let (Some(from), Some(to)) = (from, to) else {
            return Move::NULL;
        };
        let promotion = match text.get(4..) {
            Some("") => None,
            Some(suffix) => match suffix.chars().next().and_then(PromotionPiece::from_uci_char) {
                Some(piece) => Some(piece),
                None => return Move::NULL,
            },
            None => return Move::NULL,
        };

        self.legal_moves()
            .iter()
            .copied()
            .find(|mv| mv.source() == from && mv.dest() == to && mv.promotion_piece() == promotion)
            .unwrap_or(Move::NULL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess_move::MoveFlag;
    use crate::piece::{Color, PieceKind};

    fn moves(fen: &str) -> (Position, MoveList) {
        let pos: Position = fen.parse().unwrap();
        let list = pos.legal_moves();
        (pos, list)
    }

    #[test]
    fn starting_position_20_moves() {
        let (_, list) = moves(crate::fen::STARTING_FEN);
        assert_eq!(list.len(), 20);
    }

    #[test]
    fn pinned_knight_has_no_moves() {
        let (_, list) = moves("4r2k/8/8/8/8/8/4N3/4K3 w - - 0 1");
        assert!(list.iter().all(|m| m.source() != Square::E2));
    }

    #[test]
    fn pinned_rook_slides_along_pin() {
        let (_, list) = moves("4r2k/8/8/8/8/8/4R3/4K3 w - - 0 1");
        let rook: Vec<Square> = list.iter().filter(|m| m.source() == Square::E2).map(|m| m.dest()).collect();
        assert_eq!(rook.len(), 6);
        assert!(rook.iter().all(|sq| sq.file() == 4));
        assert!(rook.contains(&Square::E8));
    }

    #[test]
    fn double_check_king_only() {
        let (pos, list) = moves("4r1k1/8/8/8/8/5n2/8/4K3 w - - 0 1");
        assert!(!list.is_empty());
        for mv in &list {
            assert_eq!(pos.piece_on(mv.source()).map(|p| p.kind()), Some(PieceKind::King), "{mv}");
        }
    }

    #[test]
    fn single_check_blocks_and_captures() {
        // Bishop on b4 checks e1; the knight blocks on d2 or c3, the queen on d2.
        let (_, list) = moves("4k3/8/8/8/1b6/8/8/1N1QK3 w - - 0 1");
        let non_king: Vec<String> = list
            .iter()
            .filter(|m| m.source() != Square::E1)
            .map(|m| m.to_uci())
            .collect();
        for expected in ["b1d2", "b1c3", "d1d2"] {
            assert!(non_king.contains(&expected.to_string()), "missing {expected}: {non_king:?}");
        }
        assert!(non_king.iter().all(|m| ["b1d2", "b1c3", "d1d2"].contains(&m.as_str())));
    }

    #[test]
    fn king_cannot_step_back_along_checking_ray() {
        let (_, list) = moves("4r2k/8/8/8/8/8/4K3/8 w - - 0 1");
        assert!(!list.contains(Move::new(Square::E2, Square::E1)));
        assert!(list.contains(Move::new(Square::E2, Square::D1)));
    }

    #[test]
    fn castling_not_through_check() {
        let (_, list) = moves("4k3/8/b7/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(!list.contains(Move::with_flag(Square::E1, Square::G1, MoveFlag::KingCastle)));
        assert!(list.contains(Move::with_flag(Square::E1, Square::C1, MoveFlag::QueenCastle)));
    }

    #[test]
    fn kingside_castle_with_single_right() {
        let (_, list) = moves("8/8/8/8/8/6k1/8/4K2R w K - 0 1");
        assert!(list.contains(Move::with_flag(Square::E1, Square::G1, MoveFlag::KingCastle)));
        assert!(list.iter().all(|m| m.flag() != MoveFlag::QueenCastle));

        // With the black king on g2, f1 and g1 are covered.
        let (_, list) = moves("8/8/8/8/8/8/6k1/4K2R w K - 0 1");
        assert!(list.iter().all(|m| !m.is_castle()));
    }

    #[test]
    fn queen_side_b_file_may_be_attacked() {
        // Rook on b8 covers b1 only; castling long is still legal.
        let (_, list) = moves("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        assert!(list.contains(Move::with_flag(Square::E1, Square::C1, MoveFlag::QueenCastle)));
    }

    #[test]
    fn en_passant_legal() {
        let (_, list) = moves("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
        assert_eq!(list.iter().filter(|m| m.is_en_passant()).count(), 1);
    }

    #[test]
    fn en_passant_exposing_rank_is_illegal() {
        let (_, list) = moves("4k3/8/8/KPp4r/8/8/8/8 w - c6 0 1");
        assert_eq!(list.iter().filter(|m| m.is_en_passant()).count(), 0);
    }

    #[test]
    fn en_passant_can_remove_checking_pawn() {
        // d5 pawn just double-stepped and checks the king on e4.
        let (_, list) = moves("4k3/8/8/3pP3/4K3/8/8/8 w - d6 0 1");
        assert!(list.contains(Move::with_flag(Square::E5, Square::D6, MoveFlag::EnPassant)));
    }

    #[test]
    fn promotions_generate_four_moves() {
        let (_, list) = moves("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(list.iter().filter(|m| m.is_promotion()).count(), 4);
    }

    #[test]
    fn captures_only_subset() {
        let pos: Position = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"
            .parse()
            .unwrap();
        let mut captures = MoveList::new();
        generate_captures(&pos, &mut captures);
        let all = pos.legal_moves();
        assert_eq!(captures.len(), 8);
        for mv in &captures {
            assert!(mv.is_capture());
            assert!(all.contains(*mv));
        }
        assert_eq!(all.iter().filter(|m| m.is_capture()).count(), captures.len());
    }

    #[test]
    fn noisy_moves_are_ordered() {
        // Qxf7+ checks, a7a8 promotes and Rxd5 wins a knight.
        let pos: Position = "4k3/P4p2/8/3n3p/8/8/6p1/3RKQ1R w - - 0 1".parse().unwrap();
        let mut noisy = MoveList::new();
        let checks = generate_noisy_moves(&pos, &mut noisy);
        let slice = noisy.as_slice();
        for mv in &slice[..checks] {
            assert!(gives_check(&pos, *mv), "{mv} listed as check");
        }
        let rest = &slice[checks..];
        let first_capture = rest.iter().position(|m| !m.is_promotion()).unwrap_or(rest.len());
        assert!(rest[..first_capture].iter().all(|m| m.is_promotion()));
        assert!(rest[first_capture..].iter().all(|m| m.is_capture() && !m.is_promotion()));
        assert!(noisy.contains(Move::with_flag(Square::D1, Square::D5, MoveFlag::Capture)));
        assert!(!noisy.contains(Move::new(Square::E1, Square::D2)));
    }

    #[test]
    fn noisy_moves_skip_losing_captures() {
        let pos: Position = "7k/8/3p4/2p5/8/4Q3/8/4K3 w - - 0 1".parse().unwrap();
        let mut noisy = MoveList::new();
        generate_noisy_moves(&pos, &mut noisy);
        assert!(!noisy.contains(Move::with_flag(Square::E3, Square::C5, MoveFlag::Capture)));
    }

    #[test]
    fn parse_move_resolves_flags() {
        let pos: Position = "r3k3/1P6/8/8/8/8/8/R3K2R w KQq - 0 1".parse().unwrap();
        assert_eq!(pos.parse_move("e1g1").flag(), MoveFlag::KingCastle);
        assert_eq!(pos.parse_move("b7a8q").flag(), MoveFlag::PromoCaptureQueen);
        assert_eq!(pos.parse_move("b7b8n").flag(), MoveFlag::PromoKnight);
        assert_eq!(pos.parse_move("a1a8").flag(), MoveFlag::Capture);
    }

    #[test]
    fn parse_move_rejects_illegal_and_malformed() {
        let pos = Position::starting_position();
        for text in ["", "e2", "e2e5", "e7e5", "e2e4x", "e2e4q", "z9z9", "e2e4e4", "é2e4"] {
            assert_eq!(pos.parse_move(text), Move::NULL, "{text:?}");
        }
        let pos: Position = "4k3/1P6/8/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
        assert_eq!(pos.parse_move("b7b8"), Move::NULL);
        assert_eq!(pos.side_to_move(), Color::White);
    }

    #[test]
    fn overflow_is_dropped() {
        let mut list = MoveList::new();
        for _ in 0..MAX_MOVES {
            list.push(Move::new(Square::A2, Square::A3));
        }
        assert_eq!(list.len(), MAX_MOVES);
    }
}
