//! Move records: source, destination, a flag, and a transient ordering score.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::piece::PieceKind;
use crate::square::Square;

/// What kind of move this is. A double pawn push is an ordinary `Quiet`
/// move; the rank distance identifies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveFlag {
    Quiet,
    KingCastle,
    QueenCastle,
    EnPassant,
    Capture,
    PromoKnight,
    PromoBishop,
    PromoRook,
    PromoQueen,
    PromoCaptureKnight,
    PromoCaptureBishop,
    PromoCaptureRook,
    PromoCaptureQueen,
    /// Flip the side to move and nothing else.
    Pass,
}

impl MoveFlag {
    /// Promotion flag for `piece`, with or without a capture.
    pub const fn promotion(piece: PromotionPiece, capture: bool) -> MoveFlag {
        match (piece, capture) {
            (PromotionPiece::Knight, false) => MoveFlag::PromoKnight,
            (PromotionPiece::Bishop, false) => MoveFlag::PromoBishop,
            (PromotionPiece::Rook, false) => MoveFlag::PromoRook,
            (PromotionPiece::Queen, false) => MoveFlag::PromoQueen,
            (PromotionPiece::Knight, true) => MoveFlag::PromoCaptureKnight,
            (PromotionPiece::Bishop, true) => MoveFlag::PromoCaptureBishop,
            (PromotionPiece::Rook, true) => MoveFlag::PromoCaptureRook,
            (PromotionPiece::Queen, true) => MoveFlag::PromoCaptureQueen,
        }
    }
}

/// The piece a pawn promotes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PromotionPiece {
    Knight = 0,
    Bishop = 1,
    Rook = 2,
    Queen = 3,
}

impl PromotionPiece {
    /// Strongest first, the order move generation emits them in.
    pub const ALL: [PromotionPiece; 4] = [
        PromotionPiece::Queen,
        PromotionPiece::Rook,
        PromotionPiece::Bishop,
        PromotionPiece::Knight,
    ];

    pub const fn to_piece_kind(self) -> PieceKind {
        match self {
            PromotionPiece::Knight => PieceKind::Knight,
            PromotionPiece::Bishop => PieceKind::Bishop,
            PromotionPiece::Rook => PieceKind::Rook,
            PromotionPiece::Queen => PieceKind::Queen,
        }
    }

    pub const fn uci_char(self) -> char {
        match self {
            PromotionPiece::Knight => 'n',
            PromotionPiece::Bishop => 'b',
            PromotionPiece::Rook => 'r',
            PromotionPiece::Queen => 'q',
        }
    }

    pub fn from_uci_char(c: char) -> Option<PromotionPiece> {
        Some(match c {
            'n' => PromotionPiece::Knight,
            'b' => PromotionPiece::Bishop,
            'r' => PromotionPiece::Rook,
            'q' => PromotionPiece::Queen,
            _ => return None,
        })
    }
}

/// A move. Identity is `(from, to, flag)`; the ordering score is scratch
/// space for move ordering and is ignored by `==` and `Hash`.
#[derive(Clone, Copy)]
pub struct Move {
    from: Square,
    to: Square,
    flag: MoveFlag,
    score: i32,
}

impl Move {
    /// "No move". Returned by text parsing when the move is not legal.
    pub const NULL: Move = Move::with_flag(Square::A1, Square::A1, MoveFlag::Quiet);

    /// A pass: only the side to move changes.
    pub const PASS: Move = Move::with_flag(Square::A1, Square::A1, MoveFlag::Pass);

    /// Reported as the best move when the side to move is mated.
    pub const CHECKMATE: Move = Move::with_flag(Square::H1, Square::H1, MoveFlag::Quiet);

    /// Reported as the best move when the side to move has no moves and is not in check.
    pub const STALEMATE: Move = Move::with_flag(Square::H8, Square::H8, MoveFlag::Quiet);

    /// A quiet move (including double pawn pushes).
    #[inline]
    pub const fn new(from: Square, to: Square) -> Move {
        Move::with_flag(from, to, MoveFlag::Quiet)
    }

    #[inline]
    pub const fn with_flag(from: Square, to: Square, flag: MoveFlag) -> Move {
        Move { from, to, flag, score: 0 }
    }

    #[inline]
    pub const fn source(self) -> Square {
        self.from
    }

    #[inline]
    pub const fn dest(self) -> Square {
        self.to
    }

    #[inline]
    pub const fn flag(self) -> MoveFlag {
        self.flag
    }

    #[inline]
    pub const fn score(self) -> i32 {
        self.score
    }

    #[inline]
    pub fn set_score(&mut self, score: i32) {
        self.score = score;
    }

    /// True for ordinary captures, en passant and capturing promotions.
    #[inline]
    pub const fn is_capture(self) -> bool {
        matches!(
            self.flag,
            MoveFlag::Capture
                | MoveFlag::EnPassant
                | MoveFlag::PromoCaptureKnight
                | MoveFlag::PromoCaptureBishop
                | MoveFlag::PromoCaptureRook
                | MoveFlag::PromoCaptureQueen
        )
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.promotion_piece().is_some()
    }

    pub const fn promotion_piece(self) -> Option<PromotionPiece> {
        match self.flag {
            MoveFlag::PromoKnight | MoveFlag::PromoCaptureKnight => Some(PromotionPiece::Knight),
            MoveFlag::PromoBishop | MoveFlag::PromoCaptureBishop => Some(PromotionPiece::Bishop),
            MoveFlag::PromoRook | MoveFlag::PromoCaptureRook => Some(PromotionPiece::Rook),
            MoveFlag::PromoQueen | MoveFlag::PromoCaptureQueen => Some(PromotionPiece::Queen),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        matches!(self.flag, MoveFlag::KingCastle | MoveFlag::QueenCastle)
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        matches!(self.flag, MoveFlag::EnPassant)
    }

    #[inline]
    pub const fn is_pass(self) -> bool {
        matches!(self.flag, MoveFlag::Pass)
    }

    /// Neither a capture nor a promotion.
    #[inline]
    pub const fn is_quiet(self) -> bool {
        !self.is_capture() && !self.is_promotion()
    }

    #[inline]
    pub fn is_null(self) -> bool {
        self == Move::NULL
    }

    /// True for the null move and the terminal sentinels.
    pub fn is_sentinel(self) -> bool {
        self == Move::NULL || self == Move::CHECKMATE || self == Move::STALEMATE
    }

    /// Coordinate notation such as `e2e4` or `e7e8q`. Sentinels print as `0000`.
    pub fn to_uci(self) -> String {
        self.to_string()
    }
}

impl PartialEq for Move {
    #[inline]
    fn eq(&self, other: &Move) -> bool {
        self.from == other.from && self.to == other.to && self.flag == other.flag
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.from.hash(state);
        self.to.hash(state);
        self.flag.hash(state);
    }
}

impl Default for Move {
    fn default() -> Move {
        Move::NULL
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_sentinel() || self.is_pass() {
            return f.write_str("0000");
        }
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promo) = self.promotion_piece() {
            write!(f, "{}", promo.uci_char())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Move::CHECKMATE {
            return f.write_str("Move(CHECKMATE)");
        }
        if *self == Move::STALEMATE {
            return f.write_str("Move(STALEMATE)");
        }
        write!(f, "Move({self}, {:?})", self.flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_is_not_identity() {
        let mut a = Move::new(Square::E2, Square::E4);
        let b = Move::new(Square::E2, Square::E4);
        a.set_score(1234);
        assert_eq!(a, b);
    }

    #[test]
    fn flag_is_identity() {
        let quiet = Move::new(Square::E5, Square::D6);
        let ep = Move::with_flag(Square::E5, Square::D6, MoveFlag::EnPassant);
        assert_ne!(quiet, ep);
    }

    #[test]
    fn sentinels_are_distinct() {
        let all = [Move::NULL, Move::PASS, Move::CHECKMATE, Move::STALEMATE];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(Move::CHECKMATE.is_sentinel());
        assert!(!Move::PASS.is_sentinel());
    }

    #[test]
    fn uci_text() {
        assert_eq!(Move::new(Square::G1, Square::F3).to_uci(), "g1f3");
        let promo = Move::with_flag(
            Square::E7,
            Square::D8,
            MoveFlag::promotion(PromotionPiece::Knight, true),
        );
        assert_eq!(promo.to_uci(), "e7d8n");
        assert_eq!(Move::NULL.to_uci(), "0000");
    }

    #[test]
    fn classification() {
        let cap_promo = Move::with_flag(Square::B7, Square::A8, MoveFlag::PromoCaptureQueen);
        assert!(cap_promo.is_capture());
        assert!(cap_promo.is_promotion());
        assert!(!cap_promo.is_quiet());
        assert_eq!(cap_promo.promotion_piece(), Some(PromotionPiece::Queen));

        let castle = Move::with_flag(Square::E1, Square::G1, MoveFlag::KingCastle);
        assert!(castle.is_castle());
        assert!(castle.is_quiet());
        assert!(Move::with_flag(Square::E5, Square::D6, MoveFlag::EnPassant).is_capture());
    }
}
