//! The position: bitboards, mailbox, king cache, castling, en passant,
//! clocks and an incrementally maintained Zobrist hash.
//!
//! `Position` is plain data and `Copy`. Search undoes a move by restoring a
//! copy taken before [`Position::make_move`].

use std::fmt;

use crate::attacks::{self, bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::castling::CastlingRights;
use crate::error::PositionError;
use crate::piece::{Color, Piece, PieceKind};
use crate::square::Square;
use crate::zobrist;

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// One bitboard per colored piece, indexed by [`Piece::index`].
    pieces: [Bitboard; Piece::COUNT],
    sides: [Bitboard; Color::COUNT],
    occupied: Bitboard,
    mailbox: [Option<Piece>; Square::COUNT],
    kings: [Square; Color::COUNT],
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u16,
    fullmove_number: u16,
    hash: u64,
}

impl Position {
    /// A board with no pieces, white to move, no rights.
    pub(crate) fn empty() -> Position {
        attacks::init();
        Position {
            pieces: [Bitboard::EMPTY; Piece::COUNT],
            sides: [Bitboard::EMPTY; Color::COUNT],
            occupied: Bitboard::EMPTY,
            mailbox: [None; Square::COUNT],
            kings: [Square::E1, Square::E8],
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
        }
    }

    pub fn starting_position() -> Position {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut pos = Position::empty();
        for (file, kind) in (0u8..).zip(BACK_RANK) {
            let squares = [(0, kind, Color::White), (1, PieceKind::Pawn, Color::White),
                (6, PieceKind::Pawn, Color::Black), (7, kind, Color::Black)];
            for (rank, kind, color) in squares {
                if let Some(sq) = Square::from_coords(file, rank) {
                    pos.put_piece(Piece::new(kind, color), sq);
                }
            }
        }
        pos.castling = CastlingRights::ALL;
        pos.hash = zobrist::hash_from_scratch(&pos);
        pos
    }

    // --- Raw mutation. Every helper keeps bitboards, mailbox, king cache and
    // hash in step.

    #[inline]
    pub(crate) fn put_piece(&mut self, piece: Piece, sq: Square) {
        debug_assert!(self.mailbox[sq.index()].is_none(), "{sq} already occupied");
        let bb = sq.bitboard();
        self.pieces[piece.index()] |= bb;
        self.sides[piece.color().index()] |= bb;
        self.occupied |= bb;
        self.mailbox[sq.index()] = Some(piece);
        if piece.kind() == PieceKind::King {
            self.kings[piece.color().index()] = sq;
        }
        self.hash ^= zobrist::piece_square(piece, sq.index());
    }

    #[inline]
    pub(crate) fn remove_piece(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.mailbox[sq.index()].take()?;
        let bb = sq.bitboard();
        self.pieces[piece.index()] ^= bb;
        self.sides[piece.color().index()] ^= bb;
        self.occupied ^= bb;
        self.hash ^= zobrist::piece_square(piece, sq.index());
        Some(piece)
    }

    #[inline]
    pub(crate) fn move_piece(&mut self, from: Square, to: Square) {
        if let Some(piece) = self.remove_piece(from) {
            self.put_piece(piece, to);
        }
    }

    #[inline]
    pub(crate) fn set_side_to_move(&mut self, color: Color) {
        if color != self.side_to_move {
            self.side_to_move = color;
            self.hash ^= zobrist::side_to_move();
        }
    }

    #[inline]
    pub(crate) fn set_castling(&mut self, rights: CastlingRights) {
        self.castling = rights;
    }

    #[inline]
    pub(crate) fn castling_mut(&mut self) -> &mut CastlingRights {
        &mut self.castling
    }

    #[inline]
    pub(crate) fn set_en_passant(&mut self, sq: Option<Square>) {
        self.en_passant = sq;
    }

    #[inline]
    pub(crate) fn set_clocks(&mut self, halfmove_clock: u16, fullmove_number: u16) {
        self.halfmove_clock = halfmove_clock;
        self.fullmove_number = fullmove_number;
    }

    #[inline]
    pub(crate) fn xor_hash(&mut self, key: u64) {
        self.hash ^= key;
    }

    #[inline]
    pub(crate) fn set_hash(&mut self, hash: u64) {
        self.hash = hash;
    }

    // --- Queries

    /// Both colors' pieces of `kind`.
    #[inline]
    pub fn pieces(&self, kind: PieceKind) -> Bitboard {
        self.pieces[Piece::new(kind, Color::White).index()] | self.pieces[Piece::new(kind, Color::Black).index()]
    }

    #[inline]
    pub fn colored(&self, kind: PieceKind, color: Color) -> Bitboard {
        self.pieces[Piece::new(kind, color).index()]
    }

    #[inline]
    pub fn side(&self, color: Color) -> Bitboard {
        self.sides[color.index()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    /// O(1) through the mailbox.
    #[inline]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.mailbox[sq.index()]
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.kings[color.index()]
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Pieces of either color attacking `sq` through `occupied`. Slider rays
    /// are cast from `sq`, so pieces absent from `occupied` are transparent.
    pub fn attackers_to(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        let diagonal = self.pieces(PieceKind::Bishop) | self.pieces(PieceKind::Queen);
        let orthogonal = self.pieces(PieceKind::Rook) | self.pieces(PieceKind::Queen);
        (pawn_attacks(Color::Black, sq) & self.colored(PieceKind::Pawn, Color::White))
            | (pawn_attacks(Color::White, sq) & self.colored(PieceKind::Pawn, Color::Black))
            | (knight_attacks(sq) & self.pieces(PieceKind::Knight))
            | (king_attacks(sq) & self.pieces(PieceKind::King))
            | (bishop_attacks(sq, occupied) & diagonal)
            | (rook_attacks(sq, occupied) & orthogonal)
    }

    /// Whether any piece of `by` attacks `sq`. The defending king is left out
    /// of the occupancy, so a square behind it on a slider's ray counts as
    /// attacked.
    pub fn is_attacked(&self, by: Color, sq: Square) -> bool {
        let occupied = self.occupied.without(self.king_square(!by));
        self.is_attacked_with_occ(by, sq, occupied)
    }

    pub(crate) fn is_attacked_with_occ(&self, by: Color, sq: Square, occupied: Bitboard) -> bool {
        let them = self.side(by);
        if (knight_attacks(sq) & self.colored(PieceKind::Knight, by)).is_nonempty()
            || (king_attacks(sq) & self.colored(PieceKind::King, by)).is_nonempty()
            || (pawn_attacks(!by, sq) & self.colored(PieceKind::Pawn, by)).is_nonempty()
        {
            return true;
        }
        let diagonal = (self.pieces(PieceKind::Bishop) | self.pieces(PieceKind::Queen)) & them;
        if (bishop_attacks(sq, occupied) & diagonal).is_nonempty() {
            return true;
        }
        let orthogonal = (self.pieces(PieceKind::Rook) | self.pieces(PieceKind::Queen)) & them;
        (rook_attacks(sq, occupied) & orthogonal).is_nonempty()
    }

    #[inline]
    pub fn is_in_check(&self, color: Color) -> bool {
        self.is_attacked(!color, self.king_square(color))
    }

    /// Pieces of `!color` giving check to `color`'s king.
    #[inline]
    pub fn checkers(&self, color: Color) -> Bitboard {
        self.attackers_to(self.king_square(color), self.occupied) & self.side(!color)
    }

    /// Same placement, side to move, castling rights and en passant square.
    /// Clocks are ignored; this is the equality repetition is judged by.
    pub fn same_position(&self, other: &Position) -> bool {
        self.pieces == other.pieces
            && self.side_to_move == other.side_to_move
            && self.castling == other.castling
            && self.en_passant == other.en_passant
    }

    /// Check the structural invariants a legal position must satisfy.
    pub fn validate(&self) -> Result<(), PositionError> {
        for color in Color::ALL {
            let count = self.colored(PieceKind::King, color).count();
            if count != 1 {
                let color = match color {
                    Color::White => "white",
                    Color::Black => "black",
                };
                return Err(PositionError::InvalidKingCount { color, count });
            }
        }

        if (self.pieces(PieceKind::Pawn) & (Bitboard::RANK_1 | Bitboard::RANK_8)).is_nonempty() {
            return Err(PositionError::PawnsOnBackRank);
        }

        let mut seen = Bitboard::EMPTY;
        for bb in self.pieces {
            if (seen & bb).is_nonempty() {
                return Err(PositionError::Inconsistent);
            }
            seen |= bb;
        }
        if seen != self.occupied
            || self.sides[0] | self.sides[1] != self.occupied
            || (self.sides[0] & self.sides[1]).is_nonempty()
        {
            return Err(PositionError::Inconsistent);
        }
        for sq in Square::all() {
            let from_bitboards = Piece::ALL.into_iter().find(|p| self.pieces[p.index()].contains(sq));
            if from_bitboards != self.mailbox[sq.index()] {
                return Err(PositionError::Inconsistent);
            }
        }
        for color in Color::ALL {
            if self.colored(PieceKind::King, color) != self.kings[color.index()].bitboard() {
                return Err(PositionError::Inconsistent);
            }
        }

        if self.is_in_check(!self.side_to_move) {
            return Err(PositionError::OpponentInCheck);
        }

        Ok(())
    }

    /// An 8x8 grid rendering, rank 8 at the top.
    pub fn pretty(&self) -> PrettyPosition<'_> {
        PrettyPosition(self)
    }
}

impl Default for Position {
    fn default() -> Position {
        Position::starting_position()
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position(\"{self}\")")
    }
}

pub struct PrettyPosition<'a>(&'a Position);

impl fmt::Display for PrettyPosition<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0u8..8).rev() {
            write!(f, "{}  ", rank + 1)?;
            for file in 0u8..8 {
                let c = Square::from_coords(file, rank)
                    .and_then(|sq| self.0.piece_on(sq))
                    .map_or('.', Piece::fen_char);
                if file < 7 {
                    write!(f, "{c} ")?;
                } else {
                    write!(f, "{c}")?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_validates() {
        let pos = Position::starting_position();
        pos.validate().unwrap();
        assert_eq!(pos.occupied().count(), 32);
        assert_eq!(pos.king_square(Color::White), Square::E1);
        assert_eq!(pos.king_square(Color::Black), Square::E8);
        assert_eq!(pos.piece_on(Square::D1), Some(Piece::WHITE_QUEEN));
        assert_eq!(pos.piece_on(Square::G8), Some(Piece::BLACK_KNIGHT));
        assert_eq!(pos.piece_on(Square::E4), None);
    }

    #[test]
    fn starting_position_matches_fen() {
        let parsed: Position = crate::fen::STARTING_FEN.parse().unwrap();
        assert_eq!(parsed, Position::starting_position());
    }

    #[test]
    fn put_and_remove_keep_hash() {
        let mut pos = Position::starting_position();
        let before = pos.hash();
        let piece = pos.remove_piece(Square::B1);
        assert_eq!(piece, Some(Piece::WHITE_KNIGHT));
        assert_ne!(pos.hash(), before);
        pos.put_piece(Piece::WHITE_KNIGHT, Square::B1);
        assert_eq!(pos.hash(), before);
        assert_eq!(pos, Position::starting_position());
    }

    #[test]
    fn attack_queries() {
        let pos: Position = "4k3/8/8/8/8/8/8/R3K3 w - - 0 1".parse().unwrap();
        assert!(pos.is_attacked(Color::White, Square::A8));
        assert!(pos.is_attacked(Color::White, Square::D1));
        assert!(!pos.is_attacked(Color::White, Square::F1));
        assert!(!pos.is_in_check(Color::Black));
    }

    #[test]
    fn defending_king_does_not_block_its_own_escape_ray() {
        // Rook on a8 checks the king on e8; f8 lies behind the king on the ray.
        let pos: Position = "R3k3/8/8/8/8/8/8/4K3 b - - 0 1".parse().unwrap();
        assert!(pos.is_in_check(Color::Black));
        assert!(pos.is_attacked(Color::White, Square::F8));
        assert_eq!(pos.checkers(Color::Black), Square::A8.bitboard());
    }

    #[test]
    fn pawn_attacks_depend_on_color() {
        let pos: Position = "4k3/8/8/3p4/8/8/8/4K3 w - - 0 1".parse().unwrap();
        assert!(pos.is_attacked(Color::Black, Square::E4));
        assert!(!pos.is_attacked(Color::Black, Square::E6));
    }

    #[test]
    fn same_position_ignores_clocks() {
        let a: Position = "4k3/8/8/8/8/8/8/4K3 w - - 3 10".parse().unwrap();
        let b: Position = "4k3/8/8/8/8/8/8/4K3 w - - 0 40".parse().unwrap();
        let c: Position = "4k3/8/8/8/8/8/8/4K3 b - - 3 10".parse().unwrap();
        assert!(a.same_position(&b));
        assert!(!a.same_position(&c));
        assert_ne!(a, b);
    }

    #[test]
    fn debug_and_pretty() {
        let pos = Position::starting_position();
        assert_eq!(
            format!("{pos:?}"),
            "Position(\"rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1\")"
        );
        let grid = pos.pretty().to_string();
        assert!(grid.starts_with("8  r n b q k b n r"));
        assert!(grid.ends_with("   a b c d e f g h"));
    }
}
