//! Colors, piece kinds, and colored pieces.
//!
//! Piece behavior is a closed set: every consumer dispatches on [`PieceKind`]
//! with a `match` or a table lookup indexed by [`PieceKind::index`].

use std::fmt;
use std::ops::Not;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub const COUNT: usize = 2;
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn flip(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl Not for Color {
    type Output = Color;

    #[inline]
    fn not(self) -> Color {
        self.flip()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Color::White => "w",
            Color::Black => "b",
        })
    }
}

/// A piece type without color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

/// Centipawn values indexed by [`PieceKind::index`]. The king's entry is only
/// meaningful to exchange evaluation, where it must dominate everything else.
const PIECE_VALUES: [i32; PieceKind::COUNT] = [100, 320, 330, 500, 900, 20_000];

impl PieceKind {
    pub const COUNT: usize = 6;

    /// All kinds, cheapest first.
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Material value in centipawns.
    #[inline]
    pub const fn value(self) -> i32 {
        PIECE_VALUES[self as usize]
    }

    /// Lowercase FEN letter.
    #[inline]
    pub const fn fen_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    /// Case-insensitive FEN letter lookup.
    pub fn from_fen_char(c: char) -> Option<PieceKind> {
        Some(match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        })
    }

    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }
}

/// A colored piece. The inner byte is the dense index `color * 6 + kind`,
/// which is also the bitboard slot in [`Position`](crate::Position).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece(u8);

impl Piece {
    pub const COUNT: usize = 12;

    pub const WHITE_PAWN: Piece = Piece::new(PieceKind::Pawn, Color::White);
    pub const WHITE_KNIGHT: Piece = Piece::new(PieceKind::Knight, Color::White);
    pub const WHITE_BISHOP: Piece = Piece::new(PieceKind::Bishop, Color::White);
    pub const WHITE_ROOK: Piece = Piece::new(PieceKind::Rook, Color::White);
    pub const WHITE_QUEEN: Piece = Piece::new(PieceKind::Queen, Color::White);
    pub const WHITE_KING: Piece = Piece::new(PieceKind::King, Color::White);
    pub const BLACK_PAWN: Piece = Piece::new(PieceKind::Pawn, Color::Black);
    pub const BLACK_KNIGHT: Piece = Piece::new(PieceKind::Knight, Color::Black);
    pub const BLACK_BISHOP: Piece = Piece::new(PieceKind::Bishop, Color::Black);
    pub const BLACK_ROOK: Piece = Piece::new(PieceKind::Rook, Color::Black);
    pub const BLACK_QUEEN: Piece = Piece::new(PieceKind::Queen, Color::Black);
    pub const BLACK_KING: Piece = Piece::new(PieceKind::King, Color::Black);

    /// All twelve pieces in index order.
    pub const ALL: [Piece; 12] = {
        let mut all = [Piece(0); 12];
        let mut i = 0;
        while i < 12 {
            all[i] = Piece(i as u8);
            i += 1;
        }
        all
    };

    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Piece {
        Piece(color as u8 * 6 + kind as u8)
    }

    #[inline]
    pub const fn kind(self) -> PieceKind {
        PieceKind::ALL[(self.0 % 6) as usize]
    }

    #[inline]
    pub const fn color(self) -> Color {
        if self.0 < 6 { Color::White } else { Color::Black }
    }

    /// Dense index in `0..12`.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Uppercase for white, lowercase for black.
    pub fn from_fen_char(c: char) -> Option<Piece> {
        let kind = PieceKind::from_fen_char(c)?;
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        Some(Piece::new(kind, color))
    }

    pub const fn fen_char(self) -> char {
        let c = self.kind().fen_char();
        match self.color() {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Piece({})", self.fen_char())
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fen_char())
    }
}
