//! Board squares, indexed rank-major from A1 = 0 to H8 = 63.

use std::fmt;

use crate::bitboard::Bitboard;
use crate::piece::Color;

/// A square on the board. Index = rank * 8 + file.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

macro_rules! named_squares {
    ($($name:ident = $idx:expr),* $(,)?) => {
        impl Square {
            $(pub const $name: Square = Square($idx);)*
        }
    };
}

named_squares! {
    A1 = 0, B1 = 1, C1 = 2, D1 = 3, E1 = 4, F1 = 5, G1 = 6, H1 = 7,
    A2 = 8, B2 = 9, C2 = 10, D2 = 11, E2 = 12, F2 = 13, G2 = 14, H2 = 15,
    A3 = 16, B3 = 17, C3 = 18, D3 = 19, E3 = 20, F3 = 21, G3 = 22, H3 = 23,
    A4 = 24, B4 = 25, C4 = 26, D4 = 27, E4 = 28, F4 = 29, G4 = 30, H4 = 31,
    A5 = 32, B5 = 33, C5 = 34, D5 = 35, E5 = 36, F5 = 37, G5 = 38, H5 = 39,
    A6 = 40, B6 = 41, C6 = 42, D6 = 43, E6 = 44, F6 = 45, G6 = 46, H6 = 47,
    A7 = 48, B7 = 49, C7 = 50, D7 = 51, E7 = 52, F7 = 53, G7 = 54, H7 = 55,
    A8 = 56, B8 = 57, C8 = 58, D8 = 59, E8 = 60, F8 = 61, G8 = 62, H8 = 63,
}

impl Square {
    pub const COUNT: usize = 64;

    /// Build a square from zero-based file and rank, `None` if either is off the board.
    #[inline]
    pub const fn from_coords(file: u8, rank: u8) -> Option<Square> {
        if file < 8 && rank < 8 {
            Some(Square(rank * 8 + file))
        } else {
            None
        }
    }

    #[inline]
    pub const fn from_index(index: u8) -> Option<Square> {
        if index < 64 { Some(Square(index)) } else { None }
    }

    #[inline]
    pub(crate) const fn from_index_unchecked(index: u8) -> Square {
        debug_assert!(index < 64);
        Square(index)
    }

    /// Parse coordinate notation such as `"e4"`.
    pub fn from_algebraic(s: &str) -> Option<Square> {
        match s.as_bytes() {
            &[file @ b'a'..=b'h', rank @ b'1'..=b'8'] => Square::from_coords(file - b'a', rank - b'1'),
            _ => None,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Zero-based rank (0 = rank 1).
    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 >> 3
    }

    /// Zero-based file (0 = file a).
    #[inline]
    pub const fn file(self) -> u8 {
        self.0 & 7
    }

    /// Rank as seen from `color`'s side of the board.
    #[inline]
    pub const fn relative_rank(self, color: Color) -> u8 {
        match color {
            Color::White => self.rank(),
            Color::Black => 7 - self.rank(),
        }
    }

    #[inline]
    pub const fn bitboard(self) -> Bitboard {
        Bitboard::new(1u64 << self.0)
    }

    /// The square one rank further from `color`'s home rank, if any.
    #[inline]
    pub const fn forward(self, color: Color) -> Option<Square> {
        match color {
            Color::White if self.0 < 56 => Some(Square(self.0 + 8)),
            Color::Black if self.0 >= 8 => Some(Square(self.0 - 8)),
            _ => None,
        }
    }

    /// The square one rank closer to `color`'s home rank, if any.
    #[inline]
    pub const fn backward(self, color: Color) -> Option<Square> {
        self.forward(color.flip())
    }

    /// All 64 squares in index order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0u8..64).map(Square)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file()) as char, (b'1' + self.rank()) as char)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::Square;
    use crate::piece::Color;

    #[test]
    fn algebraic_roundtrip() {
        for sq in Square::all() {
            assert_eq!(Square::from_algebraic(&sq.to_string()), Some(sq));
        }
    }

    #[test]
    fn algebraic_rejects_garbage() {
        assert_eq!(Square::from_algebraic(""), None);
        assert_eq!(Square::from_algebraic("i1"), None);
        assert_eq!(Square::from_algebraic("a9"), None);
        assert_eq!(Square::from_algebraic("e44"), None);
        assert_eq!(Square::from_algebraic("E4"), None);
    }

    #[test]
    fn coordinates() {
        assert_eq!(Square::E4.file(), 4);
        assert_eq!(Square::E4.rank(), 3);
        assert_eq!(Square::from_coords(7, 7), Some(Square::H8));
        assert_eq!(Square::from_coords(8, 0), None);
    }

    #[test]
    fn relative_rank_mirrors_for_black() {
        assert_eq!(Square::E2.relative_rank(Color::White), 1);
        assert_eq!(Square::E7.relative_rank(Color::Black), 1);
    }

    #[test]
    fn forward_and_backward() {
        assert_eq!(Square::E2.forward(Color::White), Some(Square::E3));
        assert_eq!(Square::E2.forward(Color::Black), Some(Square::E1));
        assert_eq!(Square::E8.forward(Color::White), None);
        assert_eq!(Square::E6.backward(Color::White), Some(Square::E5));
    }

    #[test]
    fn display_and_debug() {
        assert_eq!(Square::G7.to_string(), "g7");
        assert_eq!(format!("{:?}", Square::A1), "Square(a1)");
    }
}
