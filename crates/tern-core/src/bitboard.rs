//! 64-bit square sets and the bit utilities the rest of the crate builds on.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not, Shl, Shr};

use crate::square::Square;

/// A set of squares, one bit per square (A1 = bit 0, H8 = bit 63).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitboard(u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);
    pub const FULL: Bitboard = Bitboard(!0);

    pub const RANK_1: Bitboard = Bitboard(0x0000_0000_0000_00FF);
    pub const RANK_2: Bitboard = Bitboard(0x0000_0000_0000_FF00);
    pub const RANK_3: Bitboard = Bitboard(0x0000_0000_00FF_0000);
    pub const RANK_4: Bitboard = Bitboard(0x0000_0000_FF00_0000);
    pub const RANK_5: Bitboard = Bitboard(0x0000_00FF_0000_0000);
    pub const RANK_6: Bitboard = Bitboard(0x0000_FF00_0000_0000);
    pub const RANK_7: Bitboard = Bitboard(0x00FF_0000_0000_0000);
    pub const RANK_8: Bitboard = Bitboard(0xFF00_0000_0000_0000);

    pub const FILE_A: Bitboard = Bitboard(0x0101_0101_0101_0101);
    pub const FILE_H: Bitboard = Bitboard(0x8080_8080_8080_8080);

    #[inline]
    pub const fn new(bits: u64) -> Bitboard {
        Bitboard(bits)
    }

    #[inline]
    pub const fn inner(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_nonempty(self) -> bool {
        self.0 != 0
    }

    /// Population count.
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Return `true` if more than one bit is set.
    #[inline]
    pub const fn has_several(self) -> bool {
        self.0 & self.0.wrapping_sub(1) != 0
    }

    #[inline]
    pub const fn contains(self, sq: Square) -> bool {
        self.0 & (1u64 << sq.index()) != 0
    }

    #[inline]
    pub const fn with(self, sq: Square) -> Bitboard {
        Bitboard(self.0 | (1u64 << sq.index()))
    }

    #[inline]
    pub const fn without(self, sq: Square) -> Bitboard {
        Bitboard(self.0 & !(1u64 << sq.index()))
    }

    /// Least significant set square, or `None` for the empty set.
    #[inline]
    pub const fn lsb(self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Some(Square::from_index_unchecked(self.0.trailing_zeros() as u8))
        }
    }

    /// Remove and return the least significant set square.
    #[inline]
    pub fn pop_lsb(&mut self) -> Option<Square> {
        let sq = self.lsb()?;
        self.0 &= self.0 - 1;
        Some(sq)
    }

    /// Mirror the board through its center (bit 0 becomes bit 63).
    #[inline]
    pub const fn reverse(self) -> Bitboard {
        Bitboard(self.0.reverse_bits())
    }

    /// Mirror the board across the horizontal axis (rank 1 becomes rank 8).
    #[inline]
    pub const fn flip_vertical(self) -> Bitboard {
        Bitboard(self.0.swap_bytes())
    }

    /// Shift every square one rank up.
    #[inline]
    pub const fn north(self) -> Bitboard {
        Bitboard(self.0 << 8)
    }

    /// Shift every square one rank down.
    #[inline]
    pub const fn south(self) -> Bitboard {
        Bitboard(self.0 >> 8)
    }

    /// Shift every square one file towards H, dropping squares that would wrap.
    #[inline]
    pub const fn east(self) -> Bitboard {
        Bitboard((self.0 & !Self::FILE_H.0) << 1)
    }

    /// Shift every square one file towards A, dropping squares that would wrap.
    #[inline]
    pub const fn west(self) -> Bitboard {
        Bitboard((self.0 & !Self::FILE_A.0) >> 1)
    }
}

macro_rules! bitboard_binop {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:tt) => {
        impl $trait for Bitboard {
            type Output = Bitboard;
            #[inline]
            fn $method(self, rhs: Bitboard) -> Bitboard {
                Bitboard(self.0 $op rhs.0)
            }
        }

        impl $assign_trait for Bitboard {
            #[inline]
            fn $assign_method(&mut self, rhs: Bitboard) {
                self.0 = self.0 $op rhs.0;
            }
        }
    };
}

bitboard_binop!(BitAnd, bitand, BitAndAssign, bitand_assign, &);
bitboard_binop!(BitOr, bitor, BitOrAssign, bitor_assign, |);
bitboard_binop!(BitXor, bitxor, BitXorAssign, bitxor_assign, ^);

impl Not for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn not(self) -> Bitboard {
        Bitboard(!self.0)
    }
}

impl Shl<u8> for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn shl(self, rhs: u8) -> Bitboard {
        Bitboard(self.0 << rhs)
    }
}

impl Shr<u8> for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn shr(self, rhs: u8) -> Bitboard {
        Bitboard(self.0 >> rhs)
    }
}

impl From<Square> for Bitboard {
    #[inline]
    fn from(sq: Square) -> Bitboard {
        sq.bitboard()
    }
}

impl Iterator for Bitboard {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        self.pop_lsb()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.count() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Bitboard {}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bitboard({:#018x})", self.0)?;
        for rank in (0..8u8).rev() {
            for file in 0..8u8 {
                let set = self.0 >> (rank * 8 + file) & 1 == 1;
                write!(f, "{}", if set { 'x' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Bitboard;
    use crate::square::Square;

    #[test]
    fn pop_lsb_walks_ascending() {
        let mut bb = Square::H8.bitboard() | Square::A1.bitboard() | Square::E4.bitboard();
        assert_eq!(bb.pop_lsb(), Some(Square::A1));
        assert_eq!(bb.pop_lsb(), Some(Square::E4));
        assert_eq!(bb.pop_lsb(), Some(Square::H8));
        assert_eq!(bb.pop_lsb(), None);
        assert!(bb.is_empty());
    }

    #[test]
    fn count_and_several() {
        assert_eq!(Bitboard::RANK_2.count(), 8);
        assert!(Bitboard::RANK_2.has_several());
        assert!(!Square::C3.bitboard().has_several());
        assert!(!Bitboard::EMPTY.has_several());
    }

    #[test]
    fn reverse_maps_corners() {
        assert_eq!(Square::A1.bitboard().reverse(), Square::H8.bitboard());
        assert_eq!(Bitboard::RANK_1.reverse(), Bitboard::RANK_8);
        assert_eq!(Bitboard::FILE_A.reverse(), Bitboard::FILE_H);
    }

    #[test]
    fn flip_vertical_keeps_files() {
        assert_eq!(Square::B2.bitboard().flip_vertical(), Square::B7.bitboard());
        assert_eq!(Bitboard::FILE_A.flip_vertical(), Bitboard::FILE_A);
    }

    #[test]
    fn lateral_shifts_do_not_wrap() {
        assert!(Square::H4.bitboard().east().is_empty());
        assert!(Square::A4.bitboard().west().is_empty());
        assert_eq!(Square::D4.bitboard().east(), Square::E4.bitboard());
        assert_eq!(Square::D4.bitboard().west(), Square::C4.bitboard());
        assert_eq!(Square::D4.bitboard().north(), Square::D5.bitboard());
        assert!(Square::D8.bitboard().north().is_empty());
    }

    #[test]
    fn iterator_is_exact() {
        let bb = Bitboard::RANK_8;
        assert_eq!(bb.len(), 8);
        let squares: Vec<Square> = bb.collect();
        assert_eq!(squares.first(), Some(&Square::A8));
        assert_eq!(squares.last(), Some(&Square::H8));
    }

    #[test]
    fn with_without() {
        let bb = Bitboard::EMPTY.with(Square::G7);
        assert!(bb.contains(Square::G7));
        assert!(bb.without(Square::G7).is_empty());
    }
}
