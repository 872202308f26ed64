//! Castling rights and the fixed board geometry of each castle.

use std::fmt;

use crate::bitboard::Bitboard;
use crate::error::FenError;
use crate::piece::Color;
use crate::square::Square;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    King,
    Queen,
}

impl CastleSide {
    pub const ALL: [CastleSide; 2] = [CastleSide::King, CastleSide::Queen];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Squares involved in one castle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlePath {
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares strictly between king and rook; all must be empty.
    pub empty: Bitboard,
    /// Squares the king stands on or crosses, destination included; none may be attacked.
    pub safe: Bitboard,
}

const fn bits(squares: &[Square]) -> Bitboard {
    let mut acc = 0u64;
    let mut i = 0;
    while i < squares.len() {
        acc |= 1u64 << squares[i].index();
        i += 1;
    }
    Bitboard::new(acc)
}

/// Indexed by `[color][side]`.
static PATHS: [[CastlePath; 2]; 2] = [
    [
        CastlePath {
            king_from: Square::E1,
            king_to: Square::G1,
            rook_from: Square::H1,
            rook_to: Square::F1,
            empty: bits(&[Square::F1, Square::G1]),
            safe: bits(&[Square::E1, Square::F1, Square::G1]),
        },
        CastlePath {
            king_from: Square::E1,
            king_to: Square::C1,
            rook_from: Square::A1,
            rook_to: Square::D1,
            empty: bits(&[Square::B1, Square::C1, Square::D1]),
            safe: bits(&[Square::E1, Square::D1, Square::C1]),
        },
    ],
    [
        CastlePath {
            king_from: Square::E8,
            king_to: Square::G8,
            rook_from: Square::H8,
            rook_to: Square::F8,
            empty: bits(&[Square::F8, Square::G8]),
            safe: bits(&[Square::E8, Square::F8, Square::G8]),
        },
        CastlePath {
            king_from: Square::E8,
            king_to: Square::C8,
            rook_from: Square::A8,
            rook_to: Square::D8,
            empty: bits(&[Square::B8, Square::C8, Square::D8]),
            safe: bits(&[Square::E8, Square::D8, Square::C8]),
        },
    ],
];

/// Geometry of the given castle.
#[inline]
pub fn castle_path(color: Color, side: CastleSide) -> &'static CastlePath {
    &PATHS[color.index()][side.index()]
}

/// Four independent castling flags: white king side, white queen side,
/// black king side, black queen side.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights([bool; 4]);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights([false; 4]);
    pub const ALL: CastlingRights = CastlingRights([true; 4]);

    /// Slot of a single right, also used as its Zobrist key index.
    #[inline]
    pub const fn slot(color: Color, side: CastleSide) -> usize {
        color.index() * 2 + side.index()
    }

    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0[Self::slot(color, side)]
    }

    #[inline]
    pub fn set(&mut self, color: Color, side: CastleSide) {
        self.0[Self::slot(color, side)] = true;
    }

    /// Clear one right. Returns `true` if it was held before the call.
    #[inline]
    pub fn revoke(&mut self, color: Color, side: CastleSide) -> bool {
        std::mem::replace(&mut self.0[Self::slot(color, side)], false)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0.iter().all(|&held| !held)
    }

    /// Iterate the rights that are held, as `(color, side)` pairs.
    pub fn iter(self) -> impl Iterator<Item = (Color, CastleSide)> {
        Color::ALL
            .into_iter()
            .flat_map(|c| CastleSide::ALL.into_iter().map(move |s| (c, s)))
            .filter(move |&(c, s)| self.has(c, s))
    }

    /// Parse the FEN castling field (`KQkq` subset or `-`).
    pub fn from_fen(field: &str) -> Result<CastlingRights, FenError> {
        let mut rights = CastlingRights::NONE;
        if field == "-" {
            return Ok(rights);
        }
        for character in field.chars() {
            let (color, side) = match character {
                'K' => (Color::White, CastleSide::King),
                'Q' => (Color::White, CastleSide::Queen),
                'k' => (Color::Black, CastleSide::King),
                'q' => (Color::Black, CastleSide::Queen),
                _ => return Err(FenError::InvalidCastlingChar { character }),
            };
            rights.set(color, side);
        }
        Ok(rights)
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        for (color, side) in self.iter() {
            let c = match side {
                CastleSide::King => 'k',
                CastleSide::Queen => 'q',
            };
            let c = if color == Color::White { c.to_ascii_uppercase() } else { c };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CastlingRights({self})")
    }
}
