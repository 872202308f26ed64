//! FEN import and export for [`Position`].

use std::fmt;
use std::str::FromStr;

use crate::castling::{CastlingRights, castle_path};
use crate::error::FenError;
use crate::piece::{Color, Piece, PieceKind};
use crate::position::Position;
use crate::square::Square;
use crate::zobrist;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Halfmove clock and fullmove number are optional and default to `0 1`.
impl FromStr for Position {
    type Err = FenError;

    fn from_str(fen: &str) -> Result<Position, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if !(4..=6).contains(&fields.len()) {
            return Err(FenError::WrongFieldCount { found: fields.len() });
        }

        let mut pos = Position::empty();

        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount { found: ranks.len() });
        }
        for (rank_index, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_index as u8;
            let mut file = 0u8;
            for character in rank_str.chars() {
                if let Some(run) = character.to_digit(10) {
                    if !(1..=8).contains(&run) {
                        return Err(FenError::InvalidPieceChar { character });
                    }
                    file += run as u8;
                } else {
                    let piece = Piece::from_fen_char(character).ok_or(FenError::InvalidPieceChar { character })?;
                    let sq = Square::from_coords(file, rank).ok_or(FenError::BadRankLength {
                        rank_index,
                        length: file as usize + 1,
                    })?;
                    pos.put_piece(piece, sq);
                    file += 1;
                }
                if file > 8 {
                    return Err(FenError::BadRankLength { rank_index, length: file as usize });
                }
            }
            if file != 8 {
                return Err(FenError::BadRankLength { rank_index, length: file as usize });
            }
        }

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidColor { found: other.to_string() }),
        };
        pos.set_side_to_move(side_to_move);

        // Rights whose king or rook is not at home are dropped.
        let mut castling = CastlingRights::from_fen(fields[2])?;
        for (color, side) in castling.iter() {
            let path = castle_path(color, side);
            if pos.piece_on(path.king_from) != Some(Piece::new(PieceKind::King, color))
                || pos.piece_on(path.rook_from) != Some(Piece::new(PieceKind::Rook, color))
            {
                castling.revoke(color, side);
            }
        }
        pos.set_castling(castling);

        let en_passant = match fields[3] {
            "-" => None,
            text => {
                let invalid = || FenError::InvalidEnPassant { found: text.to_string() };
                let sq = Square::from_algebraic(text).ok_or_else(invalid)?;
                if !en_passant_plausible(&pos, sq) {
                    return Err(invalid());
                }
                Some(sq)
            }
        };
        pos.set_en_passant(en_passant);

        let counter = |index: usize, field: &'static str, default: u16| -> Result<u16, FenError> {
            fields.get(index).map_or(Ok(default), |text| {
                text.parse::<u16>().map_err(|_| FenError::InvalidMoveCounter { field, found: text.to_string() })
            })
        };
        let halfmove_clock = counter(4, "halfmove clock", 0)?;
        let fullmove_number = counter(5, "fullmove number", 1)?;
        pos.set_clocks(halfmove_clock, fullmove_number);

        pos.validate()?;
        pos.set_hash(zobrist::hash_from_scratch(&pos));
        Ok(pos)
    }
}

/// The target must sit behind an enemy pawn that could just have made a
/// double step: relative sixth rank, pawn in front of it, and both the
/// target and the pawn's origin square empty.
fn en_passant_plausible(pos: &Position, sq: Square) -> bool {
    let us = pos.side_to_move();
    if sq.relative_rank(us) != 5 || pos.piece_on(sq).is_some() {
        return false;
    }
    let pawn = sq.backward(us);
    let origin = sq.forward(us);
    match (pawn, origin) {
        (Some(pawn), Some(origin)) => {
            pos.piece_on(pawn) == Some(Piece::new(PieceKind::Pawn, !us)) && pos.piece_on(origin).is_none()
        }
        _ => false,
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0u8..8).rev() {
            let mut empty = 0;
            for file in 0u8..8 {
                match Square::from_coords(file, rank).and_then(|sq| self.piece_on(sq)) {
                    Some(piece) => {
                        if empty > 0 {
                            write!(f, "{empty}")?;
                            empty = 0;
                        }
                        write!(f, "{piece}")?;
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                write!(f, "{empty}")?;
            }
            if rank > 0 {
                f.write_str("/")?;
            }
        }

        write!(f, " {} {} ", self.side_to_move(), self.castling())?;
        match self.en_passant() {
            Some(sq) => write!(f, "{sq}")?,
            None => f.write_str("-")?,
        }
        write!(f, " {} {}", self.halfmove_clock(), self.fullmove_number())
    }
}
