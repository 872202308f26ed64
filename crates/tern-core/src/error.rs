//! Error types for FEN import and position validation.

use thiserror::Error;

/// Errors raised while parsing a FEN string. A failed parse never yields a
/// partially built position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("expected 4 to 6 FEN fields, found {found}")]
    WrongFieldCount { found: usize },

    #[error("expected 8 ranks in piece placement, found {found}")]
    WrongRankCount { found: usize },

    /// `rank_index` counts from the top of the FEN (0 = rank 8).
    #[error("rank {rank_index} describes {length} squares, expected 8")]
    BadRankLength { rank_index: usize, length: usize },

    #[error("invalid piece character: '{character}'")]
    InvalidPieceChar { character: char },

    #[error("invalid side to move: \"{found}\"")]
    InvalidColor { found: String },

    #[error("invalid castling character: '{character}'")]
    InvalidCastlingChar { character: char },

    /// Either not a square, or not a square a pawn could just have skipped.
    #[error("invalid en passant square: \"{found}\"")]
    InvalidEnPassant { found: String },

    #[error("invalid {field}: \"{found}\"")]
    InvalidMoveCounter { field: &'static str, found: String },

    #[error("invalid position: {0}")]
    InvalidPosition(#[from] PositionError),
}

/// Structural problems in an otherwise well-formed placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("{color} has {count} kings, expected 1")]
    InvalidKingCount { color: &'static str, count: u32 },

    #[error("pawns on the first or eighth rank")]
    PawnsOnBackRank,

    #[error("side not to move is in check")]
    OpponentInCheck,

    #[error("piece bitboards overlap or disagree with the mailbox")]
    Inconsistent,
}
