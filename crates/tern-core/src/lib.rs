//! Chess rules for tern: board representation, attack tables, legal move
//! generation, static exchange evaluation and perft.

mod attacks;
mod bitboard;
mod castling;
mod chess_move;
mod error;
mod fen;
mod make_move;
mod movegen;
mod perft;
mod piece;
mod position;
mod see;
mod square;
mod zobrist;

pub use attacks::{
    attacks_for, between, bishop_attacks, king_attacks, knight_attacks, line, pawn_attacks, queen_attacks,
    rook_attacks,
};
pub use bitboard::Bitboard;
pub use castling::{CastlePath, CastleSide, CastlingRights, castle_path};
pub use chess_move::{Move, MoveFlag, PromotionPiece};
pub use error::{FenError, PositionError};
pub use fen::STARTING_FEN;
pub use movegen::{
    MAX_MOVES, MoveList, generate_captures, generate_legal_moves, generate_noisy_moves, gives_check,
};
pub use perft::{divide, perft};
pub use piece::{Color, Piece, PieceKind};
pub use position::{Position, PrettyPosition};
pub use see::see;
pub use square::Square;
pub use zobrist::hash_from_scratch;
