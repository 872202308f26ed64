//! Zobrist keys. Every key is derived at compile time from one fixed seed, so
//! hashes are identical across runs and builds.

use crate::castling::CastlingRights;
use crate::piece::{Color, Piece};
use crate::position::Position;
use crate::square::Square;

const PIECE_SQUARE_KEYS: usize = 12 * 64;
const KEY_COUNT: usize = PIECE_SQUARE_KEYS + 1 + 4 + 8;

const SEED: u64 = 0x7465_726e_2d6b_6579; // "tern-key"

/// Xorshift64* step. Returns (value, next_state).
const fn next_key(mut state: u64) -> (u64, u64) {
    state ^= state >> 12;
    state ^= state << 25;
    state ^= state >> 27;
    (state.wrapping_mul(0x2545_f491_4f6c_dd1d), state)
}

static KEYS: [u64; KEY_COUNT] = {
    let mut keys = [0u64; KEY_COUNT];
    let mut state = SEED;
    let mut i = 0;
    while i < KEY_COUNT {
        let (value, next) = next_key(state);
        keys[i] = value;
        state = next;
        i += 1;
    }
    keys
};

/// Key for `piece` standing on square index `sq`.
#[inline]
pub(crate) fn piece_square(piece: Piece, sq: usize) -> u64 {
    KEYS[piece.index() * 64 + sq]
}

/// XORed in while black is to move.
#[inline]
pub(crate) fn side_to_move() -> u64 {
    KEYS[PIECE_SQUARE_KEYS]
}

/// One key per castling right, indexed by [`CastlingRights::slot`](crate::CastlingRights::slot).
#[inline]
pub(crate) fn castling(slot: usize) -> u64 {
    KEYS[PIECE_SQUARE_KEYS + 1 + slot]
}

/// Keyed by the file of the en passant target square.
#[inline]
pub(crate) fn en_passant_file(file: u8) -> u64 {
    KEYS[PIECE_SQUARE_KEYS + 5 + file as usize]
}

/// Hash a position from nothing but its placement and state fields.
pub fn hash_from_scratch(pos: &Position) -> u64 {
    let mut hash = 0u64;

    for sq in Square::all() {
        if let Some(piece) = pos.piece_on(sq) {
            hash ^= piece_square(piece, sq.index());
        }
    }

    if pos.side_to_move() == Color::Black {
        hash ^= side_to_move();
    }

    for (color, side) in pos.castling().iter() {
        hash ^= castling(CastlingRights::slot(color, side));
    }

    if let Some(ep) = pos.en_passant() {
        hash ^= en_passant_file(ep.file());
    }

    hash
}
