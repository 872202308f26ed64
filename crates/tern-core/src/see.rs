//! Static exchange evaluation.
//!
//! Plays out the capture sequence on one square, each side recapturing with
//! its least valuable attacker, and scores the result for the side to move.

use crate::bitboard::Bitboard;
use crate::chess_move::Move;
use crate::piece::PieceKind;
use crate::position::Position;
use crate::square::Square;

const MAX_EXCHANGE: usize = 32;

/// Material balance of the exchange `mv` starts, from the mover's view.
///
/// Sliders hidden behind a capturer join as it leaves the board. The king
/// only captures last: if the other side still has an attacker the king
/// stays put. The sequence is cut short once neither standing pat nor
/// capturing can improve the side to capture.
pub fn see(pos: &Position, mv: Move) -> i32 {
    let from = mv.source();
    let to = mv.dest();
    let Some(mover) = pos.piece_on(from) else {
        return 0;
    };
    let us = mover.color();

    let mut occupied = pos.occupied().without(from);
    let mut gain = [0i32; MAX_EXCHANGE];

    gain[0] = if mv.is_en_passant() {
        if let Some(victim) = to.backward(us) {
            occupied = occupied.without(victim);
        }
        PieceKind::Pawn.value()
    } else {
        pos.piece_on(to).map_or(0, |victim| victim.kind().value())
    };

    let mut attacker_value = match mv.promotion_piece() {
        Some(promo) => {
            let value = promo.to_piece_kind().value();
            gain[0] += value - PieceKind::Pawn.value();
            value
        }
        None => mover.kind().value(),
    };

    let mut side = us;
    let mut depth = 0;
    loop {
        depth += 1;
        gain[depth] = attacker_value - gain[depth - 1];
        if (-gain[depth - 1]).max(gain[depth]) < 0 {
            break;
        }

        side = !side;
        let attackers = pos.attackers_to(to, occupied) & occupied;
        let ours = attackers & pos.side(side);
        let Some((sq, kind)) = least_valuable(pos, ours) else {
            break;
        };
        if kind == PieceKind::King && (attackers & pos.side(!side)).is_nonempty() {
            break;
        }

        occupied = occupied.without(sq);
        attacker_value = kind.value();
        if depth + 1 >= MAX_EXCHANGE {
            break;
        }
    }

    // The last store is speculative: nobody was left to make it real.
    while depth > 1 {
        depth -= 1;
        gain[depth - 1] = -(-gain[depth - 1]).max(gain[depth]);
    }
    gain[0]
}

fn least_valuable(pos: &Position, attackers: Bitboard) -> Option<(Square, PieceKind)> {
    PieceKind::ALL
        .into_iter()
        .find_map(|kind| (attackers & pos.pieces(kind)).lsb().map(|sq| (sq, kind)))
}
