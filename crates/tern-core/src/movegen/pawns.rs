//! Pawn pushes, captures, promotions and en passant.

use crate::attacks::pawn_attacks;
use crate::bitboard::Bitboard;
use crate::chess_move::{Move, MoveFlag, PromotionPiece};
use crate::piece::{Color, PieceKind};
use crate::position::Position;
use crate::square::Square;

use super::MoveList;
use super::masks::Masks;
use super::mode::GenMode;

pub(super) fn gen_pawns<M: GenMode>(pos: &Position, masks: &Masks, list: &mut MoveList) {
    let us = pos.side_to_move();
    let enemy = pos.side(!us);
    let empty = !pos.occupied();
    let (promo_rank, double_rank) = match us {
        Color::White => (Bitboard::RANK_8, Bitboard::RANK_4),
        Color::Black => (Bitboard::RANK_1, Bitboard::RANK_5),
    };

    for src in pos.colored(PieceKind::Pawn, us) {
        let allowed = masks.check & masks.pin(src);

        for dst in pawn_attacks(us, src) & enemy & allowed {
            push(list, src, dst, true, promo_rank);
        }

        if M::CAPTURES_ONLY {
            continue;
        }
        if let Some(one) = src.forward(us)
            && empty.contains(one)
        {
            if allowed.contains(one) {
                push(list, src, one, false, promo_rank);
            }
            if let Some(two) = one.forward(us)
                && (double_rank & empty & allowed).contains(two)
            {
                list.push(Move::new(src, two));
            }
        }
    }

    // Masks cannot see the two pawns leaving one rank at once, so en passant
    // is tried on a copy and kept only if our king is safe afterwards.
    if let Some(ep) = pos.en_passant() {
        for src in pawn_attacks(!us, ep) & pos.colored(PieceKind::Pawn, us) {
            let mv = Move::with_flag(src, ep, MoveFlag::EnPassant);
            if !pos.with_move(mv).is_in_check(us) {
                list.push(mv);
            }
        }
    }
}

fn push(list: &mut MoveList, src: Square, dst: Square, capture: bool, promo_rank: Bitboard) {
    if promo_rank.contains(dst) {
        for promo in PromotionPiece::ALL {
            list.push(Move::with_flag(src, dst, MoveFlag::promotion(promo, capture)));
        }
    } else {
        let flag = if capture { MoveFlag::Capture } else { MoveFlag::Quiet };
        list.push(Move::with_flag(src, dst, flag));
    }
}
