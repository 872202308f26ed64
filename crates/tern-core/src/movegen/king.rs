//! King steps and castling.

use crate::attacks::king_attacks;
use crate::castling::{CastleSide, castle_path};
use crate::chess_move::{Move, MoveFlag};
use crate::piece::{Piece, PieceKind};
use crate::position::Position;

use super::MoveList;
use super::masks::Masks;
use super::mode::GenMode;

pub(super) fn gen_king<M: GenMode>(pos: &Position, masks: &Masks, list: &mut MoveList) {
    let us = pos.side_to_move();
    let enemy = pos.side(!us);
    let targets = if M::CAPTURES_ONLY { enemy } else { !pos.side(us) };

    for dst in king_attacks(masks.king) & targets & !masks.attacked {
        let flag = if enemy.contains(dst) { MoveFlag::Capture } else { MoveFlag::Quiet };
        list.push(Move::with_flag(masks.king, dst, flag));
    }

    if M::CAPTURES_ONLY || masks.checkers.is_nonempty() {
        return;
    }

    for side in CastleSide::ALL {
        if !pos.castling().has(us, side) {
            continue;
        }
        let path = castle_path(us, side);
        let rook_home = pos.piece_on(path.rook_from) == Some(Piece::new(PieceKind::Rook, us));
        if masks.king != path.king_from
            || !rook_home
            || (path.empty & pos.occupied()).is_nonempty()
            || (path.safe & masks.attacked).is_nonempty()
        {
            continue;
        }
        let flag = match side {
            CastleSide::King => MoveFlag::KingCastle,
            CastleSide::Queen => MoveFlag::QueenCastle,
        };
        list.push(Move::with_flag(path.king_from, path.king_to, flag));
    }
}
