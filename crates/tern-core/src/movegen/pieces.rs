//! Knight, bishop, rook and queen moves.

use crate::attacks::attacks_for;
use crate::chess_move::{Move, MoveFlag};
use crate::piece::PieceKind;
use crate::position::Position;

use super::MoveList;
use super::masks::Masks;
use super::mode::GenMode;

const KINDS: [PieceKind; 4] = [PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen];

pub(super) fn gen_pieces<M: GenMode>(pos: &Position, masks: &Masks, list: &mut MoveList) {
    let us = pos.side_to_move();
    let enemy = pos.side(!us);
    let targets = if M::CAPTURES_ONLY { enemy } else { !pos.side(us) };
    let occupied = pos.occupied();

    for kind in KINDS {
        for src in pos.colored(kind, us) {
            // A pinned knight gets an empty mask: no knight move stays on a line.
            let dests = attacks_for(kind, src, occupied, us) & targets & masks.check & masks.pin(src);
            for dst in dests {
                let flag = if enemy.contains(dst) { MoveFlag::Capture } else { MoveFlag::Quiet };
                list.push(Move::with_flag(src, dst, flag));
            }
        }
    }
}
