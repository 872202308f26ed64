//! Perft: leaf counts of the legal move tree, the standard check on move
//! generation and make-move.

use tracing::debug;

use crate::movegen::{MoveList, generate_legal_moves};
use crate::position::Position;

/// Leaf nodes `depth` plies below `pos`. The last ply is bulk-counted from
/// the move list without being played.
pub fn perft(pos: &Position, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut moves = MoveList::new();
    generate_legal_moves(pos, &mut moves);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for &mv in &moves {
        // Play on the live position and restore the snapshot afterwards.
        let mut child = *pos;
        child.make_move(mv);
        nodes += perft(&child, depth - 1);
    }
    nodes
}

/// Per-root-move perft, sorted by move text.
pub fn divide(pos: &Position, depth: usize) -> Vec<(String, u64)> {
    let mut results: Vec<(String, u64)> = pos
        .legal_moves()
        .iter()
        .map(|&mv| (mv.to_uci(), perft(&pos.with_move(mv), depth.saturating_sub(1))))
        .collect();
    results.sort_unstable_by(|a, b| a.0.cmp(&b.0));
    debug!(depth, moves = results.len(), "divide");
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
    const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
    const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";

    fn check(fen: &str, expected: &[u64]) {
        let pos: Position = fen.parse().unwrap();
        for (depth, &nodes) in expected.iter().enumerate() {
            assert_eq!(perft(&pos, depth + 1), nodes, "{fen} depth {}", depth + 1);
        }
    }

    #[test]
    fn depth_zero_is_one() {
        assert_eq!(perft(&Position::starting_position(), 0), 1);
    }

    #[test]
    fn starting_position() {
        check(crate::fen::STARTING_FEN, &[20, 400, 8_902, 197_281]);
    }

    #[test]
    fn kiwipete() {
        check(KIWIPETE, &[48, 2_039, 97_862]);
    }

    #[test]
    fn position_3() {
        check(POSITION_3, &[14, 191, 2_812, 43_238]);
    }

    #[test]
    fn position_4() {
        check(POSITION_4, &[6, 264, 9_467, 422_333]);
    }

    #[test]
    fn position_5() {
        check(POSITION_5, &[44, 1_486, 62_379]);
    }

    #[test]
    #[ignore = "slow"]
    fn deep() {
        check(crate::fen::STARTING_FEN, &[20, 400, 8_902, 197_281, 4_865_609]);
        check(KIWIPETE, &[48, 2_039, 97_862, 4_085_603]);
        check(POSITION_5, &[44, 1_486, 62_379, 2_103_487]);
    }

    #[test]
    fn divide_sums_to_perft() {
        let pos: Position = KIWIPETE.parse().unwrap();
        let split = divide(&pos, 2);
        assert_eq!(split.len(), 48);
        assert_eq!(split.iter().map(|(_, n)| n).sum::<u64>(), 2_039);
        assert!(split.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn divide_depth_one_counts_each_move_once() {
        let split = divide(&Position::starting_position(), 1);
        assert_eq!(split.len(), 20);
        assert!(split.iter().all(|(_, n)| *n == 1));
    }
}
