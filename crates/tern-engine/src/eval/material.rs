//! Material balance with a bishop-pair bonus.

use tern_core::{Color, PieceKind, Position};

use super::Evaluator;

/// Centipawn values indexed by [`PieceKind::index`]. The king carries no
/// material.
pub const PIECE_VALUES: [i32; PieceKind::COUNT] = [100, 320, 330, 500, 900, 0];

/// Awarded to a side holding two or more bishops.
pub const BISHOP_PAIR_BONUS: i32 = 50;

/// Counts material for both sides and returns the difference relative to
/// the side to move.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialEvaluator;

impl MaterialEvaluator {
    fn side_total(pos: &Position, color: Color) -> i32 {
        let mut total: i32 = PieceKind::ALL
            .into_iter()
            .map(|kind| PIECE_VALUES[kind.index()] * pos.colored(kind, color).count() as i32)
            .sum();
        if pos.colored(PieceKind::Bishop, color).has_several() {
            total += BISHOP_PAIR_BONUS;
        }
        total
    }
}

impl Evaluator for MaterialEvaluator {
    fn evaluate(&self, pos: &Position) -> i32 {
        let us = pos.side_to_move();
        Self::side_total(pos, us) - Self::side_total(pos, !us)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(fen: &str) -> i32 {
        MaterialEvaluator.evaluate(&fen.parse().unwrap())
    }

    #[test]
    fn starting_position_is_balanced() {
        assert_eq!(MaterialEvaluator.evaluate(&Position::starting_position()), 0);
    }

    #[test]
    fn missing_queen_counts_for_the_side_to_move() {
        let white = eval("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        let black = eval("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1");
        assert_eq!(white, 900);
        assert_eq!(black, -900);
    }

    #[test]
    fn bishop_pair_needs_two_bishops() {
        // White keeps both bishops, black has none.
        let score = eval("rn1qk1nr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_eq!(score, 2 * 330 + BISHOP_PAIR_BONUS);
        // One bishop each: no bonus either way.
        assert_eq!(eval("4kb2/8/8/8/8/8/8/2B1K3 w - - 0 1"), 0);
    }

    #[test]
    fn bare_kings_are_zero() {
        assert_eq!(eval("4k3/8/8/8/8/8/8/4K3 b - - 0 1"), 0);
    }
}
