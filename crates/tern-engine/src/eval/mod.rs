//! Static evaluation consumed by the search.

mod material;

use tern_core::Position;

pub use self::material::{BISHOP_PAIR_BONUS, MaterialEvaluator, PIECE_VALUES};

/// Scores a position in centipawns from the side to move's point of view.
///
/// Implementations must be deterministic: the search relies on the same
/// position always getting the same score.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, pos: &Position) -> i32;
}

impl<E: Evaluator + ?Sized> Evaluator for &E {
    fn evaluate(&self, pos: &Position) -> i32 {
        (**self).evaluate(pos)
    }
}
