//! Killer moves and the history heuristic for quiet move ordering.

use tern_core::{Move, PieceKind, Square};

use super::negamax::MAX_PLY;

/// Two killer moves per ply: quiet moves that caused beta cutoffs.
pub struct KillerTable {
    slots: [[Move; 2]; MAX_PLY],
}

impl KillerTable {
    pub fn new() -> Self {
        Self {
            slots: [[Move::NULL; 2]; MAX_PLY],
        }
    }

    /// Store a killer move at the given ply.
    ///
    /// Shifts slot 0 to slot 1 if the new move differs from slot 0.
    pub fn store(&mut self, ply: usize, mv: Move) {
        let Some(slots) = self.slots.get_mut(ply) else {
            return;
        };
        if slots[0] != mv {
            slots[1] = slots[0];
            slots[0] = mv;
        }
    }

    /// Which slot holds `mv` at `ply`, if any.
    pub fn slot_of(&self, ply: usize, mv: Move) -> Option<usize> {
        self.slots.get(ply)?.iter().position(|&killer| killer == mv)
    }
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Maximum value for history scores.
const HISTORY_MAX: i32 = 16_384;

/// History table indexed by `[piece_kind][to_square]`. Quiet moves that
/// cause beta cutoffs earn `depth²`.
pub struct HistoryTable {
    table: [[i32; 64]; PieceKind::COUNT],
}

impl HistoryTable {
    pub fn new() -> Self {
        Self {
            table: [[0; 64]; PieceKind::COUNT],
        }
    }

    /// Reward a quiet move that caused a beta cutoff.
    pub fn update_good(&mut self, piece: PieceKind, to: Square, depth: u8) {
        let bonus = (depth as i32) * (depth as i32);
        let entry = &mut self.table[piece.index()][to.index()];
        *entry = (*entry + bonus).min(HISTORY_MAX);
    }

    pub fn score(&self, piece: PieceKind, to: Square) -> i32 {
        self.table[piece.index()][to.index()]
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn killer_store_and_check() {
        let mut kt = KillerTable::new();
        let mv1 = Move::new(Square::E2, Square::E4);
        let mv2 = Move::new(Square::D2, Square::D4);

        kt.store(5, mv1);
        assert_eq!(kt.slot_of(5, mv1), Some(0));
        assert_eq!(kt.slot_of(5, mv2), None);

        // mv1 shifts to the second slot
        kt.store(5, mv2);
        assert_eq!(kt.slot_of(5, mv2), Some(0));
        assert_eq!(kt.slot_of(5, mv1), Some(1));
    }

    #[test]
    fn killer_same_move_no_shift() {
        let mut kt = KillerTable::new();
        let mv1 = Move::new(Square::E2, Square::E4);
        let mv2 = Move::new(Square::D2, Square::D4);

        kt.store(0, mv1);
        kt.store(0, mv2);
        kt.store(0, mv2);
        assert_eq!(kt.slot_of(0, mv2), Some(0));
        assert_eq!(kt.slot_of(0, mv1), Some(1));
    }

    #[test]
    fn killer_plies_are_independent_and_bounded() {
        let mut kt = KillerTable::new();
        let mv = Move::new(Square::E2, Square::E4);
        kt.store(3, mv);
        assert_eq!(kt.slot_of(3, mv), Some(0));
        assert_eq!(kt.slot_of(4, mv), None);
        kt.store(MAX_PLY, mv);
        assert_eq!(kt.slot_of(MAX_PLY, mv), None);
    }

    #[test]
    fn history_rewards_depth_squared() {
        let mut ht = HistoryTable::new();
        assert_eq!(ht.score(PieceKind::Knight, Square::F3), 0);
        ht.update_good(PieceKind::Knight, Square::F3, 4);
        assert_eq!(ht.score(PieceKind::Knight, Square::F3), 16);
        assert_eq!(ht.score(PieceKind::Bishop, Square::F3), 0);
        assert_eq!(ht.score(PieceKind::Knight, Square::G3), 0);
    }

    #[test]
    fn history_clamped() {
        let mut ht = HistoryTable::new();
        for _ in 0..200 {
            ht.update_good(PieceKind::Pawn, Square::A1, 10);
        }
        assert_eq!(ht.score(PieceKind::Pawn, Square::A1), HISTORY_MAX);
    }
}
