//! Move ordering: hash move, promotions, winning captures, checks, killers
//! and history, with SEE separating good captures from losing ones.

use std::sync::OnceLock;

use tern_core::{MAX_MOVES, Move, MoveList, PieceKind, Position, gives_check, see};

use super::heuristics::{HistoryTable, KillerTable};

// Score bands, highest first. Quiet moves score their history value, which
// stays below `KILLER_SCORE`.
const TT_MOVE_SCORE: i32 = 2_000_000;
const PROMOTION_SCORE: i32 = 1_000_000;
const WINNING_CAPTURE_SCORE: i32 = 500_000;
const CHECK_BONUS: i32 = 200_000;
const GOOD_CAPTURE_SCORE: i32 = 100_000;
const KILLER_SCORE: i32 = 90_000;
const CASTLE_SCORE: i32 = 100;
const LOSING_CAPTURE_SCORE: i32 = -100_000;

/// Quiescence moves that give check score just below this.
const QS_CHECK_SCORE: i32 = 3_000_000;

/// Whether a move yielded by [`MovePicker::new_qsearch`] gives check.
pub fn is_qsearch_check(mv: Move) -> bool {
    mv.score() > QS_CHECK_SCORE - MAX_MOVES as i32
}

/// Value of the piece `mv` removes, en passant included.
pub fn captured_value(pos: &Position, mv: Move) -> i32 {
    if mv.is_en_passant() {
        return PieceKind::Pawn.value();
    }
    if !mv.is_capture() {
        return 0;
    }
    pos.piece_on(mv.dest()).map_or(0, |victim| victim.kind().value())
}

fn capture_score(pos: &Position, mv: Move) -> i32 {
    let victim = captured_value(pos, mv);
    let attacker = pos.piece_on(mv.source()).map_or(0, |piece| piece.kind().value());
    if victim > attacker {
        return WINNING_CAPTURE_SCORE + victim - attacker;
    }
    let exchange = see(pos, mv);
    if exchange >= 0 {
        GOOD_CAPTURE_SCORE + exchange
    } else {
        LOSING_CAPTURE_SCORE + exchange
    }
}

/// Ordering score for the main search.
pub fn score_move(pos: &Position, mv: Move, killers: &KillerTable, history: &HistoryTable, ply: usize) -> i32 {
    let mut score = if let Some(promo) = mv.promotion_piece() {
        PROMOTION_SCORE + promo.to_piece_kind().value() + captured_value(pos, mv)
    } else if mv.is_capture() {
        capture_score(pos, mv)
    } else if let Some(slot) = killers.slot_of(ply, mv) {
        KILLER_SCORE - 1_000 * slot as i32
    } else {
        let piece = pos.piece_on(mv.source()).map_or(PieceKind::Pawn, |p| p.kind());
        let quiet = history.score(piece, mv.dest());
        if mv.is_castle() { CASTLE_SCORE + quiet } else { quiet }
    };
    if score < WINNING_CAPTURE_SCORE && gives_check(pos, mv) {
        score += CHECK_BONUS;
    }
    score
}

/// Ordering score for quiescence moves. The first `n_checks` moves of a
/// noisy list give check and keep their lead.
fn score_noisy(pos: &Position, mv: Move, index: usize, n_checks: usize) -> i32 {
    if index < n_checks {
        return QS_CHECK_SCORE - index as i32;
    }
    match mv.promotion_piece() {
        Some(promo) => PROMOTION_SCORE + promo.to_piece_kind().value() + captured_value(pos, mv),
        None => capture_score(pos, mv),
    }
}

// ── LMR table ───────────────────────────────────────────────────────────────

/// Reductions in 1024ths of a ply, indexed by `[move_index][depth]`.
static LMR_TABLE: OnceLock<[[i32; 64]; 64]> = OnceLock::new();

fn lmr_table() -> &'static [[i32; 64]; 64] {
    LMR_TABLE.get_or_init(|| {
        let mut t = [[0i32; 64]; 64];
        for (i, row) in t.iter_mut().enumerate().skip(1) {
            for (d, cell) in row.iter_mut().enumerate().skip(1) {
                *cell = ((0.76 + (i as f64).ln() * (d as f64).ln() / 2.32) * 1024.0) as i32;
            }
        }
        t
    })
}

/// LMR reduction for the given move index and depth, in 1024ths of a ply.
pub fn lmr_reduction(move_index: usize, depth: usize) -> i32 {
    lmr_table()[move_index.min(63)][depth.min(63)]
}

/// Depth for a non-first move at a node of `depth`. Late moves are reduced,
/// more so the deeper the search and the worse their ordering score. Quiet
/// moves without history lose an extra ply; losing captures lose one more
/// plus a ply per `LOSING_SHED_PER_PLY` of material given up. Winning and
/// even captures, promotions, checks, killers and check evasions get the
/// full `depth - 1`.
pub fn reduced_depth(mv: Move, index: usize, depth: u8, in_check: bool) -> u8 {
    let full = depth.saturating_sub(1);
    if depth < 3 || index < 3 || in_check || mv.score() >= KILLER_SCORE - 1_000 {
        return full;
    }
    let score = mv.score();
    let mut plies = lmr_reduction(index, depth as usize) / 1024;
    if score <= 0 {
        plies += 1;
    }
    if score < 0 {
        let shed = (LOSING_CAPTURE_SCORE - score).max(0);
        plies += 1 + shed / LOSING_SHED_PER_PLY;
    }
    full.saturating_sub(plies.clamp(0, full as i32 - 1) as u8)
}

/// Material a losing capture gives up per extra ply of reduction.
const LOSING_SHED_PER_PLY: i32 = 400;

// ── Move picker ─────────────────────────────────────────────────────────────

/// Incremental selection-sort picker. Each move's ordering score is kept on
/// the move itself, so the caller can read it back from what
/// [`pick_next`](Self::pick_next) yields.
pub struct MovePicker {
    moves: MoveList,
    cursor: usize,
}

impl MovePicker {
    /// Picker over all legal moves of a main-search node. `tt_move` goes
    /// first when present.
    pub fn new(
        mut moves: MoveList,
        pos: &Position,
        tt_move: Move,
        killers: &KillerTable,
        history: &HistoryTable,
        ply: usize,
    ) -> Self {
        for mv in moves.as_mut_slice() {
            let score = if *mv == tt_move {
                TT_MOVE_SCORE
            } else {
                score_move(pos, *mv, killers, history, ply)
            };
            mv.set_score(score);
        }
        Self { moves, cursor: 0 }
    }

    /// Picker over a noisy move list whose first `n_checks` entries give
    /// check.
    pub fn new_qsearch(mut moves: MoveList, pos: &Position, n_checks: usize) -> Self {
        for (index, mv) in moves.as_mut_slice().iter_mut().enumerate() {
            mv.set_score(score_noisy(pos, *mv, index, n_checks));
        }
        Self { moves, cursor: 0 }
    }

    /// The next highest-scored move.
    pub fn pick_next(&mut self) -> Option<Move> {
        let remaining = self.moves.as_mut_slice().get_mut(self.cursor..)?;
        let (best, _) = remaining
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|(_, mv)| mv.score())?;
        remaining.swap(0, best);
        let mv = remaining[0];
        self.cursor += 1;
        Some(mv)
    }
}
