//! Negamax alpha-beta search with quiescence.

use tern_core::{Move, MoveList, PieceKind, generate_legal_moves, generate_noisy_moves};

use crate::eval::Evaluator;
use crate::search::control::SearchControl;
use crate::search::heuristics::{HistoryTable, KillerTable};
use crate::search::ordering::{MovePicker, captured_value, is_qsearch_check, reduced_depth};
use crate::search::stack::SearchStack;
use crate::search::tt::{Bound, TranspositionTable, TtEntry, score_from_tt, score_to_tt};

/// Score representing an unreachable upper/lower bound.
pub const INF: i32 = 30_000;

/// Base score for checkmate (adjusted by ply for mate distance).
pub const MATE_SCORE: i32 = 29_000;

/// Scores above this threshold indicate a forced mate.
pub const MATE_THRESHOLD: i32 = 28_000;

/// Maximum search depth (in plies) for array sizing and recursion limits.
pub const MAX_PLY: usize = 128;

/// Margin added to a capture's gain before delta pruning discards it.
const DELTA_MARGIN: i32 = 200;

/// Extra swing allowed when promotions are available.
const PROMOTION_DELTA: i32 = 775;

/// Search state threaded through negamax calls.
pub(super) struct SearchContext<'a> {
    pub nodes: u64,
    pub tt: &'a mut TranspositionTable,
    pub pv: PvTable,
    pub control: &'a SearchControl,
    pub killers: KillerTable,
    pub history: HistoryTable,
    pub evaluator: &'a dyn Evaluator,
    pub draw_score: i32,
    pub qsearch_limit: u8,
}

/// Negamax alpha-beta search over the position on top of `stack`.
///
/// Returns the best score for the side to move; the principal variation is
/// collected into `ctx.pv`. Once the search is stopped the return value is
/// meaningless and callers discard it.
pub(super) fn negamax(stack: &mut SearchStack, depth: u8, mut alpha: i32, mut beta: i32, ctx: &mut SearchContext<'_>) -> i32 {
    let ply = stack.ply();
    ctx.pv.clear_ply(ply);
    ctx.nodes += 1;

    if ctx.control.should_stop(ctx.nodes) {
        return 0;
    }

    if ply > 0 && stack.is_repetition() {
        return ctx.draw_score;
    }

    let pos = *stack.current();
    if ply >= MAX_PLY - 1 {
        return ctx.evaluator.evaluate(&pos);
    }

    let original_alpha = alpha;
    let mut tt_move = Move::NULL;
    if let Some(entry) = ctx.tt.probe(pos.hash()) {
        tt_move = entry.best_move;
        // The root always searches so that it produces a move and a line.
        if ply > 0 && entry.depth >= depth {
            let score = score_from_tt(entry.score, ply);
            match entry.bound {
                Bound::Exact => return score,
                Bound::Lower => alpha = alpha.max(score),
                Bound::Upper => beta = beta.min(score),
            }
            if alpha >= beta {
                return score;
            }
        }
    }

    let mut moves = MoveList::new();
    generate_legal_moves(&pos, &mut moves);
    let in_check = pos.is_in_check(pos.side_to_move());
    if moves.is_empty() {
        return if in_check { -(MATE_SCORE - ply as i32) } else { ctx.draw_score };
    }

    if stack.is_fifty_move_draw() {
        return ctx.draw_score;
    }

    if depth == 0 {
        return qsearch(stack, alpha, beta, ctx.qsearch_limit, ctx);
    }

    let mut best_score = -INF;
    let mut best_move = Move::NULL;
    let mut picker = MovePicker::new(moves, &pos, tt_move, &ctx.killers, &ctx.history, ply);
    let full_depth = depth - 1;
    let mut index = 0;

    while let Some(mv) = picker.pick_next() {
        stack.push(mv);
        let score = if index == 0 {
            -negamax(stack, full_depth, -beta, -alpha, ctx)
        } else {
            // Zero window first; widen only if the move might raise alpha.
            let reduced = reduced_depth(mv, index, depth, in_check);
            let mut score = -negamax(stack, reduced, -alpha - 1, -alpha, ctx);
            if score > alpha && (reduced < full_depth || score < beta) && !ctx.control.is_stopped() {
                score = -negamax(stack, full_depth, -beta, -alpha, ctx);
            }
            score
        };
        stack.pop();
        index += 1;

        if ctx.control.is_stopped() {
            return 0;
        }

        if score > best_score {
            best_score = score;
            best_move = mv;
            if score > alpha {
                alpha = score;
                ctx.pv.update(ply, mv);
            }
        }

        if alpha >= beta {
            if mv.is_quiet() && !mv.is_castle() {
                ctx.killers.store(ply, mv);
                let piece = pos.piece_on(mv.source()).map_or(PieceKind::Pawn, |p| p.kind());
                ctx.history.update_good(piece, mv.dest(), depth);
            }
            break;
        }
    }

    let bound = if best_score <= original_alpha {
        Bound::Upper
    } else if best_score >= beta {
        Bound::Lower
    } else {
        Bound::Exact
    };
    ctx.tt.store(TtEntry {
        key: pos.hash(),
        depth,
        bound,
        score: score_to_tt(best_score, ply),
        best_move,
    });

    best_score
}

/// Quiescence search: resolve captures, promotions and checks before
/// trusting the static evaluation. In check every evasion is searched and
/// standing pat is not allowed. `remaining` plies are left before the
/// evaluation is returned as is.
pub(super) fn qsearch(stack: &mut SearchStack, mut alpha: i32, beta: i32, remaining: u8, ctx: &mut SearchContext<'_>) -> i32 {
    let ply = stack.ply();
    ctx.pv.clear_ply(ply);
    ctx.nodes += 1;

    if ctx.control.should_stop(ctx.nodes) {
        return 0;
    }

    if ply > 0 && stack.is_repetition() {
        return ctx.draw_score;
    }

    let pos = *stack.current();
    if ply >= MAX_PLY - 1 {
        return ctx.evaluator.evaluate(&pos);
    }

    let us = pos.side_to_move();
    if pos.is_in_check(us) {
        let mut moves = MoveList::new();
        generate_legal_moves(&pos, &mut moves);
        if moves.is_empty() {
            return -(MATE_SCORE - ply as i32);
        }
        if stack.is_fifty_move_draw() {
            return ctx.draw_score;
        }
        if remaining == 0 {
            return ctx.evaluator.evaluate(&pos);
        }

        let mut best = -INF;
        let mut picker = MovePicker::new(moves, &pos, Move::NULL, &ctx.killers, &ctx.history, ply);
        while let Some(mv) = picker.pick_next() {
            stack.push(mv);
            let score = -qsearch(stack, -beta, -alpha, remaining - 1, ctx);
            stack.pop();
            if ctx.control.is_stopped() {
                return 0;
            }
            if score > best {
                best = score;
                alpha = alpha.max(score);
            }
            if alpha >= beta {
                break;
            }
        }
        return best;
    }

    if stack.is_fifty_move_draw() {
        return ctx.draw_score;
    }

    let stand_pat = ctx.evaluator.evaluate(&pos);
    if remaining == 0 || stand_pat >= beta {
        return stand_pat;
    }

    let mut moves = MoveList::new();
    let n_checks = generate_noisy_moves(&pos, &mut moves);
    if moves.is_empty() {
        return stand_pat;
    }

    let promotions = moves.iter().any(|mv| mv.is_promotion());
    let big_delta = PieceKind::Queen.value() + if promotions { PROMOTION_DELTA } else { 0 };
    // Hopelessly behind: only checks can still matter.
    let checks_only = stand_pat < alpha - big_delta;

    alpha = alpha.max(stand_pat);
    let mut best = stand_pat;
    let mut picker = MovePicker::new_qsearch(moves, &pos, n_checks);

    while let Some(mv) = picker.pick_next() {
        let is_check = is_qsearch_check(mv);
        if checks_only && !is_check {
            break;
        }
        if !is_check && !promotions && stand_pat + captured_value(&pos, mv) + DELTA_MARGIN < alpha {
            continue;
        }

        stack.push(mv);
        let score = -qsearch(stack, -beta, -alpha, remaining - 1, ctx);
        stack.pop();

        if ctx.control.is_stopped() {
            return 0;
        }
        if score > best {
            best = score;
            alpha = alpha.max(score);
        }
        if alpha >= beta {
            break;
        }
    }

    best
}

/// Triangular PV table. Row `ply` holds the best line found from that ply.
pub struct PvTable {
    moves: Vec<[Move; MAX_PLY]>,
    len: [usize; MAX_PLY],
}

impl PvTable {
    pub fn new() -> Self {
        Self {
            moves: vec![[Move::NULL; MAX_PLY]; MAX_PLY],
            len: [0; MAX_PLY],
        }
    }

    /// Clear the PV line at `ply` (called at the top of each node).
    pub fn clear_ply(&mut self, ply: usize) {
        if ply < MAX_PLY {
            self.len[ply] = 0;
        }
    }

    /// Set `mv` as the best move at `ply`, followed by the line at `ply + 1`.
    pub fn update(&mut self, ply: usize, mv: Move) {
        if ply >= MAX_PLY {
            return;
        }

        self.moves[ply][0] = mv;

        let child_ply = ply + 1;
        if child_ply < MAX_PLY {
            let copy_len = self.len[child_ply].min(MAX_PLY - 1);
            let (top, bottom) = self.moves.split_at_mut(child_ply);
            top[ply][1..1 + copy_len].copy_from_slice(&bottom[0][..copy_len]);
            self.len[ply] = 1 + copy_len;
        } else {
            self.len[ply] = 1;
        }
    }

    /// The principal variation from the root.
    pub fn root_pv(&self) -> &[Move] {
        &self.moves[0][..self.len[0]]
    }
}

impl Default for PvTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    use tern_core::Position;

    use super::*;
    use crate::eval::MaterialEvaluator;

    fn run<R>(fen: &str, f: impl FnOnce(&mut SearchStack, &mut SearchContext<'_>) -> R) -> R {
        let pos: Position = fen.parse().unwrap();
        let control = SearchControl::new_infinite(Arc::new(AtomicBool::new(false)));
        let mut tt = TranspositionTable::new(1 << 12);
        let mut ctx = SearchContext {
            nodes: 0,
            tt: &mut tt,
            pv: PvTable::new(),
            control: &control,
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            evaluator: &MaterialEvaluator,
            draw_score: 0,
            qsearch_limit: 6,
        };
        let mut stack = SearchStack::new(pos, &[]);
        f(&mut stack, &mut ctx)
    }

    #[test]
    fn pv_update_copies_child_line() {
        let mut pv = PvTable::new();
        let a = Move::new(tern_core::Square::E2, tern_core::Square::E4);
        let b = Move::new(tern_core::Square::E7, tern_core::Square::E5);
        pv.update(1, b);
        pv.update(0, a);
        assert_eq!(pv.root_pv(), &[a, b]);
        pv.clear_ply(1);
        pv.update(0, b);
        assert_eq!(pv.root_pv(), &[b]);
    }

    #[test]
    fn qsearch_wins_hanging_queen() {
        // Rxd5 picks up the queen; standing pat would leave us at -400.
        let score = run("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1", |stack, ctx| {
            qsearch(stack, -INF, INF, 6, ctx)
        });
        assert_eq!(score, 500);
    }

    #[test]
    fn qsearch_declines_defended_pawn() {
        // Rxd6 loses the rook to cxd6, so it is not even generated.
        let score = run("7k/2p4p/3p4/8/8/8/8/K2R4 w - - 0 1", |stack, ctx| {
            qsearch(stack, -INF, INF, 6, ctx)
        });
        assert_eq!(score, 500 - 300);
    }

    #[test]
    fn qsearch_in_check_has_no_stand_pat() {
        let score = run("7k/6Q1/5K2/8/8/8/8/8 b - - 0 1", |stack, ctx| {
            qsearch(stack, -INF, INF, 6, ctx)
        });
        assert_eq!(score, -MATE_SCORE);
    }

    #[test]
    fn stack_is_balanced_after_search() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        run(fen, |stack, ctx| {
            let root = *stack.current();
            negamax(stack, 3, -INF, INF, ctx);
            assert_eq!(stack.ply(), 0);
            assert_eq!(stack.current(), &root);
            assert!(!ctx.pv.root_pv().is_empty());
            assert!(ctx.tt.probe(root.hash()).is_some());
        });
    }

    #[test]
    fn negamax_prefers_faster_mate() {
        // Mate in one with Ra8; deeper searches must not settle for a slower mate.
        let score = run("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", |stack, ctx| negamax(stack, 3, -INF, INF, ctx));
        assert_eq!(score, MATE_SCORE - 1);
    }
}
