//! Iterative-deepening search over negamax, plus its configuration.

pub mod control;
pub mod heuristics;
pub mod negamax;
pub mod ordering;
pub mod pool;
pub mod repetition;
pub mod stack;
pub mod tt;

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use tern_core::{Move, Position};
use tracing::{debug, info, warn};

use crate::error::ConfigError;
use crate::eval::{Evaluator, MaterialEvaluator};
use control::SearchControl;
use heuristics::{HistoryTable, KillerTable};
use negamax::{INF, MATE_SCORE, MATE_THRESHOLD, MAX_PLY, PvTable, SearchContext, negamax};
use ordering::MovePicker;
use stack::SearchStack;
use tt::TranspositionTable;

/// Deepest iteration a search will start.
pub const MAX_DEPTH: u8 = (MAX_PLY / 2) as u8;

/// Largest accepted quiescence ply limit.
pub const MAX_QSEARCH_PLY: u8 = 32;

/// hashfull (permille) above which a search logs a warning.
const HASHFULL_WARNING: usize = 900;

/// Searcher settings, fixed for the lifetime of a [`Searcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Transposition table entries per worker.
    pub tt_capacity: usize,
    /// Workers used by [`search_parallel`](pool::search_parallel).
    pub threads: usize,
    /// Plies of quiescence search below the main search horizon.
    pub qsearch_ply_limit: u8,
    /// Score of drawn positions for the side to move (contempt).
    pub draw_score: i32,
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tt_capacity == 0 {
            return Err(ConfigError::ZeroTableCapacity);
        }
        if self.threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        if self.qsearch_ply_limit > MAX_QSEARCH_PLY {
            return Err(ConfigError::QsearchLimit {
                limit: self.qsearch_ply_limit,
                max: MAX_QSEARCH_PLY,
            });
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            tt_capacity: 1 << 20,
            threads: 1,
            qsearch_ply_limit: 6,
            draw_score: 0,
        }
    }
}

/// What bounds one search: a depth, and optionally nodes or wall time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub depth: u8,
    pub nodes: Option<u64>,
    pub movetime: Option<Duration>,
}

impl SearchLimits {
    /// Search exactly to `depth` plies (capped at [`MAX_DEPTH`]).
    pub fn depth(depth: u8) -> Self {
        Self {
            depth: depth.min(MAX_DEPTH),
            ..Self::default()
        }
    }

    /// Search as deep as `time` allows.
    pub fn movetime(time: Duration) -> Self {
        Self {
            movetime: Some(time),
            ..Self::default()
        }
    }

    pub fn with_nodes(mut self, nodes: u64) -> Self {
        self.nodes = Some(nodes);
        self
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            depth: MAX_DEPTH,
            nodes: None,
            movetime: None,
        }
    }
}

/// Outcome of a search, taken from the deepest completed iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// [`Move::CHECKMATE`] or [`Move::STALEMATE`] when the root has no moves.
    pub best_move: Move,
    /// Centipawns for the side to move; beyond [`MATE_THRESHOLD`] for mates.
    pub score: i32,
    pub pv: Vec<Move>,
    pub nodes: u64,
    /// Zero if no iteration completed.
    pub depth: u8,
}

impl SearchResult {
    /// Plies to mate if the score is a mate score, negative when being mated.
    pub fn mate_in(&self) -> Option<i32> {
        if self.score > MATE_THRESHOLD {
            Some(MATE_SCORE - self.score)
        } else if self.score < -MATE_THRESHOLD {
            Some(-(MATE_SCORE + self.score))
        } else {
            None
        }
    }
}

fn format_pv(pv: &[Move]) -> String {
    pv.iter().map(|mv| mv.to_uci()).collect::<Vec<_>>().join(" ")
}

/// Iterative-deepening searcher. Owns its transposition table; killers and
/// history are rebuilt for every search.
pub struct Searcher<E = MaterialEvaluator> {
    config: SearchConfig,
    tt: TranspositionTable,
    evaluator: E,
    first_depth: u8,
}

impl Searcher<MaterialEvaluator> {
    pub fn new(config: SearchConfig) -> Result<Self, ConfigError> {
        Self::with_evaluator(config, MaterialEvaluator)
    }
}

impl<E: Evaluator> Searcher<E> {
    pub fn with_evaluator(config: SearchConfig, evaluator: E) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            tt: TranspositionTable::new(config.tt_capacity),
            config,
            evaluator,
            first_depth: 1,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Forget everything learned, keeping the table allocation. Call
    /// between games.
    pub fn clear(&mut self) {
        self.tt.clear();
    }

    /// Transposition table occupancy in permille.
    pub fn hashfull(&self) -> usize {
        self.tt.hashfull()
    }

    /// Start iterative deepening at `depth` instead of 1.
    pub(crate) fn set_first_depth(&mut self, depth: u8) {
        self.first_depth = depth.max(1);
    }

    /// Search `root` with no game history under `limits`.
    pub fn search(&mut self, root: &Position, limits: &SearchLimits) -> SearchResult {
        let control = SearchControl::from_limits(Arc::new(AtomicBool::new(false)), limits);
        self.search_with(root, &[], limits.depth, &control, |_| {})
    }

    /// Iterative deepening to `max_depth`. `history` holds the game
    /// positions before `root`, oldest first, for repetition detection.
    /// Time, node and stop requests come through `control`; `on_iter` sees
    /// every completed iteration.
    pub fn search_with<F>(
        &mut self,
        root: &Position,
        history: &[Position],
        max_depth: u8,
        control: &SearchControl,
        mut on_iter: F,
    ) -> SearchResult
    where
        F: FnMut(&SearchResult),
    {
        let root_moves = root.legal_moves();
        if root_moves.is_empty() {
            let mated = root.is_in_check(root.side_to_move());
            warn!(fen = %root, mated, "search requested with no legal moves");
            return SearchResult {
                best_move: if mated { Move::CHECKMATE } else { Move::STALEMATE },
                score: if mated { -MATE_SCORE } else { self.config.draw_score },
                pv: Vec::new(),
                nodes: 0,
                depth: 0,
            };
        }

        let mut ctx = SearchContext {
            nodes: 0,
            tt: &mut self.tt,
            pv: PvTable::new(),
            control,
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            evaluator: &self.evaluator,
            draw_score: self.config.draw_score,
            qsearch_limit: self.config.qsearch_ply_limit,
        };
        let mut stack = SearchStack::new(*root, history);
        let max_depth = max_depth.clamp(1, MAX_DEPTH);
        let first_depth = self.first_depth.min(max_depth);

        let mut completed: Option<SearchResult> = None;
        for depth in first_depth..=max_depth {
            if completed.is_some() && control.should_stop_iterating() {
                break;
            }

            let score = negamax(&mut stack, depth, -INF, INF, &mut ctx);
            if control.is_stopped() {
                break;
            }

            let pv = ctx.pv.root_pv().to_vec();
            let Some(&best_move) = pv.first() else {
                break;
            };
            debug!(depth, score, nodes = ctx.nodes, pv = %format_pv(&pv), "iteration complete");
            let result = SearchResult {
                best_move,
                score,
                pv,
                nodes: ctx.nodes,
                depth,
            };
            on_iter(&result);
            completed = Some(result);

            // A mate found within the searched depth cannot get shorter.
            if score.abs() > MATE_THRESHOLD && MATE_SCORE - score.abs() <= depth as i32 {
                break;
            }
        }

        let nodes = ctx.nodes;
        let mut result = match completed {
            Some(result) => result,
            None => {
                // Nothing finished: fall back to the best-ordered root move.
                let tt_move = ctx.tt.probe(root.hash()).map_or(Move::NULL, |entry| entry.best_move);
                let mut picker = MovePicker::new(root_moves, root, tt_move, &ctx.killers, &ctx.history, 0);
                let best_move = picker.pick_next().unwrap_or(Move::NULL);
                warn!(best = %best_move, "search stopped before the first iteration completed");
                SearchResult {
                    best_move,
                    score: ctx.evaluator.evaluate(root),
                    pv: vec![best_move],
                    nodes,
                    depth: 0,
                }
            }
        };
        result.nodes = nodes;

        let hashfull = ctx.tt.hashfull();
        if hashfull > HASHFULL_WARNING {
            warn!(hashfull, "transposition table nearly full");
        }
        info!(
            depth = result.depth,
            score = result.score,
            nodes = result.nodes,
            best = %result.best_move,
            elapsed_ms = control.elapsed().as_millis() as u64,
            "search finished"
        );
        result
    }
}

impl<E> std::fmt::Debug for Searcher<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Searcher")
            .field("config", &self.config)
            .field("tt", &self.tt)
            .finish()
    }
}
