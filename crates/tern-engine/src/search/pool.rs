//! Parallel search over independent copies of the root.
//!
//! Every worker owns a [`Searcher`] with its own transposition table, search
//! stack and repetition table. Nothing is shared but the stop flag; results
//! are compared only after every worker has returned.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::thread;

use tern_core::Position;
use tracing::{debug, warn};

use super::control::SearchControl;
use super::{SearchConfig, SearchLimits, SearchResult, Searcher};
use crate::error::ConfigError;
use crate::eval::Evaluator;

/// Stack size for worker threads; the recursion keeps a move list per ply.
const WORKER_STACK_SIZE: usize = 16 * 1024 * 1024;

/// Search `root` with `config.threads` workers and return the aggregated
/// result: deepest completed iteration first, then best score, then lowest
/// worker index. Node counts are summed.
///
/// Worker 0 runs on the calling thread. Odd-numbered helpers start at depth 2
/// so that the copies diverge. Setting `stop` ends all workers.
pub fn search_parallel<E>(
    root: &Position,
    history: &[Position],
    limits: &SearchLimits,
    config: &SearchConfig,
    evaluator: E,
    stop: Arc<AtomicBool>,
) -> Result<SearchResult, ConfigError>
where
    E: Evaluator + Clone,
{
    config.validate()?;
    let worker = |id: usize| -> Result<SearchResult, ConfigError> {
        let mut searcher = Searcher::with_evaluator(config.clone(), evaluator.clone())?;
        searcher.set_first_depth(1 + (id % 2) as u8);
        let control = SearchControl::from_limits(Arc::clone(&stop), limits);
        let result = searcher.search_with(root, history, limits.depth, &control, |_| {});
        debug!(worker = id, depth = result.depth, score = result.score, nodes = result.nodes, "worker finished");
        Ok(result)
    };

    if config.threads == 1 {
        return worker(0);
    }

    let mut results: Vec<(usize, SearchResult)> = Vec::with_capacity(config.threads);
    thread::scope(|s| -> Result<(), ConfigError> {
        let mut handles = Vec::with_capacity(config.threads - 1);
        for id in 1..config.threads {
            let spawned = thread::Builder::new()
                .name(format!("search-{id}"))
                .stack_size(WORKER_STACK_SIZE)
                .spawn_scoped(s, move || worker(id));
            match spawned {
                Ok(handle) => handles.push((id, handle)),
                Err(err) => warn!(worker = id, %err, "could not spawn search worker"),
            }
        }

        results.push((0, worker(0)?));
        for (id, handle) in handles {
            match handle.join() {
                Ok(result) => results.push((id, result?)),
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
        Ok(())
    })?;

    Ok(aggregate(results))
}

fn aggregate(results: Vec<(usize, SearchResult)>) -> SearchResult {
    let nodes = results.iter().map(|(_, result)| result.nodes).sum();
    let mut best: Option<(usize, SearchResult)> = None;
    for (id, result) in results {
        let better = match &best {
            None => true,
            Some((_, current)) => (result.depth, result.score) > (current.depth, current.score),
        };
        if better {
            best = Some((id, result));
        }
    }
    match best {
        Some((_, mut result)) => {
            result.nodes = nodes;
            result
        }
        None => SearchResult {
            best_move: tern_core::Move::NULL,
            score: 0,
            pv: Vec::new(),
            nodes,
            depth: 0,
        },
    }
}
