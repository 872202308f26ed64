//! Search control: cooperative stop flag, node budget and time limits.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use super::SearchLimits;

/// Decides when a search should stop.
///
/// The search polls [`should_stop`](Self::should_stop) at every node; the
/// clock is only read every 2048 nodes. The stop flag is shared, so the
/// caller (or another worker) can end the search at any time by setting it.
#[derive(Debug)]
pub struct SearchControl {
    stopped: Arc<AtomicBool>,
    start: Instant,
    soft_limit: Option<Duration>,
    hard_limit: Option<Duration>,
    node_limit: Option<u64>,
}

impl SearchControl {
    /// No time pressure: only the stop flag ends the search.
    pub fn new_infinite(stopped: Arc<AtomicBool>) -> Self {
        Self {
            stopped,
            start: Instant::now(),
            soft_limit: None,
            hard_limit: None,
            node_limit: None,
        }
    }

    /// Time limits measured from now. Past `soft` no new iteration starts;
    /// at `hard` the running iteration is abandoned.
    pub fn new_timed(stopped: Arc<AtomicBool>, soft: Duration, hard: Duration) -> Self {
        Self {
            soft_limit: Some(soft),
            hard_limit: Some(hard),
            ..Self::new_infinite(stopped)
        }
    }

    /// Control derived from `limits`. A movetime grants half of itself as
    /// the soft limit.
    pub fn from_limits(stopped: Arc<AtomicBool>, limits: &SearchLimits) -> Self {
        let control = match limits.movetime {
            Some(time) => Self::new_timed(stopped, time / 2, time),
            None => Self::new_infinite(stopped),
        };
        match limits.nodes {
            Some(nodes) => control.with_node_limit(nodes),
            None => control,
        }
    }

    /// Stop once `nodes` nodes have been visited.
    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.node_limit = Some(nodes);
        self
    }

    /// Whether the search must unwind now. Trips the shared flag when a
    /// node or hard time limit is hit so later calls return early.
    pub fn should_stop(&self, nodes: u64) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return true;
        }

        if let Some(limit) = self.node_limit
            && nodes >= limit
        {
            self.stop();
            return true;
        }

        if nodes & 2047 != 0 {
            return false;
        }

        if let Some(hard) = self.hard_limit
            && self.elapsed() >= hard
        {
            self.stop();
            return true;
        }

        false
    }

    /// Checked between iterations: true once the soft limit has passed or
    /// the search was stopped.
    pub fn should_stop_iterating(&self) -> bool {
        if self.is_stopped() {
            return true;
        }
        self.soft_limit.is_some_and(|soft| self.elapsed() >= soft)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    /// Time since the control was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
