//! Search and evaluation for tern.

mod error;
pub mod eval;
pub mod search;

pub use error::ConfigError;
pub use eval::{Evaluator, MaterialEvaluator};
pub use search::control::SearchControl;
pub use search::negamax::{INF, MATE_SCORE, MATE_THRESHOLD, MAX_PLY};
pub use search::pool::search_parallel;
pub use search::{MAX_DEPTH, SearchConfig, SearchLimits, SearchResult, Searcher};
