//! Search configuration errors.

/// Rejected [`SearchConfig`](crate::SearchConfig) values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("transposition table needs at least one entry")]
    ZeroTableCapacity,

    #[error("search needs at least one thread")]
    ZeroThreads,

    /// The quiescence limit plus the deepest main search must fit in the
    /// per-ply buffers.
    #[error("quiescence ply limit {limit} outside 0..={max}")]
    QsearchLimit {
        /// The rejected limit.
        limit: u8,
        /// Largest accepted limit.
        max: u8,
    },
}
