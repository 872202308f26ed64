//! Compile-time generation mode dispatch.

pub(crate) trait GenMode {
    /// Only moves that capture; no pushes, no castling.
    const CAPTURES_ONLY: bool;
}

pub(crate) struct AllMoves;
impl GenMode for AllMoves {
    const CAPTURES_ONLY: bool = false;
}

pub(crate) struct CapturesOnly;
impl GenMode for CapturesOnly {
    const CAPTURES_ONLY: bool = true;
}
