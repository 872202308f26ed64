//! The game line a search walks: prior game positions followed by the moves
//! played inside the search.

use tern_core::{Move, PieceKind, Position};

use super::repetition::RepetitionTable;

/// Halfmove clock value at which the fifty-move rule draws the game.
pub const FIFTY_MOVE_PLIES: u16 = 100;

/// A position on the line and the move played from it.
#[derive(Debug, Clone, Copy)]
struct Frame {
    position: Position,
    mv: Move,
}

impl Frame {
    /// Whether the move out of this frame was a capture or pawn move, so no
    /// earlier position can recur after it. Earlier game positions carry no
    /// move and never stop the scan.
    fn is_irreversible(&self) -> bool {
        if self.mv.is_null() {
            return false;
        }
        self.mv.is_capture() || self.position.piece_on(self.mv.source()).is_some_and(|p| p.kind() == PieceKind::Pawn)
    }
}

/// Owns the live search position. [`push`](Self::push) plays a move and
/// keeps a snapshot, [`pop`](Self::pop) restores it.
#[derive(Debug)]
pub struct SearchStack {
    frames: Vec<Frame>,
    current: Position,
    history_len: usize,
    repetitions: RepetitionTable,
}

impl SearchStack {
    /// A stack rooted at `root`. `history` lists earlier game positions,
    /// oldest first, not including `root`.
    pub fn new(root: Position, history: &[Position]) -> Self {
        let mut repetitions = RepetitionTable::with_capacity(history.len() + 256);
        let mut frames = Vec::with_capacity(history.len() + 256);
        for &position in history {
            repetitions.increment(position.hash());
            frames.push(Frame { position, mv: Move::NULL });
        }
        repetitions.increment(root.hash());
        Self {
            frames,
            current: root,
            history_len: history.len(),
            repetitions,
        }
    }

    pub fn current(&self) -> &Position {
        &self.current
    }

    /// Plies played since the root.
    pub fn ply(&self) -> usize {
        self.frames.len() - self.history_len
    }

    pub fn push(&mut self, mv: Move) {
        self.frames.push(Frame { position: self.current, mv });
        self.current.make_move(mv);
        self.repetitions.increment(self.current.hash());
    }

    /// Undo the last [`push`](Self::push). Does nothing at the root.
    pub fn pop(&mut self) {
        if self.ply() == 0 {
            return;
        }
        if let Some(frame) = self.frames.pop() {
            self.repetitions.decrement(self.current.hash());
            self.current = frame.position;
        }
    }

    /// Threefold repetition: the current position has occurred at least
    /// twice before on the line. The hash count filters; the backward scan
    /// confirms with full comparisons and stops at the last capture or pawn
    /// move played in the search.
    pub fn is_repetition(&self) -> bool {
        if self.repetitions.count(self.current.hash()) < 3 {
            return false;
        }
        let mut earlier = 0;
        for frame in self.frames.iter().rev() {
            if frame.is_irreversible() {
                break;
            }
            if frame.position.same_position(&self.current) {
                earlier += 1;
            }
        }
        earlier + 1 >= 3
    }

    pub fn is_fifty_move_draw(&self) -> bool {
        self.current.halfmove_clock() >= FIFTY_MOVE_PLIES
    }
}
