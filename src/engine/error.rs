//! Failures the pipeline can report. Everything else in the engine is total.

use thiserror::Error;

/// Locking a landed block failed; indicates a landing miscalculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LockError {
    #[error("cell index {index} is outside the board ({len} cells)")]
    OutOfBounds { index: usize, len: usize },
    #[error("cell index {index} is already occupied")]
    CellOccupied { index: usize },
}

/// No spawn-ring cell is free. Expected; ends or resets the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpawnError {
    #[error("board full: no free sector on the spawn ring")]
    BoardFull,
}
