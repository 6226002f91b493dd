//! Commit a landed block into the board.

use super::error::LockError;
use super::grid::{Board, EMPTY};

/// Write `color` at `index`. Fails if the index is off the board or the cell
/// is taken; on success no other cell changes.
pub fn lock_block(board: &mut Board, index: usize, color: u8) -> Result<(), LockError> {
    let len = board.cell_count();
    match board.get(index) {
        None => Err(LockError::OutOfBounds { index, len }),
        Some(cell) if cell != EMPTY => Err(LockError::CellOccupied { index }),
        Some(_) => {
            board.set(index, color);
            Ok(())
        }
    }
}
