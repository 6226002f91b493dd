//! Deterministic simulation core. No I/O, no clocks: callers feed frame
//! deltas and commands into a [`Session`] and read [`Snapshot`]s back.

pub mod error;
pub mod fall;
pub mod gravity;
pub mod grid;
pub mod lock;
pub mod matcher;
pub mod session;
pub mod snapshot;
pub mod spawn;

pub use error::{LockError, SpawnError};
pub use grid::{Board, Dimensions, EMPTY, MAX_COLOR};
pub use matcher::{Axis, Match, find_matches};
pub use session::{ActiveBlock, GameOverReason, Session, Status};
pub use snapshot::{Change, Snapshot, changes};
