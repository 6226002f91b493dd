//! Read-only views of a session and the diff observation front ends use in
//! place of callbacks.

use super::grid::Board;
use super::session::{ActiveBlock, GameOverReason, Status};
use crate::config::GameMode;

/// Copy of the session state after a tick or command.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub status: Status,
    pub score: u64,
    pub combo: u32,
    pub board: Board,
    pub active: Option<ActiveBlock>,
    /// Color of the block spawned after the active one lands.
    pub next_color: u8,
    pub level: u32,
    pub total_cleared: u32,
    /// Landings so far.
    pub moves_used: u32,
    /// Seconds spent in `Playing`.
    pub elapsed: f32,
    pub game_over_reason: Option<GameOverReason>,
    pub normalized_score: u64,
    pub mode: GameMode,
}

impl Snapshot {
    /// Seconds left in time attack.
    pub fn time_left(&self) -> Option<f32> {
        match self.mode {
            GameMode::TimeAttack { limit_secs } => Some((limit_secs as f32 - self.elapsed).max(0.0)),
            _ => None,
        }
    }

    /// Landings left in puzzle mode.
    pub fn moves_left(&self) -> Option<u32> {
        match self.mode {
            GameMode::Puzzle { move_limit } => Some(move_limit.saturating_sub(self.moves_used)),
            _ => None,
        }
    }
}

/// Something an observer may react to between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    ScoreIncreased { from: u64, to: u64 },
    ComboIncreased { from: u32, to: u32 },
    StatusChanged { from: Status, to: Status },
    GameOver(GameOverReason),
}

/// Derive the changes from `prev` to `next`, in a fixed order: score, combo,
/// status, game over.
pub fn changes(prev: &Snapshot, next: &Snapshot) -> Vec<Change> {
    let mut out = Vec::new();
    if next.score > prev.score {
        out.push(Change::ScoreIncreased {
            from: prev.score,
            to: next.score,
        });
    }
    if next.combo > prev.combo {
        out.push(Change::ComboIncreased {
            from: prev.combo,
            to: next.combo,
        });
    }
    if next.status != prev.status {
        out.push(Change::StatusChanged {
            from: prev.status,
            to: next.status,
        });
        if next.status == Status::GameOver {
            if let Some(reason) = next.game_over_reason {
                out.push(Change::GameOver(reason));
            }
        }
    }
    out
}
