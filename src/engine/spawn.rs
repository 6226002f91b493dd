//! Spawn arbitration on ring 0 and color generation.

use rand::Rng;

use super::error::SpawnError;
use super::grid::{Board, EMPTY};

/// Where and what to spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawn {
    pub sector: usize,
    pub color: u8,
}

/// Pick a free spawn sector: a random one if free, otherwise the first free
/// sector scanning forward (wrapping) from it.
pub fn spawn<R: Rng>(board: &Board, color: u8, rng: &mut R) -> Result<Spawn, SpawnError> {
    let sectors = board.dims().sectors;
    if sectors == 0 {
        return Err(SpawnError::BoardFull);
    }
    let pick = rng.random_range(0..sectors);
    (0..sectors)
        .map(|offset| (pick + offset) % sectors)
        .find(|&sector| board.at(0, sector) == Some(EMPTY))
        .map(|sector| Spawn { sector, color })
        .ok_or(SpawnError::BoardFull)
}

/// Uniform color in `1..=color_count`.
pub fn random_color<R: Rng>(color_count: u8, rng: &mut R) -> u8 {
    rng.random_range(1..=color_count.max(1))
}
