//! Orbitui: falling-block match-3 puzzle on a circular ring/sector board.
//!
//! The [`engine`] module is the deterministic simulation core: board model,
//! fall/lock/match/clear/cascade pipeline, spawning and scoring. It performs no
//! I/O; the terminal front end in the binary drives it with frame deltas and
//! player commands and renders the [`engine::Snapshot`] it hands back.

pub mod config;
pub mod engine;
