//! The session controller: owns the board and the active block, drives the
//! fall → lock → match → clear/gravity cascade → spawn pipeline each tick, and
//! applies the per-mode termination rules.

use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::error::SpawnError;
use super::fall::step_fall_to;
use super::gravity::apply_matches;
use super::grid::{Board, EMPTY};
use super::lock::lock_block;
use super::matcher::find_matches;
use super::snapshot::Snapshot;
use super::spawn::{random_color, spawn};
use crate::config::{
    CELLS_PER_LEVEL, ENDLESS_AUTO_CLEAR_THRESHOLD, GameMode, PUZZLE_LAYOUT_RINGS, SessionSettings,
    SettingsError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Playing,
    Paused,
    GameOver,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    /// No free sector on the spawn ring.
    BoardFull,
    /// Time attack clock ran out.
    TimeUp,
    /// Puzzle landing budget used up.
    MovesExhausted,
    /// Puzzle layout fully cleared.
    PuzzleSolved,
}

/// The falling block under player control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveBlock {
    pub id: u64,
    pub color: u8,
    pub sector: usize,
    /// Continuous ring position; 0.0 at spawn.
    pub ring_pos: f32,
    /// Rings per second.
    pub velocity: f32,
}

#[derive(Debug, Clone)]
pub struct Session {
    settings: SessionSettings,
    rng: ChaCha8Rng,
    board: Board,
    status: Status,
    score: u64,
    combo: u32,
    active: Option<ActiveBlock>,
    /// Velocity the active block spawned with, before fast drop.
    base_velocity: f32,
    next_color: u8,
    next_id: u64,
    total_cleared: u32,
    moves_used: u32,
    elapsed: f32,
    reason: Option<GameOverReason>,
    /// Set while a landing is being resolved.
    resolving: bool,
}

impl Session {
    /// Idle session for `settings`. Randomness is seeded from `settings.seed`,
    /// or from the OS when unset.
    pub fn new(settings: SessionSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let seed = settings.seed.unwrap_or_else(rand::random);
        debug!("session seed {seed}");
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let next_color = random_color(settings.difficulty.color_count, &mut rng);
        Ok(Self {
            board: Board::new(settings.dims),
            settings,
            rng,
            status: Status::Idle,
            score: 0,
            combo: 0,
            active: None,
            base_velocity: 0.0,
            next_color,
            next_id: 0,
            total_cleared: 0,
            moves_used: 0,
            elapsed: 0.0,
            reason: None,
            resolving: false,
        })
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<&ActiveBlock> {
        self.active.as_ref()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    /// 1-based; one step per `CELLS_PER_LEVEL` cleared cells.
    pub fn level(&self) -> u32 {
        1 + self.total_cleared / CELLS_PER_LEVEL
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            status: self.status,
            score: self.score,
            combo: self.combo,
            board: self.board.clone(),
            active: self.active,
            next_color: self.next_color,
            level: self.level(),
            total_cleared: self.total_cleared,
            moves_used: self.moves_used,
            elapsed: self.elapsed,
            game_over_reason: self.reason,
            normalized_score: self.settings.difficulty.normalized_score(self.score),
            mode: self.settings.mode,
        }
    }

    /// Idle → Playing. Fresh board (or puzzle layout), zeroed counters, first
    /// spawn. Ignored in any other state.
    pub fn start_game(&mut self) {
        if self.status != Status::Idle {
            return;
        }
        self.clear_state();
        if matches!(self.settings.mode, GameMode::Puzzle { .. }) {
            self.build_puzzle_layout();
        }
        self.status = Status::Playing;
        info!(
            "game started: mode {}, difficulty {} ({}), {}x{} board",
            self.settings.mode.key(),
            self.settings.difficulty.level,
            self.settings.difficulty.name,
            self.settings.dims.rings,
            self.settings.dims.sectors,
        );
        let color = random_color(self.settings.difficulty.color_count, &mut self.rng);
        self.spawn_or_board_full(color);
    }

    pub fn pause_game(&mut self) {
        if self.status == Status::Playing {
            self.status = Status::Paused;
        }
    }

    pub fn resume_game(&mut self) {
        if self.status == Status::Paused {
            self.status = Status::Playing;
        }
    }

    /// Any state → Idle with an empty board.
    pub fn reset_game(&mut self) {
        self.clear_state();
        self.status = Status::Idle;
        info!("game reset");
    }

    /// Advance the simulation by `dt` seconds. No-op unless Playing.
    pub fn tick(&mut self, dt: f32) {
        if self.status != Status::Playing || self.resolving {
            return;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.elapsed += dt;
        if let GameMode::TimeAttack { limit_secs } = self.settings.mode {
            if self.elapsed >= limit_secs as f32 {
                self.end(GameOverReason::TimeUp);
                return;
            }
        }

        let Some(mut block) = self.active else {
            return;
        };
        let floor = self.board.landing_ring(block.sector).unwrap_or(0);
        if block.ring_pos >= floor as f32 {
            // rotated onto a stack that already reaches the block
            self.resolve_landing(block, floor);
            return;
        }
        let step = step_fall_to(block.ring_pos, block.velocity, dt, floor as f32);
        block.ring_pos = step.ring_pos;
        if step.landed {
            self.resolve_landing(block, floor);
        } else {
            self.active = Some(block);
        }
    }

    /// Move the active block one sector counter-clockwise. Returns whether it
    /// moved.
    pub fn rotate_left(&mut self) -> bool {
        self.rotate(-1)
    }

    /// Move the active block one sector clockwise. Returns whether it moved.
    pub fn rotate_right(&mut self) -> bool {
        self.rotate(1)
    }

    /// Switch the active block between base and fast-drop velocity.
    pub fn set_fast_drop(&mut self, on: bool) {
        if self.status != Status::Playing {
            return;
        }
        let velocity = if on {
            self.base_velocity * self.settings.fast_drop_multiplier
        } else {
            self.base_velocity
        };
        if let Some(block) = self.active.as_mut() {
            block.velocity = velocity;
        }
    }

    fn rotate(&mut self, delta: isize) -> bool {
        if self.status != Status::Playing {
            return false;
        }
        let dims = self.settings.dims;
        let Some(block) = self.active.as_mut() else {
            return false;
        };
        let target = dims.wrap_sector(block.sector as isize + delta);
        let ring = dims.clamp_ring(block.ring_pos.floor() as isize);
        if self.board.at(ring, target) != Some(EMPTY) {
            return false;
        }
        block.sector = target;
        true
    }

    fn clear_state(&mut self) {
        self.board = Board::new(self.settings.dims);
        self.score = 0;
        self.combo = 0;
        self.active = None;
        self.base_velocity = 0.0;
        self.total_cleared = 0;
        self.moves_used = 0;
        self.elapsed = 0.0;
        self.reason = None;
        self.resolving = false;
    }

    /// Lock at `ring`, cascade, score, mode bookkeeping, next spawn.
    fn resolve_landing(&mut self, block: ActiveBlock, ring: usize) {
        self.resolving = true;
        self.active = None;

        let index = self.settings.dims.index(ring, block.sector);
        match lock_block(&mut self.board, index, block.color) {
            Ok(()) => {
                self.moves_used += 1;
                self.resolve_cascade();
                self.after_landing();
            }
            Err(err) => {
                warn!("dropping block {} after failed lock: {err}", block.id);
            }
        }

        if self.status == Status::Playing {
            let color = self.next_color;
            self.next_color = random_color(self.settings.difficulty.color_count, &mut self.rng);
            self.spawn_or_board_full(color);
        }
        self.resolving = false;
    }

    /// Clear matches until none remain. Step `k` scores
    /// `base · cleared · multiplier^(k-1)`.
    fn resolve_cascade(&mut self) {
        let base = f64::from(self.settings.base_score_per_cell);
        let mut level = 0u32;
        let mut cleared_total = 0u32;
        let mut points = 0.0f64;
        loop {
            let matches = find_matches(&self.board);
            if matches.is_empty() {
                break;
            }
            let cleared = apply_matches(&mut self.board, &matches);
            level += 1;
            cleared_total += cleared;
            points += base * f64::from(cleared) * self.settings.combo_multiplier.powi(level as i32 - 1);
            debug!("cascade step {level}: {} matches, {cleared} cells", matches.len());
        }

        if cleared_total > 0 {
            self.score += points.floor() as u64;
            self.combo = level;
            self.total_cleared += cleared_total;
        } else {
            self.combo = 0;
        }
    }

    fn after_landing(&mut self) {
        match self.settings.mode {
            GameMode::Puzzle { move_limit } => {
                if self.board.is_clear() {
                    self.end(GameOverReason::PuzzleSolved);
                } else if self.moves_used >= move_limit {
                    self.end(GameOverReason::MovesExhausted);
                }
            }
            GameMode::Endless => {
                if self.board.fill_ratio() >= ENDLESS_AUTO_CLEAR_THRESHOLD {
                    info!("endless: board {:.0}% full, wiping", self.board.fill_ratio() * 100.0);
                    self.board.clear();
                }
            }
            GameMode::Standard | GameMode::TimeAttack { .. } => {}
        }
    }

    fn spawn_or_board_full(&mut self, color: u8) {
        if self.try_spawn(color).is_ok() {
            return;
        }
        if self.settings.mode.ends_on_board_full() {
            self.end(GameOverReason::BoardFull);
            return;
        }
        info!("{}: board full, wiping", self.settings.mode.key());
        self.board.clear();
        if self.try_spawn(color).is_err() {
            self.end(GameOverReason::BoardFull);
        }
    }

    fn try_spawn(&mut self, color: u8) -> Result<(), SpawnError> {
        let spawned = spawn(&self.board, color, &mut self.rng)?;
        let velocity = self.settings.difficulty.velocity_at(self.level());
        self.next_id += 1;
        self.base_velocity = velocity;
        self.active = Some(ActiveBlock {
            id: self.next_id,
            color: spawned.color,
            sector: spawned.sector,
            ring_pos: 0.0,
            velocity,
        });
        debug!(
            "spawned block {} color {} in sector {} at {velocity:.2} rings/s",
            self.next_id, spawned.color, spawned.sector
        );
        Ok(())
    }

    fn end(&mut self, reason: GameOverReason) {
        self.active = None;
        self.status = Status::GameOver;
        self.reason = Some(reason);
        info!(
            "game over ({reason:?}): score {}, normalized {}",
            self.score,
            self.settings.difficulty.normalized_score(self.score)
        );
    }

    /// Random colors on the outer rings, then existing matches removed until
    /// none are left.
    fn build_puzzle_layout(&mut self) {
        let dims = self.settings.dims;
        let depth = PUZZLE_LAYOUT_RINGS.min(dims.rings - 1);
        for ring in dims.rings - depth..dims.rings {
            for sector in 0..dims.sectors {
                let color = random_color(self.settings.difficulty.color_count, &mut self.rng);
                self.board.put(ring, sector, color);
            }
        }
        loop {
            let matches = find_matches(&self.board);
            if matches.is_empty() {
                break;
            }
            apply_matches(&mut self.board, &matches);
        }
        debug!("puzzle layout: {:.0}% filled", self.board.fill_ratio() * 100.0);
    }
}
