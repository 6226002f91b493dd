//! Tunables: board defaults, scoring constants, difficulty presets and game modes.

use crate::engine::grid::{Dimensions, MAX_COLOR};
use thiserror::Error;

/// Default sector count (angular slices).
pub const DEFAULT_SECTORS: usize = 24;

/// Default ring count (concentric lanes).
pub const DEFAULT_RINGS: usize = 12;

/// Points per cleared cell before the cascade multiplier.
pub const BASE_SCORE_PER_CELL: u32 = 100;

/// Each further cascade step multiplies its points by this.
pub const COMBO_MULTIPLIER: f64 = 1.5;

/// Colors in play when no difficulty overrides it.
pub const DEFAULT_COLOR_COUNT: u8 = 4;

/// Fast drop scales the block's base velocity by this.
pub const FAST_DROP_MULTIPLIER: f32 = 3.0;

/// Cleared cells needed per level step.
pub const CELLS_PER_LEVEL: u32 = 30;

/// Default time limit in time attack (seconds).
pub const TIME_ATTACK_SECS: u32 = 120;

/// Endless mode wipes the board once this share of cells is filled.
pub const ENDLESS_AUTO_CLEAR_THRESHOLD: f32 = 0.8;

/// Default landing budget in puzzle mode.
pub const PUZZLE_MOVE_LIMIT: u32 = 40;

/// Outer rings pre-filled by the puzzle layout.
pub const PUZZLE_LAYOUT_RINGS: usize = 3;

/// Default difficulty level (Normal).
pub const DEFAULT_DIFFICULTY: u8 = 4;

/// Fall speed, palette size and score weighting for one difficulty level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyConfig {
    pub level: u8,
    pub name: &'static str,
    /// Rings per second at spawn.
    pub initial_velocity: f32,
    /// Added per level step.
    pub velocity_increment: f32,
    /// Ceiling for level-scaled velocity.
    pub max_velocity: f32,
    /// Colors drawn by the spawner, 2..=6.
    pub color_count: u8,
    /// Weight for the cross-difficulty normalized score.
    pub score_multiplier: f64,
}

const fn preset(
    level: u8,
    name: &'static str,
    initial_velocity: f32,
    velocity_increment: f32,
    max_velocity: f32,
    color_count: u8,
    score_multiplier: f64,
) -> DifficultyConfig {
    DifficultyConfig {
        level,
        name,
        initial_velocity,
        velocity_increment,
        max_velocity,
        color_count,
        score_multiplier,
    }
}

/// Levels 1 (Very Easy) through 10 (Nightmare).
pub const DIFFICULTY_PRESETS: [DifficultyConfig; 10] = [
    preset(1, "Very Easy", 1.5, 0.1, 5.0, 2, 1.0),
    preset(2, "Easy", 2.0, 0.12, 6.0, 3, 1.2),
    preset(3, "Beginner", 2.5, 0.15, 7.0, 3, 1.4),
    preset(4, "Normal", 3.0, 0.2, 10.0, 4, 1.6),
    preset(5, "Intermediate", 3.5, 0.25, 12.0, 4, 1.8),
    preset(6, "Hard", 4.0, 0.3, 15.0, 5, 2.0),
    preset(7, "Expert", 4.5, 0.35, 18.0, 5, 2.3),
    preset(8, "Master", 5.0, 0.4, 20.0, 6, 2.6),
    preset(9, "Insane", 5.5, 0.45, 25.0, 6, 3.0),
    preset(10, "Nightmare", 6.0, 0.5, 30.0, 6, 3.5),
];

impl DifficultyConfig {
    /// Preset for `level`, clamped into 1..=10.
    pub fn for_level(level: u8) -> Self {
        let i = level.clamp(1, 10) as usize - 1;
        DIFFICULTY_PRESETS[i]
    }

    /// Velocity for blocks spawned at `level` (1-based), capped at `max_velocity`.
    pub fn velocity_at(&self, level: u32) -> f32 {
        let steps = level.saturating_sub(1) as f32;
        (self.initial_velocity + self.velocity_increment * steps)
            .min(self.max_velocity)
            .max(0.0)
    }

    /// Raw score weighted for comparison across difficulties.
    pub fn normalized_score(&self, raw: u64) -> u64 {
        (raw as f64 * self.score_multiplier).floor() as u64
    }
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self::for_level(DEFAULT_DIFFICULTY)
    }
}

/// Play style; each variant carries its own termination rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    /// Ends when no spawn sector is free.
    #[default]
    Standard,
    /// Ends when the play clock reaches `limit_secs`; a full board is wiped.
    TimeAttack { limit_secs: u32 },
    /// Never ends; the board is wiped when it clogs up.
    Endless,
    /// Starts from a layout; ends when it is cleared, the landing budget runs
    /// out, or the board fills.
    Puzzle { move_limit: u32 },
}

impl GameMode {
    pub const fn time_attack() -> Self {
        Self::TimeAttack {
            limit_secs: TIME_ATTACK_SECS,
        }
    }

    pub const fn puzzle() -> Self {
        Self::Puzzle {
            move_limit: PUZZLE_MOVE_LIMIT,
        }
    }

    /// Stable key for persistence and display.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::TimeAttack { .. } => "time_attack",
            Self::Endless => "endless",
            Self::Puzzle { .. } => "puzzle",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::TimeAttack { .. } => "Time Attack",
            Self::Endless => "Endless",
            Self::Puzzle { .. } => "Puzzle",
        }
    }

    /// Whether a full spawn ring ends the session (otherwise the board is wiped).
    pub fn ends_on_board_full(&self) -> bool {
        matches!(self, Self::Standard | Self::Puzzle { .. })
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("board needs at least 3 rings and 3 sectors, got {rings}x{sectors}")]
    BoardTooSmall { rings: usize, sectors: usize },
    #[error("color count must be within 2..=6, got {0}")]
    ColorCount(u8),
    #[error("velocity must be a finite non-negative number, got {0}")]
    Velocity(f32),
    #[error("combo multiplier must be a finite number of at least 1, got {0}")]
    ComboMultiplier(f64),
}

/// Everything a session needs before `start_game`.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub dims: Dimensions,
    pub difficulty: DifficultyConfig,
    pub mode: GameMode,
    pub base_score_per_cell: u32,
    pub combo_multiplier: f64,
    pub fast_drop_multiplier: f32,
    /// Seed for spawn sectors and colors; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            dims: Dimensions::default(),
            difficulty: DifficultyConfig::default(),
            mode: GameMode::default(),
            base_score_per_cell: BASE_SCORE_PER_CELL,
            combo_multiplier: COMBO_MULTIPLIER,
            fast_drop_multiplier: FAST_DROP_MULTIPLIER,
            seed: None,
        }
    }
}

impl SessionSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        let Dimensions { rings, sectors } = self.dims;
        if rings < 3 || sectors < 3 {
            return Err(SettingsError::BoardTooSmall { rings, sectors });
        }
        let colors = self.difficulty.color_count;
        if !(2..=MAX_COLOR).contains(&colors) {
            return Err(SettingsError::ColorCount(colors));
        }
        for v in [
            self.difficulty.initial_velocity,
            self.difficulty.velocity_increment,
            self.difficulty.max_velocity,
            self.fast_drop_multiplier,
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(SettingsError::Velocity(v));
            }
        }
        let combo = self.combo_multiplier;
        if !combo.is_finite() || combo < 1.0 {
            return Err(SettingsError::ComboMultiplier(combo));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_ordered() {
        for (i, d) in DIFFICULTY_PRESETS.iter().enumerate() {
            assert_eq!(d.level as usize, i + 1);
            assert!((2..=6).contains(&d.color_count));
        }
        assert_eq!(DifficultyConfig::for_level(0).level, 1);
        assert_eq!(DifficultyConfig::for_level(42).level, 10);
    }

    #[test]
    fn test_velocity_capped() {
        let d = DifficultyConfig::for_level(1);
        assert!((d.velocity_at(1) - 1.5).abs() < 1e-6);
        assert!((d.velocity_at(3) - 1.7).abs() < 1e-5);
        assert!((d.velocity_at(1000) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalized_score() {
        let d = DifficultyConfig::for_level(4);
        assert_eq!(d.normalized_score(1000), 1600);
        assert_eq!(DifficultyConfig::for_level(7).normalized_score(3), 6);
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let mut s = SessionSettings::default();
        assert_eq!(s.validate(), Ok(()));
        s.dims = Dimensions::new(2, 24);
        assert!(matches!(s.validate(), Err(SettingsError::BoardTooSmall { .. })));
        s = SessionSettings::default();
        s.difficulty.color_count = 7;
        assert_eq!(s.validate(), Err(SettingsError::ColorCount(7)));
        s = SessionSettings::default();
        s.difficulty.initial_velocity = f32::NAN;
        assert!(matches!(s.validate(), Err(SettingsError::Velocity(_))));
        s = SessionSettings::default();
        s.difficulty.velocity_increment = -5.0;
        assert_eq!(s.validate(), Err(SettingsError::Velocity(-5.0)));
        s = SessionSettings::default();
        s.combo_multiplier = f64::INFINITY;
        assert!(matches!(s.validate(), Err(SettingsError::ComboMultiplier(_))));
        s.combo_multiplier = 0.5;
        assert_eq!(s.validate(), Err(SettingsError::ComboMultiplier(0.5)));
    }

    #[test]
    fn test_velocity_never_negative() {
        let d = DifficultyConfig {
            velocity_increment: -5.0,
            ..DifficultyConfig::for_level(1)
        };
        assert_eq!(d.velocity_at(2), 0.0);
        assert!((d.velocity_at(1) - 1.5).abs() < 1e-6);
    }
}
