//! Orbitui: falling-block match-3 on a circular board, in the terminal.

mod app;
mod highscores;
mod input;
mod theme;
mod ui;

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, ValueEnum};
use orbitui::config::{DifficultyConfig, GameMode, SessionSettings};
use orbitui::engine::Dimensions;

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette)?;
    let settings = args.settings();
    settings.validate().context("invalid game settings")?;
    log::info!("orbitui {} starting", env!("CARGO_PKG_VERSION"));
    let mut app = App::new(&args, settings, theme)?;
    app.run()
}

/// The terminal belongs to the UI, so logs only go to a file when asked for.
fn init_logging(path: &std::path::Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// Falling-block match-3 puzzle on a circular board.
#[derive(Debug, Parser)]
#[command(
    name = "orbitui",
    version,
    about = "Falling-block match-3 on a circular board. Line up three or more of a colour around a ring or along a sector.",
    long_about = "Orbitui is a terminal puzzle game played on concentric rings.\n\n\
        Blocks spawn at the centre and fall outward. Steer each block around the \
        board before it lands; three or more same-coloured blocks in a row around \
        a ring or along a sector are cleared, and the rest settle toward the rim. \
        Chain reactions score extra.\n\n\
        CONTROLS:\n  Left/h      Rotate left     Right/l     Rotate right\n  \
        Down/j/Space Fast drop (hold) P          Pause\n  R           Restart (game over) Q / Esc   Menu / quit\n\n\
        Use --theme to load a colour theme file (key = \"#RRGGBB\" lines)."
)]
pub struct Args {
    /// Difficulty level, 1 (Very Easy) to 10 (Nightmare).
    #[arg(short, long, default_value = "4", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(1..=10))]
    pub difficulty: u8,

    /// Game mode: standard, time-attack, endless or puzzle.
    #[arg(short, long, default_value = "standard")]
    pub mode: ModeArg,

    /// Number of sectors (angular slices).
    #[arg(long, default_value = "24", value_name = "N")]
    pub sectors: usize,

    /// Number of rings (concentric lanes).
    #[arg(long, default_value = "12", value_name = "N")]
    pub rings: usize,

    /// Seed for spawn positions and colours (random if unset).
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// In mode 'time-attack': time limit in seconds.
    #[arg(long, default_value = "120", value_name = "SECS")]
    pub time_limit: u32,

    /// In mode 'puzzle': number of landings allowed.
    #[arg(long, default_value = "40", value_name = "N")]
    pub move_limit: u32,

    /// Path to theme file (lines of key = "#RRGGBB").
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Skip main menu and start game immediately.
    #[arg(long)]
    pub no_menu: bool,

    /// Target render frames per second.
    #[arg(long, default_value = "30.0", value_name = "RATE")]
    pub frame_rate: f64,

    /// Write logs to this file (filter with RUST_LOG).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn game_mode(&self) -> GameMode {
        self.mode.game_mode(self.time_limit, self.move_limit)
    }

    pub fn settings(&self) -> SessionSettings {
        SessionSettings {
            dims: Dimensions::new(self.rings, self.sectors),
            difficulty: DifficultyConfig::for_level(self.difficulty),
            mode: self.game_mode(),
            seed: self.seed,
            ..SessionSettings::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ModeArg {
    #[default]
    Standard,
    #[value(alias = "timed")]
    TimeAttack,
    Endless,
    Puzzle,
}

impl ModeArg {
    pub fn game_mode(self, time_limit: u32, move_limit: u32) -> GameMode {
        match self {
            Self::Standard => GameMode::Standard,
            Self::TimeAttack => GameMode::TimeAttack {
                limit_secs: time_limit,
            },
            Self::Endless => GameMode::Endless,
            Self::Puzzle => GameMode::Puzzle { move_limit },
        }
    }
}
