//! App: terminal init, main loop, frame clock and key handling.

use crate::highscores::{self, HighScores};
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use crate::ui::{self, View};
use crate::{Args, ModeArg};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use orbitui::config::{DifficultyConfig, GameMode, SessionSettings};
use orbitui::engine::{Change, Session, Snapshot, Status, changes};
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Longest simulation step fed to the session in one frame. Covers stalls
/// (terminal resize, suspended process) so a block never teleports.
const MAX_FRAME_DELTA: Duration = Duration::from_millis(250);
/// Fast drop stays on this long after the last press/repeat of the key when
/// the terminal does not report key releases.
const FAST_DROP_GRACE: Duration = Duration::from_millis(150);
/// How long the combo banner stays up.
const COMBO_BANNER: Duration = Duration::from_millis(1200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTab {
    Difficulty,
    Mode,
    Start,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuState {
    pub current_tab: MenuTab,
    pub selected_difficulty: u8,
    pub selected_mode: ModeArg,
}

impl MenuState {
    fn next_tab(&mut self) {
        self.current_tab = match self.current_tab {
            MenuTab::Difficulty => MenuTab::Mode,
            MenuTab::Mode => MenuTab::Start,
            MenuTab::Start => MenuTab::Difficulty,
        };
    }

    fn prev_tab(&mut self) {
        self.current_tab = match self.current_tab {
            MenuTab::Difficulty => MenuTab::Start,
            MenuTab::Mode => MenuTab::Difficulty,
            MenuTab::Start => MenuTab::Mode,
        };
    }

    /// Step the selection on the current tab; `forward` is right.
    fn cycle(&mut self, forward: bool) {
        match self.current_tab {
            MenuTab::Difficulty => {
                self.selected_difficulty = match (self.selected_difficulty, forward) {
                    (10, true) => 1,
                    (1, false) => 10,
                    (d, true) => d + 1,
                    (d, false) => d - 1,
                };
            }
            MenuTab::Mode => {
                const ORDER: [ModeArg; 4] = [
                    ModeArg::Standard,
                    ModeArg::TimeAttack,
                    ModeArg::Endless,
                    ModeArg::Puzzle,
                ];
                let i = ORDER.iter().position(|m| *m == self.selected_mode).unwrap_or(0);
                let next = if forward { i + 1 } else { i + ORDER.len() - 1 };
                self.selected_mode = ORDER[next % ORDER.len()];
            }
            MenuTab::Start => {}
        }
    }
}

pub struct App {
    settings: SessionSettings,
    time_limit: u32,
    move_limit: u32,
    theme: Theme,
    session: Session,
    /// Last snapshot handed to the UI; diffed against the next one.
    prev: Snapshot,
    screen: Screen,
    menu_state: MenuState,
    frame_interval: Duration,
    last_frame: Instant,
    fast_drop_until: Option<Instant>,
    combo_banner: Option<(u32, Instant)>,
    high_scores: HighScores,
    high_scores_path: PathBuf,
    new_best: bool,
}

impl App {
    pub fn new(args: &Args, settings: SessionSettings, theme: Theme) -> Result<Self> {
        let session = Session::new(settings.clone())?;
        let prev = session.snapshot();
        let high_scores_path = highscores::config_path();
        let high_scores = highscores::load(&high_scores_path);
        let menu_state = MenuState {
            current_tab: MenuTab::Difficulty,
            selected_difficulty: args.difficulty,
            selected_mode: args.mode,
        };
        let mut app = Self {
            settings,
            time_limit: args.time_limit,
            move_limit: args.move_limit,
            theme,
            session,
            prev,
            screen: Screen::Menu,
            menu_state,
            frame_interval: Duration::from_secs_f64(1.0 / args.frame_rate.clamp(1.0, 240.0)),
            last_frame: Instant::now(),
            fast_drop_until: None,
            combo_banner: None,
            high_scores,
            high_scores_path,
            new_best: false,
        };
        if args.no_menu {
            app.start_game()?;
        }
        Ok(app)
    }

    fn mode_for(&self, mode: ModeArg) -> GameMode {
        mode.game_mode(self.time_limit, self.move_limit)
    }

    /// Fresh session from the menu selection.
    fn start_game(&mut self) -> Result<()> {
        self.settings.difficulty = DifficultyConfig::for_level(self.menu_state.selected_difficulty);
        self.settings.mode = self.mode_for(self.menu_state.selected_mode);
        self.session = Session::new(self.settings.clone())?;
        self.restart();
        Ok(())
    }

    /// Same settings, new board.
    fn restart(&mut self) {
        self.session.reset_game();
        self.session.start_game();
        self.prev = self.session.snapshot();
        self.screen = if self.prev.status == Status::GameOver {
            Screen::GameOver
        } else {
            Screen::Playing
        };
        self.last_frame = Instant::now();
        self.fast_drop_until = None;
        self.combo_banner = None;
        self.new_best = false;
    }

    fn to_menu(&mut self) {
        let snapshot = self.session.snapshot();
        if left_unfinished(self.screen, &snapshot) {
            self.new_best =
                highscores::record_and_save(&mut self.high_scores, &self.high_scores_path, &snapshot);
            log::info!(
                "left {} game at score {}, new best: {}",
                snapshot.mode.key(),
                snapshot.score,
                self.new_best
            );
        }
        self.session.reset_game();
        self.prev = self.session.snapshot();
        self.screen = Screen::Menu;
    }

    fn toggle_pause(&mut self) {
        match self.session.status() {
            Status::Playing => {
                self.session.set_fast_drop(false);
                self.fast_drop_until = None;
                self.session.pause_game();
            }
            Status::Paused => {
                self.session.resume_game();
                // paused time must not reach the simulation
                self.last_frame = Instant::now();
            }
            _ => {}
        }
    }

    fn hold_fast_drop(&mut self, now: Instant) {
        self.session.set_fast_drop(true);
        self.fast_drop_until = Some(now + FAST_DROP_GRACE);
    }

    fn release_fast_drop(&mut self) {
        self.session.set_fast_drop(false);
        self.fast_drop_until = None;
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        // Release events make fast drop end as soon as the key is let go
        let _ = execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        );

        let mut terminal = ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        let _ = execute!(std::io::stdout(), PopKeyboardEnhancementFlags);
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let now = Instant::now();
            let mode = if self.screen == Screen::Menu {
                self.mode_for(self.menu_state.selected_mode)
            } else {
                self.settings.mode
            };
            let view = View {
                screen: self.screen,
                snapshot: &self.prev,
                theme: &self.theme,
                menu: &self.menu_state,
                difficulty: &self.settings.difficulty,
                best: self.high_scores.get(mode.key()),
                new_best: self.new_best,
                combo_banner: self
                    .combo_banner
                    .filter(|(_, at)| now.duration_since(*at) < COMBO_BANNER)
                    .map(|(combo, _)| combo),
            };
            terminal.draw(|f| ui::draw(f, &view))?;

            let timeout = self.frame_interval.saturating_sub(now.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    if let Event::Key(key) = event::read()? {
                        if !self.handle_key(key)? {
                            return Ok(());
                        }
                    }
                }
            }

            self.advance();
        }
    }

    /// Returns false when the app should exit.
    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        let action = key_to_action(key);
        let now = Instant::now();

        if key.kind == KeyEventKind::Release {
            if matches!(action, Action::FastDrop | Action::Down) {
                self.release_fast_drop();
            }
            return Ok(true);
        }

        match self.screen {
            Screen::Menu => {
                if key.kind != KeyEventKind::Press {
                    return Ok(true);
                }
                match action {
                    Action::Quit => return Ok(false),
                    Action::Up => self.menu_state.prev_tab(),
                    Action::Down => self.menu_state.next_tab(),
                    Action::RotateLeft => self.menu_state.cycle(false),
                    Action::RotateRight => self.menu_state.cycle(true),
                    Action::Confirm | Action::FastDrop => {
                        if self.menu_state.current_tab == MenuTab::Start {
                            self.start_game()?;
                        } else {
                            self.menu_state.current_tab = MenuTab::Start;
                        }
                    }
                    _ => {}
                }
            }
            Screen::Playing => match action {
                Action::Quit if key.kind == KeyEventKind::Press => self.to_menu(),
                Action::Pause if key.kind == KeyEventKind::Press => self.toggle_pause(),
                Action::RotateLeft => {
                    self.session.rotate_left();
                }
                Action::RotateRight => {
                    self.session.rotate_right();
                }
                Action::FastDrop | Action::Down => self.hold_fast_drop(now),
                _ => {}
            },
            Screen::GameOver => {
                if key.kind != KeyEventKind::Press {
                    return Ok(true);
                }
                match action {
                    Action::Quit => return Ok(false),
                    Action::Restart => self.restart(),
                    Action::Confirm => self.to_menu(),
                    _ => {}
                }
            }
        }
        Ok(true)
    }

    /// One frame of simulation, then react to what changed.
    fn advance(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).min(MAX_FRAME_DELTA);
        self.last_frame = now;
        if self.screen != Screen::Playing {
            return;
        }

        if self.fast_drop_until.is_some_and(|until| now >= until) {
            self.release_fast_drop();
        }
        let before = self.session.active().map(|b| b.id);
        self.session.tick(dt.as_secs_f32());
        if self.session.active().map(|b| b.id) != before {
            // a new block starts at base speed until the key is pressed again
            self.fast_drop_until = None;
        }

        let next = self.session.snapshot();
        for change in changes(&self.prev, &next) {
            match change {
                Change::ScoreIncreased { from, to } => log::debug!("score {from} -> {to}"),
                Change::ComboIncreased { to, .. } if to >= 2 => self.combo_banner = Some((to, now)),
                Change::ComboIncreased { .. } | Change::StatusChanged { .. } => {}
                Change::GameOver(reason) => self.finish_game(&next, reason),
            }
        }
        self.prev = next;
    }

    fn finish_game(&mut self, snapshot: &Snapshot, reason: orbitui::engine::GameOverReason) {
        self.screen = Screen::GameOver;
        self.new_best =
            highscores::record_and_save(&mut self.high_scores, &self.high_scores_path, snapshot);
        log::info!("game over ({reason:?}), new best: {}", self.new_best);
    }
}

/// A game left from the play screen with points on the board has not been
/// recorded yet. Endless games only ever end this way.
fn left_unfinished(screen: Screen, snapshot: &Snapshot) -> bool {
    screen == Screen::Playing && snapshot.status != Status::GameOver && snapshot.score > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_cycles_wrap() {
        let mut menu = MenuState {
            current_tab: MenuTab::Difficulty,
            selected_difficulty: 10,
            selected_mode: ModeArg::Standard,
        };
        menu.cycle(true);
        assert_eq!(menu.selected_difficulty, 1);
        menu.cycle(false);
        assert_eq!(menu.selected_difficulty, 10);
        menu.next_tab();
        menu.cycle(false);
        assert_eq!(menu.selected_mode, ModeArg::Puzzle);
        menu.cycle(true);
        assert_eq!(menu.selected_mode, ModeArg::Standard);
        menu.prev_tab();
        assert_eq!(menu.current_tab, MenuTab::Difficulty);
    }

    #[test]
    fn test_leaving_scored_game_is_recorded() {
        let mut session = Session::new(SessionSettings {
            mode: GameMode::Endless,
            seed: Some(3),
            ..SessionSettings::default()
        })
        .unwrap();
        session.start_game();
        let mut snap = session.snapshot();
        assert!(!left_unfinished(Screen::Playing, &snap));
        snap.score = 700;
        assert!(left_unfinished(Screen::Playing, &snap));
        assert!(!left_unfinished(Screen::GameOver, &snap));
        assert!(!left_unfinished(Screen::Menu, &snap));
    }
}
