//! Layout and drawing: menu, polar board, sidebar, pause and game over overlays.

use crate::app::{MenuState, MenuTab, Screen};
use crate::highscores::Record;
use crate::theme::Theme;
use orbitui::config::{DIFFICULTY_PRESETS, DifficultyConfig};
use orbitui::engine::{EMPTY, GameOverReason, Snapshot, Status};
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use std::f32::consts::TAU;

const SIDEBAR_WIDTH: u16 = 26;
/// Terminal cells are about twice as tall as wide.
const X_ASPECT: f32 = 2.0;
/// Empty radius (rows) around the centre before ring 0.
const CORE_RADIUS: f32 = 2.0;

const BLOCK_GLYPH: &str = "●";
const ACTIVE_GLYPH: &str = "◆";
const GUIDE_GLYPH: &str = "·";

/// Everything the renderer needs for one frame.
pub struct View<'a> {
    pub screen: Screen,
    pub snapshot: &'a Snapshot,
    pub theme: &'a Theme,
    pub menu: &'a MenuState,
    pub difficulty: &'a DifficultyConfig,
    pub best: Record,
    pub new_best: bool,
    /// Combo level to announce, while the banner is up.
    pub combo_banner: Option<u32>,
}

pub fn draw(frame: &mut Frame, view: &View) {
    let area = frame.area();
    Block::default()
        .style(Style::default().bg(view.theme.bg))
        .render(area, frame.buffer_mut());
    match view.screen {
        Screen::Menu => draw_menu(frame, view, area),
        Screen::Playing => {
            draw_game(frame, view, area);
            if view.snapshot.status == Status::Paused {
                draw_pause_overlay(frame, view.theme, area);
            }
        }
        Screen::GameOver => {
            draw_game(frame, view, area);
            draw_game_over(frame, view, area);
        }
    }
}

/// Maps continuous (ring, sector) board coordinates to terminal cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polar {
    cx: f32,
    cy: f32,
    spacing: f32,
    sectors: usize,
}

impl Polar {
    /// Fit `rings` rings of `sectors` sectors inside `area`.
    pub fn fit(area: Rect, rings: usize, sectors: usize) -> Self {
        let radius = (f32::from(area.height) / 2.0)
            .min(f32::from(area.width) / (2.0 * X_ASPECT))
            - 1.0;
        let spacing = ((radius - CORE_RADIUS) / rings.max(1) as f32).max(0.5);
        Self {
            cx: f32::from(area.x) + f32::from(area.width) / 2.0,
            cy: f32::from(area.y) + f32::from(area.height) / 2.0,
            spacing,
            sectors: sectors.max(1),
        }
    }

    /// Terminal cell for a ring position and sector; sector 0 is at the top,
    /// sectors advance clockwise.
    pub fn project(&self, ring: f32, sector: usize) -> (i32, i32) {
        let radius = CORE_RADIUS + (ring + 0.5) * self.spacing;
        let angle = TAU * (sector as f32 + 0.5) / self.sectors as f32;
        let x = self.cx + radius * angle.sin() * X_ASPECT;
        let y = self.cy - radius * angle.cos();
        (x.floor() as i32, y.floor() as i32)
    }
}

fn put_glyph(buf: &mut Buffer, area: Rect, (x, y): (i32, i32), glyph: &str, style: Style) {
    let inside = x >= i32::from(area.x)
        && y >= i32::from(area.y)
        && x < i32::from(area.right())
        && y < i32::from(area.bottom());
    if !inside {
        return;
    }
    if let Some(cell) = buf.cell_mut((x as u16, y as u16)) {
        cell.set_symbol(glyph).set_style(style);
    }
}

fn draw_board(frame: &mut Frame, view: &View, area: Rect) {
    let board = &view.snapshot.board;
    let dims = board.dims();
    let polar = Polar::fit(area, dims.rings, dims.sectors);
    let buf = frame.buffer_mut();
    let guide = Style::default().fg(view.theme.border).bg(view.theme.bg);

    // inner rings overlap on small terminals; draw outer first so inner wins
    for ring in (0..dims.rings).rev() {
        for sector in 0..dims.sectors {
            let pos = polar.project(ring as f32, sector);
            match board.at(ring, sector) {
                Some(EMPTY) | None => put_glyph(buf, area, pos, GUIDE_GLYPH, guide),
                Some(color) => {
                    let style = Style::default().fg(view.theme.block_color(color)).bg(view.theme.bg);
                    put_glyph(buf, area, pos, BLOCK_GLYPH, style);
                }
            }
        }
    }

    if let Some(block) = view.snapshot.active {
        let style = Style::default()
            .fg(view.theme.block_color(block.color))
            .bg(view.theme.bg)
            .add_modifier(Modifier::BOLD);
        put_glyph(buf, area, polar.project(block.ring_pos, block.sector), ACTIVE_GLYPH, style);
    }

    if let Some(combo) = view.combo_banner {
        let banner = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height: 1.min(area.height),
        };
        Paragraph::new(Line::from(Span::styled(
            format!(" Combo x{combo}! "),
            Style::default()
                .fg(Color::Black)
                .bg(view.theme.title)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(banner, buf);
    }
}

/// Draw game: board + sidebar, board takes the remaining width.
fn draw_game(frame: &mut Frame, view: &View, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Fill(1), Constraint::Length(SIDEBAR_WIDTH)])
        .split(area);
    let board_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(view.theme.border).bg(view.theme.bg))
        .title(Span::styled(" orbitui ", Style::default().fg(view.theme.title)));
    let board_area = board_block.inner(chunks[0]);
    board_block.render(chunks[0], frame.buffer_mut());
    draw_board(frame, view, board_area);
    draw_sidebar(frame, view, chunks[1]);
}

fn draw_sidebar(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let snap = view.snapshot;
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.text);
    let border_style = Style::default().fg(theme.border).bg(theme.bg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Next
            Constraint::Length(8), // Stats
            Constraint::Length(5), // Mode
            Constraint::Fill(1),   // Keys
        ])
        .split(area);

    let section = |title: &'static str| {
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(Span::styled(title, title_style))
    };
    let stat = |label: &'static str, value: String| {
        Line::from(vec![Span::styled(label, title_style), Span::styled(value, fg_style)])
    };

    let next = Line::from(vec![
        Span::styled("██", Style::default().fg(theme.block_color(snap.next_color))),
        Span::styled(format!(" colour {}", snap.next_color), fg_style),
    ]);
    Paragraph::new(next)
        .block(section(" Next "))
        .render(chunks[0], frame.buffer_mut());

    let combo = if snap.combo > 1 {
        format!("x{}", snap.combo)
    } else {
        "-".to_string()
    };
    let stats = vec![
        stat("Score: ", snap.score.to_string()),
        stat("Best: ", view.best.best_score.max(snap.score).to_string()),
        stat("Level: ", snap.level.to_string()),
        stat("Combo: ", combo),
        stat("Cleared: ", snap.total_cleared.to_string()),
        stat("Rated: ", snap.normalized_score.to_string()),
    ];
    Paragraph::new(Text::from(stats))
        .block(section(" Stats "))
        .render(chunks[1], frame.buffer_mut());

    let mut mode_lines = vec![stat("", format!("{} · {}", snap.mode.label(), view.difficulty.name))];
    if let Some(left) = snap.time_left() {
        let secs = left.ceil() as u32;
        mode_lines.push(stat("Time: ", format!("{:02}:{:02}", secs / 60, secs % 60)));
    } else if let Some(left) = snap.moves_left() {
        mode_lines.push(stat("Moves left: ", left.to_string()));
    } else {
        let secs = snap.elapsed as u32;
        mode_lines.push(stat("Time: ", format!("{:02}:{:02}", secs / 60, secs % 60)));
    }
    Paragraph::new(Text::from(mode_lines))
        .block(section(" Mode "))
        .render(chunks[2], frame.buffer_mut());

    let keys = vec![
        Line::from(Span::styled("←/h  →/l   rotate", fg_style)),
        Line::from(Span::styled("↓/j/Space  fast drop", fg_style)),
        Line::from(Span::styled("P pause   Q menu", fg_style)),
    ];
    Paragraph::new(Text::from(keys))
        .block(section(" Keys "))
        .render(chunks[3], frame.buffer_mut());
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn draw_menu(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let menu = view.menu;
    let popup = centered(area, 48, 16);

    let highlight_style = Style::default()
        .fg(Color::Black)
        .bg(theme.block_color(1))
        .add_modifier(Modifier::BOLD);
    let normal_style = Style::default().fg(theme.text);
    let tab_style = |tab: MenuTab| {
        if menu.current_tab == tab {
            highlight_style
        } else {
            normal_style
        }
    };

    let difficulty = DIFFICULTY_PRESETS
        .get(usize::from(menu.selected_difficulty.max(1)) - 1)
        .map_or("?", |d| d.name);
    let mode = match menu.selected_mode {
        crate::ModeArg::Standard => "Standard",
        crate::ModeArg::TimeAttack => "Time Attack",
        crate::ModeArg::Endless => "Endless",
        crate::ModeArg::Puzzle => "Puzzle",
    };

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                " Orbit ",
                Style::default()
                    .fg(theme.block_color(3))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" tui ", Style::default().fg(theme.text).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(Span::styled("match three around the rings", normal_style)),
        Line::from(""),
        Line::from(Span::styled(
            format!(" < {:>2} {:<12} > ", menu.selected_difficulty, difficulty),
            tab_style(MenuTab::Difficulty),
        )),
        Line::from(""),
        Line::from(Span::styled(format!(" < {mode:^15} > "), tab_style(MenuTab::Mode))),
        Line::from(""),
        Line::from(Span::styled("  START  ", tab_style(MenuTab::Start))),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "Best {}   Rated {}   Played {}",
                view.best.best_score, view.best.best_normalized, view.best.games_played
            ),
            Style::default().fg(theme.title),
        )),
        Line::from(""),
        Line::from(Span::styled("↑↓ select   ←→ change   Enter start   Q quit", normal_style)),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border).bg(theme.bg)),
        )
        .render(popup, frame.buffer_mut());
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup = centered(area, 28, 5);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(" P: Resume    Q: Menu ", Style::default().fg(theme.text))),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border).bg(theme.bg)),
        )
        .render(popup, frame.buffer_mut());
}

fn game_over_title(reason: Option<GameOverReason>) -> &'static str {
    match reason {
        Some(GameOverReason::TimeUp) => " Time's up! ",
        Some(GameOverReason::PuzzleSolved) => " Puzzle solved! ",
        Some(GameOverReason::MovesExhausted) => " Out of moves ",
        Some(GameOverReason::BoardFull) | None => " Game Over ",
    }
}

fn draw_game_over(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let snap = view.snapshot;
    let popup = centered(area, 36, 13);
    let fg = Style::default().fg(theme.text);
    let title_bg = if snap.game_over_reason == Some(GameOverReason::PuzzleSolved) {
        Color::Green
    } else {
        Color::Red
    };
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            game_over_title(snap.game_over_reason),
            Style::default().fg(Color::White).bg(title_bg),
        )),
        Line::from(""),
        Line::from(Span::styled(format!(" Score: {} ", snap.score), fg)),
        Line::from(Span::styled(format!(" Rated: {} ", snap.normalized_score), fg)),
        Line::from(Span::styled(format!(" Best: {} ", view.best.best_score), fg)),
        Line::from(Span::styled(
            format!(" Level {}  ·  {} cleared ", snap.level, snap.total_cleared),
            fg,
        )),
    ];
    if view.new_best {
        lines.push(Line::from(Span::styled(
            " New record! ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" R: Restart  Enter: Menu  Q: Quit ", fg)));
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border).bg(theme.bg))
                .title(Span::styled(" orbitui ", Style::default().fg(theme.title))),
        )
        .render(popup, frame.buffer_mut());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polar() -> Polar {
        Polar::fit(Rect::new(0, 0, 100, 40), 12, 24)
    }

    #[test]
    fn test_rings_move_outward() {
        let p = polar();
        let (_, inner_y) = p.project(0.0, 0);
        let (_, outer_y) = p.project(11.0, 0);
        assert!(outer_y < inner_y);
        assert!(outer_y >= 0);
    }

    #[test]
    fn test_sectors_go_clockwise_from_top() {
        let p = polar();
        let (top_x, _) = p.project(11.0, 0);
        let (right_x, right_y) = p.project(11.0, 6);
        let (left_x, _) = p.project(11.0, 18);
        assert!(right_x > top_x);
        assert!(left_x < top_x);
        assert!((right_y - 20).abs() <= 2);
    }

    #[test]
    fn test_projection_stays_inside_area() {
        let area = Rect::new(0, 0, 60, 24);
        let p = Polar::fit(area, 12, 24);
        for sector in 0..24 {
            let (x, y) = p.project(11.0, sector);
            assert!((0..60).contains(&x), "x {x} sector {sector}");
            assert!((0..24).contains(&y), "y {y} sector {sector}");
        }
    }

    #[test]
    fn test_game_over_titles() {
        assert_eq!(game_over_title(Some(GameOverReason::TimeUp)), " Time's up! ");
        assert_eq!(game_over_title(None), " Game Over ");
    }
}
