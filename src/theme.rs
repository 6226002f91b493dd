//! Colour theme: block colours and UI colours, loaded from `key = "#RRGGBB"` files.

use crate::Palette;
use orbitui::engine::MAX_COLOR;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

const ONEDARK_BLOCKS: [Color; 6] = [
    rgb(0x98C379), // green
    rgb(0xE5C07B), // yellow
    rgb(0xE06C75), // red
    rgb(0x61AFEF), // blue
    rgb(0xC678DD), // magenta
    rgb(0x56B6C2), // cyan
];

const HIGH_CONTRAST_BLOCKS: [Color; 6] = [
    rgb(0x00FF00),
    rgb(0xFFFF00),
    rgb(0xFF0000),
    rgb(0x0088FF),
    rgb(0xFF00FF),
    rgb(0x00FFFF),
];

// Tol "bright"/"vibrant" picks that stay apart under deuteranopia.
const COLORBLIND_BLOCKS: [Color; 6] = [
    rgb(0x0077BB),
    rgb(0xEE7733),
    rgb(0x009988),
    rgb(0xCC3311),
    rgb(0xEE3377),
    rgb(0xBBBB00),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Block colours for cell values 1..=6.
    pub blocks: [Color; 6],
    /// Board background.
    pub bg: Color,
    /// Ring guides and borders.
    pub border: Color,
    /// Text (score, level).
    pub text: Color,
    /// Highlight / titles.
    pub title: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("reading theme file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex colour {value:?} for {key}")]
    InvalidHex { key: String, value: String },
}

impl Default for Theme {
    fn default() -> Self {
        Self::onedark()
    }
}

impl Theme {
    /// One Dark colours.
    pub fn onedark() -> Self {
        Self {
            blocks: ONEDARK_BLOCKS,
            bg: rgb(0x282C34),
            border: rgb(0x3F444F),
            text: rgb(0xABB2BF),
            title: rgb(0xE5C07B),
        }
    }

    /// One Dark, overridden by the file at `path` when given, then by `palette`.
    pub fn load(path: Option<&Path>, palette: Palette) -> Result<Self, ThemeError> {
        let mut theme = Self::onedark();
        if let Some(path) = path {
            let text = std::fs::read_to_string(path)?;
            theme.apply_map(&parse_theme_file(&text))?;
        }
        theme.apply_palette(palette);
        Ok(theme)
    }

    /// Swap block colours for the high-contrast or colourblind sets.
    pub fn apply_palette(&mut self, palette: Palette) {
        match palette {
            Palette::Normal => {}
            Palette::HighContrast => self.blocks = HIGH_CONTRAST_BLOCKS,
            Palette::Colorblind => self.blocks = COLORBLIND_BLOCKS,
        }
    }

    fn apply_map(&mut self, map: &HashMap<String, String>) -> Result<(), ThemeError> {
        for (key, value) in map {
            let slot = match key.as_str() {
                "background" => &mut self.bg,
                "border" => &mut self.border,
                "text" => &mut self.text,
                "title" => &mut self.title,
                k => match k.strip_prefix("block").and_then(|n| n.parse::<usize>().ok()) {
                    Some(n @ 1..=6) => &mut self.blocks[n - 1],
                    _ => {
                        log::debug!("ignoring unknown theme key {k}");
                        continue;
                    }
                },
            };
            *slot = parse_hex(value).ok_or_else(|| ThemeError::InvalidHex {
                key: key.clone(),
                value: value.clone(),
            })?;
        }
        Ok(())
    }

    /// Colour for a cell value (1..=6). Out-of-range values wrap.
    #[inline]
    pub fn block_color(&self, color: u8) -> Color {
        let i = (color.max(1) - 1) % MAX_COLOR;
        self.blocks[i as usize]
    }
}

/// `key = "value"` lines into a map; `#` starts a comment line, quotes are optional.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim().trim_matches('"').trim_matches('\'').trim();
            if !value.is_empty() {
                map.insert(key.trim().to_string(), value.to_string());
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Option<Color> {
    let s = s.trim().trim_start_matches('#');
    let digit = |range: std::ops::Range<usize>| {
        s.get(range).and_then(|d| u8::from_str_radix(d, 16).ok())
    };
    match s.len() {
        6 => Some(Color::Rgb(digit(0..2)?, digit(2..4)?, digit(4..6)?)),
        3 => Some(Color::Rgb(digit(0..1)? * 17, digit(1..2)? * 17, digit(2..3)? * 17)),
        _ => None,
    }
}
