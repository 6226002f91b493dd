//! Persist high scores to disk (XDG config or ~/.config/orbitui), one record per game mode.

use anyhow::{Context, Result};
use orbitui::engine::Snapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const FILENAME: &str = "highscores.json";

/// Best results for one game mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub best_score: u64,
    pub best_normalized: u64,
    pub games_played: u32,
}

/// Records keyed by `GameMode::key()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScores {
    modes: BTreeMap<String, Record>,
}

impl HighScores {
    pub fn get(&self, mode: &str) -> Record {
        self.modes.get(mode).copied().unwrap_or_default()
    }

    /// Count a finished game. Returns true when `score` beats the previous best.
    pub fn record(&mut self, mode: &str, score: u64, normalized: u64) -> bool {
        let entry = self.modes.entry(mode.to_string()).or_default();
        entry.games_played += 1;
        entry.best_normalized = entry.best_normalized.max(normalized);
        let improved = score > entry.best_score;
        if improved {
            entry.best_score = score;
        }
        improved
    }
}

/// Returns the path to the high scores file (config dir / orbitui / highscores.json).
pub fn config_path() -> PathBuf {
    let base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => std::env::var("HOME")
            .map(|h| PathBuf::from(h).join(".config"))
            .unwrap_or_else(|_| PathBuf::from(".")),
    };
    base.join("orbitui").join(FILENAME)
}

/// Load high scores; empty on a missing or unreadable file.
pub fn load(path: &Path) -> HighScores {
    let Ok(content) = fs::read_to_string(path) else {
        return HighScores::default();
    };
    serde_json::from_str(&content).unwrap_or_else(|e| {
        log::warn!("ignoring corrupt high score file {}: {e}", path.display());
        HighScores::default()
    })
}

/// Save high scores, creating the config directory if needed.
pub fn save(path: &Path, scores: &HighScores) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(scores)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Count the game in `snapshot` and write the table back to `path`. A failed
/// write is logged, not returned. Returns true on a new best score.
pub fn record_and_save(scores: &mut HighScores, path: &Path, snapshot: &Snapshot) -> bool {
    let new_best = scores.record(snapshot.mode.key(), snapshot.score, snapshot.normalized_score);
    if let Err(e) = save(path, scores) {
        log::warn!("could not save high scores: {e:#}");
    }
    new_best
}
