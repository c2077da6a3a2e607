/// Top-ten score list and its persistence.
///
/// The list is always handled as a whole: load, insert, truncate, write
/// back.  Stores never hold more than `MAX_ENTRIES` entries and always keep
/// them sorted by descending score.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const MAX_ENTRIES: usize = 10;

pub const ANONYMOUS_NAME: &str = "Anonymous";
/// Character label used when no character is selected or the entry is
/// anonymous.
pub const DEFAULT_CHARACTER_LABEL: &str = "Player";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub character: String,
    pub score: u32,
    pub distance: u32,
    pub date: String,
}

impl ScoreEntry {
    /// An entry stamped with today's local date.
    pub fn today(name: &str, character: &str, score: u32, distance: u32) -> Self {
        ScoreEntry {
            name: name.to_string(),
            character: character.to_string(),
            score,
            distance,
            date: chrono::Local::now().format("%Y-%m-%d").to_string(),
        }
    }
}

// ── List operations (pure) ────────────────────────────────────────────────────

/// Sort by descending score and cap the length.  The sort is stable, so
/// among equal scores the earlier entry stays ahead.
pub fn normalize(mut entries: Vec<ScoreEntry>) -> Vec<ScoreEntry> {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(MAX_ENTRIES);
    entries
}

/// Append `entry` and re-normalize.
pub fn insert(entries: &[ScoreEntry], entry: ScoreEntry) -> Vec<ScoreEntry> {
    let mut all = entries.to_vec();
    all.push(entry);
    normalize(all)
}

/// Whether `score` earns a place: the list has a free slot, or the score
/// beats the current lowest entry.
pub fn qualifies(entries: &[ScoreEntry], score: u32) -> bool {
    if entries.len() < MAX_ENTRIES {
        return true;
    }
    entries.last().map(|lowest| score > lowest.score).unwrap_or(true)
}

// ── Stores ────────────────────────────────────────────────────────────────────

/// Somewhere the score list lives between sessions.
pub trait ScoreStore {
    /// The stored list.  Missing or unreadable data yields an empty list.
    fn load(&self) -> Vec<ScoreEntry>;

    /// Replace the stored list.
    fn save(&mut self, entries: &[ScoreEntry]) -> Result<()>;

    /// Read-modify-write a single entry into the list and return the new list.
    fn record(&mut self, entry: ScoreEntry) -> Result<Vec<ScoreEntry>> {
        let entries = insert(&self.load(), entry);
        self.save(&entries)?;
        Ok(entries)
    }
}

/// Scores kept as a JSON array in one file.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&self) -> Vec<ScoreEntry> {
        let Ok(s) = fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<ScoreEntry>>(&s) {
            Ok(entries) => normalize(entries),
            Err(e) => {
                log::warn!("discarding unreadable scores at {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    fn save(&mut self, entries: &[ScoreEntry]) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let data = serde_json::to_vec_pretty(entries)?;
        fs::write(&tmp, data).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}

/// In-process store, for tests and for running without a data directory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    pub entries: Vec<ScoreEntry>,
    /// Number of successful `save` calls.
    pub saves: usize,
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Vec<ScoreEntry> {
        self.entries.clone()
    }

    fn save(&mut self, entries: &[ScoreEntry]) -> Result<()> {
        self.entries = entries.to_vec();
        self.saves += 1;
        Ok(())
    }
}
