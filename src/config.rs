//! User preferences and their storage.
//!
//! Two scalar preferences survive across sessions: the birth date string and
//! the life expectancy in years. They are kept under the same keys the
//! original web version used in its key-value store, with the expectancy
//! encoded as a string. Storage is injected through the [`PrefStore`] trait
//! so the app never touches the filesystem directly.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::calendar::{MAX_LIFE_EXPECTANCY, MIN_LIFE_EXPECTANCY};

pub const DEFAULT_BIRTH_DATE: &str = "2003-08-15";
pub const DEFAULT_LIFE_EXPECTANCY: u32 = 100;

/// Persisted preference record. Field names match the original storage keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(rename = "lifecal-birthdate")]
    pub birth_date: String,
    /// Stored as a string; non-numeric values fall back to the default.
    #[serde(rename = "lifecal-lifeexpectancy")]
    life_expectancy_raw: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            birth_date: DEFAULT_BIRTH_DATE.to_string(),
            life_expectancy_raw: DEFAULT_LIFE_EXPECTANCY.to_string(),
        }
    }
}

impl Preferences {
    /// Effective life expectancy in years. A corrupted stored value decodes
    /// to the default rather than failing.
    pub fn life_expectancy(&self) -> u32 {
        self.life_expectancy_raw
            .trim()
            .parse()
            .unwrap_or(DEFAULT_LIFE_EXPECTANCY)
    }

    /// Apply direct user input for the expectancy. Input outside
    /// `[1, 120]` or non-numeric is rejected and the previous value stays.
    pub fn set_life_expectancy(&mut self, input: &str) -> bool {
        match input.trim().parse::<u32>() {
            Ok(years) if (MIN_LIFE_EXPECTANCY..=MAX_LIFE_EXPECTANCY).contains(&years) => {
                self.life_expectancy_raw = years.to_string();
                true
            }
            _ => false,
        }
    }

    pub fn set_birth_date(&mut self, input: &str) {
        self.birth_date = input.to_string();
    }
}

/// Key-value storage capability for preferences.
pub trait PrefStore {
    /// Load stored preferences, or `None` when nothing was stored yet.
    fn load(&self) -> Result<Option<Preferences>>;
    fn save(&self, prefs: &Preferences) -> Result<()>;
}

/// JSON file store at `~/.lifecal/prefs.json`.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new() -> Option<Self> {
        Some(Self {
            path: home_dir()?.join(".lifecal").join("prefs.json"),
        })
    }

    #[cfg(test)]
    fn at(path: PathBuf) -> Self {
        Self { path }
    }
}

impl PrefStore for FileStore {
    fn load(&self) -> Result<Option<Preferences>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", self.path.display()));
            }
        };
        let prefs = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(Some(prefs))
    }

    fn save(&self, prefs: &Preferences) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(prefs)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("writing {}", self.path.display()))
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

/// In-memory store for tests and for running without a home directory.
#[derive(Default)]
pub struct MemStore {
    prefs: std::sync::Mutex<Option<Preferences>>,
}

impl PrefStore for MemStore {
    fn load(&self) -> Result<Option<Preferences>> {
        Ok(self.prefs.lock().ok().and_then(|p| p.clone()))
    }

    fn save(&self, prefs: &Preferences) -> Result<()> {
        if let Ok(mut slot) = self.prefs.lock() {
            *slot = Some(prefs.clone());
        }
        Ok(())
    }
}
