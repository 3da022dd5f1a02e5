//! Persisted application configuration.
//!
//! The CLI remembers the owner username, the archive root, the date
//! bounds, and the cosmetic language/theme choices between runs, stored as
//! TOML under the platform config directory. Everything here is boundary
//! plumbing: date strings are normalized to well-typed [`DateRange`]
//! values exactly once, on the way in, so the aggregation core never sees
//! a raw string.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{ArchiveError, Result};
use crate::range::{DateRange, parse_date};

/// Saved user settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Name identifying the user's own messages.
    pub username: String,

    /// Default archive root when none is given on the command line.
    pub archive_root: Option<PathBuf>,

    /// Display language key. Unused by the engine; kept for the UI.
    pub language: String,

    /// Display theme key. Unused by the engine; kept for the UI.
    pub theme: String,

    /// Lower date bound as `YYYY-MM-DD`, unset means "since forever".
    pub from_date: Option<String>,

    /// Upper date bound as `YYYY-MM-DD`, unset means "up to today".
    pub to_date: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            archive_root: None,
            language: "English".to_string(),
            theme: "light".to_string(),
            from_date: None,
            to_date: None,
        }
    }
}

impl AppConfig {
    /// The default config file location under the platform config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("msgtally").join("config.toml"))
    }

    /// Loads the config from `path`, falling back to defaults when the
    /// file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Config`] when the file exists but cannot be
    /// read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .map_err(|err| ArchiveError::config(path, err.to_string()))?;
        toml::from_str(&raw).map_err(|err| ArchiveError::config(path, err.to_string()))
    }

    /// Saves the config to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)
            .map_err(|err| ArchiveError::config(path, err.to_string()))?;
        fs::write(path, raw)?;
        Ok(())
    }

    /// The effective date range, normalized once.
    ///
    /// Unset or unparseable bounds fall back to 2000-01-01 and today,
    /// mirroring how earlier releases of the app recovered from stale
    /// saved values.
    pub fn date_range(&self) -> DateRange {
        let from = self
            .from_date
            .as_deref()
            .and_then(|raw| parse_date(raw).ok())
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        let to = self
            .to_date
            .as_deref()
            .and_then(|raw| parse_date(raw).ok())
            .unwrap_or_else(|| Local::now().date_naive());
        DateRange::new(from, to)
    }
}
