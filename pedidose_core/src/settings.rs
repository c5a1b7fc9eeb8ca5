//! User settings persistence with file locking.
//!
//! The engine itself never reads preferences; it receives them as plain
//! input. This module is the storage collaborator: favorites, the
//! recently-viewed list, preferred weight unit, and the theme flag,
//! saved as JSON with locking to prevent concurrent-access issues.

use crate::types::WeightUnit;
use crate::{Error, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Most-recent-first cap on the recently-viewed list.
pub const RECENT_LIMIT: usize = 10;

/// Persisted user preferences.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct AppSettings {
    #[serde(default)]
    pub preferred_weight_unit: WeightUnit,

    #[serde(default)]
    pub dark_mode: bool,

    /// Drug ids starred by the user.
    #[serde(default)]
    pub favorites: Vec<String>,

    /// Drug ids in viewing order, most recent first.
    #[serde(default)]
    pub recent_drugs: Vec<String>,
}

impl AppSettings {
    /// Toggle a drug in the favorites list. Returns true when the drug
    /// is a favorite after the call.
    pub fn toggle_favorite(&mut self, drug_id: &str) -> bool {
        if let Some(pos) = self.favorites.iter().position(|id| id == drug_id) {
            self.favorites.remove(pos);
            false
        } else {
            self.favorites.push(drug_id.to_string());
            true
        }
    }

    pub fn is_favorite(&self, drug_id: &str) -> bool {
        self.favorites.iter().any(|id| id == drug_id)
    }

    /// Move a drug to the front of the recently-viewed list,
    /// deduplicating and trimming to [`RECENT_LIMIT`].
    pub fn mark_recently_viewed(&mut self, drug_id: &str) {
        self.recent_drugs.retain(|id| id != drug_id);
        self.recent_drugs.insert(0, drug_id.to_string());
        self.recent_drugs.truncate(RECENT_LIMIT);
    }

    pub fn clear_recently_viewed(&mut self) {
        self.recent_drugs.clear();
    }

    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
    }

    /// Load settings from a file with shared locking
    ///
    /// Returns default settings if the file doesn't exist.
    /// If the file is corrupted, logs a warning and returns defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No settings file found, using defaults");
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(
                    "Unable to open settings file {:?}: {}. Using defaults.",
                    path,
                    e
                );
                return Ok(Self::default());
            }
        };

        // Acquire shared lock for reading
        if let Err(e) = file.lock_shared() {
            tracing::warn!(
                "Unable to lock settings file {:?}: {}. Using defaults.",
                path,
                e
            );
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!(
                "Failed to read settings file {:?}: {}. Using defaults.",
                path,
                e
            );
            return Ok(Self::default());
        }

        file.unlock()?;

        match serde_json::from_str::<AppSettings>(&contents) {
            Ok(settings) => {
                tracing::debug!("Loaded settings from {:?}", path);
                Ok(settings)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse settings file {:?}: {}. Using defaults.",
                    path,
                    e
                );
                Ok(Self::default())
            }
        }
    }

    /// Save settings to a file with exclusive locking
    ///
    /// Atomically writes by:
    /// 1. Writing to a temp file
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Create unique temp file in the same directory for atomic rename
        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "settings path missing parent")
        })?)?;

        // Acquire exclusive lock on the temp file to serialize concurrent writers
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        // Atomically replace old settings file
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Load settings, modify them, and save them back atomically
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut AppSettings) -> Result<()>,
    {
        let mut settings = Self::load(path)?;
        f(&mut settings)?;
        settings.save(path)?;
        Ok(settings)
    }
}
