//! Standings save files.
//!
//! This module provides:
//! - SaveManager: named save slots in one directory
//! - Atomic writes (temp file + rename)
//! - Slot listing, deletion and backups

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use allegiance_gameplay::save::{SaveError, SaveResult, StandingsSave};
use tracing::{debug, error, info};

/// Default save directory name.
pub const DEFAULT_SAVE_DIR: &str = "saves";

/// Save file extension.
const SAVE_EXTENSION: &str = "alst";

/// Manager for standing saves.
#[derive(Debug, Clone)]
pub struct SaveManager {
    /// Base directory for saves.
    save_dir: PathBuf,
}

impl Default for SaveManager {
    fn default() -> Self {
        Self::new(DEFAULT_SAVE_DIR)
    }
}

impl SaveManager {
    /// Creates a new save manager.
    #[must_use]
    pub fn new(save_dir: impl AsRef<Path>) -> Self {
        Self {
            save_dir: save_dir.as_ref().to_path_buf(),
        }
    }

    /// Returns the save directory path.
    #[must_use]
    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    /// Ensures the save directory exists.
    pub fn ensure_save_dir(&self) -> SaveResult<()> {
        if !self.save_dir.exists() {
            fs::create_dir_all(&self.save_dir)?;
            info!("Created save directory: {:?}", self.save_dir);
        }
        Ok(())
    }

    fn slot_path(&self, slot_name: &str) -> PathBuf {
        self.save_dir.join(format!("{slot_name}.{SAVE_EXTENSION}"))
    }

    fn temp_path(&self, slot_name: &str) -> PathBuf {
        self.save_dir.join(format!("{slot_name}.tmp"))
    }

    fn validate_slot_name(slot_name: &str) -> SaveResult<()> {
        if slot_name.is_empty() {
            return Err(SaveError::InvalidSlotName("Empty slot name".to_string()));
        }

        let invalid_chars = ['/', '\\', ':', '*', '?', '"', '<', '>', '|', '.'];
        if let Some(c) = slot_name.chars().find(|c| invalid_chars.contains(c)) {
            return Err(SaveError::InvalidSlotName(format!(
                "Invalid character '{c}' in slot name"
            )));
        }

        Ok(())
    }

    /// Writes standings to a slot, replacing it atomically.
    pub fn save(&self, slot_name: &str, save: &StandingsSave) -> SaveResult<()> {
        Self::validate_slot_name(slot_name)?;
        self.ensure_save_dir()?;

        let bytes = save.to_bytes()?;
        let temp_path = self.temp_path(slot_name);
        let final_path = self.slot_path(slot_name);

        let written = fs::File::create(&temp_path).and_then(|mut file| {
            file.write_all(&bytes)?;
            file.sync_all()
        });
        let result = written.and_then(|()| fs::rename(&temp_path, &final_path));

        if let Err(e) = result {
            let _ = fs::remove_file(&temp_path);
            error!("Failed to save slot {}: {}", slot_name, e);
            return Err(e.into());
        }

        info!("Saved {} standings to slot: {}", save.len(), slot_name);
        Ok(())
    }

    /// Reads standings from a slot.
    pub fn load(&self, slot_name: &str) -> SaveResult<StandingsSave> {
        Self::validate_slot_name(slot_name)?;

        let path = self.slot_path(slot_name);
        if !path.exists() {
            return Err(SaveError::NotFound(slot_name.to_string()));
        }

        let bytes = fs::read(&path)?;
        let save = StandingsSave::from_bytes(&bytes)?;
        info!("Loaded {} standings from slot: {}", save.len(), slot_name);
        Ok(save)
    }

    /// Checks if a slot exists.
    #[must_use]
    pub fn slot_exists(&self, slot_name: &str) -> bool {
        self.slot_path(slot_name).exists()
    }

    /// Deletes a save slot.
    pub fn delete_slot(&self, slot_name: &str) -> SaveResult<()> {
        Self::validate_slot_name(slot_name)?;

        let path = self.slot_path(slot_name);
        if !path.exists() {
            return Err(SaveError::NotFound(slot_name.to_string()));
        }
        fs::remove_file(&path)?;

        info!("Deleted save slot: {}", slot_name);
        Ok(())
    }

    /// Lists slot names, sorted.
    pub fn list_slots(&self) -> SaveResult<Vec<String>> {
        if !self.save_dir.exists() {
            return Ok(Vec::new());
        }

        let mut slots: Vec<String> = fs::read_dir(&self.save_dir)?
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == SAVE_EXTENSION))
            .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().to_string()))
            .collect();
        slots.sort();

        debug!("Found {} save slots", slots.len());
        Ok(slots)
    }

    /// Copies a slot to a timestamped backup slot and returns its name.
    pub fn backup_slot(&self, slot_name: &str) -> SaveResult<String> {
        Self::validate_slot_name(slot_name)?;

        let source_path = self.slot_path(slot_name);
        if !source_path.exists() {
            return Err(SaveError::NotFound(slot_name.to_string()));
        }

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_secs();

        let backup_name = format!("{slot_name}_backup_{timestamp}");
        fs::copy(&source_path, self.slot_path(&backup_name))?;

        info!("Created backup: {} -> {}", slot_name, backup_name);
        Ok(backup_name)
    }
}
