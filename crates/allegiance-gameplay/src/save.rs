//! Persisted player standings.
//!
//! Standings are stored as (machine name, value) pairs. Handles are
//! reassigned on every load, so names are the only key that survives a
//! reordered or extended faction list.

use allegiance_common::{MagicBytes, SchemaVersion};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during save/load operations.
#[derive(Debug, Error)]
pub enum SaveError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid magic bytes
    #[error("Invalid save file format")]
    InvalidFormat,

    /// Version mismatch
    #[error("Incompatible save version: expected {expected}, found {found}")]
    VersionMismatch {
        /// Expected version
        expected: SchemaVersion,
        /// Found version
        found: SchemaVersion,
    },

    /// Save file not found
    #[error("Save not found: {0}")]
    NotFound(String),

    /// Invalid slot name
    #[error("Invalid slot name: {0}")]
    InvalidSlotName(String),

    /// Save file corrupted
    #[error("Save file corrupted: {0}")]
    Corrupted(String),
}

/// Result type for save operations.
pub type SaveResult<T> = Result<T, SaveError>;

/// Standing with one faction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingEntry {
    /// Faction machine name
    pub faction: String,
    /// Standing value
    pub standing: i32,
}

impl StandingEntry {
    /// Creates a new entry.
    #[must_use]
    pub fn new(faction: impl Into<String>, standing: i32) -> Self {
        Self {
            faction: faction.into(),
            standing,
        }
    }
}

/// Every standing of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsSave {
    /// Format version
    pub version: SchemaVersion,
    /// Standings in faction handle order
    pub standings: Vec<StandingEntry>,
}

impl Default for StandingsSave {
    fn default() -> Self {
        Self::new()
    }
}

impl StandingsSave {
    /// Creates an empty save at the current version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            version: SchemaVersion::STANDINGS_SAVE,
            standings: Vec::new(),
        }
    }

    /// Adds or replaces the standing for a faction.
    pub fn set(&mut self, faction: impl Into<String>, standing: i32) {
        let faction = faction.into();
        match self.standings.iter_mut().find(|e| e.faction == faction) {
            Some(entry) => entry.standing = standing,
            None => self.standings.push(StandingEntry { faction, standing }),
        }
    }

    /// Saved standing for a faction.
    #[must_use]
    pub fn get(&self, faction: &str) -> Option<i32> {
        self.standings
            .iter()
            .find(|e| e.faction == faction)
            .map(|e| e.standing)
    }

    /// Number of saved standings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.standings.len()
    }

    /// Checks if nothing is saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.standings.is_empty()
    }

    /// Serializes to binary format.
    pub fn to_bytes(&self) -> SaveResult<Vec<u8>> {
        let mut buffer = Vec::new();
        buffer.extend_from_slice(&MagicBytes::STANDINGS.0);

        let data = bincode::serialize(self).map_err(|e| SaveError::Serialization(e.to_string()))?;
        buffer.extend(data);

        Ok(buffer)
    }

    /// Deserializes from binary format.
    pub fn from_bytes(bytes: &[u8]) -> SaveResult<Self> {
        if !MagicBytes::STANDINGS.matches(bytes) {
            return Err(SaveError::InvalidFormat);
        }

        let save: Self =
            bincode::deserialize(&bytes[4..]).map_err(|e| SaveError::Corrupted(e.to_string()))?;
        save.check_version()?;

        Ok(save)
    }

    /// Serializes to pretty JSON, for inspection and hand editing.
    pub fn to_json(&self) -> SaveResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SaveError::Serialization(e.to_string()))
    }

    /// Deserializes from JSON.
    pub fn from_json(text: &str) -> SaveResult<Self> {
        let save: Self =
            serde_json::from_str(text).map_err(|e| SaveError::Corrupted(e.to_string()))?;
        save.check_version()?;
        Ok(save)
    }

    fn check_version(&self) -> SaveResult<()> {
        if SchemaVersion::STANDINGS_SAVE.can_read(&self.version) {
            Ok(())
        } else {
            Err(SaveError::VersionMismatch {
                expected: SchemaVersion::STANDINGS_SAVE,
                found: self.version,
            })
        }
    }
}
