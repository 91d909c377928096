//! Version types for schema compatibility.

use serde::{Deserialize, Serialize};

use crate::error::AllegianceError;

/// Schema version using semantic versioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version (breaking changes)
    pub major: u16,
    /// Minor version (backwards-compatible additions)
    pub minor: u16,
    /// Patch version (bug fixes)
    pub patch: u16,
}

impl SchemaVersion {
    /// Creates a new schema version.
    #[must_use]
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Current faction definition file version.
    pub const FACTION_DEFS: Self = Self::new(1, 0, 0);

    /// Current standings save version.
    pub const STANDINGS_SAVE: Self = Self::new(1, 0, 0);

    /// Parses a `major.minor.patch` string.
    pub fn parse(text: &str) -> Result<Self, AllegianceError> {
        let mut parts = text.trim().split('.');
        let mut next = || -> Result<u16, AllegianceError> {
            parts
                .next()
                .and_then(|p| p.parse().ok())
                .ok_or_else(|| AllegianceError::VersionMismatch {
                    expected: "major.minor.patch".to_string(),
                    actual: text.to_string(),
                })
        };
        let major = next()?;
        let minor = next()?;
        let patch = next()?;
        Ok(Self::new(major, minor, patch))
    }

    /// Checks if this version can read data from another version.
    #[must_use]
    pub const fn can_read(&self, data_version: &Self) -> bool {
        self.major == data_version.major
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Magic bytes for file format identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagicBytes(pub [u8; 4]);

impl MagicBytes {
    /// Standings save file magic bytes.
    pub const STANDINGS: Self = Self(*b"ALST");

    /// Checks whether `bytes` starts with these magic bytes.
    #[must_use]
    pub fn matches(&self, bytes: &[u8]) -> bool {
        bytes.len() >= 4 && bytes[..4] == self.0
    }
}
