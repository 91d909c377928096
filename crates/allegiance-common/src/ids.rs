//! Handle types for factions and the assets they reference.

use serde::{Deserialize, Serialize};

/// Handle of a faction within a loaded session.
///
/// Handles are dense indices assigned at load time. They are only meaningful
/// for the session that produced them and are not stable across reloads;
/// persisted state is keyed by faction machine name instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FactionId(u16);

impl FactionId {
    /// Creates a faction ID from a raw value.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Returns the handle as an index into a dense table.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The player pseudo-faction.
    ///
    /// Represents the observer rather than a political actor. It is never a
    /// member of the enemy/ally graph and never holds a standing.
    pub const PLAYER: Self = Self(0);

    /// Checks if this is the player pseudo-faction.
    #[must_use]
    pub const fn is_player(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for FactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque reference to a logo held by the asset subsystem.
///
/// The faction registry only stores and releases these; decoding and upload
/// belong to whoever hands them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogoHandle(u32);

impl LogoHandle {
    /// Creates a logo handle from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw handle value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}
