//! Player standing store.

use allegiance_common::FactionId;
use serde::{Deserialize, Serialize};

use crate::policy::StandingPolicy;

/// One write to the standing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingChange {
    /// Faction whose standing was written
    pub faction: FactionId,
    /// Standing before the write
    pub before: i32,
    /// Standing after the write (clamped)
    pub after: i32,
}

impl StandingChange {
    /// Net change actually applied.
    #[must_use]
    pub const fn delta(&self) -> i32 {
        self.after - self.before
    }

    /// Checks if the write changed anything.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.before == self.after
    }
}

/// The player's standing with every faction of a session.
///
/// Dense table indexed by handle. Slot 0 belongs to the player
/// pseudo-faction and is never written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandingStore {
    values: Vec<i32>,
    min: i32,
    max: i32,
    default: i32,
}

impl StandingStore {
    /// Creates a store with `slots` entries at the policy's default standing.
    #[must_use]
    pub fn new(slots: usize, policy: &StandingPolicy) -> Self {
        Self {
            values: vec![policy.default_standing; slots],
            min: policy.min,
            max: policy.max,
            default: policy.default_standing,
        }
    }

    /// Current standing, `None` if the handle has no slot.
    #[must_use]
    pub fn get(&self, faction: FactionId) -> Option<i32> {
        if faction.is_player() {
            return None;
        }
        self.values.get(faction.index()).copied()
    }

    /// Clamps and stores a value unconditionally.
    pub fn set_raw(&mut self, faction: FactionId, value: i32) -> Option<StandingChange> {
        if faction.is_player() {
            return None;
        }
        let (min, max) = (self.min, self.max);
        let slot = self.values.get_mut(faction.index())?;
        let before = *slot;
        *slot = value.clamp(min, max);
        Some(StandingChange {
            faction,
            before,
            after: *slot,
        })
    }

    /// Adds a delta, saturating at the range boundaries.
    pub fn add(&mut self, faction: FactionId, delta: i32) -> Option<StandingChange> {
        let current = self.get(faction)?;
        self.set_raw(faction, current.saturating_add(delta))
    }

    /// Puts every faction back at the default standing.
    pub fn reset(&mut self) {
        self.values.fill(self.default);
    }

    /// Standing of every faction, player slot excluded.
    pub fn iter(&self) -> impl Iterator<Item = (FactionId, i32)> + '_ {
        self.values
            .iter()
            .enumerate()
            .skip(1)
            .map(|(index, &value)| (FactionId::new(index as u16), value))
    }

    /// Lowest storable standing.
    #[must_use]
    pub const fn min(&self) -> i32 {
        self.min
    }

    /// Highest storable standing.
    #[must_use]
    pub const fn max(&self) -> i32 {
        self.max
    }
}
