//! Gameplay events that move player standing.

use allegiance_common::FactionId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::faction::FactionResult;
use crate::policy::StandingPolicy;
use crate::session::FactionSession;
use crate::standing::StandingChange;

/// Player actions that affect standing with a faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StandingEvent {
    /// Player destroyed a ship of the faction
    ShipDestroyed {
        /// Faction that owned the ship
        faction: FactionId,
        /// Standing value of the ship
        value: u32,
    },
    /// Player disabled a ship of the faction
    ShipDisabled {
        /// Faction that owned the ship
        faction: FactionId,
        /// Standing value of the ship
        value: u32,
    },
    /// Player completed a mission for the faction
    MissionCompleted {
        /// Mission giver
        faction: FactionId,
        /// Standing reward
        reward: u32,
    },
    /// Player failed a mission for the faction
    MissionFailed {
        /// Mission giver
        faction: FactionId,
        /// Standing penalty
        penalty: u32,
    },
    /// Player traded at a faction market
    TradeCompleted {
        /// Market owner
        faction: FactionId,
        /// Credits traded
        volume: u32,
    },
    /// Arbitrary change requested by a script
    Scripted {
        /// Target faction
        faction: FactionId,
        /// Standing delta
        delta: i32,
        /// Whether allies and enemies are affected too
        propagate: bool,
    },
}

impl StandingEvent {
    /// Faction the event is about.
    #[must_use]
    pub const fn faction(&self) -> FactionId {
        match *self {
            Self::ShipDestroyed { faction, .. }
            | Self::ShipDisabled { faction, .. }
            | Self::MissionCompleted { faction, .. }
            | Self::MissionFailed { faction, .. }
            | Self::TradeCompleted { faction, .. }
            | Self::Scripted { faction, .. } => faction,
        }
    }

    /// Standing delta the event applies to its faction.
    #[must_use]
    pub fn delta(&self, policy: &StandingPolicy) -> i32 {
        match *self {
            Self::ShipDestroyed { value, .. } => -to_points(value),
            Self::ShipDisabled { value, .. } => -to_points(value / 2),
            Self::MissionCompleted { reward, .. } => to_points(reward),
            Self::MissionFailed { penalty, .. } => -to_points(penalty),
            Self::TradeCompleted { volume, .. } => policy.trade_delta(volume),
            Self::Scripted { delta, .. } => delta,
        }
    }

    /// Checks if the event reaches the faction's allies and enemies.
    ///
    /// Mission outcomes are a private matter between the player and the
    /// mission giver.
    #[must_use]
    pub const fn propagates(&self) -> bool {
        match *self {
            Self::ShipDestroyed { .. }
            | Self::ShipDisabled { .. }
            | Self::TradeCompleted { .. } => true,
            Self::MissionCompleted { .. } | Self::MissionFailed { .. } => false,
            Self::Scripted { propagate, .. } => propagate,
        }
    }
}

fn to_points(amount: u32) -> i32 {
    i32::try_from(amount).unwrap_or(i32::MAX)
}

impl FactionSession {
    /// Applies a gameplay event, returning every standing it changed.
    ///
    /// The event's own faction is always reported first, even when it was
    /// already saturated.
    pub fn apply_event(&mut self, event: &StandingEvent) -> FactionResult<Vec<StandingChange>> {
        let faction = event.faction();
        let delta = event.delta(self.policy());
        debug!("Applying {:?} (delta {})", event, delta);

        if event.propagates() {
            self.mod_player(faction, delta)
        } else {
            self.mod_player_raw(faction, delta).map(|change| vec![change])
        }
    }
}
