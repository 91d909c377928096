//! Tunable standing policy.
//!
//! Range, propagation strength and the label table are game-balance
//! decisions, so they live here as named configuration instead of being
//! scattered through the engine as literals.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::presentation::{describe, StandingDisplay, StandingLabelTable, TierColours};

/// Policy validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    /// Range is empty or inverted
    #[error("Standing range is empty: min {min} must be below max {max}")]
    EmptyRange {
        /// Configured minimum
        min: i32,
        /// Configured maximum
        max: i32,
    },
    /// Default standing outside the range
    #[error("Default standing {0} lies outside the standing range")]
    DefaultOutOfRange(i32),
    /// Propagation factor would not attenuate
    #[error("Propagation factor {0} must be greater than 0 and less than 1")]
    InvalidPropagationFactor(f32),
    /// Trade scaling of zero
    #[error("Trade volume per standing point must be positive")]
    InvalidTradeScale,
}

/// Standing policy for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandingPolicy {
    /// Lowest possible standing
    pub min: i32,
    /// Highest possible standing
    pub max: i32,
    /// Standing of every faction at the start of a session
    pub default_standing: i32,
    /// Fraction of a delta passed on to allies and (negated) enemies
    pub propagation_factor: f32,
    /// Trade volume worth one standing point
    pub trade_volume_per_point: u32,
    /// Qualitative bands
    pub bands: StandingLabelTable,
    /// Colour cue per tier
    pub colours: TierColours,
}

impl Default for StandingPolicy {
    fn default() -> Self {
        Self {
            min: -100,
            max: 100,
            default_standing: 0,
            propagation_factor: 0.5,
            trade_volume_per_point: 1000,
            bands: StandingLabelTable::default(),
            colours: TierColours::default(),
        }
    }
}

impl StandingPolicy {
    /// Creates the default policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the propagation factor.
    #[must_use]
    pub fn with_propagation_factor(mut self, factor: f32) -> Self {
        self.propagation_factor = factor;
        self
    }

    /// Sets the standing range.
    #[must_use]
    pub fn with_range(mut self, min: i32, max: i32) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Checks the policy for internal consistency.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.min >= self.max {
            return Err(PolicyError::EmptyRange {
                min: self.min,
                max: self.max,
            });
        }
        if !(self.min..=self.max).contains(&self.default_standing) {
            return Err(PolicyError::DefaultOutOfRange(self.default_standing));
        }
        // Written so NaN fails too.
        if !(self.propagation_factor > 0.0 && self.propagation_factor < 1.0) {
            return Err(PolicyError::InvalidPropagationFactor(
                self.propagation_factor,
            ));
        }
        if self.trade_volume_per_point == 0 {
            return Err(PolicyError::InvalidTradeScale);
        }
        Ok(())
    }

    /// Saturates a standing to the configured range.
    #[must_use]
    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }

    /// Scales a delta for propagation, truncating toward zero.
    ///
    /// The result never exceeds `delta` in magnitude and keeps its sign
    /// (or is zero).
    #[must_use]
    pub fn attenuate(&self, delta: i32) -> i32 {
        (f64::from(delta) * f64::from(self.propagation_factor)).trunc() as i32
    }

    /// Converts a trade volume into a standing delta.
    #[must_use]
    pub fn trade_delta(&self, volume: u32) -> i32 {
        if volume == 0 {
            return 0;
        }
        let points = volume / self.trade_volume_per_point.max(1);
        i32::try_from(points.max(1)).unwrap_or(i32::MAX)
    }

    /// Label for a standing value.
    #[must_use]
    pub fn label(&self, value: i32) -> &str {
        self.bands.label(value)
    }

    /// Label, tier and colour for a standing value.
    #[must_use]
    pub fn display(&self, value: i32) -> StandingDisplay<'_> {
        describe(&self.bands, &self.colours, value)
    }
}
