//! Standing labels and colour cues.
//!
//! Maps a numeric standing to a qualitative band. Both the label and the
//! colour come out of the same band lookup, so UI text and UI colour can
//! never disagree about where a standing falls.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad disposition of a standing band, used to pick a colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandingTier {
    /// The faction will attack on sight.
    Hostile,
    /// Neither hostile nor friendly.
    Neutral,
    /// The faction treats the player as a friend.
    Friendly,
}

impl StandingTier {
    /// Checks if this tier is friendly.
    #[must_use]
    pub const fn is_friendly(self) -> bool {
        matches!(self, Self::Friendly)
    }

    /// Checks if this tier is hostile.
    #[must_use]
    pub const fn is_hostile(self) -> bool {
        matches!(self, Self::Hostile)
    }
}

/// RGBA colour (0.0 to 1.0 per channel).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Colour {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
    /// Alpha channel
    #[serde(default = "opaque")]
    pub a: f32,
}

const fn opaque() -> f32 {
    1.0
}

impl Colour {
    /// Creates a new colour.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Default hostile cue.
    pub const HOSTILE: Self = Self::new(0.9, 0.2, 0.2, 1.0);

    /// Default neutral cue.
    pub const NEUTRAL: Self = Self::new(0.9, 0.9, 0.6, 1.0);

    /// Default friendly cue.
    pub const FRIENDLY: Self = Self::new(0.2, 0.85, 0.3, 1.0);
}

/// Colour used for each standing tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierColours {
    /// Colour for hostile bands
    pub hostile: Colour,
    /// Colour for neutral bands
    pub neutral: Colour,
    /// Colour for friendly bands
    pub friendly: Colour,
}

impl Default for TierColours {
    fn default() -> Self {
        Self {
            hostile: Colour::HOSTILE,
            neutral: Colour::NEUTRAL,
            friendly: Colour::FRIENDLY,
        }
    }
}

impl TierColours {
    /// Returns the colour for a tier.
    #[must_use]
    pub const fn colour(&self, tier: StandingTier) -> Colour {
        match tier {
            StandingTier::Hostile => self.hostile,
            StandingTier::Neutral => self.neutral,
            StandingTier::Friendly => self.friendly,
        }
    }
}

/// One qualitative band of the standing range.
///
/// A band covers every value from its threshold (inclusive) up to the next
/// band's threshold (exclusive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingBand {
    /// Lowest standing in this band.
    pub threshold: i32,
    /// Label shown to the player.
    pub label: String,
    /// Disposition, drives the colour cue.
    pub tier: StandingTier,
}

impl StandingBand {
    /// Creates a new band.
    #[must_use]
    pub fn new(threshold: i32, label: impl Into<String>, tier: StandingTier) -> Self {
        Self {
            threshold,
            label: label.into(),
            tier,
        }
    }
}

/// Label table errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelTableError {
    /// No bands at all
    #[error("Standing label table is empty")]
    Empty,
    /// Bands are not in strictly ascending threshold order
    #[error("Standing band '{label}' at {threshold} is not above the previous band")]
    Unordered {
        /// Label of the offending band
        label: String,
        /// Its threshold
        threshold: i32,
    },
    /// A band has an empty label
    #[error("Standing band at {0} has an empty label")]
    EmptyLabel(i32),
}

/// Ordered set of bands partitioning the standing range.
///
/// Always holds at least one band, sorted by strictly ascending threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<StandingBand>", into = "Vec<StandingBand>")]
pub struct StandingLabelTable {
    bands: Vec<StandingBand>,
}

impl Default for StandingLabelTable {
    fn default() -> Self {
        use StandingTier::{Friendly, Hostile, Neutral};
        Self {
            bands: vec![
                StandingBand::new(-100, "Enemy", Hostile),
                StandingBand::new(-69, "Criminal", Hostile),
                StandingBand::new(-49, "Pirate", Hostile),
                StandingBand::new(-29, "Outcast", Neutral),
                StandingBand::new(0, "Wanderer", Neutral),
                StandingBand::new(31, "Decent", Friendly),
                StandingBand::new(51, "Good", Friendly),
                StandingBand::new(71, "Great", Friendly),
                StandingBand::new(91, "Admired", Friendly),
                StandingBand::new(100, "Hero", Friendly),
            ],
        }
    }
}

impl TryFrom<Vec<StandingBand>> for StandingLabelTable {
    type Error = LabelTableError;

    fn try_from(bands: Vec<StandingBand>) -> Result<Self, Self::Error> {
        Self::new(bands)
    }
}

impl From<StandingLabelTable> for Vec<StandingBand> {
    fn from(table: StandingLabelTable) -> Self {
        table.bands
    }
}

impl StandingLabelTable {
    /// Creates a table from bands sorted by ascending threshold.
    pub fn new(bands: Vec<StandingBand>) -> Result<Self, LabelTableError> {
        if bands.is_empty() {
            return Err(LabelTableError::Empty);
        }
        for band in &bands {
            if band.label.trim().is_empty() {
                return Err(LabelTableError::EmptyLabel(band.threshold));
            }
        }
        for pair in bands.windows(2) {
            if pair[1].threshold <= pair[0].threshold {
                return Err(LabelTableError::Unordered {
                    label: pair[1].label.clone(),
                    threshold: pair[1].threshold,
                });
            }
        }
        Ok(Self { bands })
    }

    /// Returns the bands in ascending order.
    #[must_use]
    pub fn bands(&self) -> &[StandingBand] {
        &self.bands
    }

    /// Returns the band a standing falls in.
    ///
    /// This is the band with the highest threshold not exceeding `value`;
    /// values below the lowest threshold fall in the lowest band.
    #[must_use]
    pub fn band(&self, value: i32) -> &StandingBand {
        let above = self.bands.partition_point(|band| band.threshold <= value);
        &self.bands[above.saturating_sub(1)]
    }

    /// Returns the label for a standing.
    #[must_use]
    pub fn label(&self, value: i32) -> &str {
        &self.band(value).label
    }

    /// Returns the tier for a standing.
    #[must_use]
    pub fn tier(&self, value: i32) -> StandingTier {
        self.band(value).tier
    }
}

/// Everything the UI needs to show a standing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandingDisplay<'a> {
    /// Numeric standing
    pub value: i32,
    /// Band label
    pub label: &'a str,
    /// Band tier
    pub tier: StandingTier,
    /// Colour cue for the tier
    pub colour: Colour,
}

/// Describes a standing value with a single band lookup.
#[must_use]
pub fn describe<'a>(
    table: &'a StandingLabelTable,
    colours: &TierColours,
    value: i32,
) -> StandingDisplay<'a> {
    let band = table.band(value);
    StandingDisplay {
        value,
        label: &band.label,
        tier: band.tier,
        colour: colours.colour(band.tier),
    }
}
