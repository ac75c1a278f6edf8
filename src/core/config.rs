//! Table configuration.
//!
//! A `TableConfig` is built once per session and shared by every component:
//! - `LayoutConfig`: card dimensions and per-zone layout constants
//! - `AnimationConfig`: tween defaults
//! - `ReplayConfig`: pacing of replayed events
//!
//! Every section deserializes with defaults for missing fields, so a JSON
//! document only needs to mention what it overrides.

use serde::{Deserialize, Serialize};

use super::error::{Result, TableError};
use super::geometry::Vec3;
use crate::zones::ZoneKind;

/// Card dimensions and zone layout constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub card_width: f32,
    pub card_height: f32,
    /// Z increment per card in exile/graveyard piles.
    pub card_thickness: f32,
    /// Z increment per card in the deck.
    pub deck_pitch: f32,
    /// Horizontal distance between neighbouring hand cards.
    pub hand_spacing: f32,
    /// Column count of grid zones (peek, reveal, token search).
    pub grid_columns: usize,
    pub grid_cell_width: f32,
    pub grid_cell_height: f32,
    /// Horizontal distance between cards in field layout mode.
    pub field_spacing: f32,
    /// Distance between automatically placed battlefield cards.
    pub battlefield_slot_spacing: f32,
    /// Offset applied when a card is snapped onto an existing battlefield stack.
    pub snap_offset: Vec3,
    /// Vertical distance between seats.
    pub seat_spacing: f32,
    pub deck_origin: Vec3,
    pub hand_origin: Vec3,
    pub battlefield_origin: Vec3,
    pub exile_origin: Vec3,
    pub graveyard_origin: Vec3,
    pub grid_origin: Vec3,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            card_width: 63.0,
            card_height: 88.0,
            card_thickness: 0.5,
            deck_pitch: 0.5,
            hand_spacing: 45.0,
            grid_columns: 5,
            grid_cell_width: 70.0,
            grid_cell_height: 95.0,
            field_spacing: 35.0,
            battlefield_slot_spacing: 70.0,
            snap_offset: Vec3::new(0.0, -12.0, 0.5),
            seat_spacing: 420.0,
            deck_origin: Vec3::new(320.0, -150.0, 0.0),
            hand_origin: Vec3::new(0.0, -270.0, 0.0),
            battlefield_origin: Vec3::new(-240.0, -60.0, 0.0),
            exile_origin: Vec3::new(400.0, -40.0, 0.0),
            graveyard_origin: Vec3::new(400.0, -150.0, 0.0),
            grid_origin: Vec3::new(-140.0, 120.0, 40.0),
        }
    }
}

impl LayoutConfig {
    /// World-space origin of a zone of `kind` belonging to the player in `seat`.
    #[must_use]
    pub fn origin_for(&self, kind: ZoneKind, seat: usize) -> Vec3 {
        let base = match kind {
            ZoneKind::Deck => self.deck_origin,
            ZoneKind::Hand => self.hand_origin,
            ZoneKind::Battlefield => self.battlefield_origin,
            ZoneKind::Exile => self.exile_origin,
            ZoneKind::Graveyard => self.graveyard_origin,
            ZoneKind::Peek | ZoneKind::Reveal | ZoneKind::TokenSearch => self.grid_origin,
        };
        base + Vec3::new(0.0, seat as f32 * self.seat_spacing, 0.0)
    }
}

/// Tween defaults.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Duration of a standard card move.
    pub duration_ms: u64,
    /// Height of the arc used for moves between zones.
    pub arc_height: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: 250,
            arc_height: 30.0,
        }
    }
}

/// Pacing of replayed events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Delay after a singleton log entry before the next one is applied.
    pub event_delay_ms: u64,
    /// Timing stamped onto locally originated bulk envelopes.
    pub bulk_timing_ms: u64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            event_delay_ms: 0,
            bulk_timing_ms: 100,
        }
    }
}

/// Complete table configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub layout: LayoutConfig,
    pub animation: AnimationConfig,
    pub replay: ReplayConfig,
    /// Cards drawn by a default mulligan.
    pub starting_hand_size: usize,
    /// Seed for locally originated shuffles. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            animation: AnimationConfig::default(),
            replay: ReplayConfig::default(),
            starting_hand_size: 7,
            seed: None,
        }
    }
}

impl TableConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: TableConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no layout rule can work with.
    pub fn validate(&self) -> Result<()> {
        let layout = &self.layout;
        if layout.grid_columns == 0 {
            return Err(TableError::InvalidConfig("grid_columns must be positive".into()));
        }
        if layout.card_width <= 0.0 || layout.card_height <= 0.0 {
            return Err(TableError::InvalidConfig(
                "card dimensions must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Use a fixed shuffle seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the default mulligan size.
    #[must_use]
    pub fn with_starting_hand_size(mut self, size: usize) -> Self {
        self.starting_hand_size = size;
        self
    }

    /// Replace the layout section.
    #[must_use]
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Set the standard tween duration.
    #[must_use]
    pub fn with_animation_duration(mut self, duration_ms: u64) -> Self {
        self.animation.duration_ms = duration_ms;
        self
    }

    /// Set replay pacing.
    #[must_use]
    pub fn with_replay(mut self, replay: ReplayConfig) -> Self {
        self.replay = replay;
        self
    }
}
