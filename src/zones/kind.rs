//! Zone kinds and insertion options.

use serde::{Deserialize, Serialize};

use crate::core::geometry::Vec3;

/// The kind tag carried by every zone and mirrored into card tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ZoneKind {
    Deck,
    Hand,
    Battlefield,
    Exile,
    Graveyard,
    Peek,
    Reveal,
    TokenSearch,
}

impl ZoneKind {
    /// Kinds backed by a `Grid` zone.
    pub const GRIDS: [ZoneKind; 3] = [ZoneKind::Peek, ZoneKind::Reveal, ZoneKind::TokenSearch];

    /// Ephemeral grid kinds (peek, reveal, token search).
    #[must_use]
    pub fn is_grid(self) -> bool {
        matches!(self, ZoneKind::Peek | ZoneKind::Reveal | ZoneKind::TokenSearch)
    }

    /// Stack kinds (exile, graveyard).
    #[must_use]
    pub fn is_stack(self) -> bool {
        matches!(self, ZoneKind::Exile | ZoneKind::Graveyard)
    }

    /// Wire name, also used in zone ids.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ZoneKind::Deck => "deck",
            ZoneKind::Hand => "hand",
            ZoneKind::Battlefield => "battlefield",
            ZoneKind::Exile => "exile",
            ZoneKind::Graveyard => "graveyard",
            ZoneKind::Peek => "peek",
            ZoneKind::Reveal => "reveal",
            ZoneKind::TokenSearch => "tokenSearch",
        }
    }

    /// Inverse of `as_str`.
    #[must_use]
    pub fn parse(name: &str) -> Option<ZoneKind> {
        [
            ZoneKind::Deck,
            ZoneKind::Hand,
            ZoneKind::Battlefield,
            ZoneKind::Exile,
            ZoneKind::Graveyard,
            ZoneKind::Peek,
            ZoneKind::Reveal,
            ZoneKind::TokenSearch,
        ]
        .into_iter()
        .find(|kind| kind.as_str() == name)
    }
}

impl std::fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for `Zone::add_card`.
///
/// Travels inside `transferCard` and `createCard` payloads so the remote
/// peer inserts at the same place.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddOptions {
    /// Drop point on the battlefield.
    pub position: Option<Vec3>,
    /// Insertion index in the zone's sequence. For decks 0 is the top.
    pub index: Option<usize>,
    /// Place immediately instead of tweening.
    pub skip_animation: bool,
}

impl AddOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn at_position(position: Vec3) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn at_index(index: usize) -> Self {
        Self {
            index: Some(index),
            ..Self::default()
        }
    }

    /// Same options with animation skipped.
    #[must_use]
    pub fn immediate(mut self) -> Self {
        self.skip_animation = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in [ZoneKind::Deck, ZoneKind::Graveyard, ZoneKind::TokenSearch] {
            assert_eq!(ZoneKind::parse(kind.as_str()), Some(kind));
            assert_eq!(
                serde_json::to_value(kind).unwrap(),
                serde_json::Value::String(kind.as_str().to_string())
            );
        }
        assert_eq!(ZoneKind::parse("library"), None);
    }

    #[test]
    fn test_kind_classes() {
        assert!(ZoneKind::Peek.is_grid());
        assert!(!ZoneKind::Hand.is_grid());
        assert!(ZoneKind::Exile.is_stack());
        assert!(!ZoneKind::Battlefield.is_stack());
    }

    #[test]
    fn test_add_options_wire_shape() {
        let options = AddOptions::at_position(Vec3::new(1.0, 2.0, 0.0)).immediate();
        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json["position"]["x"], 1.0);
        assert_eq!(json["skipAnimation"], true);

        let parsed: AddOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, AddOptions::default());
    }
}
