//! Card tag set and the pure tag reducer.
//!
//! Tags are the derived, ephemeral state layered over card identity:
//! where the card is, whether it is visible, tapped, flipped, and any
//! power/toughness/counter modifiers.
//!
//! Tags are never poked directly by zone code. Every change goes through
//! `apply_tag_change`, which runs the field-specific side effects listed in
//! `TAG_RULES` and returns a new card. The rules fire in table order:
//!
//! | field      | phase  | effect                                   |
//! |------------|--------|------------------------------------------|
//! | location   | before | snapshot `previousLocation` on change    |
//! | zoneId     | before | snapshot `previousZoneId` on change      |
//! | location   | after  | clear modifiers unless on the battlefield|
//! | location   | after  | clear `isInGrid` unless in a grid zone   |
//! | isFlipped  | after  | a face-down card is never public         |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::card::Card;
use crate::core::ZoneId;
use crate::zones::ZoneKind;

/// Power/toughness deltas and named counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub power: i64,
    pub toughness: i64,
    pub counters: BTreeMap<String, i64>,
}

impl Modifiers {
    /// True when no modifier is in effect.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.power == 0 && self.toughness == 0 && self.counters.values().all(|&n| n == 0)
    }

    /// Adjust a named counter, dropping it when it reaches zero.
    pub fn add_counter(&mut self, name: &str, delta: i64) {
        let value = self.counters.entry(name.to_string()).or_insert(0);
        *value += delta;
        if *value == 0 {
            self.counters.remove(name);
        }
    }

    /// Current value of a named counter.
    #[must_use]
    pub fn counter(&self, name: &str) -> i64 {
        self.counters.get(name).copied().unwrap_or(0)
    }
}

/// Per-card derived state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardTags {
    pub location: Option<ZoneKind>,
    pub zone_id: Option<ZoneId>,
    pub is_public: bool,
    pub is_tapped: bool,
    pub is_flipped: bool,
    pub is_dragging: bool,
    pub is_in_grid: bool,
    pub previous_location: Option<ZoneKind>,
    pub previous_zone_id: Option<ZoneId>,
    #[serde(default)]
    pub modifiers: Modifiers,
}

/// Tag fields addressable by the reducer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagField {
    Location,
    ZoneId,
    Public,
    Tapped,
    Flipped,
    Dragging,
    InGrid,
    Modifiers,
}

/// A single tag write.
#[derive(Clone, Debug, PartialEq)]
pub enum TagChange {
    Location(ZoneKind),
    ZoneId(ZoneId),
    Public(bool),
    Tapped(bool),
    Flipped(bool),
    Dragging(bool),
    InGrid(bool),
    Modifiers(Modifiers),
}

impl TagChange {
    /// The field this change writes.
    #[must_use]
    pub fn field(&self) -> TagField {
        match self {
            TagChange::Location(_) => TagField::Location,
            TagChange::ZoneId(_) => TagField::ZoneId,
            TagChange::Public(_) => TagField::Public,
            TagChange::Tapped(_) => TagField::Tapped,
            TagChange::Flipped(_) => TagField::Flipped,
            TagChange::Dragging(_) => TagField::Dragging,
            TagChange::InGrid(_) => TagField::InGrid,
            TagChange::Modifiers(_) => TagField::Modifiers,
        }
    }
}

/// When a rule runs relative to the write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RulePhase {
    Before,
    After,
}

/// Side effect attached to a tag write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagEffect {
    SnapshotPreviousLocation,
    SnapshotPreviousZoneId,
    ClearModifiersOffBattlefield,
    ClearGridFlagOutsideGrid,
    HideWhenFlipped,
}

/// One row of the rule table.
#[derive(Clone, Copy, Debug)]
pub struct TagRule {
    pub field: TagField,
    pub phase: RulePhase,
    pub effect: TagEffect,
}

/// Field-specific side effects, applied in order.
pub const TAG_RULES: &[TagRule] = &[
    TagRule {
        field: TagField::Location,
        phase: RulePhase::Before,
        effect: TagEffect::SnapshotPreviousLocation,
    },
    TagRule {
        field: TagField::ZoneId,
        phase: RulePhase::Before,
        effect: TagEffect::SnapshotPreviousZoneId,
    },
    TagRule {
        field: TagField::Location,
        phase: RulePhase::After,
        effect: TagEffect::ClearModifiersOffBattlefield,
    },
    TagRule {
        field: TagField::Location,
        phase: RulePhase::After,
        effect: TagEffect::ClearGridFlagOutsideGrid,
    },
    TagRule {
        field: TagField::Flipped,
        phase: RulePhase::After,
        effect: TagEffect::HideWhenFlipped,
    },
];

fn run_effect(effect: TagEffect, tags: &mut CardTags, change: &TagChange) {
    match (effect, change) {
        (TagEffect::SnapshotPreviousLocation, TagChange::Location(next)) => {
            if tags.location != Some(*next) {
                tags.previous_location = tags.location;
            }
        }
        (TagEffect::SnapshotPreviousZoneId, TagChange::ZoneId(next)) => {
            if tags.zone_id.as_ref() != Some(next) {
                tags.previous_zone_id = tags.zone_id.clone();
            }
        }
        (TagEffect::ClearModifiersOffBattlefield, _) => {
            if tags.location != Some(ZoneKind::Battlefield) {
                tags.modifiers = Modifiers::default();
            }
        }
        (TagEffect::ClearGridFlagOutsideGrid, _) => {
            if !tags.location.is_some_and(ZoneKind::is_grid) {
                tags.is_in_grid = false;
            }
        }
        (TagEffect::HideWhenFlipped, _) => {
            if tags.is_flipped {
                tags.is_public = false;
            }
        }
        _ => {}
    }
}

fn write_field(tags: &mut CardTags, change: TagChange) {
    match change {
        TagChange::Location(kind) => tags.location = Some(kind),
        TagChange::ZoneId(id) => tags.zone_id = Some(id),
        TagChange::Public(v) => tags.is_public = v,
        TagChange::Tapped(v) => tags.is_tapped = v,
        TagChange::Flipped(v) => tags.is_flipped = v,
        TagChange::Dragging(v) => tags.is_dragging = v,
        TagChange::InGrid(v) => tags.is_in_grid = v,
        TagChange::Modifiers(m) => tags.modifiers = m,
    }
}

/// Apply one tag write and its rules, returning the updated card.
#[must_use]
pub fn apply_tag_change(card: &Card, change: TagChange) -> Card {
    let mut next = card.clone();
    let field = change.field();
    let rules = |phase: RulePhase| {
        TAG_RULES
            .iter()
            .filter(move |rule| rule.field == field && rule.phase == phase)
    };

    for rule in rules(RulePhase::Before) {
        run_effect(rule.effect, &mut next.tags, &change);
    }
    write_field(&mut next.tags, change.clone());
    for rule in rules(RulePhase::After) {
        run_effect(rule.effect, &mut next.tags, &change);
    }
    next
}

/// Visual tags forced onto a card during a transfer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TagOverrides {
    pub is_public: Option<bool>,
    pub is_tapped: Option<bool>,
    pub is_flipped: Option<bool>,
    pub modifiers: Option<Modifiers>,
}

impl TagOverrides {
    /// Force a face-down arrival.
    #[must_use]
    pub fn face_down() -> Self {
        Self {
            is_flipped: Some(true),
            is_public: Some(false),
            ..Self::default()
        }
    }

    /// Overrides reproducing every visual tag of `tags`.
    #[must_use]
    pub fn from_tags(tags: &CardTags) -> Self {
        Self {
            is_public: Some(tags.is_public),
            is_tapped: Some(tags.is_tapped),
            is_flipped: Some(tags.is_flipped),
            modifiers: Some(tags.modifiers.clone()),
        }
    }

    /// The writes this override set performs, flip before visibility.
    #[must_use]
    pub fn changes(&self) -> Vec<TagChange> {
        let mut changes = Vec::new();
        if let Some(v) = self.is_flipped {
            changes.push(TagChange::Flipped(v));
        }
        if let Some(v) = self.is_public {
            changes.push(TagChange::Public(v));
        }
        if let Some(v) = self.is_tapped {
            changes.push(TagChange::Tapped(v));
        }
        if let Some(m) = &self.modifiers {
            changes.push(TagChange::Modifiers(m.clone()));
        }
        changes
    }
}
