//! Grid: ephemeral peek / reveal / token-search zones.
//!
//! Cards are laid out by *visible* index, so a text filter can hide
//! non-matching cards without taking them out of the sequence. Hidden cards
//! are tucked under the grid origin and keep their place in the order.

use std::ops::Range;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::kind::{AddOptions, ZoneKind};
use super::zone::{ZoneCore, ZoneLayout};
use crate::cards::{Card, CardStore, TagChange};
use crate::core::geometry::{Pose, Vec3};
use crate::core::CardId;

/// How a grid arranges its visible cards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GridLayout {
    /// Fixed-column wrap.
    #[default]
    Grid,
    /// Single overlapping row.
    Field,
}

#[derive(Clone, Debug)]
pub struct Grid {
    core: ZoneCore,
    mode: GridLayout,
    filter: String,
    hidden: FxHashSet<CardId>,
}

impl Grid {
    pub(super) fn new(core: ZoneCore) -> Self {
        Self {
            core,
            mode: GridLayout::default(),
            filter: String::new(),
            hidden: FxHashSet::default(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> GridLayout {
        self.mode
    }

    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    #[must_use]
    pub fn is_hidden(&self, card: &CardId) -> bool {
        self.hidden.contains(card)
    }

    /// Members that pass the current filter, in order.
    #[must_use]
    pub fn visible_cards(&self) -> Vec<CardId> {
        self.core
            .cards()
            .iter()
            .filter(|id| !self.hidden.contains(*id))
            .cloned()
            .collect()
    }

    /// Switch layout mode. Returns `true` if it changed; callers re-layout.
    pub(super) fn set_mode(&mut self, mode: GridLayout) -> bool {
        std::mem::replace(&mut self.mode, mode) != mode
    }

    /// Recompute the hidden set for `filter`. Callers re-layout.
    pub(super) fn apply_filter(&mut self, filter: &str, cards: &CardStore) {
        self.filter = filter.trim().to_string();
        self.hidden = self
            .core
            .cards()
            .iter()
            .filter(|id| {
                cards
                    .get(id)
                    .is_some_and(|card| !card.detail.matches_filter(&self.filter))
            })
            .cloned()
            .collect();
    }

    fn visible_index(&self, index: usize) -> usize {
        self.core
            .cards()
            .iter()
            .take(index)
            .filter(|id| !self.hidden.contains(*id))
            .count()
    }

    fn slot(&self, visible: usize) -> Vec3 {
        let layout = &self.core.layout;
        match self.mode {
            GridLayout::Grid => {
                let columns = layout.grid_columns.max(1);
                let (col, row) = (visible % columns, visible / columns);
                Vec3::new(
                    col as f32 * layout.grid_cell_width,
                    -(row as f32) * layout.grid_cell_height,
                    0.0,
                )
            }
            GridLayout::Field => {
                Vec3::new(visible as f32 * layout.field_spacing, 0.0, visible as f32 * 0.01)
            }
        }
    }
}

impl ZoneLayout for Grid {
    fn core(&self) -> &ZoneCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ZoneCore {
        &mut self.core
    }

    fn adopt(&mut self, card: &Card, options: &AddOptions) -> usize {
        if !card.detail.matches_filter(&self.filter) {
            self.hidden.insert(card.id.clone());
        }
        match options.index {
            Some(index) => self.core.insert(index, card.id.clone()),
            None => self.core.push_back(card.id.clone()),
        }
    }

    fn member_tags(&self, _index: usize, _card: &Card) -> Vec<TagChange> {
        vec![
            TagChange::InGrid(true),
            TagChange::Tapped(false),
            TagChange::Flipped(false),
            TagChange::Public(self.core.kind == ZoneKind::Reveal),
        ]
    }

    fn pose_for(&self, index: usize, card: &Card) -> Pose {
        if self.hidden.contains(&card.id) {
            return Pose::oriented(self.core.origin - Vec3::new(0.0, 0.0, 1.0), false, false);
        }
        let position = self.core.origin + self.slot(self.visible_index(index));
        Pose::oriented(position, true, false)
    }

    fn reflow_after_insert(&self, _index: usize) -> Range<usize> {
        0..self.core.len()
    }

    fn reflow_after_remove(&self, _index: usize) -> Range<usize> {
        0..self.core.len()
    }

    fn forget(&mut self, card: &CardId) {
        self.hidden.remove(card);
    }
}
