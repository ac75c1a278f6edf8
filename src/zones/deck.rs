//! Deck: a face-down pile stacked along Z at a fixed pitch.
//!
//! Index 0 is the top of the deck. Cards are hidden unless the top card has
//! been turned face-up with `set_top_revealed`, in which case visibility
//! follows position: whichever card is on top is the public one.

use std::ops::Range;

use super::kind::AddOptions;
use super::zone::{ZoneCore, ZoneLayout};
use crate::cards::{Card, TagChange};
use crate::core::geometry::{Pose, Vec3};
use crate::core::CardId;

#[derive(Clone, Debug)]
pub struct Deck {
    core: ZoneCore,
    top_revealed: bool,
}

impl Deck {
    pub(super) fn new(core: ZoneCore) -> Self {
        Self {
            core,
            top_revealed: false,
        }
    }

    /// Is the top card turned face-up?
    #[must_use]
    pub fn top_revealed(&self) -> bool {
        self.top_revealed
    }

    /// Turn the top card face-up or face-down. Callers re-layout the top card.
    pub fn set_top_revealed(&mut self, revealed: bool) {
        self.top_revealed = revealed;
    }

    #[must_use]
    pub fn top_card(&self) -> Option<&CardId> {
        self.core.cards().front()
    }

    /// The top `n` cards, top first.
    #[must_use]
    pub fn top_cards(&self, n: usize) -> Vec<CardId> {
        self.core.cards().iter().take(n).cloned().collect()
    }
}

impl ZoneLayout for Deck {
    fn core(&self) -> &ZoneCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ZoneCore {
        &mut self.core
    }

    fn adopt(&mut self, card: &Card, options: &AddOptions) -> usize {
        self.core.insert(options.index.unwrap_or(0), card.id.clone())
    }

    fn member_tags(&self, index: usize, _card: &Card) -> Vec<TagChange> {
        vec![
            TagChange::Tapped(false),
            TagChange::Flipped(false),
            TagChange::Public(index == 0 && self.top_revealed),
        ]
    }

    fn pose_for(&self, index: usize, card: &Card) -> Pose {
        let height = self.core.len().saturating_sub(index + 1) as f32;
        let position = self.core.origin + Vec3::new(0.0, 0.0, height * self.core.layout.deck_pitch);
        Pose::oriented(position, card.tags.is_public, false)
    }

    fn reflow_after_insert(&self, index: usize) -> Range<usize> {
        // Cards above the insertion point rise; a new top demotes the old one.
        if index == 0 {
            1..2
        } else {
            0..index
        }
    }

    fn reflow_after_remove(&self, index: usize) -> Range<usize> {
        0..index.max(1)
    }
}
