//! Stack: exile and graveyard. Cards are always appended, face-up, each one
//! sitting `count × card_thickness` above the zone origin.

use std::ops::Range;

use super::kind::AddOptions;
use super::zone::{ZoneCore, ZoneLayout};
use crate::cards::{Card, TagChange};
use crate::core::geometry::{Pose, Vec3};

#[derive(Clone, Debug)]
pub struct Stack {
    core: ZoneCore,
}

impl Stack {
    pub(super) fn new(core: ZoneCore) -> Self {
        Self { core }
    }
}

impl ZoneLayout for Stack {
    fn core(&self) -> &ZoneCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ZoneCore {
        &mut self.core
    }

    fn adopt(&mut self, card: &Card, _options: &AddOptions) -> usize {
        self.core.push_back(card.id.clone())
    }

    fn member_tags(&self, _index: usize, _card: &Card) -> Vec<TagChange> {
        vec![
            TagChange::Tapped(false),
            TagChange::Flipped(false),
            TagChange::Public(true),
        ]
    }

    fn pose_for(&self, index: usize, _card: &Card) -> Pose {
        let z = index as f32 * self.core.layout.card_thickness;
        Pose::at(self.core.origin + Vec3::new(0.0, 0.0, z))
    }

    fn reflow_after_remove(&self, index: usize) -> Range<usize> {
        index..self.core.len()
    }
}
