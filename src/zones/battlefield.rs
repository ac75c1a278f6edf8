//! Battlefield: free placement with snap-to-stack.
//!
//! A card dropped at a coordinate is tested against the footprints of cards
//! already on this battlefield, as if a ray were cast straight down onto the
//! zone surface. If it hits one, the new card snaps onto the topmost hit
//! with `snap_offset`; otherwise it lands where it was dropped. Cards added
//! without a coordinate take the first free slot in a row from the origin.

use rustc_hash::FxHashMap;

use super::kind::AddOptions;
use super::zone::{ZoneCore, ZoneLayout};
use crate::cards::{Card, TagChange};
use crate::core::geometry::{Pose, Vec3};
use crate::core::CardId;

#[derive(Clone, Debug)]
pub struct Battlefield {
    core: ZoneCore,
    placements: FxHashMap<CardId, Vec3>,
}

impl Battlefield {
    pub(super) fn new(core: ZoneCore) -> Self {
        Self {
            core,
            placements: FxHashMap::default(),
        }
    }

    /// Resting position of a card on this battlefield.
    #[must_use]
    pub fn placement(&self, card: &CardId) -> Option<Vec3> {
        self.placements.get(card).copied()
    }

    /// Topmost card whose footprint contains `(x, y)`.
    #[must_use]
    pub fn ray_test(&self, x: f32, y: f32) -> Option<(&CardId, Vec3)> {
        let half_w = self.core.layout.card_width / 2.0;
        let half_h = self.core.layout.card_height / 2.0;
        self.placements
            .iter()
            .filter(|(_, p)| (x - p.x).abs() <= half_w && (y - p.y).abs() <= half_h)
            .max_by(|(a_id, a), (b_id, b)| a.z.total_cmp(&b.z).then_with(|| b_id.cmp(a_id)))
            .map(|(id, p)| (id, *p))
    }

    fn resolve_drop(&self, requested: Vec3) -> Vec3 {
        match self.ray_test(requested.x, requested.y) {
            Some((_, under)) => under + self.core.layout.snap_offset,
            None => Vec3::new(requested.x, requested.y, self.core.origin.z),
        }
    }

    fn free_slot(&self) -> Vec3 {
        let spacing = self.core.layout.battlefield_slot_spacing;
        let half = spacing / 2.0;
        (0..)
            .map(|slot| self.core.origin + Vec3::new(slot as f32 * spacing, 0.0, 0.0))
            .find(|candidate| {
                !self.placements.values().any(|p| {
                    (p.x - candidate.x).abs() < half && (p.y - candidate.y).abs() < half
                })
            })
            .unwrap_or(self.core.origin)
    }
}

impl ZoneLayout for Battlefield {
    fn core(&self) -> &ZoneCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ZoneCore {
        &mut self.core
    }

    fn adopt(&mut self, card: &Card, options: &AddOptions) -> usize {
        let position = match options.position {
            Some(requested) => self.resolve_drop(requested),
            None => self.free_slot(),
        };
        self.placements.insert(card.id.clone(), position);
        self.core.push_back(card.id.clone())
    }

    fn member_tags(&self, _index: usize, card: &Card) -> Vec<TagChange> {
        vec![TagChange::Public(!card.tags.is_flipped)]
    }

    fn pose_for(&self, _index: usize, card: &Card) -> Pose {
        let position = self.placement(&card.id).unwrap_or(self.core.origin);
        Pose::oriented(position, !card.tags.is_flipped, card.tags.is_tapped)
    }

    fn forget(&mut self, card: &CardId) {
        self.placements.remove(card);
    }
}
