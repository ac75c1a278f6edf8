//! Hand: cards laid left-to-right at a fixed spacing.

use std::ops::Range;

use super::kind::AddOptions;
use super::zone::{ZoneCore, ZoneLayout};
use crate::cards::{Card, TagChange};
use crate::core::geometry::{Pose, Vec3};

#[derive(Clone, Debug)]
pub struct Hand {
    core: ZoneCore,
}

impl Hand {
    pub(super) fn new(core: ZoneCore) -> Self {
        Self { core }
    }
}

impl ZoneLayout for Hand {
    fn core(&self) -> &ZoneCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ZoneCore {
        &mut self.core
    }

    fn adopt(&mut self, card: &Card, options: &AddOptions) -> usize {
        match options.index {
            Some(index) => self.core.insert(index, card.id.clone()),
            None => self.core.push_back(card.id.clone()),
        }
    }

    fn member_tags(&self, _index: usize, _card: &Card) -> Vec<TagChange> {
        vec![
            TagChange::Tapped(false),
            TagChange::Flipped(false),
            TagChange::Public(false),
        ]
    }

    fn pose_for(&self, index: usize, _card: &Card) -> Pose {
        // Small Z step so overlapping cards sort left-to-right.
        let offset = Vec3::new(index as f32 * self.core.layout.hand_spacing, 0.0, index as f32 * 0.01);
        Pose::at(self.core.origin + offset)
    }

    fn reflow_after_insert(&self, index: usize) -> Range<usize> {
        index + 1..self.core.len()
    }

    fn reflow_after_remove(&self, index: usize) -> Range<usize> {
        index..self.core.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationScheduler;
    use crate::cards::{CardDetail, CardStore};
    use crate::core::{CardId, ClientId, TableConfig, ZoneId};
    use crate::zones::{Zone, ZoneEnv, ZoneKind};

    fn hand_with(n: usize) -> (Zone, CardStore, AnimationScheduler<CardId>) {
        let mut cards = CardStore::new();
        let mut animator = AnimationScheduler::new();
        let mut zone = Zone::new(
            ZoneId::new("p1/hand"),
            ZoneKind::Hand,
            ClientId::new("p1"),
            0,
            &TableConfig::default(),
        );
        for i in 0..n {
            let id = CardId::new(format!("h{i}"));
            cards
                .insert(Card::new(id.clone(), ClientId::new("p1"), CardDetail::named("x")))
                .unwrap();
            let mut env = ZoneEnv { cards: &mut cards, animator: &mut animator };
            zone.add_card(&id, &AddOptions::new().immediate(), &mut env).unwrap();
        }
        (zone, cards, animator)
    }

    fn x_of(animator: &AnimationScheduler<CardId>, id: &str) -> f32 {
        animator.pose(&CardId::new(id)).unwrap().position.x
    }

    #[test]
    fn test_left_to_right() {
        let (_, _, animator) = hand_with(3);
        let spacing = TableConfig::default().layout.hand_spacing;
        assert_eq!(x_of(&animator, "h1") - x_of(&animator, "h0"), spacing);
        assert_eq!(x_of(&animator, "h2") - x_of(&animator, "h1"), spacing);
    }

    #[test]
    fn test_reflow_on_removal() {
        let (mut zone, mut cards, mut animator) = hand_with(3);
        let first_x = x_of(&animator, "h0");

        let mut env = ZoneEnv { cards: &mut cards, animator: &mut animator };
        zone.remove_card(&CardId::new("h0"), &mut env);
        animator.advance(10_000);

        assert_eq!(x_of(&animator, "h1"), first_x);
        assert_eq!(zone.len(), 2);
    }

    #[test]
    fn test_hand_cards_are_private() {
        let (zone, cards, _) = hand_with(2);
        for id in zone.cards() {
            let tags = &cards.get(id).unwrap().tags;
            assert!(!tags.is_public);
            assert!(!tags.is_tapped);
        }
    }
}
