//! Shuffling a live zone.

use tracing::info;

use super::order::ShuffleOrder;
use crate::core::{GameRng, Result};
use crate::zones::{Zone, ZoneEnv};

/// Shuffle `zone` in place and return the order used.
///
/// With `existing` the permutation is replayed from the descriptor and the
/// RNG is untouched; without it a fresh order is drawn. A face-up top card is
/// turned down before the permutation and the new top turned up after, so
/// visibility keeps following position. The reorder itself animates as one
/// group.
pub fn shuffle_zone(
    zone: &mut Zone,
    existing: Option<&ShuffleOrder>,
    rng: &mut GameRng,
    env: &mut ZoneEnv<'_>,
) -> Result<ShuffleOrder> {
    let order = match existing {
        Some(order) => order.clone(),
        None => ShuffleOrder::generate(zone.cards(), rng),
    };
    let shuffled = order.apply(zone.id(), zone.cards())?;

    let was_revealed = zone.as_deck().is_some_and(|deck| deck.top_revealed());
    if was_revealed {
        if let Some(deck) = zone.as_deck_mut() {
            deck.set_top_revealed(false);
        }
        if let Some(top) = zone.cards().front().cloned() {
            zone.refresh_card(&top, env);
        }
    }

    env.animator.enqueue_group();
    zone.replace_order(shuffled);
    zone.refresh_all(false, env);

    if was_revealed {
        env.animator.enqueue_group();
        if let Some(deck) = zone.as_deck_mut() {
            deck.set_top_revealed(true);
        }
        if let Some(top) = zone.cards().front().cloned() {
            zone.refresh_card(&top, env);
        }
    }

    info!(
        zone = %zone.id(),
        cards = zone.len(),
        replayed = existing.is_some(),
        "zone shuffled"
    );
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationScheduler;
    use crate::cards::{Card, CardDetail, CardStore};
    use crate::core::{CardId, ClientId, TableConfig, ZoneId};
    use crate::zones::{AddOptions, ZoneKind};

    fn deck(n: usize) -> (Zone, CardStore, AnimationScheduler<CardId>) {
        let mut cards = CardStore::new();
        let mut animator = AnimationScheduler::new();
        let mut zone = Zone::new(
            ZoneId::new("p1/deck"),
            ZoneKind::Deck,
            ClientId::new("p1"),
            0,
            &TableConfig::default(),
        );
        for i in 1..=n {
            let id = CardId::new(format!("p1-{i}"));
            cards
                .insert(Card::new(id.clone(), ClientId::new("p1"), CardDetail::named("x")))
                .unwrap();
            let mut env = ZoneEnv { cards: &mut cards, animator: &mut animator };
            zone.add_card(&id, &AddOptions::at_index(usize::MAX).immediate(), &mut env)
                .unwrap();
        }
        (zone, cards, animator)
    }

    #[test]
    fn test_replay_matches_origin() {
        let (mut local, mut local_cards, mut local_anim) = deck(12);
        let (mut remote, mut remote_cards, mut remote_anim) = deck(12);

        let mut env = ZoneEnv { cards: &mut local_cards, animator: &mut local_anim };
        let order = shuffle_zone(&mut local, None, &mut GameRng::new(5), &mut env).unwrap();

        // The remote RNG is different; the descriptor alone decides the result
        let mut env = ZoneEnv { cards: &mut remote_cards, animator: &mut remote_anim };
        shuffle_zone(&mut remote, Some(&order), &mut GameRng::new(999), &mut env).unwrap();

        assert_eq!(local.cards(), remote.cards());
    }

    #[test]
    fn test_revealed_top_follows_new_top() {
        let (mut zone, mut cards, mut animator) = deck(10);
        let mut env = ZoneEnv { cards: &mut cards, animator: &mut animator };
        zone.as_deck_mut().unwrap().set_top_revealed(true);
        zone.refresh_all(true, &mut env);
        let old_top = zone.cards()[0].clone();

        shuffle_zone(&mut zone, None, &mut GameRng::new(11), &mut env).unwrap();

        let new_top = zone.cards()[0].clone();
        assert!(env.cards.get(&new_top).unwrap().tags.is_public);
        if new_top != old_top {
            assert!(!env.cards.get(&old_top).unwrap().tags.is_public);
        }
        let public = zone
            .cards()
            .iter()
            .filter(|id| env.cards.get(id).unwrap().tags.is_public)
            .count();
        assert_eq!(public, 1);
    }

    #[test]
    fn test_failed_replay_leaves_zone_untouched() {
        let (mut zone, mut cards, mut animator) = deck(4);
        let before = zone.cards().clone();
        let bogus = ShuffleOrder { swaps: vec![0; 7], checksum: 0 };

        let mut env = ZoneEnv { cards: &mut cards, animator: &mut animator };
        assert!(shuffle_zone(&mut zone, Some(&bogus), &mut GameRng::new(0), &mut env).is_err());
        assert_eq!(zone.cards(), &before);
    }
}
