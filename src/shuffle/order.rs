//! The shuffle descriptor.
//!
//! A Fisher–Yates pass over `n` cards makes `n - 1` choices: for each
//! position `i` from the bottom up, which index `j <= i` to swap it with.
//! Recording those choices is enough to replay the exact permutation on any
//! peer holding the same starting order, with no RNG involved.

use im::Vector;
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh64::Xxh64;

use crate::core::{CardId, GameRng, Result, TableError, ZoneId};

/// Replayable permutation plus a fingerprint of the order it applies to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShuffleOrder {
    /// `swaps[k]` is the swap partner for position `n - 1 - k`.
    pub swaps: Vec<u32>,
    /// Checksum of the pre-shuffle card sequence.
    pub checksum: u64,
}

impl ShuffleOrder {
    /// Draw a fresh permutation for `cards` from `rng`.
    #[must_use]
    pub fn generate(cards: &Vector<CardId>, rng: &mut GameRng) -> Self {
        let n = cards.len();
        let swaps = (1..n)
            .rev()
            .map(|i| rng.gen_index_inclusive(i) as u32)
            .collect();
        Self {
            swaps,
            checksum: checksum(cards),
        }
    }

    /// Number of cards this order permutes.
    #[must_use]
    pub fn card_count(&self) -> usize {
        if self.swaps.is_empty() {
            // 0 and 1 card decks are indistinguishable; both are fixed points.
            return 0;
        }
        self.swaps.len() + 1
    }

    /// Check that this order fits `cards` exactly.
    pub fn verify(&self, zone: &ZoneId, cards: &Vector<CardId>) -> Result<()> {
        let n = cards.len();
        if self.swaps.len() != n.saturating_sub(1) {
            return Err(TableError::InvalidShuffleOrder {
                order_len: self.swaps.len(),
                card_count: n,
            });
        }
        let out_of_range = self
            .swaps
            .iter()
            .enumerate()
            .any(|(k, &j)| j as usize > n - 1 - k);
        if out_of_range {
            return Err(TableError::InvalidShuffleOrder {
                order_len: self.swaps.len(),
                card_count: n,
            });
        }
        let found = checksum(cards);
        if found != self.checksum {
            return Err(TableError::ShuffleDivergence {
                zone: zone.clone(),
                expected: self.checksum,
                found,
            });
        }
        Ok(())
    }

    /// Permute `cards`. Pure: the result depends only on `cards` and `self`.
    pub fn apply(&self, zone: &ZoneId, cards: &Vector<CardId>) -> Result<Vector<CardId>> {
        self.verify(zone, cards)?;
        let mut ids: Vec<CardId> = cards.iter().cloned().collect();
        let n = ids.len();
        for (k, &j) in self.swaps.iter().enumerate() {
            ids.swap(n - 1 - k, j as usize);
        }
        Ok(ids.into_iter().collect())
    }
}

/// Order-sensitive fingerprint of a card sequence.
///
/// XXH64 over the little-endian length followed by each id and a `0xff`
/// separator. The value travels on the wire, so it must not depend on the
/// peer's word size.
#[must_use]
pub fn checksum(cards: &Vector<CardId>) -> u64 {
    let mut hasher = Xxh64::new(0);
    hasher.update(&(cards.len() as u64).to_le_bytes());
    for id in cards {
        hasher.update(id.as_str().as_bytes());
        hasher.update(&[0xff]);
    }
    hasher.digest()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck(n: usize) -> Vector<CardId> {
        (1..=n).map(|i| CardId::new(format!("p1-{i}"))).collect()
    }

    fn zone() -> ZoneId {
        ZoneId::new("p1/deck")
    }

    #[test]
    fn test_generate_shape() {
        let mut rng = GameRng::new(7);
        let order = ShuffleOrder::generate(&deck(20), &mut rng);
        assert_eq!(order.swaps.len(), 19);
        assert_eq!(order.card_count(), 20);
        for (k, &j) in order.swaps.iter().enumerate() {
            assert!(j as usize <= 19 - k);
        }
    }

    #[test]
    fn test_apply_is_a_permutation() {
        let cards = deck(30);
        let order = ShuffleOrder::generate(&cards, &mut GameRng::new(1));
        let shuffled = order.apply(&zone(), &cards).unwrap();

        let mut sorted: Vec<_> = shuffled.iter().cloned().collect();
        sorted.sort();
        let mut original: Vec<_> = cards.iter().cloned().collect();
        original.sort();
        assert_eq!(sorted, original);
        assert_ne!(shuffled, cards);
    }

    #[test]
    fn test_two_peers_converge() {
        let local = deck(15);
        let remote = deck(15);
        let order = ShuffleOrder::generate(&local, &mut GameRng::new(99));

        assert_eq!(
            order.apply(&zone(), &local).unwrap(),
            order.apply(&zone(), &remote).unwrap()
        );
    }

    #[test]
    fn test_divergent_order_is_detected() {
        let local = deck(5);
        let order = ShuffleOrder::generate(&local, &mut GameRng::new(3));

        let mut drifted = local.clone();
        drifted.swap(0, 1);
        let err = order.apply(&zone(), &drifted).unwrap_err();
        assert!(matches!(err, TableError::ShuffleDivergence { .. }));
    }

    #[test]
    fn test_wrong_length_is_rejected() {
        let order = ShuffleOrder::generate(&deck(5), &mut GameRng::new(3));
        let err = order.apply(&zone(), &deck(6)).unwrap_err();
        assert!(matches!(
            err,
            TableError::InvalidShuffleOrder { order_len: 4, card_count: 6 }
        ));
    }

    #[test]
    fn test_out_of_range_swap_is_rejected() {
        let cards = deck(3);
        let order = ShuffleOrder {
            swaps: vec![0, 2],
            checksum: checksum(&cards),
        };
        assert!(order.apply(&zone(), &cards).is_err());
    }

    #[test]
    fn test_checksum_is_pinned() {
        assert_eq!(checksum(&Vector::new()), 0x34c9_6acd_cadb_1bbb);
        assert_eq!(checksum(&deck(3)), 0x2f85_f4c0_606e_19b4);
    }

    #[test]
    fn test_trivial_decks() {
        for n in [0, 1] {
            let cards = deck(n);
            let order = ShuffleOrder::generate(&cards, &mut GameRng::new(0));
            assert!(order.swaps.is_empty());
            assert_eq!(order.apply(&zone(), &cards).unwrap(), cards);
        }
    }
}
