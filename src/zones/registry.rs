//! Zone registry: every zone on the table by id, plus a card → zone index.
//!
//! The index is what lets a transfer find a card that is not where the
//! caller claims it is, and what keeps a card from ever sitting in two
//! zones at once.

use rustc_hash::FxHashMap;
use tracing::{error, warn};

use super::kind::AddOptions;
use super::zone::{Zone, ZoneEnv};
use crate::animation::AnimationHandle;
use crate::core::{CardId, ClientId, Result, TableError, ZoneId};

#[derive(Clone, Debug, Default)]
pub struct ZoneRegistry {
    zones: FxHashMap<ZoneId, Zone>,
    locations: FxHashMap<CardId, ZoneId>,
}

impl ZoneRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a zone, replacing any zone with the same id.
    pub fn register(&mut self, zone: Zone) -> Option<Zone> {
        for card in zone.cards() {
            self.locations.insert(card.clone(), zone.id().clone());
        }
        let previous = self.zones.insert(zone.id().clone(), zone);
        if let Some(old) = &previous {
            warn!(zone = %old.id(), "zone re-registered");
        }
        previous
    }

    #[must_use]
    pub fn get(&self, id: &ZoneId) -> Option<&Zone> {
        self.zones.get(id)
    }

    pub fn get_mut(&mut self, id: &ZoneId) -> Option<&mut Zone> {
        self.zones.get_mut(id)
    }

    pub fn require(&self, id: &ZoneId) -> Result<&Zone> {
        self.zones
            .get(id)
            .ok_or_else(|| TableError::ZoneNotFound(id.clone()))
    }

    pub fn require_mut(&mut self, id: &ZoneId) -> Result<&mut Zone> {
        self.zones
            .get_mut(id)
            .ok_or_else(|| TableError::ZoneNotFound(id.clone()))
    }

    #[must_use]
    pub fn contains(&self, id: &ZoneId) -> bool {
        self.zones.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.values()
    }

    /// Drop a zone and its card locations. The cards themselves stay in the store.
    pub fn remove_zone(&mut self, id: &ZoneId) -> Option<Zone> {
        let zone = self.zones.remove(id)?;
        for card in zone.cards() {
            if self.locations.get(card) == Some(id) {
                self.locations.remove(card);
            }
        }
        Some(zone)
    }

    /// Ids of every zone owned by `client`, sorted for stable teardown.
    #[must_use]
    pub fn zones_owned_by(&self, client: &ClientId) -> Vec<ZoneId> {
        let mut ids: Vec<ZoneId> = self
            .zones
            .values()
            .filter(|zone| zone.owner() == client)
            .map(|zone| zone.id().clone())
            .collect();
        ids.sort();
        ids
    }

    /// Where the index says `card` lives.
    #[must_use]
    pub fn location_of(&self, card: &CardId) -> Option<&ZoneId> {
        self.locations.get(card)
    }

    /// Zones whose backing sequence actually holds `card`. Scans every zone.
    #[must_use]
    pub fn zones_containing(&self, card: &CardId) -> Vec<ZoneId> {
        self.zones
            .values()
            .filter(|zone| zone.contains(card))
            .map(|zone| zone.id().clone())
            .collect()
    }

    /// Add `card` to `zone_id`, detaching it first if it is still indexed elsewhere.
    pub fn add_card(
        &mut self,
        zone_id: &ZoneId,
        card: &CardId,
        options: &AddOptions,
        env: &mut ZoneEnv<'_>,
    ) -> Result<AnimationHandle> {
        if !self.zones.contains_key(zone_id) {
            return Err(TableError::ZoneNotFound(zone_id.clone()));
        }
        if let Some(current) = self.locations.get(card).cloned() {
            error!(card = %card, zone = %current, target = %zone_id, "add_card: card already in a zone, detaching");
            self.remove_card(&current, card, env);
        }

        let zone = self.require_mut(zone_id)?;
        let handle = zone.add_card(card, options, env)?;
        self.locations.insert(card.clone(), zone_id.clone());
        Ok(handle)
    }

    /// Remove `card` from `zone_id`. Returns `false` if it was not there.
    pub fn remove_card(&mut self, zone_id: &ZoneId, card: &CardId, env: &mut ZoneEnv<'_>) -> bool {
        let Some(zone) = self.zones.get_mut(zone_id) else {
            error!(card = %card, zone = %zone_id, "remove_card: zone not registered");
            return false;
        };
        let removed = zone.remove_card(card, env);
        if removed && self.locations.get(card) == Some(zone_id) {
            self.locations.remove(card);
        }
        removed
    }

    /// Remove `card` from wherever it actually is. Returns the zones it was taken from.
    ///
    /// Consults the location index first, then falls back to a full scan so a
    /// stale index cannot leave a duplicate behind.
    pub fn detach(&mut self, card: &CardId, env: &mut ZoneEnv<'_>) -> Vec<ZoneId> {
        let mut detached = Vec::new();
        if let Some(indexed) = self.locations.get(card).cloned() {
            if self.remove_card(&indexed, card, env) {
                warn!(card = %card, zone = %indexed, "healed stale card location");
                detached.push(indexed);
            }
        }
        for zone_id in self.zones_containing(card) {
            if self.remove_card(&zone_id, card, env) {
                warn!(card = %card, zone = %zone_id, "removed unindexed card from zone");
                detached.push(zone_id);
            }
        }
        self.locations.remove(card);
        detached
    }

    /// Forget a card entirely (after it was removed from the store).
    pub(crate) fn forget_card(&mut self, card: &CardId) {
        self.locations.remove(card);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationScheduler;
    use crate::cards::{Card, CardDetail, CardStore};
    use crate::core::TableConfig;
    use crate::zones::ZoneKind;

    struct Fixture {
        registry: ZoneRegistry,
        cards: CardStore,
        animator: AnimationScheduler<CardId>,
    }

    impl Fixture {
        fn new() -> Self {
            let config = TableConfig::default();
            let mut registry = ZoneRegistry::new();
            for kind in [ZoneKind::Hand, ZoneKind::Graveyard] {
                registry.register(Zone::new(
                    ZoneId::new(format!("p1/{kind}")),
                    kind,
                    ClientId::new("p1"),
                    0,
                    &config,
                ));
            }
            registry.register(Zone::new(
                ZoneId::new("p2/hand"),
                ZoneKind::Hand,
                ClientId::new("p2"),
                1,
                &config,
            ));

            let mut cards = CardStore::new();
            cards
                .insert(Card::new(CardId::new("p1-1"), ClientId::new("p1"), CardDetail::named("x")))
                .unwrap();
            Self {
                registry,
                cards,
                animator: AnimationScheduler::new(),
            }
        }

        fn env(&mut self) -> (&mut ZoneRegistry, ZoneEnv<'_>) {
            (
                &mut self.registry,
                ZoneEnv {
                    cards: &mut self.cards,
                    animator: &mut self.animator,
                },
            )
        }
    }

    fn hand() -> ZoneId {
        ZoneId::new("p1/hand")
    }

    fn graveyard() -> ZoneId {
        ZoneId::new("p1/graveyard")
    }

    fn card() -> CardId {
        CardId::new("p1-1")
    }

    #[test]
    fn test_add_indexes_location() {
        let mut fx = Fixture::new();
        let (registry, mut env) = fx.env();
        registry.add_card(&hand(), &card(), &AddOptions::new(), &mut env).unwrap();

        assert_eq!(registry.location_of(&card()), Some(&hand()));
        assert_eq!(registry.zones_containing(&card()), vec![hand()]);
    }

    #[test]
    fn test_add_to_unknown_zone() {
        let mut fx = Fixture::new();
        let (registry, mut env) = fx.env();
        let err = registry
            .add_card(&ZoneId::new("nowhere"), &card(), &AddOptions::new(), &mut env)
            .unwrap_err();
        assert!(matches!(err, TableError::ZoneNotFound(_)));
    }

    #[test]
    fn test_double_add_detaches_first() {
        let mut fx = Fixture::new();
        let (registry, mut env) = fx.env();
        registry.add_card(&hand(), &card(), &AddOptions::new(), &mut env).unwrap();
        registry.add_card(&graveyard(), &card(), &AddOptions::new(), &mut env).unwrap();

        assert_eq!(registry.zones_containing(&card()), vec![graveyard()]);
        assert!(registry.get(&hand()).unwrap().is_empty());
    }

    #[test]
    fn test_remove_from_wrong_zone_then_detach() {
        let mut fx = Fixture::new();
        let (registry, mut env) = fx.env();
        registry.add_card(&hand(), &card(), &AddOptions::new(), &mut env).unwrap();

        assert!(!registry.remove_card(&graveyard(), &card(), &mut env));
        assert_eq!(registry.location_of(&card()), Some(&hand()));

        assert_eq!(registry.detach(&card(), &mut env), vec![hand()]);
        assert_eq!(registry.location_of(&card()), None);
        assert!(registry.zones_containing(&card()).is_empty());
    }

    #[test]
    fn test_remove_zone_clears_locations() {
        let mut fx = Fixture::new();
        let (registry, mut env) = fx.env();
        registry.add_card(&hand(), &card(), &AddOptions::new(), &mut env).unwrap();

        let removed = registry.remove_zone(&hand()).unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(registry.location_of(&card()), None);
        assert!(!registry.contains(&hand()));
    }

    #[test]
    fn test_zones_owned_by() {
        let fx = Fixture::new();
        assert_eq!(
            fx.registry.zones_owned_by(&ClientId::new("p1")),
            vec![graveyard(), hand()]
        );
        assert_eq!(fx.registry.zones_owned_by(&ClientId::new("p2")).len(), 1);
    }
}
