//! Card store (cards by id).
//!
//! One `CardStore` per session holds every card of every play area. It is
//! injected wherever cross-entity lookup is needed instead of living in a
//! process-wide global.

use rustc_hash::FxHashMap;

use super::card::Card;
use crate::core::{CardId, ClientId, Result, TableError};

/// Every card known to this session.
#[derive(Clone, Debug, Default)]
pub struct CardStore {
    cards: FxHashMap<CardId, Card>,
}

impl CardStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card. Fails if the id is already taken.
    pub fn insert(&mut self, card: Card) -> Result<()> {
        if self.cards.contains_key(&card.id) {
            return Err(TableError::DuplicateCard(card.id));
        }
        self.cards.insert(card.id.clone(), card);
        Ok(())
    }

    /// Insert or overwrite a card.
    pub fn upsert(&mut self, card: Card) {
        self.cards.insert(card.id.clone(), card);
    }

    #[must_use]
    pub fn get(&self, id: &CardId) -> Option<&Card> {
        self.cards.get(id)
    }

    pub fn get_mut(&mut self, id: &CardId) -> Option<&mut Card> {
        self.cards.get_mut(id)
    }

    /// Look a card up, failing with `CardNotFound`.
    pub fn require(&self, id: &CardId) -> Result<&Card> {
        self.cards
            .get(id)
            .ok_or_else(|| TableError::CardNotFound(id.clone()))
    }

    /// Mutable lookup, failing with `CardNotFound`.
    pub fn require_mut(&mut self, id: &CardId) -> Result<&mut Card> {
        self.cards
            .get_mut(id)
            .ok_or_else(|| TableError::CardNotFound(id.clone()))
    }

    pub fn remove(&mut self, id: &CardId) -> Option<Card> {
        self.cards.remove(id)
    }

    /// Drop every card created by `client`. Returns how many were removed.
    pub fn remove_owned_by(&mut self, client: &ClientId) -> usize {
        let before = self.cards.len();
        self.cards.retain(|_, card| &card.client_id != client);
        before - self.cards.len()
    }

    #[must_use]
    pub fn contains(&self, id: &CardId) -> bool {
        self.cards.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }
}
