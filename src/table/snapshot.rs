//! Serialized play areas, carried by `join` events.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::core::{CardId, ClientId, Result};
use crate::events::CounterDefinition;
use crate::zones::ZoneSnapshot;

/// Everything a peer needs to reconstruct a play area: zone contents in
/// order plus every card they hold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayAreaSnapshot {
    pub client_id: ClientId,
    pub zones: Vec<ZoneSnapshot>,
    pub cards: Vec<Card>,
    #[serde(default)]
    pub counters: Vec<CounterDefinition>,
}

impl PlayAreaSnapshot {
    /// Compact binary form for persistence and hand-off.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    #[must_use]
    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|card| &card.id == id)
    }
}
