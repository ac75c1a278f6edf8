//! Crate error type.
//!
//! Only hard failures live here. Soft consistency problems (a card missing
//! from the zone that was supposed to hold it) are logged and tolerated so
//! that replay keeps going; see `zones::ZoneRegistry::remove_card`.

use thiserror::Error;

use super::ids::{CardId, ClientId, ZoneId};

/// Errors raised by table operations and replay.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("zone {0} is not registered")]
    ZoneNotFound(ZoneId),

    #[error("card {0} is not registered")]
    CardNotFound(CardId),

    #[error("no play area for client {0}")]
    PlayAreaNotFound(ClientId),

    #[error("card {0} is already registered")]
    DuplicateCard(CardId),

    #[error("no handler registered for event type `{0}`")]
    UnhandledEvent(String),

    #[error("shuffle divergence in zone {zone}: expected checksum {expected:#018x}, found {found:#018x}")]
    ShuffleDivergence {
        zone: ZoneId,
        expected: u64,
        found: u64,
    },

    #[error("shuffle order of length {order_len} does not fit a zone of {card_count} cards")]
    InvalidShuffleOrder { order_len: usize, card_count: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("binary encoding error: {0}")]
    Bincode(#[from] bincode::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TableError>;
