//! Replication events and the log they travel on.
//!
//! ## Key Types
//!
//! - `Event`: `{type, clientID, payload}` wire record
//! - `EventBody`: Typed payload per event kind
//! - `OrderedLog`: The external append-only log primitive
//! - `MemoryLog`: In-process `OrderedLog`
//! - `EventEmitter`: Per-play-area publisher with bulk envelopes

pub mod emitter;
pub mod event;
pub mod log;

pub use emitter::{EventEmitter, SubscriptionId};
pub use event::{
    BulkPayload, CardPayload, CardUserData, ClonePayload, CounterDefinition, CreateCardPayload,
    DeckFlipTopPayload, Event, EventBody, EventKind, MulliganPayload, ShufflePayload,
    TransferPayload,
};
pub use log::{MemoryLog, OrderedLog};
