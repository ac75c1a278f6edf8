//! # ccg-table
//!
//! Replicated state for a shared multiplayer card table.
//!
//! ## Design Principles
//!
//! 1. **Commit First, Animate Later**: Every operation commits its zone
//!    changes synchronously. Visual transitions are queued separately and
//!    never gate correctness.
//!
//! 2. **Replay, Don't Re-derive**: Each local operation publishes one event
//!    carrying everything a peer needs to reproduce it (tag snapshots, zone
//!    ids, shuffle orders). Remote peers apply those recorded values.
//!
//! 3. **Explicit Repositories**: Cards, zones, and the animator live in a
//!    `TableContext` passed into operations, not in process-wide globals.
//!
//! ## Architecture
//!
//! - **Closed Zone Variants**: Deck, Hand, Battlefield, Stack, and Grid
//!   behind one `Zone` enum, each supplying its own layout rule.
//!
//! - **Pure Tag Reducer**: Card tag writes go through `apply_tag_change`,
//!   with side effects listed in the `TAG_RULES` table.
//!
//! - **Persistent Sequences**: Zone contents are `im::Vector`s, so snapshots
//!   and shuffle validation copy in O(1).
//!
//! ## Modules
//!
//! - `core`: Ids, geometry, RNG, configuration, errors, clock, logging
//! - `cards`: Cards, detail payloads, tags, the card store
//! - `zones`: Zone variants, layout, the zone registry
//! - `animation`: Animation groups and tweens
//! - `shuffle`: Replayable shuffle orders
//! - `events`: Wire events, the ordered log, per-area emitters
//! - `table`: Transfer protocol, play areas, the tabletop session
//! - `replication`: Log replay, handler table, activity log

pub mod core;
pub mod cards;
pub mod zones;
pub mod animation;
pub mod shuffle;
pub mod events;
pub mod table;
pub mod replication;

// Re-export commonly used types
pub use crate::core::{
    CardId, ClientId, ZoneId, IdAllocator,
    Pose, Vec3,
    GameRng, GameRngState,
    AnimationConfig, LayoutConfig, ReplayConfig, TableConfig,
    Result, TableError,
    Clock, ManualClock, SystemClock,
};

pub use crate::cards::{
    apply_tag_change, AttributeValue, Card, CardDetail, CardStore, CardTags, Modifiers,
    TagChange, TagOverrides,
};

pub use crate::zones::{AddOptions, GridLayout, Zone, ZoneKind, ZoneRegistry, ZoneSnapshot};

pub use crate::animation::{AnimationHandle, AnimationScheduler, AnimationSpec, Completion};

pub use crate::shuffle::ShuffleOrder;

pub use crate::events::{Event, EventBody, EventEmitter, EventKind, MemoryLog, OrderedLog};

pub use crate::table::{transfer_card, PlayArea, PlayAreaSnapshot, TableContext, Tabletop};

pub use crate::replication::{ActivityLog, HandlerTable, Replicator};
