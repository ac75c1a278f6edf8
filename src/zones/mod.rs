//! Zones: the card containers on the table.
//!
//! Each player owns a fixed set of zones (deck, hand, battlefield, exile,
//! graveyard) plus ephemeral grids for peek, reveal and token search. The
//! variant set is closed; `Zone` dispatches to per-variant layout rules.
//!
//! ## Key Types
//!
//! - `ZoneKind`: Kind tag, mirrored into card tags and wire payloads
//! - `AddOptions`: Where and how a card is inserted
//! - `Zone`: The closed variant {Deck, Hand, Battlefield, Stack, Grid}
//! - `ZoneLayout`: Per-variant insertion, tagging and pose rules
//! - `ZoneRegistry`: Zones by id plus the card → zone index

pub mod battlefield;
pub mod deck;
pub mod grid;
pub mod hand;
pub mod kind;
pub mod registry;
pub mod stack;
pub mod zone;

pub use battlefield::Battlefield;
pub use deck::Deck;
pub use grid::{Grid, GridLayout};
pub use hand::Hand;
pub use kind::{AddOptions, ZoneKind};
pub use registry::ZoneRegistry;
pub use stack::Stack;
pub use zone::{Zone, ZoneCore, ZoneEnv, ZoneLayout, ZoneSnapshot};
