//! Table session: repositories, the transfer protocol, and play areas.
//!
//! ## Key Types
//!
//! - `TableContext`: card store, zone registry, animator, and shuffle RNG,
//!   passed explicitly into every operation
//! - `transfer_card`: the single remove-then-add path for moving cards
//! - `PlayArea`: one client's zones and the operations that publish events
//! - `PlayAreaSnapshot`: what a `join` event carries
//! - `Tabletop`: all play areas plus their shared context

pub mod context;
pub mod transfer;
pub mod play_area;
pub mod snapshot;
pub mod tabletop;

pub use context::TableContext;
pub use transfer::transfer_card;
pub use play_area::{zone_id_for, Origin, PlayArea, FIXED_ZONES};
pub use snapshot::PlayAreaSnapshot;
pub use tabletop::Tabletop;
