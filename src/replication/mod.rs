//! Replay of the shared event log.
//!
//! ## Key Types
//!
//! - `Replicator`: Log cursor, pacing queue, and dispatch
//! - `HandlerTable`: Event kind to replay handler
//! - `ActivityLog`: Coalesced human-readable history

pub mod activity;
pub mod handlers;
pub mod replicator;

pub use activity::{ActivityEntry, ActivityLog};
pub use handlers::{Handler, HandlerTable};
pub use replicator::Replicator;
