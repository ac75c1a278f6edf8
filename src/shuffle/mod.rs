//! Deterministic shuffles.
//!
//! The originating peer draws a permutation from its RNG and records it as a
//! `ShuffleOrder`; every other peer replays the order. A checksum of the
//! pre-shuffle sequence travels with it, so a peer whose deck has drifted
//! gets `ShuffleDivergence` instead of a silently different deck.
//!
//! ## Key Types
//!
//! - `ShuffleOrder`: Recorded Fisher–Yates choices plus checksum
//! - `shuffle_zone`: Apply (or draw) an order against a live zone

pub mod deck;
pub mod order;

pub use deck::shuffle_zone;
pub use order::{checksum, ShuffleOrder};
