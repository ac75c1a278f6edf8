//! Identifiers for clients, cards, and zones.
//!
//! All identifiers are strings so they can travel over the wire unchanged.
//! Card ids are generated client-side by an `IdAllocator` scoped to the
//! generating client, which keeps them globally unique without any
//! coordination between peers.
//!
//! ## Usage
//!
//! ```
//! use ccg_table::core::{ClientId, IdAllocator};
//!
//! let mut ids = IdAllocator::new(ClientId::new("alice"));
//! let first = ids.next_card_id();
//! let second = ids.next_card_id();
//!
//! assert_eq!(first.as_str(), "alice-1");
//! assert_ne!(first, second);
//! ```

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create an identifier from any string-like value.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identity of a connected peer. Also the identity of its play area.
    ClientId
);

string_id!(
    /// Globally unique card identity.
    CardId
);

string_id!(
    /// Unique zone identity, shared by every peer holding a replica of the zone.
    ZoneId
);

/// Allocates card ids of the form `{client}-{n}`.
///
/// Counters start at 1. Restoring an allocator after hydrating a snapshot is
/// done with `observe`, which bumps the counter past any id already in use.
#[derive(Clone, Debug)]
pub struct IdAllocator {
    client: ClientId,
    next: u64,
}

impl IdAllocator {
    /// Create an allocator for ids owned by `client`.
    #[must_use]
    pub fn new(client: ClientId) -> Self {
        Self { client, next: 1 }
    }

    /// The client this allocator generates ids for.
    #[must_use]
    pub fn client(&self) -> &ClientId {
        &self.client
    }

    /// Allocate the next card id.
    pub fn next_card_id(&mut self) -> CardId {
        let id = CardId(format!("{}-{}", self.client, self.next));
        self.next += 1;
        id
    }

    /// Make sure future ids never collide with `id`.
    ///
    /// Ids that were not produced for this client are ignored.
    pub fn observe(&mut self, id: &CardId) {
        let Some(suffix) = id
            .as_str()
            .strip_prefix(self.client.as_str())
            .and_then(|rest| rest.strip_prefix('-'))
        else {
            return;
        };
        if let Ok(n) = suffix.parse::<u64>() {
            self.next = self.next.max(n + 1);
        }
    }
}
