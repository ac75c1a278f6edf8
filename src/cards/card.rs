//! Card entity: identity + payload + tag set.

use serde::{Deserialize, Serialize};

use super::attributes::CardDetail;
use super::tags::{apply_tag_change, CardTags, TagChange};
use crate::core::{CardId, ClientId};

/// A card on the table.
///
/// A card has no behavior of its own. Its `tags` only change through
/// `apply`, which routes every write through the tag reducer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    /// Client whose play area created the card.
    pub client_id: ClientId,
    pub detail: CardDetail,
    #[serde(default)]
    pub tags: CardTags,
}

impl Card {
    /// Create an untagged card. Tags are filled in when a zone adopts it.
    #[must_use]
    pub fn new(id: CardId, client_id: ClientId, detail: CardDetail) -> Self {
        Self {
            id,
            client_id,
            detail,
            tags: CardTags::default(),
        }
    }

    /// Apply one tag write in place.
    pub fn apply(&mut self, change: TagChange) {
        *self = apply_tag_change(self, change);
    }

    /// Apply several tag writes in order.
    pub fn apply_all(&mut self, changes: impl IntoIterator<Item = TagChange>) {
        for change in changes {
            self.apply(change);
        }
    }

    /// Copy of this card under a new identity, with transient tags reset.
    ///
    /// The clone keeps detail, visibility, flip state and modifiers but is
    /// untapped and not yet in any zone.
    #[must_use]
    pub fn duplicate(&self, new_id: CardId) -> Card {
        let mut copy = self.clone();
        copy.id = new_id;
        copy.tags.is_tapped = false;
        copy.tags.is_dragging = false;
        copy.tags.zone_id = None;
        copy.tags.location = None;
        copy.tags.previous_zone_id = None;
        copy.tags.previous_location = None;
        copy
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.detail.name
    }
}
