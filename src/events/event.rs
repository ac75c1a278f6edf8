//! Wire events.
//!
//! Every state-changing operation on a local play area produces one
//! `Event`. On the wire an event is a flat JSON record:
//!
//! ```json
//! {"type": "transferCard", "clientID": "alice", "payload": {"fromZoneId": "alice/hand", ...}}
//! ```
//!
//! Payloads carry enough denormalized data (tag snapshots, zone ids, shuffle
//! orders) for a remote peer to reproduce the effect without re-deriving it.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardDetail, CardTags};
use crate::core::{CardId, ClientId, Result, ZoneId};
use crate::shuffle::ShuffleOrder;
use crate::table::PlayAreaSnapshot;
use crate::zones::AddOptions;

/// One entry in the replicated log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Client that originated the event.
    #[serde(rename = "clientID")]
    pub client_id: ClientId,
    #[serde(flatten)]
    pub body: EventBody,
}

impl Event {
    #[must_use]
    pub fn new(client_id: ClientId, body: EventBody) -> Self {
        Self { client_id, body }
    }

    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.body.kind()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Event type and payload, tagged as `type` / `payload`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum EventBody {
    Join(PlayAreaSnapshot),
    Draw,
    ShuffleDeck(ShufflePayload),
    Mulligan(MulliganPayload),
    TransferCard(TransferPayload),
    Tap(CardPayload),
    Flip(CardPayload),
    Clone(ClonePayload),
    ModifyCard(CardPayload),
    CreateCard(CreateCardPayload),
    CreateCounter(CounterDefinition),
    Reveal(CardPayload),
    DeckFlipTop(DeckFlipTopPayload),
    Bulk(BulkPayload),
}

impl EventBody {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            EventBody::Join(_) => EventKind::Join,
            EventBody::Draw => EventKind::Draw,
            EventBody::ShuffleDeck(_) => EventKind::ShuffleDeck,
            EventBody::Mulligan(_) => EventKind::Mulligan,
            EventBody::TransferCard(_) => EventKind::TransferCard,
            EventBody::Tap(_) => EventKind::Tap,
            EventBody::Flip(_) => EventKind::Flip,
            EventBody::Clone(_) => EventKind::Clone,
            EventBody::ModifyCard(_) => EventKind::ModifyCard,
            EventBody::CreateCard(_) => EventKind::CreateCard,
            EventBody::CreateCounter(_) => EventKind::CreateCounter,
            EventBody::Reveal(_) => EventKind::Reveal,
            EventBody::DeckFlipTop(_) => EventKind::DeckFlipTop,
            EventBody::Bulk(_) => EventKind::Bulk,
        }
    }
}

/// Event type without payload, used as the handler key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    Join,
    Draw,
    ShuffleDeck,
    Mulligan,
    TransferCard,
    Tap,
    Flip,
    Clone,
    ModifyCard,
    CreateCard,
    CreateCounter,
    Reveal,
    DeckFlipTop,
    Bulk,
}

impl EventKind {
    pub const ALL: [EventKind; 14] = [
        EventKind::Join,
        EventKind::Draw,
        EventKind::ShuffleDeck,
        EventKind::Mulligan,
        EventKind::TransferCard,
        EventKind::Tap,
        EventKind::Flip,
        EventKind::Clone,
        EventKind::ModifyCard,
        EventKind::CreateCard,
        EventKind::CreateCounter,
        EventKind::Reveal,
        EventKind::DeckFlipTop,
        EventKind::Bulk,
    ];

    /// Wire name (`type` field).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Join => "join",
            EventKind::Draw => "draw",
            EventKind::ShuffleDeck => "shuffleDeck",
            EventKind::Mulligan => "mulligan",
            EventKind::TransferCard => "transferCard",
            EventKind::Tap => "tap",
            EventKind::Flip => "flip",
            EventKind::Clone => "clone",
            EventKind::ModifyCard => "modifyCard",
            EventKind::CreateCard => "createCard",
            EventKind::CreateCounter => "createCounter",
            EventKind::Reveal => "reveal",
            EventKind::DeckFlipTop => "deckFlipTop",
            EventKind::Bulk => "bulk",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Card identity plus its tag snapshot, flattened: `{id, location, zoneId, isPublic, ...}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardUserData {
    pub id: CardId,
    /// Present when the receiver may not know the card yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<CardDetail>,
    #[serde(flatten)]
    pub tags: CardTags,
}

impl CardUserData {
    /// Identity and tags only.
    #[must_use]
    pub fn of(card: &Card) -> Self {
        Self {
            id: card.id.clone(),
            detail: None,
            tags: card.tags.clone(),
        }
    }

    /// Identity, tags and detail.
    #[must_use]
    pub fn with_detail(card: &Card) -> Self {
        Self {
            detail: Some(card.detail.clone()),
            ..Self::of(card)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShufflePayload {
    pub order: ShuffleOrder,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MulliganPayload {
    pub order: ShuffleOrder,
    pub draw_count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferPayload {
    /// Post-move tag snapshot.
    pub user_data: CardUserData,
    pub from_zone_id: ZoneId,
    pub to_zone_id: ZoneId,
    #[serde(default)]
    pub add_options: AddOptions,
    /// Card detail, so a receiver that never saw the card can still place it.
    pub card_user_data: CardDetail,
}

/// Payload of `tap`, `flip`, `modifyCard` and `reveal`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPayload {
    pub user_data: CardUserData,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClonePayload {
    pub id: CardId,
    pub new_id: CardId,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardPayload {
    pub user_data: CardUserData,
    pub zone_id: ZoneId,
    #[serde(default)]
    pub add_options: AddOptions,
}

/// A play-area counter such as life or poison.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterDefinition {
    pub id: String,
    pub name: String,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckFlipTopPayload {
    /// New state of the top card: `true` for face-up.
    pub toggle: bool,
    /// Snapshot of the top card after the flip, if the deck is not empty.
    #[serde(default)]
    pub user_data: Option<CardUserData>,
}

/// An ordered batch of events with a replay delay between them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BulkPayload {
    /// Delay between sub-events, in milliseconds.
    pub timing: u64,
    pub events: Vec<Event>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameRng, Vec3};
    use im::Vector;
    use serde_json::json;

    fn client() -> ClientId {
        ClientId::new("alice")
    }

    #[test]
    fn test_draw_wire_shape() {
        let event = Event::new(client(), EventBody::Draw);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value, json!({"type": "draw", "clientID": "alice"}));

        let parsed: Event = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_transfer_wire_shape() {
        let mut card = Card::new(CardId::new("alice-3"), client(), CardDetail::named("Forest"));
        card.tags.is_public = true;
        let event = Event::new(
            client(),
            EventBody::TransferCard(TransferPayload {
                user_data: CardUserData::of(&card),
                from_zone_id: ZoneId::new("alice/hand"),
                to_zone_id: ZoneId::new("alice/battlefield"),
                add_options: AddOptions::at_position(Vec3::new(10.0, 20.0, 0.0)),
                card_user_data: card.detail.clone(),
            }),
        );

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "transferCard");
        assert_eq!(value["payload"]["fromZoneId"], "alice/hand");
        assert_eq!(value["payload"]["userData"]["id"], "alice-3");
        assert_eq!(value["payload"]["userData"]["isPublic"], true);
        assert_eq!(value["payload"]["addOptions"]["position"]["x"], 10.0);
        assert_eq!(value["payload"]["cardUserData"]["name"], "Forest");
        assert!(value["payload"]["userData"].get("detail").is_none());

        let round: Event = Event::from_json(&event.to_json().unwrap()).unwrap();
        assert_eq!(round, event);
    }

    #[test]
    fn test_mulligan_wire_shape() {
        let cards: Vector<CardId> = (1..=3).map(|i| CardId::new(format!("c{i}"))).collect();
        let order = ShuffleOrder::generate(&cards, &mut GameRng::new(1));
        let event = Event::new(
            client(),
            EventBody::Mulligan(MulliganPayload { order, draw_count: 7 }),
        );
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "mulligan");
        assert_eq!(value["payload"]["drawCount"], 7);
        assert_eq!(value["payload"]["order"]["swaps"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_bulk_nests_events() {
        let event = Event::new(
            client(),
            EventBody::Bulk(BulkPayload {
                timing: 100,
                events: vec![
                    Event::new(client(), EventBody::Draw),
                    Event::new(client(), EventBody::Draw),
                ],
            }),
        );
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["payload"]["timing"], 100);
        assert_eq!(value["payload"]["events"][1]["type"], "draw");
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let err = Event::from_json(r#"{"type": "teleport", "clientID": "bob", "payload": {}}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_kind_names_match_wire() {
        let draw = serde_json::to_value(Event::new(client(), EventBody::Draw)).unwrap();
        assert_eq!(draw["type"], EventKind::Draw.as_str());
        assert_eq!(EventKind::DeckFlipTop.to_string(), "deckFlipTop");
        assert_eq!(EventKind::ALL.len(), 14);
    }
}
