//! Human-readable activity log.
//!
//! Adjacent entries with the same author and kind collapse into one line
//! with a count, so ten draws read `alice drew a card (x10)`.

use std::fmt;

use crate::core::ClientId;
use crate::events::{Event, EventBody, EventKind};

/// One line of the activity log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityEntry {
    pub client: ClientId,
    pub kind: EventKind,
    pub text: String,
    pub count: usize,
}

impl fmt::Display for ActivityEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count > 1 {
            write!(f, "{} (x{})", self.text, self.count)
        } else {
            f.write_str(&self.text)
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ActivityLog {
    entries: Vec<ActivityEntry>,
}

impl ActivityLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `event`, folding it into the last entry when author and kind match.
    pub fn record(&mut self, event: &Event) {
        let kind = event.kind();
        if let Some(last) = self.entries.last_mut() {
            if last.client == event.client_id && last.kind == kind {
                last.count += 1;
                return;
            }
        }
        self.entries.push(ActivityEntry {
            client: event.client_id.clone(),
            kind,
            text: describe(event),
            count: 1,
        });
    }

    #[must_use]
    pub fn entries(&self) -> &[ActivityEntry] {
        &self.entries
    }

    /// Rendered lines, oldest first.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Last path segment of a zone id (`alice/graveyard` -> `graveyard`).
fn zone_name(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}

fn describe(event: &Event) -> String {
    let who = &event.client_id;
    match &event.body {
        EventBody::Join(_) => format!("{who} joined the table"),
        EventBody::Draw => format!("{who} drew a card"),
        EventBody::ShuffleDeck(_) => format!("{who} shuffled their deck"),
        EventBody::Mulligan(p) => format!("{who} mulliganed to {}", p.draw_count),
        EventBody::TransferCard(p) => {
            let card = if p.user_data.tags.is_public {
                p.card_user_data.name.as_str()
            } else {
                "a card"
            };
            format!(
                "{who} moved {card} from {} to {}",
                zone_name(p.from_zone_id.as_str()),
                zone_name(p.to_zone_id.as_str())
            )
        }
        EventBody::Tap(p) => {
            let verb = if p.user_data.tags.is_tapped { "tapped" } else { "untapped" };
            format!("{who} {verb} {}", p.user_data.id)
        }
        EventBody::Flip(p) => {
            let side = if p.user_data.tags.is_flipped { "face down" } else { "face up" };
            format!("{who} turned {} {side}", p.user_data.id)
        }
        EventBody::Clone(p) => format!("{who} cloned {}", p.id),
        EventBody::ModifyCard(p) => format!("{who} modified {}", p.user_data.id),
        EventBody::CreateCard(p) => {
            let name = p
                .user_data
                .detail
                .as_ref()
                .map_or("a card", |detail| detail.name.as_str());
            format!("{who} created {name}")
        }
        EventBody::CreateCounter(c) => format!("{who} added counter {}", c.name),
        EventBody::Reveal(p) => format!("{who} revealed {}", p.user_data.id),
        EventBody::DeckFlipTop(p) => {
            let side = if p.toggle { "face up" } else { "face down" };
            format!("{who} turned the top of their deck {side}")
        }
        EventBody::Bulk(p) => format!("{who} did {} things", p.events.len()),
    }
}
