//! Replay handlers, keyed by event kind.
//!
//! Each handler re-runs the matching play-area operation on a remote area
//! with the recorded data, so nothing is re-derived and nothing is
//! re-published. `join` and `bulk` never reach this table: the replicator
//! handles them itself.

use rustc_hash::FxHashMap;

use crate::core::{Result, TableError};
use crate::events::{EventBody, EventKind};
use crate::table::{PlayArea, TableContext};

/// Signature shared by every replay handler.
pub type Handler = fn(&mut PlayArea, &mut TableContext, &EventBody) -> Result<()>;

/// Fixed mapping from event kind to replay handler.
#[derive(Clone, Default)]
pub struct HandlerTable {
    handlers: FxHashMap<EventKind, Handler>,
}

impl std::fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<EventKind> = self.handlers.keys().copied().collect();
        kinds.sort();
        f.debug_struct("HandlerTable").field("kinds", &kinds).finish()
    }
}

impl HandlerTable {
    /// A table with no handlers.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Handlers for every per-area event kind.
    #[must_use]
    pub fn standard() -> Self {
        let mut table = Self::empty();
        table.register(EventKind::Draw, replay_draw);
        table.register(EventKind::ShuffleDeck, replay_shuffle);
        table.register(EventKind::Mulligan, replay_mulligan);
        table.register(EventKind::TransferCard, replay_transfer);
        table.register(EventKind::Tap, replay_relayout);
        table.register(EventKind::Flip, replay_relayout);
        table.register(EventKind::ModifyCard, replay_tags);
        table.register(EventKind::Reveal, replay_tags);
        table.register(EventKind::Clone, replay_clone);
        table.register(EventKind::CreateCard, replay_create_card);
        table.register(EventKind::CreateCounter, replay_create_counter);
        table.register(EventKind::DeckFlipTop, replay_deck_flip_top);
        table
    }

    /// Install `handler` for `kind`, returning the one it replaced.
    pub fn register(&mut self, kind: EventKind, handler: Handler) -> Option<Handler> {
        self.handlers.insert(kind, handler)
    }

    pub fn unregister(&mut self, kind: EventKind) -> Option<Handler> {
        self.handlers.remove(&kind)
    }

    #[must_use]
    pub fn handles(&self, kind: EventKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Run the handler for `body` against `area`.
    pub fn dispatch(&self, area: &mut PlayArea, ctx: &mut TableContext, body: &EventBody) -> Result<()> {
        let kind = body.kind();
        let handler = self
            .handlers
            .get(&kind)
            .ok_or_else(|| TableError::UnhandledEvent(kind.to_string()))?;
        handler(area, ctx, body)
    }
}

fn mismatch(body: &EventBody) -> TableError {
    TableError::UnhandledEvent(body.kind().to_string())
}

fn replay_draw(area: &mut PlayArea, ctx: &mut TableContext, _body: &EventBody) -> Result<()> {
    area.draw(ctx).map(|_| ())
}

fn replay_shuffle(area: &mut PlayArea, ctx: &mut TableContext, body: &EventBody) -> Result<()> {
    let EventBody::ShuffleDeck(payload) = body else {
        return Err(mismatch(body));
    };
    area.shuffle(ctx, Some(&payload.order)).map(|_| ())
}

fn replay_mulligan(area: &mut PlayArea, ctx: &mut TableContext, body: &EventBody) -> Result<()> {
    let EventBody::Mulligan(payload) = body else {
        return Err(mismatch(body));
    };
    area.mulligan(ctx, payload.draw_count, Some(&payload.order))
        .map(|_| ())
}

fn replay_transfer(area: &mut PlayArea, ctx: &mut TableContext, body: &EventBody) -> Result<()> {
    let EventBody::TransferCard(payload) = body else {
        return Err(mismatch(body));
    };
    area.apply_transfer(ctx, payload).map(|_| ())
}

/// Tap and flip change the card's pose as well as its tags.
fn replay_relayout(area: &mut PlayArea, ctx: &mut TableContext, body: &EventBody) -> Result<()> {
    let (EventBody::Tap(payload) | EventBody::Flip(payload)) = body else {
        return Err(mismatch(body));
    };
    area.sync_card(ctx, &payload.user_data, true)
}

fn replay_tags(area: &mut PlayArea, ctx: &mut TableContext, body: &EventBody) -> Result<()> {
    let (EventBody::ModifyCard(payload) | EventBody::Reveal(payload)) = body else {
        return Err(mismatch(body));
    };
    area.sync_card(ctx, &payload.user_data, false)
}

fn replay_clone(area: &mut PlayArea, ctx: &mut TableContext, body: &EventBody) -> Result<()> {
    let EventBody::Clone(payload) = body else {
        return Err(mismatch(body));
    };
    area.apply_clone(ctx, &payload.id, &payload.new_id)
}

fn replay_create_card(area: &mut PlayArea, ctx: &mut TableContext, body: &EventBody) -> Result<()> {
    let EventBody::CreateCard(payload) = body else {
        return Err(mismatch(body));
    };
    area.apply_create(ctx, payload)
}

fn replay_create_counter(area: &mut PlayArea, _ctx: &mut TableContext, body: &EventBody) -> Result<()> {
    let EventBody::CreateCounter(counter) = body else {
        return Err(mismatch(body));
    };
    area.create_counter(counter.clone());
    Ok(())
}

fn replay_deck_flip_top(area: &mut PlayArea, ctx: &mut TableContext, body: &EventBody) -> Result<()> {
    let EventBody::DeckFlipTop(payload) = body else {
        return Err(mismatch(body));
    };
    area.deck_flip_top(ctx, Some(payload.toggle))?;
    if let Some(user_data) = &payload.user_data {
        area.sync_card(ctx, user_data, false)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardDetail;
    use crate::core::{CardId, ClientId, TableConfig};
    use crate::zones::ZoneKind;

    fn remote_area(deck_size: usize) -> (PlayArea, TableContext) {
        let mut ctx = TableContext::new(TableConfig::default().with_seed(5));
        let mut area = PlayArea::new(ClientId::new("bob"), 1, &mut ctx);
        let decklist = (1..=deck_size).map(|i| CardDetail::named(format!("B{i}"))).collect();
        area.load_deck(&mut ctx, decklist).unwrap();
        (area, ctx)
    }

    #[test]
    fn test_standard_table_covers_area_events() {
        let table = HandlerTable::standard();
        for kind in EventKind::ALL {
            let expected = !matches!(kind, EventKind::Join | EventKind::Bulk);
            assert_eq!(table.handles(kind), expected, "{kind}");
        }
    }

    #[test]
    fn test_dispatch_draw() {
        let (mut area, mut ctx) = remote_area(2);
        HandlerTable::standard()
            .dispatch(&mut area, &mut ctx, &EventBody::Draw)
            .unwrap();
        let hand = ctx.zones.get(&area.zone_id(ZoneKind::Hand)).unwrap();
        assert_eq!(hand.cards().front(), Some(&CardId::new("bob-1")));
    }

    #[test]
    fn test_missing_handler_fails_loudly() {
        let (mut area, mut ctx) = remote_area(2);
        let mut table = HandlerTable::standard();
        table.unregister(EventKind::Draw);

        let err = table.dispatch(&mut area, &mut ctx, &EventBody::Draw).unwrap_err();
        assert!(matches!(err, TableError::UnhandledEvent(kind) if kind == "draw"));
        // Nothing moved
        assert_eq!(ctx.zones.get(&area.zone_id(ZoneKind::Deck)).unwrap().len(), 2);
    }
}
