//! Play areas: one per connected client.
//!
//! A play area owns a deck, hand, battlefield, exile and graveyard, plus
//! peek / reveal / token-search grids created on first use. Every operation
//! commits its zone changes synchronously and, when the area is local,
//! publishes one event describing it. Remote areas run the same operations
//! during replay with the recorded data (shuffle orders, tag snapshots)
//! passed in, and publish nothing.
//!
//! Multi-step operations (mulligan, bulk draws, dismiss-all) queue a new
//! animation group per step so each step's tweens finish before the next
//! step's start.

use tracing::{debug, info, warn};

use super::context::TableContext;
use super::snapshot::PlayAreaSnapshot;
use super::transfer::transfer_card;
use crate::animation::AnimationHandle;
use crate::cards::{Card, CardDetail, Modifiers, TagChange, TagOverrides};
use crate::core::{CardId, ClientId, IdAllocator, Result, TableError, ZoneId};
use crate::events::{
    CardPayload, CardUserData, ClonePayload, CounterDefinition, CreateCardPayload,
    DeckFlipTopPayload, EventBody, EventEmitter, MulliganPayload, ShufflePayload, SubscriptionId,
    TransferPayload,
};
use crate::shuffle::{shuffle_zone, ShuffleOrder};
use crate::zones::{AddOptions, GridLayout, Zone, ZoneEnv, ZoneKind};

/// Whether a play area's operations originate here or are replayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    Local,
    Remote,
}

/// Zone kinds every play area owns from the start.
pub const FIXED_ZONES: [ZoneKind; 5] = [
    ZoneKind::Deck,
    ZoneKind::Hand,
    ZoneKind::Battlefield,
    ZoneKind::Exile,
    ZoneKind::Graveyard,
];

/// One client's zones, counters, and event publisher.
#[derive(Debug)]
pub struct PlayArea {
    client: ClientId,
    seat: usize,
    deck: ZoneId,
    hand: ZoneId,
    counters: Vec<CounterDefinition>,
    ids: IdAllocator,
    emitter: Option<EventEmitter>,
}

/// Deterministic zone id for `client`'s zone of `kind`.
#[must_use]
pub fn zone_id_for(client: &ClientId, kind: ZoneKind) -> ZoneId {
    ZoneId::new(format!("{client}/{kind}"))
}

impl PlayArea {
    /// Create a remote play area and register its fixed zones.
    pub fn new(client: ClientId, seat: usize, ctx: &mut TableContext) -> Self {
        for kind in FIXED_ZONES {
            let id = zone_id_for(&client, kind);
            if !ctx.zones.contains(&id) {
                ctx.zones
                    .register(Zone::new(id, kind, client.clone(), seat, &ctx.config));
            }
        }
        Self {
            deck: zone_id_for(&client, ZoneKind::Deck),
            hand: zone_id_for(&client, ZoneKind::Hand),
            counters: Vec::new(),
            ids: IdAllocator::new(client.clone()),
            emitter: None,
            client,
            seat,
        }
    }

    /// Make this a local area publishing through `emitter`.
    #[must_use]
    pub fn with_emitter(mut self, emitter: EventEmitter) -> Self {
        self.emitter = Some(emitter);
        self
    }

    #[must_use]
    pub fn client(&self) -> &ClientId {
        &self.client
    }

    #[must_use]
    pub fn seat(&self) -> usize {
        self.seat
    }

    #[must_use]
    pub fn origin(&self) -> Origin {
        if self.emitter.is_some() {
            Origin::Local
        } else {
            Origin::Remote
        }
    }

    /// Id of this area's zone of `kind`, whether or not it exists yet.
    #[must_use]
    pub fn zone_id(&self, kind: ZoneKind) -> ZoneId {
        zone_id_for(&self.client, kind)
    }

    #[must_use]
    pub fn counters(&self) -> &[CounterDefinition] {
        &self.counters
    }

    /// Mirror every event this area publishes. Remote areas publish nothing
    /// and return `None`.
    pub fn subscribe_events(
        &mut self,
        callback: impl FnMut(&crate::events::Event) + 'static,
    ) -> Option<SubscriptionId> {
        self.emitter.as_mut().map(|emitter| emitter.subscribe(callback))
    }

    pub fn unsubscribe_events(&mut self, id: SubscriptionId) -> bool {
        self.emitter
            .as_mut()
            .is_some_and(|emitter| emitter.unsubscribe(id))
    }

    pub(super) fn emit(&mut self, body: EventBody) {
        if let Some(emitter) = &mut self.emitter {
            emitter.emit(body);
        }
    }

    fn begin_bulk(&mut self, ctx: &TableContext) {
        if let Some(emitter) = &mut self.emitter {
            emitter.begin_bulk(ctx.config.replay.bulk_timing_ms);
        }
    }

    fn end_bulk(&mut self) {
        if let Some(emitter) = &mut self.emitter {
            emitter.end_bulk();
        }
    }

    /// Create this area's zone `id` if it is one of its grids.
    fn ensure_zone(&self, ctx: &mut TableContext, id: &ZoneId) -> Result<()> {
        if ctx.zones.contains(id) {
            return Ok(());
        }
        let kind = ZoneKind::GRIDS
            .into_iter()
            .find(|kind| &self.zone_id(*kind) == id)
            .ok_or_else(|| TableError::ZoneNotFound(id.clone()))?;
        debug!(client = %self.client, zone = %id, "creating grid zone");
        ctx.zones
            .register(Zone::new(id.clone(), kind, self.client.clone(), self.seat, &ctx.config));
        Ok(())
    }

    fn place_new_card(
        &mut self,
        ctx: &mut TableContext,
        card: Card,
        zone: &ZoneId,
        options: &AddOptions,
    ) -> Result<AnimationHandle> {
        self.ensure_zone(ctx, zone)?;
        self.ids.observe(&card.id);
        let id = card.id.clone();
        ctx.cards.insert(card)?;
        let (zones, mut env) = ctx.split();
        zones.add_card(zone, &id, options, &mut env)
    }

    /// Apply tag writes to `card`, optionally re-laying it out in its zone.
    fn update_card(
        &self,
        ctx: &mut TableContext,
        card: &CardId,
        changes: Vec<TagChange>,
        relayout: bool,
    ) -> Result<()> {
        ctx.cards.require_mut(card)?.apply_all(changes);
        if !relayout {
            return Ok(());
        }
        let Some(zone_id) = ctx.zones.location_of(card).cloned() else {
            warn!(card = %card, "update_card: card is not in any zone");
            return Ok(());
        };
        let (zones, mut env) = ctx.split();
        if let Some(zone) = zones.get_mut(&zone_id) {
            zone.refresh_card(card, &mut env);
        }
        Ok(())
    }

    // ==== Population ====

    /// Put freshly loaded cards at the bottom of the deck without animating.
    /// Publishes nothing; the `join` snapshot carries them.
    pub fn load_deck(&mut self, ctx: &mut TableContext, decklist: Vec<CardDetail>) -> Result<Vec<CardId>> {
        let deck = self.deck.clone();
        let options = AddOptions::at_index(usize::MAX).immediate();
        let mut ids = Vec::with_capacity(decklist.len());
        for detail in decklist {
            let card = Card::new(self.ids.next_card_id(), self.client.clone(), detail);
            ids.push(card.id.clone());
            self.place_new_card(ctx, card, &deck, &options)?;
        }
        info!(client = %self.client, cards = ids.len(), "deck loaded");
        Ok(ids)
    }

    /// Serializable view of every zone this area owns and the cards in them.
    pub fn snapshot(&self, ctx: &TableContext) -> PlayAreaSnapshot {
        let mut zones = Vec::new();
        let mut cards = Vec::new();
        for id in ctx.zones.zones_owned_by(&self.client) {
            let Some(zone) = ctx.zones.get(&id) else {
                continue;
            };
            cards.extend(zone.cards().iter().filter_map(|card| ctx.cards.get(card).cloned()));
            zones.push(zone.serializable());
        }
        PlayAreaSnapshot {
            client_id: self.client.clone(),
            zones,
            cards,
            counters: self.counters.clone(),
        }
    }

    /// Rebuild zone contents from a snapshot, placing cards immediately.
    pub fn hydrate(&mut self, ctx: &mut TableContext, snapshot: &PlayAreaSnapshot) -> Result<()> {
        self.counters = snapshot.counters.clone();
        let options = AddOptions::at_index(usize::MAX).immediate();

        for zone_snapshot in &snapshot.zones {
            self.ensure_zone(ctx, &zone_snapshot.id)?;
            if let Some(deck) = ctx.zones.require_mut(&zone_snapshot.id)?.as_deck_mut() {
                deck.set_top_revealed(zone_snapshot.top_revealed);
            }
            for id in &zone_snapshot.cards {
                let Some(card) = snapshot.card(id) else {
                    warn!(card = %id, zone = %zone_snapshot.id, "snapshot zone lists unknown card");
                    continue;
                };
                self.ids.observe(id);
                ctx.cards.upsert(card.clone());
                let (zones, mut env) = ctx.split();
                zones.add_card(&zone_snapshot.id, id, &options, &mut env)?;
            }
        }
        info!(client = %self.client, cards = snapshot.cards.len(), "play area hydrated");
        Ok(())
    }

    // ==== Deck ====

    fn draw_one(&mut self, ctx: &mut TableContext) -> Result<Option<CardId>> {
        let Some(top) = ctx.zones.require(&self.deck)?.cards().front().cloned() else {
            return Ok(None);
        };
        let (deck, hand) = (self.deck.clone(), self.hand.clone());
        transfer_card(ctx, &top, &deck, &hand, &AddOptions::new(), None)?;
        Ok(Some(top))
    }

    /// Move the top card of the deck into the hand. An empty deck draws nothing.
    pub fn draw(&mut self, ctx: &mut TableContext) -> Result<Option<CardId>> {
        let drawn = self.draw_one(ctx)?;
        if drawn.is_some() {
            self.emit(EventBody::Draw);
        }
        Ok(drawn)
    }

    /// Draw up to `count` cards one after another, published as one bulk.
    pub fn draw_many(&mut self, ctx: &mut TableContext, count: usize) -> Result<Vec<CardId>> {
        self.begin_bulk(ctx);
        let mut drawn = Vec::with_capacity(count);
        let mut result = Ok(());
        for _ in 0..count {
            ctx.animator.enqueue_group();
            match self.draw(ctx) {
                Ok(Some(card)) => drawn.push(card),
                Ok(None) => break,
                Err(err) => {
                    result = Err(err);
                    break;
                }
            }
        }
        self.end_bulk();
        result.map(|()| drawn)
    }

    /// Draw the configured starting hand.
    pub fn draw_opening_hand(&mut self, ctx: &mut TableContext) -> Result<Vec<CardId>> {
        let count = ctx.config.starting_hand_size;
        self.draw_many(ctx, count)
    }

    fn shuffle_deck(&mut self, ctx: &mut TableContext, existing: Option<&ShuffleOrder>) -> Result<ShuffleOrder> {
        let TableContext {
            zones,
            cards,
            animator,
            rng,
            ..
        } = ctx;
        let deck = zones.require_mut(&self.deck)?;
        let mut env = ZoneEnv { cards, animator };
        shuffle_zone(deck, existing, rng, &mut env)
    }

    /// Shuffle the deck. Without `existing` a fresh order is drawn; with it
    /// the recorded order is replayed.
    pub fn shuffle(&mut self, ctx: &mut TableContext, existing: Option<&ShuffleOrder>) -> Result<ShuffleOrder> {
        let order = self.shuffle_deck(ctx, existing)?;
        self.emit(EventBody::ShuffleDeck(ShufflePayload {
            order: order.clone(),
        }));
        Ok(order)
    }

    /// Return the hand to the bottom of the deck, shuffle, and draw `draw_count`.
    pub fn mulligan(
        &mut self,
        ctx: &mut TableContext,
        draw_count: usize,
        existing: Option<&ShuffleOrder>,
    ) -> Result<ShuffleOrder> {
        let (deck, hand) = (self.deck.clone(), self.hand.clone());
        let returning: Vec<CardId> = ctx.zones.require(&hand)?.cards().iter().cloned().collect();

        // A replayed order must fit the deck as it will be after the hand
        // returns; check before anything moves.
        if let Some(order) = existing {
            let mut expected = ctx.zones.require(&deck)?.cards().clone();
            expected.extend(returning.iter().cloned());
            order.verify(&deck, &expected)?;
        }

        ctx.animator.enqueue_group();
        let bottom = AddOptions::at_index(usize::MAX);
        for card in &returning {
            transfer_card(ctx, card, &hand, &deck, &bottom, None)?;
        }

        ctx.animator.enqueue_group();
        let order = self.shuffle_deck(ctx, existing)?;

        for _ in 0..draw_count {
            ctx.animator.enqueue_group();
            if self.draw_one(ctx)?.is_none() {
                break;
            }
        }

        info!(client = %self.client, returned = returning.len(), draw_count, "mulligan");
        self.emit(EventBody::Mulligan(MulliganPayload {
            order: order.clone(),
            draw_count,
        }));
        Ok(order)
    }

    /// Turn the deck's top card face-up or face-down. `None` toggles.
    pub fn deck_flip_top(&mut self, ctx: &mut TableContext, toggle: Option<bool>) -> Result<bool> {
        let TableContext {
            zones,
            cards,
            animator,
            ..
        } = ctx;
        let zone = zones.require_mut(&self.deck)?;
        let deck = zone
            .as_deck_mut()
            .ok_or_else(|| TableError::ZoneNotFound(self.deck.clone()))?;
        let revealed = toggle.unwrap_or(!deck.top_revealed());
        deck.set_top_revealed(revealed);

        let top = zone.cards().front().cloned();
        let mut env = ZoneEnv { cards, animator };
        if let Some(top) = &top {
            zone.refresh_card(top, &mut env);
        }

        let user_data = top
            .as_ref()
            .and_then(|id| ctx.cards.get(id))
            .map(CardUserData::of);
        self.emit(EventBody::DeckFlipTop(DeckFlipTopPayload {
            toggle: revealed,
            user_data,
        }));
        Ok(revealed)
    }

    // ==== Transfers ====

    /// Move `card` from wherever it is to `to`, publishing `transferCard`.
    pub fn transfer(
        &mut self,
        ctx: &mut TableContext,
        card: &CardId,
        to: &ZoneId,
        options: AddOptions,
        overrides: Option<&TagOverrides>,
    ) -> Result<AnimationHandle> {
        self.ensure_zone(ctx, to)?;
        let from = ctx
            .zones
            .location_of(card)
            .cloned()
            .or_else(|| ctx.cards.get(card).and_then(|c| c.tags.zone_id.clone()))
            .ok_or_else(|| TableError::CardNotFound(card.clone()))?;

        let handle = transfer_card(ctx, card, &from, to, &options, overrides)?;

        let moved = ctx.cards.require(card)?;
        let payload = TransferPayload {
            user_data: CardUserData::of(moved),
            from_zone_id: from,
            to_zone_id: to.clone(),
            add_options: options,
            card_user_data: moved.detail.clone(),
        };
        self.emit(EventBody::TransferCard(payload));
        Ok(handle)
    }

    /// Replay a recorded transfer, adopting the sender's visual tags.
    pub fn apply_transfer(&mut self, ctx: &mut TableContext, payload: &TransferPayload) -> Result<AnimationHandle> {
        self.ensure_zone(ctx, &payload.to_zone_id)?;
        let id = &payload.user_data.id;
        if !ctx.cards.contains(id) {
            warn!(card = %id, "transfer of unknown card, creating it from payload");
            ctx.cards.insert(Card::new(
                id.clone(),
                self.client.clone(),
                payload.card_user_data.clone(),
            ))?;
        }
        let overrides = TagOverrides::from_tags(&payload.user_data.tags);
        transfer_card(
            ctx,
            id,
            &payload.from_zone_id,
            &payload.to_zone_id,
            &payload.add_options,
            Some(&overrides),
        )
    }

    // ==== Card state ====

    /// Toggle tapped. Returns the resulting state.
    pub fn tap(&mut self, ctx: &mut TableContext, card: &CardId) -> Result<bool> {
        let tapped = !ctx.cards.require(card)?.tags.is_tapped;
        self.update_card(ctx, card, vec![TagChange::Tapped(tapped)], true)?;
        let current = ctx.cards.require(card)?;
        let state = current.tags.is_tapped;
        self.emit(EventBody::Tap(CardPayload {
            user_data: CardUserData::of(current),
        }));
        Ok(state)
    }

    /// Toggle face-down. Returns the resulting state.
    pub fn flip(&mut self, ctx: &mut TableContext, card: &CardId) -> Result<bool> {
        let flipped = !ctx.cards.require(card)?.tags.is_flipped;
        self.update_card(ctx, card, vec![TagChange::Flipped(flipped)], true)?;
        let current = ctx.cards.require(card)?;
        let state = current.tags.is_flipped;
        self.emit(EventBody::Flip(CardPayload {
            user_data: CardUserData::of(current),
        }));
        Ok(state)
    }

    /// Toggle whether `card` is shown to everyone where it is.
    pub fn reveal(&mut self, ctx: &mut TableContext, card: &CardId) -> Result<bool> {
        let public = !ctx.cards.require(card)?.tags.is_public;
        self.update_card(ctx, card, vec![TagChange::Public(public)], false)?;
        let current = ctx.cards.require(card)?;
        self.emit(EventBody::Reveal(CardPayload {
            user_data: CardUserData::of(current),
        }));
        Ok(public)
    }

    /// Replace the modifiers of `card`.
    pub fn modify_card(&mut self, ctx: &mut TableContext, card: &CardId, modifiers: Modifiers) -> Result<()> {
        self.update_card(ctx, card, vec![TagChange::Modifiers(modifiers)], false)?;
        let current = ctx.cards.require(card)?;
        self.emit(EventBody::ModifyCard(CardPayload {
            user_data: CardUserData::of(current),
        }));
        Ok(())
    }

    /// Adjust one named counter on `card`.
    pub fn add_counter(&mut self, ctx: &mut TableContext, card: &CardId, name: &str, delta: i64) -> Result<i64> {
        let mut modifiers = ctx.cards.require(card)?.tags.modifiers.clone();
        modifiers.add_counter(name, delta);
        let value = modifiers.counter(name);
        self.modify_card(ctx, card, modifiers)?;
        Ok(value)
    }

    /// Adopt a replayed tag snapshot for an existing card.
    pub fn sync_card(&mut self, ctx: &mut TableContext, user_data: &CardUserData, relayout: bool) -> Result<()> {
        let changes = TagOverrides::from_tags(&user_data.tags).changes();
        self.update_card(ctx, &user_data.id, changes, relayout)
    }

    // ==== Creation ====

    /// Copy `card` under a fresh id into the same zone. On a battlefield the
    /// copy snaps onto the original.
    pub fn clone_card(&mut self, ctx: &mut TableContext, card: &CardId) -> Result<CardId> {
        let new_id = self.ids.next_card_id();
        self.apply_clone(ctx, card, &new_id)?;
        self.emit(EventBody::Clone(ClonePayload {
            id: card.clone(),
            new_id: new_id.clone(),
        }));
        Ok(new_id)
    }

    /// Replay a clone with a known id.
    pub fn apply_clone(&mut self, ctx: &mut TableContext, card: &CardId, new_id: &CardId) -> Result<()> {
        let zone_id = ctx
            .zones
            .location_of(card)
            .cloned()
            .unwrap_or_else(|| self.zone_id(ZoneKind::Battlefield));
        let position = match ctx.zones.get(&zone_id) {
            Some(Zone::Battlefield(battlefield)) => battlefield.placement(card),
            _ => None,
        };

        let mut copy = ctx.cards.require(card)?.duplicate(new_id.clone());
        copy.client_id = self.client.clone();
        let options = AddOptions {
            position,
            ..AddOptions::default()
        };
        self.place_new_card(ctx, copy, &zone_id, &options)?;
        Ok(())
    }

    /// Create a new card in this area's zone of `kind`.
    pub fn create_card(
        &mut self,
        ctx: &mut TableContext,
        detail: CardDetail,
        kind: ZoneKind,
        options: AddOptions,
    ) -> Result<CardId> {
        let zone_id = self.zone_id(kind);
        let card = Card::new(self.ids.next_card_id(), self.client.clone(), detail);
        let id = card.id.clone();
        self.place_new_card(ctx, card, &zone_id, &options)?;

        let created = ctx.cards.require(&id)?;
        self.emit(EventBody::CreateCard(CreateCardPayload {
            user_data: CardUserData::with_detail(created),
            zone_id,
            add_options: options,
        }));
        Ok(id)
    }

    /// Replay a recorded card creation.
    pub fn apply_create(&mut self, ctx: &mut TableContext, payload: &CreateCardPayload) -> Result<()> {
        let detail = payload.user_data.detail.clone().unwrap_or_default();
        let card = Card::new(payload.user_data.id.clone(), self.client.clone(), detail);
        self.place_new_card(ctx, card, &payload.zone_id, &payload.add_options)?;
        self.sync_card(ctx, &payload.user_data, true)
    }

    /// Add or replace a play-area counter.
    pub fn create_counter(&mut self, counter: CounterDefinition) {
        match self.counters.iter_mut().find(|c| c.id == counter.id) {
            Some(existing) => *existing = counter.clone(),
            None => self.counters.push(counter.clone()),
        }
        self.emit(EventBody::CreateCounter(counter));
    }

    // ==== Grids ====

    /// Move the top `count` deck cards into the peek grid.
    pub fn peek(&mut self, ctx: &mut TableContext, count: usize) -> Result<Vec<CardId>> {
        let top = ctx
            .zones
            .require(&self.deck)?
            .as_deck()
            .map_or_else(Vec::new, |deck| deck.top_cards(count));
        let grid = self.zone_id(ZoneKind::Peek);
        self.transfer_all(ctx, &top, &grid)?;
        Ok(top)
    }

    /// Move `cards` into the reveal grid, where everyone can see them.
    pub fn reveal_cards(&mut self, ctx: &mut TableContext, cards: &[CardId]) -> Result<()> {
        let grid = self.zone_id(ZoneKind::Reveal);
        self.transfer_all(ctx, cards, &grid)
    }

    fn transfer_all(&mut self, ctx: &mut TableContext, cards: &[CardId], to: &ZoneId) -> Result<()> {
        self.begin_bulk(ctx);
        let result = cards.iter().try_for_each(|card| {
            self.transfer(ctx, card, to, AddOptions::new(), None).map(|_| ())
        });
        self.end_bulk();
        result
    }

    /// Create token cards in the token-search grid.
    pub fn token_search(&mut self, ctx: &mut TableContext, tokens: Vec<CardDetail>) -> Result<Vec<CardId>> {
        self.begin_bulk(ctx);
        let mut created = Vec::with_capacity(tokens.len());
        let mut result = Ok(());
        for detail in tokens {
            let detail = detail.with_attr("isToken", true);
            match self.create_card(ctx, detail, ZoneKind::TokenSearch, AddOptions::new()) {
                Ok(id) => created.push(id),
                Err(err) => {
                    result = Err(err);
                    break;
                }
            }
        }
        self.end_bulk();
        result.map(|()| created)
    }

    /// Text-filter one of this area's grids. Local view state, not published.
    pub fn set_filter(&mut self, ctx: &mut TableContext, kind: ZoneKind, filter: &str) -> Result<bool> {
        let id = self.zone_id(kind);
        let (zones, mut env) = ctx.split();
        Ok(zones.require_mut(&id)?.set_grid_filter(filter, false, &mut env))
    }

    /// Switch one of this area's grids between grid and field layout.
    pub fn set_layout(&mut self, ctx: &mut TableContext, kind: ZoneKind, mode: GridLayout) -> Result<bool> {
        let id = self.zone_id(kind);
        let (zones, mut env) = ctx.split();
        Ok(zones.require_mut(&id)?.set_grid_layout(mode, false, &mut env))
    }

    /// Send a grid card back where it came from, or to the top of the deck.
    pub fn dismiss(&mut self, ctx: &mut TableContext, card: &CardId) -> Result<AnimationHandle> {
        let previous = ctx.cards.require(card)?.tags.previous_zone_id.clone();
        let target = previous
            .filter(|id| ctx.zones.get(id).is_some_and(|zone| !zone.kind().is_grid()))
            .unwrap_or_else(|| self.deck.clone());
        let options = if target == self.deck {
            AddOptions::at_index(0)
        } else {
            AddOptions::new()
        };
        self.transfer(ctx, card, &target, options, None)
    }

    /// Dismiss every card in one of this area's grids, last card first, as a
    /// single bulk. Returns how many cards were dismissed.
    pub fn dismiss_all(&mut self, ctx: &mut TableContext, kind: ZoneKind) -> Result<usize> {
        let Some(zone) = ctx.zones.get(&self.zone_id(kind)) else {
            return Ok(0);
        };
        let cards: Vec<CardId> = zone.cards().iter().rev().cloned().collect();

        self.begin_bulk(ctx);
        let mut result = Ok(());
        for card in &cards {
            ctx.animator.enqueue_group();
            if let Err(err) = self.dismiss(ctx, card) {
                result = Err(err);
                break;
            }
        }
        self.end_bulk();
        result.map(|()| cards.len())
    }
}
