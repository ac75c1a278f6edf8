//! A table session: the shared repositories plus every play area at the table.

use rustc_hash::FxHashMap;
use tracing::{info, warn};

use super::context::TableContext;
use super::play_area::PlayArea;
use super::snapshot::PlayAreaSnapshot;
use crate::cards::CardDetail;
use crate::core::{CardId, ClientId, Result, TableConfig, TableError};
use crate::events::{EventBody, EventEmitter, OrderedLog};

/// Every play area at the table and the repositories they share.
#[derive(Debug)]
pub struct Tabletop {
    ctx: TableContext,
    areas: FxHashMap<ClientId, PlayArea>,
    local: Option<ClientId>,
}

impl Default for Tabletop {
    fn default() -> Self {
        Self::new(TableConfig::default())
    }
}

impl Tabletop {
    #[must_use]
    pub fn new(config: TableConfig) -> Self {
        Self {
            ctx: TableContext::new(config),
            areas: FxHashMap::default(),
            local: None,
        }
    }

    #[must_use]
    pub fn context(&self) -> &TableContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut TableContext {
        &mut self.ctx
    }

    /// Client this peer acts for, once joined.
    #[must_use]
    pub fn local_client(&self) -> Option<&ClientId> {
        self.local.as_ref()
    }

    #[must_use]
    pub fn area(&self, client: &ClientId) -> Option<&PlayArea> {
        self.areas.get(client)
    }

    /// A play area together with the repositories its operations need.
    pub fn area_mut(&mut self, client: &ClientId) -> Result<(&mut PlayArea, &mut TableContext)> {
        let area = self
            .areas
            .get_mut(client)
            .ok_or_else(|| TableError::PlayAreaNotFound(client.clone()))?;
        Ok((area, &mut self.ctx))
    }

    /// The local play area. Fails before `join_local`.
    pub fn local(&mut self) -> Result<(&mut PlayArea, &mut TableContext)> {
        let client = self
            .local
            .clone()
            .ok_or_else(|| TableError::PlayAreaNotFound(ClientId::new("<local>")))?;
        self.area_mut(&client)
    }

    /// Clients with a play area, sorted.
    #[must_use]
    pub fn clients(&self) -> Vec<ClientId> {
        let mut clients: Vec<ClientId> = self.areas.keys().cloned().collect();
        clients.sort();
        clients
    }

    fn next_seat(&self) -> usize {
        (0..).find(|seat| self.areas.values().all(|area| area.seat() != *seat)).unwrap_or(0)
    }

    /// Create the local play area from `decklist`, publishing through `log`,
    /// and announce it with a `join` event.
    pub fn join_local(
        &mut self,
        client: ClientId,
        decklist: Vec<CardDetail>,
        log: impl OrderedLog + 'static,
    ) -> Result<&mut PlayArea> {
        if self.areas.contains_key(&client) {
            self.remove_play_area(&client);
        }
        let seat = self.next_seat();
        let emitter = EventEmitter::new(client.clone()).with_log(log);
        let mut area = PlayArea::new(client.clone(), seat, &mut self.ctx).with_emitter(emitter);
        area.load_deck(&mut self.ctx, decklist)?;

        let snapshot = area.snapshot(&self.ctx);
        area.emit(EventBody::Join(snapshot));
        info!(client = %client, seat, "local play area joined");

        self.local = Some(client.clone());
        Ok(self.areas.entry(client).or_insert(area))
    }

    /// Build a remote play area from its `join` snapshot, replacing any
    /// existing area for that client.
    pub fn join_remote(&mut self, snapshot: &PlayAreaSnapshot) -> Result<&mut PlayArea> {
        let client = snapshot.client_id.clone();
        if self.local.as_ref() == Some(&client) {
            warn!(client = %client, "ignoring remote join for the local client");
            return self.area_mut(&client).map(|(area, _)| area);
        }
        if self.areas.contains_key(&client) {
            self.remove_play_area(&client);
        }
        let seat = self.next_seat();
        let mut area = PlayArea::new(client.clone(), seat, &mut self.ctx);
        area.hydrate(&mut self.ctx, snapshot)?;
        info!(client = %client, seat, "remote play area joined");
        Ok(self.areas.entry(client).or_insert(area))
    }

    /// Tear down a play area: its zones and every card it owns or holds.
    /// Returns `false` if there was no such area.
    pub fn remove_play_area(&mut self, client: &ClientId) -> bool {
        if self.areas.remove(client).is_none() {
            return false;
        }
        if self.local.as_ref() == Some(client) {
            self.local = None;
        }

        let zone_ids = self.ctx.zones.zones_owned_by(client);
        let mut doomed: Vec<CardId> = zone_ids
            .iter()
            .filter_map(|id| self.ctx.zones.get(id))
            .flat_map(|zone| zone.cards().iter().cloned())
            .collect();
        doomed.extend(
            self.ctx
                .cards
                .iter()
                .filter(|card| &card.client_id == client)
                .map(|card| card.id.clone()),
        );
        doomed.sort();
        doomed.dedup();

        for id in &zone_ids {
            self.ctx.zones.remove_zone(id);
        }
        let (zones, mut env) = self.ctx.split();
        for card in &doomed {
            // Owned cards sitting in someone else's zone
            zones.detach(card, &mut env);
            zones.forget_card(card);
            env.animator.forget(card);
            env.cards.remove(card);
        }

        info!(client = %client, zones = zone_ids.len(), cards = doomed.len(), "play area removed");
        true
    }

    /// Advance animations to `now_ms`.
    pub fn tick(&mut self, now_ms: u64) {
        self.ctx.animator.advance(now_ms);
    }
}
