//! Replication integration tests.
//!
//! A local table publishes into a shared `MemoryLog`; a second table replays
//! it through a `Replicator` driven by a `ManualClock`, and the two must end
//! up holding the same zones in the same order.

use ccg_table::cards::{CardDetail, Modifiers};
use ccg_table::core::logging::init_tracing_with_filter;
use ccg_table::core::{CardId, ClientId, Clock, ManualClock, TableConfig, TableError, ZoneId};
use ccg_table::events::{EventBody, EventKind, MemoryLog, OrderedLog};
use ccg_table::replication::Replicator;
use ccg_table::table::Tabletop;
use ccg_table::zones::{AddOptions, ZoneKind};

fn alice() -> ClientId {
    ClientId::new("alice")
}

fn decklist(n: usize) -> Vec<CardDetail> {
    (1..=n)
        .map(|i| CardDetail::named(format!("Card {i}")).with_attr("cost", (i % 5) as i64))
        .collect()
}

struct Peers {
    log: MemoryLog,
    local: Tabletop,
    remote: Tabletop,
    replicator: Replicator,
    clock: ManualClock,
}

impl Peers {
    fn new(deck_size: usize) -> Self {
        init_tracing_with_filter("ccg_table=warn");
        let log = MemoryLog::new();
        let mut local = Tabletop::new(TableConfig::default().with_seed(2024));
        local.join_local(alice(), decklist(deck_size), log.clone()).unwrap();

        let remote = Tabletop::new(TableConfig::default().with_seed(99));
        let config = remote.context().config.replay;
        let replicator = Replicator::new(ClientId::new("bob"), log.clone(), &config);
        Self {
            log,
            local,
            remote,
            replicator,
            clock: ManualClock::new(0),
        }
    }

    /// Step the remote peer in 100ms frames until it has consumed the log.
    fn sync(&mut self) {
        for _ in 0..10_000 {
            self.replicator.step(&mut self.remote, &self.clock).unwrap();
            if self.replicator.is_caught_up() {
                return;
            }
            self.clock.advance(100);
        }
        panic!("replicator did not catch up");
    }

    fn zone(&self, table: &Tabletop, kind: ZoneKind) -> Vec<CardId> {
        let id = ZoneId::new(format!("alice/{kind}"));
        table
            .context()
            .zones
            .get(&id)
            .map(|zone| zone.cards().iter().cloned().collect())
            .unwrap_or_default()
    }

    fn assert_converged(&self) {
        for kind in [
            ZoneKind::Deck,
            ZoneKind::Hand,
            ZoneKind::Battlefield,
            ZoneKind::Exile,
            ZoneKind::Graveyard,
            ZoneKind::Peek,
            ZoneKind::Reveal,
            ZoneKind::TokenSearch,
        ] {
            let local = self.zone(&self.local, kind);
            assert_eq!(local, self.zone(&self.remote, kind), "{kind} differs");
            for card in &local {
                let mine = &self.local.context().cards.get(card).unwrap().tags;
                let theirs = &self.remote.context().cards.get(card).unwrap().tags;
                assert_eq!(mine, theirs, "tags of {card} differ");
            }
        }
    }
}

// =============================================================================
// Convergence
// =============================================================================

#[test]
fn test_opening_sequence_converges() {
    let mut peers = Peers::new(30);
    {
        let (area, ctx) = peers.local.local().unwrap();
        area.shuffle(ctx, None).unwrap();
        area.draw_opening_hand(ctx).unwrap();
        area.mulligan(ctx, 6, None).unwrap();
    }
    peers.sync();
    peers.assert_converged();
    assert_eq!(peers.zone(&peers.remote, ZoneKind::Hand).len(), 6);
}

#[test]
fn test_mulligan_scenario_converges() {
    let mut peers = Peers::new(20);
    {
        let (area, ctx) = peers.local.local().unwrap();
        area.mulligan(ctx, 7, None).unwrap();
    }
    let entries = peers.log.entries();
    let EventBody::Mulligan(payload) = &entries[1].body else {
        panic!("expected mulligan, got {:?}", entries[1].kind());
    };
    assert_eq!(payload.draw_count, 7);

    peers.sync();
    peers.assert_converged();
    assert_eq!(peers.zone(&peers.remote, ZoneKind::Hand).len(), 7);
    assert_eq!(peers.zone(&peers.remote, ZoneKind::Deck).len(), 13);
}

#[test]
fn test_battlefield_play_converges() {
    let mut peers = Peers::new(12);
    {
        let (area, ctx) = peers.local.local().unwrap();
        let hand = area.draw_many(ctx, 4).unwrap();
        let battlefield = area.zone_id(ZoneKind::Battlefield);
        let graveyard = area.zone_id(ZoneKind::Graveyard);

        area.transfer(ctx, &hand[0], &battlefield, AddOptions::new(), None).unwrap();
        area.transfer(ctx, &hand[1], &battlefield, AddOptions::new(), None).unwrap();
        area.tap(ctx, &hand[0]).unwrap();
        area.flip(ctx, &hand[1]).unwrap();
        area.add_counter(ctx, &hand[0], "+1/+1", 2).unwrap();
        area.modify_card(
            ctx,
            &hand[1],
            Modifiers {
                power: 3,
                ..Modifiers::default()
            },
        )
        .unwrap();
        area.clone_card(ctx, &hand[0]).unwrap();
        area.reveal(ctx, &hand[2]).unwrap();
        area.transfer(ctx, &hand[3], &graveyard, AddOptions::new(), None).unwrap();
    }
    peers.sync();
    peers.assert_converged();
    assert_eq!(peers.zone(&peers.remote, ZoneKind::Battlefield).len(), 3);
}

#[test]
fn test_created_cards_and_counters_converge() {
    let mut peers = Peers::new(5);
    {
        let (area, ctx) = peers.local.local().unwrap();
        area.create_card(ctx, CardDetail::named("Treasure"), ZoneKind::Battlefield, AddOptions::new())
            .unwrap();
        area.token_search(ctx, vec![CardDetail::named("Goblin"), CardDetail::named("Elf")])
            .unwrap();
        area.create_counter(ccg_table::events::CounterDefinition {
            id: "poison".into(),
            name: "Poison".into(),
            color: "green".into(),
        });
        area.deck_flip_top(ctx, None).unwrap();
        area.draw(ctx).unwrap();
    }
    peers.sync();
    peers.assert_converged();

    let remote_area = peers.remote.area(&alice()).unwrap();
    assert_eq!(remote_area.counters().len(), 1);
    let top = &peers.zone(&peers.remote, ZoneKind::Deck)[0];
    assert!(peers.remote.context().cards.get(top).unwrap().tags.is_public);
}

// =============================================================================
// Bulk Pacing
// =============================================================================

#[test]
fn test_bulk_dismiss_replays_in_order_with_timing() {
    let mut peers = Peers::new(6);
    let deck_before;
    {
        let (area, ctx) = peers.local.local().unwrap();
        deck_before = ctx.zones.get(&area.zone_id(ZoneKind::Deck)).unwrap().cards().clone();
        area.peek(ctx, 3).unwrap();
        assert_eq!(area.dismiss_all(ctx, ZoneKind::Peek).unwrap(), 3);
    }

    let entries = peers.log.entries();
    assert_eq!(entries.len(), 3);
    let EventBody::Bulk(dismissal) = &entries[2].body else {
        panic!("expected bulk");
    };
    let order: Vec<&str> = dismissal
        .events
        .iter()
        .map(|event| match &event.body {
            EventBody::TransferCard(t) => t.user_data.id.as_str(),
            other => panic!("unexpected {:?}", other.kind()),
        })
        .collect();
    assert_eq!(order, vec!["alice-3", "alice-2", "alice-1"]);

    // t=0: join + first peek transfer; t=100, t=200: the rest of the peek
    let replicator = &mut peers.replicator;
    assert_eq!(replicator.step(&mut peers.remote, &peers.clock).unwrap(), 2);
    peers.clock.set(50);
    assert_eq!(replicator.step(&mut peers.remote, &peers.clock).unwrap(), 0);
    peers.clock.set(100);
    assert_eq!(replicator.step(&mut peers.remote, &peers.clock).unwrap(), 1);
    peers.clock.set(200);
    assert_eq!(replicator.step(&mut peers.remote, &peers.clock).unwrap(), 1);
    assert_eq!(peers.zone(&peers.remote, ZoneKind::Peek).len(), 3);

    // Each dismissal waits out the bulk timing
    let mut remaining = Vec::new();
    for now in [300, 400, 500] {
        peers.clock.set(now);
        assert_eq!(peers.replicator.step(&mut peers.remote, &peers.clock).unwrap(), 1);
        remaining.push(peers.zone(&peers.remote, ZoneKind::Peek).len());
    }
    assert_eq!(remaining, vec![2, 1, 0]);
    assert!(peers.replicator.is_caught_up());

    let deck_after = peers.zone(&peers.remote, ZoneKind::Deck);
    assert_eq!(deck_after, deck_before.iter().cloned().collect::<Vec<_>>());
    for card in deck_after.iter().take(3) {
        let tags = &peers.remote.context().cards.get(card).unwrap().tags;
        assert_eq!(tags.location, Some(ZoneKind::Deck));
        assert!(!tags.is_in_grid);
    }
    peers.assert_converged();
}

#[test]
fn test_activity_log_coalesces_replayed_draws() {
    let mut peers = Peers::new(10);
    {
        let (area, ctx) = peers.local.local().unwrap();
        area.draw(ctx).unwrap();
        area.draw(ctx).unwrap();
        area.shuffle(ctx, None).unwrap();
    }
    peers.sync();
    assert_eq!(
        peers.replicator.activity().lines(),
        vec![
            "alice joined the table",
            "alice drew a card (x2)",
            "alice shuffled their deck",
        ]
    );
}

// =============================================================================
// Divergence
// =============================================================================

#[test]
fn test_shuffle_divergence_is_detected() {
    let mut peers = Peers::new(8);
    peers.sync();

    // Bob's copy of the deck drifts: the top card goes to the bottom
    {
        let (area, ctx) = peers.remote.area_mut(&alice()).unwrap();
        let deck = area.zone_id(ZoneKind::Deck);
        let top = CardId::new("alice-1");
        area.transfer(ctx, &top, &deck, AddOptions::at_index(usize::MAX), None)
            .unwrap();
    }
    {
        let (area, ctx) = peers.local.local().unwrap();
        area.shuffle(ctx, None).unwrap();
    }

    let err = peers.replicator.poll(&mut peers.remote, peers.clock.now_ms()).unwrap_err();
    assert!(matches!(err, TableError::ShuffleDivergence { .. }));
    assert_eq!(peers.replicator.pending(), 1);
    assert_eq!(peers.log.get(1).unwrap().kind(), EventKind::ShuffleDeck);
}

#[test]
fn test_divergent_mulligan_leaves_zones_untouched() {
    let mut peers = Peers::new(8);
    {
        let (area, ctx) = peers.local.local().unwrap();
        for _ in 0..3 {
            area.draw(ctx).unwrap();
        }
    }
    peers.sync();

    // Bob's deck drifts before Alice mulligans
    {
        let (area, ctx) = peers.remote.area_mut(&alice()).unwrap();
        let deck = area.zone_id(ZoneKind::Deck);
        let top = CardId::new("alice-4");
        area.transfer(ctx, &top, &deck, AddOptions::at_index(usize::MAX), None)
            .unwrap();
    }
    {
        let (area, ctx) = peers.local.local().unwrap();
        area.mulligan(ctx, 3, None).unwrap();
    }

    let hand_before = peers.zone(&peers.remote, ZoneKind::Hand);
    let deck_before = peers.zone(&peers.remote, ZoneKind::Deck);
    assert_eq!(hand_before.len(), 3);

    for attempt in 0..2 {
        let err = peers
            .replicator
            .poll(&mut peers.remote, peers.clock.now_ms() + attempt)
            .unwrap_err();
        assert!(matches!(err, TableError::ShuffleDivergence { .. }));
        assert_eq!(peers.zone(&peers.remote, ZoneKind::Hand), hand_before);
        assert_eq!(peers.zone(&peers.remote, ZoneKind::Deck), deck_before);
    }

    let skipped = peers.replicator.skip_failed().unwrap();
    assert_eq!(skipped.kind(), EventKind::Mulligan);
    assert!(peers.replicator.is_caught_up());
    assert_eq!(peers.zone(&peers.remote, ZoneKind::Hand), hand_before);
}

#[test]
fn test_remote_leave_clears_area() {
    let mut peers = Peers::new(4);
    peers.sync();
    assert!(peers.remote.area(&alice()).is_some());

    assert!(peers.remote.remove_play_area(&alice()));
    assert!(peers.remote.context().cards.is_empty());
    assert!(peers.remote.context().zones.is_empty());
}
