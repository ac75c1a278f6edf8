//! Local event sink: subscribers, bulk envelopes, and the log.

use tracing::debug;

use super::event::{BulkPayload, Event, EventBody};
use super::log::OrderedLog;
use crate::core::ClientId;

type Subscriber = Box<dyn FnMut(&Event)>;

/// Handle returned by `EventEmitter::subscribe`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

struct BulkFrame {
    timing: u64,
    events: Vec<Event>,
}

/// Publishes events originated by one local play area.
///
/// Events emitted between `begin_bulk` and `end_bulk` are collected and
/// published once as a single `bulk` envelope. Nested bulks fold into the
/// outermost one.
pub struct EventEmitter {
    client: ClientId,
    log: Option<Box<dyn OrderedLog>>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: usize,
    bulk: Vec<BulkFrame>,
}

impl EventEmitter {
    #[must_use]
    pub fn new(client: ClientId) -> Self {
        Self {
            client,
            log: None,
            subscribers: Vec::new(),
            next_subscription: 0,
            bulk: Vec::new(),
        }
    }

    /// Also append every published event to `log`.
    #[must_use]
    pub fn with_log(mut self, log: impl OrderedLog + 'static) -> Self {
        self.log = Some(Box::new(log));
        self
    }

    #[must_use]
    pub fn client(&self) -> &ClientId {
        &self.client
    }

    /// Mirror every published event to `callback`.
    pub fn subscribe(&mut self, callback: impl FnMut(&Event) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    #[must_use]
    pub fn in_bulk(&self) -> bool {
        !self.bulk.is_empty()
    }

    /// Record an event, either into the open bulk or straight out.
    pub fn emit(&mut self, body: EventBody) {
        let event = Event::new(self.client.clone(), body);
        match self.bulk.last_mut() {
            Some(frame) => frame.events.push(event),
            None => self.publish(event),
        }
    }

    /// Start collecting events into a bulk envelope replayed `timing` ms apart.
    pub fn begin_bulk(&mut self, timing: u64) {
        self.bulk.push(BulkFrame {
            timing,
            events: Vec::new(),
        });
    }

    /// Close the innermost bulk. Empty bulks publish nothing.
    pub fn end_bulk(&mut self) {
        let Some(frame) = self.bulk.pop() else {
            return;
        };
        if frame.events.is_empty() {
            return;
        }
        match self.bulk.last_mut() {
            Some(outer) => outer.events.extend(frame.events),
            None => {
                let body = EventBody::Bulk(BulkPayload {
                    timing: frame.timing,
                    events: frame.events,
                });
                self.publish(Event::new(self.client.clone(), body));
            }
        }
    }

    fn publish(&mut self, event: Event) {
        debug!(client = %self.client, kind = %event.kind(), "event published");
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&event);
        }
        if let Some(log) = &self.log {
            log.append(event);
        }
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("client", &self.client)
            .field("has_log", &self.log.is_some())
            .field("subscribers", &self.subscribers.len())
            .field("bulk_depth", &self.bulk.len())
            .finish()
    }
}
