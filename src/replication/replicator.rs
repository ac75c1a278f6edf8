//! Log consumer: replays other peers' events in log order.
//!
//! The replicator keeps a cursor into the shared log and a queue of events
//! pulled from it. `bulk` envelopes are expanded into their sub-events, each
//! paced by the envelope's `timing`; plain entries use the configured
//! default delay. `poll` applies every queued event that is due, pulling
//! more entries from the log as the queue empties, so growth that appears
//! mid-drain is picked up by the same pass.
//!
//! Events authored by the local client are recorded in the activity log but
//! not applied: the local play area already committed them.
//!
//! A failing event stays at the head of the queue and the error is returned.
//! Later polls retry it and fail the same way until `skip_failed` drops it,
//! so replay never runs ahead of an event it could not apply.

use std::collections::VecDeque;

use tracing::{debug, error};

use super::activity::ActivityLog;
use super::handlers::HandlerTable;
use crate::core::{Clock, ClientId, ReplayConfig, Result};
use crate::events::{Event, EventBody, OrderedLog};
use crate::table::Tabletop;

#[derive(Debug)]
struct Pending {
    event: Event,
    /// Pause after this event before the next one is applied.
    delay_ms: u64,
}

pub struct Replicator {
    local: ClientId,
    log: Box<dyn OrderedLog>,
    handlers: HandlerTable,
    activity: ActivityLog,
    cursor: usize,
    queue: VecDeque<Pending>,
    next_due_ms: u64,
    default_delay_ms: u64,
}

impl std::fmt::Debug for Replicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Replicator")
            .field("local", &self.local)
            .field("cursor", &self.cursor)
            .field("log_len", &self.log.len())
            .field("queued", &self.queue.len())
            .field("next_due_ms", &self.next_due_ms)
            .finish()
    }
}

impl Replicator {
    /// Consume `log` on behalf of `local` with the standard handlers.
    pub fn new(local: ClientId, log: impl OrderedLog + 'static, config: &ReplayConfig) -> Self {
        Self {
            local,
            log: Box::new(log),
            handlers: HandlerTable::standard(),
            activity: ActivityLog::new(),
            cursor: 0,
            queue: VecDeque::new(),
            next_due_ms: 0,
            default_delay_ms: config.event_delay_ms,
        }
    }

    /// Replace the handler table.
    #[must_use]
    pub fn with_handlers(mut self, handlers: HandlerTable) -> Self {
        self.handlers = handlers;
        self
    }

    #[must_use]
    pub fn local(&self) -> &ClientId {
        &self.local
    }

    /// Log entries pulled so far.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Events pulled from the log but not yet applied.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// True when every log entry has been pulled and applied.
    #[must_use]
    pub fn is_caught_up(&self) -> bool {
        self.queue.is_empty() && self.cursor >= self.log.len()
    }

    #[must_use]
    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    /// Drop the event at the head of the queue, typically after `poll`
    /// reported it could not be applied.
    pub fn skip_failed(&mut self) -> Option<Event> {
        let skipped = self.queue.pop_front().map(|pending| pending.event)?;
        error!(client = %skipped.client_id, kind = %skipped.kind(), "skipping unreplayable event");
        Some(skipped)
    }

    /// Pull the next log entry into the queue. Returns `false` at the end of the log.
    fn pull(&mut self) -> bool {
        let Some(entry) = self.log.get(self.cursor) else {
            return false;
        };
        self.cursor += 1;
        match entry.body {
            EventBody::Bulk(bulk) => {
                debug!(client = %entry.client_id, events = bulk.events.len(), timing = bulk.timing, "expanding bulk");
                self.queue.extend(bulk.events.into_iter().map(|event| Pending {
                    event,
                    delay_ms: bulk.timing,
                }));
            }
            body => self.queue.push_back(Pending {
                event: Event::new(entry.client_id, body),
                delay_ms: self.default_delay_ms,
            }),
        }
        true
    }

    /// Apply every event that is due at `now_ms`. Returns how many were
    /// processed, local ones included.
    pub fn poll(&mut self, table: &mut Tabletop, now_ms: u64) -> Result<usize> {
        let mut processed = 0;
        while now_ms >= self.next_due_ms {
            if self.queue.is_empty() && !self.pull() {
                break;
            }
            let Some(pending) = self.queue.pop_front() else {
                // Empty bulk envelope
                continue;
            };

            if let Err(err) = self.apply(table, &pending.event) {
                error!(
                    client = %pending.event.client_id,
                    kind = %pending.event.kind(),
                    cursor = self.cursor,
                    error = %err,
                    "replay failed"
                );
                self.queue.push_front(pending);
                return Err(err);
            }

            self.activity.record(&pending.event);
            processed += 1;
            self.next_due_ms = now_ms + pending.delay_ms;
        }
        Ok(processed)
    }

    /// One frame: advance animations to the clock, then replay what is due.
    pub fn step(&mut self, table: &mut Tabletop, clock: &impl Clock) -> Result<usize> {
        let now = clock.now_ms();
        table.tick(now);
        self.poll(table, now)
    }

    fn apply(&self, table: &mut Tabletop, event: &Event) -> Result<()> {
        if event.client_id == self.local {
            return Ok(());
        }
        debug!(client = %event.client_id, kind = %event.kind(), "replaying event");
        match &event.body {
            EventBody::Join(snapshot) => table.join_remote(snapshot).map(|_| ()),
            EventBody::Bulk(bulk) => bulk
                .events
                .iter()
                .try_for_each(|inner| self.apply(table, inner)),
            body => {
                let (area, ctx) = table.area_mut(&event.client_id)?;
                ctx.animator.enqueue_group();
                self.handlers.dispatch(area, ctx, body)
            }
        }
    }
}
