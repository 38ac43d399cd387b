//! Periodic event emitter (keep-alive, "I am here" status frames).
//!
//! Polled: each bus cycle compares the clock with the last emission and
//! publishes the configured event once `period_ms` has elapsed. Nothing is
//! sent at `init`; the first heartbeat goes out on the first cycle.
use crate::protocol::bus::{Emit, Node};
use crate::protocol::message::{Event, Message};
use crate::protocol::transport::traits::clock::Clock;

pub struct Heartbeat<K: Clock> {
    clock: K,
    event: Event,
    period_ms: u64,
    last: Option<u64>,
}

impl<K: Clock> Heartbeat<K> {
    pub fn new(clock: K, event: Event, period_ms: u64) -> Self {
        Self {
            clock,
            event,
            period_ms,
            last: None,
        }
    }

    /// Replace the payload sent from the next beat on.
    pub fn set_event(&mut self, event: Event) {
        self.event = event;
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    fn due(&self, now: u64) -> bool {
        match self.last {
            Some(last) => now.wrapping_sub(last) >= self.period_ms,
            None => true,
        }
    }
}

impl<K: Clock> Node for Heartbeat<K> {
    fn emit(&mut self, emit: &mut Emit<'_>) {
        let now = self.clock.now_ms();
        if self.due(now) {
            self.last = Some(now);
            emit(&Message::event_view(&self.event));
        }
    }
}
