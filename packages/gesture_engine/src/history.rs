use heapless::Deque;

use crate::{
    types::{elapsed_ms, ActivationEvent, SensorIndex},
    HISTORY_CAPACITY,
};

/// Bounded, insertion-ordered ring of activation events. A push into a full
/// ring evicts the oldest event.
#[derive(Clone, Debug)]
pub struct EventHistory {
    events: Deque<ActivationEvent, HISTORY_CAPACITY>,
}

impl EventHistory {
    pub const fn new() -> Self {
        Self {
            events: Deque::new(),
        }
    }

    pub fn push(&mut self, sensor: SensorIndex, t_ms: u32) -> Option<ActivationEvent> {
        let evicted = if self.events.is_full() {
            self.events.pop_front()
        } else {
            None
        };
        // Cannot fail: a slot was freed above when the ring was full.
        let _ = self.events.push_back(ActivationEvent { sensor, t_ms });
        evicted
    }

    /// Drops every event older than `retention_ms` relative to `now_ms`,
    /// keeping survivors in order. Returns how many were dropped.
    pub fn prune(&mut self, now_ms: u32, retention_ms: u32) -> usize {
        let len = self.events.len();
        let mut dropped = 0;
        for _ in 0..len {
            let Some(event) = self.events.pop_front() else {
                break;
            };
            if elapsed_ms(now_ms, event.t_ms) <= retention_ms {
                let _ = self.events.push_back(event);
            } else {
                dropped += 1;
            }
        }
        dropped
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn latest(&self) -> Option<ActivationEvent> {
        self.events.back().copied()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ActivationEvent> + '_ {
        self.events.iter()
    }
}

impl Default for EventHistory {
    fn default() -> Self {
        Self::new()
    }
}
