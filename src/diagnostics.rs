//! Runtime diagnostics.
//!
//! [`EventHistory`] keeps the most recent driver events in a fixed-size
//! ring so a host can dump them after a fault without a heap or a logger.
//! When full, the oldest entry is overwritten.

use heapless::Deque;

use crate::events::DriverEvent;
use crate::ports::EventSink;

const HISTORY_SLOTS: usize = 16;

/// Ring buffer of recent [`DriverEvent`]s.
#[derive(Debug, Default)]
pub struct EventHistory {
    events: Deque<DriverEvent, HISTORY_SLOTS>,
    /// Events pushed since construction, including overwritten ones.
    total: u32,
}

impl EventHistory {
    pub const CAPACITY: usize = HISTORY_SLOTS;

    pub fn new() -> Self {
        Self::default()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &DriverEvent> {
        self.events.iter()
    }

    pub fn last(&self) -> Option<&DriverEvent> {
        self.events.back()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Count retained events matching `pred`.
    pub fn count(&self, pred: impl Fn(&DriverEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for EventHistory {
    fn emit(&mut self, event: &DriverEvent) {
        if self.events.is_full() {
            self.events.pop_front();
        }
        // Cannot fail: a slot was freed above.
        let _ = self.events.push_back(*event);
        self.total = self.total.wrapping_add(1);
    }
}
