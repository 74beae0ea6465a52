//! Single-threaded timer queue on a virtual clock.
//!
//! Time only moves when the owner pops due entries; nothing here sleeps.
//! Entries due at the same instant fire in the order they were armed.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TimerId(u64);

type Slot = (Duration, u64);

#[derive(Debug)]
struct Entry<E> {
    id: TimerId,
    event: E,
    every: Option<Duration>,
}

#[derive(Debug)]
pub struct Scheduler<E> {
    now: Duration,
    next_seq: u64,
    queue: BTreeMap<Slot, Entry<E>>,
    slots: HashMap<TimerId, Slot>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            queue: BTreeMap::new(),
            slots: HashMap::new(),
        }
    }
}

impl<E: Clone> Scheduler<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Fire `event` once, `delay` from now.
    ///
    /// A deadline past the end of the clock never fires; the returned id is
    /// not pending.
    pub fn set_timeout(&mut self, delay: Duration, event: E) -> TimerId {
        let id = TimerId(self.bump());
        self.arm(id, self.now.checked_add(delay), event, None);
        id
    }

    /// Fire `event` every `period`, starting one period from now.
    ///
    /// Periods shorter than a millisecond are raised to one millisecond.
    pub fn set_interval(&mut self, period: Duration, event: E) -> TimerId {
        let period = period.max(Duration::from_millis(1));
        let id = TimerId(self.bump());
        self.arm(id, self.now.checked_add(period), event, Some(period));
        id
    }

    /// Returns `false` when the timer already fired (one-shot) or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.slots
            .remove(&id)
            .is_some_and(|slot| self.queue.remove(&slot).is_some())
    }

    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.slots.contains_key(&id)
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(deadline, _)| *deadline)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pop the earliest entry due at or before `until`, moving the clock to it.
    ///
    /// Intervals are re-armed before they are handed out, so the caller may
    /// cancel them from inside its handler.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerId, E)> {
        let (&slot, _) = self.queue.iter().next()?;
        if slot.0 > until {
            return None;
        }
        let entry = self.queue.remove(&slot)?;
        self.slots.remove(&entry.id);
        self.now = self.now.max(slot.0);
        if let Some(period) = entry.every {
            self.arm(
                entry.id,
                self.now.checked_add(period),
                entry.event.clone(),
                Some(period),
            );
        }
        Some((entry.id, entry.event))
    }

    /// Move the clock forward without firing anything.
    ///
    /// Callers drain [`Self::pop_due`] first; the clock never moves backwards.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    /// Drop every pending entry; the clock keeps its value.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.slots.clear();
    }

    fn arm(&mut self, id: TimerId, deadline: Option<Duration>, event: E, every: Option<Duration>) {
        let Some(deadline) = deadline else {
            return;
        };
        let slot = (deadline, self.bump());
        self.slots.insert(id, slot);
        self.queue.insert(slot, Entry { id, event, every });
    }

    fn bump(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}
