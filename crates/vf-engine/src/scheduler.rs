//! `EventScheduler` — the virtual clock and its pending-event queue.
//!
//! # Ordering
//!
//! Entries are keyed by `(due, seq)` where `seq` is a per-scheduler counter
//! incremented on every `schedule_after`.  The binary heap therefore pops
//! the earliest due time first and, among equal due times, the entry that
//! was scheduled first.  Nothing else influences order, which is what makes
//! runs reproducible.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use vf_core::SimTime;

use crate::{EngineError, EngineResult};

struct Scheduled<E> {
    due:   SimTime,
    seq:   u64,
    event: E,
}

impl<E> PartialEq for Scheduled<E> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<E> Eq for Scheduled<E> {}

impl<E> PartialOrd for Scheduled<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Scheduled<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due.cmp(&other.due).then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Virtual clock plus a min-queue of timed events of type `E`.
pub struct EventScheduler<E> {
    now:        SimTime,
    next_seq:   u64,
    queue:      BinaryHeap<Reverse<Scheduled<E>>>,
    dispatched: u64,
}

impl<E> Default for EventScheduler<E> {
    fn default() -> Self {
        Self {
            now:        SimTime::ZERO,
            next_seq:   0,
            queue:      BinaryHeap::new(),
            dispatched: 0,
        }
    }
}

impl<E> EventScheduler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[inline]
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Schedule `event` to fire `delay` seconds from now.  Returns the due
    /// time.  A zero delay fires after everything already due at `now`.
    pub fn schedule_after(&mut self, delay: f64, event: E) -> EngineResult<SimTime> {
        if !(delay >= 0.0) || !delay.is_finite() {
            return Err(EngineError::InvalidDelay(delay));
        }
        let due = self.now + delay;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Scheduled { due, seq, event }));
        Ok(due)
    }

    /// Pop the earliest event if it is due strictly before `until`,
    /// advancing the clock to its due time.
    pub fn pop_before(&mut self, until: SimTime) -> Option<E> {
        let Reverse(head) = self.queue.peek()?;
        if head.due >= until {
            return None;
        }
        let Reverse(next) = self.queue.pop()?;
        self.now = next.due;
        self.dispatched += 1;
        Some(next.event)
    }

    /// Dispatch events in `(time, seq)` order until the queue is empty or
    /// the next event is due at or after `until`; the clock then reads
    /// `until`.  The first error returned by `dispatch` stops the run and is
    /// passed through.
    ///
    /// `dispatch` receives the scheduler so handlers can schedule follow-up
    /// events; everything else it needs should be captured by the closure.
    pub fn run_until<Er, F>(&mut self, until: SimTime, mut dispatch: F) -> Result<u64, Er>
    where
        F: FnMut(&mut Self, E) -> Result<(), Er>,
    {
        let mut count = 0;
        while let Some(event) = self.pop_before(until) {
            dispatch(self, event)?;
            count += 1;
        }
        if self.now < until {
            self.now = until;
        }
        Ok(count)
    }

    /// Due time of the earliest pending event.
    pub fn next_due(&self) -> Option<SimTime> {
        self.queue.peek().map(|Reverse(s)| s.due)
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Total events dispatched since construction.
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }
}
