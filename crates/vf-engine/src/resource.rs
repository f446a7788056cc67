//! `ResourcePool` — counted mutual exclusion with a FIFO wait queue.
//!
//! # Contract
//!
//! - `in_use <= capacity` at all times.
//! - A waiter is granted only by `release`, and always the head of the
//!   queue: grant order equals request order.
//! - Every grant must be matched by exactly one `release`.  Releasing an idle
//!   pool is an invariant violation and returns an error.
//!
//! Granting on release moves the head straight into `in_use`, so the queue
//! length observed immediately after a release already excludes it.  The
//! caller is told who was granted and is responsible for resuming them.

use std::collections::VecDeque;

use crate::{EngineError, EngineResult};

/// Outcome of [`ResourcePool::request`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Grant {
    /// A unit was free; the caller now holds it.
    Immediate,
    /// The caller is waiting at this 0-based queue position.
    Queued { position: usize },
}

/// A pool of `capacity` identical units with a strict FIFO queue of `W`s.
#[derive(Debug, Clone)]
pub struct ResourcePool<W> {
    name:     String,
    capacity: usize,
    in_use:   usize,
    waiting:  VecDeque<W>,
}

impl<W> ResourcePool<W> {
    /// A pool with `capacity` units.  Zero capacity is rejected.
    pub fn new(name: impl Into<String>, capacity: usize) -> EngineResult<Self> {
        let name = name.into();
        if capacity == 0 {
            return Err(EngineError::ZeroCapacity(name));
        }
        Ok(Self { name, capacity, in_use: 0, waiting: VecDeque::new() })
    }

    /// A pool that never queues.  Occupancy is still counted.
    pub fn unbounded(name: impl Into<String>) -> Self {
        Self { name: name.into(), capacity: usize::MAX, in_use: 0, waiting: VecDeque::new() }
    }

    /// Take a unit if one is free, otherwise join the back of the queue.
    pub fn request(&mut self, who: W) -> Grant {
        if self.in_use < self.capacity {
            debug_assert!(self.waiting.is_empty(), "free unit with a non-empty queue");
            self.in_use += 1;
            Grant::Immediate
        } else {
            self.waiting.push_back(who);
            Grant::Queued { position: self.waiting.len() - 1 }
        }
    }

    /// Return a unit.  If anyone is waiting, the head of the queue is granted
    /// the unit immediately and returned so the caller can resume it.
    pub fn release(&mut self) -> EngineResult<Option<W>> {
        if self.in_use == 0 {
            return Err(EngineError::ReleaseWithoutAcquire(self.name.clone()));
        }
        match self.waiting.pop_front() {
            Some(next) => Ok(Some(next)),
            None => {
                self.in_use -= 1;
                Ok(None)
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_unbounded(&self) -> bool {
        self.capacity == usize::MAX
    }

    /// Units currently held.
    pub fn in_use(&self) -> usize {
        self.in_use
    }

    /// Requests currently waiting.
    pub fn queued(&self) -> usize {
        self.waiting.len()
    }

    /// Held plus waiting.
    pub fn load(&self) -> usize {
        self.in_use + self.waiting.len()
    }

    /// Waiters from head to tail.
    pub fn waiting(&self) -> impl Iterator<Item = &W> {
        self.waiting.iter()
    }
}
