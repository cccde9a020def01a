// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unbounded blocking FIFO queue backed by a growable ring buffer
//!
//! Producers never block: `put` and `insert` only hold the mutex long enough
//! to touch the buffer. A single consumer waits in [`EventQueue::get_or_block`]
//! until an item arrives, the timeout elapses, or shutdown mode is entered.
//! Once shut down, every read returns [`Dequeued::Shutdown`] forever.

use std::ops::ControlFlow;
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Default initial ring capacity
pub const DEFAULT_INITIAL_CAPACITY: usize = 256;

/// Default number of slots added when the ring is full
pub const DEFAULT_GROW_INCREMENT: usize = 32;

/// Outcome of a read from the queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dequeued<T> {
    Item(T),
    /// Nothing queued (or the wait timed out)
    Empty,
    /// The queue is in shutdown mode; the consumer should stop
    Shutdown,
}

impl<T> Dequeued<T> {
    pub fn into_item(self) -> Option<T> {
        match self {
            Dequeued::Item(item) => Some(item),
            Dequeued::Empty | Dequeued::Shutdown => None,
        }
    }

    pub fn is_shutdown(&self) -> bool {
        matches!(self, Dequeued::Shutdown)
    }
}

/// Ring buffer that grows by a fixed increment and shrinks back to its
/// initial size once mostly drained
#[derive(Debug)]
struct Ring<T> {
    slots: Vec<Option<T>>,
    first: usize,
    len: usize,
    initial: usize,
    increment: usize,
}

impl<T> Ring<T> {
    fn new(initial: usize, increment: usize) -> Self {
        let initial = initial.max(1);
        Self {
            slots: std::iter::repeat_with(|| None).take(initial).collect(),
            first: 0,
            len: 0,
            initial,
            increment: increment.max(1),
        }
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn slot(&self, offset: usize) -> usize {
        (self.first + offset) % self.capacity()
    }

    /// Open `increment` empty slots at the head position so the wrapped
    /// segment `[first, end)` moves up and stays contiguous modulo capacity
    fn grow(&mut self) {
        let gap = std::iter::repeat_with(|| None).take(self.increment);
        self.slots.splice(self.first..self.first, gap);
        self.first += self.increment;
    }

    /// Compact back to the initial capacity when at most half of it is used
    /// and the live range does not wrap
    fn maybe_shrink(&mut self) {
        if self.capacity() == self.initial
            || self.len > self.initial / 2
            || self.first + self.len > self.capacity()
        {
            return;
        }
        self.slots.rotate_left(self.first);
        self.slots.truncate(self.initial);
        self.first = 0;
    }

    fn push_back(&mut self, item: T) {
        if self.len == self.capacity() {
            self.grow();
        }
        let idx = self.slot(self.len);
        self.slots[idx] = Some(item);
        self.len += 1;
    }

    fn push_front(&mut self, item: T) {
        if self.len == self.capacity() {
            self.grow();
        }
        self.first = (self.first + self.capacity() - 1) % self.capacity();
        self.slots[self.first] = Some(item);
        self.len += 1;
    }

    fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let item = self.slots[self.first].take();
        self.first = (self.first + 1) % self.capacity();
        self.len -= 1;
        if self.len == 0 {
            self.first = 0;
        }
        self.maybe_shrink();
        item
    }

    fn get(&self, offset: usize) -> Option<&T> {
        if offset >= self.len {
            return None;
        }
        self.slots[self.slot(offset)].as_ref()
    }

    fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.len).filter_map(move |offset| self.slots[self.slot(offset)].as_ref())
    }

    fn position(&self, mut pred: impl FnMut(&T) -> bool) -> Option<usize> {
        (0..self.len).find(|&offset| {
            self.slots[self.slot(offset)]
                .as_ref()
                .is_some_and(&mut pred)
        })
    }

    /// Take the item at `offset` and close the gap behind it
    fn remove_at(&mut self, offset: usize) -> Option<T> {
        let idx = self.slot(offset);
        let item = self.slots[idx].take();
        for k in offset..self.len - 1 {
            let (to, from) = (self.slot(k), self.slot(k + 1));
            self.slots[to] = self.slots[from].take();
        }
        self.len -= 1;
        if self.len == 0 {
            self.first = 0;
        }
        self.maybe_shrink();
        item
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.slots
            .extend(std::iter::repeat_with(|| None).take(self.initial));
        self.first = 0;
        self.len = 0;
    }
}

#[derive(Debug)]
struct State<T> {
    ring: Ring<T>,
    shutdown: bool,
}

/// Multi-producer, single-consumer blocking queue
#[derive(Debug)]
pub struct EventQueue<T> {
    state: Mutex<State<T>>,
    ready: Condvar,
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INITIAL_CAPACITY, DEFAULT_GROW_INCREMENT)
    }

    pub fn with_capacity(initial: usize, increment: usize) -> Self {
        Self {
            state: Mutex::new(State {
                ring: Ring::new(initial, increment),
                shutdown: false,
            }),
            ready: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Enqueue at the tail and wake one waiting consumer
    pub fn put(&self, item: T) {
        self.lock().ring.push_back(item);
        self.ready.notify_one();
    }

    /// Enqueue at the head, ahead of everything already queued
    pub fn insert(&self, item: T) {
        self.lock().ring.push_front(item);
        self.ready.notify_one();
    }

    /// Dequeue the head without waiting
    pub fn get(&self) -> Dequeued<T> {
        let mut state = self.lock();
        if state.shutdown {
            return Dequeued::Shutdown;
        }
        match state.ring.pop_front() {
            Some(item) => Dequeued::Item(item),
            None => Dequeued::Empty,
        }
    }

    /// Dequeue the head, waiting up to `timeout` (forever if `None`)
    ///
    /// A timeout too large to represent as a deadline waits forever.
    pub fn get_or_block(&self, timeout: Option<Duration>) -> Dequeued<T> {
        let deadline = timeout.and_then(|t| Instant::now().checked_add(t));
        let mut state = self.lock();
        loop {
            if state.shutdown {
                return Dequeued::Shutdown;
            }
            if let Some(item) = state.ring.pop_front() {
                return Dequeued::Item(item);
            }
            state = match deadline {
                None => self.ready.wait(state).unwrap_or_else(|e| e.into_inner()),
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Dequeued::Empty;
                    }
                    self.ready
                        .wait_timeout(state, deadline - now)
                        .unwrap_or_else(|e| e.into_inner())
                        .0
                }
            };
        }
    }

    /// Drop every queued item
    pub fn clear(&self) {
        self.lock().ring.clear();
    }

    /// Enter shutdown mode and wake every waiter; idempotent
    pub fn set_shutdown_mode(&self) {
        self.lock().shutdown = true;
        self.ready.notify_all();
    }

    pub fn is_shutdown(&self) -> bool {
        self.lock().shutdown
    }

    pub fn len(&self) -> usize {
        self.lock().ring.len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current ring capacity
    pub fn capacity(&self) -> usize {
        self.lock().ring.capacity()
    }

    /// First queued item matching `pred`; it stays queued
    pub fn find(&self, pred: impl FnMut(&T) -> bool) -> Option<T>
    where
        T: Clone,
    {
        let state = self.lock();
        let offset = state.ring.position(pred)?;
        state.ring.get(offset).cloned()
    }

    /// Remove and return the first queued item matching `pred`
    pub fn remove(&self, pred: impl FnMut(&T) -> bool) -> Option<T> {
        let mut state = self.lock();
        let offset = state.ring.position(pred)?;
        state.ring.remove_at(offset)
    }

    /// Visit queued items head to tail under the lock until `f` breaks
    pub fn for_each(&self, mut f: impl FnMut(&T) -> ControlFlow<()>) {
        let state = self.lock();
        for item in state.ring.iter() {
            if f(item).is_break() {
                break;
            }
        }
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
