//! Deferred-callback timer service.
//!
//! The only suspension mechanism in Fresco is the one-shot deferred timer:
//! gesture windows and redraw coalescing both park work here and get called
//! back when their delay elapses. The service runs on a *logical clock* -
//! the host advances time explicitly with [`TimerService::advance`] and acts
//! on the ids that expired - so classification timing is exact and every
//! timing test is deterministic, with no wall clock involved.
//!
//! Cancellation is idempotent: cancelling an id that already fired or was
//! never scheduled is a no-op, never an error.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a scheduled timer.
    pub struct TimerId;
}

/// Internal timer data.
#[derive(Debug)]
struct TimerData {
    /// Logical time at which this timer fires.
    fire_at: Duration,
}

/// An entry in the timer queue (min-heap by fire time).
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    id: TimerId,
    fire_at: Duration,
    /// Schedule sequence number; breaks fire-time ties first-scheduled-first.
    seq: u64,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at && self.seq == other.seq
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behavior (BinaryHeap is a max-heap).
        other
            .fire_at
            .cmp(&self.fire_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Default)]
struct TimerCore {
    timers: SlotMap<TimerId, TimerData>,
    queue: BinaryHeap<QueueEntry>,
    now: Duration,
    next_seq: u64,
}

/// One-shot deferred timers on a host-advanced logical clock.
///
/// Shareable by reference (interior mutability); every operation is a short
/// critical section, safe to call from any phase of event handling.
pub struct TimerService {
    inner: Mutex<TimerCore>,
}

impl TimerService {
    /// Create a timer service with its clock at zero.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(TimerCore::default()),
        }
    }

    /// Schedule a one-shot timer `delay` from the current logical time.
    ///
    /// A zero delay is legal; the timer expires on the next `advance` call,
    /// including `advance(Duration::ZERO)`. Callers that need zero-delay
    /// work done *synchronously* should not schedule at all.
    pub fn schedule(&self, delay: Duration) -> TimerId {
        let mut core = self.inner.lock();
        let fire_at = core.now + delay;
        let id = core.timers.insert(TimerData { fire_at });
        let seq = core.next_seq;
        core.next_seq += 1;
        core.queue.push(QueueEntry { id, fire_at, seq });
        tracing::trace!(target: targets::TIMER, ?id, ?delay, "timer scheduled");
        id
    }

    /// Cancel a pending timer.
    ///
    /// Returns `true` if the timer was pending. Cancelling an id that
    /// already fired, was already cancelled, or was never scheduled is a
    /// no-op returning `false`.
    pub fn cancel(&self, id: TimerId) -> bool {
        let cancelled = self.inner.lock().timers.remove(id).is_some();
        if cancelled {
            tracing::trace!(target: targets::TIMER, ?id, "timer cancelled");
        }
        cancelled
    }

    /// Whether a timer is scheduled and has not yet fired.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.inner.lock().timers.contains_key(id)
    }

    /// Advance the logical clock and collect expired timers.
    ///
    /// Returns the ids that fired, in fire-time order (ties in schedule
    /// order). Cancelled entries still sitting in the queue are skipped.
    pub fn advance(&self, elapsed: Duration) -> Vec<TimerId> {
        let mut core = self.inner.lock();
        core.now += elapsed;
        let now = core.now;

        let mut fired = Vec::new();
        while let Some(entry) = core.queue.peek() {
            if entry.fire_at > now {
                break;
            }
            let entry = core.queue.pop().expect("peeked entry");
            // Stale entry: the timer was cancelled after being queued.
            if core.timers.remove(entry.id).is_none() {
                continue;
            }
            tracing::trace!(target: targets::TIMER, id = ?entry.id, "timer fired");
            fired.push(entry.id);
        }
        fired
    }

    /// Logical time until the next pending timer fires.
    ///
    /// Returns `None` when nothing is pending.
    pub fn time_until_next(&self) -> Option<Duration> {
        let mut core = self.inner.lock();
        // Drop cancelled entries from the front of the queue.
        while let Some(entry) = core.queue.peek() {
            if core.timers.contains_key(entry.id) {
                let now = core.now;
                return Some(entry.fire_at.saturating_sub(now));
            }
            core.queue.pop();
        }
        None
    }

    /// The current logical time.
    pub fn now(&self) -> Duration {
        self.inner.lock().now
    }

    /// Number of pending timers.
    pub fn pending_count(&self) -> usize {
        self.inner.lock().timers.len()
    }
}

impl Default for TimerService {
    fn default() -> Self {
        Self::new()
    }
}

static_assertions::assert_impl_all!(TimerService: Send, Sync);
