//! Bounded single-producer / single-consumer hand-off between the acquisition thread and
//! the foreground loop.
//!
//! When the queue is full the producer evicts the oldest event instead of blocking, so a
//! slow action on the foreground thread can never stall input acquisition or grow memory
//! without bound.

use crate::core::InputEvent;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

struct Inner {
    events: VecDeque<InputEvent>,
    closed: bool,
}

struct Shared {
    inner: Mutex<Inner>,
    ready: Condvar,
    capacity: usize,
    dropped: AtomicU64,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Neither side panics while holding the lock; recover the data if it ever happens.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Producer half. Dropping it closes the queue.
pub struct KeySender {
    shared: Arc<Shared>,
}

/// Consumer half.
pub struct KeyReceiver {
    shared: Arc<Shared>,
}

/// Creates a queue holding at most `capacity` events (minimum 1).
pub fn key_queue(capacity: usize) -> (KeySender, KeyReceiver) {
    let capacity = capacity.max(1);
    let shared = Arc::new(Shared {
        inner: Mutex::new(Inner {
            events: VecDeque::with_capacity(capacity),
            closed: false,
        }),
        ready: Condvar::new(),
        capacity,
        dropped: AtomicU64::new(0),
    });
    (
        KeySender {
            shared: shared.clone(),
        },
        KeyReceiver { shared },
    )
}

impl KeySender {
    /// Enqueues `event`, evicting the oldest queued event if the queue is full.
    ///
    /// Returns `true` when an event was evicted.
    pub fn push(&self, event: impl Into<InputEvent>) -> bool {
        let event = event.into();
        let evicted = {
            let mut inner = self.shared.lock();
            let evicted = if inner.events.len() >= self.shared.capacity {
                inner.events.pop_front()
            } else {
                None
            };
            inner.events.push_back(event);
            evicted
        };
        self.shared.ready.notify_one();

        match evicted {
            Some(old) => {
                let total = self.shared.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::debug!(dropped = ?old, total, "key queue full, dropped oldest event");
                true
            }
            None => false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }
}

impl Drop for KeySender {
    fn drop(&mut self) {
        self.shared.lock().closed = true;
        self.shared.ready.notify_all();
    }
}

impl KeyReceiver {
    /// Waits up to `timeout` for the next event.
    ///
    /// Returns `None` on timeout, or once the queue is empty and the sender is gone. A timeout
    /// too large to represent as an `Instant` waits without limit.
    pub fn pop_blocking(&self, timeout: Duration) -> Option<InputEvent> {
        let deadline = Instant::now().checked_add(timeout);
        let mut inner = self.shared.lock();
        loop {
            if let Some(event) = inner.events.pop_front() {
                return Some(event);
            }
            if inner.closed {
                return None;
            }
            inner = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return None;
                    }
                    match self.shared.ready.wait_timeout(inner, deadline - now) {
                        Ok((guard, _)) => guard,
                        Err(poisoned) => poisoned.into_inner().0,
                    }
                }
                None => match self.shared.ready.wait(inner) {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                },
            };
        }
    }

    pub fn try_pop(&self) -> Option<InputEvent> {
        self.shared.lock().events.pop_front()
    }

    /// Discards everything currently queued and returns how many events were removed.
    pub fn drain(&self) -> usize {
        let mut inner = self.shared.lock();
        let n = inner.events.len();
        inner.events.clear();
        n
    }

    pub fn len(&self) -> usize {
        self.shared.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the producer side has been dropped.
    pub fn is_closed(&self) -> bool {
        self.shared.lock().closed
    }

    /// Number of events evicted because the queue was full.
    pub fn dropped(&self) -> u64 {
        self.shared.dropped.load(Ordering::Relaxed)
    }

    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }
}

#[cfg(test)]
#[path = "../../tests/unit/input/queue.rs"]
mod tests;
