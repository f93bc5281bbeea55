//! Timing helpers for layout updates
//!
//! `Debounced` holds back container resizes until they settle; `FrameCoalescer`
//! keeps only the newest scroll offset until the next frame is drawn.

use std::time::{Duration, Instant};

/// Latest value, released once no new value arrived for `delay`
#[derive(Debug, Clone)]
pub struct Debounced<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debounced<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replace the pending value and restart the timer
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes due
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.delay)
    }

    /// Take the value if it has been quiet for at least `delay`
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(deadline) if now >= deadline => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

/// At most one update per frame, newest wins
#[derive(Debug, Clone, Default)]
pub struct FrameCoalescer<T> {
    pending: Option<T>,
}

impl<T> FrameCoalescer<T> {
    pub fn new() -> Self {
        Self { pending: None }
    }

    pub fn push(&mut self, value: T) {
        self.pending = Some(value);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Called once per frame
    pub fn take(&mut self) -> Option<T> {
        self.pending.take()
    }
}
