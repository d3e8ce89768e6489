//! Repeated-tap counter with decay.

use std::time::Duration;

use threshold_types::Timestamp;

use crate::Detector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapEvent {
    /// Trigger count reached. Fires once per arming cycle.
    Armed,
}

/// Counts taps on a fixed target; a burst of `trigger_count` taps, each
/// within `decay` of the previous one, arms it.
///
/// Once armed the counter is latched: further taps are no-ops until
/// [`rearm`](Self::rearm).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapCounter {
    trigger_count: u32,
    decay: Duration,
    count: u32,
    last_tap: Option<Timestamp>,
    armed: bool,
    disposed: bool,
}

impl TapCounter {
    #[must_use]
    pub fn new(trigger_count: u32, decay: Duration) -> Self {
        Self {
            trigger_count: trigger_count.max(1),
            decay,
            count: 0,
            last_tap: None,
            armed: false,
            disposed: false,
        }
    }

    pub fn tap(&mut self, now: Timestamp) -> Option<TapEvent> {
        if self.disposed || self.armed {
            return None;
        }

        self.expire(now);
        self.count = self.count.saturating_add(1);
        self.last_tap = Some(now);

        if self.count >= self.trigger_count {
            self.armed = true;
            self.count = 0;
            self.last_tap = None;
            tracing::debug!(at = %now, "Tap counter armed");
            return Some(TapEvent::Armed);
        }

        None
    }

    /// Drop a partial burst whose decay deadline has passed.
    pub fn expire(&mut self, now: Timestamp) {
        if let Some(deadline) = self.decay_deadline()
            && now > deadline
        {
            self.count = 0;
            self.last_tap = None;
        }
    }

    /// Clear the latch so a new burst can arm the counter again.
    pub fn rearm(&mut self) {
        self.armed = false;
        self.count = 0;
        self.last_tap = None;
    }

    #[must_use]
    pub fn decay_deadline(&self) -> Option<Timestamp> {
        self.last_tap.map(|last| last.saturating_add(self.decay))
    }

    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[must_use]
    pub fn last_tap(&self) -> Option<Timestamp> {
        self.last_tap
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

impl Detector for TapCounter {
    fn reset(&mut self) {
        self.count = 0;
        self.last_tap = None;
    }

    fn dispose(&mut self) {
        self.reset();
        self.disposed = true;
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}
