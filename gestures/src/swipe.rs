//! Downward swipe to dismiss a revealed layer.

use crate::Detector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// Progress passed the commit threshold; the layer should close.
    Commit,
    /// Released early; progress returns to zero.
    Cancel,
}

/// Tracks a single vertical touch from start to release.
///
/// Progress is `clamp(dy / divisor, 0, 1)` where `dy` is the downward
/// distance from the touch start. Upward movement never goes negative.
#[derive(Debug, Clone, PartialEq)]
pub struct SwipeTracker {
    divisor: f64,
    commit_above: f64,
    start_y: Option<f64>,
    progress: f64,
    disposed: bool,
}

impl SwipeTracker {
    #[must_use]
    pub fn new(divisor: f64, commit_above: f64) -> Self {
        Self {
            divisor,
            commit_above,
            start_y: None,
            progress: 0.0,
            disposed: false,
        }
    }

    pub fn touch_start(&mut self, y: f64) {
        if self.disposed {
            return;
        }
        self.start_y = Some(y);
        self.progress = 0.0;
    }

    /// Returns the updated progress; zero when no touch is active.
    pub fn touch_move(&mut self, y: f64) -> f64 {
        let Some(start) = self.start_y else {
            return 0.0;
        };
        let progress = ((y - start) / self.divisor).clamp(0.0, 1.0);
        self.progress = if progress.is_nan() { 0.0 } else { progress };
        self.progress
    }

    /// Ends the touch. `None` when no touch was in progress.
    pub fn release(&mut self) -> Option<SwipeOutcome> {
        self.start_y.take()?;
        let progress = std::mem::take(&mut self.progress);
        if progress > self.commit_above {
            tracing::debug!(progress, "Swipe committed");
            Some(SwipeOutcome::Commit)
        } else {
            Some(SwipeOutcome::Cancel)
        }
    }

    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.start_y.is_some()
    }
}

impl Detector for SwipeTracker {
    fn reset(&mut self) {
        self.start_y = None;
        self.progress = 0.0;
    }

    fn dispose(&mut self) {
        self.reset();
        self.disposed = true;
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}
