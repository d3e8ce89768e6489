use std::time::Duration;

/// Progress of an animation through its duration, clamped to `[0, 1]`.
fn normalized_progress(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }

    let elapsed = elapsed.as_secs_f32();
    let total = duration.as_secs_f32();
    (elapsed / total).clamp(0.0, 1.0)
}

/// Elapsed time against a fixed duration. Built fresh for every frame from
/// the time since the owning transition.
#[derive(Debug, Clone)]
pub(crate) struct EffectTimer {
    elapsed: Duration,
    duration: Duration,
}

impl EffectTimer {
    pub(crate) fn at(elapsed: Duration, duration: Duration) -> Self {
        Self { elapsed, duration }
    }

    pub(crate) fn progress(&self) -> f32 {
        normalized_progress(self.elapsed, self.duration)
    }
}
