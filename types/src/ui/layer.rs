//! Layer entry/exit effects.
//!
//! Offsets are fractions of the viewport height (1.0 = one full screen).

use std::time::Duration;

use super::animation::EffectTimer;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayerEffectKind {
    /// Fades in while sliding up from `from_offset`.
    RiseIn { from_offset: f32 },
    /// Fades out while dropping to `to_offset`.
    FallAway { to_offset: f32 },
    FadeIn,
    FadeOut,
}

#[derive(Debug, Clone)]
pub struct LayerEffect {
    kind: LayerEffectKind,
    timer: EffectTimer,
}

impl LayerEffect {
    #[must_use]
    pub fn new(kind: LayerEffectKind, elapsed: Duration, duration: Duration) -> Self {
        Self {
            kind,
            timer: EffectTimer::at(elapsed, duration),
        }
    }

    #[must_use]
    pub fn opacity(&self) -> f32 {
        let p = self.timer.progress();
        match self.kind {
            LayerEffectKind::RiseIn { .. } | LayerEffectKind::FadeIn => p,
            LayerEffectKind::FallAway { .. } | LayerEffectKind::FadeOut => 1.0 - p,
        }
    }

    #[must_use]
    pub fn offset_y(&self) -> f32 {
        let p = self.timer.progress();
        match self.kind {
            LayerEffectKind::RiseIn { from_offset } => from_offset * (1.0 - p),
            LayerEffectKind::FallAway { to_offset } => to_offset * p,
            LayerEffectKind::FadeIn | LayerEffectKind::FadeOut => 0.0,
        }
    }
}
