//! Resolved unlock tunables.
//!
//! The raw TOML struct (all `Option` fields) stays private. It is resolved
//! into [`UnlockSettings`] at the deserialization boundary, so an
//! `UnlockSettings` value is proof that every threshold is coherent.

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("tap_trigger_count must be at least 1")]
    ZeroTriggerCount,
    #[error("knob_unlock_degrees ({unlock}) must be positive and not exceed knob_max_degrees ({max})")]
    KnobRange { unlock: f64, max: f64 },
    #[error(
        "tilt_upright_degrees ({upright}) must be below tilt_upside_down_degrees ({upside_down})"
    )]
    TiltZones { upright: f64, upside_down: f64 },
    #[error("swipe_divisor_px must be positive, got {0}")]
    SwipeDivisor(f64),
    #[error("{name} must lie in (0, 1], got {value}")]
    Fraction { name: &'static str, value: f64 },
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawUnlockSettings {
    tap_trigger_count: Option<u32>,
    tap_decay_ms: Option<u64>,
    double_tap_window_ms: Option<u64>,
    knob_unlock_degrees: Option<f64>,
    knob_max_degrees: Option<f64>,
    unlock_pause_ms: Option<u64>,
    verdict_delay_ms: Option<u64>,
    dismiss_delay_ms: Option<u64>,
    depth_unlock_delay_ms: Option<u64>,
    tilt_upside_down_degrees: Option<f64>,
    tilt_upright_degrees: Option<f64>,
    tilt_activate_ms: Option<u64>,
    tilt_deactivate_ms: Option<u64>,
    swipe_divisor_px: Option<f64>,
    swipe_commit_progress: Option<f64>,
    scroll_reset_progress: Option<f64>,
    typewriter_interval_ms: Option<u64>,
    challenge_enabled: Option<bool>,
}

/// Every threshold and delay the unlock sequence uses.
///
/// Defaults follow the production site; each value can be overridden from
/// the `[unlock]` config section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawUnlockSettings")]
pub struct UnlockSettings {
    tap_trigger_count: u32,
    tap_decay: Duration,
    double_tap_window: Duration,
    knob_unlock_degrees: f64,
    knob_max_degrees: f64,
    unlock_pause: Duration,
    verdict_delay: Duration,
    dismiss_delay: Duration,
    depth_unlock_delay: Duration,
    tilt_upside_down_degrees: f64,
    tilt_upright_degrees: f64,
    tilt_activate: Duration,
    tilt_deactivate: Duration,
    swipe_divisor_px: f64,
    swipe_commit_progress: f64,
    scroll_reset_progress: f64,
    typewriter_interval: Duration,
    challenge_enabled: bool,
}

impl Default for UnlockSettings {
    fn default() -> Self {
        Self {
            tap_trigger_count: 5,
            tap_decay: Duration::from_millis(3000),
            double_tap_window: Duration::from_millis(400),
            knob_unlock_degrees: 175.0,
            knob_max_degrees: 185.0,
            unlock_pause: Duration::from_millis(400),
            verdict_delay: Duration::from_millis(2500),
            dismiss_delay: Duration::from_millis(500),
            depth_unlock_delay: Duration::from_millis(1200),
            tilt_upside_down_degrees: 140.0,
            tilt_upright_degrees: 40.0,
            tilt_activate: Duration::from_millis(2000),
            tilt_deactivate: Duration::from_millis(1000),
            swipe_divisor_px: 250.0,
            swipe_commit_progress: 0.4,
            scroll_reset_progress: 0.95,
            typewriter_interval: Duration::from_millis(80),
            challenge_enabled: true,
        }
    }
}

fn check_fraction(name: &'static str, value: f64) -> Result<f64, SettingsError> {
    if value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(SettingsError::Fraction { name, value })
    }
}

impl TryFrom<RawUnlockSettings> for UnlockSettings {
    type Error = SettingsError;

    fn try_from(raw: RawUnlockSettings) -> Result<Self, Self::Error> {
        let defaults = Self::default();
        let ms = |value: Option<u64>, fallback: Duration| {
            value.map_or(fallback, Duration::from_millis)
        };

        let tap_trigger_count = raw.tap_trigger_count.unwrap_or(defaults.tap_trigger_count);
        if tap_trigger_count == 0 {
            return Err(SettingsError::ZeroTriggerCount);
        }

        let knob_unlock_degrees = raw
            .knob_unlock_degrees
            .unwrap_or(defaults.knob_unlock_degrees);
        let knob_max_degrees = raw.knob_max_degrees.unwrap_or(defaults.knob_max_degrees);
        if knob_unlock_degrees <= 0.0 || knob_unlock_degrees > knob_max_degrees {
            return Err(SettingsError::KnobRange {
                unlock: knob_unlock_degrees,
                max: knob_max_degrees,
            });
        }

        let tilt_upside_down_degrees = raw
            .tilt_upside_down_degrees
            .unwrap_or(defaults.tilt_upside_down_degrees);
        let tilt_upright_degrees = raw
            .tilt_upright_degrees
            .unwrap_or(defaults.tilt_upright_degrees);
        if tilt_upright_degrees >= tilt_upside_down_degrees {
            return Err(SettingsError::TiltZones {
                upright: tilt_upright_degrees,
                upside_down: tilt_upside_down_degrees,
            });
        }

        let swipe_divisor_px = raw.swipe_divisor_px.unwrap_or(defaults.swipe_divisor_px);
        if swipe_divisor_px <= 0.0 {
            return Err(SettingsError::SwipeDivisor(swipe_divisor_px));
        }

        Ok(Self {
            tap_trigger_count,
            tap_decay: ms(raw.tap_decay_ms, defaults.tap_decay),
            double_tap_window: ms(raw.double_tap_window_ms, defaults.double_tap_window),
            knob_unlock_degrees,
            knob_max_degrees,
            unlock_pause: ms(raw.unlock_pause_ms, defaults.unlock_pause),
            verdict_delay: ms(raw.verdict_delay_ms, defaults.verdict_delay),
            dismiss_delay: ms(raw.dismiss_delay_ms, defaults.dismiss_delay),
            depth_unlock_delay: ms(raw.depth_unlock_delay_ms, defaults.depth_unlock_delay),
            tilt_upside_down_degrees,
            tilt_upright_degrees,
            tilt_activate: ms(raw.tilt_activate_ms, defaults.tilt_activate),
            tilt_deactivate: ms(raw.tilt_deactivate_ms, defaults.tilt_deactivate),
            swipe_divisor_px,
            swipe_commit_progress: check_fraction(
                "swipe_commit_progress",
                raw.swipe_commit_progress
                    .unwrap_or(defaults.swipe_commit_progress),
            )?,
            scroll_reset_progress: check_fraction(
                "scroll_reset_progress",
                raw.scroll_reset_progress
                    .unwrap_or(defaults.scroll_reset_progress),
            )?,
            typewriter_interval: ms(raw.typewriter_interval_ms, defaults.typewriter_interval),
            challenge_enabled: raw.challenge_enabled.unwrap_or(defaults.challenge_enabled),
        })
    }
}

impl UnlockSettings {
    /// Settings without the riddle gate: the overlay reveals directly.
    #[must_use]
    pub fn without_challenge() -> Self {
        Self {
            challenge_enabled: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn tap_trigger_count(&self) -> u32 {
        self.tap_trigger_count
    }

    #[must_use]
    pub fn tap_decay(&self) -> Duration {
        self.tap_decay
    }

    #[must_use]
    pub fn double_tap_window(&self) -> Duration {
        self.double_tap_window
    }

    #[must_use]
    pub fn knob_unlock_degrees(&self) -> f64 {
        self.knob_unlock_degrees
    }

    #[must_use]
    pub fn knob_max_degrees(&self) -> f64 {
        self.knob_max_degrees
    }

    #[must_use]
    pub fn unlock_pause(&self) -> Duration {
        self.unlock_pause
    }

    #[must_use]
    pub fn verdict_delay(&self) -> Duration {
        self.verdict_delay
    }

    #[must_use]
    pub fn dismiss_delay(&self) -> Duration {
        self.dismiss_delay
    }

    #[must_use]
    pub fn depth_unlock_delay(&self) -> Duration {
        self.depth_unlock_delay
    }

    #[must_use]
    pub fn tilt_upside_down_degrees(&self) -> f64 {
        self.tilt_upside_down_degrees
    }

    #[must_use]
    pub fn tilt_upright_degrees(&self) -> f64 {
        self.tilt_upright_degrees
    }

    #[must_use]
    pub fn tilt_activate(&self) -> Duration {
        self.tilt_activate
    }

    #[must_use]
    pub fn tilt_deactivate(&self) -> Duration {
        self.tilt_deactivate
    }

    #[must_use]
    pub fn swipe_divisor_px(&self) -> f64 {
        self.swipe_divisor_px
    }

    #[must_use]
    pub fn swipe_commit_progress(&self) -> f64 {
        self.swipe_commit_progress
    }

    #[must_use]
    pub fn scroll_reset_progress(&self) -> f64 {
        self.scroll_reset_progress
    }

    #[must_use]
    pub fn typewriter_interval(&self) -> Duration {
        self.typewriter_interval
    }

    #[must_use]
    pub fn challenge_enabled(&self) -> bool {
        self.challenge_enabled
    }
}
