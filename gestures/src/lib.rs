//! Gesture detectors for the unlock sequence.
//!
//! Each detector turns raw input (taps, pointer drags, orientation samples)
//! into discrete one-shot events. Detectors never read a clock: every entry
//! point takes the current [`Timestamp`], which keeps the timing contracts
//! replayable in tests.
//!
//! | Detector | Input | Event |
//! |----------|-------|-------|
//! | [`TapCounter`] | taps on a fixed target | `Armed` after a burst |
//! | [`CornerDials`] | double taps on four corner glyphs | `AllAligned` when every dial reads 180° |
//! | [`RotaryKnob`] | pointer drag around a center | `Unlocked` near 180° |
//! | [`TiltSampler`] | device front-back tilt | `Activated` / `Deactivated` |
//! | [`SwipeTracker`] | vertical touch drag | `Commit` / `Cancel` on release |
//!
//! Missing platform capabilities make a detector inert; nothing here returns
//! an error.

mod dial;
mod knob;
mod swipe;
mod tap;
mod tilt;

pub use dial::{Corner, CornerDials, DialEvent};
pub use knob::{KnobEvent, Point, RotaryKnob, normalize_delta, pointer_angle};
pub use swipe::{SwipeOutcome, SwipeTracker};
pub use tap::{TapCounter, TapEvent};
pub use tilt::{
    ListenerState, OrientationPlatform, OrientationSupport, PermissionResponse, TiltEvent,
    TiltSampler, UserGesture,
};

pub use threshold_types::Timestamp;

/// Lifecycle shared by every detector.
///
/// `dispose` is the single teardown point: a disposed detector ignores all
/// further input and never emits again.
pub trait Detector {
    /// Return to the neutral baseline.
    fn reset(&mut self);

    fn dispose(&mut self);

    fn is_disposed(&self) -> bool;
}
