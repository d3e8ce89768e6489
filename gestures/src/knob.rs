//! Drag-to-rotate knob for the unlock overlay.

use crate::Detector;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Angle of `pointer` around `center`, in degrees (−180°, 180°].
#[must_use]
pub fn pointer_angle(pointer: Point, center: Point) -> f64 {
    (pointer.y - center.y).atan2(pointer.x - center.x).to_degrees()
}

/// Fold an angle difference into (−180°, 180°] so crossing the ±180° seam
/// does not make the knob jump a full turn.
#[must_use]
pub fn normalize_delta(delta: f64) -> f64 {
    let mut delta = delta % 360.0;
    if delta > 180.0 {
        delta -= 360.0;
    } else if delta <= -180.0 {
        delta += 360.0;
    }
    delta
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnobEvent {
    Unlocked,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragAnchor {
    pointer_angle: f64,
    rotation_at_start: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RotaryKnob {
    unlock_at: f64,
    max_rotation: f64,
    rotation: f64,
    anchor: Option<DragAnchor>,
    unlocked: bool,
    disposed: bool,
}

impl RotaryKnob {
    #[must_use]
    pub fn new(unlock_at: f64, max_rotation: f64) -> Self {
        Self {
            unlock_at,
            max_rotation,
            rotation: 0.0,
            anchor: None,
            unlocked: false,
            disposed: false,
        }
    }

    /// Returns false when the knob is frozen (unlocked or disposed).
    pub fn begin_drag(&mut self, pointer: Point, center: Point) -> bool {
        if self.disposed || self.unlocked || !pointer.is_finite() || !center.is_finite() {
            return false;
        }
        self.anchor = Some(DragAnchor {
            pointer_angle: pointer_angle(pointer, center),
            rotation_at_start: self.rotation,
        });
        true
    }

    pub fn drag_to(&mut self, pointer: Point, center: Point) -> Option<KnobEvent> {
        if self.disposed || self.unlocked {
            return None;
        }
        let anchor = self.anchor?;
        // Garbage samples leave the knob where it was.
        if !pointer.is_finite() || !center.is_finite() {
            return None;
        }

        let delta = normalize_delta(pointer_angle(pointer, center) - anchor.pointer_angle);
        self.rotation = (anchor.rotation_at_start + delta).clamp(0.0, self.max_rotation);

        if self.rotation >= self.unlock_at {
            self.unlocked = true;
            self.anchor = None;
            tracing::debug!(rotation = self.rotation, "Knob unlocked");
            return Some(KnobEvent::Unlocked);
        }
        None
    }

    /// End the drag; below the unlock threshold the knob snaps back to 0°.
    pub fn release(&mut self) {
        if self.anchor.take().is_some() && !self.unlocked {
            self.rotation = 0.0;
        }
    }

    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// How far towards the half turn the knob is, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        (self.rotation / 180.0).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }
}

impl Detector for RotaryKnob {
    fn reset(&mut self) {
        self.rotation = 0.0;
        self.anchor = None;
        self.unlocked = false;
    }

    fn dispose(&mut self) {
        self.reset();
        self.disposed = true;
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}
