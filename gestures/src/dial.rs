//! Four corner glyphs turned by double taps.

use std::time::Duration;

use threshold_types::Timestamp;

use crate::Detector;

/// Rotation every dial must read for the set to align.
pub const ALIGNED_DEGREES: u16 = 180;
const STEP_DEGREES: u16 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    const fn index(self) -> usize {
        match self {
            Corner::TopLeft => 0,
            Corner::TopRight => 1,
            Corner::BottomLeft => 2,
            Corner::BottomRight => 3,
        }
    }

    /// Corner for a 0-based index in [`Corner::ALL`] order.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialEvent {
    /// Every dial reads 180°. Latched: fires once until reset.
    AllAligned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Dial {
    rotation: u16,
    last_tap: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CornerDials {
    window: Duration,
    dials: [Dial; 4],
    latched: bool,
    disposed: bool,
}

impl CornerDials {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            dials: [Dial::default(); 4],
            latched: false,
            disposed: false,
        }
    }

    /// A tap within the double-tap window of the previous tap on the same
    /// corner turns that dial by 90°; otherwise the tap is only recorded.
    pub fn tap(&mut self, corner: Corner, now: Timestamp) -> Option<DialEvent> {
        if self.disposed {
            return None;
        }

        let dial = &mut self.dials[corner.index()];
        match dial.last_tap {
            Some(prev) if now.since(prev) < self.window => {
                dial.rotation = (dial.rotation + STEP_DEGREES) % 360;
                dial.last_tap = None;
                tracing::trace!(?corner, rotation = dial.rotation, "Dial turned");
                self.check_alignment()
            }
            _ => {
                dial.last_tap = Some(now);
                None
            }
        }
    }

    /// Set a dial's rotation directly.
    pub fn set(&mut self, corner: Corner, rotation: u16) -> Option<DialEvent> {
        if self.disposed {
            return None;
        }
        let dial = &mut self.dials[corner.index()];
        dial.rotation = rotation % 360;
        dial.last_tap = None;
        self.check_alignment()
    }

    fn check_alignment(&mut self) -> Option<DialEvent> {
        if self.latched || !self.all_aligned() {
            return None;
        }
        self.latched = true;
        tracing::debug!("All corner dials aligned");
        Some(DialEvent::AllAligned)
    }

    #[must_use]
    pub fn all_aligned(&self) -> bool {
        self.dials.iter().all(|d| d.rotation == ALIGNED_DEGREES)
    }

    #[must_use]
    pub fn rotation(&self, corner: Corner) -> u16 {
        self.dials[corner.index()].rotation
    }

    #[must_use]
    pub fn rotations(&self) -> [u16; 4] {
        self.dials.map(|d| d.rotation)
    }

    #[must_use]
    pub fn is_latched(&self) -> bool {
        self.latched
    }
}

impl Detector for CornerDials {
    fn reset(&mut self) {
        self.dials = [Dial::default(); 4];
        self.latched = false;
    }

    fn dispose(&mut self) {
        self.reset();
        self.disposed = true;
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}
