//! Unlock phases and reveal layers.

use std::fmt;

/// Phase of one unlock attempt.
///
/// Exactly one phase is active per controller. The challenge phases are
/// skipped entirely when the challenge stage is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnlockPhase {
    /// Public feed, activation control hidden.
    #[default]
    Idle,
    /// Tap threshold reached, activation control visible.
    TapArming,
    /// Rotate-to-unlock overlay open.
    OverlayRotating,
    /// Question on screen, waiting for an answer.
    ChallengeAsked,
    /// Answer submitted, verdict pending. Input is disabled.
    Evaluating,
    Passed,
    Failed,
    /// Secret layer visible (depth layer may be stacked on top).
    Revealed,
    /// Exit animation running.
    Dismissing,
}

impl UnlockPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            UnlockPhase::Idle => "idle",
            UnlockPhase::TapArming => "tap_arming",
            UnlockPhase::OverlayRotating => "overlay_rotating",
            UnlockPhase::ChallengeAsked => "challenge_asked",
            UnlockPhase::Evaluating => "evaluating",
            UnlockPhase::Passed => "passed",
            UnlockPhase::Failed => "failed",
            UnlockPhase::Revealed => "revealed",
            UnlockPhase::Dismissing => "dismissing",
        }
    }

    /// Whether the secret layer is mounted in this phase.
    #[must_use]
    pub const fn secret_mounted(self) -> bool {
        matches!(self, UnlockPhase::Revealed | UnlockPhase::Dismissing)
    }
}

impl fmt::Display for UnlockPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content layers, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RevealLayer {
    Public,
    Secret,
    Depth,
}

impl RevealLayer {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RevealLayer::Public => "public",
            RevealLayer::Secret => "secret",
            RevealLayer::Depth => "depth",
        }
    }
}

impl fmt::Display for RevealLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nested depth layer state while the secret layer is revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthState {
    #[default]
    Closed,
    /// Corner glyphs aligned, unlock flash running.
    Opening,
    Open,
    /// Exit animation running; the secret layer is uncovered afterwards.
    Collapsing,
}

impl DepthState {
    /// Whether the depth layer is mounted (and must collapse before the
    /// secret layer can).
    #[must_use]
    pub const fn is_mounted(self) -> bool {
        matches!(self, DepthState::Open | DepthState::Collapsing)
    }
}
