//! Sustained device-tilt sampler ("flip the phone").
//!
//! Consumes front-back tilt samples (`beta`, degrees). Holding the device
//! upside down long enough activates; holding it upright again long enough
//! deactivates. Any break in a streak resets its timer: partial progress is
//! never carried across an interruption.

use std::time::Duration;

use threshold_types::{Timestamp, UnlockSettings};

use crate::Detector;

/// What the platform offers for orientation input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrientationSupport {
    /// No orientation API (desktop browsers, headless hosts).
    Unsupported,
    /// User prefers reduced motion; flipping is never offered.
    ReducedMotion,
    /// Listener may be attached only after an explicit grant.
    PermissionRequired,
    Available,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionResponse {
    Granted,
    Denied,
}

/// Platform seam for orientation capability and permission.
pub trait OrientationPlatform {
    fn support(&self) -> OrientationSupport;

    /// Ask the user for orientation access. Some platforms only honor this
    /// while a user input event is being handled.
    fn request_permission(&mut self) -> PermissionResponse;
}

/// Witness that the caller is inside a direct user input handler.
///
/// Construct one only while handling a pointer, touch or key event; it is
/// the precondition for [`TiltSampler::request_permission`].
#[derive(Debug, Clone, Copy)]
pub struct UserGesture(());

impl UserGesture {
    #[must_use]
    pub fn witnessed() -> Self {
        Self(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    /// Never emits (unsupported, reduced motion, permission denied).
    Inert,
    AwaitingPermission,
    Listening,
    /// Torn down by its owner.
    Detached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiltEvent {
    Activated,
    Deactivated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TiltSampler {
    upside_down_above: f64,
    upright_below: f64,
    activate_after: Duration,
    deactivate_after: Duration,
    listener: ListenerState,
    flip_since: Option<Timestamp>,
    upright_since: Option<Timestamp>,
    activated: bool,
}

impl TiltSampler {
    #[must_use]
    pub fn new(settings: &UnlockSettings, support: OrientationSupport) -> Self {
        let listener = match support {
            OrientationSupport::Unsupported | OrientationSupport::ReducedMotion => {
                tracing::debug!(?support, "Device orientation disabled");
                ListenerState::Inert
            }
            OrientationSupport::PermissionRequired => ListenerState::AwaitingPermission,
            OrientationSupport::Available => ListenerState::Listening,
        };
        Self {
            upside_down_above: settings.tilt_upside_down_degrees(),
            upright_below: settings.tilt_upright_degrees(),
            activate_after: settings.tilt_activate(),
            deactivate_after: settings.tilt_deactivate(),
            listener,
            flip_since: None,
            upright_since: None,
            activated: false,
        }
    }

    /// Request orientation access; attaches the listener only on a grant.
    ///
    /// Returns whether the sampler is listening afterwards.
    pub fn request_permission(
        &mut self,
        _gesture: UserGesture,
        platform: &mut dyn OrientationPlatform,
    ) -> bool {
        if self.listener != ListenerState::AwaitingPermission {
            return self.is_listening();
        }
        match platform.request_permission() {
            PermissionResponse::Granted => {
                tracing::debug!("Device orientation permission granted");
                self.listener = ListenerState::Listening;
            }
            PermissionResponse::Denied => {
                tracing::debug!("Device orientation permission denied");
                self.listener = ListenerState::Inert;
            }
        }
        self.is_listening()
    }

    pub fn sample(&mut self, beta: f64, now: Timestamp) -> Option<TiltEvent> {
        if !self.is_listening() {
            return None;
        }

        let tilt = beta.abs();
        let upside_down = tilt > self.upside_down_above;
        let upright = tilt < self.upright_below;

        if self.activated {
            self.flip_since = None;
            if !upright {
                self.upright_since = None;
                return None;
            }
            let since = *self.upright_since.get_or_insert(now);
            if now.since(since) >= self.deactivate_after {
                self.activated = false;
                self.upright_since = None;
                tracing::debug!(at = %now, "Tilt deactivated");
                return Some(TiltEvent::Deactivated);
            }
        } else {
            self.upright_since = None;
            if !upside_down {
                self.flip_since = None;
                return None;
            }
            let since = *self.flip_since.get_or_insert(now);
            if now.since(since) >= self.activate_after {
                self.activated = true;
                self.flip_since = None;
                tracing::debug!(at = %now, "Tilt activated");
                return Some(TiltEvent::Activated);
            }
        }
        None
    }

    /// Drop the orientation listener. Samples are ignored afterwards.
    pub fn detach(&mut self) {
        if self.listener != ListenerState::Detached {
            tracing::debug!("Device orientation listener detached");
        }
        self.listener = ListenerState::Detached;
    }

    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.listener == ListenerState::Listening
    }

    #[must_use]
    pub fn listener(&self) -> ListenerState {
        self.listener
    }

    #[must_use]
    pub fn is_activated(&self) -> bool {
        self.activated
    }

    #[must_use]
    pub fn flip_since(&self) -> Option<Timestamp> {
        self.flip_since
    }
}

impl Detector for TiltSampler {
    fn reset(&mut self) {
        self.flip_since = None;
        self.upright_since = None;
        self.activated = false;
    }

    fn dispose(&mut self) {
        self.reset();
        self.detach();
    }

    fn is_disposed(&self) -> bool {
        self.listener == ListenerState::Detached
    }
}
