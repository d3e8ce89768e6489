//! The unlock sequence state machine.
//!
//! # Phases
//!
//! ```text
//! Idle -> TapArming -> OverlayRotating -> ChallengeAsked -> Evaluating
//!      -> Passed  -> Revealed -> Dismissing -> Idle
//!      -> Failed  -> Idle (punitive reset)
//! ```
//!
//! With the challenge stage disabled, `OverlayRotating` leads straight to
//! `Revealed`. While `Revealed`, a nested depth layer can be opened by
//! aligning the corner dials or by flipping the device.
//!
//! # Time and effects
//!
//! The controller never reads a clock or performs IO. Every entry point
//! takes the current [`Timestamp`] and first fires any timers that are due,
//! so a caller that forgets to [`tick`](Controller::tick) still observes a
//! consistent phase. Side effects the host must perform (show a control,
//! vibrate, grade an answer, fetch content) are queued as [`Effect`]s and
//! collected with [`drain_effects`](Controller::drain_effects).

use threshold_gestures::{
    Corner, CornerDials, Detector, DialEvent, KnobEvent, OrientationPlatform, OrientationSupport,
    Point, RotaryKnob, SwipeOutcome, SwipeTracker, TapCounter, TapEvent, TiltEvent, TiltSampler,
    UserGesture,
};
use threshold_providers::JudgeRequest;
use threshold_types::{
    AttemptId, Challenge, ChallengePool, DepthState, RevealLayer, Timestamp, UnlockPhase,
    UnlockSettings, Verdict,
};

use crate::picker::{ChallengePicker, RandomPicker};
use crate::scheduler::Scheduler;

/// Haptic pattern when the knob unlocks.
pub const UNLOCK_VIBRATION: &[u32] = &[50];
/// Haptic pattern when the corner dials open the depth layer.
pub const DEPTH_VIBRATION: &[u32] = &[50, 100, 50];

/// Work the host performs on the controller's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ShowActivation,
    HideActivation,
    /// Vibration pattern in milliseconds (on, off, on, ...). Fire and forget.
    Vibrate(&'static [u32]),
    /// Grade an answer; report back through
    /// [`Controller::complete_evaluation`].
    Evaluate(EvaluationRequest),
    /// Fetch the records for a layer that is about to be shown.
    LoadContent(RevealLayer),
    /// Scroll the public feed back to where the visitor left it.
    RestoreScroll(f64),
}

/// One in-flight grading request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationRequest {
    pub attempt: AttemptId,
    pub challenge: Challenge,
    pub answer: String,
}

impl EvaluationRequest {
    #[must_use]
    pub fn judge_request(&self) -> JudgeRequest {
        JudgeRequest::new(&self.challenge, self.answer.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejected {
    #[error("answer is empty")]
    EmptyAnswer,
    #[error("no question is waiting for an answer")]
    NotAsked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKey {
    /// Knob unlocked; the overlay lingers before the next stage.
    UnlockPause,
    /// Verdict message on screen.
    Verdict,
    DepthOpen,
    DepthCollapse,
    Dismiss,
}

impl TimerKey {
    /// Timers die with the phase that scheduled them.
    const fn owned_by(self, phase: UnlockPhase) -> bool {
        match self {
            TimerKey::UnlockPause => matches!(phase, UnlockPhase::OverlayRotating),
            // Both verdict phases share one timer; the phase picks the outcome.
            TimerKey::Verdict => matches!(phase, UnlockPhase::Passed | UnlockPhase::Failed),
            TimerKey::DepthOpen | TimerKey::DepthCollapse => {
                matches!(phase, UnlockPhase::Revealed)
            }
            TimerKey::Dismiss => matches!(phase, UnlockPhase::Dismissing),
        }
    }

    const ALL: [TimerKey; 5] = [
        TimerKey::UnlockPause,
        TimerKey::Verdict,
        TimerKey::DepthOpen,
        TimerKey::DepthCollapse,
        TimerKey::Dismiss,
    ];
}

/// Read-only view of the controller for presentation.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub settings: &'a UnlockSettings,
    pub phase: UnlockPhase,
    pub phase_since: Timestamp,
    pub depth: DepthState,
    pub depth_since: Timestamp,
    pub activation_visible: bool,
    pub knob_rotation: f64,
    pub knob_progress: f64,
    pub knob_unlocked: bool,
    pub challenge: Option<&'a Challenge>,
    pub verdict: Option<Verdict>,
    pub dial_rotations: [u16; 4],
    pub swipe_layer: Option<RevealLayer>,
    pub swipe_progress: f64,
    pub requires_scroll_reset: bool,
}

pub struct Controller<P = RandomPicker> {
    settings: UnlockSettings,
    pool: ChallengePool,
    picker: P,

    phase: UnlockPhase,
    phase_since: Timestamp,
    depth: DepthState,
    depth_since: Timestamp,

    taps: TapCounter,
    knob: RotaryKnob,
    dials: CornerDials,
    tilt: TiltSampler,
    swipe: SwipeTracker,
    swipe_layer: Option<RevealLayer>,

    scheduler: Scheduler<TimerKey>,
    challenge: Option<Challenge>,
    last_attempt: AttemptId,
    in_flight: Option<AttemptId>,
    verdict: Option<Verdict>,

    activation_visible: bool,
    requires_scroll_reset: bool,
    scroll_offset: f64,
    saved_scroll: Option<f64>,
    close_after_depth: bool,

    effects: Vec<Effect>,
    torn_down: bool,
}

impl Controller<RandomPicker> {
    #[must_use]
    pub fn new(settings: UnlockSettings, orientation: OrientationSupport) -> Self {
        Self::with_picker(settings, orientation, RandomPicker)
    }
}

impl<P: ChallengePicker> Controller<P> {
    #[must_use]
    pub fn with_picker(settings: UnlockSettings, orientation: OrientationSupport, picker: P) -> Self {
        Self {
            taps: TapCounter::new(settings.tap_trigger_count(), settings.tap_decay()),
            knob: RotaryKnob::new(settings.knob_unlock_degrees(), settings.knob_max_degrees()),
            dials: CornerDials::new(settings.double_tap_window()),
            tilt: TiltSampler::new(&settings, orientation),
            swipe: SwipeTracker::new(settings.swipe_divisor_px(), settings.swipe_commit_progress()),
            swipe_layer: None,
            pool: ChallengePool::builtin(),
            picker,
            phase: UnlockPhase::Idle,
            phase_since: Timestamp::ZERO,
            depth: DepthState::Closed,
            depth_since: Timestamp::ZERO,
            scheduler: Scheduler::new(),
            challenge: None,
            last_attempt: AttemptId::new(0),
            in_flight: None,
            verdict: None,
            activation_visible: false,
            requires_scroll_reset: false,
            scroll_offset: 0.0,
            saved_scroll: None,
            close_after_depth: false,
            effects: Vec::new(),
            torn_down: false,
            settings,
        }
    }

    #[must_use]
    pub fn with_pool(mut self, pool: ChallengePool) -> Self {
        self.pool = pool;
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub fn phase(&self) -> UnlockPhase {
        self.phase
    }

    #[must_use]
    pub fn depth(&self) -> DepthState {
        self.depth
    }

    #[must_use]
    pub fn settings(&self) -> &UnlockSettings {
        &self.settings
    }

    #[must_use]
    pub fn challenge(&self) -> Option<&Challenge> {
        self.challenge.as_ref()
    }

    #[must_use]
    pub fn in_flight(&self) -> Option<AttemptId> {
        self.in_flight
    }

    #[must_use]
    pub fn is_activation_visible(&self) -> bool {
        self.activation_visible
    }

    #[must_use]
    pub fn requires_scroll_reset(&self) -> bool {
        self.requires_scroll_reset
    }

    #[must_use]
    pub fn tap_count(&self) -> u32 {
        self.taps.count()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.knob.is_dragging()
    }

    #[must_use]
    pub fn knob_rotation(&self) -> f64 {
        self.knob.rotation()
    }

    #[must_use]
    pub fn dial_rotations(&self) -> [u16; 4] {
        self.dials.rotations()
    }

    #[must_use]
    pub fn is_orientation_listening(&self) -> bool {
        self.tilt.is_listening()
    }

    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Earliest pending timer, for hosts that sleep until the next deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.scheduler.next_deadline()
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            settings: &self.settings,
            phase: self.phase,
            phase_since: self.phase_since,
            depth: self.depth,
            depth_since: self.depth_since,
            activation_visible: self.activation_visible,
            knob_rotation: self.knob.rotation(),
            knob_progress: self.knob.progress(),
            knob_unlocked: self.knob.is_unlocked(),
            challenge: self.challenge.as_ref(),
            verdict: self.verdict,
            dial_rotations: self.dials.rotations(),
            swipe_layer: self.swipe_layer.filter(|_| self.swipe.is_tracking()),
            swipe_progress: self.swipe.progress(),
            requires_scroll_reset: self.requires_scroll_reset,
        }
    }

    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    // ------------------------------------------------------------------
    // Time
    // ------------------------------------------------------------------

    /// Fire every timer due at `now`, in deadline order.
    ///
    /// Each timer runs at its own deadline, so chained transitions land on
    /// the same timeline no matter how late the tick arrives.
    pub fn tick(&mut self, now: Timestamp) {
        if self.torn_down {
            return;
        }
        self.taps.expire(now);
        while let Some((key, at)) = self.scheduler.pop_due(now) {
            self.fire(key, at);
        }
    }

    fn fire(&mut self, key: TimerKey, at: Timestamp) {
        tracing::trace!(?key, %at, "Timer fired");
        match key {
            TimerKey::UnlockPause => {
                if self.settings.challenge_enabled() {
                    self.ask_challenge(at);
                } else {
                    self.reveal(at);
                }
            }
            TimerKey::Verdict => match self.phase {
                UnlockPhase::Passed => self.reveal(at),
                UnlockPhase::Failed => self.punitive_reset(at),
                _ => {}
            },
            TimerKey::DepthOpen => {
                self.set_depth(DepthState::Open, at);
            }
            TimerKey::DepthCollapse => {
                self.set_depth(DepthState::Closed, at);
                self.dials.reset();
                if std::mem::take(&mut self.close_after_depth) {
                    self.begin_dismiss(at);
                }
            }
            TimerKey::Dismiss => self.finish_dismiss(at),
        }
    }

    fn set_phase(&mut self, next: UnlockPhase, at: Timestamp) {
        let prev = self.phase;
        if prev == next {
            return;
        }
        for key in TimerKey::ALL {
            if key.owned_by(prev) && self.scheduler.cancel(key) {
                tracing::trace!(?key, "Cancelled timer on phase exit");
            }
        }
        self.phase = next;
        self.phase_since = at;
        tracing::debug!(from = %prev, to = %next, %at, "Unlock phase changed");
    }

    fn set_depth(&mut self, next: DepthState, at: Timestamp) {
        if self.depth != next {
            tracing::debug!(from = ?self.depth, to = ?next, %at, "Depth state changed");
            self.depth = next;
            self.depth_since = at;
        }
    }

    // ------------------------------------------------------------------
    // Public feed
    // ------------------------------------------------------------------

    /// A tap on the fixed trigger target.
    pub fn tap(&mut self, now: Timestamp) {
        if self.torn_down {
            return;
        }
        self.tick(now);
        if self.phase != UnlockPhase::Idle {
            return;
        }
        if self.requires_scroll_reset {
            tracing::trace!(%now, "Tap ignored until the feed is scrolled through");
            return;
        }
        if let Some(TapEvent::Armed) = self.taps.tap(now) {
            self.activation_visible = true;
            self.effects.push(Effect::ShowActivation);
            self.set_phase(UnlockPhase::TapArming, now);
            tracing::info!(%now, "Activation control revealed");
        }
    }

    /// Feed scroll position: `progress` in `[0, 1]` of the scrollable
    /// height, `offset` in pixels.
    pub fn scroll(&mut self, progress: f64, offset: f64, now: Timestamp) {
        if self.torn_down {
            return;
        }
        self.tick(now);
        if self.phase == UnlockPhase::Evaluating {
            return;
        }
        if self.phase == UnlockPhase::Idle {
            self.scroll_offset = offset;
        }
        if self.requires_scroll_reset && progress >= self.settings.scroll_reset_progress() {
            self.requires_scroll_reset = false;
            tracing::debug!(progress, "Feed scrolled through; taps re-enabled");
        }
    }

    /// The visitor pressed the activation control.
    pub fn activate(&mut self, now: Timestamp) {
        if self.torn_down {
            return;
        }
        self.tick(now);
        if self.phase != UnlockPhase::TapArming {
            return;
        }
        self.knob.reset();
        self.set_phase(UnlockPhase::OverlayRotating, now);
    }

    // ------------------------------------------------------------------
    // Overlay knob
    // ------------------------------------------------------------------

    pub fn begin_drag(&mut self, pointer: Point, center: Point, now: Timestamp) {
        if self.torn_down {
            return;
        }
        self.tick(now);
        if self.phase == UnlockPhase::OverlayRotating {
            self.knob.begin_drag(pointer, center);
        }
    }

    pub fn drag_to(&mut self, pointer: Point, center: Point, now: Timestamp) {
        if self.torn_down {
            return;
        }
        self.tick(now);
        if self.phase != UnlockPhase::OverlayRotating {
            return;
        }
        if let Some(KnobEvent::Unlocked) = self.knob.drag_to(pointer, center) {
            self.effects.push(Effect::Vibrate(UNLOCK_VIBRATION));
            self.scheduler.schedule(
                TimerKey::UnlockPause,
                now.saturating_add(self.settings.unlock_pause()),
            );
            tracing::info!(%now, "Overlay unlocked");
        }
    }

    pub fn release(&mut self, now: Timestamp) {
        if self.torn_down {
            return;
        }
        self.tick(now);
        if self.phase == UnlockPhase::OverlayRotating {
            self.knob.release();
        }
    }

    /// Close the overlay without penalty. Ignored once the knob unlocked.
    pub fn escape(&mut self, now: Timestamp) {
        if self.torn_down {
            return;
        }
        self.tick(now);
        if self.phase != UnlockPhase::OverlayRotating || self.knob.is_unlocked() {
            return;
        }
        self.knob.reset();
        self.set_phase(UnlockPhase::TapArming, now);
    }

    // ------------------------------------------------------------------
    // Challenge
    // ------------------------------------------------------------------

    fn ask_challenge(&mut self, at: Timestamp) {
        let index = self.picker.pick(self.pool.len());
        let challenge = self.pool.get(index).clone();
        tracing::debug!(question = challenge.question(), "Challenge drawn");
        self.challenge = Some(challenge);
        self.verdict = None;
        self.set_phase(UnlockPhase::ChallengeAsked, at);
    }

    /// Submit an answer to the current question.
    ///
    /// On success the controller enters `Evaluating` and queues an
    /// [`Effect::Evaluate`] carrying the returned attempt id.
    pub fn submit_answer(&mut self, text: &str, now: Timestamp) -> Result<AttemptId, Rejected> {
        if self.torn_down {
            return Err(Rejected::NotAsked);
        }
        self.tick(now);
        if self.phase != UnlockPhase::ChallengeAsked {
            return Err(Rejected::NotAsked);
        }
        let Some(challenge) = self.challenge.clone() else {
            return Err(Rejected::NotAsked);
        };
        let answer = text.trim();
        if answer.is_empty() {
            return Err(Rejected::EmptyAnswer);
        }

        let attempt = self.last_attempt.next();
        self.last_attempt = attempt;
        self.in_flight = Some(attempt);
        self.set_phase(UnlockPhase::Evaluating, now);
        self.effects.push(Effect::Evaluate(EvaluationRequest {
            attempt,
            challenge,
            answer: answer.to_string(),
        }));
        Ok(attempt)
    }

    /// Apply a verdict for `attempt`.
    ///
    /// Returns `false` when the result is stale (a different attempt, or the
    /// controller already left `Evaluating`); stale results change nothing.
    pub fn complete_evaluation(
        &mut self,
        attempt: AttemptId,
        verdict: Verdict,
        now: Timestamp,
    ) -> bool {
        if self.torn_down {
            return false;
        }
        self.tick(now);
        if self.phase != UnlockPhase::Evaluating || self.in_flight != Some(attempt) {
            tracing::debug!(%attempt, in_flight = ?self.in_flight, "Discarding stale evaluation");
            return false;
        }

        self.in_flight = None;
        self.verdict = Some(verdict);
        let next = match verdict {
            Verdict::Pass => UnlockPhase::Passed,
            Verdict::Fail => UnlockPhase::Failed,
        };
        self.set_phase(next, now);
        self.scheduler.schedule(
            TimerKey::Verdict,
            now.saturating_add(self.settings.verdict_delay()),
        );
        tracing::info!(%attempt, verdict = verdict.as_str(), "Answer graded");
        true
    }

    fn punitive_reset(&mut self, at: Timestamp) {
        self.taps.rearm();
        self.knob.reset();
        self.challenge = None;
        self.verdict = None;
        self.activation_visible = false;
        self.requires_scroll_reset = true;
        self.effects.push(Effect::HideActivation);
        self.set_phase(UnlockPhase::Idle, at);
        tracing::info!(%at, "Failed answer; activation hidden until the feed is scrolled");
    }

    // ------------------------------------------------------------------
    // Secret layer
    // ------------------------------------------------------------------

    fn reveal(&mut self, at: Timestamp) {
        self.saved_scroll = Some(self.scroll_offset);
        self.dials.reset();
        self.tilt.reset();
        self.swipe.reset();
        self.swipe_layer = None;
        self.close_after_depth = false;
        self.set_depth(DepthState::Closed, at);
        self.effects.push(Effect::LoadContent(RevealLayer::Secret));
        self.set_phase(UnlockPhase::Revealed, at);
        tracing::info!(%at, "Secret layer revealed");
    }

    /// Double tap bookkeeping for one of the four corner glyphs.
    pub fn corner_tap(&mut self, corner: Corner, now: Timestamp) {
        if !self.accepts_depth_input(now) {
            return;
        }
        if let Some(DialEvent::AllAligned) = self.dials.tap(corner, now) {
            self.open_depth_after_flash(now);
        }
    }

    /// Set a corner glyph's rotation directly.
    pub fn set_corner(&mut self, corner: Corner, rotation: u16, now: Timestamp) {
        if !self.accepts_depth_input(now) {
            return;
        }
        if let Some(DialEvent::AllAligned) = self.dials.set(corner, rotation) {
            self.open_depth_after_flash(now);
        }
    }

    fn accepts_depth_input(&mut self, now: Timestamp) -> bool {
        if self.torn_down {
            return false;
        }
        self.tick(now);
        self.phase == UnlockPhase::Revealed && self.depth == DepthState::Closed
    }

    fn open_depth_after_flash(&mut self, now: Timestamp) {
        self.effects.push(Effect::Vibrate(DEPTH_VIBRATION));
        self.effects.push(Effect::LoadContent(RevealLayer::Depth));
        self.set_depth(DepthState::Opening, now);
        self.scheduler.schedule(
            TimerKey::DepthOpen,
            now.saturating_add(self.settings.depth_unlock_delay()),
        );
        tracing::info!(%now, "Corner glyphs aligned; opening depth");
    }

    /// Ask for device orientation access. Call only from a direct user
    /// input handler.
    pub fn request_orientation_permission(
        &mut self,
        gesture: UserGesture,
        platform: &mut dyn OrientationPlatform,
    ) -> bool {
        if self.torn_down {
            return false;
        }
        self.tilt.request_permission(gesture, platform)
    }

    /// Front-back tilt sample in degrees.
    pub fn tilt_sample(&mut self, beta: f64, now: Timestamp) {
        if self.torn_down {
            return;
        }
        self.tick(now);
        if self.phase != UnlockPhase::Revealed {
            return;
        }
        match self.tilt.sample(beta, now) {
            Some(TiltEvent::Activated) => {
                // A pending close() outranks the flip.
                if self.close_after_depth {
                    tracing::debug!(%now, "Flip ignored; layers are closing");
                } else if matches!(self.depth, DepthState::Closed | DepthState::Collapsing) {
                    self.scheduler.cancel(TimerKey::DepthCollapse);
                    self.close_after_depth = false;
                    self.effects.push(Effect::LoadContent(RevealLayer::Depth));
                    self.set_depth(DepthState::Open, now);
                    tracing::info!(%now, "Device flipped; depth opened");
                }
            }
            Some(TiltEvent::Deactivated) => {
                if matches!(self.depth, DepthState::Opening | DepthState::Open) {
                    self.collapse_depth(now);
                }
            }
            None => {}
        }
    }

    fn collapse_depth(&mut self, now: Timestamp) {
        self.scheduler.cancel(TimerKey::DepthOpen);
        self.set_depth(DepthState::Collapsing, now);
        self.scheduler.schedule(
            TimerKey::DepthCollapse,
            now.saturating_add(self.settings.dismiss_delay()),
        );
    }

    // ------------------------------------------------------------------
    // Swipe to dismiss
    // ------------------------------------------------------------------

    pub fn swipe_start(&mut self, y: f64, now: Timestamp) {
        if self.torn_down {
            return;
        }
        self.tick(now);
        if self.phase != UnlockPhase::Revealed {
            return;
        }
        let target = match self.depth {
            DepthState::Closed => RevealLayer::Secret,
            DepthState::Open => RevealLayer::Depth,
            DepthState::Opening | DepthState::Collapsing => return,
        };
        self.swipe_layer = Some(target);
        self.swipe.touch_start(y);
    }

    pub fn swipe_move(&mut self, y: f64, now: Timestamp) {
        if self.torn_down {
            return;
        }
        self.tick(now);
        if self.phase == UnlockPhase::Revealed {
            self.swipe.touch_move(y);
        }
    }

    pub fn swipe_release(&mut self, now: Timestamp) {
        if self.torn_down {
            return;
        }
        self.tick(now);
        let outcome = self.swipe.release();
        let target = self.swipe_layer.take();
        if self.phase != UnlockPhase::Revealed || outcome != Some(SwipeOutcome::Commit) {
            return;
        }
        match target {
            Some(RevealLayer::Depth) if self.depth == DepthState::Open => {
                self.collapse_depth(now);
            }
            Some(RevealLayer::Secret) if self.depth == DepthState::Closed => {
                self.begin_dismiss(now);
            }
            _ => {}
        }
    }

    /// Close every revealed layer, depth first.
    pub fn close(&mut self, now: Timestamp) {
        if self.torn_down {
            return;
        }
        self.tick(now);
        if self.phase != UnlockPhase::Revealed {
            return;
        }
        match self.depth {
            DepthState::Closed => self.begin_dismiss(now),
            DepthState::Opening | DepthState::Open => {
                self.close_after_depth = true;
                self.collapse_depth(now);
            }
            DepthState::Collapsing => self.close_after_depth = true,
        }
    }

    fn begin_dismiss(&mut self, at: Timestamp) {
        self.swipe.reset();
        self.swipe_layer = None;
        self.set_phase(UnlockPhase::Dismissing, at);
        self.scheduler.schedule(
            TimerKey::Dismiss,
            at.saturating_add(self.settings.dismiss_delay()),
        );
    }

    fn finish_dismiss(&mut self, at: Timestamp) {
        self.taps.rearm();
        self.knob.reset();
        self.dials.reset();
        self.tilt.reset();
        self.swipe.reset();
        self.swipe_layer = None;
        self.challenge = None;
        self.verdict = None;
        self.close_after_depth = false;
        self.set_depth(DepthState::Closed, at);
        self.activation_visible = false;
        let offset = self.saved_scroll.take().unwrap_or(self.scroll_offset);
        self.effects.push(Effect::RestoreScroll(offset));
        self.effects.push(Effect::HideActivation);
        self.set_phase(UnlockPhase::Idle, at);
        tracing::info!(%at, "Secret layers dismissed");
    }

    // ------------------------------------------------------------------
    // Teardown
    // ------------------------------------------------------------------

    /// Cancel all timers and dispose every detector, innermost first.
    /// Every entry point is a no-op afterwards.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.scheduler.cancel_all();
        self.swipe.dispose();
        self.tilt.dispose();
        self.dials.dispose();
        self.knob.dispose();
        self.taps.dispose();
        self.in_flight = None;
        self.torn_down = true;
        tracing::debug!(phase = %self.phase, "Controller torn down");
    }
}

impl<P> std::fmt::Debug for Controller<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("phase", &self.phase)
            .field("depth", &self.depth)
            .field("in_flight", &self.in_flight)
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
