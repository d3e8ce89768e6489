use super::{Controller, DEPTH_VIBRATION, Effect, Rejected, UNLOCK_VIBRATION};
use crate::picker::FixedPicker;
use threshold_gestures::{
    Corner, OrientationPlatform, OrientationSupport, PermissionResponse, Point, UserGesture,
};
use threshold_types::{
    AttemptId, DepthState, RevealLayer, Timestamp, UnlockPhase, UnlockSettings, Verdict,
};

const CENTER: Point = Point::new(0.0, 0.0);

fn t(ms: u64) -> Timestamp {
    Timestamp::from_millis(ms)
}

fn at_degrees(deg: f64) -> Point {
    let rad = deg.to_radians();
    Point::new(rad.cos() * 100.0, rad.sin() * 100.0)
}

fn controller() -> Controller<FixedPicker> {
    // Index 7: "What is the destination of all things?"
    Controller::with_picker(
        UnlockSettings::default(),
        OrientationSupport::Available,
        FixedPicker(7),
    )
}

fn no_challenge() -> Controller<FixedPicker> {
    Controller::with_picker(
        UnlockSettings::without_challenge(),
        OrientationSupport::Available,
        FixedPicker(0),
    )
}

fn tap_burst(c: &mut Controller<FixedPicker>, start: u64) {
    for i in 0..5 {
        c.tap(t(start + i * 100));
    }
}

/// Taps, activation, and a full knob turn. Returns the unlock time.
fn unlock_overlay(c: &mut Controller<FixedPicker>, start: u64) -> u64 {
    tap_burst(c, start);
    let now = start + 1000;
    c.activate(t(now));
    c.begin_drag(at_degrees(0.0), CENTER, t(now + 100));
    c.drag_to(at_degrees(90.0), CENTER, t(now + 200));
    c.drag_to(at_degrees(176.0), CENTER, t(now + 300));
    now + 300
}

/// Drive into `Revealed` through a passing answer. Returns the reveal time.
fn reveal(c: &mut Controller<FixedPicker>) -> u64 {
    let unlocked = unlock_overlay(c, 0);
    c.tick(t(unlocked + 400));
    let attempt = c.submit_answer("zero", t(unlocked + 2000)).unwrap();
    assert!(c.complete_evaluation(attempt, Verdict::Pass, t(unlocked + 2500)));
    let revealed = unlocked + 2500 + 2500;
    c.tick(t(revealed));
    assert_eq!(c.phase(), UnlockPhase::Revealed);
    c.drain_effects();
    revealed
}

fn align_all(c: &mut Controller<FixedPicker>, now: u64) {
    for corner in Corner::ALL {
        c.set_corner(corner, 180, t(now));
    }
}

// ========================================================================
// Tap arming
// ========================================================================

#[test]
fn five_quick_taps_show_activation() {
    let mut c = controller();
    for i in 0..4 {
        c.tap(t(i * 500));
        assert_eq!(c.phase(), UnlockPhase::Idle);
    }
    c.tap(t(2000));
    assert_eq!(c.phase(), UnlockPhase::TapArming);
    assert!(c.is_activation_visible());
    assert_eq!(c.drain_effects(), vec![Effect::ShowActivation]);
}

#[test]
fn slow_taps_never_arm() {
    let mut c = controller();
    for i in 0..10 {
        c.tap(t(i * 3100));
    }
    assert_eq!(c.phase(), UnlockPhase::Idle);
    assert!(c.drain_effects().is_empty());
}

#[test]
fn partial_burst_decays_on_tick() {
    let mut c = controller();
    for i in 0..3 {
        c.tap(t(i * 100));
    }
    assert_eq!(c.tap_count(), 3);
    c.tick(t(200 + 3001));
    assert_eq!(c.tap_count(), 0);
}

#[test]
fn activation_shown_once_per_burst() {
    let mut c = controller();
    tap_burst(&mut c, 0);
    tap_burst(&mut c, 600);
    assert_eq!(c.drain_effects(), vec![Effect::ShowActivation]);
}

// ========================================================================
// Overlay knob
// ========================================================================

#[test]
fn knob_below_threshold_snaps_back() {
    let mut c = controller();
    tap_burst(&mut c, 0);
    c.activate(t(1000));
    assert_eq!(c.phase(), UnlockPhase::OverlayRotating);
    c.begin_drag(at_degrees(0.0), CENTER, t(1100));
    c.drag_to(at_degrees(170.0), CENTER, t(1200));
    assert!((c.knob_rotation() - 170.0).abs() < 1e-9);
    c.release(t(1300));
    assert_eq!(c.knob_rotation(), 0.0);
    assert_eq!(c.phase(), UnlockPhase::OverlayRotating);
}

#[test]
fn knob_unlock_vibrates_and_pauses() {
    let mut c = controller();
    let unlocked = unlock_overlay(&mut c, 0);
    assert!(c.drain_effects().contains(&Effect::Vibrate(UNLOCK_VIBRATION)));
    assert_eq!(c.next_deadline(), Some(t(unlocked + 400)));

    c.tick(t(unlocked + 399));
    assert_eq!(c.phase(), UnlockPhase::OverlayRotating);
    c.tick(t(unlocked + 400));
    assert_eq!(c.phase(), UnlockPhase::ChallengeAsked);
    assert_eq!(
        c.challenge().map(|ch| ch.question()),
        Some("What is the destination of all things?")
    );
}

#[test]
fn activate_outside_tap_arming_is_ignored() {
    let mut c = controller();
    c.activate(t(0));
    assert_eq!(c.phase(), UnlockPhase::Idle);
}

#[test]
fn escape_before_unlock_returns_to_arming() {
    let mut c = controller();
    tap_burst(&mut c, 0);
    c.activate(t(1000));
    c.begin_drag(at_degrees(0.0), CENTER, t(1100));
    c.drag_to(at_degrees(90.0), CENTER, t(1200));
    c.escape(t(1300));
    assert_eq!(c.phase(), UnlockPhase::TapArming);
    assert!(c.is_activation_visible());
    assert_eq!(c.knob_rotation(), 0.0);

    // The control is still there; the overlay can be reopened.
    c.activate(t(1400));
    assert_eq!(c.phase(), UnlockPhase::OverlayRotating);
}

#[test]
fn escape_after_unlock_is_ignored() {
    let mut c = controller();
    let unlocked = unlock_overlay(&mut c, 0);
    c.escape(t(unlocked + 100));
    assert_eq!(c.phase(), UnlockPhase::OverlayRotating);
    c.tick(t(unlocked + 400));
    assert_eq!(c.phase(), UnlockPhase::ChallengeAsked);
}

#[test]
fn without_challenge_knob_reveals_directly() {
    let mut c = no_challenge();
    let unlocked = unlock_overlay(&mut c, 0);
    c.drain_effects();
    c.tick(t(unlocked + 400));
    assert_eq!(c.phase(), UnlockPhase::Revealed);
    assert!(c.challenge().is_none());
    assert_eq!(
        c.drain_effects(),
        vec![Effect::LoadContent(RevealLayer::Secret)]
    );
}

// ========================================================================
// Challenge
// ========================================================================

#[test]
fn empty_answer_is_rejected() {
    let mut c = controller();
    let unlocked = unlock_overlay(&mut c, 0);
    c.tick(t(unlocked + 400));
    assert_eq!(
        c.submit_answer("   ", t(unlocked + 500)),
        Err(Rejected::EmptyAnswer)
    );
    assert_eq!(c.phase(), UnlockPhase::ChallengeAsked);
}

#[test]
fn answer_outside_challenge_is_rejected() {
    let mut c = controller();
    assert_eq!(c.submit_answer("zero", t(0)), Err(Rejected::NotAsked));
}

#[test]
fn submit_emits_trimmed_evaluation_request() {
    let mut c = controller();
    let unlocked = unlock_overlay(&mut c, 0);
    c.tick(t(unlocked + 400));
    c.drain_effects();

    let attempt = c.submit_answer("  zero \n", t(unlocked + 600)).unwrap();
    assert_eq!(c.phase(), UnlockPhase::Evaluating);
    assert_eq!(c.in_flight(), Some(attempt));

    let effects = c.drain_effects();
    let [Effect::Evaluate(request)] = effects.as_slice() else {
        panic!("expected one evaluation request, got {effects:?}");
    };
    assert_eq!(request.attempt, attempt);
    assert_eq!(request.answer, "zero");
    let judge = request.judge_request();
    assert_eq!(judge.question, "What is the destination of all things?");
    assert_eq!(judge.answer, "zero");
}

#[test]
fn evaluating_ignores_input() {
    let mut c = controller();
    let unlocked = unlock_overlay(&mut c, 0);
    c.tick(t(unlocked + 400));
    c.submit_answer("zero", t(unlocked + 600)).unwrap();
    c.drain_effects();

    let now = unlocked + 700;
    c.tap(t(now));
    c.escape(t(now));
    c.close(t(now));
    c.activate(t(now));
    assert_eq!(
        c.submit_answer("again", t(now)),
        Err(Rejected::NotAsked)
    );
    c.tick(t(now + 60_000));
    assert_eq!(c.phase(), UnlockPhase::Evaluating);
    assert!(c.drain_effects().is_empty());
}

#[test]
fn pass_waits_then_reveals() {
    let mut c = controller();
    let unlocked = unlock_overlay(&mut c, 0);
    c.tick(t(unlocked + 400));
    let attempt = c.submit_answer("zero", t(unlocked + 600)).unwrap();
    let graded = unlocked + 1000;
    assert!(c.complete_evaluation(attempt, Verdict::Pass, t(graded)));
    assert_eq!(c.phase(), UnlockPhase::Passed);
    c.drain_effects();

    c.tick(t(graded + 2499));
    assert_eq!(c.phase(), UnlockPhase::Passed);
    c.tick(t(graded + 2500));
    assert_eq!(c.phase(), UnlockPhase::Revealed);
    assert_eq!(
        c.drain_effects(),
        vec![Effect::LoadContent(RevealLayer::Secret)]
    );
}

#[test]
fn fail_resets_punitively() {
    let mut c = controller();
    let unlocked = unlock_overlay(&mut c, 0);
    c.tick(t(unlocked + 400));
    let attempt = c.submit_answer("a cat", t(unlocked + 600)).unwrap();
    let graded = unlocked + 1000;
    assert!(c.complete_evaluation(attempt, Verdict::Fail, t(graded)));
    assert_eq!(c.phase(), UnlockPhase::Failed);
    c.drain_effects();

    c.tick(t(graded + 2500));
    assert_eq!(c.phase(), UnlockPhase::Idle);
    assert!(!c.is_activation_visible());
    assert!(c.requires_scroll_reset());
    assert_eq!(c.drain_effects(), vec![Effect::HideActivation]);

    // Taps do nothing until the feed is scrolled through.
    tap_burst(&mut c, graded + 3000);
    assert_eq!(c.phase(), UnlockPhase::Idle);

    c.scroll(0.94, 4000.0, t(graded + 4000));
    assert!(c.requires_scroll_reset());
    c.scroll(0.95, 4100.0, t(graded + 4100));
    assert!(!c.requires_scroll_reset());

    tap_burst(&mut c, graded + 5000);
    assert_eq!(c.phase(), UnlockPhase::TapArming);
}

#[test]
fn stale_evaluation_is_discarded() {
    let mut c = controller();
    let unlocked = unlock_overlay(&mut c, 0);
    c.tick(t(unlocked + 400));
    let attempt = c.submit_answer("zero", t(unlocked + 600)).unwrap();

    assert!(!c.complete_evaluation(attempt.next(), Verdict::Pass, t(unlocked + 700)));
    assert!(!c.complete_evaluation(AttemptId::new(0), Verdict::Pass, t(unlocked + 700)));
    assert_eq!(c.phase(), UnlockPhase::Evaluating);

    assert!(c.complete_evaluation(attempt, Verdict::Pass, t(unlocked + 800)));
    // A duplicate delivery of the same result is stale too.
    assert!(!c.complete_evaluation(attempt, Verdict::Fail, t(unlocked + 900)));
    assert_eq!(c.phase(), UnlockPhase::Passed);
}

#[test]
fn attempt_ids_increase_across_rounds() {
    let mut c = controller();
    let unlocked = unlock_overlay(&mut c, 0);
    c.tick(t(unlocked + 400));
    let first = c.submit_answer("a cat", t(unlocked + 600)).unwrap();
    c.complete_evaluation(first, Verdict::Fail, t(unlocked + 700));
    c.tick(t(unlocked + 3200));
    c.scroll(1.0, 0.0, t(unlocked + 3300));

    let again = unlock_overlay(&mut c, unlocked + 4000);
    c.tick(t(again + 400));
    let second = c.submit_answer("zero", t(again + 600)).unwrap();
    assert!(second > first);
}

// ========================================================================
// Reveal and dismissal
// ========================================================================

#[test]
fn dismiss_restores_scroll_and_returns_to_idle() {
    let mut c = controller();
    c.scroll(0.3, 1234.0, t(0));
    let revealed = reveal(&mut c);

    c.close(t(revealed + 1000));
    assert_eq!(c.phase(), UnlockPhase::Dismissing);
    c.tick(t(revealed + 1499));
    assert_eq!(c.phase(), UnlockPhase::Dismissing);
    c.tick(t(revealed + 1500));
    assert_eq!(c.phase(), UnlockPhase::Idle);
    assert_eq!(
        c.drain_effects(),
        vec![Effect::RestoreScroll(1234.0), Effect::HideActivation]
    );
    assert!(!c.requires_scroll_reset());
    assert!(!c.is_activation_visible());

    // The sequence can be repeated from the top.
    tap_burst(&mut c, revealed + 2000);
    assert_eq!(c.phase(), UnlockPhase::TapArming);
}

#[test]
fn scroll_while_revealed_does_not_move_saved_offset() {
    let mut c = controller();
    c.scroll(0.1, 500.0, t(0));
    let revealed = reveal(&mut c);
    c.scroll(0.9, 9000.0, t(revealed + 10));
    c.close(t(revealed + 20));
    c.tick(t(revealed + 520));
    assert!(c.drain_effects().contains(&Effect::RestoreScroll(500.0)));
}

#[test]
fn swipe_past_threshold_dismisses_secret() {
    let mut c = controller();
    let revealed = reveal(&mut c);
    c.swipe_start(100.0, t(revealed + 10));
    c.swipe_move(201.0, t(revealed + 20));
    c.swipe_release(t(revealed + 30));
    assert_eq!(c.phase(), UnlockPhase::Dismissing);
}

#[test]
fn short_swipe_springs_back() {
    let mut c = controller();
    let revealed = reveal(&mut c);
    c.swipe_start(100.0, t(revealed + 10));
    c.swipe_move(200.0, t(revealed + 20));
    assert_eq!(c.snapshot().swipe_layer, Some(RevealLayer::Secret));
    c.swipe_release(t(revealed + 30));
    assert_eq!(c.phase(), UnlockPhase::Revealed);
    assert_eq!(c.snapshot().swipe_progress, 0.0);
    assert_eq!(c.snapshot().swipe_layer, None);
}

// ========================================================================
// Depth layer
// ========================================================================

#[test]
fn aligned_dials_open_depth_after_flash() {
    let mut c = controller();
    let revealed = reveal(&mut c);
    let now = revealed + 100;
    align_all(&mut c, now);
    assert_eq!(c.depth(), DepthState::Opening);
    assert_eq!(
        c.drain_effects(),
        vec![
            Effect::Vibrate(DEPTH_VIBRATION),
            Effect::LoadContent(RevealLayer::Depth)
        ]
    );
    c.tick(t(now + 1199));
    assert_eq!(c.depth(), DepthState::Opening);
    c.tick(t(now + 1200));
    assert_eq!(c.depth(), DepthState::Open);
}

#[test]
fn double_taps_turn_dials() {
    let mut c = controller();
    let revealed = reveal(&mut c);
    let mut now = revealed;
    for corner in Corner::ALL {
        for _ in 0..2 {
            c.corner_tap(corner, t(now));
            c.corner_tap(corner, t(now + 200));
            now += 1000;
        }
    }
    assert_eq!(c.dial_rotations(), [180; 4]);
    assert_eq!(c.depth(), DepthState::Opening);
}

#[test]
fn partial_alignment_does_nothing() {
    let mut c = controller();
    let revealed = reveal(&mut c);
    c.set_corner(Corner::TopLeft, 180, t(revealed + 10));
    c.set_corner(Corner::TopRight, 180, t(revealed + 10));
    c.set_corner(Corner::BottomLeft, 90, t(revealed + 10));
    c.set_corner(Corner::BottomRight, 180, t(revealed + 10));
    assert_eq!(c.depth(), DepthState::Closed);
    assert!(c.drain_effects().is_empty());
}

#[test]
fn dials_ignored_outside_revealed() {
    let mut c = controller();
    align_all(&mut c, 0);
    assert_eq!(c.depth(), DepthState::Closed);
    assert_eq!(c.dial_rotations(), [0; 4]);
}

#[test]
fn swipe_on_depth_collapses_only_depth() {
    let mut c = controller();
    let revealed = reveal(&mut c);
    align_all(&mut c, revealed);
    let open = revealed + 1200;
    c.tick(t(open));
    assert_eq!(c.depth(), DepthState::Open);

    c.swipe_start(0.0, t(open + 10));
    assert_eq!(c.snapshot().swipe_layer, Some(RevealLayer::Depth));
    c.swipe_move(150.0, t(open + 20));
    c.swipe_release(t(open + 30));
    assert_eq!(c.depth(), DepthState::Collapsing);
    assert_eq!(c.phase(), UnlockPhase::Revealed);

    c.tick(t(open + 530));
    assert_eq!(c.depth(), DepthState::Closed);
    assert_eq!(c.phase(), UnlockPhase::Revealed);
    assert_eq!(c.dial_rotations(), [0; 4]);

    // The collapse zeroed every glyph; no partial credit carries over.
    c.drain_effects();
    c.set_corner(Corner::TopLeft, 180, t(open + 600));
    c.set_corner(Corner::TopRight, 180, t(open + 600));
    c.set_corner(Corner::BottomLeft, 180, t(open + 600));
    assert_eq!(c.depth(), DepthState::Closed);
    assert!(c.drain_effects().is_empty());

    // Retuning all four opens depth again.
    align_all(&mut c, open + 700);
    assert_eq!(c.depth(), DepthState::Opening);
}

#[test]
fn close_cascades_depth_then_secret() {
    let mut c = controller();
    let revealed = reveal(&mut c);
    align_all(&mut c, revealed);
    c.tick(t(revealed + 1200));

    let now = revealed + 2000;
    c.close(t(now));
    assert_eq!(c.depth(), DepthState::Collapsing);
    assert_eq!(c.phase(), UnlockPhase::Revealed);

    c.tick(t(now + 500));
    assert_eq!(c.depth(), DepthState::Closed);
    assert_eq!(c.phase(), UnlockPhase::Dismissing);

    c.tick(t(now + 1000));
    assert_eq!(c.phase(), UnlockPhase::Idle);
}

#[test]
fn flip_does_not_cancel_close() {
    let mut c = controller();
    let revealed = reveal(&mut c);
    align_all(&mut c, revealed);
    c.tick(t(revealed + 1200));
    assert_eq!(c.depth(), DepthState::Open);

    c.tilt_sample(170.0, t(revealed + 1300));
    let now = revealed + 3200;
    c.close(t(now));
    assert_eq!(c.depth(), DepthState::Collapsing);

    // Still upside down: the sampler fires while the collapse is pending.
    c.tilt_sample(170.0, t(now + 100));
    assert_eq!(c.depth(), DepthState::Collapsing);

    c.tick(t(now + 10_000));
    assert_eq!(c.phase(), UnlockPhase::Idle);
    assert_eq!(c.depth(), DepthState::Closed);
}

#[test]
fn flip_reopens_depth_collapsed_by_swipe() {
    let mut c = controller();
    let revealed = reveal(&mut c);
    align_all(&mut c, revealed);
    let open = revealed + 1200;
    c.tick(t(open));

    c.swipe_start(0.0, t(open + 10));
    c.swipe_move(200.0, t(open + 20));
    c.swipe_release(t(open + 30));
    assert_eq!(c.depth(), DepthState::Collapsing);

    c.tilt_sample(170.0, t(open + 40));
    c.tilt_sample(170.0, t(open + 2040));
    assert_eq!(c.depth(), DepthState::Open);
    c.tick(t(open + 5000));
    assert_eq!(c.depth(), DepthState::Open);
    assert_eq!(c.phase(), UnlockPhase::Revealed);
}

#[test]
fn late_tick_runs_whole_cascade() {
    let mut c = controller();
    let revealed = reveal(&mut c);
    align_all(&mut c, revealed);
    c.close(t(revealed + 100));
    c.tick(t(revealed + 60_000));
    assert_eq!(c.phase(), UnlockPhase::Idle);
    assert_eq!(c.depth(), DepthState::Closed);
}

#[test]
fn close_while_opening_cancels_open_timer() {
    let mut c = controller();
    let revealed = reveal(&mut c);
    align_all(&mut c, revealed);
    c.close(t(revealed + 100));
    assert_eq!(c.depth(), DepthState::Collapsing);
    c.tick(t(revealed + 1200));
    assert_ne!(c.depth(), DepthState::Open);
}

// ========================================================================
// Tilt
// ========================================================================

#[test]
fn flip_opens_and_righting_collapses_depth() {
    let mut c = controller();
    let revealed = reveal(&mut c);

    c.tilt_sample(150.0, t(revealed));
    c.tilt_sample(150.0, t(revealed + 1999));
    assert_eq!(c.depth(), DepthState::Closed);
    c.tilt_sample(150.0, t(revealed + 2000));
    assert_eq!(c.depth(), DepthState::Open);
    assert_eq!(
        c.drain_effects(),
        vec![Effect::LoadContent(RevealLayer::Depth)]
    );

    c.tilt_sample(10.0, t(revealed + 3000));
    c.tilt_sample(10.0, t(revealed + 4000));
    assert_eq!(c.depth(), DepthState::Collapsing);
    c.tick(t(revealed + 4500));
    assert_eq!(c.depth(), DepthState::Closed);
    assert_eq!(c.phase(), UnlockPhase::Revealed);
}

#[test]
fn tilt_ignored_outside_revealed() {
    let mut c = controller();
    c.tilt_sample(170.0, t(0));
    c.tilt_sample(170.0, t(5000));
    assert_eq!(c.depth(), DepthState::Closed);
}

struct Prompting {
    asked: u32,
}

impl OrientationPlatform for Prompting {
    fn support(&self) -> OrientationSupport {
        OrientationSupport::PermissionRequired
    }

    fn request_permission(&mut self) -> PermissionResponse {
        self.asked += 1;
        PermissionResponse::Granted
    }
}

#[test]
fn orientation_permission_is_requested_from_gesture() {
    let mut c = Controller::with_picker(
        UnlockSettings::default(),
        OrientationSupport::PermissionRequired,
        FixedPicker(0),
    );
    assert!(!c.is_orientation_listening());
    let mut platform = Prompting { asked: 0 };
    assert!(c.request_orientation_permission(UserGesture::witnessed(), &mut platform));
    assert!(c.is_orientation_listening());
    assert_eq!(platform.asked, 1);
}

// ========================================================================
// Teardown
// ========================================================================

#[test]
fn teardown_cancels_timers_and_freezes_input() {
    let mut c = controller();
    let unlocked = unlock_overlay(&mut c, 0);
    c.drain_effects();
    c.teardown();
    assert!(c.is_torn_down());
    assert_eq!(c.next_deadline(), None);

    c.tick(t(unlocked + 10_000));
    c.tap(t(unlocked + 10_000));
    assert_eq!(c.phase(), UnlockPhase::OverlayRotating);
    assert!(c.drain_effects().is_empty());
    assert!(!c.is_orientation_listening());
}

#[test]
fn teardown_during_evaluation_drops_in_flight() {
    let mut c = controller();
    let unlocked = unlock_overlay(&mut c, 0);
    c.tick(t(unlocked + 400));
    let attempt = c.submit_answer("zero", t(unlocked + 500)).unwrap();
    c.teardown();
    assert_eq!(c.in_flight(), None);
    assert!(!c.complete_evaluation(attempt, Verdict::Pass, t(unlocked + 600)));
}

// ========================================================================
// Properties
// ========================================================================

#[test]
fn secret_never_mounted_without_pass_or_disabled_challenge() {
    for verdict in [Verdict::Pass, Verdict::Fail] {
        let mut c = controller();
        let unlocked = unlock_overlay(&mut c, 0);
        let mut now = unlocked;
        while now < unlocked + 400 {
            assert!(!c.phase().secret_mounted());
            now += 50;
            c.tick(t(now));
        }
        let attempt = c.submit_answer("answer", t(now)).unwrap();
        c.complete_evaluation(attempt, verdict, t(now + 100));
        for step in 0..100 {
            c.tick(t(now + 100 + step * 50));
            let mounted = c.phase().secret_mounted();
            assert!(!mounted || verdict == Verdict::Pass);
        }
    }
}

#[test]
fn single_load_per_reveal() {
    let mut c = no_challenge();
    let unlocked = unlock_overlay(&mut c, 0);
    c.tick(t(unlocked + 400));
    c.tick(t(unlocked + 800));
    c.tick(t(unlocked + 5000));
    let loads = c
        .drain_effects()
        .into_iter()
        .filter(|e| matches!(e, Effect::LoadContent(RevealLayer::Secret)))
        .count();
    assert_eq!(loads, 1);
}

#[test]
fn depth_never_mounted_without_secret() {
    let mut c = controller();
    let revealed = reveal(&mut c);
    align_all(&mut c, revealed);
    c.tick(t(revealed + 1200));
    c.close(t(revealed + 1300));
    let mut now = revealed + 1300;
    while now < revealed + 3000 {
        now += 25;
        c.tick(t(now));
        if c.depth().is_mounted() {
            assert!(c.phase().secret_mounted());
        }
    }
    assert_eq!(c.phase(), UnlockPhase::Idle);
}

#[test]
fn one_unlock_per_overlay_cycle() {
    let mut c = controller();
    let unlocked = unlock_overlay(&mut c, 0);
    c.release(t(unlocked + 10));
    c.begin_drag(at_degrees(0.0), CENTER, t(unlocked + 20));
    c.drag_to(at_degrees(178.0), CENTER, t(unlocked + 30));
    let vibrations = c
        .drain_effects()
        .into_iter()
        .filter(|e| *e == Effect::Vibrate(UNLOCK_VIBRATION))
        .count();
    assert_eq!(vibrations, 1);
    assert_eq!(c.next_deadline(), Some(t(unlocked + 400)));
}
