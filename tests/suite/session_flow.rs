//! End-to-end unlock flows through a session backed by mock services.

use serde_json::json;
use threshold_engine::{Controller, Effect, PASS_MESSAGE, Rejected, UNLOCK_VIBRATION};
use threshold_gestures::Corner;
use threshold_providers::{
    ContentSource, EMPTY_DEPTH_BODY, RemoteJudge, StaticContentStore,
};
use threshold_types::{RevealLayer, UnlockPhase, UnlockSettings, Verdict, VerdictSource};
use wiremock::MockServer;

use crate::common::{
    advance, function_judge, mount_function_reply, mount_table, rest_store, session, unlock,
};

#[tokio::test]
async fn passing_answer_reveals_secret_epigrams() {
    let server = MockServer::start().await;
    mount_function_reply(&server, "PASS").await;
    mount_table(
        &server,
        "secret_epigrams",
        json!([
            { "id": 1, "text": "All things return to zero.", "title": "Zero", "display_order": 0 },
            { "id": 2, "text": "Storms extinguish fires.", "display_order": 1 }
        ]),
    )
    .await;

    let (mut s, clock) = session(
        function_judge(&server),
        rest_store(&server),
        UnlockSettings::default(),
    );
    unlock(&mut s, &clock);
    assert_eq!(s.controller().phase(), UnlockPhase::ChallengeAsked);
    let host = s.take_host_effects();
    assert_eq!(
        host,
        vec![Effect::ShowActivation, Effect::Vibrate(UNLOCK_VIBRATION)]
    );

    s.input(|c, now| c.submit_answer("zero", now)).unwrap();
    let evaluation = s.wait_for_evaluation().await.unwrap();
    assert_eq!(evaluation.verdict, Verdict::Pass);
    assert_eq!(evaluation.source, VerdictSource::Remote);

    advance(&mut s, &clock, 2400);
    let message = s.scene().challenge.and_then(|c| c.message);
    assert_eq!(message.as_deref(), Some(PASS_MESSAGE));

    advance(&mut s, &clock, 100);
    assert_eq!(s.controller().phase(), UnlockPhase::Revealed);
    s.settle().await;

    let secret = s.content(RevealLayer::Secret);
    assert_eq!(secret.len(), 2);
    assert_eq!(secret[0].text, "All things return to zero.");
}

#[tokio::test]
async fn failing_answer_demands_a_full_scroll() {
    let (mut s, clock) = session(
        RemoteJudge::Disabled,
        ContentSource::Static(StaticContentStore::new()),
        UnlockSettings::default(),
    );
    unlock(&mut s, &clock);

    assert_eq!(
        s.input(|c, now| c.submit_answer("  ", now)),
        Err(Rejected::EmptyAnswer)
    );
    s.input(|c, now| c.submit_answer("a sandwich", now)).unwrap();
    let evaluation = s.wait_for_evaluation().await.unwrap();
    assert_eq!(evaluation.verdict, Verdict::Fail);
    assert_eq!(evaluation.source, VerdictSource::Fallback);

    advance(&mut s, &clock, 2500);
    assert_eq!(s.controller().phase(), UnlockPhase::Idle);
    assert!(s.take_host_effects().contains(&Effect::HideActivation));

    for _ in 0..10 {
        advance(&mut s, &clock, 100);
        s.input(Controller::tap);
    }
    assert!(!s.scene().activation_visible);

    s.input(|c, now| c.scroll(0.97, 8000.0, now));
    unlock(&mut s, &clock);
    assert_eq!(s.controller().phase(), UnlockPhase::ChallengeAsked);
}

#[tokio::test]
async fn depth_layer_opens_from_corners_and_cascades_closed() {
    let server = MockServer::start().await;
    mount_table(&server, "secret_epigrams", json!([])).await;
    mount_table(&server, "depth_epigrams", json!([])).await;

    let (mut s, clock) = session(
        RemoteJudge::Disabled,
        rest_store(&server),
        UnlockSettings::without_challenge(),
    );
    s.input(|c, now| c.scroll(0.25, 420.0, now));
    unlock(&mut s, &clock);
    assert_eq!(s.controller().phase(), UnlockPhase::Revealed);
    s.take_host_effects();

    for corner in Corner::ALL {
        for _ in 0..2 {
            s.input(|c, now| c.corner_tap(corner, now));
            advance(&mut s, &clock, 100);
            s.input(|c, now| c.corner_tap(corner, now));
            advance(&mut s, &clock, 500);
        }
    }
    assert!(s.scene().depth_flash);
    advance(&mut s, &clock, 1200);
    s.settle().await;
    assert_eq!(s.content(RevealLayer::Depth)[0].text, EMPTY_DEPTH_BODY);
    assert_eq!(
        s.scene().interactive_layer(),
        Some(RevealLayer::Depth)
    );

    s.input(Controller::close);
    advance(&mut s, &clock, 500);
    assert_eq!(s.controller().phase(), UnlockPhase::Dismissing);
    advance(&mut s, &clock, 500);
    assert_eq!(s.controller().phase(), UnlockPhase::Idle);

    let host = s.take_host_effects();
    assert!(host.contains(&Effect::RestoreScroll(420.0)));
}

#[tokio::test]
async fn tilt_toggles_depth_while_revealed() {
    let (mut s, clock) = session(
        RemoteJudge::Disabled,
        ContentSource::Static(StaticContentStore::new()),
        UnlockSettings::without_challenge(),
    );
    unlock(&mut s, &clock);

    for _ in 0..5 {
        s.input(|c, now| c.tilt_sample(165.0, now));
        advance(&mut s, &clock, 500);
    }
    assert_eq!(
        s.scene().layer(RevealLayer::Depth).map(|l| l.interactive),
        Some(true)
    );

    for _ in 0..3 {
        s.input(|c, now| c.tilt_sample(5.0, now));
        advance(&mut s, &clock, 500);
    }
    assert!(s.scene().layer(RevealLayer::Depth).is_none());
    assert_eq!(s.controller().phase(), UnlockPhase::Revealed);
}

#[tokio::test]
async fn swipe_dismisses_and_sequence_repeats() {
    let (mut s, clock) = session(
        RemoteJudge::Disabled,
        ContentSource::Static(StaticContentStore::new()),
        UnlockSettings::without_challenge(),
    );
    unlock(&mut s, &clock);
    s.input(|c, now| {
        c.swipe_start(300.0, now);
        c.swipe_move(420.0, now);
        c.swipe_release(now);
    });
    assert_eq!(s.controller().phase(), UnlockPhase::Dismissing);
    advance(&mut s, &clock, 500);
    assert_eq!(s.controller().phase(), UnlockPhase::Idle);

    unlock(&mut s, &clock);
    assert_eq!(s.controller().phase(), UnlockPhase::Revealed);
}
