//! Shared test utilities and fixtures
//!
//! Mock servers standing in for the grading function, the Messages API and
//! the epigram tables.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use threshold_engine::{Controller, FixedPicker, ManualClock, Session};
use threshold_gestures::{OrientationSupport, Point};
use threshold_providers::retry::RetryConfig;
use threshold_providers::{
    ClaudeJudge, ContentSource, Evaluator, FunctionJudge, Judge, RestContentStore,
};
use threshold_types::UnlockSettings;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Index of "What is the destination of all things?" in the built-in pool.
pub const ZERO_QUESTION: usize = 7;

pub const FUNCTION_PATH: &str = "/functions/v1/evaluate-answer";

/// Mount a grading function that always replies with `reply` as plain text.
pub async fn mount_function_reply(server: &MockServer, reply: &str) {
    Mock::given(method("POST"))
        .and(path(FUNCTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(reply))
        .mount(server)
        .await;
}

/// Mount a Messages API response whose first text block is `text`.
pub async fn mount_claude_reply(server: &MockServer, text: &str) {
    let body = json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "model": "claude-sonnet-4-20250514",
        "content": [{ "type": "text", "text": text }],
        "stop_reason": "end_turn",
        "usage": { "input_tokens": 120, "output_tokens": 1 }
    });
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount one epigram table.
pub async fn mount_table(server: &MockServer, table: &str, rows: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/rest/v1/{table}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows))
        .mount(server)
        .await;
}

pub fn function_judge(server: &MockServer) -> FunctionJudge {
    FunctionJudge::new(format!("{}{FUNCTION_PATH}", server.uri()))
        .with_client(reqwest::Client::new())
        .with_retry(RetryConfig::none())
}

pub fn claude_judge(server: &MockServer) -> ClaudeJudge {
    ClaudeJudge::new("sk-ant-test")
        .with_url(format!("{}/v1/messages", server.uri()))
        .with_client(reqwest::Client::new())
        .with_retry(RetryConfig::none())
}

pub fn rest_store(server: &MockServer) -> ContentSource {
    ContentSource::Rest(
        RestContentStore::new(server.uri(), "anon-key")
            .with_client(reqwest::Client::new())
            .with_retry(RetryConfig::none()),
    )
}

pub type TestSession<J> = Session<J, ContentSource, Arc<ManualClock>, FixedPicker>;

pub fn session<J: Judge + 'static>(
    judge: J,
    store: ContentSource,
    settings: UnlockSettings,
) -> (TestSession<J>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let controller = Controller::with_picker(
        settings,
        OrientationSupport::Available,
        FixedPicker(ZERO_QUESTION),
    );
    let session = Session::new(
        controller,
        Evaluator::new(judge).with_timeout(Duration::from_secs(2)),
        store,
        Arc::clone(&clock),
    );
    (session, clock)
}

pub fn advance<J: Judge + 'static>(session: &mut TestSession<J>, clock: &ManualClock, ms: u64) {
    clock.advance(Duration::from_millis(ms));
    session.tick();
}

/// Five taps, activation, and a half turn of the knob, then the unlock pause.
pub fn unlock<J: Judge + 'static>(session: &mut TestSession<J>, clock: &ManualClock) {
    for _ in 0..5 {
        advance(session, clock, 150);
        session.input(Controller::tap);
    }
    advance(session, clock, 500);
    session.input(Controller::activate);
    let center = Point::new(0.0, 0.0);
    session.input(|c, now| c.begin_drag(Point::new(0.0, -80.0), center, now));
    advance(session, clock, 50);
    session.input(|c, now| c.drag_to(Point::new(80.0, 0.0), center, now));
    advance(session, clock, 50);
    session.input(|c, now| c.drag_to(Point::new(0.0, 80.0), center, now));
    advance(session, clock, 400);
}
