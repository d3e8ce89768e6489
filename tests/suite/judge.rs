//! Remote grading against mock endpoints, with the keyword fallback.

use std::time::Duration;

use threshold_providers::{Evaluator, JudgeRequest, RemoteJudge};
use threshold_types::{BUILTIN_CHALLENGES, Evaluation, Verdict, VerdictSource};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{
    FUNCTION_PATH, ZERO_QUESTION, claude_judge, function_judge, mount_claude_reply,
    mount_function_reply,
};

fn zero(answer: &str) -> JudgeRequest {
    JudgeRequest::new(&BUILTIN_CHALLENGES[ZERO_QUESTION], answer)
}

#[tokio::test]
async fn function_judge_sends_challenge_and_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(FUNCTION_PATH))
        .and(body_partial_json(serde_json::json!({
            "question": "What is the destination of all things?",
            "answer": "zero"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("PASS"))
        .expect(1)
        .mount(&server)
        .await;

    let evaluator = Evaluator::new(RemoteJudge::Function(function_judge(&server)));
    assert_eq!(
        evaluator.evaluate(&zero("zero")).await,
        Evaluation::remote(Verdict::Pass)
    );
}

#[tokio::test]
async fn remote_fail_overrides_keywords() {
    let server = MockServer::start().await;
    mount_function_reply(&server, "FAIL").await;

    let evaluator = Evaluator::new(function_judge(&server));
    // "zero" would pass the keyword table; the remote verdict wins.
    assert_eq!(
        evaluator.evaluate(&zero("zero")).await,
        Evaluation::remote(Verdict::Fail)
    );
}

#[tokio::test]
async fn server_error_falls_back_to_keywords() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let evaluator = Evaluator::new(function_judge(&server));
    let evaluation = evaluator.evaluate(&zero("the void")).await;
    assert_eq!(evaluation.verdict, Verdict::Pass);
    assert_eq!(evaluation.source, VerdictSource::Fallback);

    let evaluation = evaluator.evaluate(&zero("a sandwich")).await;
    assert_eq!(evaluation, Evaluation::fallback(Verdict::Fail));
}

#[tokio::test]
async fn slow_judge_times_out_to_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("FAIL")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let evaluator =
        Evaluator::new(function_judge(&server)).with_timeout(Duration::from_millis(200));
    assert_eq!(
        evaluator.evaluate(&zero("nothing")).await,
        Evaluation::fallback(Verdict::Pass)
    );
}

#[tokio::test]
async fn claude_judge_reads_first_text_block() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "sk-ant-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(serde_json::json!({ "max_tokens": 100 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "content": [{ "type": "text", "text": "PASS" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let evaluator = Evaluator::new(RemoteJudge::Claude(claude_judge(&server)));
    assert_eq!(
        evaluator.evaluate(&zero("emptiness")).await,
        Evaluation::remote(Verdict::Pass)
    );
}

#[tokio::test]
async fn claude_reply_other_than_pass_is_fail() {
    let server = MockServer::start().await;
    mount_claude_reply(&server, "I am not sure.").await;

    let evaluator = Evaluator::new(claude_judge(&server));
    assert_eq!(
        evaluator.evaluate(&zero("zero")).await,
        Evaluation::remote(Verdict::Fail)
    );
}
