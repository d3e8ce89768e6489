//! Remote collaborators of the unlock sequence.
//!
//! # Architecture
//!
//! - [`Judge`] grades a free-text riddle answer. Two clients are provided:
//!   [`FunctionJudge`] (a serverless endpoint) and [`ClaudeJudge`] (the
//!   Anthropic Messages API). [`RemoteJudge`] picks one at runtime.
//! - [`Evaluator`] wraps any judge with a timeout and the deterministic
//!   [`fallback`] keyword table, so a visitor always gets a verdict.
//! - [`ContentStore`] reads the epigrams behind each reveal layer.
//!
//! # Error Handling
//!
//! Judge failures are [`JudgeError`] values, but they never reach the unlock
//! state machine: the evaluator logs them and answers from the fallback.
//! Content failures surface as [`ContentError`] for the caller to log.

pub mod content;
mod evaluator;
pub mod fallback;
mod judge;
pub mod retry;

use std::sync::OnceLock;
use std::time::Duration;

pub use content::{
    ContentError, ContentSource, ContentStore, ContentTables, EMPTY_DEPTH_BODY,
    EMPTY_DEPTH_TITLE, EpigramRecord, RestContentStore, StaticContentStore,
};
pub use evaluator::{DEFAULT_EVALUATION_TIMEOUT, Evaluator};
pub use judge::{
    CLAUDE_MESSAGES_API_URL, ClaudeJudge, DEFAULT_CLAUDE_MODEL, FunctionJudge, Judge, JudgeError,
    JudgeRequest, RemoteJudge,
};

pub use threshold_types;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const TCP_KEEPALIVE_SECS: u64 = 60;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

const MAX_ERROR_BODY_BYTES: usize = 8 * 1024;

/// Shared hardened client: HTTPS only, no redirects.
pub fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        base_client_builder().build().unwrap_or_else(|e| {
            tracing::error!("Failed to build hardened HTTP client: {e}. Using defaults.");
            reqwest::Client::new()
        })
    })
}

fn base_client_builder() -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .redirect(reqwest::redirect::Policy::none())
        .https_only(true)
        .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
        .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
        .user_agent(concat!("threshold/", env!("CARGO_PKG_VERSION")))
}

/// Error body, truncated to a bounded size for logs.
pub async fn read_capped_error_body(response: reqwest::Response) -> String {
    use futures_util::StreamExt;
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let Ok(chunk) = chunk else { break };
        body.extend_from_slice(&chunk);
        if body.len() > MAX_ERROR_BODY_BYTES {
            body.truncate(MAX_ERROR_BODY_BYTES);
            let text = String::from_utf8_lossy(&body);
            return format!("{text}...(truncated)");
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}
