//! Remote answer judges.

use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::json;
use threshold_types::{Challenge, Verdict};

use crate::retry::{RetryConfig, RetryOutcome, send_with_retry};
use crate::{http_client, read_capped_error_body};

/// Canonical Anthropic Messages API endpoint.
pub const CLAUDE_MESSAGES_API_URL: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_CLAUDE_MODEL: &str = "claude-sonnet-4-20250514";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const CLAUDE_MAX_TOKENS: u32 = 100;

#[derive(Debug, thiserror::Error)]
pub enum JudgeError {
    #[error("no remote judge configured")]
    Disabled,
    #[error("judge returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("judge unreachable after {attempts} attempt(s)")]
    Transport {
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },
    #[error("malformed judge reply: {0}")]
    Malformed(String),
}

/// Everything a judge needs to grade one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JudgeRequest {
    pub question: String,
    pub context: String,
    pub essence: String,
    pub answer: String,
}

impl JudgeRequest {
    #[must_use]
    pub fn new(challenge: &Challenge, answer: impl Into<String>) -> Self {
        Self {
            question: challenge.question().to_string(),
            context: challenge.context().to_string(),
            essence: challenge.essence().to_string(),
            answer: answer.into(),
        }
    }

    /// Grading prompt sent to a language model.
    #[must_use]
    pub fn prompt(&self) -> String {
        format!(
            "You are evaluating whether someone understood a philosophical text deeply enough. \
You must be strict but fair: reward genuine understanding, not perfect wording.

Question asked: \"{question}\"
The relevant passage: \"{context}\"
What the answer must demonstrate: \"{essence}\"
User's answer: \"{answer}\"

Does this answer demonstrate genuine understanding of the concept? Consider synonyms, \
paraphrasing, and partial but meaningful understanding. Be generous with someone who clearly \
gets the core idea even if they express it differently. Be strict with someone who is guessing \
or giving a surface-level response.

Respond with ONLY \"PASS\" or \"FAIL\" and nothing else.",
            question = self.question,
            context = self.context,
            essence = self.essence,
            answer = self.answer,
        )
    }
}

/// Grades a free-text answer remotely.
pub trait Judge: Send + Sync {
    fn evaluate(
        &self,
        request: &JudgeRequest,
    ) -> impl Future<Output = Result<Verdict, JudgeError>> + Send;
}

async fn successful_body(outcome: RetryOutcome) -> Result<String, JudgeError> {
    let response = match outcome {
        RetryOutcome::Success(response) => response,
        RetryOutcome::HttpError(response) => {
            let status = response.status().as_u16();
            let body = read_capped_error_body(response).await;
            return Err(JudgeError::Http { status, body });
        }
        RetryOutcome::ConnectionError { attempts, source } => {
            return Err(JudgeError::Transport { attempts, source });
        }
    };
    response
        .text()
        .await
        .map_err(|e| JudgeError::Malformed(format!("unreadable body: {e}")))
}

/// Serverless grading function: receives the [`JudgeRequest`] as JSON and
/// replies with the verdict as plain text or `{"verdict": "..."}`.
#[derive(Clone)]
pub struct FunctionJudge {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    retry: RetryConfig,
}

impl std::fmt::Debug for FunctionJudge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionJudge")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "****"))
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct FunctionReply {
    verdict: Option<String>,
}

impl FunctionJudge {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: http_client().clone(),
            url: url.into(),
            api_key: None,
            retry: RetryConfig::default(),
        }
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    fn parse_reply(body: &str) -> Result<Verdict, JudgeError> {
        let text = body.trim();
        if text.starts_with('{') {
            let reply: FunctionReply = serde_json::from_str(text)
                .map_err(|e| JudgeError::Malformed(format!("invalid JSON: {e}")))?;
            return match reply.verdict {
                Some(v) if !v.trim().is_empty() => Ok(Verdict::from_reply(&v)),
                _ => Err(JudgeError::Malformed("missing verdict".to_string())),
            };
        }
        if text.is_empty() {
            return Err(JudgeError::Malformed("empty body".to_string()));
        }
        Ok(Verdict::from_reply(text))
    }
}

impl Judge for FunctionJudge {
    async fn evaluate(&self, request: &JudgeRequest) -> Result<Verdict, JudgeError> {
        let outcome = send_with_retry(
            || {
                let mut builder = self.client.post(&self.url).json(request);
                if let Some(key) = &self.api_key {
                    builder = builder.bearer_auth(key).header("apikey", key);
                }
                builder
            },
            &self.retry,
        )
        .await;
        let body = successful_body(outcome).await?;
        Self::parse_reply(&body)
    }
}

/// Grades answers with the Anthropic Messages API (non-streaming).
#[derive(Clone)]
pub struct ClaudeJudge {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
    retry: RetryConfig,
}

impl std::fmt::Debug for ClaudeJudge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaudeJudge")
            .field("url", &self.url)
            .field("api_key", &"****")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct MessagesReply {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

impl ClaudeJudge {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: http_client().clone(),
            url: CLAUDE_MESSAGES_API_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_CLAUDE_MODEL.to_string(),
            retry: RetryConfig::default(),
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(&self, request: &JudgeRequest) -> serde_json::Value {
        json!({
            "model": self.model,
            "max_tokens": CLAUDE_MAX_TOKENS,
            "messages": [
                { "role": "user", "content": request.prompt() }
            ]
        })
    }

    fn parse_reply(body: &str) -> Result<Verdict, JudgeError> {
        let reply: MessagesReply = serde_json::from_str(body)
            .map_err(|e| JudgeError::Malformed(format!("invalid JSON: {e}")))?;
        let text = reply
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| JudgeError::Malformed("no text content".to_string()))?;
        Ok(Verdict::from_reply(&text))
    }
}

impl Judge for ClaudeJudge {
    async fn evaluate(&self, request: &JudgeRequest) -> Result<Verdict, JudgeError> {
        let body = self.request_body(request);
        let outcome = send_with_retry(
            || {
                self.client
                    .post(&self.url)
                    .header("x-api-key", &self.api_key)
                    .header("anthropic-version", ANTHROPIC_VERSION)
                    .header("content-type", "application/json")
                    .json(&body)
            },
            &self.retry,
        )
        .await;
        let body = successful_body(outcome).await?;
        Self::parse_reply(&body)
    }
}

/// Judge selected at runtime from configuration.
#[derive(Debug, Clone)]
pub enum RemoteJudge {
    Function(FunctionJudge),
    Claude(ClaudeJudge),
    /// Always defers to the keyword fallback.
    Disabled,
}

impl Judge for RemoteJudge {
    async fn evaluate(&self, request: &JudgeRequest) -> Result<Verdict, JudgeError> {
        match self {
            Self::Function(judge) => judge.evaluate(request).await,
            Self::Claude(judge) => judge.evaluate(request).await,
            Self::Disabled => Err(JudgeError::Disabled),
        }
    }
}
