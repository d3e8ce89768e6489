use std::time::Duration;

use threshold_types::Evaluation;

use crate::fallback;
use crate::judge::{Judge, JudgeRequest};

pub const DEFAULT_EVALUATION_TIMEOUT: Duration = Duration::from_secs(8);

/// Wraps a remote judge so grading always yields a verdict.
///
/// Judge errors and timeouts are logged and answered by the keyword
/// fallback instead; `evaluate` itself cannot fail.
#[derive(Debug, Clone)]
pub struct Evaluator<J> {
    judge: J,
    timeout: Duration,
}

impl<J: Judge> Evaluator<J> {
    #[must_use]
    pub fn new(judge: J) -> Self {
        Self {
            judge,
            timeout: DEFAULT_EVALUATION_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn judge(&self) -> &J {
        &self.judge
    }

    pub async fn evaluate(&self, request: &JudgeRequest) -> Evaluation {
        match tokio::time::timeout(self.timeout, self.judge.evaluate(request)).await {
            Ok(Ok(verdict)) => {
                tracing::debug!(verdict = verdict.as_str(), "Remote judge answered");
                return Evaluation::remote(verdict);
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Remote judge failed; using keyword fallback");
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.timeout.as_millis(),
                    "Remote judge timed out; using keyword fallback"
                );
            }
        }
        Evaluation::fallback(fallback::evaluate(&request.question, &request.answer))
    }
}
