//! Challenge verdicts.

/// Binary outcome of grading an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    /// Strict parse of a judge's text reply.
    ///
    /// Only a reply that reads exactly `PASS` after trimming and ASCII
    /// uppercasing passes; everything else, including chatty replies that
    /// merely contain the word, fails.
    #[must_use]
    pub fn from_reply(reply: &str) -> Self {
        if reply.trim().eq_ignore_ascii_case("PASS") {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }

    #[must_use]
    pub const fn is_pass(self) -> bool {
        matches!(self, Verdict::Pass)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::Fail => "FAIL",
        }
    }
}

/// Which path produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerdictSource {
    Remote,
    Fallback,
}

/// A verdict together with the path that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub verdict: Verdict,
    pub source: VerdictSource,
}

impl Evaluation {
    #[must_use]
    pub const fn remote(verdict: Verdict) -> Self {
        Self {
            verdict,
            source: VerdictSource::Remote,
        }
    }

    #[must_use]
    pub const fn fallback(verdict: Verdict) -> Self {
        Self {
            verdict,
            source: VerdictSource::Fallback,
        }
    }
}
