//! Offline keyword grading.
//!
//! Used whenever the remote judge is unreachable, slow or returns garbage.
//! An answer passes when its lowercased, trimmed text contains any keyword
//! registered for the question. Keywords are substrings on purpose
//! (`"boundar"` matches both "boundary" and "boundaries"). Questions without
//! an entry always fail.

use std::sync::LazyLock;

use aho_corasick::AhoCorasick;
use threshold_types::Verdict;

const KEYWORDS: &[(&str, &[&str])] = &[
    (
        "What is the default of a man who is not a storm?",
        &["coma", "fire", "putting out fire", "sleep", "slumber"],
    ),
    (
        "What kills softly?",
        &["coma", "carbon monoxide", "comfort", "routine", "default"],
    ),
    (
        "What stands between man and his freedom?",
        &["time", "belief in time", "illusion of time"],
    ),
    (
        "What cannot be prescribed?",
        &["flail", "greatness", "great"],
    ),
    (
        "What does the fish not see?",
        &["line", "hook", "boundar", "trap", "invisible"],
    ),
    (
        "Where does truth bloom?",
        &["wild", "free", "devoid", "without rule", "jungle", "nature"],
    ),
    (
        "What did Musashi find in the jungle?",
        &["himself", "self", "truth", "who he"],
    ),
    (
        "What is the destination of all things?",
        &["zero", "nothing", "noth", "empty", "void"],
    ),
    (
        "What does the lonely man seek at the gathering?",
        &["companion", "escape", "connection", "hiding", "pain"],
    ),
    (
        "Why can't a man love himself?",
        &["know", "understand", "light", "shadow", "illusion"],
    ),
    ("What is enormous in ego-lessness?", &["ego"]),
    ("What does the raging storm extinguish?", &["fire"]),
    (
        "Who is Mohammed in the cave?",
        &["true", "himself", "different", "real", "authentic"],
    ),
    (
        "What happens when you reveal truth to the masses?",
        &["parrot", "mimic", "repeat", "copy"],
    ),
    (
        "When are you not there?",
        &["great", "best", "flow", "peak", "transcend", "creat"],
    ),
];

struct Entry {
    question: &'static str,
    keywords: &'static [&'static str],
    matcher: Option<AhoCorasick>,
}

impl Entry {
    fn matches(&self, answer: &str) -> bool {
        match &self.matcher {
            Some(matcher) => matcher.is_match(answer),
            None => self.keywords.iter().any(|kw| answer.contains(kw)),
        }
    }
}

static TABLE: LazyLock<Vec<Entry>> = LazyLock::new(|| {
    KEYWORDS
        .iter()
        .map(|&(question, keywords)| Entry {
            question,
            keywords,
            matcher: AhoCorasick::new(keywords).ok(),
        })
        .collect()
});

/// Grade `answer` for `question` without any IO.
#[must_use]
pub fn evaluate(question: &str, answer: &str) -> Verdict {
    let answer = answer.trim().to_lowercase();
    if answer.is_empty() {
        return Verdict::Fail;
    }
    let passed = TABLE
        .iter()
        .find(|entry| entry.question == question)
        .is_some_and(|entry| entry.matches(&answer));
    if passed { Verdict::Pass } else { Verdict::Fail }
}

/// Whether the keyword table knows `question`.
#[must_use]
pub fn covers(question: &str) -> bool {
    KEYWORDS.iter().any(|(q, _)| *q == question)
}
