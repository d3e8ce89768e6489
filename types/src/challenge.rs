//! Challenge questions for the riddle gate.

use std::borrow::Cow;

/// A question, the passage it comes from, and the understanding an answer
/// must demonstrate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    question: Cow<'static, str>,
    context: Cow<'static, str>,
    essence: Cow<'static, str>,
}

impl Challenge {
    #[must_use]
    pub fn new(
        question: impl Into<String>,
        context: impl Into<String>,
        essence: impl Into<String>,
    ) -> Self {
        Self {
            question: Cow::Owned(question.into()),
            context: Cow::Owned(context.into()),
            essence: Cow::Owned(essence.into()),
        }
    }

    const fn builtin(question: &'static str, context: &'static str, essence: &'static str) -> Self {
        Self {
            question: Cow::Borrowed(question),
            context: Cow::Borrowed(context),
            essence: Cow::Borrowed(essence),
        }
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }

    #[must_use]
    pub fn essence(&self) -> &str {
        &self.essence
    }
}

/// The fixed pool a challenge is drawn from.
///
/// Invariant: never empty.
#[derive(Debug, Clone)]
pub struct ChallengePool {
    challenges: Vec<Challenge>,
}

impl ChallengePool {
    /// Returns `None` for an empty list.
    #[must_use]
    pub fn new(challenges: Vec<Challenge>) -> Option<Self> {
        if challenges.is_empty() {
            None
        } else {
            Some(Self { challenges })
        }
    }

    #[must_use]
    pub fn builtin() -> Self {
        Self {
            challenges: BUILTIN_CHALLENGES.to_vec(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }

    /// Challenge at `index`, wrapping out-of-range indices into the pool.
    #[must_use]
    pub fn get(&self, index: usize) -> &Challenge {
        &self.challenges[index % self.challenges.len()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Challenge> {
        self.challenges.iter()
    }
}

impl Default for ChallengePool {
    fn default() -> Self {
        Self::builtin()
    }
}

pub static BUILTIN_CHALLENGES: [Challenge; 15] = [
    Challenge::builtin(
        "What is the default of a man who is not a storm?",
        "Without a Raging Storm, man defaults into a coma. His days consist of nothing more than putting out fires.",
        "The answer should convey the idea of a coma, sleepwalking through life, or being consumed by putting out fires. The person must understand that without a consuming journey/purpose, man falls into unconscious routine existence.",
    ),
    Challenge::builtin(
        "What kills softly?",
        "This coma is like Carbon Monoxide poisoning. It kills slowly and softly.",
        "The answer should reference the coma of ordinary existence, carbon monoxide poisoning as metaphor, comfort, routine, or the gradual slipping away of life. The person must understand that it's the invisible, comfortable numbness that destroys.",
    ),
    Challenge::builtin(
        "What stands between man and his freedom?",
        "The single thing that stands between man and his freedom is the belief in 'time.'",
        "The answer must reference time, the belief in time, or the illusion of having time. Not literal imprisonment but the psychological trap of believing there is always more time.",
    ),
    Challenge::builtin(
        "What cannot be prescribed?",
        "Flailing can't be prescribed. There are no how-to's. Greatness comes from a very murky affair.",
        "The answer should convey flailing, greatness, or the authentic messy process of pursuing something. The person must understand that the genuine path to greatness cannot be turned into a formula or recipe.",
    ),
    Challenge::builtin(
        "What does the fish not see?",
        "A line that is invisible, and a hook that is imperceptible, keeps the fish trapped forever. The mind gives its fish a little extra line to roam within invisible boundaries.",
        "The answer should reference the invisible line/hook, the boundaries set by the mind, the illusion of freedom, or the trap of believing one is in control. The person must understand the metaphor of the mind as the fisherman.",
    ),
    Challenge::builtin(
        "Where does truth bloom?",
        "Truth can only bloom in the wild and free world that is devoid of rules, culture, and religion.",
        "The answer should reference freedom from rules/culture/religion, the wild, solitude, or places free from social constructs. Like Musashi in the jungle, truth requires freedom from all prescribed systems.",
    ),
    Challenge::builtin(
        "What did Musashi find in the jungle?",
        "What Musashi discovered in those ancient jungles of central Japan was himself. He discovered the truth that others did not have the freedom to explore.",
        "The answer should convey self-discovery, himself, or truth. Not a technique or skill, but the discovery of his authentic self which could only happen away from society's constructs.",
    ),
    Challenge::builtin(
        "What is the destination of all things?",
        "Zero is the destination of all things.",
        "The answer must be zero, nothing, nothingness, or emptiness. This is about the fundamental nature of existence returning to nothing.",
    ),
    Challenge::builtin(
        "What does the lonely man seek at the gathering?",
        "Every social gathering is an escape from pain and a salacious bid at pleasure. The lonely type: seeking companionship. Humans spend their lives hiding from themselves.",
        "The answer should reference companionship, escape from pain, connection, or hiding from themselves. The deeper truth is that all social behavior is an escape from confronting oneself.",
    ),
    Challenge::builtin(
        "Why can't a man love himself?",
        "How can he love himself if he does not know what love truly is? How can he be happy with a self that he does not truly understand? The things that man believes himself to be are lights and shadows.",
        "The answer should convey that he doesn't know what love is, doesn't know himself, or that his self-image is built on illusions (lights and shadows). The person must understand the impossibility of loving something you haven't genuinely encountered.",
    ),
    Challenge::builtin(
        "What is enormous in ego-lessness?",
        "The only human being who publicly says 'I do not know' is the one who uses this to proudly demonstrate how humble he is. There is enormous ego in ego-lessness.",
        "The answer must be ego. The person must understand the paradox that performed humility is itself a form of ego, that even the display of having no ego is driven by ego.",
    ),
    Challenge::builtin(
        "What does the raging storm extinguish?",
        "Raging Storms don't cause fires. They extinguish them.",
        "The answer should be fires: the petty daily concerns, distractions, and small crises that consume an ordinary life. A true consuming purpose eliminates the trivial fires that otherwise become a man's entire existence.",
    ),
    Challenge::builtin(
        "Who is Mohammed in the cave?",
        "Mohammed (P) and Jesus are not Mohammed (P) and Jesus only in public. Mohammed (P) and Jesus are Mohammed (P) and Jesus when there is no one around. In the quiet of a cave, sitting before a man who genuinely seeks the truth, his words would be very different.",
        "The answer should convey that he is his true self, different from his public persona, speaks different truths privately, or that he reveals raw truth only to genuine seekers. The person must understand the distinction between public teaching and private truth.",
    ),
    Challenge::builtin(
        "What happens when you reveal truth to the masses?",
        "Revealing truths to the masses does not create enlightened humans; it creates parrots.",
        "The answer should reference parrots, repetition without understanding, or mimicry. Truth given freely to crowds becomes slogans and bumper stickers, not genuine understanding.",
    ),
    Challenge::builtin(
        "When are you not there?",
        "The things that you do greatest, are the things that you know not how you do them. I'd argue that you're not even there when you do them.",
        "The answer should reference doing your greatest work, peak performance, flow states, or moments of transcendent creation. The person must understand that the highest human performance happens when the conscious self steps aside.",
    ),
];
