//! Typewriter reveal of confirmation and rejection messages.

use std::time::Duration;

use unicode_segmentation::UnicodeSegmentation;

/// Reveals one grapheme per `interval`.
#[derive(Debug, Clone, Copy)]
pub struct Typewriter<'a> {
    text: &'a str,
    interval: Duration,
}

impl<'a> Typewriter<'a> {
    #[must_use]
    pub fn new(text: &'a str, interval: Duration) -> Self {
        Self { text, interval }
    }

    /// Prefix visible after `elapsed`.
    #[must_use]
    pub fn visible(&self, elapsed: Duration) -> &'a str {
        let interval_ms = self.interval.as_millis();
        let shown = if interval_ms == 0 {
            usize::MAX
        } else {
            // First grapheme appears after one interval, like a ticking timer.
            usize::try_from(elapsed.as_millis() / interval_ms).unwrap_or(usize::MAX)
        };
        match self.text.grapheme_indices(true).nth(shown) {
            Some((byte_idx, _)) => &self.text[..byte_idx],
            None => self.text,
        }
    }

    /// Whether the caret is still blinking at the end of a partial message.
    #[must_use]
    pub fn is_typing(&self, elapsed: Duration) -> bool {
        self.visible(elapsed).len() < self.text.len()
    }
}
