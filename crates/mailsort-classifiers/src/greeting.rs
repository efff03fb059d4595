//! Pure greeting/thanks detection
//!
//! Short messages that are nothing but pleasantries ("Bom dia!",
//! "Obrigado pela atenção") often land near 50/50 on the zero-shot model.
//! This detector recognizes them deterministically.

use crate::patterns::MarkerSets;
use std::sync::Arc;

/// Longest message (in characters) still considered a pure greeting
pub const MAX_GREETING_CHARS: usize = 120;

/// Detects messages made only of greetings, thanks and punctuation
#[derive(Debug, Clone)]
pub struct GreetingDetector {
    markers: Arc<MarkerSets>,
}

impl GreetingDetector {
    pub fn new(markers: Arc<MarkerSets>) -> Self {
        Self { markers }
    }

    /// True iff `text` has no request marker, is at most
    /// [`MAX_GREETING_CHARS`] long, and is empty once social phrases and
    /// non-word characters are removed.
    pub fn is_pure_greeting(&self, text: &str) -> bool {
        let lower = text.to_lowercase();

        if self.markers.productive.any_match(&lower) {
            return false;
        }

        if lower.chars().count() > MAX_GREETING_CHARS {
            return false;
        }

        let without_phrases = self.markers.social_phrases.replace_all(&lower, "");
        !without_phrases.chars().any(is_word_char)
    }
}

// Letters, digits and '_' only; stray combining marks or connector punctuation are not words
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
