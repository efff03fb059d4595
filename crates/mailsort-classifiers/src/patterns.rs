//! Marker pattern sets shared by the rule classifier and greeting detector
//!
//! Patterns are matched against lower-cased text, so they are written in
//! lower case. They are compiled once at startup and shared behind an `Arc`.

use mailsort_core::{Error, Result};
use regex::Regex;

/// Greetings and thanks
const UNPRODUCTIVE_MARKERS: &[&str] = &[
    r"\bfeliz natal\b",
    r"\bfeliz ano novo\b",
    r"\bobrigado\b",
    r"\bagradec",
    r"\bparabéns\b",
    r"\bbom dia\b",
    r"\bboa tarde\b",
    r"\bboa noite\b",
    r"\bgrato\b",
    r"\bobrigada\b",
];

/// Support, request and problem keywords
const PRODUCTIVE_MARKERS: &[&str] = &[
    r"\bstatus\b",
    r"\batualiza",
    r"\bsuporte\b",
    r"\bchamado\b",
    r"\bprotocolo\b",
    r"\bsolicito\b",
    r"\bsolicita\b",
    r"\bpedido\b",
    r"\banexo\b",
    r"\bdocumento\b",
    r"\babrir\s+ticket\b",
    r"\bresolver\b",
    r"\berro\b",
    r"\bproblema\b",
];

/// Social phrases stripped by the greeting detector
const SOCIAL_PHRASES: &str = r"(?i)\b(bom dia|boa tarde|boa noite|olá|ola|oi|obrigad\w*|agradec\w*|grato|grata|feliz natal|feliz ano novo|boas festas|parabéns|pela atenção|pela ajuda|pelo retorno|pelo apoio|tudo certo|tudo bem|até logo|até mais|atenciosamente|abraços?|saudações)\b";

/// An ordered set of named regex markers
#[derive(Debug, Clone)]
pub struct MarkerSet {
    name: String,
    patterns: Vec<Regex>,
}

impl MarkerSet {
    /// Compile a marker set from regex sources
    pub fn new(name: impl Into<String>, sources: &[&str]) -> Result<Self> {
        let name = name.into();
        let patterns = sources
            .iter()
            .map(|src| {
                Regex::new(src).map_err(|e| {
                    Error::config(format!("Failed to compile {} marker '{}': {}", name, src, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { name, patterns })
    }

    /// Set name, used in logs
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of patterns in the set
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Sources of the patterns that occur in `text`, in set order.
    ///
    /// Each pattern counts once no matter how often it occurs.
    pub fn matching(&self, text: &str) -> Vec<&str> {
        self.patterns
            .iter()
            .filter(|re| re.is_match(text))
            .map(|re| re.as_str())
            .collect()
    }

    /// Number of distinct patterns present in `text`
    pub fn count_matches(&self, text: &str) -> usize {
        self.patterns.iter().filter(|re| re.is_match(text)).count()
    }

    /// Whether any pattern is present in `text`
    pub fn any_match(&self, text: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(text))
    }
}

/// All marker sets used by the local classifiers
#[derive(Debug, Clone)]
pub struct MarkerSets {
    /// Greeting/thanks markers
    pub unproductive: MarkerSet,

    /// Request/support markers
    pub productive: MarkerSet,

    /// Phrases removed when checking for a purely social message
    pub social_phrases: Regex,
}

impl MarkerSets {
    /// Build the built-in Portuguese marker sets
    pub fn new() -> Result<Self> {
        Self::with_markers(UNPRODUCTIVE_MARKERS, PRODUCTIVE_MARKERS, SOCIAL_PHRASES)
    }

    /// Build marker sets from custom pattern sources
    pub fn with_markers(
        unproductive: &[&str],
        productive: &[&str],
        social_phrases: &str,
    ) -> Result<Self> {
        let social_phrases = Regex::new(social_phrases).map_err(|e| {
            Error::config(format!("Failed to compile social phrase pattern: {}", e))
        })?;

        Ok(Self {
            unproductive: MarkerSet::new("unproductive", unproductive)?,
            productive: MarkerSet::new("productive", productive)?,
            social_phrases,
        })
    }
}
