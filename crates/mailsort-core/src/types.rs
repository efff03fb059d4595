//! Core types for mailsort

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two triage buckets an email can land in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Requires action or support
    Productive,

    /// Purely social, no actionable request
    Unproductive,
}

impl Category {
    /// Stable name used in responses, logs and metric labels
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Productive => "Productive",
            Self::Unproductive => "Unproductive",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which component produced the final category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Remote zero-shot model, accepted above the confidence threshold
    Remote,

    /// Pure greeting/thanks short-circuit
    Rule,

    /// Local marker-counting classifier
    Heuristic,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Rule => "rule",
            Self::Heuristic => "heuristic",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Suggested reply for a classified email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyBundle {
    /// Reply subject line
    pub subject: String,

    /// Reply body
    pub body: String,
}

impl ReplyBundle {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }
}
