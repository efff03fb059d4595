//! Classifier trait and common types

use crate::zero_shot::{RemoteFailure, RemoteOutcome, RemoteVerdict};
use async_trait::async_trait;
use mailsort_core::{Category, Provenance};
use serde::Serialize;

/// A remote zero-shot classifier.
///
/// Implementations never fail: every problem talking to the backend is
/// reported as [`RemoteOutcome::Unavailable`] so callers can fall back.
#[async_trait]
pub trait ZeroShotClassifier: Send + Sync {
    /// Classify already-normalized text
    async fn classify(&self, text: &str) -> RemoteOutcome;

    /// Get the classifier name
    fn name(&self) -> &str;
}

/// Final decision for one email
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationResult {
    /// Triage bucket
    pub category: Category,

    /// Confidence score (0.0-1.0)
    pub score: f32,

    /// Component that produced the category
    pub provenance: Provenance,

    /// Diagnostic payload, only shown to clients on request
    pub explanation: Explanation,

    /// Latency in microseconds
    pub latency_us: u64,
}

/// Why a decision came out the way it did
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum Explanation {
    /// Remote verdict accepted as-is
    #[serde(rename = "hf")]
    Remote {
        labels: Vec<String>,
        scores: Vec<f64>,
    },

    /// Pure greeting/thanks short-circuit
    Rule {
        why: &'static str,
        remote: RemoteContext,
    },

    /// Marker-counting fallback
    Heuristic {
        hits: RuleHits,
        remote: RemoteContext,
    },
}

/// What the remote classifier said before we fell back
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RemoteContext {
    /// Verdict came back under the confidence threshold
    LowConfidence {
        label: String,
        score: f64,
        threshold: f64,
    },

    /// No verdict at all
    Unavailable { reason: String },
}

impl RemoteContext {
    pub(crate) fn low_confidence(verdict: &RemoteVerdict, threshold: f64) -> Self {
        Self::LowConfidence {
            label: verdict.label.clone(),
            score: verdict.score,
            threshold,
        }
    }

    pub(crate) fn unavailable(failure: &RemoteFailure) -> Self {
        Self::Unavailable {
            reason: failure.to_string(),
        }
    }
}

/// Markers the rule classifier found, by set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuleHits {
    pub productive: Vec<String>,
    pub unproductive: Vec<String>,
}
