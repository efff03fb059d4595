//! Remote zero-shot classification client
//!
//! Talks to a Hugging Face style zero-shot inference endpoint: the email
//! text and two descriptive candidate labels go in, one score per label
//! comes back. Every failure is reported as a tagged [`RemoteFailure`];
//! nothing here returns `Err` to the caller.

use crate::classifier::ZeroShotClassifier;
use crate::config::ClassifierConfig;
use async_trait::async_trait;
use mailsort_core::text::truncate_chars;
use mailsort_core::{Category, Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

/// Instruction prepended to every email sent to the model
const CONTEXT_PREFIX: &str = "Contexto: classifique como PRODUTIVO apenas se há pedido, dúvida, \
problema, erro, anexo, prazo ou necessidade de suporte. Se for apenas saudação/agradecimento \
(ex.: obrigado, bom dia), classifique como IMPRODUTIVO. Mensagem: ";

/// Result of one remote classification attempt
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteOutcome {
    Classified(RemoteVerdict),
    Unavailable(RemoteFailure),
}

/// Winning label of a successful remote call
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteVerdict {
    /// Category mapped from the winning label
    pub category: Category,

    /// Winning label text
    pub label: String,

    /// Winning score, as sent by the API
    pub score: f64,

    /// All labels as returned, for auditing
    pub labels: Vec<String>,

    /// All scores as returned, aligned with `labels`
    pub scores: Vec<f64>,
}

/// Why the remote classifier produced no verdict
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteFailure {
    /// No credential configured
    #[error("remote classifier disabled")]
    Disabled,

    #[error("remote classifier timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("remote classifier returned HTTP {0}")]
    BadStatus(u16),

    #[error("malformed response body: {0}")]
    MalformedBody(String),

    /// Body parsed but carried no labels or scores
    #[error("response has no labels or scores")]
    MissingScores,
}

impl RemoteFailure {
    /// Short stable name for metric labels
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Timeout => "timeout",
            Self::Transport(_) => "transport",
            Self::BadStatus(_) => "bad_status",
            Self::MalformedBody(_) => "malformed_body",
            Self::MissingScores => "missing_scores",
        }
    }
}

/// Map a candidate label to a category by its prefix.
///
/// Unknown labels count as Unproductive.
pub fn category_from_label(label: &str) -> Category {
    let lower = label.trim().to_lowercase();
    if lower.starts_with("improdutivo") || lower.starts_with("unproductive") {
        Category::Unproductive
    } else if lower.starts_with("produtivo") || lower.starts_with("productive") {
        Category::Productive
    } else {
        Category::Unproductive
    }
}

#[derive(Debug, Serialize)]
struct ZeroShotRequest<'a> {
    inputs: String,
    parameters: ZeroShotParameters<'a>,
}

#[derive(Debug, Serialize)]
struct ZeroShotParameters<'a> {
    candidate_labels: &'a [String],
    multi_label: bool,
    hypothesis_template: &'a str,
}

/// The API answers with either one object or a one-element batch
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ZeroShotResponse {
    Batch(Vec<ZeroShotScores>),
    Single(ZeroShotScores),
}

#[derive(Debug, Default, Deserialize)]
struct ZeroShotScores {
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default)]
    scores: Vec<f64>,
}

impl ZeroShotResponse {
    fn into_scores(self) -> ZeroShotScores {
        match self {
            Self::Batch(batch) => batch.into_iter().next().unwrap_or_default(),
            Self::Single(scores) => scores,
        }
    }
}

/// Parse a response body into a verdict
fn parse_verdict(body: &str) -> std::result::Result<RemoteVerdict, RemoteFailure> {
    let response: ZeroShotResponse =
        serde_json::from_str(body).map_err(|e| RemoteFailure::MalformedBody(e.to_string()))?;
    let ZeroShotScores { labels, scores } = response.into_scores();

    if labels.is_empty() || scores.is_empty() {
        return Err(RemoteFailure::MissingScores);
    }

    if let Some(bad) = scores.iter().find(|s| !(0.0..=1.0).contains(*s)) {
        return Err(RemoteFailure::MalformedBody(format!(
            "score {} outside [0, 1]",
            bad
        )));
    }

    // First index wins on equal scores
    let best = scores
        .iter()
        .enumerate()
        .fold(0, |best, (i, s)| if *s > scores[best] { i } else { best });

    let label = labels.get(best).cloned().ok_or_else(|| {
        RemoteFailure::MalformedBody(format!(
            "{} labels for {} scores",
            labels.len(),
            scores.len()
        ))
    })?;

    Ok(RemoteVerdict {
        category: category_from_label(&label),
        score: scores[best],
        label,
        scores,
        labels,
    })
}

/// Client for a Hugging Face zero-shot classification endpoint
pub struct HfZeroShotClient {
    name: String,
    http: reqwest::Client,
    api_url: String,
    api_token: Option<String>,
    candidate_labels: Vec<String>,
    hypothesis_template: String,
    max_chars: usize,
}

impl HfZeroShotClient {
    /// Create a client from configuration.
    ///
    /// A missing token is not an error: the client then reports
    /// [`RemoteFailure::Disabled`] for every call without touching the network.
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        let api_token = config
            .api_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        Ok(Self {
            name: "hf-zero-shot".to_string(),
            http,
            api_url: config.api_url.clone(),
            api_token,
            candidate_labels: config.candidate_labels.clone(),
            hypothesis_template: config.hypothesis_template.clone(),
            max_chars: config.max_remote_chars,
        })
    }

    /// Whether calls will reach the network
    pub fn is_enabled(&self) -> bool {
        self.api_token.is_some()
    }

    fn build_request(&self, text: &str) -> ZeroShotRequest<'_> {
        ZeroShotRequest {
            inputs: format!("{}{}", CONTEXT_PREFIX, truncate_chars(text, self.max_chars)),
            parameters: ZeroShotParameters {
                candidate_labels: &self.candidate_labels,
                multi_label: false,
                hypothesis_template: &self.hypothesis_template,
            },
        }
    }

    async fn call(&self, token: &str, text: &str) -> std::result::Result<RemoteVerdict, RemoteFailure> {
        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(token)
            .json(&self.build_request(text))
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteFailure::BadStatus(status.as_u16()));
        }

        let body = response.text().await.map_err(transport_failure)?;
        parse_verdict(&body)
    }
}

fn transport_failure(err: reqwest::Error) -> RemoteFailure {
    if err.is_timeout() {
        RemoteFailure::Timeout
    } else {
        RemoteFailure::Transport(err.to_string())
    }
}

#[async_trait]
impl ZeroShotClassifier for HfZeroShotClient {
    async fn classify(&self, text: &str) -> RemoteOutcome {
        let Some(token) = self.api_token.as_deref() else {
            return RemoteOutcome::Unavailable(RemoteFailure::Disabled);
        };

        let start = Instant::now();
        match self.call(token, text).await {
            Ok(verdict) => {
                debug!(
                    label = %verdict.label,
                    score = verdict.score,
                    latency_ms = start.elapsed().as_millis() as u64,
                    "Remote classification succeeded"
                );
                RemoteOutcome::Classified(verdict)
            }
            Err(failure) => {
                warn!(
                    reason = failure.reason(),
                    latency_ms = start.elapsed().as_millis() as u64,
                    "Remote classification failed: {}",
                    failure
                );
                metrics::counter!("mailsort_remote_failures_total", "reason" => failure.reason())
                    .increment(1);
                RemoteOutcome::Unavailable(failure)
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
