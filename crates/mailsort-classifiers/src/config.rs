//! Configuration for the classification pipeline

use mailsort_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default zero-shot endpoint (multilingual XNLI model)
pub const DEFAULT_API_URL: &str =
    "https://api-inference.huggingface.co/models/joeddav/xlm-roberta-large-xnli";

/// Configuration for the classifiers and the decision policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Zero-shot classification endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Bearer token for the endpoint; `None` disables the remote path
    #[serde(default, skip_serializing)]
    pub api_token: Option<String>,

    /// Minimum remote score accepted without local fallback
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Score reported for the pure-greeting short-circuit
    #[serde(default = "default_greeting_score")]
    pub greeting_score: f32,

    /// Remote request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Characters of the email forwarded to the remote model
    #[serde(default = "default_max_remote_chars")]
    pub max_remote_chars: usize,

    /// Exactly two candidate labels: productive first, unproductive second
    #[serde(default = "default_candidate_labels")]
    pub candidate_labels: Vec<String>,

    /// NLI hypothesis template, must contain `{}`
    #[serde(default = "default_hypothesis_template")]
    pub hypothesis_template: String,
}

impl ClassifierConfig {
    /// Request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Whether a credential is configured
    pub fn remote_enabled(&self) -> bool {
        self.api_token.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    /// Check invariants that serde defaults cannot express
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::config(format!(
                "threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.greeting_score) {
            return Err(Error::config(format!(
                "greeting_score must be within [0, 1], got {}",
                self.greeting_score
            )));
        }
        if self.candidate_labels.len() != 2 {
            return Err(Error::config(format!(
                "exactly two candidate labels are required, got {}",
                self.candidate_labels.len()
            )));
        }
        if !self.hypothesis_template.contains("{}") {
            return Err(Error::config("hypothesis_template must contain '{}'"));
        }
        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be positive"));
        }
        if self.max_remote_chars == 0 {
            return Err(Error::config("max_remote_chars must be positive"));
        }
        Ok(())
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_token: None,
            threshold: default_threshold(),
            greeting_score: default_greeting_score(),
            timeout_secs: default_timeout_secs(),
            max_remote_chars: default_max_remote_chars(),
            candidate_labels: default_candidate_labels(),
            hypothesis_template: default_hypothesis_template(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_threshold() -> f64 {
    0.60
}

fn default_greeting_score() -> f32 {
    0.97
}

fn default_timeout_secs() -> u64 {
    25
}

fn default_max_remote_chars() -> usize {
    3_500
}

fn default_candidate_labels() -> Vec<String> {
    vec![
        "Produtivo: requer ação, pedido, dúvida, problema, erro, prazo ou suporte".to_string(),
        "Improdutivo: apenas saudação/agradecimento (ex.: obrigado, bom dia), sem pedido"
            .to_string(),
    ]
}

fn default_hypothesis_template() -> String {
    "Este email é {}.".to_string()
}
