//! Decision policy combining the remote model with the local classifiers
//!
//! | remote            | score  | pure greeting | decision                   |
//! |-------------------|--------|---------------|----------------------------|
//! | classified        | >= T   | -             | remote verdict as-is       |
//! | classified        | < T    | yes           | Unproductive, rule         |
//! | classified        | < T    | no            | rule classifier, heuristic |
//! | unavailable       | -      | yes           | Unproductive, rule         |
//! | unavailable       | -      | no            | rule classifier, heuristic |

use crate::classifier::{ClassificationResult, Explanation, RemoteContext, ZeroShotClassifier};
use crate::config::ClassifierConfig;
use crate::greeting::GreetingDetector;
use crate::patterns::MarkerSets;
use crate::rules::RuleClassifier;
use crate::zero_shot::{HfZeroShotClient, RemoteOutcome};
use mailsort_core::{Category, Provenance, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

const GREETING_REASON: &str = "pure_greeting_or_thanks";

/// Runs the remote classifier and applies the fallback policy
pub struct Orchestrator {
    remote: Arc<dyn ZeroShotClassifier>,
    rules: RuleClassifier,
    greeting: GreetingDetector,
    threshold: f64,
    greeting_score: f32,
}

impl Orchestrator {
    /// Build the orchestrator with the built-in markers and an HTTP remote client
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        let remote = Arc::new(HfZeroShotClient::new(config)?);
        Self::with_remote(config, remote)
    }

    /// Build the orchestrator around any remote classifier
    pub fn with_remote(
        config: &ClassifierConfig,
        remote: Arc<dyn ZeroShotClassifier>,
    ) -> Result<Self> {
        config.validate()?;
        let markers = Arc::new(MarkerSets::new()?);

        info!(
            remote = remote.name(),
            threshold = config.threshold,
            productive_markers = markers.productive.len(),
            unproductive_markers = markers.unproductive.len(),
            "Classification pipeline ready"
        );

        Ok(Self {
            remote,
            rules: RuleClassifier::new(markers.clone()),
            greeting: GreetingDetector::new(markers),
            threshold: config.threshold,
            greeting_score: config.greeting_score,
        })
    }

    /// Classify normalized text. Never fails.
    pub async fn classify(&self, text: &str) -> ClassificationResult {
        let start = Instant::now();

        let outcome = self.remote.classify(text).await;
        let mut result = self.decide(text, outcome);
        result.latency_us = start.elapsed().as_micros() as u64;

        info!(
            category = %result.category,
            provenance = %result.provenance,
            score = result.score,
            latency_us = result.latency_us,
            "Email classified"
        );
        metrics::counter!(
            "mailsort_decisions_total",
            "category" => result.category.as_str(),
            "provenance" => result.provenance.as_str()
        )
        .increment(1);
        metrics::histogram!("mailsort_classify_latency_us").record(result.latency_us as f64);

        result
    }

    /// Apply the fallback policy to a remote outcome
    pub fn decide(&self, text: &str, outcome: RemoteOutcome) -> ClassificationResult {
        let remote = match outcome {
            RemoteOutcome::Classified(verdict) if verdict.score >= self.threshold => {
                return ClassificationResult {
                    category: verdict.category,
                    score: verdict.score as f32,
                    provenance: Provenance::Remote,
                    explanation: Explanation::Remote {
                        labels: verdict.labels,
                        scores: verdict.scores,
                    },
                    latency_us: 0,
                };
            }
            RemoteOutcome::Classified(verdict) => {
                debug!(
                    score = verdict.score,
                    threshold = self.threshold,
                    "Remote verdict below threshold, falling back"
                );
                RemoteContext::low_confidence(&verdict, self.threshold)
            }
            RemoteOutcome::Unavailable(failure) => {
                debug!(reason = failure.reason(), "Remote unavailable, falling back");
                RemoteContext::unavailable(&failure)
            }
        };

        if self.greeting.is_pure_greeting(text) {
            return ClassificationResult {
                category: Category::Unproductive,
                score: self.greeting_score,
                provenance: Provenance::Rule,
                explanation: Explanation::Rule {
                    why: GREETING_REASON,
                    remote,
                },
                latency_us: 0,
            };
        }

        let verdict = self.rules.classify(text);
        ClassificationResult {
            category: verdict.category,
            score: verdict.score,
            provenance: Provenance::Heuristic,
            explanation: Explanation::Heuristic {
                hits: verdict.hits,
                remote,
            },
            latency_us: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zero_shot::{RemoteFailure, RemoteVerdict};
    use async_trait::async_trait;

    /// Remote classifier returning a canned outcome
    struct FixedRemote(RemoteOutcome);

    #[async_trait]
    impl ZeroShotClassifier for FixedRemote {
        async fn classify(&self, _text: &str) -> RemoteOutcome {
            self.0.clone()
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn verdict(category: Category, score: f64) -> RemoteOutcome {
        let label = match category {
            Category::Productive => "Produtivo: x",
            Category::Unproductive => "Improdutivo: y",
        };
        RemoteOutcome::Classified(RemoteVerdict {
            category,
            label: label.to_string(),
            score,
            labels: vec![label.to_string()],
            scores: vec![score],
        })
    }

    fn orchestrator(outcome: RemoteOutcome) -> Orchestrator {
        Orchestrator::with_remote(&ClassifierConfig::default(), Arc::new(FixedRemote(outcome)))
            .unwrap()
    }

    const GREETING: &str = "Obrigado pela atenção, tudo certo!";
    const REQUEST: &str = "Preciso de status do chamado 4521, há um erro no sistema.";

    #[tokio::test]
    async fn test_confident_remote_used_verbatim() {
        // remote wins even against the greeting detector
        let result = orchestrator(verdict(Category::Productive, 0.82))
            .classify(GREETING)
            .await;
        assert_eq!(result.category, Category::Productive);
        assert!((result.score - 0.82).abs() < 1e-6);
        assert_eq!(result.provenance, Provenance::Remote);
        assert!(matches!(result.explanation, Explanation::Remote { .. }));
    }

    #[tokio::test]
    async fn test_threshold_is_inclusive() {
        let result = orchestrator(verdict(Category::Unproductive, 0.60))
            .classify(REQUEST)
            .await;
        assert_eq!(result.provenance, Provenance::Remote);
        assert_eq!(result.category, Category::Unproductive);
    }

    #[tokio::test]
    async fn test_threshold_compared_at_full_precision() {
        // 0.59999999 would round up to 0.6 as an f32
        let result = orchestrator(verdict(Category::Unproductive, 0.59999999))
            .classify(REQUEST)
            .await;
        assert_eq!(result.provenance, Provenance::Heuristic);
        assert_eq!(result.category, Category::Productive);
        match result.explanation {
            Explanation::Heuristic { remote, .. } => assert_eq!(
                remote,
                RemoteContext::LowConfidence {
                    label: "Improdutivo: y".to_string(),
                    score: 0.59999999,
                    threshold: 0.6,
                }
            ),
            other => panic!("unexpected explanation: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_low_confidence_greeting_short_circuits() {
        let result = orchestrator(verdict(Category::Productive, 0.55))
            .classify(GREETING)
            .await;
        assert_eq!(result.category, Category::Unproductive);
        assert!((result.score - 0.97).abs() < 1e-6);
        assert_eq!(result.provenance, Provenance::Rule);
        match result.explanation {
            Explanation::Rule { why, remote } => {
                assert_eq!(why, "pure_greeting_or_thanks");
                assert!(matches!(remote, RemoteContext::LowConfidence { .. }));
            }
            other => panic!("unexpected explanation: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_low_confidence_request_uses_rules() {
        let result = orchestrator(verdict(Category::Unproductive, 0.51))
            .classify(REQUEST)
            .await;
        assert_eq!(result.category, Category::Productive);
        assert!((result.score - 0.9).abs() < 1e-5);
        assert_eq!(result.provenance, Provenance::Heuristic);
    }

    #[tokio::test]
    async fn test_disabled_greeting_short_circuits() {
        let result = orchestrator(RemoteOutcome::Unavailable(RemoteFailure::Disabled))
            .classify(GREETING)
            .await;
        assert_eq!(result.category, Category::Unproductive);
        assert!((result.score - 0.97).abs() < 1e-6);
        assert_eq!(result.provenance, Provenance::Rule);
    }

    #[tokio::test]
    async fn test_failed_remote_request_uses_rules() {
        for failure in [
            RemoteFailure::Timeout,
            RemoteFailure::BadStatus(500),
            RemoteFailure::MissingScores,
            RemoteFailure::Transport("connection refused".to_string()),
            RemoteFailure::MalformedBody("eof".to_string()),
        ] {
            let result = orchestrator(RemoteOutcome::Unavailable(failure.clone()))
                .classify(REQUEST)
                .await;
            assert_eq!(result.category, Category::Productive, "{failure}");
            assert_eq!(result.provenance, Provenance::Heuristic);
            match result.explanation {
                Explanation::Heuristic { hits, remote } => {
                    assert_eq!(hits.productive.len(), 3);
                    assert_eq!(
                        remote,
                        RemoteContext::Unavailable {
                            reason: failure.to_string()
                        }
                    );
                }
                other => panic!("unexpected explanation: {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_no_markers_falls_back_unproductive() {
        let result = orchestrator(RemoteOutcome::Unavailable(RemoteFailure::Disabled))
            .classify("Segue o texto combinado na reunião de ontem para revisão geral.")
            .await;
        assert_eq!(result.category, Category::Unproductive);
        assert!((result.score - 0.6).abs() < 1e-6);
        assert_eq!(result.provenance, Provenance::Heuristic);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ClassifierConfig {
            threshold: -0.1,
            ..Default::default()
        };
        let remote = Arc::new(FixedRemote(RemoteOutcome::Unavailable(RemoteFailure::Disabled)));
        assert!(Orchestrator::with_remote(&config, remote).is_err());
    }
}
