//! Marker-counting fallback classifier
//!
//! Always available and deterministic. Used whenever the remote model is
//! disabled, failing, or not confident enough.

use crate::classifier::RuleHits;
use crate::patterns::MarkerSets;
use mailsort_core::Category;
use std::sync::Arc;

/// Score floor for any rule verdict
const BASE_SCORE: f32 = 0.6;

/// Score added per matching marker
const SCORE_PER_HIT: f32 = 0.1;

/// Outcome of the rule classifier
#[derive(Debug, Clone, PartialEq)]
pub struct RuleVerdict {
    pub category: Category,

    /// Always within [0.6, 1.0]
    pub score: f32,

    pub hits: RuleHits,
}

/// Classifies by comparing how many productive and unproductive markers occur
#[derive(Debug, Clone)]
pub struct RuleClassifier {
    markers: Arc<MarkerSets>,
}

impl RuleClassifier {
    pub fn new(markers: Arc<MarkerSets>) -> Self {
        Self { markers }
    }

    /// Classify text. Ties, including no hits at all, go to Unproductive.
    pub fn classify(&self, text: &str) -> RuleVerdict {
        let lower = text.to_lowercase();

        let hits = RuleHits {
            productive: to_owned(self.markers.productive.matching(&lower)),
            unproductive: to_owned(self.markers.unproductive.matching(&lower)),
        };

        let productive = hits.productive.len();
        let unproductive = hits.unproductive.len();

        let (category, count) = if productive > unproductive {
            (Category::Productive, productive)
        } else {
            (Category::Unproductive, unproductive)
        };

        RuleVerdict {
            category,
            score: score_for(count),
            hits,
        }
    }
}

fn score_for(count: usize) -> f32 {
    (BASE_SCORE + SCORE_PER_HIT * count as f32).min(1.0)
}

fn to_owned(sources: Vec<&str>) -> Vec<String> {
    sources.into_iter().map(str::to_string).collect()
}
