//! mailsort Classifiers
//!
//! Email triage classifiers and the policy that combines them.
//!
//! Signals, from most to least preferred:
//! - Remote zero-shot model, accepted when its score reaches the threshold
//! - Pure greeting/thanks detector, a deterministic short-circuit
//! - Marker-counting rule classifier, always available
//!
//! [`Orchestrator`] applies that policy and never fails; [`compose_reply`]
//! turns the resulting category into a suggested answer.

pub mod classifier;
pub mod config;
pub mod decision;
pub mod greeting;
pub mod patterns;
pub mod reply;
pub mod rules;
pub mod zero_shot;

pub use classifier::{ClassificationResult, Explanation, RemoteContext, RuleHits, ZeroShotClassifier};
pub use config::ClassifierConfig;
pub use decision::Orchestrator;
pub use greeting::GreetingDetector;
pub use patterns::{MarkerSet, MarkerSets};
pub use reply::compose_reply;
pub use rules::{RuleClassifier, RuleVerdict};
pub use zero_shot::{HfZeroShotClient, RemoteFailure, RemoteOutcome, RemoteVerdict};
