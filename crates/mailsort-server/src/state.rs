//! Shared application state

use crate::config::ServerConfig;
use mailsort_classifiers::{Orchestrator, ZeroShotClassifier};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tracing::info;

/// Application state shared across all requests; read-only after startup
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,

    /// Classification pipeline
    pub orchestrator: Arc<Orchestrator>,

    /// Prometheus handle for rendering, absent when no recorder is installed
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// Initialize state with the HTTP zero-shot client from configuration
    pub fn new(config: ServerConfig, metrics_handle: Option<PrometheusHandle>) -> anyhow::Result<Self> {
        let orchestrator = Orchestrator::new(&config.classifier)?;

        if config.classifier.remote_enabled() {
            info!("Remote classifier enabled: {}", config.classifier.api_url);
        } else {
            info!("No API token configured, using local classifiers only");
        }

        Ok(Self {
            config: Arc::new(config),
            orchestrator: Arc::new(orchestrator),
            metrics_handle,
        })
    }

    /// Initialize state around a custom remote classifier
    pub fn with_remote(
        config: ServerConfig,
        remote: Arc<dyn ZeroShotClassifier>,
        metrics_handle: Option<PrometheusHandle>,
    ) -> anyhow::Result<Self> {
        let orchestrator = Orchestrator::with_remote(&config.classifier, remote)?;

        Ok(Self {
            config: Arc::new(config),
            orchestrator: Arc::new(orchestrator),
            metrics_handle,
        })
    }
}
