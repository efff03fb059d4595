//! Server configuration

use crate::cli::Cli;
use mailsort_classifiers::ClassifierConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;
use url::Url;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted request body, uploads included
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Classifier and decision policy settings
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl ServerConfig {
    /// Load configuration from file and CLI/env overrides
    pub fn load(config_path: &str, cli: &Cli) -> anyhow::Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if Path::new(config_path).exists() {
            info!("Loading configuration from {}", config_path);
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            Self::default()
        };

        // Apply CLI overrides
        if let Some(listen) = &cli.listen {
            config.listen = listen.clone();
        }

        if let Some(port) = cli.port {
            config.port = port;
        }

        if let Some(api_url) = &cli.api_url {
            config.classifier.api_url = api_url.clone();
        }

        if let Some(token) = &cli.api_token {
            config.classifier.api_token = Some(token.clone());
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the loaded values
    pub fn validate(&self) -> anyhow::Result<()> {
        self.classifier.validate()?;

        let url = Url::parse(&self.classifier.api_url)
            .map_err(|e| anyhow::anyhow!("Invalid api_url '{}': {}", self.classifier.api_url, e))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("api_url scheme '{}' is not allowed", url.scheme());
        }

        if self.max_upload_bytes == 0 {
            anyhow::bail!("max_upload_bytes must be positive");
        }

        Ok(())
    }

    /// Socket address string for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.listen, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            classifier: ClassifierConfig::default(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}
