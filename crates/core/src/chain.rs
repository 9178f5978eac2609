//! Ordered fallback over interchangeable data sources.
//!
//! Every fetch kind (metadata, captions, comments) is served by a
//! [`ProviderChain`]: the native extractor first, then each mirror in the
//! configured order. Providers are tried one at a time; the first success
//! wins and every failure before it is kept as a [`ProviderAttempt`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    error::{Result, VibeError},
    types::VideoTarget,
};

/// Why a single provider call failed. The chain treats every variant as
/// "try the next provider"; the distinction is kept for diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("unexpected HTTP status {status}")]
    Status { status: u16 },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("timed out")]
    Timeout,

    #[error("parsed result was empty")]
    Empty,

    #[error("network error: {0}")]
    Network(String),

    #[error("extractor failed: {0}")]
    Extractor(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout
        } else if e.is_decode() {
            ProviderError::Malformed(e.to_string())
        } else if let Some(status) = e.status() {
            ProviderError::Status {
                status: status.as_u16(),
            }
        } else {
            ProviderError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(e: serde_json::Error) -> Self {
        ProviderError::Malformed(format!("response was not valid JSON: {e}"))
    }
}

#[async_trait]
pub trait Provider<T>: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch(&self, target: &VideoTarget) -> std::result::Result<T, ProviderError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderAttempt {
    pub provider: String,
    pub error: Option<String>,
}

impl ProviderAttempt {
    pub fn failed(provider: impl Into<String>, error: &ProviderError) -> Self {
        Self {
            provider: provider.into(),
            error: Some(error.to_string()),
        }
    }
}

impl std::fmt::Display for ProviderAttempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.error {
            Some(error) => write!(f, "[{}] {}", self.provider, error),
            None => write!(f, "[{}] ok", self.provider),
        }
    }
}

/// One line per attempt, indented for display under an error headline.
pub fn format_attempts(attempts: &[ProviderAttempt]) -> String {
    if attempts.is_empty() {
        return "  (no providers configured)".to_string();
    }
    attempts
        .iter()
        .map(|attempt| format!("  - {attempt}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A successful chain traversal: the value, who produced it, and the
/// failures that were skipped on the way.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub value: T,
    pub provider: String,
    pub attempts: Vec<ProviderAttempt>,
}

impl<T> Fetched<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        Fetched {
            value: f(self.value),
            provider: self.provider,
            attempts: self.attempts,
        }
    }
}

pub struct ProviderChain<T> {
    resource: &'static str,
    providers: Vec<Box<dyn Provider<T>>>,
}

impl<T: Send> ProviderChain<T> {
    pub fn new(resource: &'static str) -> Self {
        Self {
            resource,
            providers: Vec::new(),
        }
    }

    pub fn with(mut self, provider: impl Provider<T> + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub async fn fetch(&self, target: &VideoTarget) -> Result<Fetched<T>> {
        let mut attempts = Vec::new();

        for provider in &self.providers {
            debug!(
                resource = self.resource,
                provider = provider.name(),
                video_id = %target.id,
                "Trying provider"
            );

            match provider.fetch(target).await {
                Ok(value) => {
                    info!(
                        resource = self.resource,
                        provider = provider.name(),
                        skipped = attempts.len(),
                        "Provider succeeded"
                    );
                    return Ok(Fetched {
                        value,
                        provider: provider.name().to_string(),
                        attempts,
                    });
                }
                Err(e) => {
                    warn!(
                        resource = self.resource,
                        provider = provider.name(),
                        error = %e,
                        "Provider failed, trying next"
                    );
                    attempts.push(ProviderAttempt::failed(provider.name(), &e));
                }
            }
        }

        Err(VibeError::AllProvidersExhausted {
            resource: self.resource,
            attempts,
        })
    }
}
