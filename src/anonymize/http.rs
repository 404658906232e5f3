//! Entity detection through an HTTP token-classification service.

use super::{Entity, EntityDetector};
use crate::config::AnonymizeSettings;
use crate::error::{Result, UndertekstError};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

#[derive(Serialize)]
struct DetectRequest<'a> {
    inputs: &'a str,
    parameters: DetectParameters,
}

/// Asks for per-token `B-`/`I-` tags instead of grouped entities.
#[derive(Serialize)]
struct DetectParameters {
    aggregation_strategy: &'static str,
}

impl<'a> DetectRequest<'a> {
    fn new(inputs: &'a str) -> Self {
        Self {
            inputs,
            parameters: DetectParameters {
                aggregation_strategy: "none",
            },
        }
    }
}

/// Detector backed by a remote named-entity-recognition endpoint.
///
/// Sends `{"inputs": text, "parameters": {"aggregation_strategy": "none"}}`
/// and expects a JSON array of entities with
/// `entity`, `word`, `start` and `end` fields.
pub struct HttpEntityDetector {
    client: reqwest::Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl HttpEntityDetector {
    /// Create a detector for `endpoint` with a request timeout.
    pub fn new(endpoint: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| UndertekstError::Config(format!("invalid entity endpoint {:?}: {}", endpoint, e)))?;

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    /// Create a detector from settings, reading the API key from the configured
    /// environment variable when set.
    pub fn from_settings(settings: &AnonymizeSettings) -> Result<Self> {
        let api_key = settings
            .api_key_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
            .filter(|key| !key.is_empty());

        Self::new(
            &settings.endpoint,
            api_key,
            Duration::from_secs(settings.timeout_secs),
        )
    }

    /// Endpoint this detector posts to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl EntityDetector for HttpEntityDetector {
    #[instrument(skip(self, text), fields(endpoint = %self.endpoint, chars = text.len()))]
    async fn detect_entities(&self, text: &str) -> Result<Vec<Entity>> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .json(&DetectRequest::new(text));

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UndertekstError::Anonymization(format!(
                "entity service returned {}: {}",
                status,
                body.trim()
            )));
        }

        let body = response.text().await?;
        let entities: Vec<Entity> = serde_json::from_str(&body).map_err(|e| {
            UndertekstError::Anonymization(format!(
                "expected per-token entities with an `entity` tag: {}",
                e
            ))
        })?;
        debug!("Detected {} entities", entities.len());
        Ok(entities)
    }
}
