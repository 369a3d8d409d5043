//! Ollama backend implementation.

use super::{BackendKind, GenerationBackend, GenerationRequest, ProbeOutcome, SelectorError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Ollama backend.
///
/// - Reachability probe via GET /api/tags (also captures the model list)
/// - Generation via POST /api/generate with Ollama's native schema
pub struct OllamaBackend {
    base_url: String,
    /// Model name sent with every generation request (e.g., "llama3.2").
    model: String,
    client: Arc<Client>,
    probe_timeout: Duration,
    generate_timeout: Duration,
}

impl OllamaBackend {
    pub fn new(
        base_url: String,
        model: String,
        client: Arc<Client>,
        probe_timeout: Duration,
        generate_timeout: Duration,
    ) -> Self {
        Self {
            base_url,
            model,
            client,
            probe_timeout,
            generate_timeout,
        }
    }
}

/// Ollama /api/tags response format
#[derive(Deserialize)]
struct OllamaTagsResponse {
    models: Vec<OllamaModel>,
}

#[derive(Deserialize)]
struct OllamaModel {
    name: String,
}

/// Ollama /api/generate response format
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

#[async_trait]
impl GenerationBackend for OllamaBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Ollama
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn probe(&self) -> ProbeOutcome {
        let url = format!("{}/api/tags", self.base_url);

        let response = match self
            .client
            .get(&url)
            .timeout(self.probe_timeout)
            .send()
            .await
        {
            Ok(r) => r,
            Err(_) => return ProbeOutcome::Unavailable,
        };

        if !response.status().is_success() {
            return ProbeOutcome::Unavailable;
        }

        // Capture the model list when the body parses; a 200 with an
        // unexpected body still counts as reachable.
        let models = match response.json::<OllamaTagsResponse>().await {
            Ok(tags) => tags.models.into_iter().map(|m| m.name).collect(),
            Err(_) => vec![],
        };

        ProbeOutcome::Available { models }
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, SelectorError> {
        let url = format!("{}/api/generate", self.base_url);
        let url = reqwest::Url::parse(&url)
            .map_err(|e| SelectorError::InvalidConfiguration(format!("{}: {}", url, e)))?;

        let mut body = serde_json::json!({
            "model": self.model,
            "prompt": request.prompt,
            "stream": false,
            "options": {
                "temperature": request.temperature,
                "num_predict": request.max_tokens,
            },
        });
        if let Some(system) = &request.system_prompt {
            body["system"] = serde_json::Value::String(system.clone());
        }

        let timeout_ms = self.generate_timeout.as_millis() as u64;
        let response = self
            .client
            .post(url)
            .json(&body)
            .timeout(self.generate_timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SelectorError::Timeout(timeout_ms)
                } else {
                    SelectorError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SelectorError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: OllamaGenerateResponse = response.json().await.map_err(|e| {
            SelectorError::InvalidResponse(format!("Failed to parse Ollama generate response: {}", e))
        })?;

        Ok(parsed.response)
    }
}
