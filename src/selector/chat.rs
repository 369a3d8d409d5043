//! OpenAI-style chat-completion backend implementation.
//!
//! Covers both TinyLLM and TinyChat: two distinct deployments that share the
//! same /v1/chat/completions schema. One struct, instantiated per kind.

use super::{BackendKind, GenerationBackend, GenerationRequest, ProbeOutcome, SelectorError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub struct ChatCompletionBackend {
    kind: BackendKind,
    base_url: String,
    client: Arc<Client>,
    probe_timeout: Duration,
    generate_timeout: Duration,
}

impl ChatCompletionBackend {
    pub fn new(
        kind: BackendKind,
        base_url: String,
        client: Arc<Client>,
        probe_timeout: Duration,
        generate_timeout: Duration,
    ) -> Self {
        Self {
            kind,
            base_url,
            client,
            probe_timeout,
            generate_timeout,
        }
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

/// /v1/chat/completions response format
#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[async_trait]
impl GenerationBackend for ChatCompletionBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Reachability check: GET {base}/ expecting HTTP 200.
    async fn probe(&self) -> ProbeOutcome {
        let url = format!("{}/", self.base_url);

        match self
            .client
            .get(&url)
            .timeout(self.probe_timeout)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                ProbeOutcome::Available { models: vec![] }
            }
            _ => ProbeOutcome::Unavailable,
        }
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, SelectorError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let url = reqwest::Url::parse(&url)
            .map_err(|e| SelectorError::InvalidConfiguration(format!("{}: {}", url, e)))?;

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system_prompt {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.prompt,
        });

        let body = ChatCompletionBody {
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream: false,
        };

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

        let parsed: ChatCompletionResponse = response.json().await.map_err(|e| {
            SelectorError::InvalidResponse(format!(
                "Failed to parse chat completion response: {}",
                e
            ))
        })?;

        // An empty choices array degrades to an empty string rather than an
        // error; the server answered in the expected shape.
        Ok(parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default())
    }
}
