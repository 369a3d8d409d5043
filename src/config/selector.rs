//! Backend selector configuration

use crate::selector::{BackendKind, SelectionPolicy};
use serde::{Deserialize, Serialize};

/// Configuration for the backend selector.
///
/// The auto fallback order is an explicit policy choice, not a derived
/// value: the locally-hosted Ollama server is preferred, then TinyChat,
/// then TinyLLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Active-backend selection policy: "auto" or a backend name.
    pub policy: SelectionPolicy,
    /// Precedence for the auto policy; first available wins.
    pub fallback_order: Vec<BackendKind>,
    pub ollama_url: String,
    pub tinyllm_url: String,
    pub tinychat_url: String,
    /// Model sent with Ollama generation requests.
    pub model: String,
    /// Master switch for AI assistance.
    pub ai_enabled: bool,
    pub probe_timeout_seconds: u64,
    /// Upper bound on a single generation call.
    pub generate_timeout_seconds: u64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            policy: SelectionPolicy::PreferLocalAuto,
            fallback_order: vec![
                BackendKind::Ollama,
                BackendKind::TinyChat,
                BackendKind::TinyLlm,
            ],
            ollama_url: "http://localhost:11434".to_string(),
            tinyllm_url: "http://localhost:8000".to_string(),
            tinychat_url: "http://localhost:8000".to_string(),
            model: "llama3.2".to_string(),
            ai_enabled: true,
            probe_timeout_seconds: 5,
            generate_timeout_seconds: 30,
        }
    }
}

impl SelectorConfig {
    /// Snapshot of this configuration in the persisted-preferences shape.
    pub fn prefs(&self) -> crate::selector::BackendPrefs {
        crate::selector::BackendPrefs {
            selected_backend: self.policy,
            selected_model: self.model.clone(),
            ollama_url: self.ollama_url.clone(),
            tinyllm_url: self.tinyllm_url.clone(),
            tinychat_url: self.tinychat_url.clone(),
            ai_enabled: self.ai_enabled,
        }
    }

    pub fn base_url(&self, kind: BackendKind) -> &str {
        match kind {
            BackendKind::Ollama => &self.ollama_url,
            BackendKind::TinyLlm => &self.tinyllm_url,
            BackendKind::TinyChat => &self.tinychat_url,
        }
    }
}
