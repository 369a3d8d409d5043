//! Supporting types for backend selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed set of text-generation backends the selector knows about.
///
/// Each backend has its own wire schema; the set is closed by design and
/// membership never changes at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Ollama local model server (<https://ollama.ai>)
    Ollama,
    /// TinyLLM lightweight LLM server (<https://github.com/jasonacox/TinyLLM>)
    #[serde(rename = "tinyllm")]
    TinyLlm,
    /// TinyChat chatbot server (<https://github.com/jasonacox/tinychat>)
    #[serde(rename = "tinychat")]
    TinyChat,
}

impl BackendKind {
    /// All known backend kinds, in declaration order.
    pub const ALL: [BackendKind; 3] = [
        BackendKind::Ollama,
        BackendKind::TinyLlm,
        BackendKind::TinyChat,
    ];
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Ollama => write!(f, "ollama"),
            BackendKind::TinyLlm => write!(f, "tinyllm"),
            BackendKind::TinyChat => write!(f, "tinychat"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(BackendKind::Ollama),
            "tinyllm" => Ok(BackendKind::TinyLlm),
            "tinychat" => Ok(BackendKind::TinyChat),
            _ => Err(format!("Unknown backend kind: {}", s)),
        }
    }
}

/// How the active backend is chosen after a probe pass.
///
/// Under `PreferLocalAuto` the first available backend in the configured
/// fallback order wins. The order is configuration, not a derived value;
/// the default is `[ollama, tinychat, tinyllm]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Always use this backend; no backend is active if it is unavailable.
    Explicit(BackendKind),
    /// First available backend in the configured fallback order.
    PreferLocalAuto,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        SelectionPolicy::PreferLocalAuto
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionPolicy::Explicit(kind) => write!(f, "{}", kind),
            SelectionPolicy::PreferLocalAuto => write!(f, "auto"),
        }
    }
}

impl FromStr for SelectionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("auto") {
            return Ok(SelectionPolicy::PreferLocalAuto);
        }
        s.parse::<BackendKind>().map(SelectionPolicy::Explicit)
    }
}

impl Serialize for SelectionPolicy {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SelectionPolicy {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Persisted backend preferences: the selected policy, model, per-backend
/// base URLs, and the AI-enabled flag. Refreshed whenever the selector is
/// constructed so the persisted record tracks the last-used configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendPrefs {
    pub selected_backend: SelectionPolicy,
    pub selected_model: String,
    pub ollama_url: String,
    pub tinyllm_url: String,
    pub tinychat_url: String,
    pub ai_enabled: bool,
}

/// Parameters for a single text-generation call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub system_prompt: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Result of one reachability probe.
///
/// Probes never surface errors; anything that isn't a clean success is
/// recorded as `Unavailable`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Backend responded; `models` is non-empty only for backends that
    /// report a model list (Ollama's /api/tags).
    Available { models: Vec<String> },
    /// Backend unreachable, errored, or returned a non-success status.
    Unavailable,
}

impl ProbeOutcome {
    pub fn is_available(&self) -> bool {
        matches!(self, ProbeOutcome::Available { .. })
    }
}
