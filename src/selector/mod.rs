//! Backend selection and text generation.
//!
//! Tracks reachability of a fixed set of HTTP text-generation backends
//! (Ollama, TinyLLM, TinyChat), selects one active backend per policy, and
//! routes `generate` calls to it. Each backend has its own wire schema behind
//! the shared [`GenerationBackend`] trait; the schemas are not interchangeable.

mod chat;
mod error;
mod ollama;
mod types;

pub use chat::ChatCompletionBackend;
pub use error::SelectorError;
pub use ollama::OllamaBackend;
pub use types::{BackendKind, BackendPrefs, GenerationRequest, ProbeOutcome, SelectionPolicy};

use crate::config::SelectorConfig;
use async_trait::async_trait;
use dashmap::DashMap;
use reqwest::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Uniform interface over the backend-specific wire protocols.
///
/// One implementation per backend id; each performs its own request
/// construction and response parsing. Object-safe, used as
/// `Arc<dyn GenerationBackend>`.
#[async_trait]
pub trait GenerationBackend: Send + Sync + 'static {
    /// Which member of the fixed backend set this is.
    fn kind(&self) -> BackendKind;

    /// Configured base URL.
    fn base_url(&self) -> &str;

    /// Lightweight reachability check. Never errors; failures collapse to
    /// [`ProbeOutcome::Unavailable`].
    async fn probe(&self) -> ProbeOutcome;

    /// Issue exactly one generation request and return the extracted text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, SelectorError>;
}

/// The three concrete backends, constructed once from configuration.
struct BackendSet {
    ollama: Arc<dyn GenerationBackend>,
    tinyllm: Arc<dyn GenerationBackend>,
    tinychat: Arc<dyn GenerationBackend>,
}

impl BackendSet {
    fn get(&self, kind: BackendKind) -> &Arc<dyn GenerationBackend> {
        match kind {
            BackendKind::Ollama => &self.ollama,
            BackendKind::TinyLlm => &self.tinyllm,
            BackendKind::TinyChat => &self.tinychat,
        }
    }
}

/// Probes backends for reachability and routes generation requests to the
/// one currently selected.
///
/// Availability is refreshed only by [`BackendSelector::probe_all`] and is
/// otherwise assumed stale; it is never inferred between probes.
pub struct BackendSelector {
    backends: BackendSet,
    policy: RwLock<SelectionPolicy>,
    fallback_order: Vec<BackendKind>,
    availability: DashMap<BackendKind, bool>,
    active: RwLock<Option<BackendKind>>,
    /// Set while a generation call is outstanding. Observational only; it
    /// does not serialize concurrent calls.
    busy: AtomicBool,
    ai_enabled: AtomicBool,
    /// Model names reported by Ollama's /api/tags during the last probe.
    ollama_models: RwLock<Vec<String>>,
}

impl BackendSelector {
    pub fn new(config: &SelectorConfig, client: Arc<Client>) -> Self {
        let probe_timeout = Duration::from_secs(config.probe_timeout_seconds);
        let generate_timeout = Duration::from_secs(config.generate_timeout_seconds);

        let backends = BackendSet {
            ollama: Arc::new(OllamaBackend::new(
                config.ollama_url.clone(),
                config.model.clone(),
                client.clone(),
                probe_timeout,
                generate_timeout,
            )),
            tinyllm: Arc::new(ChatCompletionBackend::new(
                BackendKind::TinyLlm,
                config.tinyllm_url.clone(),
                client.clone(),
                probe_timeout,
                generate_timeout,
            )),
            tinychat: Arc::new(ChatCompletionBackend::new(
                BackendKind::TinyChat,
                config.tinychat_url.clone(),
                client,
                probe_timeout,
                generate_timeout,
            )),
        };

        let availability = DashMap::new();
        for kind in BackendKind::ALL {
            availability.insert(kind, false);
        }

        Self {
            backends,
            policy: RwLock::new(config.policy),
            fallback_order: config.fallback_order.clone(),
            availability,
            active: RwLock::new(None),
            busy: AtomicBool::new(false),
            ai_enabled: AtomicBool::new(config.ai_enabled),
            ollama_models: RwLock::new(vec![]),
        }
    }

    /// Probe every backend concurrently, record each result independently,
    /// then recompute the active backend once all three have completed.
    pub async fn probe_all(&self) {
        let (ollama, tinyllm, tinychat) = tokio::join!(
            self.backends.ollama.probe(),
            self.backends.tinyllm.probe(),
            self.backends.tinychat.probe(),
        );

        if let ProbeOutcome::Available { models } = &ollama {
            *self.ollama_models.write().expect("lock poisoned") = models.clone();
        }

        self.availability
            .insert(BackendKind::Ollama, ollama.is_available());
        self.availability
            .insert(BackendKind::TinyLlm, tinyllm.is_available());
        self.availability
            .insert(BackendKind::TinyChat, tinychat.is_available());

        self.recompute_active();

        tracing::debug!(
            ollama = ollama.is_available(),
            tinyllm = tinyllm.is_available(),
            tinychat = tinychat.is_available(),
            active = ?self.active_backend(),
            "Backend probe completed"
        );
    }

    /// Recompute the active backend from current availability and policy.
    fn recompute_active(&self) {
        let policy = *self.policy.read().expect("lock poisoned");
        let active = match policy {
            SelectionPolicy::Explicit(kind) => {
                if self.is_available(kind) {
                    Some(kind)
                } else {
                    None
                }
            }
            SelectionPolicy::PreferLocalAuto => self
                .fallback_order
                .iter()
                .copied()
                .find(|&kind| self.is_available(kind)),
        };

        *self.active.write().expect("lock poisoned") = active;
    }

    /// Last probed availability for one backend.
    pub fn is_available(&self, kind: BackendKind) -> bool {
        self.availability.get(&kind).map(|v| *v).unwrap_or(false)
    }

    /// The backend currently selected to service `generate` calls, if any.
    pub fn active_backend(&self) -> Option<BackendKind> {
        *self.active.read().expect("lock poisoned")
    }

    /// Whether a generation call is currently outstanding (UI feedback only).
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub fn ai_enabled(&self) -> bool {
        self.ai_enabled.load(Ordering::SeqCst)
    }

    pub fn set_ai_enabled(&self, enabled: bool) {
        self.ai_enabled.store(enabled, Ordering::SeqCst);
        if !enabled {
            tracing::info!("AI assistance disabled");
        }
    }

    /// Replace the selection policy and recompute the active backend against
    /// the last probed availability.
    pub fn set_policy(&self, policy: SelectionPolicy) {
        *self.policy.write().expect("lock poisoned") = policy;
        self.recompute_active();
    }

    pub fn policy(&self) -> SelectionPolicy {
        *self.policy.read().expect("lock poisoned")
    }

    /// Model names Ollama reported on the last successful probe.
    pub fn ollama_models(&self) -> Vec<String> {
        self.ollama_models.read().expect("lock poisoned").clone()
    }

    pub fn base_url(&self, kind: BackendKind) -> String {
        self.backends.get(kind).base_url().to_string()
    }

    /// Ask the active backend to generate text.
    ///
    /// Fails with [`SelectorError::NoBackendAvailable`] before any network
    /// call when AI assistance is disabled or no backend is active. Transport
    /// and decode failures are surfaced to the caller.
    pub async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, SelectorError> {
        if !self.ai_enabled() {
            return Err(SelectorError::NoBackendAvailable);
        }
        let kind = self
            .active_backend()
            .ok_or(SelectorError::NoBackendAvailable)?;

        let backend = Arc::clone(self.backends.get(kind));
        let request = GenerationRequest {
            prompt: prompt.to_string(),
            system_prompt: system_prompt.map(str::to_string),
            temperature,
            max_tokens,
        };

        let _busy = BusyGuard::set(&self.busy);
        backend.generate(&request).await
    }

    /// Ask the active backend to reorder dashboard names for the given hour.
    ///
    /// Best-effort: returns `None` when AI assistance is disabled, no backend
    /// is active, or the underlying call fails. Never raises.
    pub async fn suggest_priority(&self, names: &[String], hour_of_day: u32) -> Option<Vec<String>> {
        if !self.ai_enabled() || self.active_backend().is_none() {
            return None;
        }

        let prompt = format!(
            "Prioritize these dashboards for display at {}:00:\n{}\n\n\
             Consider: business hours, relevance, typical viewing patterns.\n\
             Return ordered list, most important first.",
            hour_of_day,
            names.join(", ")
        );

        match self
            .generate(
                &prompt,
                Some(
                    "You are a dashboard optimization expert. \
                     Return only dashboard names in priority order.",
                ),
                0.7,
                1024,
            )
            .await
        {
            Ok(response) => Some(
                response
                    .lines()
                    .map(|line| line.trim().to_string())
                    .filter(|line| !line.is_empty())
                    .collect(),
            ),
            Err(e) => {
                tracing::debug!(error = %e, "Priority suggestion failed, degrading to none");
                None
            }
        }
    }
}

/// Clears the busy flag on drop, including on error paths.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn set(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
