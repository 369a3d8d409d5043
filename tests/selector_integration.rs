//! Integration tests for the backend selector with mock HTTP servers.

use carousel::config::SelectorConfig;
use carousel::selector::{BackendKind, BackendSelector, SelectionPolicy, SelectorError};
use reqwest::Client;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Base URL that reliably refuses connections.
const DEAD_URL: &str = "http://127.0.0.1:1";

fn selector(config: SelectorConfig) -> BackendSelector {
    BackendSelector::new(&config, Arc::new(Client::new()))
}

fn config_with_urls(ollama: &str, tinyllm: &str, tinychat: &str) -> SelectorConfig {
    SelectorConfig {
        ollama_url: ollama.to_string(),
        tinyllm_url: tinyllm.to_string(),
        tinychat_url: tinychat.to_string(),
        probe_timeout_seconds: 2,
        generate_timeout_seconds: 5,
        ..SelectorConfig::default()
    }
}

async fn mock_ollama_tags(server: &MockServer, models: &[&str]) {
    let models: Vec<_> = models
        .iter()
        .map(|name| serde_json::json!({ "name": name }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "models": models
        })))
        .mount(server)
        .await;
}

async fn mock_chat_root(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_probe_selects_local_first_under_auto() {
    let ollama = MockServer::start().await;
    mock_ollama_tags(&ollama, &["llama3.2", "mistral:7b"]).await;
    let tinychat = MockServer::start().await;
    mock_chat_root(&tinychat).await;

    let selector = selector(config_with_urls(&ollama.uri(), DEAD_URL, &tinychat.uri()));
    selector.probe_all().await;

    assert!(selector.is_available(BackendKind::Ollama));
    assert!(!selector.is_available(BackendKind::TinyLlm));
    assert!(selector.is_available(BackendKind::TinyChat));
    assert_eq!(selector.active_backend(), Some(BackendKind::Ollama));
    assert_eq!(selector.ollama_models(), vec!["llama3.2", "mistral:7b"]);
}

#[tokio::test]
async fn test_probe_falls_back_when_local_down() {
    // Fallback order [ollama, tinychat, tinyllm]: with only tinychat up,
    // selection yields tinychat, not none, not tinyllm.
    let tinychat = MockServer::start().await;
    mock_chat_root(&tinychat).await;

    let selector = selector(config_with_urls(DEAD_URL, DEAD_URL, &tinychat.uri()));
    selector.probe_all().await;

    assert_eq!(selector.active_backend(), Some(BackendKind::TinyChat));
}

#[tokio::test]
async fn test_probe_third_priority_when_others_down() {
    let tinyllm = MockServer::start().await;
    mock_chat_root(&tinyllm).await;

    let selector = selector(config_with_urls(DEAD_URL, &tinyllm.uri(), DEAD_URL));
    selector.probe_all().await;

    assert_eq!(selector.active_backend(), Some(BackendKind::TinyLlm));
}

#[tokio::test]
async fn test_probe_all_unavailable_yields_none() {
    let selector = selector(config_with_urls(DEAD_URL, DEAD_URL, DEAD_URL));
    selector.probe_all().await;

    assert_eq!(selector.active_backend(), None);
}

#[tokio::test]
async fn test_probe_non_success_status_is_unavailable() {
    let tinychat = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&tinychat)
        .await;

    let selector = selector(config_with_urls(DEAD_URL, DEAD_URL, &tinychat.uri()));
    selector.probe_all().await;

    assert!(!selector.is_available(BackendKind::TinyChat));
    assert_eq!(selector.active_backend(), None);
}

#[tokio::test]
async fn test_explicit_policy_ignores_other_backends() {
    let ollama = MockServer::start().await;
    mock_ollama_tags(&ollama, &["llama3.2"]).await;

    let mut config = config_with_urls(&ollama.uri(), DEAD_URL, DEAD_URL);
    config.policy = SelectionPolicy::Explicit(BackendKind::TinyChat);

    let selector = selector(config);
    selector.probe_all().await;

    // Ollama being up must not matter under explicit(tinychat).
    assert_eq!(selector.active_backend(), None);
}

#[tokio::test]
async fn test_generate_no_backend_makes_no_network_call() {
    // Mount a server that must never be hit.
    let ollama = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ollama)
        .await;

    let selector = selector(config_with_urls(&ollama.uri(), DEAD_URL, DEAD_URL));
    // No probe: availability is stale-false, so no backend is active.
    let result = selector.generate("hello", None, 0.7, 16).await;

    assert!(matches!(result, Err(SelectorError::NoBackendAvailable)));
}

#[tokio::test]
async fn test_generate_via_ollama_schema() {
    let ollama = MockServer::start().await;
    mock_ollama_tags(&ollama, &["llama3.2"]).await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(serde_json::json!({
            "model": "llama3.2",
            "prompt": "hello",
            "stream": false,
            "system": "be brief",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": "world"
        })))
        .expect(1)
        .mount(&ollama)
        .await;

    let selector = selector(config_with_urls(&ollama.uri(), DEAD_URL, DEAD_URL));
    selector.probe_all().await;

    let text = selector
        .generate("hello", Some("be brief"), 0.7, 64)
        .await
        .unwrap();
    assert_eq!(text, "world");
    assert!(!selector.is_busy());
}

#[tokio::test]
async fn test_generate_via_chat_completion_schema() {
    let tinychat = MockServer::start().await;
    mock_chat_root(&tinychat).await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(serde_json::json!({
            "messages": [
                { "role": "system", "content": "be brief" },
                { "role": "user", "content": "hello" }
            ],
            "max_tokens": 64,
            "stream": false,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [ { "message": { "content": "world" } } ]
        })))
        .expect(1)
        .mount(&tinychat)
        .await;

    let selector = selector(config_with_urls(DEAD_URL, DEAD_URL, &tinychat.uri()));
    selector.probe_all().await;
    assert_eq!(selector.active_backend(), Some(BackendKind::TinyChat));

    let text = selector
        .generate("hello", Some("be brief"), 0.7, 64)
        .await
        .unwrap();
    assert_eq!(text, "world");
}

#[tokio::test]
async fn test_generate_upstream_error_is_surfaced() {
    let tinychat = MockServer::start().await;
    mock_chat_root(&tinychat).await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&tinychat)
        .await;

    let selector = selector(config_with_urls(DEAD_URL, DEAD_URL, &tinychat.uri()));
    selector.probe_all().await;

    let result = selector.generate("hello", None, 0.7, 16).await;
    match result {
        Err(SelectorError::Upstream { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected upstream error, got {:?}", other.map(|_| ())),
    }
    // Busy flag clears on the error path too.
    assert!(!selector.is_busy());
}

#[tokio::test]
async fn test_generate_malformed_response_is_invalid_response() {
    let ollama = MockServer::start().await;
    mock_ollama_tags(&ollama, &[]).await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&ollama)
        .await;

    let selector = selector(config_with_urls(&ollama.uri(), DEAD_URL, DEAD_URL));
    selector.probe_all().await;

    let result = selector.generate("hello", None, 0.7, 16).await;
    assert!(matches!(result, Err(SelectorError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_suggest_priority_parses_lines() {
    let ollama = MockServer::start().await;
    mock_ollama_tags(&ollama, &["llama3.2"]).await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": "sales\n\nops\n  \nsupport\n"
        })))
        .mount(&ollama)
        .await;

    let selector = selector(config_with_urls(&ollama.uri(), DEAD_URL, DEAD_URL));
    selector.probe_all().await;

    let names = vec!["ops".to_string(), "sales".to_string(), "support".to_string()];
    let suggested = selector.suggest_priority(&names, 14).await.unwrap();
    assert_eq!(suggested, vec!["sales", "ops", "support"]);
}

#[tokio::test]
async fn test_suggest_priority_degrades_to_none_on_failure() {
    let ollama = MockServer::start().await;
    mock_ollama_tags(&ollama, &[]).await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&ollama)
        .await;

    let selector = selector(config_with_urls(&ollama.uri(), DEAD_URL, DEAD_URL));
    selector.probe_all().await;

    let names = vec!["ops".to_string()];
    assert_eq!(selector.suggest_priority(&names, 14).await, None);
}

#[tokio::test]
async fn test_reprobe_recovers_backend() {
    let tinychat = MockServer::start().await;
    let unavailable_guard = Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount_as_scoped(&tinychat)
        .await;

    let selector = selector(config_with_urls(DEAD_URL, DEAD_URL, &tinychat.uri()));
    selector.probe_all().await;
    assert_eq!(selector.active_backend(), None);

    // Availability is never inferred between probes; only a new probe pass
    // observes the recovery.
    drop(unavailable_guard);
    mock_chat_root(&tinychat).await;
    selector.probe_all().await;
    assert_eq!(selector.active_backend(), Some(BackendKind::TinyChat));
}
