//! WASM-target tests for fulcrum-platform (Node.js runtime).
//!
//! Tests MemoryStorage, response decoding and route watching under
//! wasm32-unknown-unknown via `wasm-pack test --node`.
//!
//! localStorage and History need a browser and are not covered here.

use wasm_bindgen_test::*;

use fulcrum_core::ports::StoragePort;
use fulcrum_platform::api::{decode_chat_reply, decode_sandbox_token, ApiClient};
use fulcrum_platform::router::RouteWatcher;
use fulcrum_platform::storage::{open_storage, MemoryStorage};
use fulcrum_types::config::{ApiConfig, StorageBackendType};
use fulcrum_types::route::Route;
use fulcrum_types::ChatError;

// ─── MemoryStorage Tests ─────────────────────────────────

#[wasm_bindgen_test]
fn memory_storage_backend_name() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.backend_name(), "memory");
}

#[wasm_bindgen_test]
async fn memory_storage_get_missing() {
    let storage = MemoryStorage::new();
    let result = storage.get("nonexistent").await.unwrap();
    assert!(result.is_none());
}

#[wasm_bindgen_test]
async fn memory_storage_overwrite() {
    let storage = MemoryStorage::new();
    storage.set("key", "v1").await.unwrap();
    storage.set("key", "v2").await.unwrap();
    assert_eq!(storage.get("key").await.unwrap().as_deref(), Some("v2"));
}

#[wasm_bindgen_test]
async fn memory_storage_delete() {
    let storage = MemoryStorage::new();
    storage.set("key", "val").await.unwrap();
    storage.delete("key").await.unwrap();
    assert!(!storage.exists("key").await.unwrap());
    storage.delete("nonexistent").await.unwrap();
}

#[wasm_bindgen_test]
fn open_storage_memory_backend() {
    let storage = open_storage(&StorageBackendType::Memory);
    assert_eq!(storage.backend_name(), "memory");
}

// ─── Chat Response Decoding ──────────────────────────────

#[wasm_bindgen_test]
fn chat_reply_ok() {
    let reply = decode_chat_reply(200, r#"{"response":"Hi there!"}"#).unwrap();
    assert_eq!(reply, "Hi there!");
}

#[wasm_bindgen_test]
fn chat_reply_missing_field_is_empty() {
    assert_eq!(decode_chat_reply(200, "{}").unwrap(), "");
    assert_eq!(decode_chat_reply(200, "not json").unwrap(), "");
}

#[wasm_bindgen_test]
fn chat_reply_error_body() {
    let err = decode_chat_reply(429, r#"{"error":"rate limited"}"#).unwrap_err();
    assert_eq!(
        err,
        ChatError::Api {
            status: 429,
            message: "rate limited".to_string(),
        }
    );
    assert_eq!(err.to_string(), "rate limited");
}

#[wasm_bindgen_test]
fn chat_reply_error_without_body() {
    let err = decode_chat_reply(502, "<html>Bad gateway</html>").unwrap_err();
    assert_eq!(err.to_string(), "Request failed: 502");
}

// ─── Sandbox Token Decoding ──────────────────────────────

#[wasm_bindgen_test]
fn sandbox_token_ok() {
    let token = decode_sandbox_token(200, r#"{"access_token":"abc"}"#).unwrap();
    assert_eq!(token, "abc");
}

#[wasm_bindgen_test]
fn sandbox_token_missing() {
    for body in ["{}", r#"{"access_token":""}"#] {
        let err = decode_sandbox_token(200, body).unwrap_err();
        assert_eq!(
            err,
            ChatError::Auth("No access_token in sandbox-token response".to_string())
        );
    }
}

#[wasm_bindgen_test]
fn sandbox_token_error_status() {
    let err = decode_sandbox_token(503, "").unwrap_err();
    assert_eq!(err.to_string(), "Failed to get sandbox token: 503");

    let err = decode_sandbox_token(401, r#"{"error":"sandbox disabled"}"#).unwrap_err();
    assert_eq!(err.to_string(), "sandbox disabled");
}

#[wasm_bindgen_test]
fn api_client_base_url() {
    let client = ApiClient::new(ApiConfig::new("https://api.example.com/"));
    assert_eq!(client.base_url(), "https://api.example.com");
}

// ─── RouteWatcher Tests ──────────────────────────────────

#[wasm_bindgen_test]
fn route_watcher_reports_changes_once() {
    let mut watcher = RouteWatcher::new("/");
    assert_eq!(watcher.observe("/"), None);
    assert_eq!(watcher.observe("/chat/abc"), Some(Route::chat("abc")));
    assert_eq!(watcher.observe("/chat/abc"), None);
    assert_eq!(watcher.observe("/"), Some(Route::Home));
}
