//! Backend HTTP API: `/api/chat` and `/api/sandbox-token`.
//!
//! Decoding is kept apart from transport so status and body handling can be
//! exercised without a network.

pub mod client;

pub use client::ApiClient;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use fulcrum_types::{ChatError, Result};

pub const CHAT_PATH: &str = "/api/chat";
pub const SANDBOX_TOKEN_PATH: &str = "/api/sandbox-token";

#[derive(Debug, Serialize)]
pub struct ChatRequestBody<'a> {
    pub message: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ChatResponseBody {
    #[serde(default)]
    response: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TokenResponseBody {
    #[serde(default)]
    access_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Unparseable bodies read as `{}`.
fn lenient<T: DeserializeOwned + Default>(body: &str) -> T {
    serde_json::from_str(body).unwrap_or_default()
}

fn api_error(status: u16, body: &str, fallback: String) -> ChatError {
    let message = lenient::<ErrorBody>(body).error.unwrap_or(fallback);
    ChatError::Api { status, message }
}

/// Reply text of a `/api/chat` response. A missing `response` field is "".
pub fn decode_chat_reply(status: u16, body: &str) -> Result<String> {
    if !is_success(status) {
        return Err(api_error(status, body, format!("Request failed: {}", status)));
    }
    Ok(lenient::<ChatResponseBody>(body).response.unwrap_or_default())
}

/// Bearer token out of a `/api/sandbox-token` response.
pub fn decode_sandbox_token(status: u16, body: &str) -> Result<String> {
    if !is_success(status) {
        return Err(api_error(
            status,
            body,
            format!("Failed to get sandbox token: {}", status),
        ));
    }
    lenient::<TokenResponseBody>(body)
        .access_token
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ChatError::Auth("No access_token in sandbox-token response".to_string()))
}
