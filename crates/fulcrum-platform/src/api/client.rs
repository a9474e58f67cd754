//! fetch()-backed client via gloo-net.

use async_trait::async_trait;
use gloo_net::http::{Request, Response};

use fulcrum_core::ports::{CompletionPort, TokenPort};
use fulcrum_types::{config::ApiConfig, ChatError, Result};
use super::{decode_chat_reply, decode_sandbox_token, ChatRequestBody, CHAT_PATH, SANDBOX_TOKEN_PATH};

/// Talks to the chat backend. Stateless: the caller supplies the token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }
}

/// Status plus raw body; a body that cannot be read counts as empty.
async fn read(response: Response) -> (u16, String) {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    (status, body)
}

#[async_trait(?Send)]
impl CompletionPort for ApiClient {
    async fn send_message(&self, message: &str, token: Option<&str>) -> Result<String> {
        let url = self.config.endpoint(CHAT_PATH);

        let mut request = Request::post(&url).header("Content-Type", "application/json");
        if let Some(token) = token {
            request = request.header("Authorization", &format!("Bearer {}", token));
        }

        let response = request
            .json(&ChatRequestBody { message })
            .map_err(|e| ChatError::Serialization(e.to_string()))?
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        let (status, body) = read(response).await;
        log::debug!("POST {} -> {}", url, status);
        decode_chat_reply(status, &body)
    }
}

#[async_trait(?Send)]
impl TokenPort for ApiClient {
    async fn fetch_token(&self) -> Result<String> {
        let url = self.config.endpoint(SANDBOX_TOKEN_PATH);

        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        let (status, body) = read(response).await;
        log::debug!("GET {} -> {}", url, status);
        decode_sandbox_token(status, &body)
    }
}
