// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Groq chat-completions API.
//!
//! Each account carries its own API key, so the bearer header is set per
//! request rather than baked into the client. Failures are surfaced once;
//! retry policy belongs to the transport layer, not here.

use std::time::Duration;

use async_trait::async_trait;
use bizrelay_config::model::GroqConfig;
use bizrelay_core::traits::adapter::{Adapter, AdapterType, HealthStatus};
use bizrelay_core::types::ChatMessage;
use bizrelay_core::{CompletionProvider, RelayError};
use tracing::debug;

use crate::types::{ApiErrorResponse, CompletionRequest, CompletionResponse};

/// Groq chat-completions client implementing [`CompletionProvider`].
#[derive(Debug, Clone)]
pub struct GroqProvider {
    client: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

impl GroqProvider {
    /// Creates a provider client from config.
    pub fn new(config: &GroqConfig) -> Result<Self, RelayError> {
        let request_timeout = Duration::from_secs(config.request_timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| RelayError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { client, base_url: config.base_url.clone(), request_timeout })
    }
}

#[async_trait]
impl Adapter for GroqProvider {
    fn name(&self) -> &str {
        "groq"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, RelayError> {
        // Reachability only: an auth error still proves the endpoint is up.
        match self.client.post(&self.base_url).json(&serde_json::json!({})).send().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!("endpoint unreachable: {e}"))),
        }
    }
}

#[async_trait]
impl CompletionProvider for GroqProvider {
    async fn complete(
        &self,
        api_key: &str,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, RelayError> {
        let request = CompletionRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
        };

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RelayError::Timeout { duration: self.request_timeout }
                } else {
                    RelayError::Provider {
                        message: format!("HTTP request failed: {e}"),
                        source: Some(Box::new(e)),
                    }
                }
            })?;

        let status = response.status();
        debug!(status = %status, model, "completion response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!("Groq API error ({status}): {}", api_err.error.message),
                Err(_) => format!("Groq API returned {status}: {body}"),
            };
            return Err(RelayError::Provider { message, source: None });
        }

        let completion: CompletionResponse =
            response.json().await.map_err(|e| RelayError::Provider {
                message: format!("failed to parse completion response: {e}"),
                source: Some(Box::new(e)),
            })?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| RelayError::Provider {
                message: "completion response contained no choices".into(),
                source: None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> GroqProvider {
        GroqProvider::new(&GroqConfig {
            base_url: format!("{}/openai/v1/chat/completions", server.uri()),
            request_timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn complete_sends_bearer_key_and_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/openai/v1/chat/completions"))
            .and(header("authorization", "Bearer gsk_test"))
            .and(body_partial_json(serde_json::json!({
                "model": "m1",
                "messages": [
                    {"role": "system", "content": "be helpful"},
                    {"role": "user", "content": "hi"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "hello there"}}]
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let messages = vec![ChatMessage::system("be helpful"), ChatMessage::user("hi")];
        let reply = provider.complete("gsk_test", "m1", &messages).await.unwrap();
        assert_eq!(reply, "hello there");
    }

    #[tokio::test]
    async fn api_error_body_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"message": "Invalid API Key", "type": "invalid_request_error"}
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let err = provider
            .complete("gsk_bad", "m1", &[ChatMessage::user("hi")])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid API Key"));
    }

    #[tokio::test]
    async fn timeout_error_carries_configured_duration() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"choices": []}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let provider = GroqProvider::new(&GroqConfig {
            base_url: format!("{}/openai/v1/chat/completions", server.uri()),
            request_timeout_secs: 1,
        })
        .unwrap();
        let err = provider
            .complete("gsk_test", "m1", &[ChatMessage::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RelayError::Timeout { duration } if duration == Duration::from_secs(1)
        ));
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let err = provider
            .complete("gsk_test", "m1", &[ChatMessage::user("hi")])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }
}
