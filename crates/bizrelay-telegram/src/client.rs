// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Telegram Bot API.
//!
//! Outbound messages are sent with `parse_mode: HTML`; callers are
//! responsible for escaping user-authored text before it reaches markup.

use std::time::Duration;

use async_trait::async_trait;
use bizrelay_config::model::TelegramConfig;
use bizrelay_core::traits::adapter::{Adapter, AdapterType, HealthStatus};
use bizrelay_core::types::InlineKeyboard;
use bizrelay_core::{MessageChannel, RelayError};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::types::{ApiResponse, BotIdentity, SentMessage, Update};

/// Telegram Bot API client implementing [`MessageChannel`].
#[derive(Debug, Clone)]
pub struct TelegramChannel {
    client: reqwest::Client,
    /// Separate client for getUpdates: its timeout must outlast the long poll.
    poll_client: reqwest::Client,
    base_url: String,
    poll_timeout_secs: u64,
}

impl TelegramChannel {
    /// Creates a channel client from config.
    ///
    /// Requires `telegram.bot_token` to be set and non-empty.
    pub fn new(config: &TelegramConfig) -> Result<Self, RelayError> {
        let token = config
            .bot_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| RelayError::Config("telegram.bot_token is required".into()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| RelayError::Channel {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        let poll_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.poll_timeout_secs + 10))
            .build()
            .map_err(|e| RelayError::Channel {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            poll_client,
            base_url: format!("https://api.telegram.org/bot{token}"),
            poll_timeout_secs: config.poll_timeout_secs,
        })
    }

    /// Overrides the base URL (for testing with a mock server).
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Fetches the next batch of updates at `offset`, blocking up to the
    /// configured long-poll timeout.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, RelayError> {
        let response = self
            .poll_client
            .get(format!("{}/getUpdates", self.base_url))
            .query(&[("offset", offset.to_string()), ("timeout", self.poll_timeout_secs.to_string())])
            .send()
            .await
            .map_err(|e| RelayError::Channel {
                message: format!("getUpdates failed: {e}"),
                source: Some(Box::new(e)),
            })?;
        let envelope: ApiResponse<Vec<Update>> =
            response.json().await.map_err(|e| RelayError::Channel {
                message: format!("failed to parse getUpdates response: {e}"),
                source: Some(Box::new(e)),
            })?;
        if !envelope.ok {
            return Err(RelayError::Channel {
                message: format!(
                    "getUpdates rejected: {}",
                    envelope.description.unwrap_or_default()
                ),
                source: None,
            });
        }
        Ok(envelope.result.unwrap_or_default())
    }

    async fn call<T: DeserializeOwned>(
        &self,
        api_method: &str,
        payload: serde_json::Value,
    ) -> Result<T, RelayError> {
        let response = self
            .client
            .post(format!("{}/{api_method}", self.base_url))
            .json(&payload)
            .send()
            .await
            .map_err(|e| RelayError::Channel {
                message: format!("{api_method} failed: {e}"),
                source: Some(Box::new(e)),
            })?;
        let envelope: ApiResponse<T> =
            response.json().await.map_err(|e| RelayError::Channel {
                message: format!("failed to parse {api_method} response: {e}"),
                source: Some(Box::new(e)),
            })?;
        if !envelope.ok {
            return Err(RelayError::Channel {
                message: format!(
                    "{api_method} rejected: {}",
                    envelope.description.unwrap_or_default()
                ),
                source: None,
            });
        }
        envelope.result.ok_or_else(|| RelayError::Channel {
            message: format!("{api_method} returned ok without a result"),
            source: None,
        })
    }
}

#[async_trait]
impl Adapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, RelayError> {
        match self.call::<BotIdentity>("getMe", serde_json::json!({})).await {
            Ok(identity) => {
                debug!(bot_id = identity.id, "getMe succeeded");
                Ok(HealthStatus::Healthy)
            }
            Err(e) => Ok(HealthStatus::Unhealthy(format!("Telegram bot unreachable: {e}"))),
        }
    }
}

#[async_trait]
impl MessageChannel for TelegramChannel {
    async fn send(
        &self,
        chat_id: i64,
        text: &str,
        connection_id: Option<&str>,
        menu: Option<&InlineKeyboard>,
    ) -> Result<i64, RelayError> {
        let mut payload = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
        });
        if let Some(connection_id) = connection_id {
            payload["business_connection_id"] = serde_json::json!(connection_id);
        }
        if let Some(menu) = menu {
            payload["reply_markup"] = serde_json::to_value(menu)
                .map_err(|e| RelayError::Internal(format!("menu serialization failed: {e}")))?;
        }
        let sent: SentMessage = self.call("sendMessage", payload).await?;
        Ok(sent.message_id)
    }

    async fn edit(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        menu: Option<&InlineKeyboard>,
    ) -> Result<(), RelayError> {
        let mut payload = serde_json::json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "text": text,
            "parse_mode": "HTML",
        });
        if let Some(menu) = menu {
            payload["reply_markup"] = serde_json::to_value(menu)
                .map_err(|e| RelayError::Internal(format!("menu serialization failed: {e}")))?;
        }
        // editMessageText returns the edited message (or `true` for inline
        // messages); the payload is irrelevant here.
        self.call::<serde_json::Value>("editMessageText", payload).await?;
        Ok(())
    }

    async fn delete(&self, chat_id: i64, message_id: i64) -> Result<(), RelayError> {
        self.call::<serde_json::Value>(
            "deleteMessage",
            serde_json::json!({"chat_id": chat_id, "message_id": message_id}),
        )
        .await?;
        Ok(())
    }

    async fn acknowledge(&self, callback_id: &str) -> Result<(), RelayError> {
        self.call::<serde_json::Value>(
            "answerCallbackQuery",
            serde_json::json!({"callback_query_id": callback_id}),
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizrelay_core::types::InlineButton;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn channel_for(server: &MockServer) -> TelegramChannel {
        TelegramChannel::new(&TelegramConfig {
            bot_token: Some("123:abc".into()),
            poll_timeout_secs: 1,
            request_timeout_secs: 5,
            require_premium: true,
        })
        .unwrap()
        .with_base_url(server.uri())
    }

    #[test]
    fn new_requires_bot_token() {
        assert!(TelegramChannel::new(&TelegramConfig::default()).is_err());
        assert!(TelegramChannel::new(&TelegramConfig {
            bot_token: Some(String::new()),
            ..Default::default()
        })
        .is_err());
    }

    #[tokio::test]
    async fn send_posts_html_with_connection_and_menu() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sendMessage"))
            .and(body_partial_json(serde_json::json!({
                "chat_id": 700,
                "text": "reply",
                "parse_mode": "HTML",
                "business_connection_id": "conn-1",
                "reply_markup": {"inline_keyboard": [[{"text": "Back", "callback_data": "back_main"}]]}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"ok": true, "result": {"message_id": 55}}),
            ))
            .mount(&server)
            .await;

        let channel = channel_for(&server);
        let menu = InlineKeyboard::new().row(vec![InlineButton::new("Back", "back_main")]);
        let id = channel.send(700, "reply", Some("conn-1"), Some(&menu)).await.unwrap();
        assert_eq!(id, 55);
    }

    #[tokio::test]
    async fn rejected_call_surfaces_description() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/deleteMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"ok": false, "description": "message to delete not found"}),
            ))
            .mount(&server)
            .await;

        let channel = channel_for(&server);
        let err = channel.delete(42, 9).await.unwrap_err();
        assert!(err.to_string().contains("message to delete not found"));
    }

    #[tokio::test]
    async fn get_updates_passes_offset_and_parses_batch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/getUpdates"))
            .and(query_param("offset", "101"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": [
                    {"update_id": 101, "message": {"message_id": 1, "from": {"id": 42}, "chat": {"id": 42}, "text": "hi"}},
                    {"update_id": 102}
                ]
            })))
            .mount(&server)
            .await;

        let channel = channel_for(&server);
        let updates = channel.get_updates(101).await.unwrap();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].update_id, 101);
    }

    #[tokio::test]
    async fn acknowledge_posts_callback_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/answerCallbackQuery"))
            .and(body_partial_json(serde_json::json!({"callback_query_id": "cb-1"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"ok": true, "result": true})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let channel = channel_for(&server);
        channel.acknowledge("cb-1").await.unwrap();
    }
}
