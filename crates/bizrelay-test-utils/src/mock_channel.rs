// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock messaging channel for deterministic testing.
//!
//! Every outbound call is captured as a [`SentCall`] for assertion in
//! tests; `send` returns incrementing message ids starting at 1000.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use bizrelay_core::traits::adapter::{Adapter, AdapterType, HealthStatus};
use bizrelay_core::types::InlineKeyboard;
use bizrelay_core::{MessageChannel, RelayError};

/// One captured outbound channel call.
#[derive(Debug, Clone, PartialEq)]
pub enum SentCall {
    Send {
        chat_id: i64,
        text: String,
        connection_id: Option<String>,
        menu: Option<InlineKeyboard>,
        message_id: i64,
    },
    Edit {
        chat_id: i64,
        message_id: i64,
        text: String,
        menu: Option<InlineKeyboard>,
    },
    Delete {
        chat_id: i64,
        message_id: i64,
    },
    Acknowledge {
        callback_id: String,
    },
}

/// A mock messaging channel that records every call.
pub struct MockChannel {
    calls: Arc<Mutex<Vec<SentCall>>>,
    next_message_id: Arc<Mutex<i64>>,
    fail_edits: Arc<Mutex<bool>>,
}

impl MockChannel {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            next_message_id: Arc::new(Mutex::new(1000)),
            fail_edits: Arc::new(Mutex::new(false)),
        }
    }

    /// Makes all subsequent `edit` calls fail, e.g. to exercise the
    /// edit-else-send dashboard fallback.
    pub async fn fail_edits(&self) {
        *self.fail_edits.lock().await = true;
    }

    /// All captured calls in invocation order.
    pub async fn calls(&self) -> Vec<SentCall> {
        self.calls.lock().await.clone()
    }

    /// Only the captured `Send` calls, in order.
    pub async fn sent(&self) -> Vec<SentCall> {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|c| matches!(c, SentCall::Send { .. }))
            .cloned()
            .collect()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    pub async fn clear(&self) {
        self.calls.lock().await.clear();
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Adapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, RelayError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl MessageChannel for MockChannel {
    async fn send(
        &self,
        chat_id: i64,
        text: &str,
        connection_id: Option<&str>,
        menu: Option<&InlineKeyboard>,
    ) -> Result<i64, RelayError> {
        let mut next = self.next_message_id.lock().await;
        let message_id = *next;
        *next += 1;
        self.calls.lock().await.push(SentCall::Send {
            chat_id,
            text: text.to_string(),
            connection_id: connection_id.map(str::to_string),
            menu: menu.cloned(),
            message_id,
        });
        Ok(message_id)
    }

    async fn edit(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        menu: Option<&InlineKeyboard>,
    ) -> Result<(), RelayError> {
        if *self.fail_edits.lock().await {
            return Err(RelayError::Channel {
                message: "mock edit failure".to_string(),
                source: None,
            });
        }
        self.calls.lock().await.push(SentCall::Edit {
            chat_id,
            message_id,
            text: text.to_string(),
            menu: menu.cloned(),
        });
        Ok(())
    }

    async fn delete(&self, chat_id: i64, message_id: i64) -> Result<(), RelayError> {
        self.calls.lock().await.push(SentCall::Delete { chat_id, message_id });
        Ok(())
    }

    async fn acknowledge(&self, callback_id: &str) -> Result<(), RelayError> {
        self.calls
            .lock()
            .await
            .push(SentCall::Acknowledge { callback_id: callback_id.to_string() });
        Ok(())
    }
}
