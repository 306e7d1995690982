// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion provider for deterministic testing.
//!
//! Replies are popped from a FIFO queue; an empty queue yields the
//! default "mock reply". Every call is captured for assertion.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use bizrelay_core::traits::adapter::{Adapter, AdapterType, HealthStatus};
use bizrelay_core::types::ChatMessage;
use bizrelay_core::{CompletionProvider, RelayError};

/// One captured completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionCall {
    pub api_key: String,
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

/// A mock completion provider with queued replies.
pub struct MockProvider {
    replies: Arc<Mutex<VecDeque<Result<String, String>>>>,
    calls: Arc<Mutex<Vec<CompletionCall>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Pre-loads successful replies, returned in order.
    pub fn with_replies(replies: Vec<String>) -> Self {
        let provider = Self::new();
        {
            let queue = provider.replies.clone();
            let mut guard = queue.try_lock().expect("fresh mutex");
            guard.extend(replies.into_iter().map(Ok));
        }
        provider
    }

    /// Queues a successful reply.
    pub async fn add_reply(&self, text: impl Into<String>) {
        self.replies.lock().await.push_back(Ok(text.into()));
    }

    /// Queues a failure; the next `complete` call errors with this message.
    pub async fn add_failure(&self, message: impl Into<String>) {
        self.replies.lock().await.push_back(Err(message.into()));
    }

    /// All captured completion requests in call order.
    pub async fn calls(&self) -> Vec<CompletionCall> {
        self.calls.lock().await.clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Adapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, RelayError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    async fn complete(
        &self,
        api_key: &str,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, RelayError> {
        self.calls.lock().await.push(CompletionCall {
            api_key: api_key.to_string(),
            model: model.to_string(),
            messages: messages.to_vec(),
        });
        match self.replies.lock().await.pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(RelayError::Provider { message, source: None }),
            None => Ok("mock reply".to_string()),
        }
    }
}
