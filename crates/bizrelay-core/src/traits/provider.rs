// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion provider trait.

use async_trait::async_trait;

use crate::error::RelayError;
use crate::traits::adapter::Adapter;
use crate::types::ChatMessage;

/// A chat-completion endpoint.
///
/// Each account supplies its own API key, so the key travels with the call
/// rather than living in the adapter.
#[async_trait]
pub trait CompletionProvider: Adapter {
    /// Sends the ordered message list to `model` and returns one generated
    /// reply. A timeout or non-success response is an error; the call is
    /// never retried here.
    async fn complete(
        &self,
        api_key: &str,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, RelayError>;
}
