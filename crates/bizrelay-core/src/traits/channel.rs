// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound messaging channel trait.

use async_trait::async_trait;

use crate::error::RelayError;
use crate::traits::adapter::Adapter;
use crate::types::InlineKeyboard;

/// Outbound side of the messaging platform.
///
/// `delete` and `acknowledge` are best-effort at every call site: their
/// errors are logged and swallowed by callers, never propagated.
#[async_trait]
pub trait MessageChannel: Adapter {
    /// Sends a message, optionally on a business connection and with an
    /// inline menu. Returns the platform message id.
    async fn send(
        &self,
        chat_id: i64,
        text: &str,
        connection_id: Option<&str>,
        menu: Option<&InlineKeyboard>,
    ) -> Result<i64, RelayError>;

    /// Edits a previously sent message in place.
    async fn edit(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        menu: Option<&InlineKeyboard>,
    ) -> Result<(), RelayError>;

    /// Deletes a message.
    async fn delete(&self, chat_id: i64, message_id: i64) -> Result<(), RelayError>;

    /// Acknowledges a menu selection so the client stops its spinner.
    async fn acknowledge(&self, callback_id: &str) -> Result<(), RelayError>;
}
