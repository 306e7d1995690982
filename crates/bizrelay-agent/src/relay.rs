// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Business message relay pipeline.
//!
//! Resolves the owning account, assembles a bounded completion context,
//! calls the provider, persists both sides of the exchange, and sends
//! the reply back on the business channel.

use std::sync::Arc;

use bizrelay_core::types::{ChatMessage, ConversationTurn, Role, Sender};
use bizrelay_core::{CompletionProvider, MessageChannel, RecordStore, RelayError};
use bizrelay_vault::CredentialVault;
use tracing::{debug, info, warn};

use crate::locks::AccountLocks;

/// Formatting contract prepended to every completion request. The reply
/// goes straight into a Telegram sendMessage with HTML parse mode, so
/// the model must emit that dialect and nothing else.
const MASTER_HTML_PROMPT: &str = "You are a professional assistant for a Telegram Business account. \n\
CRITICAL RULE: You MUST use Telegram-compatible HTML for formatting.\n\
Supported tags: <b>bold</b>, <i>italic</i>, <u>underline</u>, <s>strikethrough</s>, <code>code</code>, <pre>preformatted</pre>, <a href=\"URL\">link</a>.\n\
Do NOT use Markdown. Ensure all tags are properly closed. For new lines, just use a normal line break.";

/// Relays inbound business messages through the completion provider.
pub struct RelayPipeline {
    store: Arc<dyn RecordStore>,
    provider: Arc<dyn CompletionProvider>,
    channel: Arc<dyn MessageChannel>,
    vault: CredentialVault,
    locks: Arc<AccountLocks>,
    history_window: u32,
    failure_reply: Option<String>,
}

impl RelayPipeline {
    pub fn new(
        store: Arc<dyn RecordStore>,
        provider: Arc<dyn CompletionProvider>,
        channel: Arc<dyn MessageChannel>,
        vault: CredentialVault,
        locks: Arc<AccountLocks>,
        history_window: u32,
        failure_reply: Option<String>,
    ) -> Self {
        Self { store, provider, channel, vault, locks, history_window, failure_reply }
    }

    /// Relays one inbound business message.
    ///
    /// An unresolvable connection or an account without a ready credential
    /// is a silent drop: the integration is simply not configured yet.
    pub async fn handle_business_message(
        &self,
        connection_id: &str,
        chat_id: i64,
        sender: Option<&Sender>,
        text: &str,
    ) -> Result<(), RelayError> {
        let Some(owner) = self.store.account_by_connection(connection_id).await? else {
            debug!(connection_id, "no account for connection, dropping");
            return Ok(());
        };
        if !owner.credential_ready() {
            debug!(user_id = owner.user_id, "credential not ready, dropping");
            return Ok(());
        }

        let display_name = sender.map(Sender::display_name).unwrap_or_else(|| "Customer".to_string());

        // Snapshot the account and persist the inbound turn under the
        // account lock, so a concurrent settings change cannot interleave.
        // The provider call happens after the lock is released.
        let (model, credential, messages) = {
            let _guard = self.locks.lock(owner.user_id).await;
            let Some(account) = self.store.account(owner.user_id).await? else {
                debug!(user_id = owner.user_id, "account vanished, dropping");
                return Ok(());
            };
            if !account.credential_ready() {
                debug!(user_id = account.user_id, "credential not ready, dropping");
                return Ok(());
            }

            self.store
                .append_turn(&ConversationTurn {
                    owner_id: account.user_id,
                    counterpart_id: chat_id,
                    counterpart_name: display_name.clone(),
                    role: Role::User,
                    content: text.to_string(),
                    created_at: None,
                })
                .await?;

            let history = self
                .store
                .recent_turns(account.user_id, chat_id, self.history_window)
                .await?;

            let mut messages = Vec::with_capacity(history.len() + 1);
            messages.push(ChatMessage::system(format!(
                "{MASTER_HTML_PROMPT}\n\nBusiness Context: {}",
                account.system_prompt
            )));
            messages.extend(history.iter().map(ChatMessage::from));

            let credential = account.credential.clone().ok_or_else(|| {
                RelayError::Internal("credential_ready implies a stored credential".to_string())
            })?;
            (account.ai_model.clone(), credential, messages)
        };

        let api_key = self.vault.decrypt(&credential)?;

        let reply = match self.provider.complete(&api_key, &model, &messages).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(
                    owner_id = owner.user_id,
                    counterpart_id = chat_id,
                    error = %e,
                    "completion failed, no assistant turn recorded"
                );
                if let Some(fallback) = &self.failure_reply {
                    if let Err(send_err) = self
                        .channel
                        .send(chat_id, fallback, Some(connection_id), None)
                        .await
                    {
                        warn!(error = %send_err, "failure reply could not be sent");
                    }
                }
                return Ok(());
            }
        };

        self.store
            .append_turn(&ConversationTurn {
                owner_id: owner.user_id,
                counterpart_id: chat_id,
                counterpart_name: display_name,
                role: Role::Assistant,
                content: reply.clone(),
                created_at: None,
            })
            .await?;
        self.channel.send(chat_id, &reply, Some(connection_id), None).await?;
        info!(
            owner_id = owner.user_id,
            counterpart_id = chat_id,
            model,
            "relayed business message"
        );
        Ok(())
    }
}
