// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-account dialog state machine.
//!
//! Interprets private messages and menu selections against the account's
//! pending-input state and drives all account-setting mutations. Every
//! read-modify-upsert runs under the account's keyed lock.

use std::sync::Arc;

use bizrelay_core::types::{Account, CredentialState, MenuCommand, PromptState};
use bizrelay_core::{MessageChannel, RecordStore, RelayError};
use bizrelay_vault::CredentialVault;
use tracing::{debug, info, warn};

use crate::dashboard;
use crate::i18n::Bundle;
use crate::locks::AccountLocks;

/// Required prefix of a Groq API key.
const CREDENTIAL_PREFIX: &str = "gsk_";

/// Handles private messages, menu selections, and connection events.
pub struct Dialog {
    store: Arc<dyn RecordStore>,
    channel: Arc<dyn MessageChannel>,
    vault: CredentialVault,
    i18n: Arc<Bundle>,
    locks: Arc<AccountLocks>,
    require_premium: bool,
}

impl Dialog {
    pub fn new(
        store: Arc<dyn RecordStore>,
        channel: Arc<dyn MessageChannel>,
        vault: CredentialVault,
        i18n: Arc<Bundle>,
        locks: Arc<AccountLocks>,
        require_premium: bool,
    ) -> Self {
        Self { store, channel, vault, i18n, locks, require_premium }
    }

    /// Handles a private text message: commands, pending prompt input,
    /// pending credential input, or nothing.
    #[allow(clippy::too_many_arguments)]
    pub async fn handle_private_message(
        &self,
        user_id: i64,
        chat_id: i64,
        message_id: i64,
        text: &str,
        username: Option<&str>,
        is_premium: bool,
    ) -> Result<(), RelayError> {
        let _guard = self.locks.lock(user_id).await;

        let mut account = match self.store.account(user_id).await? {
            Some(account) => account,
            None => {
                let account =
                    Account::new(user_id, username.map(str::to_string), is_premium);
                self.store.upsert_account(&account).await?;
                info!(user_id, "created account on first contact");
                account
            }
        };

        if self.require_premium && !is_premium {
            self.channel
                .send(chat_id, self.i18n.get("en", "access_denied"), None, None)
                .await?;
            return Ok(());
        }

        match text {
            "/start" => {
                let (text, menu) = dashboard::welcome(&account.language, &self.i18n);
                self.channel.send(chat_id, &text, None, Some(&menu)).await?;
                Ok(())
            }
            "/settings" => self.send_fresh_dashboard(chat_id, &mut account).await,
            _ if matches!(account.prompt_state, PromptState::Awaiting(_)) => {
                account.apply_prompt_input(text);
                self.store.upsert_account(&account).await?;
                self.delete_best_effort(chat_id, message_id).await;
                let banner = self.i18n.get(&account.language, "prompt_updated").to_string();
                self.refresh_dashboard(chat_id, &mut account, Some(&banner)).await
            }
            _ if account.credential_state == CredentialState::Awaiting => {
                self.delete_best_effort(chat_id, message_id).await;
                self.consume_credential_input(chat_id, &mut account, text).await
            }
            _ => {
                debug!(user_id, "private text with no pending input, ignoring");
                Ok(())
            }
        }
    }

    async fn consume_credential_input(
        &self,
        chat_id: i64,
        account: &mut Account,
        text: &str,
    ) -> Result<(), RelayError> {
        let lang = account.language.clone();
        if !text.starts_with(CREDENTIAL_PREFIX) {
            // Invalid input clears the field; the bad text is never stored.
            account.credential = None;
            account.cancel_pending();
            self.store.upsert_account(account).await?;
            let banner = self.i18n.get(&lang, "key_invalid").to_string();
            return self.refresh_dashboard(chat_id, account, Some(&banner)).await;
        }

        let sealed = self.vault.encrypt(text)?;
        account.credential = Some(sealed);
        account.cancel_pending();
        self.store.upsert_account(account).await?;
        info!(user_id = account.user_id, "credential updated");
        let banner = self.i18n.get(&lang, "key_success").to_string();
        self.refresh_dashboard(chat_id, account, Some(&banner)).await
    }

    /// Handles a pressed menu button. Unknown tokens are logged and
    /// dropped; each recognized command performs at most one upsert and
    /// one outbound edit/send.
    pub async fn handle_menu_selection(
        &self,
        user_id: i64,
        callback_id: &str,
        message_id: i64,
        token: &str,
    ) -> Result<(), RelayError> {
        if let Err(e) = self.channel.acknowledge(callback_id).await {
            debug!(error = %e, "acknowledge failed, continuing");
        }

        let _guard = self.locks.lock(user_id).await;
        let Some(mut account) = self.store.account(user_id).await? else {
            debug!(user_id, "menu selection from unknown account, dropping");
            return Ok(());
        };

        // The message carrying the pressed menu becomes the dashboard.
        let id_changed = account.dashboard_message_id != Some(message_id);
        account.dashboard_message_id = Some(message_id);
        let lang = account.language.clone();

        let command = match token.parse::<MenuCommand>() {
            Ok(command) => command,
            Err(e) => {
                warn!(user_id, token, error = %e, "unknown menu token, dropping");
                return Ok(());
            }
        };

        match command {
            MenuCommand::ShowDashboard => {
                account.cancel_pending();
                self.store.upsert_account(&account).await?;
                self.refresh_dashboard(user_id, &mut account, None).await
            }
            MenuCommand::ChooseModel => {
                if id_changed {
                    self.store.upsert_account(&account).await?;
                }
                let (text, menu) = dashboard::model_menu(&lang, &self.i18n);
                self.channel.edit(user_id, message_id, &text, Some(&menu)).await
            }
            MenuCommand::SetModel(model) => {
                account.ai_model = model;
                self.store.upsert_account(&account).await?;
                self.refresh_dashboard(user_id, &mut account, None).await
            }
            MenuCommand::EditPrompt => {
                account.begin_prompt_edit();
                self.store.upsert_account(&account).await?;
                let (text, menu) = dashboard::input_menu("prompt_input", &lang, &self.i18n);
                self.channel.edit(user_id, message_id, &text, Some(&menu)).await
            }
            MenuCommand::SetCredential => {
                account.begin_credential_edit();
                self.store.upsert_account(&account).await?;
                let (text, menu) = dashboard::input_menu("key_input", &lang, &self.i18n);
                self.channel.edit(user_id, message_id, &text, Some(&menu)).await
            }
            MenuCommand::ListCounterparts => {
                if id_changed {
                    self.store.upsert_account(&account).await?;
                }
                let counterparts = self.store.distinct_counterparts(user_id).await?;
                let (text, menu) =
                    dashboard::counterpart_menu(&counterparts, &lang, &self.i18n);
                self.channel.edit(user_id, message_id, &text, Some(&menu)).await
            }
            MenuCommand::ConfirmClear(counterpart_id) => {
                if id_changed {
                    self.store.upsert_account(&account).await?;
                }
                let (text, menu) =
                    dashboard::confirm_clear_menu(counterpart_id, &lang, &self.i18n);
                self.channel.edit(user_id, message_id, &text, Some(&menu)).await
            }
            MenuCommand::ExecClear(counterpart_id) => {
                if id_changed {
                    self.store.upsert_account(&account).await?;
                }
                self.store.delete_turns(user_id, counterpart_id).await?;
                info!(user_id, counterpart_id, "history cleared");
                let (text, menu) = dashboard::cleared_menu(&lang, &self.i18n);
                self.channel.edit(user_id, message_id, &text, Some(&menu)).await
            }
            MenuCommand::ChooseLanguage => {
                if id_changed {
                    self.store.upsert_account(&account).await?;
                }
                let (text, menu) = dashboard::language_menu(&lang, &self.i18n);
                self.channel.edit(user_id, message_id, &text, Some(&menu)).await
            }
            MenuCommand::SetLanguage(code) => {
                account.language = code;
                self.store.upsert_account(&account).await?;
                self.refresh_dashboard(user_id, &mut account, None).await
            }
        }
    }

    /// Links a business connection onto the account of the connecting
    /// user. No account yet means the event is dropped; accounts are only
    /// created from private contact.
    pub async fn handle_connection_established(
        &self,
        connection_id: &str,
        user_chat_id: i64,
    ) -> Result<(), RelayError> {
        let _guard = self.locks.lock(user_chat_id).await;
        let Some(mut account) = self.store.account(user_chat_id).await? else {
            debug!(user_chat_id, "connection from unknown account, dropping");
            return Ok(());
        };
        account.business_connection_id = Some(connection_id.to_string());
        self.store.upsert_account(&account).await?;
        info!(user_id = user_chat_id, connection_id, "business connection linked");
        Ok(())
    }

    /// `/settings`: replace the old dashboard with a fresh message.
    async fn send_fresh_dashboard(
        &self,
        chat_id: i64,
        account: &mut Account,
    ) -> Result<(), RelayError> {
        if let Some(old_id) = account.dashboard_message_id {
            self.delete_best_effort(chat_id, old_id).await;
        }
        let (text, menu) = dashboard::render(account, None, &self.i18n);
        let message_id = self.channel.send(chat_id, &text, None, Some(&menu)).await?;
        account.dashboard_message_id = Some(message_id);
        self.store.upsert_account(account).await
    }

    /// Edits the dashboard in place, falling back to a fresh send when
    /// there is no known dashboard message or the edit fails.
    async fn refresh_dashboard(
        &self,
        chat_id: i64,
        account: &mut Account,
        banner: Option<&str>,
    ) -> Result<(), RelayError> {
        let (text, menu) = dashboard::render(account, banner, &self.i18n);
        if let Some(message_id) = account.dashboard_message_id {
            match self.channel.edit(chat_id, message_id, &text, Some(&menu)).await {
                Ok(()) => return Ok(()),
                Err(e) => debug!(error = %e, "dashboard edit failed, sending fresh"),
            }
        }
        let message_id = self.channel.send(chat_id, &text, None, Some(&menu)).await?;
        account.dashboard_message_id = Some(message_id);
        self.store.upsert_account(account).await
    }

    async fn delete_best_effort(&self, chat_id: i64, message_id: i64) {
        if let Err(e) = self.channel.delete(chat_id, message_id).await {
            debug!(chat_id, message_id, error = %e, "delete failed, ignoring");
        }
    }
}
