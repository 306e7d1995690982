// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the bizrelay workspace.
//!
//! The account record, conversation turns, menu commands, and the
//! classified inbound events all live here so the adapter crates and the
//! agent loop agree on one vocabulary.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};

use crate::error::RelayError;

/// Default model assigned to newly created accounts.
pub const DEFAULT_MODEL: &str = "openai/gpt-oss-120b";

/// Default system prompt assigned to newly created accounts.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a professional assistant.";

/// Role of a conversation turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Prompt-axis state of an account.
///
/// `Awaiting` carries the previous prompt so a cancel can restore it
/// byte-for-byte. This replaces the sentinel-prefix encoding some bots
/// use inside the prompt field itself.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "previous", rename_all = "snake_case")]
pub enum PromptState {
    #[default]
    Idle,
    Awaiting(String),
}

/// Credential-axis state of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialState {
    #[default]
    Idle,
    Awaiting,
}

/// The configured owner of a business integration.
///
/// Keyed by the platform user id; the business connection id is a
/// secondary lookup key set once the integration is attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub user_id: i64,
    #[serde(default)]
    pub username: Option<String>,
    pub language: String,
    pub ai_model: String,
    pub system_prompt: String,
    #[serde(default)]
    pub prompt_state: PromptState,
    /// Base64-encoded AES-GCM ciphertext of the provider API key.
    /// `None` means no key has been configured.
    #[serde(default)]
    pub credential: Option<String>,
    #[serde(default)]
    pub credential_state: CredentialState,
    #[serde(default)]
    pub business_connection_id: Option<String>,
    /// Id of the most recently sent dashboard message, edited in place.
    #[serde(default)]
    pub dashboard_message_id: Option<i64>,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Account {
    /// Creates an account with default language, model, and prompt.
    pub fn new(user_id: i64, username: Option<String>, is_premium: bool) -> Self {
        Self {
            user_id,
            username,
            language: "en".to_string(),
            ai_model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            prompt_state: PromptState::Idle,
            credential: None,
            credential_state: CredentialState::Idle,
            business_connection_id: None,
            dashboard_message_id: None,
            is_premium,
            created_at: None,
        }
    }

    /// True when a credential is stored and no credential input is pending,
    /// i.e. the account is ready to relay business messages.
    pub fn credential_ready(&self) -> bool {
        self.credential.is_some() && self.credential_state == CredentialState::Idle
    }

    /// True when either input axis is awaiting the next private message.
    pub fn awaiting_input(&self) -> bool {
        !matches!(self.prompt_state, PromptState::Idle)
            || self.credential_state == CredentialState::Awaiting
    }

    /// Enters the awaiting-prompt state, remembering the current prompt for
    /// restore on cancel. Any pending credential input is cancelled first so
    /// at most one axis is ever awaiting.
    pub fn begin_prompt_edit(&mut self) {
        self.credential_state = CredentialState::Idle;
        if matches!(self.prompt_state, PromptState::Idle) {
            self.prompt_state = PromptState::Awaiting(self.system_prompt.clone());
        }
    }

    /// Enters the awaiting-credential state. Any pending prompt edit is
    /// cancelled (and the prior prompt restored) first.
    pub fn begin_credential_edit(&mut self) {
        self.restore_prompt();
        self.credential_state = CredentialState::Awaiting;
    }

    /// Cancels any pending input on either axis. The prompt is restored to
    /// its pre-edit value; the stored credential is left untouched.
    pub fn cancel_pending(&mut self) {
        self.restore_prompt();
        self.credential_state = CredentialState::Idle;
    }

    /// Consumes pending prompt input: stores `text` verbatim as the new
    /// prompt and returns to idle. Returns false when no prompt edit was
    /// pending.
    pub fn apply_prompt_input(&mut self, text: &str) -> bool {
        if matches!(self.prompt_state, PromptState::Idle) {
            return false;
        }
        self.system_prompt = text.to_string();
        self.prompt_state = PromptState::Idle;
        true
    }

    fn restore_prompt(&mut self) {
        if let PromptState::Awaiting(previous) = std::mem::take(&mut self.prompt_state) {
            self.system_prompt = previous;
        }
    }
}

/// One role-tagged message in a persisted conversation between an account
/// and a counterpart. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub owner_id: i64,
    pub counterpart_id: i64,
    pub counterpart_name: String,
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// A distinct external party with persisted history under an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Counterpart {
    pub id: i64,
    pub name: String,
}

/// The sender of an inbound business message, as reported by the platform.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sender {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl Sender {
    /// Derives a display name: handle first, then first+last name, then a
    /// synthesized `User <id>` fallback. The preference order is fixed so
    /// the same sender always maps to the same name.
    pub fn display_name(&self) -> String {
        if let Some(username) = self.username.as_deref().filter(|u| !u.is_empty()) {
            return format!("@{username}");
        }
        if let Some(first) = self.first_name.as_deref().filter(|f| !f.is_empty()) {
            return match self.last_name.as_deref().filter(|l| !l.is_empty()) {
                Some(last) => format!("{first} {last}"),
                None => first.to_string(),
            };
        }
        format!("User {}", self.id)
    }
}

/// One message in a completion request, in provider wire order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".into(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".into(), content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: "assistant".into(), content: content.into() }
    }
}

impl From<&ConversationTurn> for ChatMessage {
    fn from(turn: &ConversationTurn) -> Self {
        Self {
            role: turn.role.to_string(),
            content: turn.content.clone(),
        }
    }
}

/// An inline menu attached to an outbound message.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InlineKeyboard {
    pub inline_keyboard: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one row of buttons, returning self for chaining.
    pub fn row(mut self, buttons: Vec<InlineButton>) -> Self {
        self.inline_keyboard.push(buttons);
        self
    }
}

/// One pressed-menu option: label plus the token sent back on selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineButton {
    pub text: String,
    pub callback_data: String,
}

impl InlineButton {
    pub fn new(text: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self { text: text.into(), callback_data: callback_data.into() }
    }
}

/// A menu-selection token parsed into a typed command.
///
/// Parsing happens once at the dispatch boundary; unknown or malformed
/// tokens surface as [`RelayError::UnknownCommand`] instead of silently
/// falling through a prefix-match chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuCommand {
    /// `back_main` -- show the dashboard, cancelling any pending input.
    ShowDashboard,
    /// `menu_model` -- show the model picker.
    ChooseModel,
    /// `set_model_<id>` -- select a model.
    SetModel(String),
    /// `menu_prompt` -- start editing the system prompt.
    EditPrompt,
    /// `menu_key` -- start entering a new API key.
    SetCredential,
    /// `menu_clear_list` -- list counterparts with stored history.
    ListCounterparts,
    /// `confirm_clear_<id>` -- ask for confirmation before clearing.
    ConfirmClear(i64),
    /// `exec_clear_<id>` -- clear history for one counterpart.
    ExecClear(i64),
    /// `menu_lang` -- show the language picker.
    ChooseLanguage,
    /// `set_lang_<code>` -- select a UI language.
    SetLanguage(String),
}

impl FromStr for MenuCommand {
    type Err = RelayError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "back_main" => return Ok(Self::ShowDashboard),
            "menu_model" => return Ok(Self::ChooseModel),
            "menu_prompt" => return Ok(Self::EditPrompt),
            "menu_key" => return Ok(Self::SetCredential),
            "menu_clear_list" => return Ok(Self::ListCounterparts),
            "menu_lang" => return Ok(Self::ChooseLanguage),
            _ => {}
        }
        if let Some(id) = token.strip_prefix("set_model_") {
            if id.is_empty() {
                return Err(RelayError::UnknownCommand(token.to_string()));
            }
            return Ok(Self::SetModel(id.to_string()));
        }
        if let Some(code) = token.strip_prefix("set_lang_") {
            if code.is_empty() {
                return Err(RelayError::UnknownCommand(token.to_string()));
            }
            return Ok(Self::SetLanguage(code.to_string()));
        }
        if let Some(id) = token.strip_prefix("confirm_clear_") {
            let id = id
                .parse::<i64>()
                .map_err(|_| RelayError::UnknownCommand(token.to_string()))?;
            return Ok(Self::ConfirmClear(id));
        }
        if let Some(id) = token.strip_prefix("exec_clear_") {
            let id = id
                .parse::<i64>()
                .map_err(|_| RelayError::UnknownCommand(token.to_string()))?;
            return Ok(Self::ExecClear(id));
        }
        Err(RelayError::UnknownCommand(token.to_string()))
    }
}

/// A classified inbound event, produced at the platform boundary.
///
/// Exactly one classification applies per platform update; when multiple
/// could structurally apply the priority is menu selection, then business
/// message, then private message, then connection established.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    MenuSelection {
        user_id: i64,
        callback_id: String,
        /// Message carrying the pressed menu; becomes the dashboard message.
        message_id: i64,
        token: String,
    },
    BusinessMessage {
        connection_id: String,
        chat_id: i64,
        sender: Option<Sender>,
        text: String,
    },
    PrivateMessage {
        user_id: i64,
        chat_id: i64,
        message_id: i64,
        text: String,
        username: Option<String>,
        is_premium: bool,
    },
    ConnectionEstablished {
        connection_id: String,
        user_chat_id: i64,
    },
}
