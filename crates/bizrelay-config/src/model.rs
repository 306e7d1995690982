// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for bizrelay.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level bizrelay configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values; secrets (bot token, store key, encryption key) are required only
/// when the adapter that needs them is constructed.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BizrelayConfig {
    /// Service identity and behavior settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Telegram Bot API settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Keyed record store settings (PostgREST-style endpoint).
    #[serde(default)]
    pub store: StoreConfig,

    /// Groq chat-completions settings.
    #[serde(default)]
    pub groq: GroqConfig,

    /// Credential vault settings.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Relay pipeline settings.
    #[serde(default)]
    pub relay: RelayConfig,
}

/// Service identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the service instance.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Queue depth of each per-account worker.
    #[serde(default = "default_worker_queue")]
    pub worker_queue: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            worker_queue: default_worker_queue(),
        }
    }
}

fn default_agent_name() -> String {
    "bizrelay".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_worker_queue() -> usize {
    32
}

/// Telegram Bot API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Bot token from @BotFather.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Long-poll timeout passed to getUpdates, in seconds.
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,

    /// Per-request timeout for outbound Bot API calls, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Require Telegram Premium on private senders (Business messaging
    /// itself requires it on the account owner's side).
    #[serde(default = "default_require_premium")]
    pub require_premium: bool,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            poll_timeout_secs: default_poll_timeout(),
            request_timeout_secs: default_request_timeout(),
            require_premium: default_require_premium(),
        }
    }
}

fn default_poll_timeout() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    15
}

fn default_require_premium() -> bool {
    true
}

/// Keyed record store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Base URL of the record store REST endpoint.
    #[serde(default)]
    pub url: Option<String>,

    /// Service role key used for both apikey and bearer auth.
    #[serde(default)]
    pub service_key: Option<String>,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            service_key: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Groq chat-completions configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GroqConfig {
    /// Chat-completions endpoint URL.
    #[serde(default = "default_groq_url")]
    pub base_url: String,

    /// Per-request timeout, in seconds. Completions are slower than the
    /// other outbound calls, so this gets its own knob.
    #[serde(default = "default_completion_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            base_url: default_groq_url(),
            request_timeout_secs: default_completion_timeout(),
        }
    }
}

fn default_groq_url() -> String {
    "https://api.groq.com/openai/v1/chat/completions".to_string()
}

fn default_completion_timeout() -> u64 {
    60
}

/// Credential vault configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// Symmetric encryption key; must be exactly 32 bytes.
    #[serde(default)]
    pub encryption_key: Option<String>,
}

/// Relay pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    /// Number of most recent turns included as completion context.
    #[serde(default = "default_history_window")]
    pub history_window: u32,

    /// Message sent to the counterpart when the provider call fails.
    /// Unset means stay silent; the failure is always logged either way.
    #[serde(default)]
    pub failure_reply: Option<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            failure_reply: None,
        }
    }
}

fn default_history_window() -> u32 {
    10
}
