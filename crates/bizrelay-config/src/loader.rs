// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./bizrelay.toml` >
//! `~/.config/bizrelay/bizrelay.toml` > `/etc/bizrelay/bizrelay.toml`
//! with environment variable overrides via the `BIZRELAY_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::BizrelayConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/bizrelay/bizrelay.toml` (system-wide)
/// 3. `~/.config/bizrelay/bizrelay.toml` (user XDG config)
/// 4. `./bizrelay.toml` (local directory)
/// 5. `BIZRELAY_*` environment variables
pub fn load_config() -> Result<BizrelayConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BizrelayConfig::default()))
        .merge(Toml::file("/etc/bizrelay/bizrelay.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("bizrelay/bizrelay.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("bizrelay.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<BizrelayConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BizrelayConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<BizrelayConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BizrelayConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `BIZRELAY_TELEGRAM_BOT_TOKEN` must map
/// to `telegram.bot_token`, not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("BIZRELAY_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("telegram_", "telegram.", 1)
            .replacen("store_", "store.", 1)
            .replacen("groq_", "groq.", 1)
            .replacen("vault_", "vault.", 1)
            .replacen("relay_", "relay.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load_without_any_file() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.agent.name, "bizrelay");
        assert_eq!(config.agent.log_level, "info");
        assert_eq!(config.relay.history_window, 10);
        assert_eq!(config.telegram.poll_timeout_secs, 30);
        assert!(config.telegram.bot_token.is_none());
        assert!(config.vault.encryption_key.is_none());
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = load_config_from_str(
            r#"
            [telegram]
            bot_token = "123:abc"
            poll_timeout_secs = 10

            [relay]
            history_window = 4
            failure_reply = "Sorry, please try again later."
        "#,
        )
        .unwrap();
        assert_eq!(config.telegram.bot_token.as_deref(), Some("123:abc"));
        assert_eq!(config.telegram.poll_timeout_secs, 10);
        assert_eq!(config.relay.history_window, 4);
        assert_eq!(
            config.relay.failure_reply.as_deref(),
            Some("Sorry, please try again later.")
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = load_config_from_str(
            r#"
            [telegram]
            bot_tokne = "typo"
        "#,
        );
        assert!(result.is_err());
    }
}
