// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes. Collects every error instead of failing fast.

use crate::diagnostic::ConfigError;
use crate::model::BizrelayConfig;

/// Byte length the vault encryption key must have (AES-256).
pub const ENCRYPTION_KEY_LEN: usize = 32;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &BizrelayConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "agent.log_level must be one of {LOG_LEVELS:?}, got `{}`",
                config.agent.log_level
            ),
        });
    }

    if config.agent.worker_queue == 0 {
        errors.push(ConfigError::Validation {
            message: "agent.worker_queue must be at least 1".to_string(),
        });
    }

    // The key-length precondition is checked once here at startup, not per
    // encrypt/decrypt call.
    if let Some(key) = &config.vault.encryption_key
        && key.len() != ENCRYPTION_KEY_LEN
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.encryption_key must be exactly {ENCRYPTION_KEY_LEN} bytes, got {}",
                key.len()
            ),
        });
    }

    if config.relay.history_window == 0 {
        errors.push(ConfigError::Validation {
            message: "relay.history_window must be at least 1".to_string(),
        });
    }

    if config.telegram.poll_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "telegram.poll_timeout_secs must be at least 1".to_string(),
        });
    }

    if let Some(url) = &config.store.url
        && !url.starts_with("http://")
        && !url.starts_with("https://")
    {
        errors.push(ConfigError::Validation {
            message: format!("store.url must be an http(s) URL, got `{url}`"),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
