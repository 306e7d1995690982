// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for bizrelay.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and environment
//! variable overrides.
//!
//! # Usage
//!
//! ```no_run
//! use bizrelay_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("history window: {}", config.relay.history_window);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::BizrelayConfig;

/// Load configuration from the XDG hierarchy and validate it.
///
/// Returns either a valid `BizrelayConfig` or every collected error.
pub fn load_and_validate() -> Result<BizrelayConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![err.into()]),
    }
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<BizrelayConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![err.into()]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_toml_passes_both_stages() {
        let config = load_and_validate_str(
            r#"
            [vault]
            encryption_key = "0123456789abcdef0123456789abcdef"
        "#,
        )
        .unwrap();
        assert_eq!(
            config.vault.encryption_key.as_deref(),
            Some("0123456789abcdef0123456789abcdef")
        );
    }

    #[test]
    fn validation_errors_surface() {
        let errors = load_and_validate_str(
            r#"
            [vault]
            encryption_key = "short"
        "#,
        )
        .unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn parse_errors_surface() {
        let errors = load_and_validate_str("not [valid toml").unwrap_err();
        assert!(matches!(errors[0], ConfigError::Parse { .. }));
    }
}
