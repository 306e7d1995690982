// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration error types and terminal rendering.

use thiserror::Error;

/// An error found while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment failed to parse or merge the config sources.
    #[error("config parse error: {message}")]
    Parse { message: String },

    /// A semantic constraint failed after deserialization.
    #[error("config validation error: {message}")]
    Validation { message: String },
}

/// Render collected config errors to stderr, one per line.
pub fn render_errors(errors: &[ConfigError]) {
    for error in errors {
        eprintln!("error: {error}");
    }
    eprintln!(
        "\n{} configuration error{} found",
        errors.len(),
        if errors.len() == 1 { "" } else { "s" }
    );
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Parse { message: err.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_display_their_message() {
        let parse = ConfigError::Parse { message: "bad toml".into() };
        assert!(parse.to_string().contains("bad toml"));

        let validation = ConfigError::Validation { message: "bad value".into() };
        assert!(validation.to_string().contains("bad value"));
    }
}
