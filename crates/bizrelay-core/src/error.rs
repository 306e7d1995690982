// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the bizrelay relay service.

use thiserror::Error;

/// The primary error type used across all bizrelay adapter traits and core operations.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Configuration errors (invalid TOML, missing required fields, bad key length).
    #[error("configuration error: {0}")]
    Config(String),

    /// Record store errors (request failure, unexpected response shape).
    #[error("store error: {source}")]
    Store {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Messaging channel errors (send/edit failure, malformed API response).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Completion provider errors (API failure, empty response, model not found).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Credential vault errors (encryption or decryption failure).
    #[error("vault error: {0}")]
    Vault(String),

    /// A menu selection token that matches no known command.
    #[error("unknown menu command: {0}")]
    UnknownCommand(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
