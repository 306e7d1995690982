// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the bizrelay relay service.
//!
//! This crate provides the foundational trait definitions, error type, and
//! domain types used throughout the bizrelay workspace. The adapter crates
//! (store, provider, channel) implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

pub use error::RelayError;
pub use traits::adapter::{AdapterType, HealthStatus};
pub use traits::{Adapter, CompletionProvider, EventSource, MessageChannel, RecordStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_error_variants_construct_and_display() {
        let config = RelayError::Config("bad key".into());
        assert!(config.to_string().contains("configuration error"));

        let store = RelayError::Store { source: Box::new(std::io::Error::other("boom")) };
        assert!(store.to_string().contains("store error"));

        let channel = RelayError::Channel { message: "send failed".into(), source: None };
        assert!(channel.to_string().contains("send failed"));

        let provider = RelayError::Provider { message: "429".into(), source: None };
        assert!(provider.to_string().contains("429"));

        let unknown = RelayError::UnknownCommand("menu_bogus".into());
        assert!(unknown.to_string().contains("menu_bogus"));

        let timeout = RelayError::Timeout { duration: std::time::Duration::from_secs(30) };
        assert!(timeout.to_string().contains("timed out"));
    }

    #[test]
    fn adapter_type_display_roundtrip() {
        use std::str::FromStr;
        for variant in [AdapterType::Channel, AdapterType::Provider, AdapterType::Store] {
            let parsed = AdapterType::from_str(&variant.to_string()).unwrap();
            assert_eq!(variant, parsed);
        }
    }
}
