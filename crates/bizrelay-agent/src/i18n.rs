// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Locale bundle for user-facing strings.
//!
//! Bundles are embedded at compile time. Lookup falls back to English,
//! then to echoing the key itself so a missing entry is visible in the
//! UI instead of panicking.

use std::collections::HashMap;

use bizrelay_core::RelayError;

const EN: &str = include_str!("../locales/en.json");
const ID: &str = include_str!("../locales/id.json");
const RU: &str = include_str!("../locales/ru.json");

/// Localized message lookup keyed by language code and message key.
#[derive(Debug, Clone)]
pub struct Bundle {
    locales: HashMap<String, HashMap<String, String>>,
}

impl Bundle {
    /// Loads the embedded en / id / ru locales.
    pub fn embedded() -> Result<Self, RelayError> {
        let mut locales = HashMap::new();
        for (code, raw) in [("en", EN), ("id", ID), ("ru", RU)] {
            let messages: HashMap<String, String> = serde_json::from_str(raw)
                .map_err(|e| RelayError::Internal(format!("locale {code} is malformed: {e}")))?;
            locales.insert(code.to_string(), messages);
        }
        Ok(Self { locales })
    }

    /// Looks up `key` in `lang`, falling back to English, then to the key.
    pub fn get<'a>(&'a self, lang: &str, key: &'a str) -> &'a str {
        if let Some(value) = self.locales.get(lang).and_then(|m| m.get(key)) {
            return value;
        }
        if let Some(value) = self.locales.get("en").and_then(|m| m.get(key)) {
            return value;
        }
        key
    }
}
