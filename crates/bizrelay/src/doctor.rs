// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `bizrelay doctor` command implementation.
//!
//! Runs diagnostic checks against the configured adapters to identify
//! configuration and connectivity problems before starting the service.

use std::time::{Duration, Instant};

use bizrelay_config::model::BizrelayConfig;
use bizrelay_core::traits::adapter::{Adapter, HealthStatus};
use bizrelay_core::RelayError;
use bizrelay_groq::GroqProvider;
use bizrelay_store::RestStore;
use bizrelay_telegram::TelegramChannel;
use bizrelay_vault::CredentialVault;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed successfully.
    Pass,
    /// Check passed with a warning.
    Warn,
    /// Check failed.
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

/// Runs the `bizrelay doctor` command.
pub async fn run_doctor(config: &BizrelayConfig) -> Result<(), RelayError> {
    let mut results = Vec::new();
    results.push(check_vault(config));
    results.push(check_adapter_health("Telegram", build_telegram(config)).await);
    results.push(check_adapter_health("Record store", build_store(config)).await);
    results.push(check_adapter_health("Groq", build_groq(config)).await);

    println!();
    println!("  bizrelay doctor");
    println!("  {}", "-".repeat(50));

    let mut fail_count = 0;
    let mut warn_count = 0;
    for result in &results {
        let duration_ms = result.duration.as_millis();
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => {
                warn_count += 1;
                "[WARN]"
            }
            CheckStatus::Fail => {
                fail_count += 1;
                "[FAIL]"
            }
        };
        println!("    {tag} {:<14} {} ({duration_ms}ms)", result.name, result.message);
    }

    println!();
    if fail_count > 0 || warn_count > 0 {
        let issues = fail_count + warn_count;
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }
    println!();

    Ok(())
}

fn check_vault(config: &BizrelayConfig) -> CheckResult {
    let start = Instant::now();
    let (status, message) = match config.vault.encryption_key.as_deref() {
        None => (CheckStatus::Warn, "no encryption key configured".to_string()),
        Some(key) => match CredentialVault::new(key) {
            Ok(_) => (CheckStatus::Pass, "key length ok".to_string()),
            Err(e) => (CheckStatus::Fail, e.to_string()),
        },
    };
    CheckResult { name: "Vault".to_string(), status, message, duration: start.elapsed() }
}

fn build_telegram(config: &BizrelayConfig) -> Result<impl Adapter, RelayError> {
    TelegramChannel::new(&config.telegram)
}

fn build_store(config: &BizrelayConfig) -> Result<impl Adapter, RelayError> {
    RestStore::new(&config.store)
}

fn build_groq(config: &BizrelayConfig) -> Result<impl Adapter, RelayError> {
    GroqProvider::new(&config.groq)
}

async fn check_adapter_health(
    name: &str,
    adapter: Result<impl Adapter, RelayError>,
) -> CheckResult {
    let start = Instant::now();
    let (status, message) = match adapter {
        Err(e) => (CheckStatus::Warn, format!("not configured: {e}")),
        Ok(adapter) => match adapter.health_check().await {
            Ok(HealthStatus::Healthy) => (CheckStatus::Pass, "reachable".to_string()),
            Ok(HealthStatus::Unhealthy(reason)) => (CheckStatus::Fail, reason),
            Err(e) => (CheckStatus::Fail, e.to_string()),
        },
    };
    CheckResult { name: name.to_string(), status, message, duration: start.elapsed() }
}
