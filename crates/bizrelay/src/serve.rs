// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `bizrelay serve` command implementation.
//!
//! Wires the configured adapters together and runs the agent loop until
//! a shutdown signal arrives.

use std::sync::Arc;

use bizrelay_agent::{AccountLocks, AgentLoop, Bundle, Dialog, RelayPipeline};
use bizrelay_config::model::BizrelayConfig;
use bizrelay_core::{CompletionProvider, MessageChannel, RecordStore, RelayError};
use bizrelay_groq::GroqProvider;
use bizrelay_store::RestStore;
use bizrelay_telegram::{TelegramChannel, UpdatePoller};
use bizrelay_vault::CredentialVault;
use tracing::info;

use crate::shutdown;

/// Runs the `bizrelay serve` command.
pub async fn run_serve(config: BizrelayConfig) -> Result<(), RelayError> {
    init_tracing(&config.agent.log_level);
    info!(name = config.agent.name.as_str(), "starting bizrelay serve");

    let key = config
        .vault
        .encryption_key
        .as_deref()
        .ok_or_else(|| RelayError::Config("vault.encryption_key is required".into()))?;
    let vault = CredentialVault::new(key)?;

    let store: Arc<dyn RecordStore> = Arc::new(RestStore::new(&config.store)?);
    let provider: Arc<dyn CompletionProvider> = Arc::new(GroqProvider::new(&config.groq)?);
    let telegram = TelegramChannel::new(&config.telegram)?;
    let channel: Arc<dyn MessageChannel> = Arc::new(telegram.clone());
    let poller = UpdatePoller::new(telegram);

    let i18n = Arc::new(Bundle::embedded()?);
    let locks = Arc::new(AccountLocks::new());

    let dialog = Arc::new(Dialog::new(
        store.clone(),
        channel.clone(),
        vault.clone(),
        i18n,
        locks.clone(),
        config.telegram.require_premium,
    ));
    let relay = Arc::new(RelayPipeline::new(
        store.clone(),
        provider,
        channel,
        vault,
        locks,
        config.relay.history_window,
        config.relay.failure_reply.clone(),
    ));

    let cancel = shutdown::install_signal_handler();
    let agent_loop = AgentLoop::new(
        Box::new(poller),
        store,
        dialog,
        relay,
        config.agent.worker_queue,
        cancel,
    );
    agent_loop.run().await;

    info!("bizrelay serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("bizrelay={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
