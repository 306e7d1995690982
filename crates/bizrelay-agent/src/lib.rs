// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The bizrelay agent: event dispatch, dialog state machine, relay
//! pipeline, and the long-poll consumption loop.
//!
//! Events are consumed from one ordered source and fanned out to
//! per-account worker tasks: strict FIFO within an account, parallelism
//! across accounts. Account mutations additionally serialize on the
//! keyed locks in [`locks::AccountLocks`], so correctness never depends
//! on the worker topology.

pub mod dashboard;
pub mod dialog;
pub mod dispatch;
pub mod i18n;
pub mod locks;
pub mod relay;

use std::collections::HashMap;
use std::sync::Arc;

use bizrelay_core::traits::source::EventSource;
use bizrelay_core::types::Event;
use bizrelay_core::RelayError;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub use dialog::Dialog;
pub use i18n::Bundle;
pub use locks::AccountLocks;
pub use relay::RelayPipeline;

/// Shared handler state cloned into every worker.
#[derive(Clone)]
struct Handlers {
    dialog: Arc<Dialog>,
    relay: Arc<RelayPipeline>,
}

impl Handlers {
    async fn handle(&self, event: Event) -> Result<(), RelayError> {
        match event {
            Event::PrivateMessage { user_id, chat_id, message_id, text, username, is_premium } => {
                self.dialog
                    .handle_private_message(
                        user_id,
                        chat_id,
                        message_id,
                        &text,
                        username.as_deref(),
                        is_premium,
                    )
                    .await
            }
            Event::MenuSelection { user_id, callback_id, message_id, token } => {
                self.dialog
                    .handle_menu_selection(user_id, &callback_id, message_id, &token)
                    .await
            }
            Event::BusinessMessage { connection_id, chat_id, sender, text } => {
                self.relay
                    .handle_business_message(&connection_id, chat_id, sender.as_ref(), &text)
                    .await
            }
            Event::ConnectionEstablished { connection_id, user_chat_id } => {
                self.dialog
                    .handle_connection_established(&connection_id, user_chat_id)
                    .await
            }
        }
    }
}

/// Consumes events from a source and drives the handlers until
/// cancelled.
pub struct AgentLoop {
    source: Box<dyn EventSource>,
    store: Arc<dyn bizrelay_core::RecordStore>,
    handlers: Handlers,
    worker_queue: usize,
    cancel: CancellationToken,
    workers: HashMap<i64, mpsc::Sender<Event>>,
    /// Highest event id already handed to a worker; lower or equal ids
    /// are at-least-once redeliveries and are dropped.
    last_event_id: Option<i64>,
}

impl AgentLoop {
    pub fn new(
        source: Box<dyn EventSource>,
        store: Arc<dyn bizrelay_core::RecordStore>,
        dialog: Arc<Dialog>,
        relay: Arc<RelayPipeline>,
        worker_queue: usize,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            source,
            store,
            handlers: Handlers { dialog, relay },
            worker_queue,
            cancel,
            workers: HashMap::new(),
            last_event_id: None,
        }
    }

    /// Runs until the cancellation token fires. Source errors are logged
    /// and polling continues; only cancellation ends the loop.
    pub async fn run(mut self) {
        info!("agent loop started");
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("agent loop cancelled, draining workers");
                    break;
                }
                batch = self.source.next_events() => {
                    match batch {
                        Ok(events) => {
                            for (event_id, event) in events {
                                self.route(event_id, event).await;
                            }
                        }
                        Err(e) => {
                            warn!(error = %e, "event source poll failed, retrying");
                        }
                    }
                }
            }
        }
        // Dropping the senders lets each worker drain its queue and exit.
        self.workers.clear();
    }

    async fn route(&mut self, event_id: i64, event: Event) {
        if let Some(last) = self.last_event_id {
            if event_id <= last {
                debug!(event_id, "duplicate event, dropping");
                return;
            }
        }
        self.last_event_id = Some(event_id);

        let key = match dispatch::routing_key(&event, self.store.as_ref()).await {
            Ok(Some(key)) => key,
            Ok(None) => return,
            Err(e) => {
                warn!(event_id, error = %e, "routing failed, dropping event");
                return;
            }
        };

        let sender = self.worker_for(key);
        if let Err(mpsc::error::SendError(event)) = sender.send(event).await {
            // Worker task died; replace it and retry once.
            warn!(account_id = key, "worker gone, respawning");
            self.workers.remove(&key);
            let sender = self.worker_for(key);
            if sender.send(event).await.is_err() {
                error!(account_id = key, event_id, "respawned worker rejected event");
            }
        }
    }

    fn worker_for(&mut self, account_id: i64) -> mpsc::Sender<Event> {
        if let Some(sender) = self.workers.get(&account_id) {
            return sender.clone();
        }
        let (tx, mut rx) = mpsc::channel::<Event>(self.worker_queue);
        let handlers = self.handlers.clone();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                if let Err(e) = handlers.handle(event).await {
                    warn!(account_id, error = %e, "event handler failed");
                }
            }
            debug!(account_id, "worker exiting");
        });
        self.workers.insert(account_id, tx.clone());
        tx
    }
}
