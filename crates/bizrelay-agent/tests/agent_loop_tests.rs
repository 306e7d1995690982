// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Agent loop scenarios: redelivery dedupe and per-account fan-out.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bizrelay_agent::{AccountLocks, AgentLoop, Bundle, Dialog, RelayPipeline};
use bizrelay_core::types::{Account, Event};
use bizrelay_core::{
    CompletionProvider, EventSource, MessageChannel, RecordStore, RelayError,
};
use bizrelay_test_utils::{MockChannel, MockProvider, MockStore};
use bizrelay_vault::CredentialVault;
use tokio_util::sync::CancellationToken;

const VAULT_KEY: &str = "0123456789abcdef0123456789abcdef";

fn vault() -> CredentialVault {
    CredentialVault::new(VAULT_KEY).unwrap()
}

/// Replays scripted batches, then cancels the loop and parks forever so
/// the cancellation branch is the only way out.
struct ScriptedSource {
    batches: VecDeque<Vec<(i64, Event)>>,
    cancel: CancellationToken,
}

#[async_trait]
impl EventSource for ScriptedSource {
    async fn next_events(&mut self) -> Result<Vec<(i64, Event)>, RelayError> {
        if let Some(batch) = self.batches.pop_front() {
            return Ok(batch);
        }
        self.cancel.cancel();
        std::future::pending().await
    }
}

struct Harness {
    store: Arc<MockStore>,
    provider: Arc<MockProvider>,
    channel: Arc<MockChannel>,
}

impl Harness {
    fn new() -> Self {
        Self {
            store: Arc::new(MockStore::new()),
            provider: Arc::new(MockProvider::with_replies(vec!["reply".into()])),
            channel: Arc::new(MockChannel::new()),
        }
    }

    async fn seed_configured_owner(&self) {
        let mut account = Account::new(42, None, true);
        account.business_connection_id = Some("conn-1".to_string());
        account.credential = Some(vault().encrypt("gsk_live_secret").unwrap());
        self.store.seed_account(account).await;
        self.store.reset_upsert_count().await;
    }

    /// Runs the loop over the scripted batches until the source cancels it.
    async fn run(&self, batches: Vec<Vec<(i64, Event)>>) {
        let store: Arc<dyn RecordStore> = self.store.clone();
        let provider: Arc<dyn CompletionProvider> = self.provider.clone();
        let channel: Arc<dyn MessageChannel> = self.channel.clone();
        let i18n = Arc::new(Bundle::embedded().unwrap());
        let locks = Arc::new(AccountLocks::new());

        let dialog = Arc::new(Dialog::new(
            store.clone(),
            channel.clone(),
            vault(),
            i18n,
            locks.clone(),
            true,
        ));
        let relay = Arc::new(RelayPipeline::new(
            store.clone(),
            provider,
            channel,
            vault(),
            locks,
            10,
            None,
        ));

        let cancel = CancellationToken::new();
        let source = ScriptedSource {
            batches: batches.into(),
            cancel: cancel.clone(),
        };
        AgentLoop::new(Box::new(source), store, dialog, relay, 8, cancel)
            .run()
            .await;
    }

    /// The workers drain their queues after the loop returns; poll until
    /// the store stops changing.
    async fn settle(&self, expected_turns: usize) {
        for _ in 0..200 {
            if self.store.turn_count().await >= expected_turns {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

fn business_message(text: &str) -> Event {
    Event::BusinessMessage {
        connection_id: "conn-1".to_string(),
        chat_id: 700,
        sender: None,
        text: text.to_string(),
    }
}

#[tokio::test]
async fn redelivered_event_id_appends_no_duplicate_turn() {
    let harness = Harness::new();
    harness.seed_configured_owner().await;

    // The same (id, event) pair arrives again in a later batch, as after
    // a crash-and-retry of the long poll.
    harness
        .run(vec![
            vec![(10, business_message("hi"))],
            vec![(10, business_message("hi"))],
        ])
        .await;
    harness.settle(2).await;

    // One user turn, one assistant turn, one completion call.
    assert_eq!(harness.store.turn_count().await, 2);
    assert_eq!(harness.provider.calls().await.len(), 1);
    assert_eq!(harness.channel.sent().await.len(), 1);
}

#[tokio::test]
async fn stale_id_in_the_same_batch_is_dropped() {
    let harness = Harness::new();
    harness.seed_configured_owner().await;

    harness
        .run(vec![vec![
            (10, business_message("first")),
            (10, business_message("first")),
            (11, business_message("second")),
        ]])
        .await;
    harness.settle(4).await;

    assert_eq!(harness.store.turn_count().await, 4);
    assert_eq!(harness.provider.calls().await.len(), 2);
}

#[tokio::test]
async fn distinct_accounts_get_their_own_workers() {
    let harness = Harness::new();

    // Two different users send /start; both accounts are created and both
    // receive a welcome.
    let start = |user_id: i64, event_id: i64| {
        (
            event_id,
            Event::PrivateMessage {
                user_id,
                chat_id: user_id,
                message_id: 1,
                text: "/start".to_string(),
                username: None,
                is_premium: true,
            },
        )
    };
    harness.run(vec![vec![start(1, 20), start(2, 21)]]).await;

    for _ in 0..200 {
        if harness.channel.call_count().await >= 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    assert!(harness.store.account(1).await.unwrap().is_some());
    assert!(harness.store.account(2).await.unwrap().is_some());
    assert_eq!(harness.channel.sent().await.len(), 2);
}
