// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory record store for deterministic testing.
//!
//! Mirrors the keyed semantics of the REST store: accounts keyed by user
//! id, append-only turns, first-seen counterpart names.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use bizrelay_core::traits::adapter::{Adapter, AdapterType, HealthStatus};
use bizrelay_core::types::{Account, ConversationTurn, Counterpart};
use bizrelay_core::{RecordStore, RelayError};

/// An in-memory [`RecordStore`].
pub struct MockStore {
    accounts: Arc<Mutex<HashMap<i64, Account>>>,
    turns: Arc<Mutex<Vec<ConversationTurn>>>,
    upserts: Arc<Mutex<usize>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(Mutex::new(HashMap::new())),
            turns: Arc::new(Mutex::new(Vec::new())),
            upserts: Arc::new(Mutex::new(0)),
        }
    }

    /// Seeds an account directly, bypassing the upsert path.
    pub async fn seed_account(&self, account: Account) {
        self.accounts.lock().await.insert(account.user_id, account);
    }

    /// Seeds a turn directly, bypassing the append path.
    pub async fn seed_turn(&self, turn: ConversationTurn) {
        self.turns.lock().await.push(turn);
    }

    /// Total number of stored turns, across all accounts.
    pub async fn turn_count(&self) -> usize {
        self.turns.lock().await.len()
    }

    /// Number of `upsert_account` calls since construction or reset.
    pub async fn upsert_count(&self) -> usize {
        *self.upserts.lock().await
    }

    /// Resets the upsert counter, typically after test setup.
    pub async fn reset_upsert_count(&self) {
        *self.upserts.lock().await = 0;
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Adapter for MockStore {
    fn name(&self) -> &str {
        "mock-store"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, RelayError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl RecordStore for MockStore {
    async fn account(&self, user_id: i64) -> Result<Option<Account>, RelayError> {
        Ok(self.accounts.lock().await.get(&user_id).cloned())
    }

    async fn account_by_connection(
        &self,
        connection_id: &str,
    ) -> Result<Option<Account>, RelayError> {
        Ok(self
            .accounts
            .lock()
            .await
            .values()
            .find(|a| a.business_connection_id.as_deref() == Some(connection_id))
            .cloned())
    }

    async fn upsert_account(&self, account: &Account) -> Result<(), RelayError> {
        *self.upserts.lock().await += 1;
        self.accounts.lock().await.insert(account.user_id, account.clone());
        Ok(())
    }

    async fn append_turn(&self, turn: &ConversationTurn) -> Result<(), RelayError> {
        self.turns.lock().await.push(turn.clone());
        Ok(())
    }

    async fn recent_turns(
        &self,
        owner_id: i64,
        counterpart_id: i64,
        limit: u32,
    ) -> Result<Vec<ConversationTurn>, RelayError> {
        let turns = self.turns.lock().await;
        let matching: Vec<_> = turns
            .iter()
            .filter(|t| t.owner_id == owner_id && t.counterpart_id == counterpart_id)
            .cloned()
            .collect();
        let skip = matching.len().saturating_sub(limit as usize);
        Ok(matching.into_iter().skip(skip).collect())
    }

    async fn distinct_counterparts(
        &self,
        owner_id: i64,
    ) -> Result<Vec<Counterpart>, RelayError> {
        let turns = self.turns.lock().await;
        let mut seen = Vec::new();
        let mut result = Vec::new();
        for turn in turns.iter().filter(|t| t.owner_id == owner_id) {
            if !seen.contains(&turn.counterpart_id) {
                seen.push(turn.counterpart_id);
                result.push(Counterpart {
                    id: turn.counterpart_id,
                    name: turn.counterpart_name.clone(),
                });
            }
        }
        Ok(result)
    }

    async fn delete_turns(&self, owner_id: i64, counterpart_id: i64) -> Result<(), RelayError> {
        self.turns
            .lock()
            .await
            .retain(|t| !(t.owner_id == owner_id && t.counterpart_id == counterpart_id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizrelay_core::types::Role;

    fn turn(owner: i64, counterpart: i64, role: Role, content: &str) -> ConversationTurn {
        ConversationTurn {
            owner_id: owner,
            counterpart_id: counterpart,
            counterpart_name: format!("User {counterpart}"),
            role,
            content: content.to_string(),
            created_at: None,
        }
    }

    #[tokio::test]
    async fn upsert_then_lookup_by_both_keys() {
        let store = MockStore::new();
        let mut account = Account::new(42, None, true);
        account.business_connection_id = Some("conn-1".into());
        store.upsert_account(&account).await.unwrap();

        assert_eq!(store.account(42).await.unwrap().unwrap().user_id, 42);
        assert_eq!(
            store.account_by_connection("conn-1").await.unwrap().unwrap().user_id,
            42
        );
        assert!(store.account_by_connection("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn recent_turns_windows_newest_in_order() {
        let store = MockStore::new();
        for i in 0..5 {
            store.append_turn(&turn(1, 7, Role::User, &format!("m{i}"))).await.unwrap();
        }
        let window = store.recent_turns(1, 7, 3).await.unwrap();
        let contents: Vec<_> = window.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, ["m2", "m3", "m4"]);
    }

    #[tokio::test]
    async fn delete_turns_is_scoped_to_one_counterpart() {
        let store = MockStore::new();
        store.append_turn(&turn(1, 7, Role::User, "a")).await.unwrap();
        store.append_turn(&turn(1, 8, Role::User, "b")).await.unwrap();
        store.delete_turns(1, 7).await.unwrap();

        assert!(store.recent_turns(1, 7, 10).await.unwrap().is_empty());
        assert_eq!(store.recent_turns(1, 8, 10).await.unwrap().len(), 1);
        assert_eq!(store.distinct_counterparts(1).await.unwrap().len(), 1);
    }
}
