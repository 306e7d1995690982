// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record store trait: keyed access to account and conversation records.

use async_trait::async_trait;

use crate::error::RelayError;
use crate::traits::adapter::Adapter;
use crate::types::{Account, ConversationTurn, Counterpart};

/// Keyed record access over the system of record.
///
/// The backing store is a generic network record API; implementations must
/// not assume transactional semantics. Callers serialize account
/// read-modify-upsert sequences themselves.
#[async_trait]
pub trait RecordStore: Adapter {
    /// Fetches the account keyed by platform user id.
    async fn account(&self, user_id: i64) -> Result<Option<Account>, RelayError>;

    /// Fetches the account linked to a business connection id.
    async fn account_by_connection(
        &self,
        connection_id: &str,
    ) -> Result<Option<Account>, RelayError>;

    /// Inserts or replaces the account record keyed by its user id.
    async fn upsert_account(&self, account: &Account) -> Result<(), RelayError>;

    /// Appends one immutable conversation turn.
    async fn append_turn(&self, turn: &ConversationTurn) -> Result<(), RelayError>;

    /// Returns the most recent `limit` turns for (owner, counterpart) in
    /// chronological order, oldest of the window first.
    async fn recent_turns(
        &self,
        owner_id: i64,
        counterpart_id: i64,
        limit: u32,
    ) -> Result<Vec<ConversationTurn>, RelayError>;

    /// Lists the distinct counterparts with stored history under an account.
    async fn distinct_counterparts(
        &self,
        owner_id: i64,
    ) -> Result<Vec<Counterpart>, RelayError>;

    /// Deletes all turns for (owner, counterpart); other counterparts under
    /// the same owner are untouched.
    async fn delete_turns(&self, owner_id: i64, counterpart_id: i64) -> Result<(), RelayError>;
}
