// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-account mutual exclusion.
//!
//! Every read-modify-upsert of an account record takes this lock, so
//! state stays consistent even if events for one account ever reach
//! concurrent handlers. Entries are never evicted; the table grows with
//! the number of distinct accounts seen per process lifetime, which is
//! bounded by the bot's user count.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Keyed lock table: one async mutex per account id.
#[derive(Debug, Default)]
pub struct AccountLocks {
    table: DashMap<i64, Arc<Mutex<()>>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for one account, creating it on first use.
    pub async fn lock(&self, account_id: i64) -> OwnedMutexGuard<()> {
        let mutex = self
            .table
            .entry(account_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        mutex.lock_owned().await
    }
}
