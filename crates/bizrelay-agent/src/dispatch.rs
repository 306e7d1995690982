// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event routing.
//!
//! Maps each classified event to the account id whose worker must handle
//! it. Business messages route to the owning account resolved through
//! the connection id; an unresolvable connection means the integration
//! is not configured and the event is dropped.

use bizrelay_core::types::Event;
use bizrelay_core::{RecordStore, RelayError};
use tracing::debug;

/// Resolves the per-account routing key for an event. `None` means the
/// event has no owner and is dropped.
pub async fn routing_key(
    event: &Event,
    store: &dyn RecordStore,
) -> Result<Option<i64>, RelayError> {
    match event {
        Event::MenuSelection { user_id, .. } => Ok(Some(*user_id)),
        Event::PrivateMessage { user_id, .. } => Ok(Some(*user_id)),
        Event::ConnectionEstablished { user_chat_id, .. } => Ok(Some(*user_chat_id)),
        Event::BusinessMessage { connection_id, .. } => {
            match store.account_by_connection(connection_id).await? {
                Some(owner) => Ok(Some(owner.user_id)),
                None => {
                    debug!(connection_id, "business message for unknown connection");
                    Ok(None)
                }
            }
        }
    }
}
