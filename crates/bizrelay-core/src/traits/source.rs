// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound event source trait.

use async_trait::async_trait;

use crate::error::RelayError;
use crate::types::Event;

/// A source of ordered, classified inbound events.
///
/// Event ids are monotonically increasing platform identifiers; the agent
/// loop uses them to deduplicate redeliveries after a crash-and-retry.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Blocks until the next batch of events is available and returns them
    /// as `(event_id, event)` pairs in platform order. An empty batch is a
    /// normal long-poll timeout, not an error.
    async fn next_events(&mut self) -> Result<Vec<(i64, Event)>, RelayError>;
}
