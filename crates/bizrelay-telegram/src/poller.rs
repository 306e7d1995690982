// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Long-poll update source.
//!
//! Telegram redelivers every update until it is confirmed, which happens
//! implicitly by advancing the offset past it on the next getUpdates call.
//! The poller therefore confirms a batch only after returning it: if the
//! process dies mid-batch the same updates arrive again and the agent
//! loop's id guard drops the ones already handled.

use async_trait::async_trait;
use bizrelay_core::traits::source::EventSource;
use bizrelay_core::types::Event;
use bizrelay_core::RelayError;
use tracing::{debug, trace};

use crate::client::TelegramChannel;
use crate::updates;

/// [`EventSource`] backed by Bot API long polling.
pub struct UpdatePoller {
    channel: TelegramChannel,
    offset: i64,
}

impl UpdatePoller {
    pub fn new(channel: TelegramChannel) -> Self {
        Self { channel, offset: 0 }
    }
}

#[async_trait]
impl EventSource for UpdatePoller {
    async fn next_events(&mut self) -> Result<Vec<(i64, Event)>, RelayError> {
        let batch = self.channel.get_updates(self.offset).await?;
        let mut events = Vec::with_capacity(batch.len());
        for update in &batch {
            // Advance past every update, classified or not, so unsupported
            // update types are not redelivered forever.
            self.offset = self.offset.max(update.update_id + 1);
            match updates::classify(update) {
                Some(event) => events.push((update.update_id, event)),
                None => trace!(update_id = update.update_id, "skipping update"),
            }
        }
        if !batch.is_empty() {
            debug!(
                received = batch.len(),
                classified = events.len(),
                next_offset = self.offset,
                "polled update batch"
            );
        }
        Ok(events)
    }
}
