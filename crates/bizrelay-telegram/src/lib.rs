// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram Bot API channel adapter for bizrelay.
//!
//! Provides the outbound message channel, the long-poll event source, and
//! the classification of raw updates into domain events.

pub mod client;
pub mod poller;
pub mod types;
pub mod updates;

pub use client::TelegramChannel;
pub use poller::UpdatePoller;
