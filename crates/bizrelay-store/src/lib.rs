// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record store adapter for bizrelay.
//!
//! Implements [`RecordStore`] over a PostgREST-style HTTP API: account
//! records in an `accounts` table keyed by Telegram user id (with a
//! secondary filter on business connection id) and conversation turns in a
//! `turns` table keyed by (owner, counterpart, insertion order).

pub mod client;

pub use client::RestStore;
