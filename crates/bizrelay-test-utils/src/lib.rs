// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for bizrelay integration tests.
//!
//! Provides mock adapters for fast, deterministic, CI-runnable tests
//! without external services.
//!
//! # Components
//!
//! - [`MockStore`] - In-memory record store
//! - [`MockProvider`] - Completion provider with pre-configured replies
//! - [`MockChannel`] - Messaging channel with captured outbound calls

pub mod mock_channel;
pub mod mock_provider;
pub mod mock_store;

pub use mock_channel::{MockChannel, SentCall};
pub use mock_provider::{CompletionCall, MockProvider};
pub use mock_store::MockStore;
