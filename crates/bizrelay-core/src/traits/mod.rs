// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits implemented by the pluggable collaborators: record
//! store, completion provider, messaging channel, and the event source.

pub mod adapter;
pub mod channel;
pub mod provider;
pub mod source;
pub mod store;

pub use adapter::Adapter;
pub use channel::MessageChannel;
pub use provider::CompletionProvider;
pub use source::EventSource;
pub use store::RecordStore;
