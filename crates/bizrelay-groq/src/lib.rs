// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Groq chat-completions provider adapter for bizrelay.

pub mod client;
pub mod types;

pub use client::GroqProvider;
