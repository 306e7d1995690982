// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Groq chat-completions API request/response types.
//!
//! The API is OpenAI-compatible; only the fields bizrelay uses are
//! modeled, unknown response fields are ignored.

use bizrelay_core::types::ChatMessage;
use serde::{Deserialize, Serialize};

/// A chat-completions request.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    /// Model identifier (e.g. "openai/gpt-oss-120b").
    pub model: String,
    /// Ordered message list: system first, then the conversation.
    pub messages: Vec<ChatMessage>,
}

/// A chat-completions response.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    pub content: String,
}

/// Error envelope returned on non-success responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(rename = "type", default)]
    pub type_: Option<String>,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_parses_with_extra_fields() {
        let body = serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "hello"}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 5, "completion_tokens": 2}
        });
        let response: CompletionResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.choices[0].message.content, "hello");
    }

    #[test]
    fn error_envelope_parses() {
        let body = serde_json::json!({
            "error": {"message": "Invalid API Key", "type": "invalid_request_error"}
        });
        let parsed: ApiErrorResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.error.message, "Invalid API Key");
        assert_eq!(parsed.error.type_.as_deref(), Some("invalid_request_error"));
    }
}
