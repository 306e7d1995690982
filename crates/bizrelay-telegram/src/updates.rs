// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classification of raw Bot API updates into domain events.
//!
//! Exactly one classification applies per update. When an update somehow
//! carries several payloads the priority is: menu selection, business
//! message, private message, connection established. Updates without a
//! usable payload (non-text media, callbacks without a message) classify
//! to `None` and are skipped upstream.

use bizrelay_core::types::{Event, Sender};
use tracing::debug;

use crate::types::{Message, TgUser, Update};

/// Classifies an update into a domain event, or `None` when the update
/// carries nothing this service handles.
pub fn classify(update: &Update) -> Option<Event> {
    if let Some(callback) = &update.callback_query {
        let token = callback.data.clone()?;
        let message = callback.message.as_ref()?;
        return Some(Event::MenuSelection {
            user_id: callback.from.id,
            callback_id: callback.id.clone(),
            message_id: message.message_id,
            token,
        });
    }

    if let Some(message) = &update.business_message {
        let connection_id = message.business_connection_id.clone()?;
        let chat_id = message.chat.as_ref()?.id;
        let text = message.text.clone()?;
        return Some(Event::BusinessMessage {
            connection_id,
            chat_id,
            sender: message.from.as_ref().map(to_sender),
            text,
        });
    }

    if let Some(message) = &update.message {
        return classify_private(message);
    }

    if let Some(connection) = &update.business_connection {
        return Some(Event::ConnectionEstablished {
            connection_id: connection.id.clone(),
            user_chat_id: connection.user_chat_id,
        });
    }

    debug!(update_id = update.update_id, "ignoring unsupported update type");
    None
}

fn classify_private(message: &Message) -> Option<Event> {
    let from = message.from.as_ref()?;
    let chat_id = message.chat.as_ref()?.id;
    let text = message.text.clone()?;
    Some(Event::PrivateMessage {
        user_id: from.id,
        chat_id,
        message_id: message.message_id,
        text,
        username: from.username.clone(),
        is_premium: from.is_premium,
    })
}

fn to_sender(user: &TgUser) -> Sender {
    Sender {
        id: user.id,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update_from(value: serde_json::Value) -> Update {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn classifies_menu_selection() {
        let update = update_from(serde_json::json!({
            "update_id": 1,
            "callback_query": {
                "id": "cb-1",
                "from": {"id": 42},
                "data": "menu_model",
                "message": {"message_id": 9}
            }
        }));
        let event = classify(&update).unwrap();
        assert_eq!(
            event,
            Event::MenuSelection {
                user_id: 42,
                callback_id: "cb-1".into(),
                message_id: 9,
                token: "menu_model".into(),
            }
        );
    }

    #[test]
    fn callback_without_message_is_skipped() {
        let update = update_from(serde_json::json!({
            "update_id": 1,
            "callback_query": {"id": "cb-1", "from": {"id": 42}, "data": "menu_model"}
        }));
        assert!(classify(&update).is_none());
    }

    #[test]
    fn classifies_business_message_with_sender() {
        let update = update_from(serde_json::json!({
            "update_id": 2,
            "business_message": {
                "message_id": 5,
                "business_connection_id": "conn-1",
                "from": {"id": 7, "first_name": "Jane", "last_name": "Doe"},
                "chat": {"id": 700},
                "text": "hi"
            }
        }));
        match classify(&update).unwrap() {
            Event::BusinessMessage { connection_id, chat_id, sender, text } => {
                assert_eq!(connection_id, "conn-1");
                assert_eq!(chat_id, 700);
                assert_eq!(text, "hi");
                assert_eq!(sender.unwrap().display_name(), "Jane Doe");
            }
            other => panic!("expected BusinessMessage, got {other:?}"),
        }
    }

    #[test]
    fn classifies_private_message() {
        let update = update_from(serde_json::json!({
            "update_id": 3,
            "message": {
                "message_id": 11,
                "from": {"id": 42, "username": "owner", "is_premium": true},
                "chat": {"id": 42},
                "text": "/settings"
            }
        }));
        match classify(&update).unwrap() {
            Event::PrivateMessage { user_id, chat_id, message_id, text, is_premium, .. } => {
                assert_eq!((user_id, chat_id, message_id), (42, 42, 11));
                assert_eq!(text, "/settings");
                assert!(is_premium);
            }
            other => panic!("expected PrivateMessage, got {other:?}"),
        }
    }

    #[test]
    fn classifies_connection_established() {
        let update = update_from(serde_json::json!({
            "update_id": 4,
            "business_connection": {"id": "conn-1", "user_chat_id": 42, "is_enabled": true}
        }));
        assert_eq!(
            classify(&update).unwrap(),
            Event::ConnectionEstablished { connection_id: "conn-1".into(), user_chat_id: 42 }
        );
    }

    #[test]
    fn menu_selection_wins_over_other_payloads() {
        let update = update_from(serde_json::json!({
            "update_id": 5,
            "callback_query": {
                "id": "cb-1",
                "from": {"id": 42},
                "data": "back_main",
                "message": {"message_id": 9}
            },
            "message": {
                "message_id": 11,
                "from": {"id": 42},
                "chat": {"id": 42},
                "text": "hello"
            }
        }));
        assert!(matches!(classify(&update).unwrap(), Event::MenuSelection { .. }));
    }

    #[test]
    fn non_text_private_message_is_skipped() {
        let update = update_from(serde_json::json!({
            "update_id": 6,
            "message": {"message_id": 11, "from": {"id": 42}, "chat": {"id": 42}}
        }));
        assert!(classify(&update).is_none());
    }
}
