// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dashboard and menu rendering.
//!
//! Every view is a pure function of (account, banner, bundle) to
//! (text, keyboard). User-authored text is HTML-escaped here, at render
//! time only; stored values stay verbatim.

use bizrelay_core::types::{Account, Counterpart, InlineButton, InlineKeyboard, PromptState};

use crate::i18n::Bundle;

/// Models offered in the picker: (label, model id).
pub const MODELS: &[(&str, &str)] = &[
    ("GPT-OSS 120B", "openai/gpt-oss-120b"),
    ("Llama 4 Maverick", "meta-llama/llama-4-maverick-17b-128e-instruct"),
];

/// Languages offered in the picker: (label, code).
pub const LANGUAGES: &[(&str, &str)] =
    &[("English 🇺🇸", "en"), ("Indonesia 🇮🇩", "id"), ("Russian 🇷🇺", "ru")];

/// Escapes text for embedding in Telegram-HTML output.
pub fn escape(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

/// Renders the settings dashboard. A non-empty `banner` is prepended
/// above the title (status feedback from the previous action).
pub fn render(account: &Account, banner: Option<&str>, i18n: &Bundle) -> (String, InlineKeyboard) {
    let lang = &account.language;

    let prompt = match &account.prompt_state {
        PromptState::Awaiting(_) => i18n.get(lang, "wait_input").to_string(),
        PromptState::Idle => escape(&account.system_prompt),
    };
    let key_status = if account.credential_ready() {
        i18n.get(lang, "key_set")
    } else {
        i18n.get(lang, "key_not_set")
    };

    let mut header = i18n.get(lang, "dash_title").to_string();
    if let Some(banner) = banner.filter(|b| !b.is_empty()) {
        header = format!("{banner}\n\n{header}");
    }

    let text = format!(
        "{header}\n\n{} <code>{}</code>\n{} <code>{key_status}</code>\n{} <code>{prompt}</code>",
        i18n.get(lang, "dash_model"),
        account.ai_model,
        i18n.get(lang, "dash_key"),
        i18n.get(lang, "dash_prompt"),
    );

    let menu = InlineKeyboard::new()
        .row(vec![
            InlineButton::new(i18n.get(lang, "btn_model"), "menu_model"),
            InlineButton::new(i18n.get(lang, "btn_prompt"), "menu_prompt"),
        ])
        .row(vec![InlineButton::new(i18n.get(lang, "btn_update_key"), "menu_key")])
        .row(vec![InlineButton::new(i18n.get(lang, "btn_clear_history"), "menu_clear_list")])
        .row(vec![InlineButton::new(i18n.get(lang, "btn_lang"), "menu_lang")]);

    (text, menu)
}

/// Welcome view for `/start`.
pub fn welcome(lang: &str, i18n: &Bundle) -> (String, InlineKeyboard) {
    let menu = InlineKeyboard::new()
        .row(vec![InlineButton::new(i18n.get(lang, "btn_set_key"), "menu_key")])
        .row(vec![InlineButton::new(i18n.get(lang, "btn_dashboard"), "back_main")]);
    (i18n.get(lang, "welcome").to_string(), menu)
}

/// Model picker view.
pub fn model_menu(lang: &str, i18n: &Bundle) -> (String, InlineKeyboard) {
    let mut menu = InlineKeyboard::new();
    for (label, id) in MODELS {
        menu = menu.row(vec![InlineButton::new(*label, format!("set_model_{id}"))]);
    }
    menu = menu.row(vec![InlineButton::new(i18n.get(lang, "btn_back"), "back_main")]);
    (i18n.get(lang, "select_model").to_string(), menu)
}

/// Language picker view.
pub fn language_menu(lang: &str, i18n: &Bundle) -> (String, InlineKeyboard) {
    let menu = InlineKeyboard::new()
        .row(vec![
            InlineButton::new(LANGUAGES[0].0, format!("set_lang_{}", LANGUAGES[0].1)),
            InlineButton::new(LANGUAGES[1].0, format!("set_lang_{}", LANGUAGES[1].1)),
        ])
        .row(vec![InlineButton::new(LANGUAGES[2].0, format!("set_lang_{}", LANGUAGES[2].1))])
        .row(vec![InlineButton::new(i18n.get(lang, "btn_back"), "back_main")]);
    (i18n.get(lang, "select_lang").to_string(), menu)
}

/// Prompt/credential input view: just a cancel button back to the
/// dashboard.
pub fn input_menu(prompt_key: &str, lang: &str, i18n: &Bundle) -> (String, InlineKeyboard) {
    let menu = InlineKeyboard::new()
        .row(vec![InlineButton::new(i18n.get(lang, "btn_cancel"), "back_main")]);
    (i18n.get(lang, prompt_key).to_string(), menu)
}

/// Counterpart list for clear-history. Empty list renders `no_history`.
pub fn counterpart_menu(
    counterparts: &[Counterpart],
    lang: &str,
    i18n: &Bundle,
) -> (String, InlineKeyboard) {
    if counterparts.is_empty() {
        let menu = InlineKeyboard::new()
            .row(vec![InlineButton::new(i18n.get(lang, "btn_back"), "back_main")]);
        return (i18n.get(lang, "no_history").to_string(), menu);
    }
    let mut menu = InlineKeyboard::new();
    for counterpart in counterparts {
        menu = menu.row(vec![InlineButton::new(
            format!("👤 {}", counterpart.name),
            format!("confirm_clear_{}", counterpart.id),
        )]);
    }
    menu = menu.row(vec![InlineButton::new(i18n.get(lang, "btn_back"), "back_main")]);
    (i18n.get(lang, "clear_list").to_string(), menu)
}

/// Confirmation view before deleting one counterpart's history.
pub fn confirm_clear_menu(counterpart_id: i64, lang: &str, i18n: &Bundle) -> (String, InlineKeyboard) {
    let menu = InlineKeyboard::new()
        .row(vec![InlineButton::new(
            i18n.get(lang, "btn_delete_confirm"),
            format!("exec_clear_{counterpart_id}"),
        )])
        .row(vec![InlineButton::new(i18n.get(lang, "btn_cancel"), "menu_clear_list")]);
    (i18n.get(lang, "clear_warn").to_string(), menu)
}

/// Post-deletion view, linking back to the counterpart list.
pub fn cleared_menu(lang: &str, i18n: &Bundle) -> (String, InlineKeyboard) {
    let menu = InlineKeyboard::new()
        .row(vec![InlineButton::new(i18n.get(lang, "btn_back"), "menu_clear_list")]);
    (i18n.get(lang, "history_cleared").to_string(), menu)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle() -> Bundle {
        Bundle::embedded().unwrap()
    }

    #[test]
    fn prompt_is_escaped_at_render_time() {
        let mut account = Account::new(1, None, true);
        account.system_prompt = "<script>alert(1)</script>".to_string();
        let (text, _) = render(&account, None, &bundle());
        assert!(text.contains("&lt;script&gt;"));
        assert!(!text.contains("<script>"));
        // Stored value stays verbatim.
        assert_eq!(account.system_prompt, "<script>alert(1)</script>");
    }

    #[test]
    fn awaiting_prompt_shows_placeholder_not_sentinel() {
        let mut account = Account::new(1, None, true);
        account.begin_prompt_edit();
        let (text, _) = render(&account, None, &bundle());
        assert!(text.contains("waiting for your input"));
        assert!(!text.contains("You are a professional assistant."));
    }

    #[test]
    fn key_status_reflects_credential_readiness() {
        let i18n = bundle();
        let mut account = Account::new(1, None, true);
        let (text, _) = render(&account, None, &i18n);
        assert!(text.contains("Not set"));

        account.credential = Some("ciphertext".into());
        let (text, _) = render(&account, None, &i18n);
        assert!(text.contains("Set ✅"));

        account.begin_credential_edit();
        let (text, _) = render(&account, None, &i18n);
        assert!(text.contains("Not set"));
    }

    #[test]
    fn banner_is_prepended_above_title() {
        let account = Account::new(1, None, true);
        let i18n = bundle();
        let (text, _) = render(&account, Some("✅ <b>Key saved!</b>"), &i18n);
        let banner_pos = text.find("Key saved").unwrap();
        let title_pos = text.find("Settings").unwrap();
        assert!(banner_pos < title_pos);
    }

    #[test]
    fn dashboard_menu_rows() {
        let account = Account::new(1, None, true);
        let (_, menu) = render(&account, None, &bundle());
        assert_eq!(menu.inline_keyboard.len(), 4);
        assert_eq!(menu.inline_keyboard[0].len(), 2);
        assert_eq!(menu.inline_keyboard[0][0].callback_data, "menu_model");
        assert_eq!(menu.inline_keyboard[3][0].callback_data, "menu_lang");
    }

    #[test]
    fn counterpart_menu_lists_confirm_tokens() {
        let i18n = bundle();
        let counterparts = vec![
            Counterpart { id: 7, name: "@jane".into() },
            Counterpart { id: 8, name: "User 8".into() },
        ];
        let (_, menu) = counterpart_menu(&counterparts, "en", &i18n);
        assert_eq!(menu.inline_keyboard.len(), 3);
        assert_eq!(menu.inline_keyboard[0][0].callback_data, "confirm_clear_7");
        assert_eq!(menu.inline_keyboard[1][0].text, "👤 User 8");

        let (text, menu) = counterpart_menu(&[], "en", &i18n);
        assert!(text.contains("No conversation history"));
        assert_eq!(menu.inline_keyboard.len(), 1);
    }

    #[test]
    fn model_menu_offers_known_models() {
        let (_, menu) = model_menu("en", &bundle());
        assert_eq!(
            menu.inline_keyboard[0][0].callback_data,
            "set_model_openai/gpt-oss-120b"
        );
        assert_eq!(menu.inline_keyboard.last().unwrap()[0].callback_data, "back_main");
    }
}
