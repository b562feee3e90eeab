use crate::constants::{CHAT_MAX_TEXT_LEN, DEFAULT_PLAYER_NAME, MAX_NAME_LEN};

pub fn sanitize_name(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return DEFAULT_PLAYER_NAME.to_string();
    }
    trimmed.chars().take(MAX_NAME_LEN).collect::<String>().trim_end().to_string()
}

/// Clamps chat text; `None` when nothing printable is left.
pub fn sanitize_chat_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(CHAT_MAX_TEXT_LEN).collect())
}

pub fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}
