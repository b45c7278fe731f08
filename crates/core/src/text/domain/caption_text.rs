use crate::shared::constants::{CAPTION_ELLIPSIS, CAPTION_MAX_CHARS};

/// First `max_chars` characters of `text`, with an ellipsis appended when
/// anything was cut. Counts characters, not bytes.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{CAPTION_ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

/// Caption burned into generated frames.
pub fn caption_for(text: &str) -> String {
    truncate_with_ellipsis(text, CAPTION_MAX_CHARS)
}

/// Display title stored with a video record.
pub fn title_for(text: &str) -> String {
    truncate_with_ellipsis(text, CAPTION_MAX_CHARS)
}
