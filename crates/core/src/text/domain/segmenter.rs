use crate::shared::constants::SEGMENT_MAX_CHARS;

/// Splits text into sentences at `.`, `!` or `?` followed by whitespace.
/// The terminator stays with its sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let end = i + c.len_utf8();
        if !matches!(chars.peek(), Some((_, next)) if next.is_whitespace()) {
            continue;
        }
        sentences.push(&text[start..end]);
        while let Some(&(_, next)) = chars.peek() {
            if !next.is_whitespace() {
                break;
            }
            chars.next();
        }
        start = chars.peek().map_or(text.len(), |&(j, _)| j);
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

/// Groups consecutive sentences into segments of at most `max_chars`
/// characters. A single sentence longer than the limit becomes its own
/// segment.
pub fn split_into_segments(text: &str, max_chars: usize) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();

    for sentence in split_sentences(text.trim()) {
        if sentence.is_empty() {
            continue;
        }
        let current_len = current.chars().count();
        if current_len + sentence.chars().count() > max_chars {
            if !current.is_empty() {
                segments.push(current.trim().to_string());
            }
            current = sentence.to_string();
        } else if current.is_empty() {
            current = sentence.to_string();
        } else {
            current.push(' ');
            current.push_str(sentence);
        }
    }

    if !current.is_empty() {
        segments.push(current.trim().to_string());
    }
    segments
}

/// The text that drives frame generation: the first segment, or the whole
/// trimmed text when nothing could be segmented.
pub fn primary_prompt(text: &str) -> String {
    split_into_segments(text, SEGMENT_MAX_CHARS)
        .into_iter()
        .next()
        .unwrap_or_else(|| text.trim().to_string())
}
