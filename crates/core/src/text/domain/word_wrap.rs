/// Greedy word wrap: packs whitespace-separated words into lines of at
/// most `width` characters. Words longer than `width` are split.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        for piece in split_long_word(word, width) {
            let piece_len = piece.chars().count();
            let needed = if current_len == 0 {
                piece_len
            } else {
                current_len + 1 + piece_len
            };
            if needed > width && current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(piece);
            current_len += piece_len;
        }
    }

    if current_len > 0 {
        lines.push(current);
    }
    lines
}

fn split_long_word(word: &str, width: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut rest = word;
    while let Some((cut, _)) = rest.char_indices().nth(width) {
        pieces.push(&rest[..cut]);
        rest = &rest[cut..];
    }
    pieces.push(rest);
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_line() {
        assert_eq!(wrap_words("A cat playing piano", 40), vec!["A cat playing piano"]);
    }

    #[test]
    fn test_lines_never_exceed_width() {
        let text = "The quick brown fox jumps over the lazy dog while the band \
                    plays a slow waltz in the background of a rainy evening";
        let lines = wrap_words(text, 40);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.chars().count() <= 40, "line too long: {line:?}");
        }
        assert_eq!(lines.join(" "), text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_greedy_packing() {
        assert_eq!(wrap_words("aaa bbb ccc", 7), vec!["aaa bbb", "ccc"]);
    }

    #[test]
    fn test_long_word_is_split() {
        assert_eq!(wrap_words("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_collapses_whitespace_and_handles_empty() {
        assert_eq!(wrap_words("  a \n\t b  ", 40), vec!["a b"]);
        assert!(wrap_words("   ", 40).is_empty());
    }
}
