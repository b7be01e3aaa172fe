//! Word wrapping.

/// Wrap `text` into lines of at most `max_len` characters.
///
/// Existing line breaks are kept. Lines break at the last whitespace that
/// fits; a single word longer than `max_len` is split hard. Runs of
/// whitespace between words collapse to one space.
#[must_use]
pub fn wrap_text(text: &str, max_len: usize) -> Vec<String> {
    let max_len = max_len.max(1);
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        wrap_paragraph(paragraph.trim_end_matches('\r'), max_len, &mut lines);
    }
    lines
}

fn wrap_paragraph(paragraph: &str, max_len: usize, lines: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_len = 0;

    for word in paragraph.split_whitespace() {
        let word_len = word.chars().count();

        if current_len > 0 && current_len + 1 + word_len <= max_len {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
            continue;
        }

        if current_len > 0 {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if word_len <= max_len {
            current.push_str(word);
            current_len = word_len;
            continue;
        }

        let chars: Vec<char> = word.chars().collect();
        let mut chunks = chars.chunks(max_len).peekable();
        while let Some(chunk) = chunks.next() {
            let piece: String = chunk.iter().collect();
            if chunks.peek().is_some() {
                lines.push(piece);
            } else {
                current_len = chunk.len();
                current = piece;
            }
        }
    }

    lines.push(current);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breaks_at_whitespace() {
        assert_eq!(
            wrap_text("the quick brown fox jumps", 10),
            vec!["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn test_exact_fit() {
        assert_eq!(wrap_text("abcde fghij", 11), vec!["abcde fghij"]);
        assert_eq!(wrap_text("abcde fghij", 10), vec!["abcde", "fghij"]);
    }

    #[test]
    fn test_long_token_hard_break() {
        assert_eq!(
            wrap_text("a abcdefghijkl b", 5),
            vec!["a", "abcde", "fghij", "kl b"]
        );
    }

    #[test]
    fn test_keeps_explicit_breaks() {
        assert_eq!(wrap_text("one\n\ntwo", 80), vec!["one", "", "two"]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(wrap_text("", 10), vec![""]);
    }
}
