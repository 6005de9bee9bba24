//! Plain-text layout helpers. Widths are counted in chars.

/// Greedy word wrap.
///
/// Line breaks in `text` are kept; blank input lines become empty lines.
/// Words longer than `width` are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        let mut current_len = 0;
        for word in paragraph.split_whitespace() {
            let mut word = word;
            while word.chars().count() > width {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let split_at = word
                    .char_indices()
                    .nth(width)
                    .map_or(word.len(), |(i, _)| i);
                lines.push(word[..split_at].to_string());
                word = &word[split_at..];
            }
            if word.is_empty() {
                continue;
            }

            let word_len = word.chars().count();
            if current_len == 0 {
                current.push_str(word);
                current_len = word_len;
            } else if current_len + 1 + word_len <= width {
                current.push(' ');
                current.push_str(word);
                current_len += 1 + word_len;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
                current_len = word_len;
            }
        }
        if current_len > 0 {
            lines.push(current);
        }
    }

    lines
}

/// Shortens `text` to `width` chars, ending in `...` when cut.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width <= 3 {
        return text.chars().take(width).collect();
    }
    let mut cut: String = text.chars().take(width - 3).collect();
    cut.push_str("...");
    cut
}

/// Centers `text` in a field of `width` chars, padding both sides.
pub fn center(text: &str, width: usize) -> String {
    let text = truncate(text, width);
    let len = text.chars().count();
    let left = (width - len) / 2;
    let right = width - len - left;
    format!("{}{text}{}", " ".repeat(left), " ".repeat(right))
}

/// A line of `width` copies of `ch`.
pub fn rule(ch: char, width: usize) -> String {
    ch.to_string().repeat(width)
}

/// Draws an ASCII box `width` chars wide around centered lines.
pub fn boxed(lines: &[String], width: usize) -> Vec<String> {
    let width = width.max(4);
    let inner = width - 4;
    let border = format!("+{}+", rule('-', width - 2));

    let mut out = Vec::with_capacity(lines.len() + 2);
    out.push(border.clone());
    for line in lines {
        out.push(format!("| {} |", center(line, inner)));
    }
    out.push(border);
    out
}

/// A banner like `== SCENE 3 =====`, `width` chars wide.
pub fn banner(label: &str, width: usize) -> String {
    let head = format!("== {} ", truncate(label, width.saturating_sub(4)));
    let fill = width.saturating_sub(head.chars().count());
    format!("{head}{}", rule('=', fill))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_at_word_boundaries() {
        assert_eq!(
            wrap("the quick brown fox jumps over the lazy dog", 10),
            ["the quick", "brown fox", "jumps over", "the lazy", "dog"]
        );
    }

    #[test]
    fn keeps_paragraph_breaks() {
        assert_eq!(wrap("one\n\ntwo", 20), ["one", "", "two"]);
        assert!(wrap("", 20).is_empty());
    }

    #[test]
    fn splits_long_words() {
        assert_eq!(wrap("a abcdefghij b", 4), ["a", "abcd", "efgh", "ij b"]);
    }

    #[test]
    fn truncates_with_ellipsis() {
        assert_eq!(truncate("screenplay", 7), "scre...");
        assert_eq!(truncate("short", 7), "short");
        assert_eq!(truncate("abcdef", 2), "ab");
    }

    #[test]
    fn centers_with_padding_on_both_sides() {
        assert_eq!(center("ab", 7), "  ab   ");
    }

    #[test]
    fn boxes_lines() {
        let lines = boxed(&["hi".to_string()], 10);
        assert_eq!(lines, ["+--------+", "|   hi   |", "+--------+"]);
    }

    #[test]
    fn banner_fills_width() {
        let line = banner("SCENE 1", 20);
        assert_eq!(line, "== SCENE 1 =========");
        assert_eq!(line.chars().count(), 20);
    }
}
