//! Text Utilities
//!
//! Character-aware truncation, display-name sanitization and word wrapping.

const ELLIPSIS: &str = "...";

/// Cuts `s` to at most `max_len` characters, ending in `...` when shortened.
///
/// Counts `char`s, so multi-byte names are never split mid-codepoint.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }

    let keep = max_len.saturating_sub(ELLIPSIS.len());
    let mut out: String = s.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// True when fewer than half of the characters are ASCII letters or digits.
///
/// Empty strings count as mostly special.
pub fn is_mostly_special(s: &str) -> bool {
    let total = s.chars().count();
    if total == 0 {
        return true;
    }

    let alphanumeric = s.chars().filter(|c| c.is_ascii_alphanumeric()).count();
    alphanumeric * 2 < total
}

/// Greedy word wrap on single spaces.
///
/// A word moves to a new line once appending it (with its separating space)
/// would exceed `max_len`. A word longer than `max_len` gets a line of its own.
pub fn wrap_text(text: &str, max_len: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split(' ') {
        let current_len = current.chars().count();
        if current_len > 0 && current_len + 1 + word.chars().count() > max_len {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        } else {
            if current_len > 0 {
                current.push(' ');
            }
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::MAX_NAME_LENGTH;
    use proptest::prelude::*;

    #[test]
    fn test_truncate_long() {
        let out = truncate("abcdefghijklmnopqrstuvwxyz", MAX_NAME_LENGTH);
        assert_eq!(out, "abcdefghijk...");
        assert_eq!(out.chars().count(), 14);
    }

    #[test]
    fn test_truncate_short_and_exact() {
        assert_eq!(truncate("real_user", 14), "real_user");
        assert_eq!(truncate("exactly14chars", 14), "exactly14chars");
    }

    #[test]
    fn test_truncate_multibyte() {
        let out = truncate("ñññññññññññññññññ", 14);
        assert_eq!(out.chars().count(), 14);
        assert!(out.starts_with("ñññññññññññ"));
    }

    #[test]
    fn test_mostly_special() {
        assert!(is_mostly_special("????"));
        assert!(is_mostly_special(""));
        assert!(is_mostly_special("a★★★"));
        assert!(!is_mostly_special("ab★★"));
        assert!(!is_mostly_special("Real Name"));
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(
            wrap_text("the quick brown fox", 10),
            vec!["the quick", "brown fox"]
        );
        assert_eq!(wrap_text("short", 10), vec!["short"]);
        assert_eq!(
            wrap_text("supercalifragilistic is long", 10),
            vec!["supercalifragilistic", "is long"]
        );
        assert!(wrap_text("", 10).is_empty());
    }

    proptest! {
        #[test]
        fn prop_truncate_never_exceeds_limit(s in "\\PC{0,40}", max in 3usize..30) {
            let out = truncate(&s, max);
            prop_assert!(out.chars().count() <= max);
            if s.chars().count() <= max {
                prop_assert_eq!(out, s);
            } else {
                prop_assert!(out.ends_with("..."));
            }
        }

        #[test]
        fn prop_wrap_preserves_words(words in prop::collection::vec("[a-z]{1,12}", 1..20), max in 5usize..30) {
            let text = words.join(" ");
            let lines = wrap_text(&text, max);

            let rejoined: Vec<String> = lines
                .iter()
                .flat_map(|l| l.split(' ').map(str::to_string))
                .collect();
            prop_assert_eq!(rejoined, words);

            for line in &lines {
                prop_assert!(line.chars().count() <= max || !line.contains(' '));
            }
        }
    }
}
