//! Preview extraction around the first query term.
//!
//! All offsets are in characters, so a preview never splits a UTF-8 sequence
//! and never exceeds the configured window.

use regex::RegexBuilder;

/// Excerpt of at most `window` characters centred on the first
/// case-insensitive occurrence of `tokens[0]` in `content`.
///
/// Tokens are stems, so the first one is not always a literal substring of
/// the text (`happi` for "happy"). When it cannot be found the preview is the
/// first `window` characters of the document.
pub fn extract(content: &str, tokens: &[String], window: usize) -> String {
    let anchor = tokens.first().and_then(|term| find_case_insensitive(content, term));
    match anchor {
        Some(byte_idx) => {
            let pos = content[..byte_idx].chars().count();
            let start = pos.saturating_sub(window / 2);
            content.chars().skip(start).take(window).collect()
        }
        None => content.chars().take(window).collect(),
    }
}

/// Byte offset of the first case-insensitive occurrence of `needle`.
pub(crate) fn find_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    let pat = RegexBuilder::new(&regex::escape(needle))
        .case_insensitive(true)
        .build()
        .ok()?;
    pat.find(haystack).map(|m| m.start())
}

/// Byte offset `chars` characters before `byte_idx`, clamped to the start.
pub(crate) fn step_back(text: &str, byte_idx: usize, chars: usize) -> usize {
    text[..byte_idx]
        .char_indices()
        .rev()
        .take(chars)
        .last()
        .map_or(byte_idx, |(i, _)| i)
}

/// Byte offset `chars` characters after `byte_idx`, clamped to the end.
pub(crate) fn step_forward(text: &str, byte_idx: usize, chars: usize) -> usize {
    text[byte_idx..]
        .char_indices()
        .nth(chars)
        .map_or(text.len(), |(i, _)| byte_idx + i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn centres_on_first_token() {
        let content = format!("{}needle{}", "a".repeat(50), "b".repeat(50));
        let preview = extract(&content, &toks(&["needl"]), 20);
        assert_eq!(preview.chars().count(), 20);
        assert!(preview.contains("needl"));
        assert_eq!(preview, format!("{}needle{}", "a".repeat(10), "b".repeat(4)));
    }

    #[test]
    fn start_clamps_to_zero() {
        let preview = extract("needle in a haystack", &toks(&["needl"]), 10);
        assert_eq!(preview, "needle in ");
    }

    #[test]
    fn end_clamps_to_content_length() {
        let preview = extract("short needle", &toks(&["needl"]), 100);
        assert_eq!(preview, "short needle");
    }

    #[test]
    fn match_is_case_insensitive() {
        let preview = extract("xxxx NEEDLE", &toks(&["needl"]), 6);
        assert_eq!(preview, "xx NEE");
    }

    #[test]
    fn missing_token_falls_back_to_head() {
        let preview = extract("I am so happy today", &toks(&["happi"]), 8);
        assert_eq!(preview, "I am so ");
    }

    #[test]
    fn empty_tokens_fall_back_to_head() {
        assert_eq!(extract("abcdef", &[], 3), "abc");
    }

    #[test]
    fn multibyte_content_is_not_split() {
        let content = "ééééé needle ééééé";
        let preview = extract(content, &toks(&["needl"]), 8);
        assert_eq!(preview.chars().count(), 8);
        assert_eq!(preview, "ééé need");
    }

    #[test]
    fn step_helpers_clamp() {
        let text = "héllo";
        assert_eq!(step_back(text, 3, 10), 0);
        assert_eq!(step_back(text, 3, 1), 1);
        assert_eq!(step_back(text, 3, 0), 3);
        assert_eq!(step_forward(text, 0, 2), 3);
        assert_eq!(step_forward(text, 0, 10), text.len());
    }
}
