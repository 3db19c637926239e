//! Whitespace cleanup applied to every extracted body.

use std::sync::LazyLock;

use regex::Regex;

static LINE_ENDINGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r\n?").unwrap());
static TRAILING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\S\n]+\n").unwrap());
static BLANK_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());
static INLINE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\S\n]{2,}").unwrap());

/// Normalize whitespace in a body.
///
/// - CRLF and lone CR become LF
/// - whitespace at the end of a line is dropped
/// - three or more consecutive newlines become exactly two
/// - two or more consecutive non-newline whitespace characters become one space
/// - leading and trailing whitespace is trimmed
///
/// Idempotent: applying it to its own output changes nothing.
pub fn normalize_whitespace(text: &str) -> String {
    let text = LINE_ENDINGS.replace_all(text, "\n");
    let text = TRAILING.replace_all(&text, "\n");
    let text = BLANK_RUNS.replace_all(&text, "\n\n");
    let text = INLINE_RUNS.replace_all(&text, " ");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_blank_lines_and_spaces() {
        assert_eq!(
            normalize_whitespace("Hello\n\n\n\nWorld   !"),
            "Hello\n\nWorld !"
        );
    }

    #[test]
    fn keeps_single_and_double_newlines() {
        assert_eq!(normalize_whitespace("a\nb\n\nc"), "a\nb\n\nc");
    }

    #[test]
    fn tabs_and_nbsp_runs_become_one_space() {
        assert_eq!(normalize_whitespace("a\t\t b\u{a0}\u{a0}c"), "a b c");
    }

    #[test]
    fn space_only_lines_count_as_blank() {
        assert_eq!(normalize_whitespace("a \n \n \n b"), "a\n\n b");
        assert_eq!(normalize_whitespace("a\t\n\t\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn trailing_spaces_dropped() {
        assert_eq!(normalize_whitespace("one  \ntwo\t\nthree"), "one\ntwo\nthree");
    }

    #[test]
    fn crlf_counts_as_newline() {
        assert_eq!(normalize_whitespace("a\r\n\r\n\r\n\r\nb"), "a\n\nb");
    }

    #[test]
    fn trims_both_ends() {
        assert_eq!(normalize_whitespace("\n\n  body  \n\n"), "body");
    }

    #[test]
    fn whitespace_only_becomes_empty() {
        assert_eq!(normalize_whitespace(" \t\n\n\n "), "");
    }

    #[test]
    fn idempotent() {
        let samples = [
            "Hello\n\n\n\nWorld   !",
            "  a \n \n \n b\t\tc  ",
            "line\r\n\r\n\r\nnext  \u{2003}\u{2003}word",
            "\n\n\n",
            "No Content",
        ];
        for sample in samples {
            let once = normalize_whitespace(sample);
            assert_eq!(normalize_whitespace(&once), once, "sample {sample:?}");
        }
    }
}
