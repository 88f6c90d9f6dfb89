//! Keyword occurrence search and context snippets.
//!
//! Matching is case-insensitive and literal: the keyword is escaped before it
//! reaches the regex engine, so `a.b` only ever matches the text `a.b`.

use std::ops::Range;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

/// Characters of context kept on each side of an occurrence.
pub const CONTEXT_CHARS: usize = 30;

/// Marker wrapped around every snippet.
pub const ELLIPSIS: &str = "...";

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Compiled case-insensitive literal matcher for one keyword.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    pattern: Regex,
}

impl KeywordMatcher {
    /// Returns `None` for an empty keyword.
    pub fn new(keyword: &str) -> Option<Self> {
        if keyword.is_empty() {
            return None;
        }

        RegexBuilder::new(&regex::escape(keyword))
            .case_insensitive(true)
            .build()
            .ok()
            .map(|pattern| Self { pattern })
    }

    /// Non-overlapping byte ranges, left to right.
    pub fn find_in(&self, haystack: &str) -> Vec<Range<usize>> {
        self.pattern.find_iter(haystack).map(|m| m.range()).collect()
    }

    /// One snippet per occurrence, in occurrence order.
    pub fn snippets(&self, haystack: &str) -> Vec<String> {
        self.find_in(haystack)
            .into_iter()
            .map(|range| snippet_at(haystack, range))
            .collect()
    }
}

/// Find all case-insensitive literal occurrences of `keyword` in `haystack`.
///
/// Empty inputs yield no occurrences.
pub fn find_occurrences(haystack: &str, keyword: &str) -> Vec<Range<usize>> {
    if haystack.is_empty() {
        return Vec::new();
    }
    KeywordMatcher::new(keyword)
        .map(|matcher| matcher.find_in(haystack))
        .unwrap_or_default()
}

/// Snippets for every occurrence of `keyword` in `haystack`.
pub fn extract_snippets(haystack: &str, keyword: &str) -> Vec<String> {
    find_occurrences(haystack, keyword)
        .into_iter()
        .map(|range| snippet_at(haystack, range))
        .collect()
}

/// Build the snippet for one occurrence.
///
/// Takes up to [`CONTEXT_CHARS`] characters either side of `range`, collapses
/// whitespace runs, trims, and wraps with [`ELLIPSIS`].
pub fn snippet_at(haystack: &str, range: Range<usize>) -> String {
    let start = context_start(haystack, range.start);
    let end = context_end(haystack, range.end);
    let context = collapse_whitespace(&haystack[start..end]);
    format!("{ELLIPSIS}{context}{ELLIPSIS}")
}

/// Replace whitespace runs with single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

fn context_start(haystack: &str, start: usize) -> usize {
    haystack[..start]
        .char_indices()
        .rev()
        .nth(CONTEXT_CHARS - 1)
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn context_end(haystack: &str, end: usize) -> usize {
    haystack[end..]
        .char_indices()
        .nth(CONTEXT_CHARS)
        .map(|(i, _)| end + i)
        .unwrap_or(haystack.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_keyword_is_literal() {
        assert!(find_occurrences("axb", "a.b").is_empty());
        assert_eq!(find_occurrences("see a.b here", "a.b"), vec![4..7]);
        assert_eq!(find_occurrences("price (USD) $5", "(usd)"), vec![6..11]);
        assert_eq!(find_occurrences("a+b a+b", "a+b").len(), 2);
    }

    #[test]
    fn test_case_insensitive_preserves_casing() {
        let snippets = extract_snippets("Please LOGIN here", "login");
        assert_eq!(snippets, vec!["...Please LOGIN here...".to_string()]);
    }

    #[test]
    fn test_empty_inputs_yield_nothing() {
        assert!(find_occurrences("", "login").is_empty());
        assert!(find_occurrences("login", "").is_empty());
        assert!(KeywordMatcher::new("").is_none());
    }

    #[test]
    fn test_occurrences_do_not_overlap() {
        assert_eq!(find_occurrences("aaaa", "aa"), vec![0..2, 2..4]);
    }

    #[test]
    fn test_context_is_bounded() {
        let prefix = "x".repeat(50);
        let suffix = "y".repeat(50);
        let haystack = format!("{prefix}KEY{suffix}");
        let snippets = extract_snippets(&haystack, "key");
        assert_eq!(
            snippets[0],
            format!("...{}KEY{}...", "x".repeat(30), "y".repeat(30))
        );
    }

    #[test]
    fn test_context_counts_characters_not_bytes() {
        let haystack = format!("{}token{}", "é".repeat(40), "ü".repeat(40));
        let snippets = extract_snippets(&haystack, "TOKEN");
        assert_eq!(
            snippets[0],
            format!("...{}token{}...", "é".repeat(30), "ü".repeat(30))
        );
    }

    #[test]
    fn test_whitespace_collapsed_and_trimmed() {
        let haystack = "\n\n   var   secret\t=\n  'x';   ";
        let snippets = extract_snippets(haystack, "secret");
        assert_eq!(snippets, vec!["...var secret = 'x';...".to_string()]);
    }

    #[test]
    fn test_not_line_bounded() {
        let haystack = "first line\nlogin\nthird line";
        let snippets = extract_snippets(haystack, "login");
        assert_eq!(snippets, vec!["...first line login third line...".to_string()]);
    }

    proptest! {
        #[test]
        fn prop_occurrences_sorted_and_disjoint(
            haystack in "[a-cA-C .*]{0,200}",
            keyword in "[a-cA-C.*]{1,3}",
        ) {
            let ranges = find_occurrences(&haystack, &keyword);
            for pair in ranges.windows(2) {
                prop_assert!(pair[0].end <= pair[1].start);
            }
            for range in &ranges {
                prop_assert!(haystack[range.clone()].eq_ignore_ascii_case(&keyword));
            }
        }

        #[test]
        fn prop_snippet_contains_matched_text(
            haystack in "[a-z \\n\\t]{0,120}",
            keyword in "[a-z]{1,4}",
        ) {
            for range in find_occurrences(&haystack, &keyword) {
                let matched = &haystack[range.clone()];
                let snippet = snippet_at(&haystack, range);
                prop_assert!(snippet.starts_with(ELLIPSIS));
                prop_assert!(snippet.ends_with(ELLIPSIS));
                prop_assert!(snippet.contains(matched));
            }
        }
    }
}
