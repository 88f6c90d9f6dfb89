//! Zone scanner - finds keyword matches in body text, inline scripts and comments.
//!
//! Each capture is parsed with `scraper` (html5ever), which never rejects
//! input: malformed markup degrades into a partial tree instead of an error.
//! Archive-injected chrome is detached from the tree before any zone is read.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::debug;

use crate::snippet::{collapse_whitespace, KeywordMatcher};
use crate::types::{Match, MatchType};

/// Comments carrying this phrase are the archive's own footer annotations.
pub const ARCHIVE_FOOTER_MARKER: &str = "FILE ARCHIVED ON";

/// Toolbar and info-panel containers the archive inserts into every replay.
static ARCHIVE_CHROME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#wm-ipp-base, #wm-ipp, #donato").unwrap());

static SCRIPT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("script").unwrap());

static BODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").unwrap());

/// Elements whose text is never visible content.
const NON_VISIBLE: &[&str] = &["script", "style", "template"];

/// Applies the keyword search to each document zone.
#[derive(Debug, Clone)]
pub struct ZoneScanner {
    instrumentation_domain: String,
}

impl Default for ZoneScanner {
    fn default() -> Self {
        Self::new(crate::types::config::DEFAULT_INSTRUMENTATION_DOMAIN)
    }
}

impl ZoneScanner {
    /// `instrumentation_domain` marks `<script src>` values injected by the archive.
    pub fn new(instrumentation_domain: impl Into<String>) -> Self {
        Self {
            instrumentation_domain: instrumentation_domain.into().to_ascii_lowercase(),
        }
    }

    /// Scan one capture. Matches come back in zone order: TEXT, JS, COMMENT.
    pub fn scan(
        &self,
        raw_html: &str,
        keyword: &str,
        timestamp: &str,
        archive_url: &str,
    ) -> Vec<Match> {
        let Some(matcher) = KeywordMatcher::new(keyword) else {
            return Vec::new();
        };

        let mut document = Html::parse_document(raw_html);
        if !document.errors.is_empty() {
            debug!(
                timestamp = %timestamp,
                parse_errors = document.errors.len(),
                "Capture HTML parsed with recoverable errors"
            );
        }
        self.strip_archive_chrome(&mut document);

        let to_match = |match_type: MatchType| {
            move |snippet: String| Match::new(timestamp, archive_url, match_type, snippet)
        };

        let mut matches = Vec::new();

        let text = body_text(&document);
        matches.extend(matcher.snippets(&text).into_iter().map(to_match(MatchType::Text)));

        for script in script_bodies(&document) {
            matches.extend(matcher.snippets(&script).into_iter().map(to_match(MatchType::Js)));
        }

        for comment in comment_bodies(&document) {
            matches.extend(
                matcher
                    .snippets(&comment)
                    .into_iter()
                    .map(to_match(MatchType::Comment)),
            );
        }

        matches
    }

    /// Detach toolbar containers and archive-hosted scripts.
    fn strip_archive_chrome(&self, document: &mut Html) {
        let root = document.root_element();
        let doomed: Vec<_> = root
            .select(&ARCHIVE_CHROME)
            .chain(root.select(&SCRIPT).filter(|script| {
                script
                    .value()
                    .attr("src")
                    .is_some_and(|src| src.to_ascii_lowercase().contains(&self.instrumentation_domain))
            }))
            .map(|el| el.id())
            .collect();

        for id in doomed {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }
    }
}

/// Visible text of `<body>`: trimmed text nodes joined by spaces, whitespace collapsed.
fn body_text(document: &Html) -> String {
    let Some(body) = document.root_element().select(&BODY).next() else {
        return String::new();
    };

    let pieces: Vec<&str> = body
        .descendants()
        .filter_map(|node| node.value().as_text().map(|text| (node, text)))
        .filter(|(node, _)| {
            !node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| NON_VISIBLE.contains(&el.name()))
            })
        })
        .map(|(_, text)| text.trim())
        .filter(|text| !text.is_empty())
        .collect();

    collapse_whitespace(&pieces.join(" "))
}

/// Inline text of every remaining `<script>`, one entry per element.
fn script_bodies(document: &Html) -> Vec<String> {
    document
        .root_element()
        .select(&SCRIPT)
        .map(|script| script.text().collect::<String>())
        .filter(|body| !body.trim().is_empty())
        .collect()
}

/// Every comment in the tree except archive footers.
fn comment_bodies(document: &Html) -> Vec<String> {
    document
        .tree
        .root()
        .descendants()
        .filter_map(|node| node.value().as_comment().map(|c| c.to_string()))
        .filter(|comment| !comment.contains(ARCHIVE_FOOTER_MARKER))
        .collect()
}
