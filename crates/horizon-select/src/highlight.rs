//! Search normalization and label highlighting.
//!
//! Highlighting produces a typed list of [`TextRun`]s rather than markup. A
//! renderer walks the runs and decides how to emphasize matches, so label
//! content is always treated as data.
//!
//! # Matching Rules
//!
//! - The search text is split on whitespace into tokens.
//! - Tokens are sorted longest first, so a longer token wins over a shorter
//!   token it contains.
//! - All tokens are escaped and joined into a single case-insensitive
//!   alternation.
//! - Every non-overlapping occurrence in the label is highlighted, scanning
//!   left to right.
//!
//! # Example
//!
//! ```
//! use horizon_select::highlight::{highlight, TextRun};
//!
//! let text = highlight("Banana", "an");
//! assert_eq!(
//!     text.runs(),
//!     &[
//!         TextRun::Plain("B".into()),
//!         TextRun::Highlighted("an".into()),
//!         TextRun::Highlighted("an".into()),
//!         TextRun::Plain("a".into()),
//!     ]
//! );
//! assert_eq!(text.plain_text(), "Banana");
//! ```

use std::cmp::Reverse;
use std::fmt;

use horizon_select_core::logging::targets;
use regex::{Regex, RegexBuilder};

use crate::error::{Error, Result};

// ============================================================================
// Highlighted Text
// ============================================================================

/// A run of label text, either unmatched or matched by the search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextRun {
    /// Text that did not match any search token.
    Plain(String),
    /// Text matched by a search token.
    Highlighted(String),
}

impl TextRun {
    /// The text of this run, exactly as it appears in the label.
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(text) | Self::Highlighted(text) => text,
        }
    }

    /// Whether this run is a match.
    pub fn is_highlighted(&self) -> bool {
        matches!(self, Self::Highlighted(_))
    }
}

/// A label split into plain and highlighted runs.
///
/// Concatenating the runs always yields the original label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightedText {
    runs: Vec<TextRun>,
}

impl HighlightedText {
    /// Text with no highlighted runs.
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut highlighted = Self::default();
        highlighted.push_plain(&text);
        highlighted
    }

    /// The runs in label order.
    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    /// Whether any run is highlighted.
    pub fn has_highlights(&self) -> bool {
        self.runs.iter().any(TextRun::is_highlighted)
    }

    /// Number of highlighted runs.
    pub fn highlight_count(&self) -> usize {
        self.runs.iter().filter(|run| run.is_highlighted()).count()
    }

    /// The label with all emphasis stripped.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(TextRun::text).collect()
    }

    /// Render as HTML, escaping every run.
    ///
    /// `<mark>` is the only element ever emitted.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for run in &self.runs {
            match run {
                TextRun::Plain(text) => escape_html_into(text, &mut html),
                TextRun::Highlighted(text) => {
                    html.push_str("<mark>");
                    escape_html_into(text, &mut html);
                    html.push_str("</mark>");
                }
            }
        }
        html
    }

    fn push_plain(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(TextRun::Plain(last)) = self.runs.last_mut() {
            last.push_str(text);
        } else {
            self.runs.push(TextRun::Plain(text.to_string()));
        }
    }

    fn push_highlighted(&mut self, text: &str) {
        self.runs.push(TextRun::Highlighted(text.to_string()));
    }
}

impl fmt::Display for HighlightedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for run in &self.runs {
            f.write_str(run.text())?;
        }
        Ok(())
    }
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    escape_html_into(text, &mut escaped);
    escaped
}

fn escape_html_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}

// ============================================================================
// Normalizer
// ============================================================================

/// Split a search string into lowercase tokens, longest first.
///
/// Whitespace runs are collapsed and the ends trimmed before splitting.
/// Tokens of equal length keep their typed order.
pub fn normalize_query(search: &str) -> Vec<String> {
    let mut tokens: Vec<String> = search.split_whitespace().map(str::to_lowercase).collect();
    tokens.sort_by_key(|token| Reverse(token.chars().count()));
    tokens
}

// ============================================================================
// Matcher
// ============================================================================

/// A compiled search pattern, reusable across many labels.
#[derive(Debug, Clone)]
pub struct Matcher {
    pattern: Regex,
    tokens: Vec<String>,
}

impl Matcher {
    /// Compile a matcher for `search`.
    ///
    /// Returns `Ok(None)` when the search has no tokens (empty or
    /// whitespace-only), in which case labels render without highlights.
    pub fn new(search: &str) -> Result<Option<Self>> {
        Self::compile(search, None)
    }

    /// Compile a matcher, logging construction failures and treating them as
    /// "no highlighting".
    pub fn lenient(search: &str) -> Option<Self> {
        discard_failure(search, Self::new(search))
    }

    fn compile(search: &str, size_limit: Option<usize>) -> Result<Option<Self>> {
        let tokens = normalize_query(search);
        if tokens.is_empty() {
            return Ok(None);
        }

        let alternation = tokens
            .iter()
            .map(|token| regex::escape(token))
            .collect::<Vec<_>>()
            .join("|");

        let mut builder = RegexBuilder::new(&alternation);
        builder.case_insensitive(true);
        if let Some(limit) = size_limit {
            builder.size_limit(limit);
        }
        let pattern = builder
            .build()
            .map_err(|source| Error::pattern(search, source))?;

        tracing::trace!(target: targets::HIGHLIGHT, tokens = tokens.len(), "compiled matcher");
        Ok(Some(Self { pattern, tokens }))
    }

    /// The normalized tokens, longest first.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Whether any token occurs in `label`.
    pub fn is_match(&self, label: &str) -> bool {
        self.pattern.is_match(label)
    }

    /// Split `label` into plain and highlighted runs.
    pub fn highlight(&self, label: &str) -> HighlightedText {
        let mut text = HighlightedText::default();
        let mut last = 0;
        for found in self.pattern.find_iter(label) {
            text.push_plain(&label[last..found.start()]);
            text.push_highlighted(found.as_str());
            last = found.end();
        }
        text.push_plain(&label[last..]);
        text
    }
}

fn discard_failure(search: &str, result: Result<Option<Matcher>>) -> Option<Matcher> {
    match result {
        Ok(matcher) => matcher,
        Err(err) => {
            tracing::warn!(
                target: targets::HIGHLIGHT,
                search,
                error = %err,
                "falling back to unhighlighted labels"
            );
            None
        }
    }
}

/// Highlight every occurrence of the search tokens in `label`.
///
/// An empty search returns the label as a single plain run. If the pattern
/// cannot be built, the label is returned unhighlighted.
pub fn highlight(label: &str, search: &str) -> HighlightedText {
    match Matcher::lenient(search) {
        Some(matcher) => matcher.highlight(label),
        None => HighlightedText::plain(label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> TextRun {
        TextRun::Plain(text.to_string())
    }

    fn mark(text: &str) -> TextRun {
        TextRun::Highlighted(text.to_string())
    }

    #[test]
    fn test_empty_search_returns_label_verbatim() {
        let text = highlight("Banana", "");
        assert_eq!(text.runs(), &[plain("Banana")]);
        assert!(!text.has_highlights());
    }

    #[test]
    fn test_whitespace_search_returns_label_verbatim() {
        let text = highlight("Banana", "   ");
        assert_eq!(text.runs(), &[plain("Banana")]);
    }

    #[test]
    fn test_highlight_all_occurrences() {
        let text = highlight("Banana", "an");
        assert_eq!(text.runs(), &[plain("B"), mark("an"), mark("an"), plain("a")]);
        assert_eq!(text.to_html(), "B<mark>an</mark><mark>an</mark>a");
        assert_eq!(text.highlight_count(), 2);
    }

    #[test]
    fn test_highlight_preserves_label_case() {
        let text = highlight("Option with item", "OPTION");
        assert_eq!(text.runs(), &[mark("Option"), plain(" with item")]);
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  a   long\tword "), vec!["long", "word", "a"]);
        assert_eq!(normalize_query("Bb aa"), vec!["bb", "aa"]);
        assert!(normalize_query(" \n ").is_empty());
    }

    #[test]
    fn test_longer_token_wins() {
        let text = highlight("Long Long Option 3", "o long");
        assert_eq!(
            text.runs(),
            &[
                mark("Long"),
                plain(" "),
                mark("Long"),
                plain(" "),
                mark("O"),
                plain("pti"),
                mark("o"),
                plain("n 3"),
            ]
        );
    }

    #[test]
    fn test_special_characters_are_literal() {
        let text = highlight("C++ (beta) [x]", "c++ (beta");
        assert_eq!(
            text.runs(),
            &[mark("C++"), plain(" "), mark("(beta"), plain(") [x]")]
        );

        let text = highlight("a.b", ".");
        assert_eq!(text.runs(), &[plain("a"), mark("."), plain("b")]);

        let text = highlight("100% *", "*");
        assert_eq!(text.runs(), &[plain("100% "), mark("*")]);
    }

    #[test]
    fn test_round_trip_strips_to_label() {
        let labels = ["Banana", "Long Long Option 3", "<b>bold</b>", "ÄÖÜ äöü", "", "a|b"];
        let searches = ["an", "o long", "b", "ä", "|", "x y z", "(", "\\"];
        for label in labels {
            for search in searches {
                let text = highlight(label, search);
                assert_eq!(text.plain_text(), label, "label {label:?} search {search:?}");
                assert_eq!(text.to_string(), label);
            }
        }
    }

    #[test]
    fn test_html_escapes_label_content() {
        let text = highlight("<script>alert('x')</script>", "script");
        let html = text.to_html();
        assert!(!html.contains("<script>"));
        assert_eq!(
            html,
            "&lt;<mark>script</mark>&gt;alert(&#39;x&#39;)&lt;/<mark>script</mark>&gt;"
        );
    }

    #[test]
    fn test_matcher_reuse() {
        let matcher = Matcher::new("opt").unwrap().unwrap();
        assert_eq!(matcher.tokens(), &["opt".to_string()]);
        assert!(matcher.is_match("Option 7"));
        assert!(!matcher.is_match("Banana"));
        assert!(matcher.highlight("Option 7").has_highlights());
    }

    #[test]
    fn test_matcher_none_for_blank_search() {
        assert!(Matcher::new("").unwrap().is_none());
        assert!(Matcher::new("  ").unwrap().is_none());
    }

    #[test]
    fn test_construction_failure_falls_back_to_plain() {
        let search = "alpha beta gamma delta";
        let result = Matcher::compile(search, Some(1));
        assert!(matches!(result, Err(Error::Pattern { .. })));
        assert!(discard_failure(search, result).is_none());
    }

    #[test]
    fn test_plain_text_of_empty_label() {
        let text = HighlightedText::plain("");
        assert!(text.runs().is_empty());
        assert_eq!(text.plain_text(), "");
    }
}
