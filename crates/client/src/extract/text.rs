//! Markup stripping for scraped text fields.

use scraper::Html;

/// Plain text of a markup fragment.
///
/// Text nodes are trimmed, blank ones dropped, and the rest joined with
/// single spaces in document order. Malformed markup degrades to whatever
/// text the parser recovers.
pub fn markup_text(fragment: &str) -> String {
    let parsed = Html::parse_fragment(fragment);
    parsed
        .root_element()
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
