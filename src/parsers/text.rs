use crate::parsers::ParseResult;

/// Parses plain text content (no links)
///
/// Normalizes the body by trimming each line, dropping empty lines, and
/// collapsing runs of whitespace into single spaces. Punctuation and URLs
/// pass through untouched.
pub fn parse(text: &str) -> ParseResult {
    if text.trim().is_empty() {
        return ParseResult::content_only(String::new());
    }

    let normalized = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(normalize_segment)
        .collect::<Vec<_>>()
        .join(" ");

    ParseResult::content_only(normalized)
}

/// Normalizes whitespace within a single line or paragraph
pub fn normalize_segment(segment: &str) -> String {
    segment.split_whitespace().collect::<Vec<_>>().join(" ")
}
