use crate::scanner::find_subslice;

const TITLE_OPEN: &[u8] = b"<title";

/// Extracts the text of the first `<title` tag, or an empty string
///
/// The text starts after the tag's closing `>` and stops at the next `<`.
/// Only the first title-like tag is considered; the match is case-sensitive.
pub fn extract_title(html: &[u8]) -> String {
    let Some(open) = find_subslice(html, TITLE_OPEN) else {
        return String::new();
    };

    let rest = &html[open + TITLE_OPEN.len()..];
    let end = rest.iter().position(|&b| b == b'<').unwrap_or(rest.len());
    let tag_and_text = &rest[..end];

    match tag_and_text.iter().position(|&b| b == b'>') {
        Some(close) => String::from_utf8_lossy(&tag_and_text[close + 1..]).into_owned(),
        None => String::new(),
    }
}
