//! Byte-level page scanner
//!
//! Extracts host-relative anchor links and the document title from raw HTML
//! bytes without building a DOM. The scanner is intentionally permissive:
//! malformed markup is scanned as-is and never reported as an error.

mod links;
mod title;

pub use links::extract_links;
pub use title::extract_title;

/// Returns the offset of the first occurrence of `needle` in `haystack`
pub(crate) fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Checks whether a page body contains the phrase as a literal byte substring
///
/// Matching is exact and case-sensitive; no tokenization or normalization is
/// applied to either side.
pub fn contains_phrase(body: &[u8], phrase: &str) -> bool {
    find_subslice(body, phrase.as_bytes()).is_some()
}
