//! Anchor link extraction
//!
//! # Extraction Rules
//!
//! - An anchor region opens at `<a ` and closes at the next `>`; a region that
//!   never closes is dropped.
//! - Inside a region, the first `href=` whose token starts right after a space
//!   wins. The byte after `=` is the delimiter and the value runs until that
//!   byte recurs (or the region ends). There is no escaping.
//! - Empty values, `#`, and anything containing `http:` or `https:` are skipped.
//! - Output is deduplicated, keeping first-occurrence order.

use std::collections::HashSet;

/// Extracts unique host-relative link paths from raw HTML bytes
///
/// # Example
///
/// ```
/// use phrase_crawl::scanner::extract_links;
///
/// let html = br#"<a href="/a">A</a><a href='/b'>B</a><a href="/a">again</a>"#;
/// assert_eq!(extract_links(html), vec!["/a", "/b"]);
/// ```
pub fn extract_links(html: &[u8]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for region in anchor_regions(html) {
        let Some(link) = find_href(region) else {
            continue;
        };

        if is_host_relative(&link) && seen.insert(link.clone()) {
            links.push(link);
        }
    }

    links
}

/// Collects the attribute span of every closed `<a ...>` tag
fn anchor_regions(html: &[u8]) -> Vec<&[u8]> {
    let mut regions = Vec::new();
    let mut open: Option<usize> = None;

    for (index, &byte) in html.iter().enumerate() {
        if byte == b'<' && html.get(index + 1) == Some(&b'a') && html.get(index + 2) == Some(&b' ')
        {
            // Region starts at the space so the first attribute token is delimited
            open = Some(index + 2);
        } else if byte == b'>' {
            if let Some(start) = open.take() {
                regions.push(&html[start..index]);
            }
        }
    }

    regions
}

/// Finds the value of the `href` attribute inside an anchor region
fn find_href(region: &[u8]) -> Option<String> {
    let mut token_start = 0;

    for (index, &byte) in region.iter().enumerate() {
        if byte == b' ' {
            token_start = index + 1;
        } else if byte == b'=' && &region[token_start..index] == b"href" {
            let Some(&delimiter) = region.get(index + 1) else {
                return Some(String::new());
            };

            let value = region.get(index + 2..).unwrap_or(&[]);
            let len = value
                .iter()
                .position(|&b| b == delimiter)
                .unwrap_or(value.len());

            return Some(String::from_utf8_lossy(&value[..len]).into_owned());
        }
    }

    None
}

fn is_host_relative(link: &str) -> bool {
    !link.is_empty() && link != "#" && !link.contains("https:") && !link.contains("http:")
}
