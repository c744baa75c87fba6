//! Title extraction for markdown issue files.

use crate::frontmatter::body_after_frontmatter;
use crate::heading::parse_heading;

/// Placeholder returned when a document has no level-1 heading.
pub const UNTITLED: &str = "Untitled";

/// First level-1 heading after any leading frontmatter block, trimmed.
///
/// Headings whose text trims to empty are skipped, so the result is never
/// an empty string; a document without a usable heading yields [`UNTITLED`].
pub fn extract_title(text: &str) -> String {
    let body = body_after_frontmatter(text);
    for line in body.lines() {
        if let Some((1, title)) = parse_heading(line) {
            return title.to_string();
        }
    }
    UNTITLED.to_string()
}
