//! Idempotent replacement of a generated section inside a host document.
//!
//! A region starts at the line carrying the fragment's heading and runs up
//! to (but excluding) the next line holding a heading of equal-or-higher
//! level, or to the end of the document. The splice keeps exactly one blank
//! line between the fragment and a following heading, so re-applying the
//! same fragment is a no-op on every path.

use crate::heading::parse_heading;

/// Splices `fragment` over its previous occurrence in `document`.
///
/// The fragment's first line is the region heading. When no region exists
/// yet the fragment is inserted just before the first `anchor` heading that
/// is not the document's opening line, or appended to the right-trimmed
/// document after one blank line when the anchor is absent.
pub fn replace_region(document: &str, fragment: &str, anchor: Option<&str>) -> String {
    let heading = fragment.lines().next().unwrap_or("");
    let level = match parse_heading(heading) {
        Some((level, _)) => level,
        // A fragment without a real heading can still be spliced; any
        // heading then bounds the region.
        None => u8::MAX,
    };
    let body = fragment.trim_end();

    if let Some((start, end)) = find_region(document, heading, level) {
        let mut out = String::with_capacity(document.len() + body.len() + 1);
        out.push_str(&document[..start]);
        out.push_str(body);
        out.push('\n');
        out.push_str(&document[end..]);
        return out;
    }

    if let Some(anchor) = anchor {
        if let Some(at) = find_anchor(document, anchor) {
            let mut out = String::with_capacity(document.len() + body.len() + 2);
            out.push_str(&document[..at]);
            out.push('\n');
            out.push_str(body);
            out.push('\n');
            out.push_str(&document[at..]);
            return out;
        }
    }

    format!("{}\n\n{}\n", document.trim_end(), body)
}

/// Byte span of the existing region: from the heading line up to (but not
/// including) the newline that precedes the next bounding heading, or to
/// the end of the document.
fn find_region(document: &str, heading: &str, level: u8) -> Option<(usize, usize)> {
    if heading.is_empty() {
        return None;
    }
    let mut offset = 0;
    let mut start = None;
    for line in document.split_inclusive('\n') {
        let content = line.strip_suffix('\n').unwrap_or(line);
        match start {
            None => {
                if content.starts_with(heading) {
                    start = Some(offset);
                }
            }
            Some(begin) => {
                if let Some((found, _)) = parse_heading(content) {
                    if found <= level {
                        return Some((begin, offset - 1));
                    }
                }
            }
        }
        offset += line.len();
    }
    start.map(|begin| (begin, document.len()))
}

/// Byte position of the newline preceding the first `anchor` line. The
/// opening line of the document cannot anchor an insertion.
fn find_anchor(document: &str, anchor: &str) -> Option<usize> {
    if anchor.is_empty() {
        return None;
    }
    let mut offset = 0;
    for line in document.split_inclusive('\n') {
        let content = line.strip_suffix('\n').unwrap_or(line);
        if offset > 0 && content.starts_with(anchor) {
            return Some(offset - 1);
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAGMENT: &str = "## Issues\n\nupdated list\n";

    #[test]
    fn replaces_region_between_headings() {
        let doc = "# Doc\n\n## Issues\n\nstale list\n\n## Integration\nnotes\n";
        let out = replace_region(doc, FRAGMENT, Some("## Integration"));
        assert_eq!(out, "# Doc\n\n## Issues\n\nupdated list\n\n## Integration\nnotes\n");
    }

    #[test]
    fn replaces_region_running_to_end_of_document() {
        let doc = "# Doc\n\n## Issues\n\nstale list\n\n\n";
        let out = replace_region(doc, FRAGMENT, None);
        assert_eq!(out, "# Doc\n\n## Issues\n\nupdated list\n");
    }

    #[test]
    fn higher_level_heading_bounds_the_region() {
        let doc = "## Issues\n\nstale\n# Appendix\ntail\n";
        let out = replace_region(doc, FRAGMENT, None);
        assert_eq!(out, "## Issues\n\nupdated list\n\n# Appendix\ntail\n");
    }

    #[test]
    fn lower_level_heading_stays_inside_the_region() {
        let doc = "## Issues\n\n### detail\nstale\n\n## Next\n";
        let out = replace_region(doc, FRAGMENT, None);
        assert_eq!(out, "## Issues\n\nupdated list\n\n## Next\n");
    }

    #[test]
    fn inserts_before_anchor_when_region_is_missing() {
        let doc = "# Doc\nintro\n\n## Integration\nnotes\n";
        let out = replace_region(doc, FRAGMENT, Some("## Integration"));
        assert_eq!(
            out,
            "# Doc\nintro\n\n## Issues\n\nupdated list\n\n## Integration\nnotes\n"
        );
    }

    #[test]
    fn appends_when_anchor_is_missing() {
        let doc = "# Doc\nintro\n";
        let out = replace_region(doc, FRAGMENT, Some("## Integration"));
        assert_eq!(out, "# Doc\nintro\n\n## Issues\n\nupdated list\n");
    }

    #[test]
    fn appends_when_no_anchor_is_designated() {
        let out = replace_region("# Doc\n", FRAGMENT, None);
        assert_eq!(out, "# Doc\n\n## Issues\n\nupdated list\n");
    }

    #[test]
    fn replacement_is_idempotent_on_every_path() {
        let docs = [
            // splice path
            "# Doc\n\n## Issues\n\nstale\n\n## Integration\nnotes\n",
            // insert-before-anchor path
            "# Doc\nintro\n\n## Integration\nnotes\n",
            // append path
            "# Doc\nintro\n",
            // empty document
            "",
        ];
        for doc in docs {
            let once = replace_region(doc, FRAGMENT, Some("## Integration"));
            let twice = replace_region(&once, FRAGMENT, Some("## Integration"));
            assert_eq!(once, twice, "second application must be a no-op for {:?}", doc);
        }
    }

    #[test]
    fn extra_trailing_newlines_in_fragment_do_not_accumulate() {
        let doc = "## Issues\nold\n\n## Integration\n";
        let ragged = "## Issues\n\nupdated list\n\n\n";
        let out = replace_region(doc, ragged, None);
        assert_eq!(out, "## Issues\n\nupdated list\n\n## Integration\n");
    }

    #[test]
    fn region_heading_immediately_followed_by_boundary() {
        let doc = "## Issues\n## Integration\n";
        let out = replace_region(doc, FRAGMENT, None);
        assert_eq!(out, "## Issues\n\nupdated list\n\n## Integration\n");
    }

    #[test]
    fn only_the_first_region_is_replaced() {
        let doc = "## Issues\none\n\n## Other\n\n## Issues\ntwo\n";
        let out = replace_region(doc, FRAGMENT, None);
        assert_eq!(
            out,
            "## Issues\n\nupdated list\n\n## Other\n\n## Issues\ntwo\n"
        );
    }

    #[test]
    fn anchor_on_the_opening_line_does_not_anchor() {
        let doc = "## Integration\nnotes\n";
        let out = replace_region(doc, FRAGMENT, Some("## Integration"));
        assert_eq!(out, "## Integration\nnotes\n\n## Issues\n\nupdated list\n");
    }
}
