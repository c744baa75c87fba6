//! Flat frontmatter parsing.
//!
//! The dialect handled here is deliberately small: a leading `---` line, a
//! run of `key: value` lines, and a closing line consisting solely of `---`.
//! No nesting, no lists, no typed values. Parsing never fails; anything
//! malformed degrades to a partial or empty map.

use std::collections::BTreeMap;

const DELIMITER: &str = "---";

/// Splits text into the frontmatter block interior and the remaining body.
///
/// Returns `None` unless the text starts with the `---` delimiter and a
/// later line consists solely of `---`. The closing line must be exact:
/// a `---\r` line (CRLF input) does not close the block.
pub fn split_frontmatter(text: &str) -> Option<(&str, &str)> {
    if !text.starts_with(DELIMITER) {
        return None;
    }
    let mut lines = text.split_inclusive('\n');
    let opening = lines.next()?;
    let mut offset = opening.len();
    for line in lines {
        if line.strip_suffix('\n').unwrap_or(line) == DELIMITER {
            let inner = &text[opening.len()..offset];
            let body = &text[offset + line.len()..];
            return Some((inner, body));
        }
        offset += line.len();
    }
    None
}

/// Text remaining after a leading frontmatter block, or the whole text when
/// no block is present.
pub fn body_after_frontmatter(text: &str) -> &str {
    match split_frontmatter(text) {
        Some((_, body)) => body,
        None => text,
    }
}

/// Parses the leading frontmatter block into a key -> value map.
///
/// Each block line containing a colon is split on the first colon; key and
/// value are whitespace-trimmed and one layer of matching surrounding quotes
/// (double or single) is stripped from the value. Lines without a colon are
/// ignored, and a repeated key overwrites the earlier value.
pub fn parse_frontmatter(text: &str) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    let Some((block, _)) = split_frontmatter(text) else {
        return map;
    };
    for line in block.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = strip_matching_quotes(value.trim());
        map.insert(key.trim().to_string(), value.to_string());
    }
    map
}

fn strip_matching_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if (first == b'"' || first == b'\'') && bytes[bytes.len() - 1] == first {
            return &value[1..value.len() - 1];
        }
    }
    value
}
