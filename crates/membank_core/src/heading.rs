//! ATX heading recognition.

/// Parses a markdown ATX heading anchored at the start of a line.
///
/// Returns the heading level (1..=6) and the trimmed heading text. Lines
/// that are indented, carry more than six hashes, lack a whitespace
/// separator, or trim to empty text are not headings.
pub fn parse_heading(line: &str) -> Option<(u8, &str)> {
    let hashes = line.bytes().take_while(|byte| *byte == b'#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &line[hashes..];
    if !rest.starts_with(' ') && !rest.starts_with('\t') {
        return None;
    }
    let text = rest.trim();
    if text.is_empty() {
        return None;
    }
    Some((hashes as u8, text))
}
