/// Split a message into its raw segments.
///
/// SS-MIX2 terminates segments with `<CR>`, but files that went through other
/// tooling often carry `<LF>` or `<CR><LF>`; all three are accepted. Trailing
/// whitespace is trimmed and blank lines are skipped.
pub fn split_segments(message: &str) -> impl Iterator<Item = &str> {
    message
        .split(['\r', '\n'])
        .map(str::trim_end)
        .filter(|segment| !segment.is_empty())
}

/// The three-character segment type of a raw segment.
pub fn segment_tag(segment: &str) -> &str {
    segment.get(..3).unwrap_or(segment)
}
