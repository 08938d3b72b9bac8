use crate::parsing::blocks::TextBlock;

/// Validates parser output invariants.
///
/// Asserts that:
/// - Concatenating block contents reproduces `source` exactly
/// - Spans are contiguous, start at 0 and end at `source.len()`
/// - Each block's span slices back to its content
/// - Line ranges are non-empty and follow each other without gaps
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(source: &str, blocks: &[TextBlock]) {
    let joined: String = blocks.iter().map(|b| b.content.as_str()).collect();
    assert_eq!(joined, source, "block contents do not reproduce the source");

    let mut offset = 0;
    let mut next_line = 1;
    for b in blocks {
        assert_eq!(
            b.span.start, offset,
            "gap or overlap before block {:?} at lines {}-{}",
            b.kind, b.line_start, b.line_end
        );
        assert_eq!(
            &source[b.span.start..b.span.end],
            b.content,
            "span does not slice back to content for {:?}",
            b.kind
        );
        assert!(
            b.line_start <= b.line_end,
            "inverted line range {}-{}",
            b.line_start,
            b.line_end
        );
        assert_eq!(b.line_start, next_line, "line numbering skipped before {:?}", b.kind);
        offset = b.span.end;
        next_line = b.line_end + 1;
    }
    assert_eq!(offset, source.len(), "blocks do not cover the whole source");
}
