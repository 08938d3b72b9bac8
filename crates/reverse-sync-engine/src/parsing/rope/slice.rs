/// Truncates `text` to at most `max` characters with a "..." suffix.
///
/// Counts characters rather than bytes so Korean and emoji content never
/// gets cut inside a code point. Used for human-readable test output.
pub fn preview(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
