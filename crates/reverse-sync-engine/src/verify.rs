//! Roundtrip verifier: exact comparison of the intended text with the text
//! the forward converter produced from the patched markup.

use serde::Serialize;
use similar::TextDiff;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyResult {
    pub passed: bool,
    /// Unified diff, expected against actual. Empty when `passed`.
    pub diff_report: String,
}

/// Compares `expected` with `actual`. Trailing whitespace on each line is
/// ignored; everything else must match exactly.
pub fn verify(expected: &str, actual: &str) -> VerifyResult {
    let expected = trim_line_ends(expected);
    let actual = trim_line_ends(actual);
    if expected == actual {
        return VerifyResult {
            passed: true,
            diff_report: String::new(),
        };
    }

    let diff = TextDiff::from_lines(&expected, &actual);
    let diff_report = diff
        .unified_diff()
        .context_radius(3)
        .header("expected (edited text)", "actual (roundtrip text)")
        .to_string();
    VerifyResult {
        passed: false,
        diff_report,
    }
}

fn trim_line_ends(text: &str) -> String {
    text.split('\n').map(str::trim_end).collect::<Vec<_>>().join("\n")
}
