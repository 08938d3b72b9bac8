//! End-to-end runs over the page fixtures in `tests/fixtures/<name>/`:
//! `original.mdx`, `edited.mdx`, `page.xhtml` and the expected
//! `expected.xhtml` after patching.

use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use rstest::rstest;

use reverse_sync_engine::{
    ConvertError, MatchOptions, PatchPayload, SyncStatus, plan, record_mapping, run,
};

struct Fixture {
    original: String,
    edited: String,
    page: String,
    expected: String,
}

fn fixture(name: &str) -> Fixture {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let read = |file: &str| {
        fs::read_to_string(dir.join(file)).unwrap_or_else(|e| panic!("{name}/{file}: {e}"))
    };
    Fixture {
        original: read("original.mdx"),
        edited: read("edited.mdx"),
        page: read("page.xhtml"),
        expected: read("expected.xhtml"),
    }
}

#[rstest]
#[case("paragraph", &["p[1]"])]
#[case("layout", &["p[1]"])]
#[case("table", &["table[1]"])]
#[case("list", &["ul[1]"])]
#[case("callout", &["macro-info[1]/p[1]", "macro-info[1]/p[2]"])]
#[case("code", &["macro-code[1]"])]
fn patches_reproduce_expected_markup(#[case] name: &str, #[case] paths: &[&str]) {
    let fx = fixture(name);
    let plan = plan(&fx.original, &fx.edited, &fx.page, &MatchOptions::default()).unwrap();

    let patched: Vec<&str> = plan.patches.iter().map(|p| p.path.as_str()).collect();
    assert_eq!(patched, paths);
    assert_eq!(plan.patched_markup, fx.expected);
}

#[rstest]
#[case("paragraph")]
#[case("table")]
#[case("list")]
#[case("callout")]
#[case("code")]
fn roundtrip_passes_when_converter_reproduces_edit(#[case] name: &str) {
    let fx = fixture(name);
    let edited = fx.edited.clone();
    let converter = move |_: &str| -> Result<String, ConvertError> { Ok(edited.clone()) };

    let outcome = run(&fx.original, &fx.edited, &fx.page, &converter, &MatchOptions::default()).unwrap();
    assert_eq!(outcome.status, SyncStatus::Pass);
}

#[test]
fn paragraph_patch_carries_old_and_new_text() {
    let fx = fixture("paragraph");
    let plan = plan(&fx.original, &fx.edited, &fx.page, &MatchOptions::default()).unwrap();

    assert_eq!(plan.changes.len(), 1);
    assert_eq!(plan.patches[0].old_plain_text, "Paragraph.");
    assert_eq!(
        plan.patches[0].payload,
        PatchPayload::NewPlainText("Modified.".to_string())
    );
}

#[test]
fn unchanged_page_yields_no_changes() {
    let fx = fixture("callout");
    let converter = |_: &str| -> Result<String, ConvertError> {
        Err(ConvertError::Failed {
            message: "not expected".to_string(),
        })
    };

    let outcome = run(&fx.original, &fx.original, &fx.page, &converter, &MatchOptions::default()).unwrap();
    assert_eq!(outcome.status, SyncStatus::NoChanges);
    assert!(outcome.plan.patches.is_empty());
    assert_eq!(outcome.plan.patched_markup, fx.page);
}

#[test]
fn table_edit_touches_one_cell_only() {
    let fx = fixture("table");
    let plan = plan(&fx.original, &fx.edited, &fx.page, &MatchOptions::default()).unwrap();

    let before = record_mapping(&fx.page);
    assert_eq!(plan.patched_markup.matches("<tr>").count(), 3);
    assert_eq!(plan.patched_markup.matches("<td>").count(), 4);
    assert_eq!(before[1].plain_text, "NameValuealphafirst valuebetatwo");
    assert_eq!(plan.patched_mapping[1].plain_text, "NameValuealphasecond valuebetatwo");
}

#[test]
fn list_edit_leaves_other_items_byte_identical() {
    let fx = fixture("list");
    let plan = plan(&fx.original, &fx.edited, &fx.page, &MatchOptions::default()).unwrap();

    assert!(plan.patched_markup.contains("<li><p>Install the agent</p></li>"));
    assert!(plan.patched_markup.contains("<li><p>Restart the service</p></li>"));
}

#[test]
fn diverging_converter_output_fails_verification() {
    let fx = fixture("paragraph");
    let stale = fx.original.clone();
    let converter = move |_: &str| -> Result<String, ConvertError> { Ok(stale.clone()) };

    let outcome = run(&fx.original, &fx.edited, &fx.page, &converter, &MatchOptions::default()).unwrap();
    assert_eq!(outcome.status, SyncStatus::Fail);

    let report = outcome.verification.map(|v| v.diff_report).unwrap_or_default();
    assert!(report.contains("-Modified."), "{report}");
    assert!(report.contains("+Paragraph."), "{report}");
    assert!(!report.contains("-## Title"), "{report}");
}

#[test]
fn edits_never_share_a_record() {
    let fx = fixture("callout");
    let plan = plan(&fx.original, &fx.edited, &fx.page, &MatchOptions::default()).unwrap();

    let mut paths: Vec<&str> = plan.patches.iter().map(|p| p.path.as_str()).collect();
    paths.sort_unstable();
    paths.dedup();
    assert_eq!(paths.len(), plan.patches.len());
}

#[test]
fn shrinking_paragraph_edit_is_applied() {
    let plan = plan(
        "## Title\n\nSome long paragraph text.\n",
        "## Title\n\nShort text.\n",
        "<h2>Title</h2><p>Some long paragraph text.</p>",
        &MatchOptions::default(),
    )
    .unwrap();

    assert_eq!(plan.patched_markup, "<h2>Title</h2><p>Short text.</p>");
}

#[test]
fn contained_and_direct_edits_to_one_record_compose() {
    let plan = plan(
        "Repeat this sentence\n\nRepeat this sentence please.\n",
        "Repeat that sentence\n\nRepeat this sentence now.\n",
        "<p>Repeat this sentence please.</p>",
        &MatchOptions::default(),
    )
    .unwrap();

    let paths: Vec<&str> = plan.patches.iter().map(|p| p.path.as_str()).collect();
    assert_eq!(paths, vec!["p[1]"]);
    assert_eq!(plan.patched_markup, "<p>Repeat that sentence now.</p>");
}
