//! Mapping recorder: one structural record per addressable markup block.

use serde::Serialize;

use crate::markup::{Document, Node, walk};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Heading,
    Paragraph,
    List,
    Table,
    Code,
    Html,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Heading => "heading",
            RecordKind::Paragraph => "paragraph",
            RecordKind::List => "list",
            RecordKind::Table => "table",
            RecordKind::Code => "code",
            RecordKind::Html => "html",
        }
    }
}

/// Correspondence between a markup block and the plain text it renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingRecord {
    /// `<kind>-<n>`, unique within one recording.
    pub id: String,
    pub kind: RecordKind,
    pub path: String,
    /// Inner markup for headings and paragraphs, outer markup otherwise.
    pub markup_text: String,
    pub plain_text: String,
    pub ordinal: usize,
    /// Records nested in this one's callout body.
    pub children: Vec<String>,
}

/// Parses `markup` and records its blocks.
pub fn record_mapping(markup: &str) -> Vec<MappingRecord> {
    record_document(&Document::parse(markup))
}

pub fn record_document(doc: &Document) -> Vec<MappingRecord> {
    let mut records: Vec<MappingRecord> = Vec::new();

    for site in walk::block_sites(doc) {
        let Some(node) = doc.node(&site.location) else {
            continue;
        };
        let (markup_text, plain_text) = match node {
            Node::Element(el) => match site.kind {
                RecordKind::Heading | RecordKind::Paragraph => (el.inner_markup(), el.text()),
                RecordKind::Code => {
                    let plain = walk::code_body(el)
                        .and_then(|p| el.descendant(&p))
                        .map(Node::text)
                        .unwrap_or_default();
                    (el.outer_markup(), plain)
                }
                RecordKind::List | RecordKind::Table | RecordKind::Html => {
                    (el.outer_markup(), el.text())
                }
            },
            Node::Text(text) => (text.raw.clone(), text.decoded()),
            Node::Raw(_) => continue,
        };

        let id = format!("{}-{}", site.kind.as_str(), records.len() + 1);
        if let Some(parent) = site.parent.and_then(|p| records.get_mut(p)) {
            parent.children.push(id.clone());
        }
        records.push(MappingRecord {
            id,
            kind: site.kind,
            path: site.path,
            markup_text: markup_text.trim().to_string(),
            plain_text: plain_text.trim().to_string(),
            ordinal: site.ordinal,
            children: Vec::new(),
        });
    }

    log::debug!("recorded {} markup blocks", records.len());
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn records_heading_and_paragraph() {
        let records = record_mapping("<h2>Title</h2><p>Paragraph <strong>bold</strong>.</p>");

        insta::assert_debug_snapshot!(records, @r#"
        [
            MappingRecord {
                id: "heading-1",
                kind: Heading,
                path: "h2[1]",
                markup_text: "Title",
                plain_text: "Title",
                ordinal: 1,
                children: [],
            },
            MappingRecord {
                id: "paragraph-2",
                kind: Paragraph,
                path: "p[1]",
                markup_text: "Paragraph <strong>bold</strong>.",
                plain_text: "Paragraph bold.",
                ordinal: 1,
                children: [],
            },
        ]
        "#);
    }

    #[test]
    fn lists_and_tables_keep_outer_markup() {
        let records = record_mapping("<ul><li><p>a</p></li><li><p>b</p></li></ul><table><tbody><tr><td>x</td></tr></tbody></table>");
        assert_eq!(records[0].kind, RecordKind::List);
        assert_eq!(records[0].markup_text, "<ul><li><p>a</p></li><li><p>b</p></li></ul>");
        assert_eq!(records[0].plain_text, "ab");
        assert_eq!(records[1].id, "table-2");
        assert_eq!(records[1].path, "table[1]");
    }

    #[test]
    fn code_macro_uses_plain_text_body() {
        let records = record_mapping(concat!(
            r#"<ac:structured-macro ac:name="code"><ac:parameter ac:name="language">python</ac:parameter>"#,
            "<ac:plain-text-body><![CDATA[print(1)\n]]></ac:plain-text-body></ac:structured-macro>",
        ));
        assert_eq!(records[0].kind, RecordKind::Code);
        assert_eq!(records[0].path, "macro-code[1]");
        assert_eq!(records[0].plain_text, "print(1)");
    }

    #[test]
    fn callout_children_are_registered_under_parent() {
        let records = record_mapping(concat!(
            r#"<ac:structured-macro ac:name="tip"><ac:rich-text-body>"#,
            "<p>Tip one.</p><p>Tip two.</p>",
            "</ac:rich-text-body></ac:structured-macro>",
        ));
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["html-1", "paragraph-2", "paragraph-3"]);
        assert_eq!(records[0].children, vec!["paragraph-2", "paragraph-3"]);
        assert_eq!(records[0].plain_text, "Tip one.Tip two.");
        assert_eq!(records[2].path, "macro-tip[1]/p[2]");
    }

    #[test]
    fn ids_are_unique() {
        let records = record_mapping("<p>a</p><p>b</p>text<h1>c</h1><hr/>");
        let mut ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), records.len());
    }
}
