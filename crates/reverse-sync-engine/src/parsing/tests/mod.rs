//! Tests for the block parser.
//!
//! Every case also runs the lossless invariants from `snapshot::invariants`.

use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::parsing::{
    blocks::BlockKind,
    parse_blocks,
    snapshot::{invariants, render},
};

const PAGE: &str = "---
title: Intro
---
import { Callout } from 'nextra'

# Intro

Some text
continues here.
* one
* two
  continued

* three

```python
print(1)
```
<figure>
<img/>
</figure>

<Callout>
Note
</Callout>
";

#[test]
fn page_blocks_snapshot() {
    let blocks = parse_blocks(PAGE);
    invariants(PAGE, &blocks);

    insta::assert_snapshot!(render(&blocks), @r##"
    frontmatter 1-3 "---\ntitle: Intro\n---\n"
    import 4-4 "import { Callout } from 'nextra'\n"
    empty 5-5 "\n"
    heading 6-6 "# Intro\n"
    empty 7-7 "\n"
    paragraph 8-9 "Some text\ncontinues here.\n"
    list 10-14 "* one\n* two\n  continued\n\n* three\n"
    empty 15-15 "\n"
    code 16-18 "```python\nprint(1)\n```\n"
    html 19-21 "<figure>\n<img/>\n</figure>\n"
    empty 22-22 "\n"
    paragraph 23-24 "<Callout>\nNote\n"
    html 25-25 "</Callout>\n"
    "##);
}

#[rstest]
#[case("")]
#[case("\n")]
#[case("no trailing newline")]
#[case("## Title\n\nParagraph.\n")]
#[case("line one\r\nline two\r\n\r\n- item\r\n")]
#[case("```\nunterminated fence\nstill code")]
#[case("---\nunterminated: frontmatter\n")]
#[case("- a\n\n\n- b\n")]
#[case("접근 제어를 설정합니다.\n\n* 항목 하나 😀\n")]
fn roundtrip_law_holds(#[case] text: &str) {
    let blocks = parse_blocks(text);
    invariants(text, &blocks);
}

#[test]
fn empty_document_has_no_blocks() {
    assert!(parse_blocks("").is_empty());
}

#[test]
fn blank_lines_become_empty_blocks() {
    let kinds: Vec<BlockKind> = parse_blocks("\n\n\n").iter().map(|b| b.kind).collect();
    assert_eq!(kinds, vec![BlockKind::Empty; 3]);
}

#[test]
fn unterminated_fence_runs_to_end() {
    let blocks = parse_blocks("text\n```\ncode\nmore");
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[1].kind, BlockKind::Code);
    assert_eq!(blocks[1].content, "```\ncode\nmore");
    assert_eq!((blocks[1].line_start, blocks[1].line_end), (2, 4));
}

#[test]
fn list_stops_at_blank_line_without_continuation() {
    let blocks = parse_blocks("- a\n- b\n\nafter\n");
    let kinds: Vec<BlockKind> = blocks.iter().map(|b| b.kind).collect();
    assert_eq!(
        kinds,
        vec![BlockKind::List, BlockKind::Empty, BlockKind::Paragraph]
    );
    assert_eq!(blocks[0].content, "- a\n- b\n");
}

#[test]
fn double_blank_line_ends_list() {
    let blocks = parse_blocks("- a\n\n\n- b\n");
    let kinds: Vec<BlockKind> = blocks.iter().map(|b| b.kind).collect();
    assert_eq!(
        kinds,
        vec![
            BlockKind::List,
            BlockKind::Empty,
            BlockKind::Empty,
            BlockKind::List
        ]
    );
}

#[test]
fn markdown_table_parses_as_paragraph() {
    let text = "| a | b |\n| --- | --- |\n| 1 | 2 |\n";
    let blocks = parse_blocks(text);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].kind, BlockKind::Paragraph);
}

#[test]
fn heading_interrupts_paragraph() {
    let blocks = parse_blocks("text\n## Heading\n");
    let kinds: Vec<BlockKind> = blocks.iter().map(|b| b.kind).collect();
    assert_eq!(kinds, vec![BlockKind::Paragraph, BlockKind::Heading]);
}
