use crate::parsing::rope::span::Span;

use super::{
    classify::{LineClass, Opener},
    kinds::{CodeFence, Frontmatter},
    types::{BlockKind, TextBlock},
};

/// Phase 2 of block parsing: groups classified lines into [`TextBlock`]s.
///
/// Classification is greedy and in a fixed order: frontmatter, blank line,
/// fenced code, heading, import, markup block, list, paragraph. Every line
/// lands in exactly one block, so no byte of the source is lost.
pub struct BlockBuilder<'a> {
    lines: &'a [LineClass],
    pos: usize,
    out: Vec<TextBlock>,
}

impl<'a> BlockBuilder<'a> {
    pub fn new(lines: &'a [LineClass]) -> Self {
        Self {
            lines,
            pos: 0,
            out: vec![],
        }
    }

    pub fn finish(mut self) -> Vec<TextBlock> {
        while self.pos < self.lines.len() {
            self.next_block();
        }
        self.out
    }

    fn next_block(&mut self) {
        let start = self.pos;
        let first = &self.lines[start];

        if first.is_blank {
            self.emit(BlockKind::Empty, start, start + 1);
            return;
        }

        match first.opener {
            Some(Opener::Frontmatter) => {
                let end = self.scan_closing(start, |l| Frontmatter::is_delimiter(l.body()));
                self.emit(BlockKind::Frontmatter, start, end);
            }
            Some(Opener::CodeFence) => {
                let end = self.scan_closing(start, |l| CodeFence::is_fence(l.body()));
                self.emit(BlockKind::Code, start, end);
            }
            Some(Opener::Heading) => self.emit(BlockKind::Heading, start, start + 1),
            Some(Opener::Import) => self.emit(BlockKind::Import, start, start + 1),
            Some(Opener::Markup) => {
                let end = self.scan_while(start + 1, |l| !l.is_blank);
                self.emit(BlockKind::Html, start, end);
            }
            Some(Opener::ListItem) => {
                let end = self.scan_list(start + 1);
                self.emit(BlockKind::List, start, end);
            }
            None => {
                let end = self.scan_while(start + 1, |l| !l.interrupts_paragraph());
                self.emit(BlockKind::Paragraph, start, end);
            }
        }
    }

    /// Finds the line after the first line matching `closes` past `start`.
    /// Runs to the end of input when the block is never closed.
    fn scan_closing(&self, start: usize, closes: impl Fn(&LineClass) -> bool) -> usize {
        let mut i = start + 1;
        while i < self.lines.len() {
            if closes(&self.lines[i]) {
                return i + 1;
            }
            i += 1;
        }
        self.lines.len()
    }

    fn scan_while(&self, from: usize, keep: impl Fn(&LineClass) -> bool) -> usize {
        let mut i = from;
        while i < self.lines.len() && keep(&self.lines[i]) {
            i += 1;
        }
        i
    }

    /// A list continues over item lines and indented continuations. A blank
    /// line only stays inside the list when a continuation line follows it.
    fn scan_list(&self, from: usize) -> usize {
        let mut i = from;
        while i < self.lines.len() {
            let line = &self.lines[i];
            if line.is_blank {
                match self.lines.get(i + 1) {
                    Some(next) if next.is_list_continuation => {
                        i += 1;
                        continue;
                    }
                    _ => break,
                }
            }
            if !line.is_list_continuation {
                break;
            }
            i += 1;
        }
        i
    }

    fn emit(&mut self, kind: BlockKind, start: usize, end: usize) {
        let lines = &self.lines[start..end];
        let content: String = lines.iter().map(|l| l.text.as_str()).collect();
        let span = lines
            .iter()
            .map(|l| l.line)
            .reduce(Span::cover)
            .unwrap_or_default();
        self.out.push(TextBlock {
            kind,
            content,
            line_start: lines.first().map_or(0, |l| l.number),
            line_end: lines.last().map_or(0, |l| l.number),
            span,
        });
        self.pos = end;
    }
}
