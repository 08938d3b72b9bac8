//! Text transfer: replays an `old -> new` edit onto a third text that
//! differs from `old` only in whitespace layout.
//!
//! All offsets are in `char`s.

use std::ops::Range;

use similar::{Algorithm, DiffTag, capture_diff_slices};

/// One step of a char-level edit script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOp {
    pub tag: DiffTag,
    pub old: Range<usize>,
    pub new: Range<usize>,
}

/// Char-level edit script from `old` to `new`.
///
/// Equal runs no longer than the edits on both sides are folded into one
/// replacement, so a stray shared letter inside a rewritten word does not
/// split the edit in two.
pub fn edit_ops(old: &[char], new: &[char]) -> Vec<EditOp> {
    let mut ops: Vec<EditOp> = Vec::new();
    // Ranges are rebuilt from op lengths: the index a diff op reports on the
    // side it does not touch is not always adjacent to its neighbours.
    let (mut old_pos, mut new_pos) = (0, 0);
    for op in capture_diff_slices(Algorithm::Myers, old, new) {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        let (old_len, new_len) = match tag {
            DiffTag::Equal => (old_range.len(), old_range.len()),
            DiffTag::Delete => (old_range.len(), 0),
            DiffTag::Insert => (0, new_range.len()),
            DiffTag::Replace => (old_range.len(), new_range.len()),
        };
        push_op(
            &mut ops,
            EditOp {
                tag,
                old: old_pos..old_pos + old_len,
                new: new_pos..new_pos + new_len,
            },
        );
        old_pos += old_len;
        new_pos += new_len;
    }

    let mut i = 1;
    while i + 1 < ops.len() {
        let (before, eq, after) = (&ops[i - 1], &ops[i], &ops[i + 1]);
        let short = eq.tag == DiffTag::Equal
            && before.tag != DiffTag::Equal
            && after.tag != DiffTag::Equal
            && eq.old.len() <= edit_size(before)
            && eq.old.len() <= edit_size(after);
        if !short {
            i += 1;
            continue;
        }
        let merged = edit(before.old.start..after.old.end, before.new.start..after.new.end);
        ops.splice(i - 1..=i + 1, [merged]);
        i = i.saturating_sub(1).max(1);
    }
    ops
}

fn edit_size(op: &EditOp) -> usize {
    op.old.len().max(op.new.len())
}

fn edit(old: Range<usize>, new: Range<usize>) -> EditOp {
    let tag = match (old.is_empty(), new.is_empty()) {
        (true, _) => DiffTag::Insert,
        (false, true) => DiffTag::Delete,
        (false, false) => DiffTag::Replace,
    };
    EditOp { tag, old, new }
}

/// Appends `op`, fusing it with a preceding non-equal op.
fn push_op(ops: &mut Vec<EditOp>, op: EditOp) {
    if op.old.is_empty() && op.new.is_empty() {
        return;
    }
    if let Some(last) = ops.last_mut()
        && last.tag != DiffTag::Equal
        && op.tag != DiffTag::Equal
    {
        *last = edit(last.old.start..op.old.end, last.new.start..op.new.end);
        return;
    }
    ops.push(op);
}

/// Character alignment from a source text onto a target text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    /// Source index to target index.
    map: Vec<Option<usize>>,
    /// For the last char of a paired whitespace run: end of the target run.
    run_end: Vec<Option<usize>>,
}

impl Alignment {
    /// Aligns non-whitespace characters globally, then pairs the k-th
    /// whitespace run of each gap between anchors on both sides.
    pub fn new(source: &[char], target: &[char]) -> Self {
        let src_solid: Vec<usize> = solid_indices(source);
        let tgt_solid: Vec<usize> = solid_indices(target);
        let src_chars: Vec<char> = src_solid.iter().map(|&i| source[i]).collect();
        let tgt_chars: Vec<char> = tgt_solid.iter().map(|&i| target[i]).collect();

        let mut map = vec![None; source.len()];
        let mut anchors: Vec<(usize, usize)> = Vec::new();
        for op in capture_diff_slices(Algorithm::Myers, &src_chars, &tgt_chars) {
            let (tag, old, new) = op.as_tag_tuple();
            if tag == DiffTag::Equal {
                for (i, j) in old.zip(new) {
                    map[src_solid[i]] = Some(tgt_solid[j]);
                    anchors.push((src_solid[i], tgt_solid[j]));
                }
            }
        }

        let mut run_end = vec![None; source.len()];
        let mut lower: Option<(usize, usize)> = None;
        for upper in anchors
            .iter()
            .copied()
            .chain(std::iter::once((source.len(), target.len())))
        {
            let (s_from, t_from) = lower.map_or((0, 0), |(s, t)| (s + 1, t + 1));
            let src_runs = whitespace_runs(source, s_from, upper.0);
            let tgt_runs = whitespace_runs(target, t_from, upper.1);
            for (src, tgt) in src_runs.into_iter().zip(tgt_runs) {
                let tgt_last = tgt.end - 1;
                for (k, s) in src.clone().enumerate() {
                    map[s] = Some((tgt.start + k).min(tgt_last));
                }
                run_end[src.end - 1] = Some(tgt.end);
            }
            lower = Some(upper);
        }

        Alignment { map, run_end }
    }

    pub fn target_of(&self, source: usize) -> Option<usize> {
        self.map.get(source).copied().flatten()
    }

    /// Target range covered by the source range, if any char in it is aligned.
    fn target_range(&self, source: Range<usize>) -> Option<Range<usize>> {
        let mut start: Option<usize> = None;
        let mut end: Option<usize> = None;
        for s in source {
            let Some(t) = self.target_of(s) else {
                continue;
            };
            let t_end = self.run_end[s].unwrap_or(t + 1);
            start = Some(start.map_or(t, |v| v.min(t)));
            end = Some(end.map_or(t_end, |v| v.max(t_end)));
        }
        Some(start?..end?)
    }

    /// Target position just after the nearest aligned char before `source`.
    fn insert_point(&self, source: usize) -> usize {
        (0..source)
            .rev()
            .find_map(|k| self.target_of(k))
            .map_or(0, |t| t + 1)
    }
}

fn solid_indices(text: &[char]) -> Vec<usize> {
    text.iter()
        .enumerate()
        .filter(|(_, c)| !c.is_whitespace())
        .map(|(i, _)| i)
        .collect()
}

/// Maximal whitespace runs within `text[from..to]`.
fn whitespace_runs(text: &[char], from: usize, to: usize) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut i = from;
    while i < to {
        if text[i].is_whitespace() {
            let start = i;
            while i < to && text[i].is_whitespace() {
                i += 1;
            }
            runs.push(start..i);
        } else {
            i += 1;
        }
    }
    runs
}

/// Applies the edit `old -> new` to `target`, keeping `target`'s own
/// whitespace where the edit does not touch it.
///
/// When `target == old` the result is `new`.
pub fn transfer(old: &str, new: &str, target: &str) -> String {
    let old: Vec<char> = old.chars().collect();
    let new: Vec<char> = new.chars().collect();
    let mut result: Vec<char> = target.chars().collect();
    let alignment = Alignment::new(&old, &result);

    let mut edits: Vec<(usize, usize, &[char])> = Vec::new();
    for EditOp {
        tag,
        old: old_range,
        new: new_range,
    } in edit_ops(&old, &new)
    {
        match tag {
            DiffTag::Equal => {}
            DiffTag::Insert => {
                let at = alignment.insert_point(old_range.start);
                edits.push((at, at, &new[new_range]));
            }
            DiffTag::Delete | DiffTag::Replace => {
                let replacement: &[char] = if tag == DiffTag::Delete {
                    &[]
                } else {
                    &new[new_range]
                };
                match alignment.target_range(old_range.clone()) {
                    Some(range) => edits.push((range.start, range.end, replacement)),
                    // Source-only whitespace: nothing to delete, but a
                    // replacement still lands where it was.
                    None if !replacement.is_empty() => {
                        let at = alignment.insert_point(old_range.start);
                        edits.push((at, at, replacement));
                    }
                    None => {}
                }
            }
        }
    }

    edits.sort_by_key(|(start, _, _)| *start);
    let mut limit = result.len();
    for (start, end, replacement) in edits.into_iter().rev() {
        let end = end.min(limit);
        let start = start.min(end);
        result.splice(start..end, replacement.iter().copied());
        limit = start;
    }

    result.into_iter().collect()
}
