/*!
 * Line alignment between an original and a processed subtitle file.
 *
 * Lines are aligned with Myers' linear-space shortest edit script. A run of
 * removed lines directly followed by a run of added lines is paired up
 * position by position as "modified", and each modified pair gets a
 * character-level highlight from its common prefix and suffix.
 */

use std::ops::{Index, IndexMut, Range};

use serde::Serialize;

use crate::subtitle_processor::SubtitleDocument;

/// How a row relates the two sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    Equal,
    Removed,
    Added,
    Modified,
}

/// A run of characters on one side of a row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffSegment {
    pub text: String,
    pub changed: bool,
}

impl DiffSegment {
    pub fn new(text: &str, changed: bool) -> Self {
        DiffSegment {
            text: text.to_string(),
            changed,
        }
    }
}

/// One aligned row. Concatenating a side's segments gives back that side's
/// line; a missing side has no segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffRow {
    pub kind: DiffKind,
    pub left: Option<String>,
    pub right: Option<String>,
    pub left_segments: Vec<DiffSegment>,
    pub right_segments: Vec<DiffSegment>,
}

impl DiffRow {
    fn equal(line: &str) -> Self {
        DiffRow {
            kind: DiffKind::Equal,
            left: Some(line.to_string()),
            right: Some(line.to_string()),
            left_segments: whole(line, false),
            right_segments: whole(line, false),
        }
    }

    fn removed(line: &str) -> Self {
        DiffRow {
            kind: DiffKind::Removed,
            left: Some(line.to_string()),
            right: None,
            left_segments: whole(line, true),
            right_segments: Vec::new(),
        }
    }

    fn added(line: &str) -> Self {
        DiffRow {
            kind: DiffKind::Added,
            left: None,
            right: Some(line.to_string()),
            left_segments: Vec::new(),
            right_segments: whole(line, true),
        }
    }

    fn modified(left: &str, right: &str) -> Self {
        let (left_segments, right_segments) = compute_diff(left, right);
        DiffRow {
            kind: DiffKind::Modified,
            left: Some(left.to_string()),
            right: Some(right.to_string()),
            left_segments,
            right_segments,
        }
    }

    /// Whether the row shows a difference
    pub fn is_change(&self) -> bool {
        self.kind != DiffKind::Equal
    }
}

fn whole(line: &str, changed: bool) -> Vec<DiffSegment> {
    if line.is_empty() {
        Vec::new()
    } else {
        vec![DiffSegment::new(line, changed)]
    }
}

/// Highlight the differing middle of two lines.
///
/// The longest common prefix and, within what is left, the longest common
/// suffix are unchanged; the middles are changed. Empty segments are
/// omitted, so identical lines give a single unchanged segment per side.
pub fn compute_diff(left: &str, right: &str) -> (Vec<DiffSegment>, Vec<DiffSegment>) {
    let a: Vec<char> = left.chars().collect();
    let b: Vec<char> = right.chars().collect();

    let prefix_len = a.iter().zip(&b).take_while(|(x, y)| x == y).count();
    let suffix_len = a[prefix_len..]
        .iter()
        .rev()
        .zip(b[prefix_len..].iter().rev())
        .take_while(|(x, y)| x == y)
        .count();

    let prefix: String = a[..prefix_len].iter().collect();
    let suffix: String = a[a.len() - suffix_len..].iter().collect();
    let a_mid: String = a[prefix_len..a.len() - suffix_len].iter().collect();
    let b_mid: String = b[prefix_len..b.len() - suffix_len].iter().collect();

    let build = |mid: &str| {
        let mut segments = Vec::new();
        if !prefix.is_empty() {
            segments.push(DiffSegment::new(&prefix, false));
        }
        if !mid.is_empty() {
            segments.push(DiffSegment::new(mid, true));
        }
        if !suffix.is_empty() {
            segments.push(DiffSegment::new(&suffix, false));
        }
        segments
    };

    (build(&a_mid), build(&b_mid))
}

#[derive(Clone, Copy)]
enum Op {
    Equal(usize),
    Remove(usize),
    Add(usize),
}

/// Forward or backward furthest-reaching x per diagonal `k`, indexed from `-max_d`
struct Frontier {
    offset: isize,
    x: Vec<usize>,
}

impl Frontier {
    fn new(max_d: usize) -> Self {
        Frontier {
            offset: max_d as isize,
            x: vec![0; 2 * max_d],
        }
    }
}

impl Index<isize> for Frontier {
    type Output = usize;

    fn index(&self, k: isize) -> &usize {
        &self.x[(k + self.offset) as usize]
    }
}

impl IndexMut<isize> for Frontier {
    fn index_mut(&mut self, k: isize) -> &mut usize {
        &mut self.x[(k + self.offset) as usize]
    }
}

fn max_d(n: usize, m: usize) -> usize {
    (n + m + 1) / 2 + 1
}

fn common_prefix_len<S: AsRef<str>>(a: &[S], b: &[S]) -> usize {
    a.iter()
        .zip(b)
        .take_while(|(x, y)| x.as_ref() == y.as_ref())
        .count()
}

fn common_suffix_len<S: AsRef<str>>(a: &[S], b: &[S]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x.as_ref() == y.as_ref())
        .count()
}

/// Myers' middle snake: a point on some shortest edit path through
/// `original[old]` and `processed[new]`, in absolute indices.
fn middle_snake<S: AsRef<str>>(
    original: &[S],
    old: Range<usize>,
    processed: &[S],
    new: Range<usize>,
    forward: &mut Frontier,
    backward: &mut Frontier,
) -> Option<(usize, usize)> {
    let n = old.len();
    let m = new.len();
    let delta = n as isize - m as isize;
    let odd = delta & 1 == 1;
    forward[1] = 0;
    backward[1] = 0;

    for d in 0..max_d(n, m) as isize {
        for k in (-d..=d).rev().step_by(2) {
            let mut x = if k == -d || (k != d && forward[k - 1] < forward[k + 1]) {
                forward[k + 1]
            } else {
                forward[k - 1] + 1
            };
            let y = (x as isize - k) as usize;
            let (x0, y0) = (x, y);
            if x < n && y < m {
                x += common_prefix_len(
                    &original[old.start + x..old.end],
                    &processed[new.start + y..new.end],
                );
            }
            forward[k] = x;
            if odd && (k - delta).abs() < d && forward[k] + backward[-(k - delta)] >= n {
                return Some((old.start + x0, new.start + y0));
            }
        }

        for k in (-d..=d).rev().step_by(2) {
            let mut x = if k == -d || (k != d && backward[k - 1] < backward[k + 1]) {
                backward[k + 1]
            } else {
                backward[k - 1] + 1
            };
            let mut y = (x as isize - k) as usize;
            if x < n && y < m {
                let advance = common_suffix_len(
                    &original[old.start..old.start + n - x],
                    &processed[new.start..new.start + m - y],
                );
                x += advance;
                y += advance;
            }
            backward[k] = x;
            if !odd && (k - delta).abs() <= d && backward[k] + forward[-(k - delta)] >= n {
                return Some((old.start + n - x, new.start + m - y));
            }
        }
    }
    None
}

/// Divide and conquer over middle snakes, appending ops in order
fn conquer<S: AsRef<str>>(
    original: &[S],
    mut old: Range<usize>,
    processed: &[S],
    mut new: Range<usize>,
    forward: &mut Frontier,
    backward: &mut Frontier,
    ops: &mut Vec<Op>,
) {
    let prefix = common_prefix_len(&original[old.clone()], &processed[new.clone()]);
    ops.extend((old.start..old.start + prefix).map(Op::Equal));
    old.start += prefix;
    new.start += prefix;

    let suffix = common_suffix_len(&original[old.clone()], &processed[new.clone()]);
    let suffix_start = old.end - suffix;
    old.end -= suffix;
    new.end -= suffix;

    if old.is_empty() || new.is_empty() {
        ops.extend(old.map(Op::Remove));
        ops.extend(new.map(Op::Add));
    } else if let Some((x, y)) = middle_snake(original, old.clone(), processed, new.clone(), forward, backward) {
        conquer(original, old.start..x, processed, new.start..y, forward, backward, ops);
        conquer(original, x..old.end, processed, y..new.end, forward, backward, ops);
    } else {
        ops.extend(old.map(Op::Remove));
        ops.extend(new.map(Op::Add));
    }

    ops.extend((suffix_start..suffix_start + suffix).map(Op::Equal));
}

/// Shortest edit script (Myers, linear space). Between two equal lines
/// every removal comes before every addition.
fn edit_script<S: AsRef<str>>(original: &[S], processed: &[S]) -> Vec<Op> {
    let (n, m) = (original.len(), processed.len());
    let mut forward = Frontier::new(max_d(n, m));
    let mut backward = Frontier::new(max_d(n, m));
    let mut raw = Vec::with_capacity(n.max(m));
    conquer(original, 0..n, processed, 0..m, &mut forward, &mut backward, &mut raw);

    let mut ops = Vec::with_capacity(raw.len());
    let mut pending_adds = Vec::new();
    for op in raw {
        match op {
            Op::Add(_) => pending_adds.push(op),
            Op::Remove(_) => ops.push(op),
            Op::Equal(_) => {
                ops.append(&mut pending_adds);
                ops.push(op);
            }
        }
    }
    ops.append(&mut pending_adds);
    ops
}

/// Align two line sequences into rows
pub fn align_lines<S: AsRef<str>>(original: &[S], processed: &[S]) -> Vec<DiffRow> {
    let ops = edit_script(original, processed);
    let mut rows = Vec::with_capacity(ops.len());
    let mut k = 0;

    while k < ops.len() {
        match ops[k] {
            Op::Equal(i) => {
                rows.push(DiffRow::equal(original[i].as_ref()));
                k += 1;
            }
            Op::Add(j) => {
                rows.push(DiffRow::added(processed[j].as_ref()));
                k += 1;
            }
            Op::Remove(_) => {
                let mut removed = Vec::new();
                while let Some(Op::Remove(i)) = ops.get(k) {
                    removed.push(*i);
                    k += 1;
                }
                let mut added = Vec::new();
                while let Some(Op::Add(j)) = ops.get(k) {
                    added.push(*j);
                    k += 1;
                }

                let paired = removed.len().min(added.len());
                for (&i, &j) in removed.iter().zip(&added) {
                    rows.push(DiffRow::modified(original[i].as_ref(), processed[j].as_ref()));
                }
                for &i in &removed[paired..] {
                    rows.push(DiffRow::removed(original[i].as_ref()));
                }
                for &j in &added[paired..] {
                    rows.push(DiffRow::added(processed[j].as_ref()));
                }
            }
        }
    }

    rows
}

/// Rows comparing a document's serialized original with its working timeline
pub fn diff_document(document: &SubtitleDocument) -> Vec<DiffRow> {
    let original = document.original_srt();
    let processed = document.to_srt();
    let original_lines: Vec<&str> = original.lines().collect();
    let processed_lines: Vec<&str> = processed.lines().collect();
    align_lines(&original_lines, &processed_lines)
}
