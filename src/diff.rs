//! Aligned diffs between a cleaned text and a method's output.
//!
//! A [`DiffResult`] holds two span sequences of equal length. Position `i`
//! in `original` and position `i` in `produced` describe the same chunk of
//! the alignment, so a UI can render them side by side:
//!
//! ```text
//! = alpha | alpha
//! ~ beta  | BETA
//! = gamma | gamma
//! ~       | delta
//! ```
//!
//! A chunk that exists on one side only is paired with an empty `Changed`
//! placeholder on the other side.

use serde::Deserialize;
use similar::{capture_diff_slices, Algorithm, DiffTag};
use std::fmt;
use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::config::PipelineConfig;

/// Token unit the alignment works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Whole lines, including their line ending.
    #[default]
    Line,
    /// Unicode word boundaries (words, spaces and punctuation).
    Word,
}

/// Whether a span survived unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Unchanged,
    Changed,
}

/// A chunk of one side of the diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub kind: SpanKind,
    pub text: String,
    /// Byte range in the side's source text. Empty for placeholders.
    pub range: Range<usize>,
}

impl Span {
    pub fn is_changed(&self) -> bool {
        self.kind == SpanKind::Changed
    }
}

/// Two position-aligned span sequences, one per compared text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    pub original: Vec<Span>,
    pub produced: Vec<Span>,
}

impl DiffResult {
    /// No spans at all (both inputs were empty).
    pub fn is_empty(&self) -> bool {
        self.original.is_empty() && self.produced.is_empty()
    }

    /// Number of aligned positions marked as changed.
    pub fn changed_count(&self) -> usize {
        self.original
            .iter()
            .zip(&self.produced)
            .filter(|(a, b)| a.is_changed() || b.is_changed())
            .count()
    }

    /// Iterate over aligned `(original, produced)` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (&Span, &Span)> {
        self.original.iter().zip(&self.produced)
    }

    /// Share of bytes left unchanged (1.0 = identical, two empty texts included).
    pub fn similarity(&self) -> f64 {
        let total: usize = self
            .original
            .iter()
            .chain(&self.produced)
            .map(|s| s.text.len())
            .sum();
        if total == 0 {
            return 1.0;
        }
        let unchanged: usize = self
            .original
            .iter()
            .filter(|s| !s.is_changed())
            .map(|s| s.text.len())
            .sum();
        (2 * unchanged) as f64 / total as f64
    }

    /// Original text with removed chunks marked as `[-...-]`.
    pub fn render_original(&self) -> String {
        render_marked(&self.original, "[-", "-]")
    }

    /// Produced text with added chunks marked as `{+...+}`.
    pub fn render_produced(&self) -> String {
        render_marked(&self.produced, "{+", "+}")
    }

    /// Two-column rendering of the alignment.
    pub fn side_by_side(&self) -> SideBySide<'_> {
        SideBySide { diff: self }
    }
}

fn render_marked(spans: &[Span], open: &str, close: &str) -> String {
    let mut out = String::new();
    for span in spans {
        match span.kind {
            SpanKind::Unchanged => out.push_str(&span.text),
            SpanKind::Changed if span.text.is_empty() => {}
            SpanKind::Changed => {
                out.push_str(open);
                out.push_str(&span.text);
                out.push_str(close);
            }
        }
    }
    out
}

/// Displays a [`DiffResult`] as two aligned columns.
///
/// Rows start with `=` for unchanged chunks and `~` for changed ones.
pub struct SideBySide<'a> {
    diff: &'a DiffResult,
}

impl<'a> fmt::Display for SideBySide<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let left_width = self
            .diff
            .original
            .iter()
            .flat_map(|s| s.text.lines())
            .map(UnicodeWidthStr::width)
            .max()
            .unwrap_or(0);

        let mut rows = Vec::new();
        for (left, right) in self.diff.pairs() {
            let marker = if left.is_changed() || right.is_changed() {
                '~'
            } else {
                '='
            };
            let left_lines: Vec<&str> = left.text.lines().collect();
            let right_lines: Vec<&str> = right.text.lines().collect();

            for row in 0..left_lines.len().max(right_lines.len()) {
                let l = left_lines.get(row).copied().unwrap_or("");
                let r = right_lines.get(row).copied().unwrap_or("");
                let pad = " ".repeat(left_width - l.width());
                let line = format!("{} {}{} | {}", marker, l, pad, r);
                rows.push(line.trim_end().to_string());
            }
        }

        f.write_str(&rows.join("\n"))
    }
}

/// Compares two texts and returns their aligned spans.
pub trait Comparator {
    fn compare(&self, original: &str, produced: &str) -> DiffResult;
}

impl<F> Comparator for F
where
    F: Fn(&str, &str) -> DiffResult,
{
    fn compare(&self, original: &str, produced: &str) -> DiffResult {
        self(original, produced)
    }
}

/// Default comparator: Myers longest-common-subsequence over tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffEngine {
    granularity: Granularity,
}

impl DiffEngine {
    pub fn new(granularity: Granularity) -> Self {
        Self { granularity }
    }

    pub fn lines() -> Self {
        Self::new(Granularity::Line)
    }

    pub fn words() -> Self {
        Self::new(Granularity::Word)
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.granularity)
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Align `original` against `produced`.
    ///
    /// Runs of consecutive insertions, deletions and replacements collapse
    /// into a single changed position.
    pub fn compare(&self, original: &str, produced: &str) -> DiffResult {
        let old = tokenize(original, self.granularity);
        let new = tokenize(produced, self.granularity);
        let mut result = DiffResult::default();
        if old.is_empty() && new.is_empty() {
            return result;
        }

        let old_offsets = offsets(&old);
        let new_offsets = offsets(&new);
        let mut push = |kind: SpanKind, o: Range<usize>, n: Range<usize>| {
            let o = old_offsets[o.start]..old_offsets[o.end];
            let n = new_offsets[n.start]..new_offsets[n.end];
            result.original.push(Span {
                kind,
                text: original[o.clone()].to_string(),
                range: o,
            });
            result.produced.push(Span {
                kind,
                text: produced[n.clone()].to_string(),
                range: n,
            });
        };

        let mut pending: Option<(Range<usize>, Range<usize>)> = None;
        for op in capture_diff_slices(Algorithm::Myers, &old, &new) {
            let (tag, o, n) = op.as_tag_tuple();
            if o.is_empty() && n.is_empty() {
                continue;
            }
            if tag == DiffTag::Equal {
                if let Some((po, pn)) = pending.take() {
                    push(SpanKind::Changed, po, pn);
                }
                push(SpanKind::Unchanged, o, n);
            } else {
                pending = Some(match pending.take() {
                    Some((po, pn)) => (po.start..o.end, pn.start..n.end),
                    None => (o, n),
                });
            }
        }
        if let Some((po, pn)) = pending {
            push(SpanKind::Changed, po, pn);
        }

        result
    }
}

impl Comparator for DiffEngine {
    fn compare(&self, original: &str, produced: &str) -> DiffResult {
        DiffEngine::compare(self, original, produced)
    }
}

fn tokenize(text: &str, granularity: Granularity) -> Vec<&str> {
    match granularity {
        Granularity::Line => text.split_inclusive('\n').collect(),
        Granularity::Word => text.split_word_bounds().collect(),
    }
}

/// Byte offset of each token start, plus the total length.
fn offsets(tokens: &[&str]) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(tokens.len() + 1);
    let mut pos = 0;
    offsets.push(pos);
    for token in tokens {
        pos += token.len();
        offsets.push(pos);
    }
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_text_has_no_changes() {
        let text = "John went home.\nHe slept.\n";
        for engine in [DiffEngine::lines(), DiffEngine::words()] {
            let diff = engine.compare(text, text);
            assert_eq!(diff.changed_count(), 0);
            assert!(diff.original.iter().all(|s| !s.is_changed()));
            assert_eq!(diff.render_original(), text);
            assert_eq!(diff.similarity(), 1.0);
        }
    }

    #[test]
    fn test_empty_inputs() {
        let diff = DiffEngine::lines().compare("", "");
        assert!(diff.is_empty());
        assert_eq!(diff, DiffResult::default());
        assert_eq!(diff.similarity(), 1.0);
        assert_eq!(diff.side_by_side().to_string(), "");
    }

    #[test]
    fn test_one_side_empty() {
        let diff = DiffEngine::lines().compare("", "new line\n");
        assert_eq!(diff.original.len(), 1);
        assert_eq!(diff.produced.len(), 1);
        assert_eq!(diff.original[0].text, "");
        assert_eq!(diff.original[0].range, 0..0);
        assert_eq!(diff.produced[0].text, "new line\n");
        assert_eq!(diff.changed_count(), 1);
    }

    #[test]
    fn test_word_replacement() {
        let diff = DiffEngine::words().compare(
            "John went home. He slept.",
            "John went home. John slept.",
        );

        assert_eq!(diff.changed_count(), 1);
        assert_eq!(diff.render_original(), "John went home. [-He-] slept.");
        assert_eq!(diff.render_produced(), "John went home. {+John+} slept.");

        let (old, new) = diff.pairs().find(|(a, _)| a.is_changed()).unwrap();
        assert_eq!(old.range, 16..18);
        assert_eq!(new.range, 16..20);
    }

    #[test]
    fn test_sequences_stay_aligned() {
        let diff = DiffEngine::lines().compare("a\nb\nc\n", "x\nb\ny\nz\n");
        assert_eq!(diff.original.len(), diff.produced.len());
        for (a, b) in diff.pairs() {
            assert_eq!(a.kind, b.kind);
            if a.kind == SpanKind::Unchanged {
                assert_eq!(a.text, b.text);
            }
        }
    }

    #[test]
    fn test_ranges_point_into_sources() {
        let original = "one\ntwo\nthree\n";
        let produced = "one\n2\nthree\nfour\n";
        let diff = DiffEngine::lines().compare(original, produced);
        for span in &diff.original {
            assert_eq!(&original[span.range.clone()], span.text);
        }
        for span in &diff.produced {
            assert_eq!(&produced[span.range.clone()], span.text);
        }
    }

    #[test]
    fn test_deterministic() {
        let a = "The cat sat.\nIt purred.\n";
        let b = "The cat sat.\nThe cat purred.\n";
        let engine = DiffEngine::words();
        assert_eq!(engine.compare(a, b), engine.compare(a, b));
    }

    #[test]
    fn test_similarity_partial() {
        let diff = DiffEngine::lines().compare("same\nold\n", "same\nnew\n");
        // "same\n" survives on both sides: 2 * 5 of 18 bytes
        assert!((diff.similarity() - 10.0 / 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_side_by_side() {
        let diff = DiffEngine::lines().compare("alpha\nbeta\ngamma\n", "alpha\nBETA\ngamma\ndelta\n");
        insta::assert_snapshot!(diff.side_by_side().to_string(), @r###"
        = alpha | alpha
        ~ beta  | BETA
        = gamma | gamma
        ~       | delta
        "###);
    }

    #[test]
    fn test_closure_comparator() {
        let reversed = |a: &str, b: &str| DiffEngine::lines().compare(b, a);
        let diff = Comparator::compare(&reversed, "x\n", "y\n");
        assert_eq!(diff.original[0].text, "y\n");
    }
}
