use similar::{capture_diff_slices, group_diff_ops, Algorithm, DiffOp, DiffTag};

use crate::diff_hunk::{DiffHunk, DiffLine, DiffLineType};

/// Context width large enough that any realistic input stays a single hunk.
pub const FULL_CONTEXT: usize = 10_000;

/// Configuration for computing a line diff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffConfig {
    /// Number of unchanged lines kept around each change
    pub context_lines: usize,

    /// The diff algorithm (longest common subsequence by default)
    pub algorithm: Algorithm,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            context_lines: 3,
            algorithm: Algorithm::Lcs,
        }
    }
}

impl DiffConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// A configuration that never splits a diff into several hunks
    pub fn full_context() -> Self {
        Self::default().context_lines(FULL_CONTEXT)
    }

    /// Set the number of context lines
    pub fn context_lines(mut self, context_lines: usize) -> Self {
        self.context_lines = context_lines;
        self
    }

    /// Set the diff algorithm
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Diff two sequences of lines.
    ///
    /// Lines are compared exactly and must not carry their terminators.
    /// Equal inputs produce a diff without hunks.
    pub fn diff_lines<O, N>(&self, old: &[O], new: &[N]) -> LineDiff
    where
        O: AsRef<str>,
        N: AsRef<str>,
    {
        let old: Vec<&str> = old.iter().map(AsRef::as_ref).collect();
        let new: Vec<&str> = new.iter().map(AsRef::as_ref).collect();

        let ops = capture_diff_slices(self.algorithm, &old, &new);
        let hunks = group_diff_ops(ops, self.context_lines)
            .iter()
            .map(|group| build_hunk(group, &old, &new))
            .collect();

        LineDiff { hunks }
    }
}

fn build_hunk(group: &[DiffOp], old: &[&str], new: &[&str]) -> DiffHunk {
    let mut lines = Vec::new();

    for op in group {
        let (tag, old_range, new_range) = op.as_tag_tuple();

        match tag {
            DiffTag::Equal => push_lines(&mut lines, DiffLineType::Both, &old[old_range]),
            DiffTag::Delete => push_lines(&mut lines, DiffLineType::OldOnly, &old[old_range]),
            DiffTag::Insert => push_lines(&mut lines, DiffLineType::NewOnly, &new[new_range]),
            DiffTag::Replace => {
                push_lines(&mut lines, DiffLineType::OldOnly, &old[old_range]);
                push_lines(&mut lines, DiffLineType::NewOnly, &new[new_range]);
            }
        }
    }

    let old_start = group.first().map_or(0, |op| op.old_range().start);
    let new_start = group.first().map_or(0, |op| op.new_range().start);

    DiffHunk::from_lines(old_start, new_start, lines)
}

fn push_lines(lines: &mut Vec<DiffLine>, kind: DiffLineType, texts: &[&str]) {
    lines.extend(texts.iter().map(|text| DiffLine::new(kind, *text)));
}

/// A line diff split into hunks
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineDiff {
    hunks: Vec<DiffHunk>,
}

impl LineDiff {
    /// Get the hunks
    pub fn hunks(&self) -> &[DiffHunk] {
        &self.hunks
    }

    /// Get the number of hunks
    pub fn hunk_count(&self) -> usize {
        self.hunks.len()
    }

    /// Get a hunk by index
    pub fn hunk(&self, index: usize) -> Option<&DiffHunk> {
        self.hunks.get(index)
    }

    /// True when the inputs were identical
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// Check if the diff has any changes
    pub fn has_changes(&self) -> bool {
        self.hunks.iter().any(|h| h.has_changes())
    }

    /// Get the number of added lines
    pub fn added_lines(&self) -> usize {
        self.hunks.iter().map(|h| h.added_lines()).sum()
    }

    /// Get the number of deleted lines
    pub fn deleted_lines(&self) -> usize {
        self.hunks.iter().map(|h| h.deleted_lines()).sum()
    }

    /// Get the number of unchanged lines
    pub fn unchanged_lines(&self) -> usize {
        self.hunks.iter().map(|h| h.unchanged_lines()).sum()
    }

    /// Every line of every hunk, without hunk headers
    pub fn body_lines(&self) -> impl Iterator<Item = &DiffLine> + '_ {
        self.hunks.iter().flat_map(|h| h.lines.iter())
    }

    /// Render as unified diff text with `@@` hunk headers but no file headers
    pub fn to_unified_string(&self) -> String {
        let mut result = String::new();

        for hunk in &self.hunks {
            result.push_str(&hunk.header());
            result.push('\n');
            for line in &hunk.lines {
                result.push_str(&line.to_string());
                result.push('\n');
            }
        }

        result
    }
}
