use derive_more::Display;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents the status of a diff hunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DiffHunkStatus {
    /// The hunk only has lines from the new side
    #[display(fmt = "Added")]
    Added,

    /// The hunk only has lines from the old side
    #[display(fmt = "Deleted")]
    Deleted,

    /// The hunk removes and adds lines
    #[display(fmt = "Modified")]
    Modified,

    /// The hunk holds context lines only
    #[display(fmt = "Unchanged")]
    Unchanged,
}

/// Represents a range of lines in a diff
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiffHunkRange {
    /// The starting line (0-based)
    pub start: usize,

    /// The number of lines
    pub count: usize,
}

impl DiffHunkRange {
    /// Create a new range from start and count
    pub fn new(start: usize, count: usize) -> Self {
        Self { start, count }
    }

    /// Get the end of the range (exclusive)
    pub fn end(&self) -> usize {
        self.start + self.count
    }

    /// Check if this range is empty
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Format the range the way unified diff hunk headers do.
    ///
    /// Lines are 1-based; a single line omits the count and an empty range
    /// points at the line before it.
    pub fn to_unified(&self) -> String {
        match self.count {
            0 => format!("{},0", self.start),
            1 => format!("{}", self.start + 1),
            count => format!("{},{}", self.start + 1, count),
        }
    }
}

/// Represents the type of a line in a diff hunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DiffLineType {
    /// Line only exists in old version (removed)
    OldOnly,

    /// Line only exists in new version (added)
    NewOnly,

    /// Line exists in both versions (context)
    Both,
}

impl DiffLineType {
    /// The marker character used in unified diff output
    pub fn marker(self) -> char {
        match self {
            DiffLineType::OldOnly => '-',
            DiffLineType::NewOnly => '+',
            DiffLineType::Both => ' ',
        }
    }
}

/// A single line of a diff, tagged with the side(s) it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiffLine {
    pub kind: DiffLineType,
    pub text: String,
}

impl DiffLine {
    pub fn new(kind: DiffLineType, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn is_change(&self) -> bool {
        self.kind != DiffLineType::Both
    }
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.marker(), self.text)
    }
}

/// Represents a hunk of changes between two versions of text
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiffHunk {
    /// The status of the hunk, derived from its lines
    pub status: DiffHunkStatus,

    /// The range of lines in the old version
    pub old_range: DiffHunkRange,

    /// The range of lines in the new version
    pub new_range: DiffHunkRange,

    /// The lines of this hunk in output order
    pub lines: Vec<DiffLine>,
}

impl DiffHunk {
    /// Create a hunk from its lines, starting at the given 0-based positions
    pub fn from_lines(old_start: usize, new_start: usize, lines: Vec<DiffLine>) -> Self {
        let old_count = lines
            .iter()
            .filter(|l| l.kind != DiffLineType::NewOnly)
            .count();
        let new_count = lines
            .iter()
            .filter(|l| l.kind != DiffLineType::OldOnly)
            .count();

        let has_removals = lines.iter().any(|l| l.kind == DiffLineType::OldOnly);
        let has_additions = lines.iter().any(|l| l.kind == DiffLineType::NewOnly);

        let status = match (has_removals, has_additions) {
            (false, false) => DiffHunkStatus::Unchanged,
            (false, true) => DiffHunkStatus::Added,
            (true, false) => DiffHunkStatus::Deleted,
            (true, true) => DiffHunkStatus::Modified,
        };

        Self {
            status,
            old_range: DiffHunkRange::new(old_start, old_count),
            new_range: DiffHunkRange::new(new_start, new_count),
            lines,
        }
    }

    /// Check if this hunk has any changes
    pub fn has_changes(&self) -> bool {
        self.status != DiffHunkStatus::Unchanged
    }

    /// Get the number of added lines in this hunk
    pub fn added_lines(&self) -> usize {
        self.count_lines(DiffLineType::NewOnly)
    }

    /// Get the number of deleted lines in this hunk
    pub fn deleted_lines(&self) -> usize {
        self.count_lines(DiffLineType::OldOnly)
    }

    /// Get the number of unchanged lines in this hunk
    pub fn unchanged_lines(&self) -> usize {
        self.count_lines(DiffLineType::Both)
    }

    /// Get the line type at the given index
    pub fn line_type(&self, index: usize) -> Option<DiffLineType> {
        self.lines.get(index).map(|l| l.kind)
    }

    /// The `@@ -a,b +c,d @@` header line of this hunk
    pub fn header(&self) -> String {
        format!(
            "@@ -{} +{} @@",
            self.old_range.to_unified(),
            self.new_range.to_unified()
        )
    }

    fn count_lines(&self, kind: DiffLineType) -> usize {
        self.lines.iter().filter(|l| l.kind == kind).count()
    }
}
