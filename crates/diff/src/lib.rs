// Line diff library for podiff
// This crate computes typed, context-grouped line diffs

mod diff_hunk;
mod line_diff;
mod text_diff;

pub use diff_hunk::{DiffHunk, DiffHunkRange, DiffHunkStatus, DiffLine, DiffLineType};
pub use line_diff::{DiffConfig, LineDiff, FULL_CONTEXT};
pub use text_diff::TextDiff;
