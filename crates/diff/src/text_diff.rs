use crate::line_diff::{DiffConfig, LineDiff};

/// Wrapper around line diffs of whole texts
pub struct TextDiff;

impl TextDiff {
    /// Create a diff between two texts using the default context
    pub fn diff(old_text: &str, new_text: &str) -> LineDiff {
        Self::diff_with_context(old_text, new_text, DiffConfig::default().context_lines)
    }

    /// Create a diff between two texts keeping `context_lines` around changes
    pub fn diff_with_context(old_text: &str, new_text: &str, context_lines: usize) -> LineDiff {
        let old_lines: Vec<&str> = old_text.lines().collect();
        let new_lines: Vec<&str> = new_text.lines().collect();

        DiffConfig::default()
            .context_lines(context_lines)
            .diff_lines(&old_lines, &new_lines)
    }

    /// Generate a unified diff string (like git diff, without file headers)
    pub fn unified_diff(old_text: &str, new_text: &str, context_lines: usize) -> String {
        Self::diff_with_context(old_text, new_text, context_lines).to_unified_string()
    }
}
