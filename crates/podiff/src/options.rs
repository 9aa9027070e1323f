//! Configuration options for a diff run.

/// How entries of the two catalogs are paired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignMode {
    /// Pair by position; both catalogs must list the same keys in order.
    #[default]
    Strict,

    /// Pair by key, tolerating reordering, additions and removals.
    Relaxed {
        /// Also report entries only the old catalog has.
        include_old_only: bool,
    },
}

impl AlignMode {
    pub fn relaxed() -> Self {
        AlignMode::Relaxed {
            include_old_only: false,
        }
    }

    /// Relaxed alignment that also reports removed entries
    pub fn full() -> Self {
        AlignMode::Relaxed {
            include_old_only: true,
        }
    }
}

/// Configuration options for a diff session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOptions {
    /// Whether each chunk is preceded by a `--- Line N (file) ---` heading.
    pub line_numbers: bool,

    /// How entries are paired.
    pub mode: AlignMode,

    /// Word-level highlighting. Reserved; the renderer does not use it yet.
    pub highlight_words: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            line_numbers: true,
            mode: AlignMode::default(),
            highlight_words: false,
        }
    }
}

impl DiffOptions {
    /// Create new options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether chunks get a line-number heading.
    pub fn line_numbers(mut self, line_numbers: bool) -> Self {
        self.line_numbers = line_numbers;
        self
    }

    /// Set the alignment mode.
    pub fn mode(mut self, mode: AlignMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set word-level highlighting.
    pub fn highlight_words(mut self, highlight_words: bool) -> Self {
        self.highlight_words = highlight_words;
        self
    }
}
