use buffer_diff::LineDiff;
use derive_more::Display;
use po_catalog::{Entry, Source};

/// What a rendered chunk reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ChangeKind {
    /// A matched entry whose translation, fuzziness or comments changed
    #[display(fmt = "Modified")]
    Modified,

    /// An entry only the new catalog has
    #[display(fmt = "Added")]
    AddedInNew,

    /// An entry only the old catalog has
    #[display(fmt = "Removed")]
    RemovedFromOld,

    /// The header entry, reported although its text is identical
    #[display(fmt = "Header unchanged")]
    HeaderUnchanged,
}

/// A reportable change of one entry, ready to render
#[derive(Debug, Clone)]
pub struct Change<'a> {
    pub kind: ChangeKind,

    /// The old entry, when there is one
    pub old: Option<&'a Entry>,

    /// The new entry, when there is one
    pub new: Option<&'a Entry>,

    /// The catalog the heading names
    pub source: &'a Source,

    /// Full-context diff of the entries' raw lines
    pub diff: LineDiff,
}

impl<'a> Change<'a> {
    /// The entry whose line number heads the chunk
    pub fn heading_entry(&self) -> Option<&'a Entry> {
        self.new.or(self.old)
    }

    /// Whether the chunk counts towards the number of reported messages.
    ///
    /// The header entry never counts, whether or not its text changed.
    pub fn is_counted(&self) -> bool {
        match self.kind {
            ChangeKind::AddedInNew | ChangeKind::RemovedFromOld => true,
            ChangeKind::Modified => self.new.is_some_and(|entry| !entry.msgid().is_empty()),
            ChangeKind::HeaderUnchanged => false,
        }
    }
}
