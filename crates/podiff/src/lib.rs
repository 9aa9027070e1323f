// Catalog diff engine for podiff
// Pairs the entries of two PO catalogs and reports the changed ones as diff chunks

mod align;
mod change;
mod detect;
mod error;
mod options;
mod render;
mod session;

pub use align::{align_relaxed, align_strict, first_base_difference, has_common_base, AlignedPair};
pub use change::{Change, ChangeKind};
pub use detect::{ChangeDetector, CharsetBridge, EncodingBridge};
pub use error::{DiffError, Result};
pub use options::{AlignMode, DiffOptions};
pub use render::{ChunkRenderer, HEADING_WIDTH};
pub use session::{DiffSession, SUMMARY_SEPARATOR};
