use po_catalog::CatalogError;
use thiserror::Error;

/// Errors of a catalog comparison run
#[derive(Debug, Error)]
pub enum DiffError {
    /// Strict alignment needs both catalogs to list the same keys in the same order.
    #[error("catalogs do not share a common base (first difference at entry {index})")]
    BaseMismatch { index: usize },

    /// Text could not be converted between the catalogs' charsets.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Writing the report failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DiffError>;
