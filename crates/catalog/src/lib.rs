// Catalog model for gettext PO files
// This crate loads catalogs and converts their text between character sets

mod catalog;
mod charset;
mod entry;
mod error;
mod parse;

pub use catalog::{Catalog, Source};
pub use charset::{decode, encode, Charset, Transcoding, UnmappablePolicy, SUBSTITUTE};
pub use entry::{Entry, MessageKey, TRANSLATOR_COMMENT};
pub use error::{CatalogError, Result};
