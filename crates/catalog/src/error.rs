//! Error types for loading catalogs and converting their text.

use thiserror::Error;

/// The error type for every fallible operation of this crate.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A character set name is not a gettext charset this crate can convert.
    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),

    /// A character has no representation in the target character set.
    #[error("Character {character:?} cannot be represented in {charset}")]
    UnmappableCharacter {
        character: char,
        charset: &'static str,
    },

    /// The header entry lacks a field that was asked for.
    #[error("Header field missing: {0}")]
    HeaderFieldMissing(String),

    /// The catalog text could not be split into entries.
    #[error("Syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },
}

/// A convenience `Result` type alias using [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;
