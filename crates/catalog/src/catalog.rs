use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::charset::Charset;
use crate::entry::{Entry, MessageKey};
use crate::error::Result;
use crate::parse;

/// Where a catalog was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Path(PathBuf),
    Stdin,
}

impl Source {
    /// Interpret a command-line argument, `-` meaning standard input
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Source::Stdin
        } else {
            Source::Path(PathBuf::from(arg))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Path(path) => write!(f, "{}", path.display()),
            Source::Stdin => f.write_str("<stdin>"),
        }
    }
}

/// A parsed translation catalog.
///
/// Entries keep file order. Keys are expected to be unique but this is not
/// enforced; key lookups return the last entry with a given key.
#[derive(Debug, Clone)]
pub struct Catalog {
    source: Source,
    charset: Charset,
    entries: Vec<Entry>,
    obsoletes: Vec<Entry>,
}

impl Catalog {
    pub fn new(source: Source, charset: Charset, entries: Vec<Entry>, obsoletes: Vec<Entry>) -> Self {
        Self {
            source,
            charset,
            entries,
            obsoletes,
        }
    }

    /// Load a catalog from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        Self::parse(&bytes, Source::Path(path.to_path_buf()))
    }

    /// Load a catalog from any reader, e.g. standard input
    pub fn from_reader<R: Read>(mut reader: R, source: Source) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::parse(&bytes, source)
    }

    /// Parse catalog bytes in the charset declared by their header
    pub fn parse(bytes: &[u8], source: Source) -> Result<Self> {
        parse::parse_catalog(bytes, source)
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// The declared charset of the catalog
    pub fn charset(&self) -> Charset {
        self.charset
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Commented-out entries, in file order
    pub fn obsoletes(&self) -> &[Entry] {
        &self.obsoletes
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// The header entry, if the catalog has one
    pub fn header(&self) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.is_header())
    }

    /// Index of entries by key; for duplicate keys the last entry wins
    pub fn mapping(&self) -> HashMap<&MessageKey, &Entry> {
        self.entries.iter().map(|entry| (&entry.key, entry)).collect()
    }

    /// The entry with the given key; for duplicate keys the last entry wins
    pub fn get(&self, key: &MessageKey) -> Option<&Entry> {
        self.entries.iter().rev().find(|entry| &entry.key == key)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
