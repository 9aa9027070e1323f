use std::fmt;

use crate::error::{CatalogError, Result};

/// Comment prefix of translator comments (`# like this`)
pub const TRANSLATOR_COMMENT: &str = "# ";

/// Identity of a message: its context, if any, and its source text
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageKey {
    pub context: Option<String>,
    pub msgid: String,
}

impl MessageKey {
    pub fn new(msgid: impl Into<String>) -> Self {
        Self {
            context: None,
            msgid: msgid.into(),
        }
    }

    pub fn with_context(context: impl Into<String>, msgid: impl Into<String>) -> Self {
        Self {
            context: Some(context.into()),
            msgid: msgid.into(),
        }
    }
}

impl fmt::Display for MessageKey {
    // Same layout gettext uses in compiled catalogs: context EOT msgid
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(context) => write!(f, "{}\u{4}{}", context, self.msgid),
            None => f.write_str(&self.msgid),
        }
    }
}

/// One message of a catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    /// Context and source text
    pub key: MessageKey,

    /// Plural source text, when the message has plural forms
    pub msgid_plural: Option<String>,

    /// Translations, one per plural form, in index order
    pub msgstrs: Vec<String>,

    /// Flags from `#,` lines, e.g. `fuzzy` or `c-format`
    pub flags: Vec<String>,

    /// Every comment line, verbatim and in file order
    pub comments: Vec<String>,

    /// The source lines of the entry, verbatim and without terminators
    pub raw_lines: Vec<String>,

    /// 1-based line of the first raw line
    pub line_number: Option<usize>,

    /// Whether the entry was commented out with `#~`
    pub obsolete: bool,
}

impl Entry {
    pub fn msgid(&self) -> &str {
        &self.key.msgid
    }

    /// The header entry is the one with an empty source text
    pub fn is_header(&self) -> bool {
        self.key.msgid.is_empty()
    }

    pub fn is_fuzzy(&self) -> bool {
        self.flags.iter().any(|flag| flag == "fuzzy")
    }

    /// Comment lines starting with `prefix`
    pub fn comments(&self, prefix: &str) -> Vec<&str> {
        self.comments
            .iter()
            .filter(|line| line.starts_with(prefix))
            .map(String::as_str)
            .collect()
    }

    pub fn translator_comments(&self) -> Vec<&str> {
        self.comments(TRANSLATOR_COMMENT)
    }

    /// Value of a `Name: value` line in the header's translation.
    ///
    /// Field names match exactly. The first matching line wins.
    pub fn header_field(&self, name: &str) -> Result<&str> {
        let metadata = self.msgstrs.first().map(String::as_str).unwrap_or_default();

        metadata
            .split('\n')
            .find_map(|line| line.strip_prefix(name)?.strip_prefix(':'))
            .map(str::trim)
            .ok_or_else(|| CatalogError::HeaderFieldMissing(name.to_string()))
    }

    /// The `charset=` parameter of the header's `Content-Type` field
    pub fn header_charset(&self) -> Result<&str> {
        let content_type = self.header_field("Content-Type")?;

        content_type
            .split(';')
            .find_map(|param| param.trim().strip_prefix("charset="))
            .map(str::trim)
            .filter(|charset| !charset.is_empty())
            .ok_or_else(|| CatalogError::HeaderFieldMissing("charset".to_string()))
    }
}
