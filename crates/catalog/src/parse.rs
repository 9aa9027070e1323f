//! Tolerant PO reader.
//!
//! This only splits a catalog into entries and their fields; it does not
//! check that the result is a valid gettext catalog.

use std::collections::{BTreeMap, HashSet};

use encoding_rs::WINDOWS_1252;
use log::{debug, info, warn};

use crate::catalog::{Catalog, Source};
use crate::charset::{self, Charset};
use crate::entry::{Entry, MessageKey};
use crate::error::{CatalogError, Result};

/// Placeholder left in the header of freshly extracted templates
const CHARSET_PLACEHOLDER: &str = "CHARSET";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub(crate) fn parse_catalog(bytes: &[u8], source: Source) -> Result<Catalog> {
    // Every byte maps in windows-1252 and header fields are ASCII, so a first
    // pass in it is enough to find the declared charset.
    let unmarked = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let (probe_text, _) = WINDOWS_1252.decode_without_bom_handling(unmarked);
    let (probe_entries, _) = parse_entries(&probe_text)?;
    let charset = declared_charset(&probe_entries, &source)?;

    let (text, had_errors) = charset::decode(bytes, charset);
    if had_errors {
        warn!("{}: malformed {} byte sequences were replaced", source, charset);
    }

    let (entries, obsoletes) = parse_entries(&text)?;
    warn_duplicate_keys(&entries, &source);

    info!(
        "Loaded {} entries ({} obsolete) from {} as {}",
        entries.len(),
        obsoletes.len(),
        source,
        charset
    );

    Ok(Catalog::new(source, charset, entries, obsoletes))
}

fn declared_charset(entries: &[Entry], source: &Source) -> Result<Charset> {
    let Some(header) = entries.iter().find(|entry| entry.is_header()) else {
        warn!("{}: no header entry, assuming UTF-8", source);
        return Ok(Charset::utf8());
    };

    match header.header_charset() {
        Ok(name) if name == CHARSET_PLACEHOLDER => {
            warn!("{}: charset is still the template placeholder, assuming UTF-8", source);
            Ok(Charset::utf8())
        }
        Ok(name) => Charset::lookup(name),
        Err(CatalogError::HeaderFieldMissing(field)) => {
            warn!("{}: header has no {}, assuming UTF-8", source, field);
            Ok(Charset::utf8())
        }
        Err(err) => Err(err),
    }
}

fn warn_duplicate_keys(entries: &[Entry], source: &Source) {
    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(&entry.key) {
            warn!(
                "{}: duplicate message {:?} at line {:?}, the last one is used",
                source,
                entry.key.to_string(),
                entry.line_number
            );
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Context,
    Id,
    IdPlural,
    Str(usize),
}

#[derive(Debug, Default)]
struct EntryBuilder {
    first_line: Option<usize>,
    raw_lines: Vec<String>,
    comments: Vec<String>,
    flags: Vec<String>,
    context: Option<String>,
    msgid: Option<String>,
    msgid_plural: Option<String>,
    msgstrs: BTreeMap<usize, String>,
    field: Option<Field>,
    obsolete: bool,
}

impl EntryBuilder {
    fn has_msgid(&self) -> bool {
        self.msgid.is_some()
    }

    fn has_msgstr(&self) -> bool {
        !self.msgstrs.is_empty()
    }

    fn push_raw(&mut self, line_number: usize, line: &str) {
        self.first_line.get_or_insert(line_number);
        self.raw_lines.push(line.to_string());
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::Context => self.context.get_or_insert_with(String::new),
            Field::Id => self.msgid.get_or_insert_with(String::new),
            Field::IdPlural => self.msgid_plural.get_or_insert_with(String::new),
            Field::Str(index) => self.msgstrs.entry(index).or_default(),
        }
    }

    fn start_field(&mut self, field: Field, value: &str) {
        let slot = self.slot(field);
        slot.clear();
        slot.push_str(value);
        self.field = Some(field);
    }

    fn finish(self) -> Result<Entry> {
        let Some(msgid) = self.msgid else {
            return Err(CatalogError::Syntax {
                line: self.first_line.unwrap_or_default(),
                message: "entry has no msgid".to_string(),
            });
        };

        Ok(Entry {
            key: MessageKey {
                context: self.context,
                msgid,
            },
            msgid_plural: self.msgid_plural,
            msgstrs: self.msgstrs.into_values().collect(),
            flags: self.flags,
            comments: self.comments,
            raw_lines: self.raw_lines,
            line_number: self.first_line,
            obsolete: self.obsolete,
        })
    }
}

#[derive(Default)]
struct Entries {
    active: Vec<Entry>,
    obsolete: Vec<Entry>,
}

impl Entries {
    fn flush(&mut self, builder: &mut EntryBuilder) -> Result<()> {
        let entry = std::mem::take(builder).finish()?;
        if entry.obsolete {
            self.obsolete.push(entry);
        } else {
            self.active.push(entry);
        }
        Ok(())
    }
}

/// Split catalog text into active and obsolete entries
fn parse_entries(text: &str) -> Result<(Vec<Entry>, Vec<Entry>)> {
    let mut entries = Entries::default();
    let mut builder = EntryBuilder::default();

    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            // Comment blocks separated from their message by a blank line
            // still belong to it.
            if builder.has_msgid() {
                entries.flush(&mut builder)?;
            }
            continue;
        }

        let (content, obsolete) = match trimmed.strip_prefix("#~") {
            Some(rest) if !rest.starts_with('|') => (rest.trim_start(), true),
            _ => (trimmed, false),
        };

        if !obsolete && content.starts_with('#') {
            if builder.has_msgstr() {
                entries.flush(&mut builder)?;
            }
            if let Some(flags) = content.strip_prefix("#,") {
                builder.flags.extend(
                    flags
                        .split(',')
                        .map(str::trim)
                        .filter(|flag| !flag.is_empty())
                        .map(str::to_string),
                );
            }
            builder.comments.push(line.to_string());
            builder.push_raw(line_number, line);
            continue;
        }

        if content.starts_with('"') {
            let field = builder.field.ok_or_else(|| CatalogError::Syntax {
                line: line_number,
                message: "string continuation without a keyword".to_string(),
            })?;
            let value = unquote(content, line_number)?;
            builder.slot(field).push_str(&value);
            builder.push_raw(line_number, line);
            continue;
        }

        let (keyword, rest) = content
            .split_once(char::is_whitespace)
            .ok_or_else(|| CatalogError::Syntax {
                line: line_number,
                message: format!("expected a quoted string after {:?}", content),
            })?;
        let field = parse_keyword(keyword, line_number)?;

        let starts_message = matches!(field, Field::Context | Field::Id);
        if starts_message && (builder.has_msgstr() || (builder.has_msgid() && field == Field::Context)) {
            entries.flush(&mut builder)?;
        }

        let value = unquote(rest, line_number)?;
        builder.obsolete |= obsolete;
        builder.start_field(field, &value);
        builder.push_raw(line_number, line);
    }

    if builder.has_msgid() {
        entries.flush(&mut builder)?;
    } else if !builder.raw_lines.is_empty() {
        debug!("ignoring {} trailing comment lines", builder.raw_lines.len());
    }

    Ok((entries.active, entries.obsolete))
}

fn parse_keyword(keyword: &str, line_number: usize) -> Result<Field> {
    let field = match keyword {
        "msgctxt" => Field::Context,
        "msgid" => Field::Id,
        "msgid_plural" => Field::IdPlural,
        "msgstr" => Field::Str(0),
        other => other
            .strip_prefix("msgstr[")
            .and_then(|rest| rest.strip_suffix(']'))
            .and_then(|index| index.parse().ok())
            .map(Field::Str)
            .ok_or_else(|| CatalogError::Syntax {
                line: line_number,
                message: format!("unknown keyword {:?}", other),
            })?,
    };
    Ok(field)
}

/// Strip the quotes of a PO string and resolve its escapes
fn unquote(quoted: &str, line_number: usize) -> Result<String> {
    let quoted = quoted.trim();
    let inner = quoted
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| CatalogError::Syntax {
            line: line_number,
            message: format!("expected a quoted string, found {:?}", quoted),
        })?;

    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('"') => result.push('"'),
            Some('\\') => result.push('\\'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }

    Ok(result)
}
