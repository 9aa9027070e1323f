//! Gettext character sets and conversion between them.
//!
//! The registry holds the charsets the gettext manual lists for the
//! `Content-Type` header field, resolved against `encoding_rs` once and never
//! modified afterwards. Names that `encoding_rs` cannot convert (for example
//! `VISCII` or `JOHAB`) are not part of the registry and look up as unknown.
//!
//! `encoding_rs` follows the WHATWG labels, which map `ASCII` and
//! `ISO-8859-1` to windows-1252. Those two keep their own repertoire here:
//! ASCII stops at U+007F and ISO-8859-1 maps U+0000 to U+00FF byte for byte.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use encoding_rs::{EncoderResult, Encoding, UTF_8};

use crate::error::{CatalogError, Result};

/// Byte written in place of a character the target charset cannot represent.
pub const SUBSTITUTE: u8 = b'?';

// Order matters: when several names resolve to one encoding, the later wins
// for alias lookups (so `latin1` resolves to CP1252 rather than ASCII).
const GETTEXT_CHARSETS: &[&str] = &[
    "ASCII",
    "ISO-8859-1",
    "ISO-8859-2",
    "ISO-8859-3",
    "ISO-8859-4",
    "ISO-8859-5",
    "ISO-8859-6",
    "ISO-8859-7",
    "ISO-8859-8",
    "ISO-8859-9",
    "ISO-8859-13",
    "ISO-8859-14",
    "ISO-8859-15",
    "KOI8-R",
    "KOI8-U",
    "KOI8-T",
    "CP850",
    "CP866",
    "CP874",
    "CP932",
    "CP949",
    "CP950",
    "CP1250",
    "CP1251",
    "CP1252",
    "CP1253",
    "CP1254",
    "CP1255",
    "CP1256",
    "CP1257",
    "GB2312",
    "EUC-JP",
    "EUC-KR",
    "EUC-TW",
    "BIG5",
    "BIG5-HKSCS",
    "GBK",
    "GB18030",
    "SHIFT_JIS",
    "JOHAB",
    "TIS-620",
    "VISCII",
    "GEORGIAN-PS",
    "UTF-8",
];

/// A gettext character set backed by an `encoding_rs` encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Charset {
    name: &'static str,
    encoding: &'static Encoding,
    repertoire: Repertoire,
}

/// Characters a charset can hold when `encoding_rs` is too generous
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Repertoire {
    /// Whatever the encoding maps
    Encoding,
    /// One byte per character, up to the given code point
    Bytes(u32),
}

impl Repertoire {
    fn for_name(name: &str) -> Self {
        match name {
            "ASCII" => Repertoire::Bytes(0x7F),
            "ISO-8859-1" => Repertoire::Bytes(0xFF),
            _ => Repertoire::Encoding,
        }
    }
}

struct Registry {
    by_name: HashMap<String, Charset>,
    by_encoding: HashMap<&'static str, Charset>,
}

impl Registry {
    fn build() -> Self {
        let mut by_name = HashMap::new();
        let mut by_encoding = HashMap::new();

        for &name in GETTEXT_CHARSETS {
            let Some(encoding) = Encoding::for_label(name.as_bytes()) else {
                continue;
            };
            let charset = Charset {
                name,
                encoding,
                repertoire: Repertoire::for_name(name),
            };
            by_name.insert(normalize(name), charset);
            by_encoding.insert(encoding.name(), charset);
        }

        Self {
            by_name,
            by_encoding,
        }
    }
}

fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(Registry::build)
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '-' && *c != '_')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

impl Charset {
    /// Resolve any charset name or alias to its canonical gettext charset
    pub fn lookup(alias: &str) -> Result<Self> {
        let alias = alias.trim();
        let registry = registry();

        if let Some(charset) = registry.by_name.get(&normalize(alias)) {
            return Ok(*charset);
        }

        Encoding::for_label(alias.as_bytes())
            .and_then(|encoding| registry.by_encoding.get(encoding.name()))
            .copied()
            .ok_or_else(|| CatalogError::UnknownEncoding(alias.to_string()))
    }

    pub fn utf8() -> Self {
        Self {
            name: "UTF-8",
            encoding: UTF_8,
            repertoire: Repertoire::Encoding,
        }
    }

    /// The canonical gettext name, as written in a `charset=` header field
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    pub fn is_utf8(&self) -> bool {
        self.encoding == UTF_8
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// What to do with a character the target charset cannot represent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnmappablePolicy {
    /// Write [`SUBSTITUTE`] and carry on
    #[default]
    Substitute,
    /// Stop with [`CatalogError::UnmappableCharacter`]
    Fail,
}

/// Decode bytes in the given charset, replacing malformed sequences.
///
/// A byte order mark matching the charset is dropped. Returns the text and
/// whether any malformed sequence was replaced.
pub fn decode(bytes: &[u8], charset: Charset) -> (String, bool) {
    if let Repertoire::Bytes(last) = charset.repertoire {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        return decode_bytes(bytes, last);
    }

    let (text, had_errors) = charset.encoding.decode_with_bom_removal(bytes);
    (text.into_owned(), had_errors)
}

fn decode_bytes(bytes: &[u8], last: u32) -> (String, bool) {
    let mut had_errors = false;
    let text = bytes
        .iter()
        .map(|&byte| {
            if u32::from(byte) <= last {
                char::from(byte)
            } else {
                had_errors = true;
                char::REPLACEMENT_CHARACTER
            }
        })
        .collect();
    (text, had_errors)
}

/// Encode text into the given charset
pub fn encode(text: &str, charset: Charset, policy: UnmappablePolicy) -> Result<Cow<'_, [u8]>> {
    if let Repertoire::Bytes(last) = charset.repertoire {
        return encode_bytes(text, charset, last, policy).map(Cow::Owned);
    }

    let encoding = charset.encoding.output_encoding();
    if encoding == UTF_8 {
        return Ok(Cow::Borrowed(text.as_bytes()));
    }

    let mut encoder = encoding.new_encoder();
    let mut out = Vec::with_capacity(text.len() + 16);
    let mut remaining = text;

    loop {
        let (result, read) =
            encoder.encode_from_utf8_to_vec_without_replacement(remaining, &mut out, true);
        remaining = &remaining[read..];

        match result {
            EncoderResult::InputEmpty => return Ok(Cow::Owned(out)),
            EncoderResult::OutputFull => out.reserve(remaining.len() + 16),
            EncoderResult::Unmappable(character) => match policy {
                UnmappablePolicy::Substitute => out.push(SUBSTITUTE),
                UnmappablePolicy::Fail => {
                    return Err(CatalogError::UnmappableCharacter {
                        character,
                        charset: charset.name,
                    })
                }
            },
        }
    }
}

fn encode_bytes(text: &str, charset: Charset, last: u32, policy: UnmappablePolicy) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len());

    for character in text.chars() {
        match u8::try_from(u32::from(character)) {
            Ok(byte) if u32::from(byte) <= last => out.push(byte),
            _ => match policy {
                UnmappablePolicy::Substitute => out.push(SUBSTITUTE),
                UnmappablePolicy::Fail => {
                    return Err(CatalogError::UnmappableCharacter {
                        character,
                        charset: charset.name,
                    })
                }
            },
        }
    }

    Ok(out)
}

/// A conversion from one catalog's charset into another's.
///
/// Only exists when the two charsets differ; `None` from [`Transcoding::between`]
/// means the text can be compared as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transcoding {
    pub from: Charset,
    pub to: Charset,
}

impl Transcoding {
    pub fn between(from: Charset, to: Charset) -> Option<Self> {
        (from != to).then_some(Self { from, to })
    }

    /// Re-encode text that was decoded from `from` into `to`, returning the
    /// text as a catalog in `to` would hold it.
    pub fn apply(&self, text: &str, policy: UnmappablePolicy) -> Result<String> {
        let bytes = encode(text, self.to, policy)?;
        Ok(decode(&bytes, self.to).0)
    }

    /// Convert raw bytes in `from` into bytes in `to`
    pub fn apply_bytes(&self, bytes: &[u8], policy: UnmappablePolicy) -> Result<Vec<u8>> {
        let (text, _) = decode(bytes, self.from);
        Ok(encode(&text, self.to, policy)?.into_owned())
    }
}
