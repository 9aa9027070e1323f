use std::borrow::Cow;

use log::trace;
use po_catalog::{Catalog, Transcoding, UnmappablePolicy};

use crate::align::AlignedPair;
use crate::error::Result;

/// Converts old-catalog text into the new catalog's charset
pub trait EncodingBridge {
    fn transcode(
        &self,
        text: &str,
        transcoding: Transcoding,
        policy: UnmappablePolicy,
    ) -> po_catalog::Result<String>;
}

impl<T: EncodingBridge + ?Sized> EncodingBridge for &T {
    fn transcode(
        &self,
        text: &str,
        transcoding: Transcoding,
        policy: UnmappablePolicy,
    ) -> po_catalog::Result<String> {
        (**self).transcode(text, transcoding, policy)
    }
}

/// The `encoding_rs` backed bridge
#[derive(Debug, Clone, Copy, Default)]
pub struct CharsetBridge;

impl EncodingBridge for CharsetBridge {
    fn transcode(
        &self,
        text: &str,
        transcoding: Transcoding,
        policy: UnmappablePolicy,
    ) -> po_catalog::Result<String> {
        transcoding.apply(text, policy)
    }
}

/// Decides which aligned entries are worth reporting.
///
/// When the catalogs declare different charsets, old text is brought into the
/// new catalog's charset before any comparison, substituting characters the
/// new charset lacks. With equal charsets the bridge is never called.
#[derive(Debug, Clone)]
pub struct ChangeDetector<B = CharsetBridge> {
    bridge: B,
    transcoding: Option<Transcoding>,
}

impl<B: EncodingBridge> ChangeDetector<B> {
    pub fn new(bridge: B, old: &Catalog, new: &Catalog) -> Self {
        Self::with_transcoding(bridge, Transcoding::between(old.charset(), new.charset()))
    }

    pub fn with_transcoding(bridge: B, transcoding: Option<Transcoding>) -> Self {
        Self {
            bridge,
            transcoding,
        }
    }

    pub fn transcoding(&self) -> Option<Transcoding> {
        self.transcoding
    }

    /// Whether the pair produces a chunk.
    ///
    /// Entries present on one side only always do. A matched pair does when
    /// its fuzzy flag, translations or translator comments differ, and the
    /// header entry always does.
    pub fn is_reportable(&self, pair: &AlignedPair<'_>) -> Result<bool> {
        let (old, new) = match *pair {
            AlignedPair::Matched { old, new } => (old, new),
            AlignedPair::AddedInNew(_) | AlignedPair::RemovedFromOld(_) => return Ok(true),
        };

        if old.is_fuzzy() != new.is_fuzzy() {
            return Ok(true);
        }

        if !same_lines(&self.to_new_charset(&old.msgstrs)?, &new.msgstrs) {
            return Ok(true);
        }

        let old_comments = old.translator_comments();
        if !same_lines(&self.to_new_charset(&old_comments)?, &new.translator_comments()) {
            return Ok(true);
        }

        Ok(new.is_header())
    }

    /// Old-catalog lines as the new catalog's charset would hold them
    pub fn to_new_charset<'e, S: AsRef<str>>(&self, texts: &'e [S]) -> Result<Vec<Cow<'e, str>>> {
        let Some(transcoding) = self.transcoding else {
            return Ok(texts.iter().map(|text| Cow::Borrowed(text.as_ref())).collect());
        };

        trace!(
            "transcoding {} lines from {} to {}",
            texts.len(),
            transcoding.from,
            transcoding.to
        );

        texts
            .iter()
            .map(|text| {
                self.bridge
                    .transcode(text.as_ref(), transcoding, UnmappablePolicy::Substitute)
                    .map(Cow::Owned)
                    .map_err(Into::into)
            })
            .collect()
    }
}

fn same_lines<N: AsRef<str>>(old: &[Cow<'_, str>], new: &[N]) -> bool {
    old.len() == new.len() && old.iter().zip(new).all(|(o, n)| **o == *n.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use po_catalog::{Charset, Entry, MessageKey};
    use std::cell::Cell;

    #[derive(Default)]
    struct CountingBridge {
        calls: Cell<usize>,
    }

    impl EncodingBridge for CountingBridge {
        fn transcode(
            &self,
            text: &str,
            transcoding: Transcoding,
            policy: UnmappablePolicy,
        ) -> po_catalog::Result<String> {
            self.calls.set(self.calls.get() + 1);
            CharsetBridge.transcode(text, transcoding, policy)
        }
    }

    fn entry(msgid: &str, msgstr: &str) -> Entry {
        Entry {
            key: MessageKey::new(msgid),
            msgstrs: vec![msgstr.to_string()],
            ..Default::default()
        }
    }

    fn latin1_to_utf8() -> Option<Transcoding> {
        Transcoding::between(Charset::lookup("ISO-8859-1").unwrap(), Charset::utf8())
    }

    #[test]
    fn test_equal_charsets_never_call_the_bridge() {
        let bridge = CountingBridge::default();
        let detector = ChangeDetector::with_transcoding(&bridge, None);

        let old = entry("a", "x");
        let new = entry("a", "y");
        assert!(detector.is_reportable(&AlignedPair::Matched { old: &old, new: &new }).unwrap());
        assert!(!detector.is_reportable(&AlignedPair::Matched { old: &old, new: &old }).unwrap());
        assert_eq!(bridge.calls.get(), 0);
    }

    #[test]
    fn test_differing_charsets_go_through_the_bridge() {
        let bridge = CountingBridge::default();
        let detector = ChangeDetector::with_transcoding(&bridge, latin1_to_utf8());

        let old = entry("a", "hello");
        let new = entry("a", "hello");
        assert!(!detector.is_reportable(&AlignedPair::Matched { old: &old, new: &new }).unwrap());
        assert!(bridge.calls.get() > 0);
    }

    #[test]
    fn test_fuzzy_flag_alone_is_reportable() {
        let detector = ChangeDetector::with_transcoding(CharsetBridge, None);
        let old = entry("a", "x");
        let new = Entry {
            flags: vec!["fuzzy".to_string()],
            ..old.clone()
        };

        assert!(detector.is_reportable(&AlignedPair::Matched { old: &old, new: &new }).unwrap());
    }

    #[test]
    fn test_translator_comments_matter_but_references_do_not() {
        let detector = ChangeDetector::with_transcoding(CharsetBridge, None);
        let old = Entry {
            comments: vec!["#: a.c:1".to_string(), "# note".to_string()],
            ..entry("a", "x")
        };

        let moved = Entry {
            comments: vec!["#: a.c:99".to_string(), "# note".to_string()],
            ..old.clone()
        };
        assert!(!detector.is_reportable(&AlignedPair::Matched { old: &old, new: &moved }).unwrap());

        let renoted = Entry {
            comments: vec!["#: a.c:1".to_string(), "# other note".to_string()],
            ..old.clone()
        };
        assert!(detector.is_reportable(&AlignedPair::Matched { old: &old, new: &renoted }).unwrap());
    }

    #[test]
    fn test_header_and_singletons_are_always_reportable() {
        let detector = ChangeDetector::with_transcoding(CharsetBridge, None);
        let header = entry("", "Content-Type: text/plain; charset=UTF-8\n");
        let plain = entry("a", "x");

        assert!(detector.is_reportable(&AlignedPair::Matched { old: &header, new: &header }).unwrap());
        assert!(detector.is_reportable(&AlignedPair::AddedInNew(&plain)).unwrap());
        assert!(detector.is_reportable(&AlignedPair::RemovedFromOld(&plain)).unwrap());
    }

    #[test]
    fn test_unmappable_old_text_is_substituted() {
        let utf8_to_latin1 =
            Transcoding::between(Charset::utf8(), Charset::lookup("ISO-8859-1").unwrap());
        let detector = ChangeDetector::with_transcoding(CharsetBridge, utf8_to_latin1);

        let lines = ["msgstr \"\u{3042}\"".to_string()];
        let converted = detector.to_new_charset(&lines).unwrap();
        assert_eq!(converted, vec!["msgstr \"?\""]);
    }
}
