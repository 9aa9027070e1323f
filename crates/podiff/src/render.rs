use buffer_diff::{DiffConfig, LineDiff};
use log::debug;
use po_catalog::{Entry, Source};

use crate::align::AlignedPair;
use crate::change::{Change, ChangeKind};
use crate::detect::{ChangeDetector, EncodingBridge};
use crate::error::Result;

/// Width the line-number heading is filled to with `-`
pub const HEADING_WIDTH: usize = 32;

/// Turns reportable entries into text chunks
#[derive(Debug, Clone)]
pub struct ChunkRenderer {
    line_numbers: bool,
    config: DiffConfig,
}

impl Default for ChunkRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ChunkRenderer {
    pub fn new(line_numbers: bool) -> Self {
        Self {
            line_numbers,
            config: DiffConfig::full_context(),
        }
    }

    /// Diff a reportable pair.
    ///
    /// Old raw lines are brought into the new catalog's charset first.
    pub fn change<'a, B: EncodingBridge>(
        &self,
        detector: &ChangeDetector<B>,
        pair: AlignedPair<'a>,
        old_source: &'a Source,
        new_source: &'a Source,
    ) -> Result<Change<'a>> {
        let change = match pair {
            AlignedPair::Matched { old, new } => {
                let old_lines = detector.to_new_charset(&old.raw_lines)?;
                let diff = self.config.diff_lines(&old_lines, &new.raw_lines);
                let kind = if diff.is_empty() && new.is_header() {
                    ChangeKind::HeaderUnchanged
                } else {
                    ChangeKind::Modified
                };

                Change {
                    kind,
                    old: Some(old),
                    new: Some(new),
                    source: new_source,
                    diff,
                }
            }
            AlignedPair::AddedInNew(new) => Change {
                kind: ChangeKind::AddedInNew,
                old: None,
                new: Some(new),
                source: new_source,
                diff: self.config.diff_lines::<&str, _>(&[], &new.raw_lines),
            },
            AlignedPair::RemovedFromOld(old) => {
                let old_lines = detector.to_new_charset(&old.raw_lines)?;
                Change {
                    kind: ChangeKind::RemovedFromOld,
                    old: Some(old),
                    new: None,
                    source: old_source,
                    diff: self.config.diff_lines::<_, &str>(&old_lines, &[]),
                }
            }
        };

        debug!(
            "{} chunk for entry at line {}",
            change.kind,
            change
                .heading_entry()
                .and_then(|entry| entry.line_number)
                .map_or_else(|| "N/A".to_string(), |n| n.to_string())
        );

        Ok(change)
    }

    /// Text lines of a chunk, ending with an empty line
    pub fn render(&self, change: &Change<'_>) -> Vec<String> {
        let mut lines = Vec::new();

        if self.line_numbers {
            if let Some(entry) = change.heading_entry() {
                lines.push(heading(entry, change.source));
            }
        }

        match (change.kind, change.new) {
            (ChangeKind::HeaderUnchanged, Some(header)) => {
                lines.extend(header.raw_lines.iter().map(|line| format!(" {line}")));
            }
            _ => lines.extend(body(&change.diff)),
        }

        lines.push(String::new());
        lines
    }
}

fn body(diff: &LineDiff) -> impl Iterator<Item = String> + '_ {
    diff.body_lines().map(ToString::to_string)
}

/// `--- Line N (file) ` filled with `-` to [`HEADING_WIDTH`]
pub fn heading(entry: &Entry, source: &Source) -> String {
    let line = entry
        .line_number
        .map_or_else(|| "N/A".to_string(), |n| n.to_string());

    format!(
        "{:-<width$}",
        format!("--- Line {line} ({source}) "),
        width = HEADING_WIDTH
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::CharsetBridge;
    use po_catalog::MessageKey;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn entry(msgid: &str, raw: &[&str], line_number: usize) -> Entry {
        Entry {
            key: MessageKey::new(msgid),
            raw_lines: raw.iter().map(|line| line.to_string()).collect(),
            line_number: Some(line_number),
            ..Default::default()
        }
    }

    fn detector() -> ChangeDetector {
        ChangeDetector::with_transcoding(CharsetBridge, None)
    }

    #[test]
    fn test_heading_is_filled_to_width() {
        let e = entry("a", &[], 7);
        assert_eq!(
            heading(&e, &Source::Path(PathBuf::from("x.po"))),
            "--- Line 7 (x.po) --------------"
        );
        assert_eq!(heading(&e, &Source::Path(PathBuf::from("x.po"))).len(), HEADING_WIDTH);
    }

    #[test]
    fn test_heading_without_line_number_and_long_names() {
        let unknown = Entry {
            line_number: None,
            ..entry("a", &[], 1)
        };
        assert_eq!(heading(&unknown, &Source::Stdin), "--- Line N/A (<stdin>) ---------");

        let long = heading(&entry("a", &[], 12), &Source::Path(PathBuf::from("a/very/long/name.po")));
        assert_eq!(long, "--- Line 12 (a/very/long/name.po) ");
    }

    #[test]
    fn test_modified_chunk() {
        let old_source = Source::Path(PathBuf::from("old.po"));
        let new_source = Source::Path(PathBuf::from("new.po"));
        let old = entry("a", &["msgid \"a\"", "msgstr \"x\""], 3);
        let new = entry("a", &["msgid \"a\"", "msgstr \"y\""], 5);

        let renderer = ChunkRenderer::new(true);
        let change = renderer
            .change(&detector(), AlignedPair::Matched { old: &old, new: &new }, &old_source, &new_source)
            .unwrap();

        assert_eq!(change.kind, ChangeKind::Modified);
        assert!(change.is_counted());
        assert_eq!(
            renderer.render(&change),
            vec![
                "--- Line 5 (new.po) ------------",
                " msgid \"a\"",
                "-msgstr \"x\"",
                "+msgstr \"y\"",
                "",
            ]
        );
    }

    #[test]
    fn test_unchanged_header_is_space_prefixed() {
        let source = Source::Stdin;
        let header = entry("", &["msgid \"\"", "msgstr \"\""], 1);

        let renderer = ChunkRenderer::new(false);
        let change = renderer
            .change(
                &detector(),
                AlignedPair::Matched { old: &header, new: &header },
                &source,
                &source,
            )
            .unwrap();

        assert_eq!(change.kind, ChangeKind::HeaderUnchanged);
        assert!(!change.is_counted());
        assert_eq!(renderer.render(&change), vec![" msgid \"\"", " msgstr \"\"", ""]);
    }

    #[test]
    fn test_singletons_name_their_own_catalog() {
        let old_source = Source::Path(PathBuf::from("old.po"));
        let new_source = Source::Path(PathBuf::from("new.po"));
        let gone = entry("b", &["msgid \"b\"", "msgstr \"\""], 9);

        let renderer = ChunkRenderer::new(true);
        let change = renderer
            .change(&detector(), AlignedPair::RemovedFromOld(&gone), &old_source, &new_source)
            .unwrap();

        assert_eq!(
            renderer.render(&change),
            vec![
                "--- Line 9 (old.po) ------------",
                "-msgid \"b\"",
                "-msgstr \"\"",
                "",
            ]
        );

        let change = renderer
            .change(&detector(), AlignedPair::AddedInNew(&gone), &old_source, &new_source)
            .unwrap();
        assert_eq!(change.source, &new_source);
        assert!(change.is_counted());
    }
}
