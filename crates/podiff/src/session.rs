use std::io::Write;

use log::{debug, info};
use po_catalog::{encode, Catalog, Charset, UnmappablePolicy};

use crate::align::{align_relaxed, align_strict, first_base_difference, AlignedPair};
use crate::detect::{ChangeDetector, CharsetBridge, EncodingBridge};
use crate::error::{DiffError, Result};
use crate::options::{AlignMode, DiffOptions};
use crate::render::ChunkRenderer;

/// Line framing the message count at the end of a report
pub const SUMMARY_SEPARATOR: &str =
    " =============================================================================";

/// One comparison of two catalogs, written to `out`.
///
/// The report is encoded in the new catalog's charset.
pub struct DiffSession<W: Write> {
    out: W,
    renderer: ChunkRenderer,
    chunk_count: usize,
    charset: Charset,
}

impl<W: Write> DiffSession<W> {
    pub fn new(out: W, line_numbers: bool) -> Self {
        Self {
            out,
            renderer: ChunkRenderer::new(line_numbers),
            chunk_count: 0,
            charset: Charset::utf8(),
        }
    }

    pub fn with_options(out: W, options: &DiffOptions) -> Self {
        Self::new(out, options.line_numbers)
    }

    /// Number of counted chunks so far
    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn run(&mut self, old: &Catalog, new: &Catalog, mode: AlignMode) -> Result<usize> {
        self.run_with_bridge(old, new, mode, CharsetBridge)
    }

    /// Compare catalogs that list the same keys in the same order
    pub fn run_strict(&mut self, old: &Catalog, new: &Catalog) -> Result<usize> {
        self.run(old, new, AlignMode::Strict)
    }

    /// Compare catalogs by key, in the new catalog's order
    pub fn run_relaxed(&mut self, old: &Catalog, new: &Catalog, include_old_only: bool) -> Result<usize> {
        self.run(old, new, AlignMode::Relaxed { include_old_only })
    }

    /// Like [`run`](Self::run) with a custom charset bridge
    pub fn run_with_bridge<B: EncodingBridge>(
        &mut self,
        old: &Catalog,
        new: &Catalog,
        mode: AlignMode,
        bridge: B,
    ) -> Result<usize> {
        let pairs = match mode {
            AlignMode::Strict => {
                if let Some(index) = first_base_difference(old, new) {
                    return Err(DiffError::BaseMismatch { index });
                }
                info!("strict comparison of {} and {}", old.source(), new.source());
                align_strict(old, new)?
            }
            AlignMode::Relaxed { include_old_only } => {
                info!(
                    "relaxed comparison of {} and {} (old-only entries {})",
                    old.source(),
                    new.source(),
                    if include_old_only { "included" } else { "skipped" }
                );
                align_relaxed(old, new, include_old_only)
            }
        };
        self.process(old, new, pairs, bridge)
    }

    fn process<B: EncodingBridge>(
        &mut self,
        old: &Catalog,
        new: &Catalog,
        pairs: Vec<AlignedPair<'_>>,
        bridge: B,
    ) -> Result<usize> {
        self.charset = new.charset();
        let detector = ChangeDetector::new(bridge, old, new);
        if let Some(transcoding) = detector.transcoding() {
            info!("comparing old text as {} (was {})", transcoding.to, transcoding.from);
        }

        for pair in pairs {
            if !detector.is_reportable(&pair)? {
                continue;
            }

            let change = self.renderer.change(&detector, pair, old.source(), new.source())?;
            let lines = self.renderer.render(&change);
            self.write_lines(&lines)?;

            if change.is_counted() {
                self.chunk_count += 1;
            }
        }

        debug!("{} messages reported", self.chunk_count);
        self.write_summary()?;
        Ok(self.chunk_count)
    }

    fn write_summary(&mut self) -> Result<()> {
        let count = format!(" Number of messages: {}", self.chunk_count);
        self.write_lines(&[SUMMARY_SEPARATOR, count.as_str(), SUMMARY_SEPARATOR])
    }

    fn write_lines<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<()> {
        for line in lines {
            let bytes = encode(line.as_ref(), self.charset, UnmappablePolicy::Substitute)?;
            self.out.write_all(&bytes)?;
            self.out.write_all(b"\n")?;
        }
        Ok(())
    }
}
