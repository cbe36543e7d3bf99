//! Progress display for fallback copies.
//!
//! Every in-flight copy owns one bar inside a shared `MultiProgress`, so workers
//! copying at the same time each get their own line. Bars vanish when done.
//!
//! Bars and log lines share stderr. Log output written through
//! [`stderr_writer`] hides the bars for the duration of the write so a line
//! is never drawn over.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{self, Write};
use std::path::Path;
use std::sync::LazyLock;

static MULTI: LazyLock<MultiProgress> =
    LazyLock::new(|| MultiProgress::with_draw_target(ProgressDrawTarget::stderr_with_hz(10)));

const TEMPLATE: &str = "{spinner:.green} {msg:30!} [{bar:30.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})";

/// Shared multi-line copy progress.
pub struct CopyProgress {
    multi: MultiProgress,
    style: ProgressStyle,
}

impl CopyProgress {
    pub fn new() -> Self {
        let style = ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        Self {
            multi: MULTI.clone(),
            style,
        }
    }

    /// Start a bar for copying `src` (`total` bytes).
    pub fn start(&self, src: &Path, total: u64) -> CopyBar {
        let bar = self.multi.add(ProgressBar::new(total));
        bar.set_style(self.style.clone());
        let name = src
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        bar.set_message(name);
        CopyBar { bar }
    }
}

impl Default for CopyProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// One copy's line; cleared on drop.
pub struct CopyBar {
    bar: ProgressBar,
}

impl CopyBar {
    pub fn advance(&self, n: u64) {
        self.bar.inc(n);
    }

    #[cfg(test)]
    fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl Drop for CopyBar {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

/// stderr handle that suspends the copy bars around each write.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrWriter;

/// `MakeWriter`-compatible constructor for [`StderrWriter`].
pub fn stderr_writer() -> StderrWriter {
    StderrWriter
}

impl Write for StderrWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        MULTI.suspend(|| io::stderr().write(buf))
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        MULTI.suspend(|| io::stderr().lock().write_all(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}
