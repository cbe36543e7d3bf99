//! Concurrent relocation engine.
//!
//! Workers are spawned first and block on the queue; the calling thread then
//! walks the source tree as the sole producer, so discovery and moves overlap.
//! Once the walk ends the queue is finished, workers drain it and exit, and
//! empty directories are pruned if asked.

mod prune;
mod queue;
mod stats;
mod walk;
mod worker;

pub use prune::prune_empty_dirs;
pub use queue::JobQueue;
pub use stats::{Stats, StatsSnapshot};
pub use walk::{Job, walk};

use anyhow::{Context, Result};
use humansize::{BINARY, format_size};
use parking_lot::Mutex;
use std::fmt;
use std::thread;
use tracing::{debug, info};

use crate::config::{Options, Roots};
use crate::filter::Filter;
use crate::fs_ops::NameRegistry;
use crate::progress::CopyProgress;
use worker::Shared;

/// What a finished run reports back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub stats: StatsSnapshot,
    /// Jobs handed to the pool by the walker.
    pub discovered: u64,
    pub pruned_dirs: u64,
}

impl RunSummary {
    /// No job failed.
    pub fn exit_ok(&self) -> bool {
        self.stats.failed == 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.stats;
        write!(
            f,
            "Done. Moved: {}, Skipped: {}, Failed: {}, Bytes copied: {} ({})",
            s.moved,
            s.skipped,
            s.failed,
            s.bytes_copied,
            format_size(s.bytes_copied, BINARY)
        )
    }
}

/// Validate the roots, then run.
pub fn run(opts: &Options) -> Result<RunSummary> {
    let roots = opts.validate_roots()?;
    run_with_roots(opts, &roots)
}

/// Run against roots that were already validated.
pub fn run_with_roots(opts: &Options, roots: &Roots) -> Result<RunSummary> {
    let filter = Filter::new(opts)?;
    let queue = JobQueue::new();
    let names = NameRegistry::new();
    let stats = Stats::new();
    let progress = opts.progress.then(CopyProgress::new);
    let fatal = Mutex::new(None);
    let workers = opts.worker_count();

    info!(
        source = %roots.source.display(),
        dest = %roots.dest.display(),
        threads = workers,
        mode = %opts.mode,
        dry_run = opts.dry_run,
        "starting"
    );

    let shared = Shared {
        opts,
        roots,
        queue: &queue,
        names: &names,
        stats: &stats,
        progress: progress.as_ref(),
        fatal: &fatal,
    };

    let discovered = thread::scope(|s| -> Result<u64> {
        for i in 0..workers {
            let spawned = thread::Builder::new()
                .name(format!("mnf-worker-{i}"))
                .spawn_scoped(s, || shared.work());
            if let Err(e) = spawned {
                queue.abort();
                return Err(e).with_context(|| format!("spawn worker {i}"));
            }
        }
        let n = walk(opts, roots, &filter, |job| queue.push(job));
        queue.finish();
        debug!(discovered = n, "traversal finished");
        Ok(n)
    })?;

    if let Some(e) = fatal.into_inner() {
        return Err(e.into());
    }

    let stats = stats.snapshot();
    debug!(discovered, processed = stats.total(), "workers drained");

    let pruned_dirs = if opts.prune_empty_dirs && !opts.dry_run {
        prune_empty_dirs(roots)
    } else {
        0
    };

    Ok(RunSummary {
        stats,
        discovered,
        pruned_dirs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_line_format() {
        let s = RunSummary {
            stats: StatsSnapshot {
                moved: 3,
                skipped: 1,
                failed: 0,
                bytes_copied: 2048,
            },
            discovered: 4,
            pruned_dirs: 0,
        };
        let line = s.to_string();
        assert!(
            line.starts_with("Done. Moved: 3, Skipped: 1, Failed: 0, Bytes copied: 2048 ("),
            "{line}"
        );
        assert!(line.ends_with("KiB)"), "{line}");
        assert!(s.exit_ok());
    }

    #[test]
    fn failures_flip_exit_status() {
        let s = RunSummary {
            stats: StatsSnapshot {
                failed: 1,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(!s.exit_ok());
    }
}
