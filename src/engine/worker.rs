//! Worker loop: pop a job, pick its destination name, move it, count it.

use parking_lot::Mutex;
use tracing::{debug, error, info};

use super::queue::JobQueue;
use super::stats::Stats;
use super::walk::Job;
use crate::config::{CollisionMode, Options, Roots};
use crate::errors::MnfError;
use crate::fs_ops::{MoveMethod, MoveOptions, NameRegistry, Resolution, move_file, move_symlink};
use crate::progress::{CopyBar, CopyProgress};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Outcome {
    Moved,
    Skipped,
    Failed,
}

/// Everything a worker shares with its peers for one run.
pub(super) struct Shared<'a> {
    pub opts: &'a Options,
    pub roots: &'a Roots,
    pub queue: &'a JobQueue<Job>,
    pub names: &'a NameRegistry,
    pub stats: &'a Stats,
    pub progress: Option<&'a CopyProgress>,
    /// First fatal error raised by any worker.
    pub fatal: &'a Mutex<Option<MnfError>>,
}

impl Shared<'_> {
    /// Consume jobs until the queue is finished and drained (or aborted).
    pub(super) fn work(&self) {
        while let Some(job) = self.queue.pop() {
            match self.process(&job) {
                Ok(Outcome::Moved) => self.stats.record_moved(),
                Ok(Outcome::Skipped) => self.stats.record_skipped(),
                Ok(Outcome::Failed) => self.stats.record_failed(),
                Err(e) => {
                    error!(src = %job.src.display(), code = e.code(), kind = e.kind(), error = %e, "fatal error, aborting run");
                    self.stats.record_failed();
                    let dropped = self.queue.abort();
                    if dropped > 0 {
                        debug!(dropped, "pending jobs discarded");
                    }
                    self.fatal.lock().get_or_insert(e);
                    return;
                }
            }
        }
    }

    /// One job. `Err` is reserved for errors that end the run.
    pub(super) fn process(&self, job: &Job) -> Result<Outcome, MnfError> {
        let Some(name) = job.src.file_name() else {
            error!(src = %job.src.display(), "source has no file name");
            return Ok(Outcome::Failed);
        };

        let mode = self.opts.mode;
        let reserved = match self.names.resolve(&self.roots.dest, name, mode)? {
            Resolution::Taken(dest) => {
                debug!(src = %job.src.display(), dest = %dest.display(), "skip: destination exists");
                return Ok(Outcome::Skipped);
            }
            Resolution::Use(r) => r,
        };
        let dest = reserved.path();

        if self.opts.dry_run {
            info!(src = %job.src.display(), dest = %dest.display(), "dry-run: would move");
            return Ok(Outcome::Skipped);
        }

        let overwrite = mode == CollisionMode::Overwrite;
        let result = if job.is_symlink {
            move_symlink(&job.src, dest, overwrite)
        } else {
            let opts = MoveOptions {
                overwrite,
                preserve_times: self.opts.preserve_times,
            };
            let mut bar: Option<CopyBar> = None;
            move_file(&job.src, dest, opts, |n| {
                self.stats.add_bytes(n);
                if let Some(p) = self.progress {
                    bar.get_or_insert_with(|| p.start(&job.src, job.size)).advance(n);
                }
            })
            .map(|method| {
                if let MoveMethod::Copied { bytes } = method {
                    debug!(src = %job.src.display(), bytes, "copied across filesystems");
                }
            })
        };

        match result {
            Ok(()) => {
                debug!(rel = %job.rel.display(), depth = job.depth, dest = %dest.display(), "moved");
                Ok(Outcome::Moved)
            }
            Err(e) => {
                error!(src = %job.src.display(), dest = %dest.display(), error = %format!("{e:#}"), "move failed");
                Ok(Outcome::Failed)
            }
        }
    }
}
