//! Source traversal (the producer side).
//!
//! Walks the source root once, on the calling thread, handing every eligible
//! regular file (and symlink, when enabled) to `sink`. Directory symlinks are
//! leaves, never descended into. When the destination lives inside the source,
//! its whole subtree is cut off at the directory boundary.

use std::path::PathBuf;
use tracing::{debug, trace, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::{Options, Roots};
use crate::filter::{Candidate, Filter};

/// One file or symlink queued for relocation.
#[derive(Debug, Clone)]
pub struct Job {
    /// Absolute source path
    pub src: PathBuf,
    /// Path relative to the source root
    pub rel: PathBuf,
    /// Walk depth (root = 0)
    pub depth: usize,
    pub is_symlink: bool,
    /// Size at discovery; drives progress totals
    pub size: u64,
}

/// True when `entry` is a real directory inside the destination subtree.
/// Directories whose canonical path cannot be resolved are treated the same.
pub(super) fn in_dest_subtree(entry: &DirEntry, roots: &Roots) -> bool {
    if !roots.dest_inside_source || !entry.file_type().is_dir() {
        return false;
    }
    match dunce::canonicalize(entry.path()) {
        Ok(canonical) => {
            if roots.is_in_dest(&canonical) {
                debug!(dir = %entry.path().display(), "skipping destination subtree");
                true
            } else {
                false
            }
        }
        Err(e) => {
            warn!(dir = %entry.path().display(), error = %e, "cannot resolve directory, skipping it");
            true
        }
    }
}

/// Walk the source tree and feed jobs to `sink`. Stops early when `sink`
/// returns false. Returns the number of jobs handed over.
pub fn walk(opts: &Options, roots: &Roots, filter: &Filter, mut sink: impl FnMut(Job) -> bool) -> u64 {
    let mut walker = WalkDir::new(&roots.source).follow_links(false).min_depth(1);
    if let Some(limit) = opts.walk_depth_limit() {
        walker = walker.max_depth(limit);
    }

    let mut discovered: u64 = 0;
    for entry in walker.into_iter().filter_entry(|e| !in_dest_subtree(e, roots)) {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                let path = err.path().map(|p| p.display().to_string()).unwrap_or_default();
                warn!(path = %path, error = %err, "traversal error, continuing");
                continue;
            }
        };

        let ft = entry.file_type();
        if ft.is_dir() {
            continue;
        }
        let is_symlink = ft.is_symlink();
        if is_symlink && !opts.include_symlinks {
            trace!(path = %entry.path().display(), "symlink ignored");
            continue;
        }
        if !is_symlink && !ft.is_file() {
            trace!(path = %entry.path().display(), "not a regular file");
            continue;
        }
        if !opts.admits_depth(entry.depth()) {
            continue;
        }

        // follow_links(false): this is lstat, so symlinks report their own size.
        let meta = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "cannot stat entry, skipping");
                continue;
            }
        };

        let rel = entry
            .path()
            .strip_prefix(&roots.source)
            .unwrap_or(entry.path())
            .to_path_buf();
        let name = entry.file_name().to_string_lossy();
        let candidate = Candidate {
            rel: &rel,
            name: &name,
            size: meta.len(),
            modified: meta.modified().ok(),
        };
        if !filter.accepts(&candidate) {
            trace!(path = %rel.display(), "filtered out");
            continue;
        }

        let job = Job {
            src: entry.path().to_path_buf(),
            rel,
            depth: entry.depth(),
            is_symlink,
            size: meta.len(),
        };
        if !sink(job) {
            debug!("queue closed, stopping traversal");
            break;
        }
        discovered += 1;
    }
    discovered
}
