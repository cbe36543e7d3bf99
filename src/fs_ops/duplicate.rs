//! Duplicate-name resolution.
//!
//! Policy per collision mode:
//! - Rename: pick `stem.ext`, else `stem_1.ext`, `stem_2.ext`, ... whichever is free.
//! - Skip: claim `stem.ext` only when it is free; otherwise the caller skips.
//! - Overwrite: always `stem.ext`, never reserved (last writer wins).
//!
//! A name counts as taken when it exists on disk or is reserved by a job that
//! is still in flight. The check and the reservation happen under one lock, so
//! two workers never pick the same name. Processes outside this one are not
//! covered.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::trace;

use crate::config::CollisionMode;
use crate::errors::MnfError;
use crate::pathutil::{join_checked, split_name};

/// Outcome of resolving a destination name.
#[derive(Debug)]
pub enum Resolution<'a> {
    /// Move to this path; the name stays reserved until the guard drops.
    Use(Reserved<'a>),
    /// Skip mode and the name is already taken.
    Taken(PathBuf),
}

/// Shared name registry for one run.
#[derive(Debug, Default)]
pub struct NameRegistry {
    reserved: Mutex<HashSet<PathBuf>>,
}

/// RAII reservation of a destination path.
#[derive(Debug)]
pub struct Reserved<'a> {
    registry: Option<&'a NameRegistry>,
    path: PathBuf,
}

impl Reserved<'_> {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Reserved<'_> {
    fn drop(&mut self) {
        if let Some(registry) = self.registry {
            registry.reserved.lock().remove(&self.path);
        }
    }
}

fn exists_on_disk(p: &Path) -> bool {
    fs::symlink_metadata(p).is_ok()
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the destination for `name` inside `dest_dir` under `mode`.
    /// Fails only when the resulting path would be too long.
    pub fn resolve(
        &self,
        dest_dir: &Path,
        name: &OsStr,
        mode: CollisionMode,
    ) -> Result<Resolution<'_>, MnfError> {
        let candidate = join_checked(dest_dir, name)?;
        let mut reserved = self.reserved.lock();

        let path = match mode {
            CollisionMode::Overwrite => {
                return Ok(Resolution::Use(Reserved {
                    registry: None,
                    path: candidate,
                }));
            }
            CollisionMode::Skip => {
                if reserved.contains(&candidate) || exists_on_disk(&candidate) {
                    return Ok(Resolution::Taken(candidate));
                }
                candidate
            }
            CollisionMode::Rename => {
                let taken = |p: &Path| reserved.contains(p) || exists_on_disk(p);
                if !taken(&candidate) {
                    candidate
                } else {
                    unique_with_numeric_suffix(dest_dir, name, taken)?
                }
            }
        };

        reserved.insert(path.clone());
        Ok(Resolution::Use(Reserved {
            registry: Some(self),
            path,
        }))
    }
}

/// Probe `stem_1.ext`, `stem_2.ext`, ... until `taken` says no.
fn unique_with_numeric_suffix(
    dest_dir: &Path,
    name: &OsStr,
    taken: impl Fn(&Path) -> bool,
) -> Result<PathBuf, MnfError> {
    let (stem, ext) = split_name(name);
    let mut n: u64 = 1;
    loop {
        let mut new_name = OsString::with_capacity(stem.len() + ext.len() + 8);
        new_name.push(&stem);
        new_name.push(format!("_{n}"));
        new_name.push(&ext);

        let candidate = join_checked(dest_dir, &new_name)?;
        if !taken(&candidate) {
            return Ok(candidate);
        }
        if n == 3 {
            trace!(name = ?name, dir = %dest_dir.display(), "duplicate: multiple collisions, still searching");
        }
        n += 1;
    }
}
