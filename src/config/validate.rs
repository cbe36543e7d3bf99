//! Root validation.
//! Resolves the source and destination to canonical paths once, creating the
//! destination when needed and probing it for writability.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::types::{Options, Roots};
use crate::errors::MnfError;

impl Options {
    /// Resolve and check both roots. Every failure here is fatal for the run.
    ///
    /// - source must exist and be a directory.
    /// - dest is created if missing (not in dry-run) and must be writable (not in dry-run).
    /// - source and dest must not resolve to the same directory.
    pub fn validate_roots(&self) -> Result<Roots, MnfError> {
        let source = dunce::canonicalize(&self.source)
            .map_err(|_| MnfError::SourceNotFound(self.source.clone()))?;
        if !source.is_dir() {
            return Err(MnfError::SourceNotDir(source));
        }
        fs::read_dir(&source).map_err(|_| MnfError::SourceNotFound(source.clone()))?;
        debug!(path = %source.display(), "source readable");

        let dest = if self.dest.exists() || !self.dry_run {
            if !self.dest.exists() {
                fs::create_dir_all(&self.dest).map_err(|e| MnfError::DestinationCreate {
                    path: self.dest.clone(),
                    source: e,
                })?;
                info!(path = %self.dest.display(), "Created destination directory");
            }
            dunce::canonicalize(&self.dest).map_err(|e| MnfError::DestinationCreate {
                path: self.dest.clone(),
                source: e,
            })?
        } else {
            resolve_missing(&self.dest).map_err(|e| MnfError::DestinationCreate {
                path: self.dest.clone(),
                source: e,
            })?
        };

        if dest.exists() && !dest.is_dir() {
            return Err(MnfError::DestinationCreate {
                path: dest,
                source: std::io::Error::other("exists but is not a directory"),
            });
        }
        if dest == source {
            return Err(MnfError::SameRoots(source));
        }
        if !self.dry_run {
            is_writable_probe(&dest).map_err(|_| MnfError::DestinationNotWritable(dest.clone()))?;
            debug!(path = %dest.display(), "destination writable");
        }

        let dest_inside_source = dest.starts_with(&source);
        Ok(Roots {
            source,
            dest,
            dest_inside_source,
        })
    }
}

/// Absolute form of a path that does not exist yet: canonicalize the nearest
/// existing ancestor and re-append the missing tail.
fn resolve_missing(path: &Path) -> std::io::Result<PathBuf> {
    let abs = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    let mut tail = Vec::new();
    let mut cur = abs.as_path();
    loop {
        if cur.exists() {
            let mut out = dunce::canonicalize(cur)?;
            out.extend(tail.iter().rev());
            return Ok(out);
        }
        match (cur.file_name(), cur.parent()) {
            (Some(name), Some(parent)) => {
                tail.push(name.to_os_string());
                cur = parent;
            }
            _ => return Ok(abs),
        }
    }
}

/// Quick writable probe: create and remove a small file in `dir`.
/// Uses create_new to avoid clobbering existing files.
pub(crate) fn is_writable_probe(dir: &Path) -> std::io::Result<()> {
    let probe = dir.join(format!(".mnf_probe_{}.tmp", std::process::id()));
    fs::OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(&probe)?;
    let _ = fs::remove_file(&probe);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_missing_dest() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        fs::create_dir_all(&src).unwrap();
        let dst = td.path().join("out/flat");
        let roots = Options::new(&src, &dst).validate_roots().unwrap();
        assert!(dst.is_dir());
        assert!(!roots.dest_inside_source);
    }

    #[test]
    fn dry_run_does_not_create_dest() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        fs::create_dir_all(&src).unwrap();
        let dst = src.join("flat");
        let opts = Options {
            dry_run: true,
            ..Options::new(&src, &dst)
        };
        let roots = opts.validate_roots().unwrap();
        assert!(!dst.exists());
        assert!(roots.dest_inside_source);
        assert_eq!(roots.dest, roots.source.join("flat"));
    }

    #[test]
    fn missing_source_is_fatal() {
        let td = tempdir().unwrap();
        let err = Options::new(td.path().join("nope"), td.path().join("d"))
            .validate_roots()
            .unwrap_err();
        assert!(matches!(err, MnfError::SourceNotFound(_)));
    }

    #[test]
    fn same_roots_rejected() {
        let td = tempdir().unwrap();
        let err = Options::new(td.path(), td.path()).validate_roots().unwrap_err();
        assert!(matches!(err, MnfError::SameRoots(_)));
    }

    #[test]
    fn file_as_source_rejected() {
        let td = tempdir().unwrap();
        let f = td.path().join("f.txt");
        fs::write(&f, "x").unwrap();
        let err = Options::new(&f, td.path().join("d")).validate_roots().unwrap_err();
        assert!(matches!(err, MnfError::SourceNotDir(_)));
    }
}
