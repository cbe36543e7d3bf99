//! Empty-directory pruning after all jobs are done.
//!
//! Children before parents, so a chain of directories that only held moved
//! files collapses in one pass. The source root and the destination subtree
//! are never removed; non-empty directories simply fail `remove_dir`.

use std::fs;
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use super::walk::in_dest_subtree;
use crate::config::Roots;

/// Remove empty directories below the source root. Returns how many went.
pub fn prune_empty_dirs(roots: &Roots) -> u64 {
    let walker = WalkDir::new(&roots.source)
        .follow_links(false)
        .min_depth(1)
        .contents_first(true);

    let mut removed = 0;
    for entry in walker.into_iter().filter_entry(|e| !in_dest_subtree(e, roots)) {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!(error = %err, "prune: traversal error, continuing");
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        match fs::remove_dir(entry.path()) {
            Ok(()) => {
                debug!(dir = %entry.path().display(), "pruned empty directory");
                removed += 1;
            }
            Err(e) => trace!(dir = %entry.path().display(), error = %e, "kept directory"),
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn removes_empty_chains_keeps_others() {
        let td = tempdir().unwrap();
        let src = dunce::canonicalize(td.path()).unwrap();
        fs::create_dir_all(src.join("a/b/c")).unwrap();
        fs::create_dir_all(src.join("keep/inner")).unwrap();
        fs::write(src.join("keep/inner/f"), "x").unwrap();
        let dest = src.join("out");
        fs::create_dir(&dest).unwrap();

        let roots = Roots {
            source: src.clone(),
            dest: dest.clone(),
            dest_inside_source: true,
        };
        let n = prune_empty_dirs(&roots);
        assert_eq!(n, 3);
        assert!(!src.join("a").exists());
        assert!(src.join("keep/inner/f").exists());
        assert!(dest.is_dir(), "destination must survive even when empty");
        assert!(src.is_dir());
    }
}
