//! File move implementation.
//! Attempts an atomic rename; across filesystems falls back to a streamed copy
//! into a temp file, renamed into place, then removes the source.

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

use super::helpers::io_error_with_help;
use super::io_copy::copy_streaming;
use super::meta::preserve_metadata;
use super::util::{fsync_dir, is_cross_device, unique_temp_path};

/// Per-move knobs taken from the run options.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveOptions {
    /// Remove whatever sits at the destination first.
    pub overwrite: bool,
    pub preserve_times: bool,
}

/// How a file got to its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveMethod {
    Renamed,
    Copied { bytes: u64 },
}

/// Remove an existing destination entry; a missing one is fine.
pub(super) fn clear_destination(dest: &Path) -> Result<()> {
    match fs::remove_file(dest) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(io_error_with_help("remove existing destination", dest)(e)),
    }
}

/// Move regular file `src` to exactly `dest`.
///
/// `on_chunk` sees every chunk written by the copy fallback; it is never
/// called when the rename succeeds.
pub fn move_file(src: &Path, dest: &Path, opts: MoveOptions, on_chunk: impl FnMut(u64)) -> Result<MoveMethod> {
    if opts.overwrite {
        clear_destination(dest)?;
    }

    match fs::rename(src, dest) {
        Ok(()) => {
            debug!(src = %src.display(), dest = %dest.display(), "renamed");
            Ok(MoveMethod::Renamed)
        }
        Err(e) if is_cross_device(&e) => {
            debug!(src = %src.display(), dest = %dest.display(), "cross-device rename, copying");
            let bytes = copy_then_rename(src, dest, opts.preserve_times, on_chunk)?;
            fs::remove_file(src).map_err(io_error_with_help("remove source after copy", src))?;
            Ok(MoveMethod::Copied { bytes })
        }
        Err(e) => Err(io_error_with_help("rename", src)(e)),
    }
}

/// Copy into a hidden temp file next to `dest`, then rename it into place.
fn copy_then_rename(src: &Path, dest: &Path, preserve_times: bool, on_chunk: impl FnMut(u64)) -> Result<u64> {
    let src_meta = fs::metadata(src).map_err(io_error_with_help("stat source", src))?;
    let dest_dir = dest.parent().unwrap_or_else(|| Path::new("."));
    let tmp = unique_temp_path(dest_dir);

    let result = (|| -> Result<u64> {
        let bytes = copy_streaming(src, &tmp, on_chunk)
            .with_context(|| format!("copy '{}' -> '{}'", src.display(), dest.display()))?;
        preserve_metadata(&src_meta, &tmp, preserve_times)
            .map_err(io_error_with_help("set permissions", &tmp))?;
        fs::rename(&tmp, dest).map_err(io_error_with_help("rename temp into place", dest))?;
        Ok(bytes)
    })();

    match result {
        Ok(bytes) => {
            if let Err(e) = fsync_dir(dest_dir) {
                warn!(dir = %dest_dir.display(), error = %e, "fsync of destination directory failed");
            }
            Ok(bytes)
        }
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn same_fs_rename_moves_file() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.txt");
        let dst = td.path().join("b.txt");
        fs::write(&src, "hello").unwrap();

        let mut chunks = 0;
        let m = move_file(&src, &dst, MoveOptions::default(), |_| chunks += 1).unwrap();
        assert_eq!(m, MoveMethod::Renamed);
        assert_eq!(chunks, 0);
        assert!(!src.exists());
        assert_eq!(fs::read_to_string(&dst).unwrap(), "hello");
    }

    #[test]
    fn overwrite_replaces_existing() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.txt");
        let dst = td.path().join("b.txt");
        fs::write(&src, "new").unwrap();
        fs::write(&dst, "old").unwrap();

        let opts = MoveOptions { overwrite: true, preserve_times: true };
        move_file(&src, &dst, opts, |_| {}).unwrap();
        assert_eq!(fs::read_to_string(&dst).unwrap(), "new");
        assert!(!src.exists());
    }

    #[test]
    fn copy_path_leaves_no_temp_files() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.bin");
        let out = td.path().join("out");
        fs::create_dir(&out).unwrap();
        let dst = out.join("a.bin");
        fs::write(&src, vec![7u8; 3000]).unwrap();

        let mut seen = 0;
        let n = copy_then_rename(&src, &dst, true, |c| seen += c).unwrap();
        assert_eq!(n, 3000);
        assert_eq!(seen, 3000);
        assert_eq!(fs::read(&dst).unwrap().len(), 3000);
        let names: Vec<_> = fs::read_dir(&out).unwrap().map(|e| e.unwrap().file_name()).collect();
        assert_eq!(names, vec![std::ffi::OsString::from("a.bin")]);
    }

    #[test]
    fn missing_source_is_error() {
        let td = tempdir().unwrap();
        let err = move_file(
            &td.path().join("nope"),
            &td.path().join("dst"),
            MoveOptions::default(),
            |_| {},
        )
        .unwrap_err();
        assert!(err.to_string().contains("rename"), "{err}");
    }
}
