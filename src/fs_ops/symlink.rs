//! Symlink relocation: the link itself is recreated, the target is never touched.

use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing::debug;

use super::file_move::clear_destination;
use super::helpers::io_error_with_help;

/// Recreate the link at `src` as `dest` (same target text), then remove `src`.
/// A failure part way through is not rolled back.
pub fn move_symlink(src: &Path, dest: &Path, overwrite: bool) -> Result<()> {
    let target = fs::read_link(src).map_err(io_error_with_help("read link", src))?;
    if overwrite {
        clear_destination(dest)?;
    }
    create_symlink(&target, dest).map_err(io_error_with_help("create symlink", dest))?;
    fs::remove_file(src).map_err(io_error_with_help("remove original link", src))?;
    debug!(src = %src.display(), dest = %dest.display(), target = %target.display(), "symlink recreated");
    Ok(())
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

#[cfg(not(any(unix, windows)))]
fn create_symlink(_target: &Path, _link: &Path) -> std::io::Result<()> {
    Err(std::io::Error::from(std::io::ErrorKind::Unsupported))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn link_is_recreated_with_same_target() {
        let td = tempdir().unwrap();
        let sub = td.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let link = sub.join("l");
        std::os::unix::fs::symlink("../target.txt", &link).unwrap();
        let dest = td.path().join("l");

        move_symlink(&link, &dest, false).unwrap();
        assert!(fs::symlink_metadata(&link).is_err());
        assert_eq!(fs::read_link(&dest).unwrap(), Path::new("../target.txt"));
    }

    #[test]
    fn broken_link_moves_too() {
        let td = tempdir().unwrap();
        let link = td.path().join("dangling");
        std::os::unix::fs::symlink("/does/not/exist", &link).unwrap();
        let dest = td.path().join("moved");

        move_symlink(&link, &dest, false).unwrap();
        assert_eq!(fs::read_link(&dest).unwrap(), Path::new("/does/not/exist"));
    }

    #[test]
    fn existing_dest_fails_without_overwrite() {
        let td = tempdir().unwrap();
        let link = td.path().join("l");
        std::os::unix::fs::symlink("x", &link).unwrap();
        let dest = td.path().join("taken");
        fs::write(&dest, "here").unwrap();

        assert!(move_symlink(&link, &dest, false).is_err());
        assert!(fs::symlink_metadata(&link).is_ok());

        move_symlink(&link, &dest, true).unwrap();
        assert_eq!(fs::read_link(&dest).unwrap(), Path::new("x"));
    }

    #[test]
    fn not_a_link_is_error() {
        let td = tempdir().unwrap();
        let f = td.path().join("plain");
        fs::write(&f, "x").unwrap();
        let err = move_symlink(&f, &td.path().join("d"), false).unwrap_err();
        assert!(err.to_string().contains("read link"), "{err}");
    }
}
