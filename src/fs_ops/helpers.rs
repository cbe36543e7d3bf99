//! I/O error enrichment.
//!
//! Adds the operation, the path and a short platform-aware hint to io errors so
//! per-job failure lines are actionable on their own.
//!
//!   fs::remove_file(src).map_err(io_error_with_help("remove source", src))?;

use anyhow::anyhow;
use std::io;
use std::path::Path;

/// Short hint for well-known OS error codes.
fn hint_for(e: &io::Error) -> Option<&'static str> {
    #[cfg(unix)]
    if let Some(code) = e.raw_os_error() {
        let hint = match code {
            libc::EACCES | libc::EPERM => "permission denied; check ownership and write permissions",
            libc::EXDEV => "cross-filesystem; atomic rename not possible",
            libc::EBUSY => "resource busy; another process may be using it",
            libc::ENOENT => "path not found; it may have been moved concurrently",
            libc::EEXIST => "already exists",
            libc::ENOSPC => "no space left on device",
            libc::EROFS => "read-only filesystem",
            libc::ELOOP => "too many levels of symbolic links",
            libc::ENAMETOOLONG => "file name or path too long",
            libc::EMFILE | libc::ENFILE => "too many open files; lower --threads or raise limits",
            libc::EISDIR => "target is a directory",
            _ => return None,
        };
        return Some(hint);
    }

    match e.kind() {
        io::ErrorKind::PermissionDenied => Some("permission denied; check ownership and write permissions"),
        io::ErrorKind::NotFound => Some("path not found; it may have been moved concurrently"),
        io::ErrorKind::AlreadyExists => Some("already exists"),
        _ => None,
    }
}

/// Format a human-friendly message with op/path plus hint and OS code.
fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);
    if let Some(hint) = hint_for(e) {
        msg.push_str(" (");
        msg.push_str(hint);
        msg.push(')');
    }
    if let Some(code) = e.raw_os_error() {
        msg.push_str(&format!(" [os code: {code}]"));
    }
    msg
}

/// Adapter for anyhow::Result code: `.map_err(io_error_with_help(op, path))`.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> anyhow::Error + 'a {
    move |e: io::Error| anyhow!(build_message(op, path, &e))
}

/// Adapter for io::Result code; keeps the original ErrorKind.
pub fn io_error_with_help_io<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> io::Error + 'a {
    move |e: io::Error| io::Error::new(e.kind(), build_message(op, path, &e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_contains_op_path_and_hint() {
        let e = io::Error::from(io::ErrorKind::NotFound);
        let err = io_error_with_help("open source", Path::new("/x/y"))(e);
        let msg = err.to_string();
        assert!(msg.contains("open source '/x/y'"), "{msg}");
        assert!(msg.contains("path not found"), "{msg}");
    }

    #[cfg(unix)]
    #[test]
    fn io_variant_keeps_kind_and_code() {
        let e = io::Error::from_raw_os_error(libc::EXDEV);
        let out = io_error_with_help_io("rename", Path::new("/a"))(e);
        let msg = out.to_string();
        assert!(msg.contains("cross-filesystem"), "{msg}");
        assert!(msg.contains(&format!("[os code: {}]", libc::EXDEV)), "{msg}");
    }
}
