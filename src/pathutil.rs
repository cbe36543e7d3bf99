//! Path and name helpers shared by the filter, the name resolver and the workers.
//!
//! Extension rules: the extension is the text after the last `.` of the base
//! name, except that a name whose only dot is its first character (`.bashrc`)
//! has none.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::errors::MnfError;

/// Longest single file name we will produce.
pub const MAX_NAME_LEN: usize = 255;
/// Longest full destination path we will produce.
pub const MAX_PATH_LEN: usize = 4096;

#[cfg(unix)]
fn len_units(s: &OsStr) -> usize {
    use std::os::unix::ffi::OsStrExt;
    s.as_bytes().len()
}

#[cfg(not(unix))]
fn len_units(s: &OsStr) -> usize {
    s.to_string_lossy().len()
}

/// Join `dir` and `name`, failing when the result would exceed the name or path limits.
pub fn join_checked(dir: &Path, name: &OsStr) -> Result<PathBuf, MnfError> {
    let joined = dir.join(name);
    if len_units(name) > MAX_NAME_LEN || len_units(joined.as_os_str()) >= MAX_PATH_LEN {
        return Err(MnfError::PathTooLong(joined));
    }
    Ok(joined)
}

/// Extension of a base name without the dot; None for dotfiles and names without a dot.
pub fn extension_of(name: &str) -> Option<&str> {
    match name.rfind('.') {
        Some(0) | None => None,
        Some(i) => Some(&name[i + 1..]),
    }
}

/// Split a base name into stem and extension (extension keeps its leading dot).
///
/// - "photo.jpg"      -> ("photo", ".jpg")
/// - "archive.tar.gz" -> ("archive.tar", ".gz")
/// - ".gitignore"     -> (".gitignore", "")
/// - "README"         -> ("README", "")
pub fn split_name(name: &OsStr) -> (OsString, OsString) {
    match last_dot(name) {
        Some(0) | None => (name.to_os_string(), OsString::new()),
        Some(i) => split_at(name, i),
    }
}

#[cfg(unix)]
fn last_dot(name: &OsStr) -> Option<usize> {
    use std::os::unix::ffi::OsStrExt;
    name.as_bytes().iter().rposition(|b| *b == b'.')
}

#[cfg(unix)]
fn split_at(name: &OsStr, i: usize) -> (OsString, OsString) {
    use std::os::unix::ffi::OsStrExt;
    let bytes = name.as_bytes();
    (
        OsStr::from_bytes(&bytes[..i]).to_os_string(),
        OsStr::from_bytes(&bytes[i..]).to_os_string(),
    )
}

#[cfg(not(unix))]
fn last_dot(name: &OsStr) -> Option<usize> {
    name.to_string_lossy().rfind('.')
}

#[cfg(not(unix))]
fn split_at(name: &OsStr, i: usize) -> (OsString, OsString) {
    let s = name.to_string_lossy();
    (OsString::from(&s[..i]), OsString::from(&s[i..]))
}

/// Case-insensitive membership test for an extension list.
pub fn ext_in_list(list: &[String], ext: &str) -> bool {
    list.iter().any(|e| e.eq_ignore_ascii_case(ext))
}

/// Compile glob patterns into a set matched against source-relative paths.
/// Matching ignores case, `*`/`?` stay within one path component and `**` spans components.
pub fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>, MnfError> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .case_insensitive(true)
            .literal_separator(true)
            .build()
            .map_err(|e| MnfError::InvalidGlob(format!("{pattern}: {e}")))?;
        builder.add(glob);
    }
    builder
        .build()
        .map(Some)
        .map_err(|e| MnfError::InvalidGlob(e.to_string()))
}
