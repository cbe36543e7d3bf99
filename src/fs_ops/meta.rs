//! Metadata preservation for copied files.
//! Permission bits are always carried over; timestamps only when asked.

use filetime::{FileTime, set_file_times};
use std::fs::{self, Metadata};
use std::io;
use std::path::Path;
use tracing::debug;

pub(super) fn preserve_metadata(src_meta: &Metadata, dest: &Path, preserve_times: bool) -> io::Result<()> {
    fs::set_permissions(dest, src_meta.permissions())?;

    if !preserve_times {
        return Ok(());
    }

    let (at, mt) = {
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            let at = FileTime::from_unix_time(src_meta.atime(), src_meta.atime_nsec() as u32);
            let mt = FileTime::from_unix_time(src_meta.mtime(), src_meta.mtime_nsec() as u32);
            (Some(at), Some(mt))
        }
        #[cfg(not(unix))]
        {
            let at = src_meta.accessed().ok().map(FileTime::from_system_time);
            let mt = src_meta.modified().ok().map(FileTime::from_system_time);
            (at, mt)
        }
    };

    if let (Some(at), Some(mt)) = (at, mt)
        && let Err(e) = set_file_times(dest, at, mt)
    {
        debug!(dest = %dest.display(), error = %e, "could not set file times");
    }
    Ok(())
}
