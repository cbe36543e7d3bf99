//! Streaming copy used by the cross-filesystem fallback.
//!
//! - Writes to a newly created destination file (O_EXCL semantics; never clobbers).
//! - Streams through one fixed-size buffer (1 MiB by default).
//! - Reports every chunk to a callback so callers can account bytes and draw progress.
//! - Syncs the destination to stable storage before returning.
//!
//! Snapshot semantics: the source is read once from start to EOF; bytes appended
//! concurrently may or may not be included.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

use super::helpers::io_error_with_help_io;
use crate::config::COPY_BUF_SIZE;

/// Copy `src` -> `dst` with the default buffer size.
pub fn copy_streaming(src: &Path, dst: &Path, on_chunk: impl FnMut(u64)) -> io::Result<u64> {
    copy_streaming_with(src, dst, COPY_BUF_SIZE, on_chunk)
}

/// Copy `src` -> `dst` through a `buf_size` buffer, calling `on_chunk(n)` after
/// each chunk of `n` bytes lands in the destination. Returns total bytes copied.
pub fn copy_streaming_with(
    src: &Path,
    dst: &Path,
    buf_size: usize,
    mut on_chunk: impl FnMut(u64),
) -> io::Result<u64> {
    let mut src_f = File::open(src).map_err(io_error_with_help_io("open source", src))?;
    let mut dst_f = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dst)
        .map_err(io_error_with_help_io("create destination", dst))?;

    let mut buf = vec![0u8; buf_size.max(1)];
    let mut total: u64 = 0;
    loop {
        let n = match src_f.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(io_error_with_help_io("read source", src)(e)),
        };
        dst_f
            .write_all(&buf[..n])
            .map_err(io_error_with_help_io("write destination", dst))?;
        total += n as u64;
        on_chunk(n as u64);
    }

    dst_f.flush()?;
    dst_f
        .sync_all()
        .map_err(io_error_with_help_io("sync destination", dst))?;
    Ok(total)
}
