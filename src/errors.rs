//! Typed error definitions for mnf.
//! Covers the fatal failure modes; per-job failures stay as `anyhow` errors with context.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MnfError {
    #[error("Source not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Source is not a directory: {0}")]
    SourceNotDir(PathBuf),

    #[error("Cannot create destination {path}: {source}")]
    DestinationCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No write permission in destination: {0}")]
    DestinationNotWritable(PathBuf),

    #[error("Source and destination resolve to the same directory: {0}")]
    SameRoots(PathBuf),

    #[error("Path too long: {0}")]
    PathTooLong(PathBuf),

    #[error("Invalid size '{0}': expected a number with optional K/M/G/T suffix")]
    InvalidSize(String),

    #[error("Invalid time spec '{0}': expected YYYY-MM-DD or <int>[d|h|m|s]")]
    InvalidTimeSpec(String),

    #[error("Invalid glob pattern {0}")]
    InvalidGlob(String),

    #[error("Invalid config file {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("{0} file(s) failed to move")]
    JobsFailed(u64),
}

impl MnfError {
    /// Stable numeric code for structured logs.
    pub fn code(&self) -> u16 {
        match self {
            MnfError::SourceNotFound(_) => 10,
            MnfError::SourceNotDir(_) => 11,
            MnfError::DestinationCreate { .. } => 20,
            MnfError::DestinationNotWritable(_) => 21,
            MnfError::SameRoots(_) => 22,
            MnfError::PathTooLong(_) => 30,
            MnfError::InvalidSize(_) => 40,
            MnfError::InvalidTimeSpec(_) => 41,
            MnfError::InvalidGlob(_) => 42,
            MnfError::ConfigInvalid { .. } => 43,
            MnfError::JobsFailed(_) => 50,
        }
    }

    /// Short machine-friendly kind, used as the `kind` log field.
    pub fn kind(&self) -> &'static str {
        match self {
            MnfError::SourceNotFound(_) => "source_not_found",
            MnfError::SourceNotDir(_) => "source_not_dir",
            MnfError::DestinationCreate { .. } => "destination_create",
            MnfError::DestinationNotWritable(_) => "destination_not_writable",
            MnfError::SameRoots(_) => "same_roots",
            MnfError::PathTooLong(_) => "path_too_long",
            MnfError::InvalidSize(_) => "invalid_size",
            MnfError::InvalidTimeSpec(_) => "invalid_time_spec",
            MnfError::InvalidGlob(_) => "invalid_glob",
            MnfError::ConfigInvalid { .. } => "config_invalid",
            MnfError::JobsFailed(_) => "jobs_failed",
        }
    }
}
