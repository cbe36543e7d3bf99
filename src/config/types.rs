//! Core configuration types.
//! - Options holds one run's settings with sensible defaults.
//! - CollisionMode decides what happens when the destination name is taken.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::SystemTime;

use clap::ValueEnum;

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// Per-file moves and skips
    Verbose,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" | "info" => Some(LogLevel::Normal),
            "verbose" | "detailed" => Some(LogLevel::Verbose),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }

    /// Level selected by `-q` and a count of `-v` flags, starting from `base`.
    /// `-q` wins over any number of `-v`.
    pub fn from_flags(base: LogLevel, quiet: bool, verbose: u8) -> Self {
        if quiet {
            return LogLevel::Quiet;
        }
        let mut lvl = base;
        for _ in 0..verbose {
            lvl = match lvl {
                LogLevel::Quiet => LogLevel::Normal,
                LogLevel::Normal => LogLevel::Verbose,
                LogLevel::Verbose | LogLevel::Debug => LogLevel::Debug,
            };
        }
        lvl
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Verbose => "verbose",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// What to do when a file with the same name already sits in the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CollisionMode {
    /// Pick a free name: `a.txt`, `a_1.txt`, `a_2.txt`, ...
    #[default]
    Rename,
    /// Leave the source in place and count it as skipped.
    Skip,
    /// Replace the existing destination file.
    Overwrite,
}

impl fmt::Display for CollisionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CollisionMode::Rename => "rename",
            CollisionMode::Skip => "skip",
            CollisionMode::Overwrite => "overwrite",
        };
        f.write_str(s)
    }
}

impl FromStr for CollisionMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rename" => Ok(CollisionMode::Rename),
            "skip" => Ok(CollisionMode::Skip),
            "overwrite" => Ok(CollisionMode::Overwrite),
            _ => Err(format!("invalid mode: '{s}' (expected rename, skip or overwrite)")),
        }
    }
}

/// Runtime configuration for one source/destination run.
/// Built once from defaults, the optional config file and CLI flags; read-only afterwards.
#[derive(Debug, Clone)]
pub struct Options {
    /// Directory whose nested files are relocated
    pub source: PathBuf,
    /// Flat destination directory
    pub dest: PathBuf,
    /// Worker thread count (at least 1)
    pub threads: usize,
    /// Collision policy
    pub mode: CollisionMode,
    /// Minimum nesting level to move (0 = include files directly in the source)
    pub min_depth: usize,
    /// Maximum nesting level to move; None = unbounded
    pub max_depth: Option<usize>,
    /// If true, log actions but do not modify the filesystem
    pub dry_run: bool,
    /// Show per-file progress for fallback copies
    pub progress: bool,
    /// Keep atime/mtime on fallback copies
    pub preserve_times: bool,
    /// Move symlinks too (recreated in the destination)
    pub include_symlinks: bool,
    /// Remove source directories left empty after the run
    pub prune_empty_dirs: bool,
    pub min_size: Option<u64>,
    pub max_size: Option<u64>,
    /// Only files modified at or after this instant
    pub newer_than: Option<SystemTime>,
    /// Only files modified at or before this instant
    pub older_than: Option<SystemTime>,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub allow_ext: Vec<String>,
    pub deny_ext: Vec<String>,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            dest: PathBuf::new(),
            threads: 1,
            mode: CollisionMode::Rename,
            min_depth: 1,
            max_depth: None,
            dry_run: false,
            progress: false,
            preserve_times: true,
            include_symlinks: false,
            prune_empty_dirs: false,
            min_size: None,
            max_size: None,
            newer_than: None,
            older_than: None,
            includes: Vec::new(),
            excludes: Vec::new(),
            allow_ext: Vec::new(),
            deny_ext: Vec::new(),
            log_level: LogLevel::Normal,
            log_file: None,
        }
    }
}

impl Options {
    /// Construct Options with explicit roots; other fields use defaults.
    pub fn new(source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
            ..Default::default()
        }
    }

    /// Effective worker count; never below one.
    #[inline]
    pub fn worker_count(&self) -> usize {
        self.threads.max(1)
    }

    /// Whether an entry found at walk `depth` (root children = 1) lies in the
    /// configured window. The window is expressed in nesting levels, `depth - 1`.
    pub fn admits_depth(&self, depth: usize) -> bool {
        if depth == 0 {
            return false;
        }
        let level = depth - 1;
        level >= self.min_depth && self.max_depth.is_none_or(|max| level <= max)
    }

    /// Deepest walk depth worth visiting; None = unbounded.
    pub fn walk_depth_limit(&self) -> Option<usize> {
        self.max_depth.map(|max| max.saturating_add(1))
    }
}

/// Canonical forms of the two roots, computed once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roots {
    pub source: PathBuf,
    pub dest: PathBuf,
    /// The destination lies inside the source tree and must be excluded from the walk.
    pub dest_inside_source: bool,
}

impl Roots {
    /// True when `canonical` is the destination or lies under it.
    #[inline]
    pub fn is_in_dest(&self, canonical: &std::path::Path) -> bool {
        canonical.starts_with(&self.dest)
    }
}
