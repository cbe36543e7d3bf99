//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - Comma lists (--include, --exclude, --allow-ext, --deny-ext) may be repeated.
//! - Size and time specs are validated by clap, so bad input is a usage error.

use clap::{ArgAction, Parser, ValueHint};
use std::path::PathBuf;
use std::time::SystemTime;

use crate::config::{CollisionMode, LogLevel, Options, parse_size, parse_time_spec, split_list};

/// Flatten files from nested subdirectories into one destination directory.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Move files out of nested subdirectories into one flat directory")]
pub struct Args {
    /// Directory tree to collect files from.
    #[arg(value_name = "SOURCE_DIR", value_hint = ValueHint::DirPath, required_unless_present = "print_config")]
    pub source: Option<PathBuf>,

    /// Flat directory that receives the files (created if missing).
    #[arg(value_name = "DEST_DIR", value_hint = ValueHint::DirPath, required_unless_present = "print_config")]
    pub dest: Option<PathBuf>,

    /// What to do when the destination name is taken.
    #[arg(long, value_enum, value_name = "MODE")]
    pub mode: Option<CollisionMode>,

    /// Show what would be moved without touching anything.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Number of worker threads (0 is treated as 1).
    #[arg(short = 't', long, value_name = "N", allow_negative_numbers = true)]
    pub threads: Option<i64>,

    /// More output; repeat for more (-v per-file, -vv debug).
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Errors only.
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Show progress bars for cross-filesystem copies.
    #[arg(long)]
    pub progress: bool,

    /// Do not carry access/modification times over on copies.
    #[arg(long)]
    pub no_preserve_times: bool,

    /// Move symlinks too (the link itself, never its target).
    #[arg(long)]
    pub include_symlinks: bool,

    /// Remove directories left empty under the source after the run.
    #[arg(long)]
    pub prune_empty_dirs: bool,

    /// Minimum nesting level of files to move (0 = files directly in SOURCE_DIR).
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub min_depth: Option<i64>,

    /// Maximum nesting level of files to move (negative = unbounded).
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub max_depth: Option<i64>,

    /// Only move files whose relative path matches one of these globs.
    #[arg(long, value_name = "GLOBS")]
    pub include: Vec<String>,

    /// Never move files whose relative path matches one of these globs.
    #[arg(long, value_name = "GLOBS")]
    pub exclude: Vec<String>,

    /// Only move files with these extensions (comma separated, no dot needed).
    #[arg(long, value_name = "LIST")]
    pub allow_ext: Vec<String>,

    /// Never move files with these extensions.
    #[arg(long, value_name = "LIST")]
    pub deny_ext: Vec<String>,

    /// Skip files smaller than SIZE (e.g. 512K, 10M, 1.5G).
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Skip files larger than SIZE.
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub max_size: Option<u64>,

    /// Only files modified after SPEC (YYYY-MM-DD or N[d|h|m|s] ago).
    #[arg(long, value_name = "SPEC", value_parser = parse_time_spec)]
    pub newer_than: Option<SystemTime>,

    /// Only files modified before SPEC.
    #[arg(long, value_name = "SPEC", value_parser = parse_time_spec)]
    pub older_than: Option<SystemTime>,

    /// Also write logs to this file.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON.
    #[arg(long)]
    pub json: bool,

    /// Print the config file location used by mnf and exit.
    #[arg(long)]
    pub print_config: bool,
}

impl Args {
    /// Effective log level: `-q` wins, each `-v` raises `base` one step.
    pub fn effective_log_level(&self, base: LogLevel) -> LogLevel {
        LogLevel::from_flags(base, self.quiet, self.verbose)
    }

    /// Apply CLI overrides to options loaded from defaults/XML (in-place).
    /// No-ops for unset flags.
    pub fn apply_overrides(&self, opts: &mut Options) {
        if let Some(src) = &self.source {
            opts.source = src.clone();
        }
        if let Some(dest) = &self.dest {
            opts.dest = dest.clone();
        }
        if let Some(mode) = self.mode {
            opts.mode = mode;
        }
        if let Some(t) = self.threads {
            opts.threads = usize::try_from(t).unwrap_or(0).max(1);
        }
        if self.dry_run {
            opts.dry_run = true;
        }
        if self.progress {
            opts.progress = true;
        }
        if self.no_preserve_times {
            opts.preserve_times = false;
        }
        if self.include_symlinks {
            opts.include_symlinks = true;
        }
        if self.prune_empty_dirs {
            opts.prune_empty_dirs = true;
        }
        if let Some(d) = self.min_depth {
            opts.min_depth = usize::try_from(d).unwrap_or(0);
        }
        if let Some(d) = self.max_depth {
            opts.max_depth = usize::try_from(d).ok();
        }

        opts.includes.extend(split_list(&self.include));
        opts.excludes.extend(split_list(&self.exclude));
        opts.allow_ext.extend(split_list(&self.allow_ext));
        opts.deny_ext.extend(split_list(&self.deny_ext));

        if self.min_size.is_some() {
            opts.min_size = self.min_size;
        }
        if self.max_size.is_some() {
            opts.max_size = self.max_size;
        }
        if self.newer_than.is_some() {
            opts.newer_than = self.newer_than;
        }
        if self.older_than.is_some() {
            opts.older_than = self.older_than;
        }
        if let Some(lf) = &self.log_file {
            opts.log_file = Some(lf.clone());
        }
        opts.log_level = self.effective_log_level(opts.log_level);
    }
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn args(list: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("mnf").chain(list.iter().copied())).unwrap()
    }

    fn options(list: &[&str]) -> Options {
        let mut o = Options::default();
        args(list).apply_overrides(&mut o);
        o
    }

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn positional_roots_and_defaults() {
        let o = options(&["src", "dst"]);
        assert_eq!(o.source, PathBuf::from("src"));
        assert_eq!(o.dest, PathBuf::from("dst"));
        assert_eq!(o.mode, CollisionMode::Rename);
        assert_eq!(o.threads, 1);
        assert_eq!(o.min_depth, 1);
        assert_eq!(o.max_depth, None);
        assert!(o.preserve_times);
        assert!(!o.dry_run);
    }

    #[test]
    fn flags_map_onto_options() {
        let o = options(&[
            "-n", "-t", "8", "--mode", "skip", "--progress", "--no-preserve-times",
            "--include-symlinks", "--prune-empty-dirs", "--min-depth", "2", "--max-depth", "4",
            "a", "b",
        ]);
        assert!(o.dry_run);
        assert_eq!(o.threads, 8);
        assert_eq!(o.mode, CollisionMode::Skip);
        assert!(o.progress && !o.preserve_times && o.include_symlinks && o.prune_empty_dirs);
        assert_eq!((o.min_depth, o.max_depth), (2, Some(4)));
    }

    #[test]
    fn numeric_clamping() {
        let o = options(&["-t", "0", "--min-depth", "-3", "--max-depth", "-1", "a", "b"]);
        assert_eq!(o.threads, 1);
        assert_eq!(o.min_depth, 0);
        assert_eq!(o.max_depth, None);
    }

    #[test]
    fn lists_split_and_repeat() {
        let o = options(&[
            "--allow-ext", "jpg, png,,", "--allow-ext", "gif", "--include", "**/*.jpg", "a", "b",
        ]);
        assert_eq!(o.allow_ext, vec!["jpg", "png", "gif"]);
        assert_eq!(o.includes, vec!["**/*.jpg"]);
    }

    #[test]
    fn size_and_time_specs() {
        let o = options(&["--min-size", "10M", "--newer-than", "7d", "a", "b"]);
        assert_eq!(o.min_size, Some(10 * 1024 * 1024));
        assert!(o.newer_than.is_some_and(|t| t < SystemTime::now()));

        let bad = Args::try_parse_from(["mnf", "--min-size", "lots", "a", "b"]);
        assert!(bad.is_err());
        let bad = Args::try_parse_from(["mnf", "--older-than", "2024-13-45", "a", "b"]);
        assert!(bad.is_err());
    }

    #[test]
    fn verbosity() {
        assert_eq!(options(&["a", "b"]).log_level, LogLevel::Normal);
        assert_eq!(options(&["-v", "a", "b"]).log_level, LogLevel::Verbose);
        assert_eq!(options(&["-vv", "a", "b"]).log_level, LogLevel::Debug);
        assert_eq!(options(&["-q", "-v", "a", "b"]).log_level, LogLevel::Quiet);
    }

    #[test]
    fn print_config_needs_no_paths() {
        let a = args(&["--print-config"]);
        assert!(a.print_config);
        assert!(Args::try_parse_from(["mnf"]).is_err());
    }
}
