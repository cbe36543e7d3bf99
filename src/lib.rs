//! Core library for `mnf` (move-nested-files).
//!
//! Relocates every file found in the subdirectories of a source tree into one
//! flat destination directory, using a pool of worker threads fed by a single
//! traversal. Names that collide are renamed, skipped or overwritten.
//!
//! Modules:
//! - config: run options, spec parsers, XML config layer, root validation
//! - filter: glob/extension/size/time rules
//! - engine: job queue, traversal, worker pool, stats, pruning
//! - fs_ops: name resolution and the actual moves (rename, copy fallback, symlinks)
//! - cli / output: command-line surface and user-facing lines

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod filter;
pub mod fs_ops;
pub mod output;
pub mod pathutil;
pub mod progress;

pub use config::{CollisionMode, LogLevel, Options, Roots};
pub use engine::{RunSummary, StatsSnapshot, run};
pub use errors::MnfError;
pub use filter::{Candidate, Filter};
