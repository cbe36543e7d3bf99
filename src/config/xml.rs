//! XML configuration support.
//! - Loads run defaults from config.xml (quick_xml + serde).
//! - Values found here sit between built-in defaults and CLI flags.
//!
//! Example:
//! <config>
//!   <threads>4</threads>
//!   <mode>skip</mode>
//!   <log_level>verbose</log_level>
//!   <log_file>/var/log/mnf.log</log_file>
//!   <preserve_times>true</preserve_times>
//!   <include_symlinks>false</include_symlinks>
//!   <prune_empty_dirs>true</prune_empty_dirs>
//!   <progress>false</progress>
//!   <min_depth>1</min_depth>
//!   <max_depth>-1</max_depth>
//! </config>
//!
//! Unknown tags are rejected so typos surface instead of being silently ignored.

use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::paths::default_config_path;
use super::types::{CollisionMode, LogLevel, Options};
use crate::errors::MnfError;

/// Struct mirroring the XML config for deserialization.
/// Everything is read as text and converted afterwards so whitespace is tolerated.
#[derive(Debug, Default, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    threads: Option<String>,
    mode: Option<String>,
    log_level: Option<String>,
    log_file: Option<String>,
    preserve_times: Option<String>,
    include_symlinks: Option<String>,
    prune_empty_dirs: Option<String>,
    progress: Option<String>,
    min_depth: Option<String>,
    max_depth: Option<String>,
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_bool(path: &Path, tag: &str, v: &str) -> Result<bool, MnfError> {
    match v.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(invalid(path, format!("<{tag}> expects true/false, got '{v}'"))),
    }
}

fn parse_int(path: &Path, tag: &str, v: &str) -> Result<i64, MnfError> {
    v.parse::<i64>()
        .map_err(|_| invalid(path, format!("<{tag}> expects an integer, got '{v}'")))
}

fn invalid(path: &Path, reason: String) -> MnfError {
    MnfError::ConfigInvalid {
        path: path.to_path_buf(),
        reason,
    }
}

impl FileConfig {
    /// Parse XML text; `path` is only used for error messages.
    pub fn from_xml(path: &Path, content: &str) -> Result<Self, MnfError> {
        from_xml_str(content).map_err(|e| invalid(path, e.to_string()))
    }

    /// Copy every value present in the file onto `opts`.
    pub fn apply_to(&self, path: &Path, opts: &mut Options) -> Result<(), MnfError> {
        if let Some(v) = non_empty(&self.threads) {
            opts.threads = parse_int(path, "threads", v)?.max(1) as usize;
        }
        if let Some(v) = non_empty(&self.mode) {
            opts.mode = v.parse::<CollisionMode>().map_err(|e| invalid(path, e))?;
        }
        if let Some(v) = non_empty(&self.log_level) {
            opts.log_level = v.parse::<LogLevel>().map_err(|e| invalid(path, e))?;
        }
        if let Some(v) = non_empty(&self.log_file) {
            opts.log_file = Some(PathBuf::from(v));
        }
        if let Some(v) = non_empty(&self.preserve_times) {
            opts.preserve_times = parse_bool(path, "preserve_times", v)?;
        }
        if let Some(v) = non_empty(&self.include_symlinks) {
            opts.include_symlinks = parse_bool(path, "include_symlinks", v)?;
        }
        if let Some(v) = non_empty(&self.prune_empty_dirs) {
            opts.prune_empty_dirs = parse_bool(path, "prune_empty_dirs", v)?;
        }
        if let Some(v) = non_empty(&self.progress) {
            opts.progress = parse_bool(path, "progress", v)?;
        }
        if let Some(v) = non_empty(&self.min_depth) {
            opts.min_depth = parse_int(path, "min_depth", v)?.max(0) as usize;
        }
        if let Some(v) = non_empty(&self.max_depth) {
            let n = parse_int(path, "max_depth", v)?;
            opts.max_depth = (n >= 0).then_some(n as usize);
        }
        Ok(())
    }
}

/// Read the config file in effect, if any.
/// A missing file yields Ok(None); an unreadable or malformed one is an error.
pub fn load_config_from_xml() -> Result<Option<(PathBuf, FileConfig)>, MnfError> {
    let Some(path) = default_config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        debug!(path = %path.display(), "no config file; using defaults");
        return Ok(None);
    }
    load_config_from_xml_path(&path).map(|cfg| Some((path, cfg)))
}

/// Load a config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<FileConfig, MnfError> {
    let content = fs::read_to_string(path).map_err(|e| invalid(path, e.to_string()))?;
    FileConfig::from_xml(path, &content)
}
