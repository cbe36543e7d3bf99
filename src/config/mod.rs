//! Config module.
//! Provides run options, spec parsers, the optional XML layer and root validation.

pub mod parse;
pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use parse::{parse_size, parse_time_spec, split_list};
pub use paths::{default_config_path, path_has_symlink_ancestor, CONFIG_ENV};
pub use types::{CollisionMode, LogLevel, Options, Roots};
pub use xml::{load_config_from_xml, load_config_from_xml_path, FileConfig};

/// Buffer used by the streaming copy fallback.
pub const COPY_BUF_SIZE: usize = 1024 * 1024;
