//! Filesystem operations: modularized.

mod duplicate;
mod file_move;
mod helpers;
mod io_copy;
mod meta;
mod symlink;
mod util;

pub use duplicate::{NameRegistry, Reserved, Resolution};
pub use file_move::{MoveMethod, MoveOptions, move_file};
pub use helpers::io_error_with_help;
pub use symlink::move_symlink;
