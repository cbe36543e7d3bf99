//! User-facing lines (as opposed to log events).
//! Colors are enabled only when the stream is a TTY.

use owo_colors::OwoColorize;

use crate::engine::RunSummary;

fn stdout_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

fn stderr_tty() -> bool {
    atty::is(atty::Stream::Stderr)
}

pub fn print_info(msg: &str) {
    if stdout_tty() {
        println!("{} {}", "info:".cyan().bold(), msg);
    } else {
        println!("info: {msg}");
    }
}

pub fn print_warn(msg: &str) {
    if stderr_tty() {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {msg}");
    }
}

pub fn print_error(msg: &str) {
    if stderr_tty() {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {msg}");
    }
}

/// Final summary line on stdout; green when clean, red when any job failed.
/// The text itself never changes so scripts can match on it.
pub fn print_summary(summary: &RunSummary) {
    let line = summary.to_string();
    if !stdout_tty() {
        println!("{line}");
    } else if summary.exit_ok() {
        println!("{}", line.green());
    } else {
        println!("{}", line.red());
    }
}
