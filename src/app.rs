//! Application orchestrator.
//! Layers defaults, the XML config and CLI flags into Options, initializes
//! logging, runs the engine and turns the outcome into an exit status.

use anyhow::Result;
use tracing::{debug, error};

use mnf::cli::Args;
use mnf::config::{CONFIG_ENV, Options, default_config_path, load_config_from_xml};
use mnf::output as out;
use mnf::{MnfError, engine};

use crate::logging::init_tracing;

fn print_config_location() {
    if let Ok(p) = std::env::var(CONFIG_ENV) {
        out::print_info(&format!("Using {CONFIG_ENV} (explicit):\n  {p}"));
        return;
    }
    match default_config_path() {
        Some(p) if p.exists() => out::print_info(&format!("Config file:\n  {}", p.display())),
        Some(p) => out::print_info(&format!(
            "Default config path (not present, built-in defaults apply):\n  {}",
            p.display()
        )),
        None => out::print_error("Could not determine a default config path"),
    }
}

/// Log a fatal error with its stable code when it is one of ours.
fn log_fatal(e: &anyhow::Error) {
    match e.downcast_ref::<MnfError>() {
        Some(me) => error!(code = me.code(), kind = me.kind(), error = %me, "run failed"),
        None => error!(error = %format!("{e:#}"), "run failed"),
    }
}

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    if args.print_config {
        print_config_location();
        return Ok(());
    }

    // Defaults -> config file -> CLI (CLI wins).
    let mut opts = Options::default();
    let cfg_path = match load_config_from_xml() {
        Ok(Some((path, file_cfg))) => {
            if let Err(e) = file_cfg.apply_to(&path, &mut opts) {
                out::print_error(&e.to_string());
                return Err(e.into());
            }
            Some(path)
        }
        Ok(None) => None,
        Err(e) => {
            out::print_error(&e.to_string());
            return Err(e.into());
        }
    };
    args.apply_overrides(&mut opts);

    let _guard = init_tracing(opts.log_level, opts.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
        e
    })?;

    if let Some(p) = &cfg_path {
        debug!(path = %p.display(), "loaded config file");
    }
    debug!(?opts, "effective options");

    let summary = match engine::run(&opts) {
        Ok(s) => s,
        Err(e) => {
            log_fatal(&e);
            return Err(e);
        }
    };

    out::print_summary(&summary);
    if !summary.exit_ok() {
        return Err(MnfError::JobsFailed(summary.stats.failed).into());
    }
    Ok(())
}
