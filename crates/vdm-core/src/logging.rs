//! Logging init: file under the XDG state dir, stderr fallback.
//!
//! The operator owns stdout for prompts and progress lines, so tracing
//! output goes to `~/.local/state/vdm/vdm.log`; if that directory is
//! unwritable the subscriber falls back to stderr.

use std::fs;
use std::io::{self, Write};

use anyhow::Result;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,vdm=debug"));
    match file_writer() {
        Ok(writer) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
        }
        Err(_) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .with_ansi(false)
                .init();
        }
    }
}

fn file_writer() -> Result<BoxMakeWriter> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("vdm")?;
    let log_dir = xdg_dirs.get_state_home();
    fs::create_dir_all(&log_dir)?;
    let path = log_dir.join("vdm.log");

    let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;

    // Each writer is an independent clone of the handle; if cloning fails
    // mid-run, that one event goes to stderr instead of being dropped.
    let make = move || -> Box<dyn Write + Send> {
        match file.try_clone() {
            Ok(f) => Box::new(f),
            Err(_) => Box::new(io::stderr()),
        }
    };
    Ok(BoxMakeWriter::new(make))
}
