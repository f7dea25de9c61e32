//! Log setup. The terminal is owned by the UI, so records only go to a file.

use anyhow::{Context, Result};
use log::LevelFilter;
use simplelog::{Config, ConfigBuilder, WriteLogger};
use std::fs::{File, OpenOptions};
use std::path::Path;

fn open(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))
}

/// Target on every record, no thread ids.
fn config() -> Config {
    ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .set_thread_level(LevelFilter::Off)
        .build()
}

/// Installs a file logger when a path is given; otherwise logging stays off.
pub fn init(path: Option<&Path>, level: LevelFilter) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    WriteLogger::init(level, config(), open(path)?).context("installing logger")
}
