//! File logging.
//!
//! The terminal is in raw mode while scenes play, so records go to a file.

use std::{
    fs::{self, OpenOptions},
    path::PathBuf,
};

use env_logger::{Env, Target};
use flurry_config::{LogConfig, default_log_path};

/// Start logging to the configured file.
///
/// `RUST_LOG` takes precedence over the configured level. Returns the log
/// path, or `None` when no cache directory is available.
pub fn init(config: &LogConfig) -> color_eyre::Result<Option<PathBuf>> {
    let Some(path) = config.file.clone().or_else(default_log_path) else {
        return Ok(None);
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    env_logger::Builder::from_env(Env::default().default_filter_or(config.level.as_str()))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()?;
    Ok(Some(path))
}
