use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};
use std::path::Path;
use thiserror::Error;

/// Send log messages at `level` or more severe to the file at `path`,
/// appending to whatever is already there.  The terminal belongs to the game,
/// so nothing is ever logged to stderr.
///
/// Does nothing when `level` is `LevelFilter::Off`.
pub(crate) fn init(path: &Path, level: LevelFilter) -> Result<(), LoggingError> {
    if level == LevelFilter::Off {
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs_err::create_dir_all(parent).map_err(LoggingError::Open)?;
    }
    let file = fs_err::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(LoggingError::Open)?;
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .set_thread_level(LevelFilter::Off)
        .build();
    WriteLogger::init(level, config, file)?;
    Ok(())
}

#[derive(Debug, Error)]
pub(crate) enum LoggingError {
    #[error("failed to open log file")]
    Open(#[source] std::io::Error),
    #[error("failed to install logger")]
    Install(#[from] log::SetLoggerError),
}
