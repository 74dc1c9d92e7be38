use log::LevelFilter;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Program configuration read from a configuration file
#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
pub(crate) struct Config {
    /// Settings about data files
    #[serde(default)]
    pub(crate) files: FileConfig,

    #[serde(default)]
    pub(crate) logging: LoggingConfig,
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join("snakepit").join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist and
    /// `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read or if the file's contents
    /// could not be deserialized.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                return Ok(Config::default())
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        toml::from_str(&content).map_err(Into::into)
    }

    /// Return the path to the session database: the file given in the
    /// configuration or, if that is not set, `sessions.db` in the local data
    /// directory.
    pub(crate) fn database(&self) -> Result<PathBuf, ConfigError> {
        match self.files.database {
            Some(ref p) => Ok(p.clone()),
            None => data_dir().map(|d| d.join("sessions.db")),
        }
    }

    /// Return the path to which log messages are appended
    pub(crate) fn log_file(&self) -> Result<PathBuf, ConfigError> {
        match self.files.log_file {
            Some(ref p) => Ok(p.clone()),
            None => data_dir().map(|d| d.join("snakepit.log")),
        }
    }
}

fn data_dir() -> Result<PathBuf, ConfigError> {
    dirs::data_local_dir()
        .map(|p| p.join("snakepit"))
        .ok_or(ConfigError::NoDataPath)
}

#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct FileConfig {
    /// Path to the SQLite database in which sessions are stored
    database: Option<PathBuf>,

    /// Path to the log file
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, Deserialize, Debug, Eq, PartialEq)]
#[serde(try_from = "RawLoggingConfig")]
pub(crate) struct LoggingConfig {
    /// Most verbose level of messages to write to the log file
    pub(crate) level: LevelFilter,
}

impl Default for LoggingConfig {
    fn default() -> LoggingConfig {
        LoggingConfig {
            level: LevelFilter::Info,
        }
    }
}

#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
struct RawLoggingConfig {
    level: Option<String>,
}

impl TryFrom<RawLoggingConfig> for LoggingConfig {
    type Error = log::ParseLevelError;

    fn try_from(value: RawLoggingConfig) -> Result<LoggingConfig, log::ParseLevelError> {
        let level = match value.level {
            Some(s) => s.parse::<LevelFilter>()?,
            None => LoggingConfig::default().level,
        };
        Ok(LoggingConfig { level })
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to determine path to local data directory")]
    NoDataPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
}
