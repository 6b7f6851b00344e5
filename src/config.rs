//! Layered configuration: defaults, optional TOML file, environment.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persist::{Destination, HistoryFormat};

/// File looked up in the working directory when no path is given.
pub const CONFIG_FILE: &str = "calclog.toml";
/// Overrides `history.path`.
pub const ENV_HISTORY_PATH: &str = "CALCLOG_HISTORY_PATH";
/// Overrides `history.format`.
pub const ENV_HISTORY_FORMAT: &str = "CALCLOG_HISTORY_FORMAT";
/// Overrides `logging.level`.
pub const ENV_LOG_LEVEL: &str = "CALCLOG_LOG";

/// Configuration load failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Config path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The file is not valid TOML for [`Config`].
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// Config path.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: toml::de::Error,
    },
    /// An override carried an unusable value.
    #[error("invalid value for {key}: {message}")]
    InvalidValue {
        /// Variable or key name.
        key: &'static str,
        /// Reason.
        message: String,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where `save` and `load` go by default.
    pub history: HistoryConfig,
    /// Log output.
    pub logging: LoggingConfig,
}

/// Default history destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// History file path.
    pub path: PathBuf,
    /// Explicit encoding; inferred from the extension when unset.
    pub format: Option<HistoryFormat>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("history.json"),
            format: None,
        }
    }
}

impl HistoryConfig {
    /// Resolved destination.
    pub fn destination(&self) -> Destination {
        match self.format {
            Some(format) => Destination::new(&self.path, format),
            None => Destination::infer(&self.path),
        }
    }
}

/// Logging filter and optional log file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `warn` or `calclog=debug`.
    pub level: String,
    /// Append log lines to this file as well as stderr.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}

impl Config {
    /// Parses a TOML document.
    pub fn from_toml(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies overrides from a variable lookup.
    pub fn apply_overrides(
        &mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(path) = var(ENV_HISTORY_PATH) {
            self.history.path = PathBuf::from(path);
        }
        if let Some(format) = var(ENV_HISTORY_FORMAT) {
            let format = format
                .parse::<HistoryFormat>()
                .map_err(|message| ConfigError::InvalidValue {
                    key: ENV_HISTORY_FORMAT,
                    message,
                })?;
            self.history.format = Some(format);
        }
        if let Some(level) = var(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        Ok(())
    }
}

/// Reads `path`, or [`CONFIG_FILE`] if present, then applies environment
/// overrides. An explicit path must exist; the default file is optional.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(CONFIG_FILE), false),
    };

    let mut config = match fs::read_to_string(&path) {
        Ok(contents) => Config::from_toml(&path, &contents)?,
        Err(err) if !required && err.kind() == io::ErrorKind::NotFound => Config::default(),
        Err(source) => return Err(ConfigError::Read { path, source }),
    };
    config.apply_overrides(|key| std::env::var(key).ok())?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = Config::from_toml(Path::new("t.toml"), "[history]\npath = \"calc.db\"\n").unwrap();
        assert_eq!(cfg.history.path, PathBuf::from("calc.db"));
        assert_eq!(cfg.history.destination().format, HistoryFormat::Sqlite);
        assert_eq!(cfg.logging, LoggingConfig::default());
    }

    #[test]
    fn explicit_format_beats_extension() {
        let cfg = Config::from_toml(
            Path::new("t.toml"),
            "[history]\npath = \"calc.db\"\nformat = \"json\"\n",
        )
        .unwrap();
        assert_eq!(cfg.history.destination(), Destination::json("calc.db"));
    }

    #[test]
    fn overrides_apply_and_validate() {
        let mut cfg = Config::default();
        cfg.apply_overrides(|key| match key {
            ENV_HISTORY_PATH => Some("other.json".into()),
            ENV_LOG_LEVEL => Some("debug".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(cfg.history.path, PathBuf::from("other.json"));
        assert_eq!(cfg.logging.level, "debug");

        let err = cfg
            .apply_overrides(|key| (key == ENV_HISTORY_FORMAT).then(|| "yaml".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: ENV_HISTORY_FORMAT, .. }));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = load(Some(Path::new("definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
