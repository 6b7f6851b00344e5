//! Persistence abstraction with JSON and SQLite history stores.

/// JSON array history store.
pub mod json;
/// SQLite history store.
pub mod sqlite;

use std::{
    fmt, io,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Number;

use self::{json::JsonHistoryStore, sqlite::SqliteHistoryStore};

/// Failures while saving or loading a history destination.
#[derive(Error, Debug)]
pub enum PersistError {
    /// The destination does not exist.
    #[error("{} not found.", .0.display())]
    NotFound(PathBuf),

    /// The destination exists but is empty or cannot be parsed.
    #[error("Failed to decode history data from {}: {reason}", path.display())]
    Corrupt {
        /// Destination path.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// A row names an operation the lookup table cannot resolve.
    #[error("Unknown operation '{name}' in entry {index} of {}", path.display())]
    UnknownOperation {
        /// Destination path.
        path: PathBuf,
        /// Zero-based row index.
        index: usize,
        /// Operation name as stored.
        name: String,
    },

    /// A row field is missing or not numeric.
    #[error("Invalid {field} in entry {index} of {}: {value}", path.display())]
    InvalidData {
        /// Destination path.
        path: PathBuf,
        /// Zero-based row index.
        index: usize,
        /// Offending column.
        field: &'static str,
        /// Rendered offending value.
        value: String,
    },

    /// Filesystem failure other than a missing file.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Destination path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// SQLite failure while writing.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// JSON encoding failure while writing.
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

/// Result alias for [`PersistError`].
pub type PersistResult<T> = Result<T, PersistError>;

/// On-disk row for one calculation.
///
/// `result` is `None` for a calculation that was never executed.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedRecord {
    /// First operand.
    pub operand1: Number,
    /// Operation name.
    pub operation: String,
    /// Second operand.
    pub operand2: Number,
    /// Stored result.
    pub result: Option<Number>,
}

/// Whole-file reader/writer for persisted history rows.
pub trait HistoryStore {
    /// Destination this store reads and writes.
    fn path(&self) -> &Path;
    /// Replaces the destination with `records`, in order.
    fn write_records(&mut self, records: &[PersistedRecord]) -> PersistResult<()>;
    /// Reads every row in stored order.
    fn read_records(&self) -> PersistResult<Vec<PersistedRecord>>;
}

/// Encoding used for a history destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryFormat {
    /// JSON array of row objects.
    #[default]
    Json,
    /// SQLite database with a `history` table.
    Sqlite,
}

impl HistoryFormat {
    /// Picks a format from a file extension, defaulting to JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if matches!(ext.to_ascii_lowercase().as_str(), "db" | "sqlite" | "sqlite3") => {
                Self::Sqlite
            }
            _ => Self::Json,
        }
    }
}

impl fmt::Display for HistoryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Sqlite => "sqlite",
        })
    }
}

impl FromStr for HistoryFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "sqlite" | "db" => Ok(Self::Sqlite),
            other => Err(format!("unknown history format '{other}' (expected json or sqlite)")),
        }
    }
}

/// A path plus the encoding used there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// File path.
    pub path: PathBuf,
    /// Encoding.
    pub format: HistoryFormat,
}

impl Destination {
    /// Destination with an explicit format.
    pub fn new(path: impl Into<PathBuf>, format: HistoryFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    /// JSON destination.
    pub fn json(path: impl Into<PathBuf>) -> Self {
        Self::new(path, HistoryFormat::Json)
    }

    /// SQLite destination.
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self::new(path, HistoryFormat::Sqlite)
    }

    /// Destination whose format follows the file extension.
    pub fn infer(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = HistoryFormat::from_path(&path);
        Self { path, format }
    }

    /// Opens the store for this destination.
    pub fn open(&self) -> Box<dyn HistoryStore> {
        match self.format {
            HistoryFormat::Json => Box::new(JsonHistoryStore::new(&self.path)),
            HistoryFormat::Sqlite => Box::new(SqliteHistoryStore::new(&self.path)),
        }
    }
}

impl Default for Destination {
    fn default() -> Self {
        Self::json("history.json")
    }
}

/// Parses numbers stored as text, including `inf` and `NaN`.
pub(crate) fn parse_number_text(text: &str) -> Option<Number> {
    text.trim().parse::<Number>().ok()
}
