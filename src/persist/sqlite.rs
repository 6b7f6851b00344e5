//! SQLite-backed history store.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use rusqlite::{Connection, OpenFlags, params, types::Value};

use crate::types::Number;

use super::{HistoryStore, PersistError, PersistResult, PersistedRecord, parse_number_text};

/// SQLite implementation of [`HistoryStore`].
#[derive(Debug, Clone)]
pub struct SqliteHistoryStore {
    path: PathBuf,
}

impl SqliteHistoryStore {
    /// Store backed by the database at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Removes any previous file so a save never inherits foreign tables.
    fn reset_file(&self) -> PersistResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PersistError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn query_rows(&self, conn: &Connection) -> rusqlite::Result<Vec<[Value; 4]>> {
        let mut stmt = conn.prepare(
            "SELECT operand1, operation, operand2, result FROM history ORDER BY position ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok([row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?])
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn decode_row(&self, index: usize, row: [Value; 4]) -> PersistResult<PersistedRecord> {
        let [operand1, operation, operand2, result] = row;
        let operation = match operation {
            Value::Text(name) => name,
            other => return Err(self.invalid(index, "operation", &other)),
        };
        Ok(PersistedRecord {
            operand1: decode_number(&operand1).ok_or_else(|| self.invalid(index, "operand1", &operand1))?,
            operation,
            operand2: decode_number(&operand2).ok_or_else(|| self.invalid(index, "operand2", &operand2))?,
            result: match result {
                Value::Null => None,
                ref value => Some(decode_number(value).ok_or_else(|| self.invalid(index, "result", value))?),
            },
        })
    }

    fn invalid(&self, index: usize, field: &'static str, value: &Value) -> PersistError {
        PersistError::InvalidData {
            path: self.path.clone(),
            index,
            field,
            value: format!("{value:?}"),
        }
    }
}

impl HistoryStore for SqliteHistoryStore {
    fn path(&self) -> &Path {
        &self.path
    }

    fn write_records(&mut self, records: &[PersistedRecord]) -> PersistResult<()> {
        self.reset_file()?;
        let mut conn = Connection::open(&self.path)?;
        conn.execute_batch(include_str!("schema.sql"))?;

        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO history(position, operand1, operation, operand2, result) VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (position, record) in records.iter().enumerate() {
                stmt.execute(params![
                    position as i64,
                    encode_number(record.operand1),
                    record.operation,
                    encode_number(record.operand2),
                    record.result.map(encode_number),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn read_records(&self) -> PersistResult<Vec<PersistedRecord>> {
        if !self.path.exists() {
            return Err(PersistError::NotFound(self.path.clone()));
        }

        let corrupt = |err: rusqlite::Error| PersistError::Corrupt {
            path: self.path.clone(),
            reason: err.to_string(),
        };
        let conn = Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(corrupt)?;
        let rows = self.query_rows(&conn).map_err(corrupt)?;

        rows.into_iter()
            .enumerate()
            .map(|(index, row)| self.decode_row(index, row))
            .collect()
    }
}

// SQLite turns NaN into NULL and -0.0 into integer 0; those go in as text.
fn encode_number(n: Number) -> Value {
    if n.is_finite() && !(n == 0.0 && n.is_sign_negative()) {
        Value::Real(n)
    } else {
        Value::Text(n.to_string())
    }
}

fn decode_number(value: &Value) -> Option<Number> {
    match value {
        Value::Real(n) => Some(*n),
        Value::Integer(n) => Some(*n as Number),
        Value::Text(s) => parse_number_text(s),
        Value::Null | Value::Blob(_) => None,
    }
}
