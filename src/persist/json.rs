//! History rows as a JSON array of `{operand1, operation, operand2, result}`.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value, json};

use crate::types::Number;

use super::{HistoryStore, PersistError, PersistResult, PersistedRecord, parse_number_text};

/// JSON implementation of [`HistoryStore`].
#[derive(Debug, Clone)]
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    /// Store backed by the file at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn decode_row(&self, index: usize, row: &Value) -> PersistResult<PersistedRecord> {
        let Some(obj) = row.as_object() else {
            return Err(self.invalid(index, "entry", row));
        };
        let operation = match obj.get("operation") {
            Some(Value::String(name)) => name.clone(),
            other => return Err(self.invalid(index, "operation", other.unwrap_or(&Value::Null))),
        };
        Ok(PersistedRecord {
            operand1: self.required_number(index, obj, "operand1")?,
            operation,
            operand2: self.required_number(index, obj, "operand2")?,
            result: match obj.get("result") {
                None | Some(Value::Null) => None,
                Some(value) => Some(decode_number(value).ok_or_else(|| self.invalid(index, "result", value))?),
            },
        })
    }

    fn required_number(
        &self,
        index: usize,
        obj: &Map<String, Value>,
        field: &'static str,
    ) -> PersistResult<Number> {
        let value = obj.get(field).unwrap_or(&Value::Null);
        decode_number(value).ok_or_else(|| self.invalid(index, field, value))
    }

    fn invalid(&self, index: usize, field: &'static str, value: &Value) -> PersistError {
        PersistError::InvalidData {
            path: self.path.clone(),
            index,
            field,
            value: value.to_string(),
        }
    }

    fn corrupt(&self, reason: impl Into<String>) -> PersistError {
        PersistError::Corrupt {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }
}

impl HistoryStore for JsonHistoryStore {
    fn path(&self) -> &Path {
        &self.path
    }

    fn write_records(&mut self, records: &[PersistedRecord]) -> PersistResult<()> {
        let rows: Vec<Value> = records
            .iter()
            .map(|r| {
                json!({
                    "operand1": encode_number(r.operand1),
                    "operation": r.operation,
                    "operand2": encode_number(r.operand2),
                    "result": r.result.map_or(Value::Null, encode_number),
                })
            })
            .collect();
        let payload = serde_json::to_string_pretty(&rows)?;
        fs::write(&self.path, payload).map_err(|source| PersistError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn read_records(&self) -> PersistResult<Vec<PersistedRecord>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(PersistError::NotFound(self.path.clone()));
            }
            Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                return Err(self.corrupt(err.to_string()));
            }
            Err(source) => {
                return Err(PersistError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if contents.trim().is_empty() {
            return Err(self.corrupt("file is empty"));
        }

        let rows: Vec<Value> = serde_json::from_str(&contents).map_err(|e| self.corrupt(e.to_string()))?;
        rows.iter()
            .enumerate()
            .map(|(index, row)| self.decode_row(index, row))
            .collect()
    }
}

// Non-finite values have no JSON number form; they are written as text.
fn encode_number(n: Number) -> Value {
    serde_json::Number::from_f64(n).map_or_else(|| Value::String(n.to_string()), Value::Number)
}

fn decode_number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number_text(s),
        _ => None,
    }
}
