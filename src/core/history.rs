use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    operations::OperationLookup,
    persist::{Destination, HistoryStore, PersistError, PersistResult, PersistedRecord},
};

use super::calculation::Calculation;

/// Ledger-level failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// `undo` on an empty ledger.
    #[error("No history to undo.")]
    NothingToUndo,
}

/// Ordered ledger of calculations with undo, clear, save and load.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<Calculation>,
    lookup: OperationLookup,
}

impl History {
    /// Empty ledger that resolves persisted names through `lookup`.
    pub fn new(lookup: OperationLookup) -> Self {
        Self {
            entries: Vec::new(),
            lookup,
        }
    }

    /// Appends to the end.
    pub fn add(&mut self, calc: Calculation) {
        self.entries.push(calc);
    }

    /// Removes the most recent entry.
    pub fn undo(&mut self) -> Result<Calculation, HistoryError> {
        let calc = self.entries.pop().ok_or(HistoryError::NothingToUndo)?;
        debug!(%calc, remaining = self.entries.len(), "undo");
        Ok(calc)
    }

    /// Drops every entry and returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }

    /// Live entries, oldest first.
    pub fn get_history(&self) -> &[Calculation] {
        &self.entries
    }

    /// Iterates entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Calculation> {
        self.entries.iter()
    }

    /// Most recent entry.
    pub fn last(&self) -> Option<&Calculation> {
        self.entries.last()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the ledger has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rows for every entry, in ledger order.
    pub fn export_records(&self) -> Vec<PersistedRecord> {
        self.entries
            .iter()
            .map(|calc| PersistedRecord {
                operand1: calc.operand1(),
                operation: calc.operation_name(),
                operand2: calc.operand2(),
                result: calc.result(),
            })
            .collect()
    }

    /// Writes the whole ledger to `dest`, replacing its contents.
    pub fn save(&self, dest: &Destination) -> PersistResult<usize> {
        let mut store = dest.open();
        self.save_to(&mut *store)
    }

    /// Replaces the ledger with the rows stored at `dest`.
    ///
    /// On any error the in-memory ledger is left unchanged.
    pub fn load(&mut self, dest: &Destination) -> PersistResult<usize> {
        let store = dest.open();
        self.load_from(&*store)
    }

    /// [`History::save`] against an explicit store.
    pub fn save_to(&self, store: &mut dyn HistoryStore) -> PersistResult<usize> {
        let records = self.export_records();
        store.write_records(&records)?;
        info!(path = %store.path().display(), entries = records.len(), "history saved");
        Ok(records.len())
    }

    /// [`History::load`] against an explicit store.
    pub fn load_from(&mut self, store: &dyn HistoryStore) -> PersistResult<usize> {
        let records = store.read_records().inspect_err(|err| {
            warn!(path = %store.path().display(), error = %err, "history load failed");
        })?;

        let mut loaded = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            let Some(operation) = self.lookup.resolve(&record.operation) else {
                warn!(index, operation = %record.operation, "unknown operation in history file");
                return Err(PersistError::UnknownOperation {
                    path: store.path().to_path_buf(),
                    index,
                    name: record.operation,
                });
            };
            let mut calc = Calculation::from_numbers(operation, record.operand1, record.operand2);
            if let Some(result) = record.result {
                calc.set_result(result);
            }
            loaded.push(calc);
        }

        self.entries = loaded;
        info!(path = %store.path().display(), entries = self.entries.len(), "history loaded");
        Ok(self.entries.len())
    }
}
