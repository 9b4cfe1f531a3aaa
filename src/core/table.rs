use super::error::DbError;
use super::row::Row;
use parking_lot::{RwLock, RwLockReadGuard};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Notify;

/// An in-memory table: a fixed set of columns and an ordered, growable
/// sequence of rows. Row contents are guarded by the per-row locks; the
/// `RwLock` around the sequence is structural only (scans take it shared,
/// insert/delete take it exclusive). `changed` carries the wait/notify
/// protocol for blocking queries and never protects data.
#[derive(Debug)]
pub struct Table {
    columns: Vec<String>,
    column_index: HashMap<String, usize>,
    rows: RwLock<Vec<Arc<Row>>>,
    changed: Notify,
}

impl Table {
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        let column_index = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self {
            columns,
            column_index,
            rows: RwLock::new(Vec::new()),
            changed: Notify::new(),
        }
    }

    /// Builds a table from a parsed header and records. Every record must
    /// match the header's column count.
    pub fn from_records(
        columns: Vec<String>,
        records: Vec<Vec<String>>,
    ) -> Result<Self, DbError> {
        let table = Self::new(columns);
        {
            let mut rows = table.rows.write();
            for record in records {
                if record.len() != table.columns.len() {
                    return Err(DbError::ColumnCountMismatch);
                }
                rows.push(Arc::new(Row::new(record)));
            }
        }
        Ok(table)
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Result<usize, DbError> {
        self.column_index
            .get(name)
            .copied()
            .ok_or_else(|| DbError::ColumnNotFound(name.to_string()))
    }

    /// Shared access to the row sequence for the duration of a scan. Holding
    /// the guard keeps a concurrent delete's swap out until the scan is done.
    #[must_use]
    pub fn rows(&self) -> RwLockReadGuard<'_, Vec<Arc<Row>>> {
        self.rows.read()
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.read().len()
    }

    /// Appends a row. The caller is responsible for the arity invariant.
    pub fn push_row(&self, row: Row) {
        self.rows.write().push(row.into());
    }

    /// Rebuilds the row sequence keeping only rows that pass `keep`, then
    /// swaps it in atomically. Returns the number of rows removed. Order of
    /// retained rows is preserved.
    pub fn retain_rows(&self, keep: impl Fn(&Row) -> bool) -> usize {
        let mut rows = self.rows.write();
        let before = rows.len();
        let kept: Vec<Arc<Row>> = rows.iter().filter(|row| keep(row)).cloned().collect();
        let removed = before - kept.len();
        *rows = kept;
        removed
    }

    /// The change-notification primitive blocking queries wait on.
    #[must_use]
    pub fn changed(&self) -> &Notify {
        &self.changed
    }

    /// Wakes every query currently waiting for this table to change.
    pub fn notify_changed(&self) {
        self.changed.notify_waiters();
    }
}
