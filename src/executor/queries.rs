//! SELECT execution, including the blocking WAIT mode.

use super::conditions::RowPredicate;
use crate::core::{DbError, Table};
use crate::parser::Condition;
use std::fmt::Write;

pub struct SelectExecutor;

impl SelectExecutor {
    /// Runs a select. In WAIT mode the scan is re-run from scratch after each
    /// table change notification until at least one row matches; there is no
    /// timeout.
    pub async fn select(
        table: &Table,
        columns: &[String],
        filter: Option<&Condition>,
        wait: bool,
    ) -> Result<String, DbError> {
        let columns = expand_wildcard(table, columns);
        let indexes = columns
            .iter()
            .map(|name| table.column_index(name))
            .collect::<Result<Vec<_>, _>>()?;
        let predicate = filter
            .map(|cond| RowPredicate::compile(table, cond))
            .transpose()?;

        loop {
            // Register for change notifications before scanning, so a
            // mutation that lands between a failed scan and the await below
            // still wakes us.
            let notified = table.changed().notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let (output, matched) = Self::scan(table, &columns, &indexes, predicate.as_ref());
            if matched > 0 || !wait {
                return Ok(output);
            }
            notified.await;
        }
    }

    /// One full pass over the table. The shared row-sequence guard is held
    /// for the whole scan; each row's cells are snapshotted under that row's
    /// own lock.
    fn scan(
        table: &Table,
        columns: &[String],
        indexes: &[usize],
        predicate: Option<&RowPredicate>,
    ) -> (String, usize) {
        let mut output = String::new();
        let mut matched = 0;

        for row in table.rows().iter() {
            let cells = row.snapshot();
            if predicate.is_none_or(|p| p.matches(&cells)) {
                if matched == 0 {
                    output.push_str(&columns.join("\t"));
                    output.push('\n');
                }
                matched += 1;
                let selected: Vec<&str> = indexes.iter().map(|&i| cells[i].as_str()).collect();
                output.push_str(&selected.join("\t"));
                output.push('\n');
            }
        }

        let _ = writeln!(output, "{matched} row(s) selected.");
        (output, matched)
    }
}

/// Expands the `*` token to all column names in table order.
pub(super) fn expand_wildcard(table: &Table, columns: &[String]) -> Vec<String> {
    if columns.iter().any(|c| c == "*") {
        table.columns().to_vec()
    } else {
        columns.to_vec()
    }
}
