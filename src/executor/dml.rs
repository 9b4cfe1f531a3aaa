//! UPDATE / INSERT / DELETE execution.

use super::conditions::RowPredicate;
use crate::core::{DbError, Row, Table};
use crate::parser::Condition;

pub struct DmlExecutor;

impl DmlExecutor {
    /// Runs an update. Each row is tested and overwritten under its own lock.
    /// A scan that changed at least one row broadcasts to waiters; a scan
    /// that changed nothing retries in WAIT mode, exactly like select.
    pub async fn update(
        table: &Table,
        assignments: &[(String, String)],
        filter: Option<&Condition>,
        wait: bool,
    ) -> Result<String, DbError> {
        let assignments = assignments
            .iter()
            .map(|(name, value)| Ok((table.column_index(name)?, value.clone())))
            .collect::<Result<Vec<_>, DbError>>()?;
        let predicate = filter
            .map(|cond| RowPredicate::compile(table, cond))
            .transpose()?;

        loop {
            let notified = table.changed().notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let mut changed = 0;
            for row in table.rows().iter() {
                if row.update_if(
                    |cells| predicate.as_ref().is_none_or(|p| p.matches(cells)),
                    &assignments,
                ) {
                    changed += 1;
                }
            }

            if changed > 0 {
                table.notify_changed();
            }
            if changed > 0 || !wait {
                return Ok(format!("{changed} row(s) updated.\n"));
            }
            notified.await;
        }
    }

    /// Builds a row with one empty cell per column, fills in the named
    /// columns positionally, and appends it.
    pub fn insert(
        table: &Table,
        columns: &[String],
        values: &[String],
    ) -> Result<String, DbError> {
        if columns.len() != values.len() {
            return Err(DbError::ParseError(format!(
                "{} column(s) but {} value(s)",
                columns.len(),
                values.len()
            )));
        }
        let mut cells = vec![String::new(); table.column_count()];
        for (name, value) in columns.iter().zip(values) {
            cells[table.column_index(name)?] = value.clone();
        }
        table.push_row(Row::new(cells));
        table.notify_changed();
        Ok("1 row(s) inserted.\n".to_string())
    }

    /// Rebuilds the row sequence without the matching rows and swaps it in
    /// atomically. An absent predicate matches every row, so a bare delete
    /// empties the table.
    pub fn delete(table: &Table, filter: Option<&Condition>) -> Result<String, DbError> {
        let predicate = filter
            .map(|cond| RowPredicate::compile(table, cond))
            .transpose()?;

        let removed = table.retain_rows(|row| {
            predicate
                .as_ref()
                .is_some_and(|p| !row.matches(|cells| p.matches(cells)))
        });
        if removed > 0 {
            table.notify_changed();
        }
        Ok(format!("{removed} row(s) deleted.\n"))
    }
}
