use super::error::DbError;
use super::table::Table;
use crate::network::fetch;
use crate::storage::csv;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
struct RegistryState {
    tables: HashMap<String, Arc<Table>>,
    /// Most recently used identifier, substituted when a statement names
    /// no table.
    recent: Option<String>,
}

/// The identifier-to-table cache. Each file or URL is loaded by I/O at most
/// once for the lifetime of the process; later references reuse the in-memory
/// instance. The registry exclusively owns all tables, everyone else borrows.
#[derive(Default)]
pub struct TableRegistry {
    state: Mutex<RegistryState>,
}

impl TableRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves `identifier` to its table, loading it on first use. An empty
    /// identifier refers to the most recently used table. The registry lock
    /// is held only across lookup/insert; load I/O and parsing run outside
    /// it, so two first-time loads of the same identifier may both do the
    /// I/O — the first to insert wins and the loser adopts its table.
    pub async fn resolve(&self, identifier: &str) -> Result<Arc<Table>, DbError> {
        let identifier = {
            let mut state = self.state.lock();
            let id = if identifier.is_empty() {
                state.recent.clone().ok_or(DbError::NoTableSelected)?
            } else {
                identifier.to_string()
            };
            state.recent = Some(id.clone());
            if let Some(table) = state.tables.get(&id) {
                return Ok(Arc::clone(table));
            }
            id
        };

        let text = if is_remote(&identifier) {
            fetch::fetch_url(&identifier).await?
        } else {
            tokio::fs::read_to_string(&identifier)
                .await
                .map_err(|e| DbError::LoadFailure(identifier.clone(), e.to_string()))?
        };
        let (columns, records) =
            csv::parse(&text).map_err(|e| DbError::LoadFailure(identifier.clone(), e))?;
        let table = Table::from_records(columns, records)?;

        let mut state = self.state.lock();
        Ok(Arc::clone(
            state
                .tables
                .entry(identifier)
                .or_insert_with(|| Arc::new(table)),
        ))
    }

    /// Writes the named in-memory table back to its source file. Remote
    /// sources cannot be saved.
    pub async fn save(&self, identifier: &str) -> Result<String, DbError> {
        let (identifier, table) = {
            let state = self.state.lock();
            let id = if identifier.is_empty() {
                state.recent.clone().ok_or(DbError::NoTableSelected)?
            } else {
                identifier.to_string()
            };
            if is_remote(&id) {
                return Err(DbError::SaveUnsupported(id));
            }
            let table = state
                .tables
                .get(&id)
                .cloned()
                .ok_or_else(|| DbError::LoadFailure(id.clone(), "table is not loaded".into()))?;
            (id, table)
        };
        tokio::fs::write(&identifier, csv::serialize(&table)).await?;
        Ok(format!("{identifier} saved.\n"))
    }
}

fn is_remote(identifier: &str) -> bool {
    identifier.starts_with("http://")
}
