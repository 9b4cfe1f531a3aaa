pub mod conditions;
pub mod dml;
pub mod queries;

pub use conditions::ConditionEvaluator;
pub use dml::DmlExecutor;
pub use queries::SelectExecutor;

use crate::core::{DbError, TableRegistry};
use crate::parser::{parse_statement, Statement};

pub struct QueryExecutor;

impl QueryExecutor {
    /// The statement execution entry point used by the dispatcher. Any
    /// parse or execution failure becomes a well-formed `Error: ` body
    /// instead of crossing the worker boundary.
    pub async fn execute(registry: &TableRegistry, statement: &str) -> String {
        match Self::run(registry, statement).await {
            Ok(output) => output,
            Err(e) => format!("Error: {e}\n"),
        }
    }

    async fn run(registry: &TableRegistry, statement: &str) -> Result<String, DbError> {
        match parse_statement(statement).map_err(DbError::ParseError)? {
            Statement::Select {
                columns,
                table,
                filter,
                wait,
            } => {
                let table = registry.resolve(&table).await?;
                SelectExecutor::select(&table, &columns, filter.as_ref(), wait).await
            }
            Statement::Update {
                table,
                assignments,
                filter,
                wait,
            } => {
                let table = registry.resolve(&table).await?;
                DmlExecutor::update(&table, &assignments, filter.as_ref(), wait).await
            }
            Statement::Insert {
                table,
                columns,
                values,
            } => {
                let table = registry.resolve(&table).await?;
                DmlExecutor::insert(&table, &columns, &values)
            }
            Statement::Delete { table, filter } => {
                let table = registry.resolve(&table).await?;
                DmlExecutor::delete(&table, filter.as_ref())
            }
            Statement::Save { table } => registry.save(&table).await,
        }
    }
}
