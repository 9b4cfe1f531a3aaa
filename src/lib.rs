// FeatherQL - a lightweight (light as a feather) in-memory CSV database
// queried through an SQL-like statement language over a one-shot HTTP protocol.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::needless_pass_by_value)]

// Core data structures (rows, tables, the table registry)
pub mod core;

// SQL-like statement parser
pub mod parser;

// Query executor (select/update/insert/delete/save, predicates)
pub mod executor;

// Delimited-text load/save
pub mod storage;

// Network layer (dispatcher, request framing, remote fetch, static files)
pub mod network;

// Re-export commonly used types for convenience
pub use crate::core::{DbError, Row, Table, TableRegistry};
pub use executor::QueryExecutor;
pub use network::Server;
pub use parser::{parse_statement, Comparison, Condition, Statement};
