mod error;
mod registry;
mod row;
mod table;

pub use error::DbError;
pub use registry::TableRegistry;
pub use row::Row;
pub use table::Table;
