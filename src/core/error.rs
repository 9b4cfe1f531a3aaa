use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("No table has been selected yet")]
    NoTableSelected,
    #[error("Unable to load '{0}': {1}")]
    LoadFailure(String, String),
    #[error("Saving '{0}' is not supported")]
    SaveUnsupported(String),
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),
    #[error("Column count mismatch")]
    ColumnCountMismatch,
    #[error("{0}")]
    NetworkFailure(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
