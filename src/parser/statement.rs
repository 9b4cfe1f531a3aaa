/// A comparison operator in a WHERE clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// Substring test.
    Like,
}

/// `column op operand`, applied per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub column: String,
    pub op: Comparison,
    pub operand: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Select {
        /// Column names, or the single token `*`.
        columns: Vec<String>,
        /// Table file path or URL; empty means "most recently used".
        table: String,
        filter: Option<Condition>,
        /// WAIT suffix: retry until at least one row matches.
        wait: bool,
    },
    Update {
        table: String,
        assignments: Vec<(String, String)>,
        filter: Option<Condition>,
        wait: bool,
    },
    Insert {
        table: String,
        columns: Vec<String>,
        values: Vec<String>,
    },
    Delete {
        table: String,
        filter: Option<Condition>,
    },
    Save {
        table: String,
    },
}
