/// WHERE clause evaluation.
///
/// Cells are text; ordering operators compare numerically when both sides
/// parse as numbers and lexicographically otherwise. LIKE is a substring
/// test.
use crate::core::{DbError, Table};
use crate::parser::{Comparison, Condition};
use std::cmp::Ordering;

pub struct ConditionEvaluator;

impl ConditionEvaluator {
    #[must_use]
    pub fn matches(cell: &str, op: Comparison, operand: &str) -> bool {
        match op {
            Comparison::Eq => cell == operand,
            Comparison::Ne => cell != operand,
            Comparison::Lt => Self::compare(cell, operand) == Ordering::Less,
            Comparison::Le => Self::compare(cell, operand) != Ordering::Greater,
            Comparison::Gt => Self::compare(cell, operand) == Ordering::Greater,
            Comparison::Ge => Self::compare(cell, operand) != Ordering::Less,
            Comparison::Like => cell.contains(operand),
        }
    }

    fn compare(cell: &str, operand: &str) -> Ordering {
        if let (Ok(a), Ok(b)) = (cell.parse::<f64>(), operand.parse::<f64>()) {
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        } else {
            cell.cmp(operand)
        }
    }
}

/// A condition with its target column resolved to an index, ready to be
/// applied once per candidate row.
pub struct RowPredicate {
    column: usize,
    op: Comparison,
    operand: String,
}

impl RowPredicate {
    pub fn compile(table: &Table, condition: &Condition) -> Result<Self, DbError> {
        Ok(Self {
            column: table.column_index(&condition.column)?,
            op: condition.op,
            operand: condition.operand.clone(),
        })
    }

    #[must_use]
    pub fn matches(&self, cells: &[String]) -> bool {
        ConditionEvaluator::matches(&cells[self.column], self.op, &self.operand)
    }
}
