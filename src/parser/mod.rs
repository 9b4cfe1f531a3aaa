mod common;
mod dml;
mod statement;

pub use statement::{Comparison, Condition, Statement};

use nom::branch::alt;

/// Parses one statement. Leading/trailing whitespace and a trailing
/// semicolon are tolerated.
pub fn parse_statement(input: &str) -> Result<Statement, String> {
    let input = input.trim();

    match alt((dml::select, dml::update, dml::insert, dml::delete, dml::save))(input) {
        Ok((_, stmt)) => Ok(stmt),
        Err(_) => Err(format!("invalid statement: {input}")),
    }
}
