use super::common::{column_name, eos, keyword, table_identifier, value, ws};
use super::statement::{Comparison, Condition, Statement};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::char,
    combinator::{map, opt, verify},
    multi::separated_list1,
    sequence::{delimited, preceded, tuple},
    IResult,
};

fn comparison(input: &str) -> IResult<&str, Comparison> {
    alt((
        map(tag("!="), |_| Comparison::Ne),
        map(tag("<="), |_| Comparison::Le),
        map(tag(">="), |_| Comparison::Ge),
        map(tag("<"), |_| Comparison::Lt),
        map(tag(">"), |_| Comparison::Gt),
        map(tag("="), |_| Comparison::Eq),
        map(keyword("LIKE"), |_| Comparison::Like),
    ))(input)
}

pub fn condition(input: &str) -> IResult<&str, Condition> {
    let (input, column) = ws(column_name)(input)?;
    let (input, op) = ws(comparison)(input)?;
    let (input, operand) = ws(value)(input)?;
    Ok((
        input,
        Condition {
            column,
            op,
            operand,
        },
    ))
}

fn where_clause(input: &str) -> IResult<&str, Condition> {
    preceded(ws(keyword("WHERE")), condition)(input)
}

fn wait_suffix(input: &str) -> IResult<&str, bool> {
    map(opt(ws(keyword("WAIT"))), |w| w.is_some())(input)
}

pub fn select(input: &str) -> IResult<&str, Statement> {
    let (input, _) = ws(keyword("SELECT"))(input)?;
    let (input, columns) = alt((
        map(ws(tag("*")), |_| vec!["*".to_string()]),
        separated_list1(ws(char(',')), column_name),
    ))(input)?;
    let (input, table) = opt(preceded(ws(keyword("FROM")), table_identifier))(input)?;
    let (input, filter) = opt(where_clause)(input)?;
    let (input, wait) = wait_suffix(input)?;
    let (input, ()) = eos(input)?;
    Ok((
        input,
        Statement::Select {
            columns,
            table: table.unwrap_or_default(),
            filter,
            wait,
        },
    ))
}

pub fn update(input: &str) -> IResult<&str, Statement> {
    let (input, _) = ws(keyword("UPDATE"))(input)?;
    // The table name is optional, so make sure SET is not taken for one.
    let (input, table) = opt(verify(ws(table_identifier), |t: &String| {
        !t.eq_ignore_ascii_case("set")
    }))(input)?;
    let (input, _) = ws(keyword("SET"))(input)?;
    let (input, assignments) = separated_list1(
        ws(char(',')),
        tuple((ws(column_name), ws(char('=')), ws(value))),
    )(input)?;
    let assignments = assignments
        .into_iter()
        .map(|(col, _, val)| (col, val))
        .collect();
    let (input, filter) = opt(where_clause)(input)?;
    let (input, wait) = wait_suffix(input)?;
    let (input, ()) = eos(input)?;
    Ok((
        input,
        Statement::Update {
            table: table.unwrap_or_default(),
            assignments,
            filter,
            wait,
        },
    ))
}

pub fn insert(input: &str) -> IResult<&str, Statement> {
    let (input, _) = ws(keyword("INSERT"))(input)?;
    let (input, _) = ws(keyword("INTO"))(input)?;
    let (input, table) = opt(ws(table_identifier))(input)?;
    let (input, columns) = delimited(
        ws(char('(')),
        separated_list1(ws(char(',')), column_name),
        ws(char(')')),
    )(input)?;
    let (input, _) = ws(keyword("VALUES"))(input)?;
    let (input, values) = delimited(
        ws(char('(')),
        separated_list1(ws(char(',')), value),
        ws(char(')')),
    )(input)?;
    let (input, ()) = eos(input)?;
    Ok((
        input,
        Statement::Insert {
            table: table.unwrap_or_default(),
            columns,
            values,
        },
    ))
}

pub fn delete(input: &str) -> IResult<&str, Statement> {
    let (input, _) = ws(keyword("DELETE"))(input)?;
    let (input, _) = opt(ws(keyword("FROM")))(input)?;
    let (input, table) = opt(verify(ws(table_identifier), |t: &String| {
        !t.eq_ignore_ascii_case("where")
    }))(input)?;
    let (input, filter) = opt(where_clause)(input)?;
    let (input, ()) = eos(input)?;
    Ok((
        input,
        Statement::Delete {
            table: table.unwrap_or_default(),
            filter,
        },
    ))
}

pub fn save(input: &str) -> IResult<&str, Statement> {
    let (input, _) = ws(keyword("SAVE"))(input)?;
    let (input, table) = opt(ws(table_identifier))(input)?;
    let (input, ()) = eos(input)?;
    Ok((
        input,
        Statement::Save {
            table: table.unwrap_or_default(),
        },
    ))
}
