use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{map, recognize},
    sequence::{delimited, pair},
    IResult,
};

pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// A column name: letters, digits and underscores, not starting with a digit.
pub fn column_name(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            take_while1(|c: char| c.is_alphabetic() || c == '_'),
            take_while(|c: char| c.is_alphanumeric() || c == '_'),
        )),
        |s: &str| s.to_string(),
    )(input)
}

/// A table identifier: a file path or URL, bare or single-quoted.
pub fn table_identifier(input: &str) -> IResult<&str, String> {
    alt((
        quoted,
        map(
            take_while1(|c: char| !c.is_whitespace() && c != ',' && c != ';' && c != '('),
            |s: &str| s.to_string(),
        ),
    ))(input)
}

/// A value: single-quoted string (may contain spaces) or a bare token.
pub fn value(input: &str) -> IResult<&str, String> {
    alt((
        quoted,
        map(
            take_while1(|c: char| {
                !c.is_whitespace() && c != ',' && c != ';' && c != '(' && c != ')'
            }),
            |s: &str| s.to_string(),
        ),
    ))(input)
}

fn quoted(input: &str) -> IResult<&str, String> {
    map(
        delimited(char('\''), take_while(|c| c != '\''), char('\'')),
        |s: &str| s.to_string(),
    )(input)
}

/// Matches `word` case-insensitively only when it is a whole word, so a
/// column named `waitlist` is not eaten by the WAIT suffix.
pub fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    move |input: &'a str| {
        let (rest, matched) = nom::bytes::complete::tag_no_case(word)(input)?;
        if rest.chars().next().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Tag,
            )))
        } else {
            Ok((rest, matched))
        }
    }
}

/// Parses the end of a statement: optional semicolon, then nothing else.
pub fn eos(input: &str) -> IResult<&str, ()> {
    let (input, _) = multispace0(input)?;
    let (input, _) = nom::combinator::opt(tag(";"))(input)?;
    let (input, _) = multispace0(input)?;
    nom::combinator::eof(input)?;
    Ok(("", ()))
}
