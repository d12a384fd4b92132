use nom::{IResult, Parser, character::complete::satisfy, multi::many0};

use crate::error::Error;

pub fn parse_any_whitespace(input: &str) -> IResult<&str, ()> {
    skip_any_whitespace(input).map(|input| (input, ()))
}

pub fn skip_any_whitespace(
    input: &str,
) -> std::result::Result<&str, nom::Err<nom::error::Error<&str>>> {
    many0(satisfy(char::is_whitespace))
        .parse(input)
        .map(|(input, _)| input)
}

pub fn is_quote(c: char) -> bool {
    c == '\'' || c == '"'
}

/// Replaces typographic quotes with their ASCII counterparts.
///
/// Signature literals are often pasted from word processors.
pub fn normalise_quotes(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            c => c,
        })
        .collect()
}

pub fn translate_nom_error(error: nom::Err<nom::error::Error<&str>>) -> Error {
    match error {
        nom::Err::Incomplete(needed) => Error::ParserIncomplete(needed),
        nom::Err::Error(error) | nom::Err::Failure(error) => Error::Parser {
            input: error.input.to_string(),
            kind: error.code,
        },
    }
}

pub fn verify_failure(input: &str) -> nom::Err<nom::error::Error<&str>> {
    nom::Err::Failure(nom::error::Error {
        input,
        code: nom::error::ErrorKind::Verify,
    })
}
