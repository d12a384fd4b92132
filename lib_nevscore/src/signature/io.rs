//! Reading signature groups from the literal notation used on the command line.
//!
//! The primary notation is a nested list literal such as
//! `[[['10', 'C'], ['25', 'G']], [['40', 'W']]]`.
//! If it cannot be parsed, a tolerant notation such as `[C10, G25], [W40]` is tried.

use log::{debug, trace};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::take_till,
    character::complete::{char, digit1, satisfy},
    combinator::opt,
    multi::separated_list0,
    sequence::delimited,
};

use crate::{
    error::{Error, Result},
    io::{
        is_quote, normalise_quotes, parse_any_whitespace, skip_any_whitespace,
        translate_nom_error, verify_failure,
    },
};

use super::{SignatureGroup, SignatureGroups, SignaturePosition};


impl SignatureGroups {
    /// Parses a signature literal, falling back to the tolerant notation if needed.
    ///
    /// Fails with [`Error::Configuration`] if neither notation matches.
    pub fn parse_literal(literal: &str) -> Result<Self> {
        let literal = normalise_quotes(literal);

        let structured_error = match Self::parse_structured(&literal) {
            Ok(groups) => return Ok(groups),
            Err(error) => error,
        };
        debug!("Signature literal is not a nested list ({structured_error}), trying fallback");

        Self::parse_fallback(&literal).map_err(|fallback_error| {
            Error::Configuration(format!(
                "the signature literal {literal:?} could not be parsed.\n\
                 As nested list: {structured_error}\n\
                 As residue-position list: {fallback_error}"
            ))
        })
    }

    /// Parses the nested list notation `[[[position, 'R'], ...], ...]`.
    pub fn parse_structured(literal: &str) -> Result<Self> {
        let (remaining, groups) = parse_group_list(literal).map_err(translate_nom_error)?;
        let remaining = skip_any_whitespace(remaining).map_err(translate_nom_error)?;
        if remaining.is_empty() {
            Ok(groups.into_iter().collect())
        } else {
            Err(translate_nom_error(verify_failure(remaining)))
        }
    }

    /// Parses the tolerant notation `[R12, R34], [R56]`.
    ///
    /// Every pair must be exactly one residue letter and the digits of its position,
    /// in either order and optionally quoted.
    pub fn parse_fallback(literal: &str) -> Result<Self> {
        let literal = literal.trim();
        let inner = literal
            .strip_prefix('[')
            .and_then(|inner| inner.strip_suffix(']'))
            .unwrap_or(literal)
            .trim();
        if inner.is_empty() {
            return Ok(Self::default());
        }

        let mut pieces: Vec<_> = inner.split(']').collect();
        if inner.ends_with(']') {
            pieces.pop();
        }

        let mut groups = Vec::with_capacity(pieces.len());
        for (index, piece) in pieces.into_iter().enumerate() {
            let mut content = piece.trim();
            if index > 0 {
                content = content
                    .strip_prefix(',')
                    .ok_or_else(|| {
                        fallback_error(format!("groups must be separated by commas near {piece:?}"))
                    })?
                    .trim_start();
            }
            content = content.strip_prefix('[').unwrap_or(content).trim();
            if content.contains('[') {
                return Err(fallback_error(format!(
                    "groups must not be nested deeper than one level near {piece:?}"
                )));
            }

            trace!("Parsing fallback signature group {content:?}");
            let group = if content.is_empty() {
                SignatureGroup::default()
            } else {
                content
                    .split(',')
                    .map(parse_fallback_token)
                    .collect::<Result<SignatureGroup>>()?
            };
            groups.push(group);
        }

        Ok(Self::new(groups))
    }
}

fn parse_fallback_token(token: &str) -> Result<SignaturePosition> {
    let token = token.trim().trim_matches(is_quote).trim();
    let letter_first = token
        .chars()
        .next()
        .filter(char::is_ascii_alphabetic)
        .map(|letter| (letter, &token[1..]));
    let letter_last = token
        .chars()
        .last()
        .filter(char::is_ascii_alphabetic)
        .map(|letter| (letter, &token[..token.len() - 1]));

    match letter_first.or(letter_last) {
        Some((letter, digits))
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) =>
        {
            let position = digits
                .parse()
                .map_err(|_| fallback_error(format!("position of {token:?} is too large")))?;
            Ok(SignaturePosition::new(position, letter as u8))
        }
        _ => Err(fallback_error(format!(
            "{token:?} is not a residue letter combined with a position"
        ))),
    }
}

fn fallback_error(message: String) -> Error {
    Error::Configuration(message)
}

fn parse_group_list(input: &str) -> IResult<&str, Vec<SignatureGroup>> {
    delimited(
        parse_open_bracket,
        separated_list0(parse_comma, parse_group),
        parse_close_bracket,
    )
    .parse(input)
}

fn parse_group(input: &str) -> IResult<&str, SignatureGroup> {
    let (input, positions) = delimited(
        parse_open_bracket,
        separated_list0(parse_comma, parse_signature_position),
        parse_close_bracket,
    )
    .parse(input)?;
    Ok((input, SignatureGroup::new(positions)))
}

fn parse_signature_position(input: &str) -> IResult<&str, SignaturePosition> {
    let (input, ()) = parse_open_bracket(input)?;
    let position_input = input;
    let (input, position) = alt((parse_quoted, digit1)).parse(input)?;
    let (input, ()) = parse_comma(input)?;
    let (input, residue) = parse_residue(input)?;
    let (input, ()) = parse_close_bracket(input)?;

    trace!("Parsed signature position {position:?} with residue {residue:?}");
    let position = SignaturePosition::from_position_text(position, residue as u8)
        .map_err(|_| verify_failure(position_input))?;
    Ok((input, position))
}

fn parse_residue(input: &str) -> IResult<&str, char> {
    let (remaining, residue) =
        alt((parse_quoted, nom::character::complete::alpha1)).parse(input)?;
    let mut characters = residue.trim().chars();
    match (characters.next(), characters.next()) {
        (Some(residue), None) if residue.is_ascii_alphabetic() || residue == '-' => {
            Ok((remaining, residue))
        }
        _ => Err(verify_failure(input)),
    }
}

fn parse_quoted(input: &str) -> IResult<&str, &str> {
    let (input, quote) = satisfy(is_quote).parse(input)?;
    let (input, content) = take_till(|c| c == quote).parse(input)?;
    let (input, _) = char(quote).parse(input)?;
    Ok((input, content))
}

fn parse_open_bracket(input: &str) -> IResult<&str, ()> {
    let (input, ()) = parse_any_whitespace(input)?;
    let (input, _) = char('[').parse(input)?;
    parse_any_whitespace(input)
}

fn parse_close_bracket(input: &str) -> IResult<&str, ()> {
    let (input, ()) = parse_any_whitespace(input)?;
    let (input, _) = opt(char(',')).parse(input)?;
    let (input, ()) = parse_any_whitespace(input)?;
    let (input, _) = char(']').parse(input)?;
    parse_any_whitespace(input)
}

fn parse_comma(input: &str) -> IResult<&str, ()> {
    let (input, ()) = parse_any_whitespace(input)?;
    let (input, _) = char(',').parse(input)?;
    parse_any_whitespace(input)
}
