use std::io::Read;

use log::{debug, trace};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_till1, take_until},
};

use crate::{
    error::{Error, Result},
    io::translate_nom_error,
};

use super::{AlignmentHit, RawAlignmentHit};


/// The formats from which alignment hits can be read.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum AlignmentFormat {
    /// The XML document returned by a BLAST search.
    BlastXml,
    /// A tab separated table with a header naming the fields of [`RawAlignmentHit`].
    Tsv,
}

/// Reads all alignment hits from `reader`.
///
/// The outer error is returned if the document as a whole is unreadable.
/// Each inner result corresponds to one hit, in document order,
/// such that a malformed hit does not prevent reading the others.
pub fn read_alignment_hits(
    format: AlignmentFormat,
    mut reader: impl Read,
) -> Result<Vec<Result<AlignmentHit>>> {
    let hits: Vec<Result<AlignmentHit>> = match format {
        AlignmentFormat::BlastXml => {
            let mut input = String::new();
            reader.read_to_string(&mut input)?;
            parse_blast_xml(&input)?
                .into_iter()
                .map(RawAlignmentHit::validate)
                .collect()
        }
        AlignmentFormat::Tsv => read_tsv(reader)?
            .into_iter()
            .map(|hit| hit.and_then(RawAlignmentHit::validate))
            .collect(),
    };

    debug!("Read {} alignment hits", hits.len());
    Ok(hits)
}

/// Reads a tab separated table of alignment hits.
pub fn read_tsv(reader: impl Read) -> Result<Vec<Result<RawAlignmentHit>>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_reader(reader);
    // Fail early if the header itself is unreadable.
    reader.headers()?;

    Ok(reader
        .deserialize::<RawAlignmentHit>()
        .map(|record| record.map_err(Error::from))
        .collect())
}

/// Extracts every HSP of every hit from a BLAST XML document.
///
/// The identifier of a hit is its `Hit_id` followed by its `Hit_def`,
/// matching the title that BLAST reports for the hit.
pub fn parse_blast_xml(input: &str) -> Result<Vec<RawAlignmentHit>> {
    let mut input = input;
    let mut text = String::new();
    let mut hit_id = None;
    let mut hit_def = None;
    let mut hsp = RawAlignmentHit::default();
    let mut hits = Vec::new();

    while !input.is_empty() {
        let (remaining, token) = parse_xml_token(input).map_err(translate_nom_error)?;
        input = remaining;

        match token {
            XmlToken::Skipped | XmlToken::Empty(_) => {}
            XmlToken::Text(content) => text.push_str(&unescape_xml(content)),
            XmlToken::CData(content) => text.push_str(content),
            XmlToken::Start(name) => {
                text.clear();
                match name {
                    "Hit" => {
                        hit_id = None;
                        hit_def = None;
                    }
                    "Hsp" => hsp = RawAlignmentHit::default(),
                    _ => {}
                }
            }
            XmlToken::End(name) => {
                let content = || Some(text.trim().to_string());
                match name {
                    "Hit_id" => hit_id = content(),
                    "Hit_def" => hit_def = content(),
                    "Hsp_query-from" => hsp.query_start = content(),
                    "Hsp_qseq" => hsp.query_aligned = content(),
                    "Hsp_hseq" => hsp.subject_aligned = content(),
                    "Hsp_evalue" => hsp.confidence_value = content(),
                    "Hsp" => {
                        let mut hit = std::mem::take(&mut hsp);
                        hit.identifier = match (&hit_id, &hit_def) {
                            (Some(id), Some(def)) => Some(format!("{id} {def}")),
                            (Some(title), None) | (None, Some(title)) => Some(title.clone()),
                            (None, None) => None,
                        };
                        trace!("Found HSP of hit {:?}", hit.identifier);
                        hits.push(hit);
                    }
                    _ => {}
                }
                text.clear();
            }
        }
    }

    Ok(hits)
}

#[derive(Debug, Eq, PartialEq)]
enum XmlToken<'input> {
    /// Declarations, comments and document type definitions.
    Skipped,
    Start(&'input str),
    End(&'input str),
    Empty(&'input str),
    Text(&'input str),
    /// The content of a CDATA section, taken verbatim.
    CData(&'input str),
}

fn parse_xml_token(input: &str) -> IResult<&str, XmlToken<'_>> {
    alt((
        parse_xml_declaration,
        parse_xml_comment,
        parse_xml_cdata,
        parse_xml_doctype,
        parse_xml_end_tag,
        parse_xml_start_tag,
        parse_xml_text,
    ))
    .parse(input)
}

fn parse_xml_declaration(input: &str) -> IResult<&str, XmlToken<'_>> {
    let (input, _) = tag("<?").parse(input)?;
    let (input, _) = take_until("?>").parse(input)?;
    let (input, _) = tag("?>").parse(input)?;
    Ok((input, XmlToken::Skipped))
}

fn parse_xml_comment(input: &str) -> IResult<&str, XmlToken<'_>> {
    let (input, _) = tag("<!--").parse(input)?;
    let (input, _) = take_until("-->").parse(input)?;
    let (input, _) = tag("-->").parse(input)?;
    Ok((input, XmlToken::Skipped))
}

fn parse_xml_cdata(input: &str) -> IResult<&str, XmlToken<'_>> {
    let (input, _) = tag("<![CDATA[").parse(input)?;
    let (input, content) = take_until("]]>").parse(input)?;
    let (input, _) = tag("]]>").parse(input)?;
    Ok((input, XmlToken::CData(content)))
}

fn parse_xml_doctype(input: &str) -> IResult<&str, XmlToken<'_>> {
    let (input, _) = tag("<!").parse(input)?;
    let (input, _) = take_until(">").parse(input)?;
    let (input, _) = tag(">").parse(input)?;
    Ok((input, XmlToken::Skipped))
}

fn parse_xml_end_tag(input: &str) -> IResult<&str, XmlToken<'_>> {
    let (input, _) = tag("</").parse(input)?;
    let (input, name) = take_till1(|c| c == '>').parse(input)?;
    let (input, _) = tag(">").parse(input)?;
    Ok((input, XmlToken::End(name.trim())))
}

fn parse_xml_start_tag(input: &str) -> IResult<&str, XmlToken<'_>> {
    let (input, _) = tag("<").parse(input)?;
    let (input, content) = take_till1(|c| c == '>').parse(input)?;
    let (input, _) = tag(">").parse(input)?;

    let (content, empty) = match content.strip_suffix('/') {
        Some(content) => (content, true),
        None => (content, false),
    };
    let name = content.split_whitespace().next().unwrap_or("");

    if empty {
        Ok((input, XmlToken::Empty(name)))
    } else {
        Ok((input, XmlToken::Start(name)))
    }
}

fn parse_xml_text(input: &str) -> IResult<&str, XmlToken<'_>> {
    let (input, text) = take_till1(|c| c == '<').parse(input)?;
    Ok((input, XmlToken::Text(text)))
}

/// Replaces the predefined XML entities and numeric character references.
///
/// Unknown entities are kept as they are.
fn unescape_xml(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut remaining = text;

    while let Some(ampersand) = remaining.find('&') {
        result.push_str(&remaining[..ampersand]);
        remaining = &remaining[ampersand..];

        let replacement = remaining.find(';').and_then(|semicolon| {
            let entity = &remaining[1..semicolon];
            let character = match entity {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "amp" => Some('&'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .map(|hex| u32::from_str_radix(hex, 16))
                    .or_else(|| entity.strip_prefix('#').map(str::parse::<u32>))
                    .and_then(|code| code.ok())
                    .and_then(char::from_u32),
            };
            character.map(|character| (character, semicolon))
        });

        match replacement {
            Some((character, semicolon)) => {
                result.push(character);
                remaining = &remaining[semicolon + 1..];
            }
            None => {
                result.push('&');
                remaining = &remaining[1..];
            }
        }
    }

    result.push_str(remaining);
    result
}
