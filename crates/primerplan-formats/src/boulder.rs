//! Boulder-IO, the `TAG=VALUE` record format spoken by primer3.
//!
//! A record is a run of `TAG=VALUE` lines closed by a line holding a single `=`.

use std::io::Write;

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, line_ending, multispace0, not_line_ending},
    combinator::{eof, map, value},
    multi::many0,
    sequence::{separated_pair, terminated},
    IResult,
};

use crate::FormatError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoulderRecord {
    tags: Vec<(String, String)>,
}

impl BoulderRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tag: impl Into<String>, value: impl Into<String>) {
        self.tags.push((tag.into(), value.into()));
    }

    /// Last value written for `tag`.
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.tags
            .iter()
            .rev()
            .find(|(t, _)| t == tag)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().map(|(t, v)| (t.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Write one record including its `=` terminator.
pub fn write_record<W: Write>(record: &BoulderRecord, out: &mut W) -> Result<(), FormatError> {
    for (tag, value) in record.iter() {
        if tag.is_empty() || tag.contains(['=', '\n']) || value.contains('\n') {
            return Err(FormatError::InvalidFormat(format!(
                "cannot encode Boulder-IO tag '{}'",
                tag
            )));
        }
        writeln!(out, "{}={}", tag, value)?;
    }
    writeln!(out, "=")?;
    Ok(())
}

fn tag_line(input: &str) -> IResult<&str, (&str, &str)> {
    terminated(
        separated_pair(
            take_while1(|c: char| c != '=' && c != '\n' && c != '\r'),
            char('='),
            not_line_ending,
        ),
        line_ending,
    )(input)
}

fn record_end(input: &str) -> IResult<&str, ()> {
    value((), terminated(char('='), alt((line_ending, eof))))(input)
}

fn record(input: &str) -> IResult<&str, BoulderRecord> {
    map(terminated(many0(tag_line), record_end), |tags| {
        let mut record = BoulderRecord::new();
        for (tag, value) in tags {
            record.push(tag, value);
        }
        record
    })(input)
}

/// Parse every complete record in `input`.
pub fn parse_records(input: &str) -> Result<Vec<BoulderRecord>, FormatError> {
    let (rest, records) = many0(record)(input)
        .map_err(|e| FormatError::InvalidFormat(format!("Boulder-IO: {}", e)))?;
    let (rest, _) = multispace0::<&str, nom::error::Error<&str>>(rest)
        .map_err(|e| FormatError::InvalidFormat(format!("Boulder-IO: {}", e)))?;
    if !rest.is_empty() {
        let preview: String = rest.chars().take(40).collect();
        return Err(FormatError::InvalidFormat(format!(
            "unterminated Boulder-IO record near '{}'",
            preview
        )));
    }
    Ok(records)
}
