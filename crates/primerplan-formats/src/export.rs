use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use nom::{
    bytes::complete::{tag, take_while1},
    character::complete::{char, space0, space1, u64 as parse_u64},
    combinator::{all_consuming, map},
    sequence::{preceded, terminated, tuple},
    IResult,
};
use primerplan_core::{PairKey, ResultCollection, ResultEntry};
use tracing::info;

use crate::FormatError;

/// `F_{fragment}_P_{pair}: {forward} {reverse}`
pub fn format_line(entry: &ResultEntry) -> String {
    format!("{}: {} {}", entry.key, entry.forward, entry.reverse)
}

/// Write one line per pair, in collection order.
pub fn write_results<W: Write>(results: &ResultCollection, mut out: W) -> Result<(), FormatError> {
    for entry in results {
        writeln!(out, "{}", format_line(entry))?;
    }
    out.flush()?;
    Ok(())
}

/// Save `results` to `path`, replacing any existing file.
pub fn export_results(results: &ResultCollection, path: impl AsRef<Path>) -> Result<(), FormatError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_results(results, BufWriter::new(file))?;
    info!(path = %path.display(), pairs = results.len(), "primers saved");
    Ok(())
}

fn pair_key(input: &str) -> IResult<&str, PairKey> {
    map(
        tuple((
            preceded(tag("F_"), parse_u64),
            preceded(tag("_P_"), parse_u64),
        )),
        |(fragment, pair)| PairKey::new(fragment as usize, pair as usize),
    )(input)
}

fn sequence_token(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace())(input)
}

fn result_line(input: &str) -> IResult<&str, ResultEntry> {
    map(
        all_consuming(terminated(
            tuple((
                terminated(pair_key, char(':')),
                preceded(space1, sequence_token),
                preceded(space1, sequence_token),
            )),
            space0,
        )),
        |(key, forward, reverse)| ResultEntry {
            key,
            forward: forward.to_string(),
            reverse: reverse.to_string(),
        },
    )(input)
}

/// Parse one exported line back into its key and sequences.
pub fn parse_line(line: &str) -> Option<ResultEntry> {
    result_line(line.trim_end_matches(['\r', '\n']))
        .ok()
        .map(|(_, entry)| entry)
}

/// Read an exported file back. Blank lines are ignored.
pub fn read_results<R: BufRead>(reader: R) -> Result<ResultCollection, FormatError> {
    let mut results = ResultCollection::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let entry = parse_line(&line).ok_or_else(|| FormatError::InvalidLine {
            line: i + 1,
            content: line.clone(),
        })?;
        results.push(entry.key, entry.forward, entry.reverse);
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample() -> ResultCollection {
        let mut results = ResultCollection::new();
        results.push(PairKey::new(1, 0), "ACGTACGTACGTACGTACGT", "TTGCATGCATGCAAGGTACC");
        results.push(PairKey::new(2, 0), "GGCCTTAAGGCCTTAAGGCC", "AATTCCGGAATTCCGGAATT");
        results
    }

    #[test]
    fn test_write_two_lines() {
        let mut out = Vec::new();
        write_results(&sample(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "F_1_P_0: ACGTACGTACGTACGTACGT TTGCATGCATGCAAGGTACC",
                "F_2_P_0: GGCCTTAAGGCCTTAAGGCC AATTCCGGAATTCCGGAATT",
            ]
        );
    }

    #[test]
    fn test_parse_line() {
        let entry = parse_line("F_3_P_2: ACGT TTGG\n").unwrap();
        assert_eq!(entry.key, PairKey::new(3, 2));
        assert_eq!(entry.forward, "ACGT");
        assert_eq!(entry.reverse, "TTGG");

        assert!(parse_line("F_3_P_2 ACGT TTGG").is_none());
        assert!(parse_line("F_3_P_2: ACGT").is_none());
        assert!(parse_line("F_3_P_2: ACGT TTGG extra").is_none());
        assert!(parse_line("P_3_F_2: ACGT TTGG").is_none());
    }

    #[test]
    fn test_read_reports_bad_line_number() {
        let input = "F_1_P_0: ACGT TTGG\n\nnonsense\n";
        match read_results(input.as_bytes()) {
            Err(FormatError::InvalidLine { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
