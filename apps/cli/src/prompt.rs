//! Line-based terminal prompts.

use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// Asks questions on `output` and reads answers from `input`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Print one line.
    pub fn say(&mut self, text: impl std::fmt::Display) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// Print `prompt` and return the next line without its terminator.
    pub fn line(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut buf = String::new();
        let read = self
            .input
            .read_line(&mut buf)
            .context("Failed to read from input")?;
        if read == 0 {
            bail!("Input ended while waiting for an answer");
        }
        Ok(buf.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Ask until the answer parses as `T` and passes `valid`.
    pub fn ask<T, F>(&mut self, prompt: &str, what: &str, valid: F) -> Result<T>
    where
        T: FromStr,
        F: Fn(&T) -> bool,
    {
        loop {
            let answer = self.line(prompt)?;
            match answer.trim().parse::<T>() {
                Ok(value) if valid(&value) => return Ok(value),
                _ => self.say(format_args!("Invalid input. Please enter a valid {}.", what))?,
            }
        }
    }

    /// Ask a yes/no question until the answer is one of the two.
    pub fn yes_no(&mut self, prompt: &str) -> Result<bool> {
        loop {
            let answer = self.line(prompt)?.trim().to_lowercase();
            match answer.as_str() {
                "yes" => return Ok(true),
                "no" => return Ok(false),
                _ => self.say("Invalid input. Please enter a valid answer (yes/no).")?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use pretty_assertions::assert_eq;

    use super::*;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_ask_retries_until_valid() {
        let mut p = prompter("abc\n0\n7\n");
        let value: u32 = p.ask("n: ", "int", |v| *v > 0).unwrap();
        assert_eq!(value, 7);

        let out = String::from_utf8(p.into_output()).unwrap();
        assert_eq!(out.matches("Invalid input. Please enter a valid int.").count(), 2);
    }

    #[test]
    fn test_yes_no() {
        let mut p = prompter("maybe\nYES\n");
        assert!(p.yes_no("? ").unwrap());
        let mut p = prompter("no\n");
        assert!(!p.yes_no("? ").unwrap());
    }

    #[test]
    fn test_eof_is_error() {
        let mut p = prompter("");
        assert!(p.line("> ").is_err());
        let mut p = prompter("x\n");
        assert!(p.ask::<i64, _>("> ", "int", |_| true).is_err());
    }

    #[test]
    fn test_line_strips_crlf() {
        let mut p = prompter("gene.txt\r\n");
        assert_eq!(p.line("> ").unwrap(), "gene.txt");
    }
}
