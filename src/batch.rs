//! Line-oriented batch input: one `expression[;| ]test-string` record per line.

use log::{debug, warn};

use crate::error::{CompileError, Result};
use crate::regex::Regex;
use crate::symbol::decode_literal;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Record<'a> {
    pub expression: &'a str,
    pub input: Option<&'a str>,
}

impl<'a> Record<'a> {
    /// Splits a line into expression and test string. Blank lines yield `None`.
    ///
    /// A `;` separates the two if present; otherwise the first whitespace run
    /// does.
    pub fn parse(line: &'a str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let (expression, input) = match line.split_once(';') {
            Some((expression, input)) => (expression.trim(), Some(input.trim())),
            None => match line.split_once(char::is_whitespace) {
                Some((expression, input)) => (expression, Some(input.trim_start())),
                None => (line, None),
            },
        };
        Some(Self { expression, input })
    }
}

#[derive(Clone, Debug)]
pub struct Evaluation {
    pub regex: Regex,
    /// `None` when the record carried no test string.
    pub accepted: Option<bool>,
}

#[derive(Debug)]
pub struct Report<'a> {
    /// 1-based line number of the record.
    pub index: usize,
    pub record: Record<'a>,
    pub outcome: Result<Evaluation>,
}

/// Compiles a record's expression and runs its test string, if any.
pub fn evaluate(record: &Record) -> Result<Evaluation> {
    let regex = Regex::new(record.expression)?;
    let accepted = match record.input {
        Some(input) => {
            let decoded = decode_literal(input)?;
            Some(regex.is_match(&decoded))
        }
        None => None,
    };
    Ok(Evaluation { regex, accepted })
}

/// Evaluates every record in `text`. A malformed record only fails its own report.
pub fn run(text: &str) -> Vec<Report<'_>> {
    text.lines()
        .enumerate()
        .filter_map(|(n, line)| Record::parse(line).map(|record| (n + 1, record)))
        .map(|(index, record)| {
            let outcome = evaluate(&record);
            match &outcome {
                Ok(evaluation) => debug!("record {}: {:?}", index, evaluation.accepted),
                Err(err) => warn!("record {}: {}", index, err),
            }
            Report {
                index,
                record,
                outcome,
            }
        })
        .collect()
}

impl Report<'_> {
    pub fn error(&self) -> Option<&CompileError> {
        self.outcome.as_ref().err()
    }
}
