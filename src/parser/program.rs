//! Instruction file parser.
//!
//! The host reads newline-delimited records of the form `<D><N>`: a
//! single direction character (`R` = increase, `L` = decrease)
//! followed by a non-negative decimal magnitude, e.g.
//!
//! ```text
//! R3
//! L5
//! R2
//! ```
//!
//! Blank and whitespace-only lines are skipped; surrounding whitespace
//! on a record is tolerated. The parser puts no upper bound on the
//! magnitude — values wider than the step-count lines are truncated
//! when driven (see [`crate::device::bus`]). Anything malformed is a
//! fatal parse error naming the offending line.

use std::path::Path;

use anyhow::Context;
use thiserror::Error;

use crate::device::Direction;

/// Errors from parsing an instruction record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Record was empty (only reachable through record-level parsing;
    /// file-level parsing skips blank lines first).
    #[error("line {line}: empty record")]
    Empty {
        /// 1-based line number.
        line: usize,
    },

    /// First character was not a direction letter.
    #[error("line {line}: unknown direction {found:?} (expected 'R' or 'L')")]
    UnknownDirection {
        /// 1-based line number.
        line: usize,
        /// The character found instead.
        found: char,
    },

    /// Direction letter with nothing after it.
    #[error("line {line}: missing step count after direction")]
    MissingCount {
        /// 1-based line number.
        line: usize,
    },

    /// Magnitude was not a non-negative decimal integer.
    #[error("line {line}: bad step count {text:?}")]
    BadCount {
        /// 1-based line number.
        line: usize,
        /// The text that failed to parse.
        text: String,
    },
}

/// A parsed dial instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// Rotation direction.
    pub direction: Direction,
    /// Step magnitude as written; the bus truncates past its width.
    pub count: u64,
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.direction, self.count)
    }
}

/// An ordered instruction sequence parsed from text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    /// Wrap an already-built instruction list.
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    /// Parse a whole instruction file body.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut instructions = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let record = raw.trim();
            if record.is_empty() {
                continue;
            }
            instructions.push(Self::parse_record(record, idx + 1)?);
        }

        log::debug!("parsed {} instructions", instructions.len());
        Ok(Self { instructions })
    }

    /// Parse a single record. `line` is the 1-based line number used in
    /// error messages.
    pub fn parse_record(record: &str, line: usize) -> Result<Instruction, ParseError> {
        let mut chars = record.chars();

        let direction = match chars.next() {
            Some('R') => Direction::Increase,
            Some('L') => Direction::Decrease,
            Some(found) => return Err(ParseError::UnknownDirection { line, found }),
            None => return Err(ParseError::Empty { line }),
        };

        let rest = chars.as_str();
        if rest.is_empty() {
            return Err(ParseError::MissingCount { line });
        }

        let count = rest.parse::<u64>().map_err(|_| ParseError::BadCount {
            line,
            text: rest.to_string(),
        })?;

        Ok(Instruction { direction, count })
    }

    /// Read and parse an instruction file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading instruction file {}", path.display()))?;
        let program = Self::parse(&text)
            .with_context(|| format!("parsing instruction file {}", path.display()))?;
        log::info!(
            "loaded {} instructions from {}",
            program.len(),
            path.display()
        );
        Ok(program)
    }

    /// Get the parsed instructions.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Get the number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
