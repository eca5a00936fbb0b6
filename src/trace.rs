//! Reading branch traces.
//!
//! A trace is a text file with one branch per line:
//!
//! ```text
//! <pc> <outcome>
//! ```
//!
//! where the program counter is hexadecimal (with or without a leading
//! `0x`) and the outcome is `1` (taken) or `0` (not-taken). Blank lines
//! are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use crate::Outcome;
use crate::error::TraceError;

/// A single branch from a trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Program counter
    pub pc: u32,

    /// The resolved direction
    pub outcome: Outcome,
}
impl TraceRecord {
    /// Parse a line from a trace. Returns [None] for blank lines.
    pub fn parse(line_num: usize, line: &str) -> Result<Option<Self>, TraceError> {
        let err = |msg: String| TraceError::Parse { line: line_num, msg };

        let mut fields = line.split_whitespace();
        let (pc, outcome) = match (fields.next(), fields.next(), fields.next()) {
            (None, ..) => return Ok(None),
            (Some(pc), Some(outcome), None) => (pc, outcome),
            _ => return Err(err(format!("expected '<pc> <outcome>', got '{}'", line.trim()))),
        };

        let digits = pc.strip_prefix("0x")
            .or_else(|| pc.strip_prefix("0X"))
            .unwrap_or(pc);
        let pc = u32::from_str_radix(digits, 16)
            .map_err(|e| err(format!("bad program counter '{}': {}", pc, e)))?;
        let outcome = match outcome {
            "0" => Outcome::N,
            "1" => Outcome::T,
            _ => return Err(err(format!("bad outcome '{}'", outcome))),
        };
        Ok(Some(Self { pc, outcome }))
    }
}

/// Iterator over the records in a text trace.
pub struct TraceReader<R: BufRead> {
    lines: Lines<R>,
    line_num: usize,
}
impl<R: BufRead> TraceReader<R> {
    pub fn new(reader: R) -> Self {
        Self { lines: reader.lines(), line_num: 0 }
    }
}
impl TraceReader<BufReader<File>> {
    /// Open a trace file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let f = File::open(path)?;
        Ok(Self::new(BufReader::new(f)))
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceRecord, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_num += 1;
            match TraceRecord::parse(self.line_num, &line) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reads_records() {
        let text = "0x400100 1\n\n400104 0\n  0XFFFFFFFC\t1  \n";
        let records: Vec<TraceRecord> = TraceReader::new(text.as_bytes())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(records, vec![
            TraceRecord { pc: 0x40_0100, outcome: Outcome::T },
            TraceRecord { pc: 0x40_0104, outcome: Outcome::N },
            TraceRecord { pc: 0xffff_fffc, outcome: Outcome::T },
        ]);
    }

    #[test]
    fn reports_the_bad_line() {
        let text = "0x10 1\n\n0x14 2\n0x18 1\n";
        let mut reader = TraceReader::new(text.as_bytes());
        assert!(matches!(reader.next(), Some(Ok(_))));
        assert!(matches!(reader.next(), Some(Err(TraceError::Parse { line: 3, .. }))));
        assert!(matches!(reader.next(), Some(Ok(TraceRecord { pc: 0x18, .. }))));
        assert!(reader.next().is_none());
    }

    #[test]
    fn rejects_malformed_lines() {
        for line in ["0x10", "0x10 1 extra", "0xzz 1", "0x1_0000_0000 1", "100000000 0"] {
            assert!(matches!(TraceRecord::parse(1, line), Err(TraceError::Parse { line: 1, .. })),
                "{}", line);
        }
        assert!(matches!(TraceRecord::parse(1, "   "), Ok(None)));
    }
}
