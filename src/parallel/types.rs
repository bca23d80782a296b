//! Type definitions for parallel dispatch

use crate::parsers::ParseError;
use crate::record::Record;

/// A line handed from the feeder to a worker
#[derive(Debug, Clone, Copy)]
pub(crate) struct WorkItem<'a> {
    pub index: usize,
    pub line: &'a str,
}

/// Result of parsing one input line, tagged with its position in the batch
#[derive(Debug, Clone, PartialEq)]
pub struct LineOutcome<'a> {
    pub index: usize,
    /// Input line with surrounding whitespace removed
    pub line: &'a str,
    pub status: LineStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LineStatus {
    /// Nothing left after trimming; the parser was not called
    Blank,
    Parsed(Record),
    Failed(ParseError),
}
