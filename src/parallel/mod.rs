//! Parallel line dispatch
//!
//! Runs a [`LineParser`](crate::parsers::LineParser) over a batch of lines on a
//! fixed pool of worker threads and hands the outcomes back in input order.
//!
//! # Module Structure
//!
//! - `types`: Work items and per-line outcomes passed over the channels
//! - `worker`: Worker thread that parses one line at a time
//! - `processor`: Feeder, worker pool, completion barrier and ordered collector

mod processor;
mod types;
mod worker;

pub use processor::ParallelProcessor;
pub use types::{LineOutcome, LineStatus};
