use tracing::debug;

use crate::aggregate::aggregate;
use crate::config::{BatchOptions, ParserConfig};
use crate::parallel::ParallelProcessor;
use crate::parsers::LineParser;
use crate::record::Record;
use crate::stats::{RunStats, StatsError};

/// A named, configured parser that turns batches of lines into records
pub struct BatchParser {
    name: String,
    parser_type: String,
    options: BatchOptions,
    processor: ParallelProcessor,
    line_parser: Box<dyn LineParser>,
}

impl BatchParser {
    pub fn new(config: &ParserConfig, line_parser: Box<dyn LineParser>) -> Self {
        Self {
            name: config.name.clone(),
            parser_type: config.parser_type.clone(),
            options: config.batch_options(),
            processor: ParallelProcessor::new(config.effective_parallelism()),
            line_parser,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parser_type(&self) -> &str {
        &self.parser_type
    }

    pub fn parallelism(&self) -> usize {
        self.processor.num_workers()
    }

    /// Parse a batch, returning every output row plus the full counters
    pub fn parse_with_stats<S>(&self, lines: &[S]) -> (Vec<Record>, RunStats)
    where
        S: AsRef<str> + Sync,
    {
        let outcomes = self.processor.process(lines, self.line_parser.as_ref());
        let (records, stats) = aggregate(outcomes, self.options);
        debug!(
            parser = %self.name,
            lines = lines.len(),
            records = records.len(),
            errors = stats.errors,
            skipped = stats.skipped.len(),
            "batch parsed"
        );
        (records, stats)
    }

    /// Parse a batch.
    ///
    /// Records for every successful line are always returned. The error is
    /// `Some` only when at least one line failed or produced no data, and
    /// should be treated as partial success.
    pub fn parse<S>(&self, lines: &[S]) -> (Vec<Record>, Option<StatsError>)
    where
        S: AsRef<str> + Sync,
    {
        let (records, stats) = self.parse_with_stats(lines);
        (records, stats.into_error())
    }
}

impl std::fmt::Debug for BatchParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchParser")
            .field("name", &self.name)
            .field("parser_type", &self.parser_type)
            .field("options", &self.options)
            .field("processor", &self.processor)
            .finish_non_exhaustive()
    }
}
