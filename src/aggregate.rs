//! Folds ordered line outcomes into output records and run statistics

use crate::config::{BatchOptions, KEY_PANDORA_STASH, KEY_RAW_DATA};
use crate::parallel::{LineOutcome, LineStatus};
use crate::record::Record;
use crate::stats::RunStats;

/// Applies the keep/skip policy to outcomes arriving in input order
#[derive(Debug)]
pub struct Aggregator {
    options: BatchOptions,
    records: Vec<Record>,
    stats: RunStats,
}

impl Aggregator {
    pub fn new(options: BatchOptions, capacity: usize) -> Self {
        Self {
            options,
            records: Vec::with_capacity(capacity),
            stats: RunStats::new(),
        }
    }

    pub fn push(&mut self, outcome: LineOutcome<'_>) {
        let LineOutcome {
            index,
            line,
            status,
        } = outcome;

        match status {
            LineStatus::Blank => self.stats.add_skipped(index),
            LineStatus::Failed(err) => {
                self.stats.add_error(err.to_string());
                self.push_error_row(index, line);
            }
            LineStatus::Parsed(record) if record.is_empty() => {
                // Consumed without output, but not reported as skipped
                self.stats
                    .add_error(format!("parsed no data by line {}", line));
            }
            LineStatus::Parsed(mut record) => {
                self.stats.add_success();
                if self.options.keep_raw_data {
                    record.insert(KEY_RAW_DATA, line);
                }
                self.records.push(record);
            }
        }
    }

    fn push_error_row(&mut self, index: usize, line: &str) {
        let BatchOptions {
            disable_record_err_data,
            keep_raw_data,
        } = self.options;

        if disable_record_err_data && !keep_raw_data {
            self.stats.add_skipped(index);
            return;
        }

        let mut row = Record::with_capacity(2);
        if !disable_record_err_data {
            row.insert(KEY_PANDORA_STASH, line);
        }
        if keep_raw_data {
            row.insert(KEY_RAW_DATA, line);
        }
        self.records.push(row);
    }

    pub fn finish(self) -> (Vec<Record>, RunStats) {
        (self.records, self.stats)
    }
}

/// Aggregate a whole ordered outcome list in one call
pub fn aggregate<'a>(
    outcomes: impl IntoIterator<Item = LineOutcome<'a>>,
    options: BatchOptions,
) -> (Vec<Record>, RunStats) {
    let outcomes = outcomes.into_iter();
    let mut aggregator = Aggregator::new(options, outcomes.size_hint().0);
    for outcome in outcomes {
        aggregator.push(outcome);
    }
    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::ParseError;

    fn parsed<'a>(index: usize, line: &'a str, pairs: &[(&str, &str)]) -> LineOutcome<'a> {
        LineOutcome {
            index,
            line,
            status: LineStatus::Parsed(pairs.iter().copied().collect()),
        }
    }

    fn failed(index: usize, line: &str) -> LineOutcome<'_> {
        LineOutcome {
            index,
            line,
            status: LineStatus::Failed(ParseError::Invalid(format!("bad line {}", index))),
        }
    }

    fn blank(index: usize) -> LineOutcome<'static> {
        LineOutcome {
            index,
            line: "",
            status: LineStatus::Blank,
        }
    }

    fn batch_with_failure<'a>() -> Vec<LineOutcome<'a>> {
        vec![
            parsed(0, "a=1", &[("a", "1")]),
            failed(1, "broken"),
            parsed(2, "b=2", &[("b", "2")]),
        ]
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let (records, stats) = aggregate(
            vec![blank(0), parsed(1, "a=1", &[("a", "1")]), blank(2)],
            BatchOptions::default(),
        );
        assert_eq!(records.len(), 1);
        assert_eq!(stats.skipped, vec![0, 2]);
        assert_eq!(stats.success, 1);
        assert_eq!(stats.errors, 0);
    }

    #[test]
    fn test_failure_is_stashed_by_default() {
        let (records, stats) = aggregate(batch_with_failure(), BatchOptions::default());

        assert_eq!(records.len(), 3);
        assert_eq!(records[1].get_str(KEY_PANDORA_STASH), Some("broken"));
        assert!(!records[1].contains_key(KEY_RAW_DATA));
        assert_eq!(stats.success, 2);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.last_error, "bad line 1");
        assert!(stats.skipped.is_empty());
    }

    #[test]
    fn test_failure_is_skipped_when_error_data_disabled() {
        let options = BatchOptions {
            disable_record_err_data: true,
            keep_raw_data: false,
        };
        let (records, stats) = aggregate(batch_with_failure(), options);

        assert_eq!(records.len(), 2);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.skipped, vec![1]);
    }

    #[test]
    fn test_failure_keeps_raw_data_only() {
        let options = BatchOptions {
            disable_record_err_data: true,
            keep_raw_data: true,
        };
        let (records, stats) = aggregate(batch_with_failure(), options);

        assert_eq!(records.len(), 3);
        assert!(!records[1].contains_key(KEY_PANDORA_STASH));
        assert_eq!(records[1].get_str(KEY_RAW_DATA), Some("broken"));
        assert!(stats.skipped.is_empty());
    }

    #[test]
    fn test_failure_with_stash_and_raw_data() {
        let options = BatchOptions {
            disable_record_err_data: false,
            keep_raw_data: true,
        };
        let (records, _) = aggregate(batch_with_failure(), options);

        assert_eq!(records[1].get_str(KEY_PANDORA_STASH), Some("broken"));
        assert_eq!(records[1].get_str(KEY_RAW_DATA), Some("broken"));
        assert_eq!(records[0].get_str(KEY_RAW_DATA), Some("a=1"));
    }

    // Questionable but preserved: an empty result counts as an error and
    // produces no row, yet its index is not reported as skipped.
    #[test]
    fn test_empty_record_is_error_without_skip() {
        let (records, stats) = aggregate(
            vec![
                parsed(0, "a=1", &[("a", "1")]),
                parsed(1, "noise", &[]),
                parsed(2, "b=2", &[("b", "2")]),
            ],
            BatchOptions {
                disable_record_err_data: true,
                keep_raw_data: false,
            },
        );

        assert_eq!(records.len(), 2);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.last_error, "parsed no data by line noise");
        assert!(stats.skipped.is_empty());
    }

    #[test]
    fn test_keep_raw_data_on_success() {
        let (records, _) = aggregate(
            vec![parsed(0, "a=1", &[("a", "1")])],
            BatchOptions {
                disable_record_err_data: false,
                keep_raw_data: true,
            },
        );
        assert_eq!(records[0].get_str("a"), Some("1"));
        assert_eq!(records[0].get_str(KEY_RAW_DATA), Some("a=1"));
    }

    #[test]
    fn test_skipped_plus_rows_cover_all_lines_without_empty_results() {
        let outcomes = vec![
            blank(0),
            parsed(1, "a=1", &[("a", "1")]),
            failed(2, "x"),
            blank(3),
        ];
        let line_count = outcomes.len();
        let (records, stats) = aggregate(
            outcomes,
            BatchOptions {
                disable_record_err_data: true,
                keep_raw_data: false,
            },
        );
        assert_eq!(stats.skipped.len(), line_count - records.len());
    }
}
