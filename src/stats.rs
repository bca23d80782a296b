use thiserror::Error;

/// Counters collected while aggregating one batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub success: usize,
    pub errors: usize,
    /// Message of the most recent error
    pub last_error: String,
    /// Input indices that produced no output row, in input order
    pub skipped: Vec<usize>,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_success(&mut self) {
        self.success += 1;
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors += 1;
        self.last_error = message.into();
    }

    pub fn add_skipped(&mut self, index: usize) {
        self.skipped.push(index);
    }

    /// Fold another batch's counters into this one
    pub fn merge(&mut self, other: &RunStats, index_offset: usize) {
        self.success += other.success;
        self.errors += other.errors;
        if other.errors > 0 {
            self.last_error.clone_from(&other.last_error);
        }
        self.skipped
            .extend(other.skipped.iter().map(|index| index + index_offset));
    }

    /// The stats as a batch-level error, or `None` when every line succeeded
    pub fn into_error(self) -> Option<StatsError> {
        if self.errors == 0 {
            None
        } else {
            Some(StatsError { stats: self })
        }
    }

    pub fn format_stats(&self, lines: usize) -> String {
        let mut output = format!(
            "Lines processed: {} total, {} parsed, {} skipped",
            lines,
            self.success,
            self.skipped.len()
        );
        if self.errors > 0 {
            output.push_str(&format!(
                ", {} errors (last: {})",
                self.errors, self.last_error
            ));
        }
        output
    }
}

/// Partial-success error returned by a batch that had failing lines.
///
/// Successfully parsed records are returned alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} lines failed to parse ({} succeeded, {} skipped): {}", .stats.errors, .stats.success, .stats.skipped.len(), .stats.last_error)]
pub struct StatsError {
    pub stats: RunStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_run_has_no_error() {
        let mut stats = RunStats::new();
        stats.add_success();
        stats.add_skipped(1);
        assert!(stats.into_error().is_none());
    }

    #[test]
    fn test_last_error_is_overwritten() {
        let mut stats = RunStats::new();
        stats.add_error("first");
        stats.add_error("second");
        let err = stats.into_error().unwrap();
        assert_eq!(err.stats.errors, 2);
        assert_eq!(err.stats.last_error, "second");
        assert_eq!(
            err.to_string(),
            "2 lines failed to parse (0 succeeded, 0 skipped): second"
        );
    }

    #[test]
    fn test_merge_offsets_skipped_indices() {
        let mut total = RunStats::new();
        total.add_success();
        total.add_skipped(0);

        let mut batch = RunStats::new();
        batch.add_error("parsed no data by line x");
        batch.add_skipped(2);

        total.merge(&batch, 10);
        assert_eq!(total.success, 1);
        assert_eq!(total.errors, 1);
        assert_eq!(total.last_error, "parsed no data by line x");
        assert_eq!(total.skipped, vec![0, 12]);

        total.merge(&RunStats::new(), 20);
        assert_eq!(total.last_error, "parsed no data by line x");
    }

    #[test]
    fn test_format_stats() {
        let mut stats = RunStats::new();
        stats.add_success();
        stats.add_skipped(1);
        assert_eq!(
            stats.format_stats(2),
            "Lines processed: 2 total, 1 parsed, 1 skipped"
        );
        stats.add_error("boom");
        assert_eq!(
            stats.format_stats(3),
            "Lines processed: 3 total, 1 parsed, 1 skipped, 1 errors (last: boom)"
        );
    }
}
