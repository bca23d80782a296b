//! Joins physical lines into logical audit entries
//!
//! An audit entry may wrap onto following lines that start with a space or
//! tab. Those continuation lines are appended to the entry with a `\n` so the
//! tokenizer sees the whole record as one line.

#[derive(Debug, Default)]
pub struct ContinuationJoiner {
    buffer: Option<String>,
}

impl ContinuationJoiner {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_continuation(line: &str) -> bool {
        line.starts_with(' ') || line.starts_with('\t')
    }

    /// Feed one physical line (without its terminator).
    ///
    /// Returns the previous entry once a line that starts a new one arrives.
    pub fn feed_line(&mut self, line: &str) -> Option<String> {
        if Self::is_continuation(line) {
            if let Some(buffer) = self.buffer.as_mut() {
                buffer.push('\n');
                buffer.push_str(line);
                return None;
            }
        }
        self.buffer.replace(line.to_string())
    }

    /// Return the entry still being built, if any
    pub fn flush(&mut self) -> Option<String> {
        self.buffer.take()
    }

    pub fn has_pending(&self) -> bool {
        self.buffer.is_some()
    }
}

/// Join a whole slice of physical lines at once
pub fn join_continuations<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let mut joiner = ContinuationJoiner::new();
    let mut entries: Vec<String> = lines
        .iter()
        .filter_map(|line| joiner.feed_line(line.as_ref()))
        .collect();
    entries.extend(joiner.flush());
    entries
}
