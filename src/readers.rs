use anyhow::{Context, Result};
use std::io::{self, BufRead, BufReader, Read};

use crate::decompression;
use crate::multiline::ContinuationJoiner;

/// Open an input path, `-` meaning stdin; compressed input is unpacked
pub fn open_input(path: &str) -> Result<Box<dyn BufRead + Send>> {
    let reader: Box<dyn Read + Send> = if path == "-" {
        decompression::maybe_decompress(io::stdin()).context("Failed to read stdin")?
    } else {
        decompression::open_file(path)?
    };
    Ok(Box::new(BufReader::new(reader)))
}

/// Reads logical entries from a line source and groups them into batches
pub struct EntryBatcher<R> {
    reader: R,
    batch_size: usize,
    joiner: Option<ContinuationJoiner>,
    line: String,
    done: bool,
}

impl<R: BufRead> EntryBatcher<R> {
    pub fn new(reader: R, batch_size: usize, join_continuations: bool) -> Self {
        Self {
            reader,
            batch_size: batch_size.max(1),
            joiner: join_continuations.then(ContinuationJoiner::new),
            line: String::new(),
            done: false,
        }
    }

    /// Next physical line without its terminator, `None` at end of input
    fn read_physical_line(&mut self) -> io::Result<Option<&str>> {
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            return Ok(None);
        }
        Ok(Some(self.line.trim_end_matches(['\n', '\r'])))
    }

    fn next_batch(&mut self) -> io::Result<Vec<String>> {
        let mut batch = Vec::with_capacity(self.batch_size);
        while batch.len() < self.batch_size {
            let Some(line) = self.read_physical_line()? else {
                self.done = true;
                if let Some(entry) = self.joiner.as_mut().and_then(ContinuationJoiner::flush) {
                    batch.push(entry);
                }
                break;
            };
            let line = line.to_string();
            match self.joiner.as_mut() {
                Some(joiner) => batch.extend(joiner.feed_line(&line)),
                None => batch.push(line),
            }
        }
        Ok(batch)
    }
}

impl<R: BufRead> Iterator for EntryBatcher<R> {
    type Item = io::Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_batch() {
            Ok(batch) if batch.is_empty() => None,
            Ok(batch) => Some(Ok(batch)),
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
