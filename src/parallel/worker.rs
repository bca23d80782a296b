//! Worker thread for parallel dispatch

use crossbeam_channel::{Receiver, Sender};
use tracing::trace;

use crate::parsers::LineParser;

use super::types::{LineOutcome, LineStatus, WorkItem};

/// Worker thread: parses lines until the work channel closes
pub(crate) fn worker_thread<'a, P: LineParser + ?Sized>(
    worker_id: usize,
    work_receiver: Receiver<WorkItem<'a>>,
    result_sender: Sender<LineOutcome<'a>>,
    parser: &P,
) {
    let mut handled = 0usize;
    for item in work_receiver.iter() {
        if result_sender.send(process_line(item, parser)).is_err() {
            // Collector is gone, nothing left to report to
            break;
        }
        handled += 1;
    }
    trace!(worker_id, handled, "worker finished");
}

pub(crate) fn process_line<'a, P: LineParser + ?Sized>(
    item: WorkItem<'a>,
    parser: &P,
) -> LineOutcome<'a> {
    let line = item.line.trim();
    let status = if line.is_empty() {
        LineStatus::Blank
    } else {
        match parser.parse_line(line) {
            Ok(record) => LineStatus::Parsed(record),
            Err(err) => LineStatus::Failed(err),
        }
    };

    LineOutcome {
        index: item.index,
        line,
        status,
    }
}
