//! Parallel processor
//!
//! One feeder thread streams lines into a rendezvous work channel. N workers
//! parse them and push outcomes into a rendezvous result channel. A barrier
//! thread joins the workers and then closes the result channel, and the
//! calling thread collects outcomes into a pre-sized slot per input index.

use crossbeam_channel::bounded;
use std::thread;
use tracing::debug;

use crate::parsers::LineParser;

use super::types::{LineOutcome, WorkItem};
use super::worker::worker_thread;

/// Bounded worker pool that preserves input order
#[derive(Debug, Clone, Copy)]
pub struct ParallelProcessor {
    num_workers: usize,
}

impl Default for ParallelProcessor {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

impl ParallelProcessor {
    pub fn new(num_workers: usize) -> Self {
        Self {
            num_workers: num_workers.max(1),
        }
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Worker count for a batch: never more workers than lines, never zero
    pub fn workers_for(&self, line_count: usize) -> usize {
        self.num_workers.min(line_count).max(1)
    }

    /// Parse every line and return one outcome per line, in input order
    pub fn process<'a, S, P>(&self, lines: &'a [S], parser: &P) -> Vec<LineOutcome<'a>>
    where
        S: AsRef<str> + Sync,
        P: LineParser + ?Sized,
    {
        if lines.is_empty() {
            return Vec::new();
        }

        let num_workers = self.workers_for(lines.len());
        debug!(lines = lines.len(), num_workers, "dispatching batch");

        let (work_sender, work_receiver) = bounded::<WorkItem<'a>>(0);
        let (result_sender, result_receiver) = bounded::<LineOutcome<'a>>(0);

        let mut slots: Vec<Option<LineOutcome<'a>>> = Vec::with_capacity(lines.len());
        slots.resize_with(lines.len(), || None);

        thread::scope(|scope| {
            scope.spawn(move || {
                for (index, line) in lines.iter().enumerate() {
                    let item = WorkItem {
                        index,
                        line: line.as_ref(),
                    };
                    if work_sender.send(item).is_err() {
                        break;
                    }
                }
            });

            let workers: Vec<_> = (0..num_workers)
                .map(|worker_id| {
                    let work_receiver = work_receiver.clone();
                    let result_sender = result_sender.clone();
                    scope.spawn(move || {
                        worker_thread(worker_id, work_receiver, result_sender, parser)
                    })
                })
                .collect();
            drop(work_receiver);

            // The result channel stays open until every worker has exited
            scope.spawn(move || {
                let mut panic = None;
                for handle in workers {
                    if let Err(payload) = handle.join() {
                        panic.get_or_insert(payload);
                    }
                }
                drop(result_sender);
                if let Some(payload) = panic {
                    std::panic::resume_unwind(payload);
                }
            });

            for outcome in result_receiver.iter() {
                let index = outcome.index;
                slots[index] = Some(outcome);
            }
        });

        let outcomes: Vec<LineOutcome<'a>> = slots.into_iter().flatten().collect();
        debug_assert_eq!(outcomes.len(), lines.len());
        outcomes
    }
}
