//! Pipeline orchestration: wires the producer, the bounded work queue, and
//! the worker pool together, and waits on the completion barrier.

use crossbeam_channel::bounded;
use std::io::BufRead;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crate::cli::ErrorStrategy;
use crate::error::PipelineError;
use crate::stats::{RunStats, WorkerTally};
use crate::store::{AggregateStore, RunningStat};

use super::producer::producer_thread;
use super::types::{CancelToken, ParallelConfig};
use super::worker::worker_thread;

/// Aggregated state handed to the finalizer after the barrier.
#[derive(Debug)]
pub struct PipelineOutput {
    pub entries: Vec<(String, RunningStat)>,
    pub stats: RunStats,
}

/// One aggregation run. Owns its channel, store, and cancel token; nothing
/// is shared across runs.
pub struct Pipeline {
    config: ParallelConfig,
    separator: char,
    on_error: ErrorStrategy,
    token: CancelToken,
}

impl Pipeline {
    pub fn new(
        config: ParallelConfig,
        separator: char,
        on_error: ErrorStrategy,
        token: CancelToken,
    ) -> Self {
        Self {
            config,
            separator,
            on_error,
            token,
        }
    }

    /// Run the full pipeline over `reader` and return the accumulated
    /// per-key stats.
    ///
    /// Either the whole input is aggregated or an error comes back with no
    /// partial state: the store is only surrendered after every worker has
    /// been joined and reported success.
    pub fn run<R: BufRead + Send + 'static>(
        self,
        reader: R,
    ) -> Result<PipelineOutput, PipelineError> {
        let start = Instant::now();
        let num_workers = self.config.num_workers.max(1);
        let store = Arc::new(AggregateStore::new(num_workers));

        let (work_sender, work_receiver) = bounded(self.config.queue_capacity);

        let producer_handle = {
            let token = self.token.clone();
            thread::spawn(move || producer_thread(reader, work_sender, token))
        };

        let mut worker_handles = Vec::with_capacity(num_workers);
        for worker_id in 0..num_workers {
            let work_receiver = work_receiver.clone();
            let store = Arc::clone(&store);
            let token = self.token.clone();
            let separator = self.separator;
            let on_error = self.on_error;

            let handle = thread::spawn(move || {
                worker_thread(worker_id, work_receiver, store, separator, on_error, token)
            });
            worker_handles.push(handle);
        }
        drop(work_receiver);

        // Completion barrier: every worker must have exited before the
        // store can be read.
        let mut tally = WorkerTally::default();
        let mut worker_error: Option<PipelineError> = None;
        for handle in worker_handles {
            match handle.join().unwrap() {
                Ok(worker_tally) => tally.merge(&worker_tally),
                Err(e) => {
                    // Prefer the root-cause error over the Cancelled
                    // results of the siblings it shut down.
                    if worker_error.is_none() || matches!(worker_error, Some(PipelineError::Cancelled)) {
                        worker_error = Some(e);
                    }
                }
            }
        }

        let producer_result = producer_handle.join().unwrap();

        if let Some(e) = worker_error.filter(|e| !matches!(e, PipelineError::Cancelled)) {
            return Err(e);
        }
        let lines_read = producer_result?;
        if self.token.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        let store = Arc::try_unwrap(store)
            .ok()
            .expect("store still shared after barrier");
        let entries = store.into_entries();

        let stats = RunStats {
            lines_read,
            records_folded: tally.records_folded,
            malformed_skipped: tally.malformed_skipped,
            distinct_keys: entries.len(),
            workers: num_workers,
            processing_time: start.elapsed(),
        };

        Ok(PipelineOutput { entries, stats })
    }
}
