//! Worker thread: drains the work queue, parses records, folds them into
//! the shared store.

use crossbeam_channel::Receiver;
use std::sync::Arc;

use crate::cli::ErrorStrategy;
use crate::error::PipelineError;
use crate::record::parse_record;
use crate::stats::WorkerTally;
use crate::store::AggregateStore;

use super::types::{CancelToken, WorkItem};

/// Worker loop: recv, parse, fold. Terminates when the queue is closed and
/// drained, when cancelled, or on the first malformed record under the
/// abort policy.
///
/// On a fatal error the worker cancels the token before returning so the
/// producer stops enqueueing and its siblings wind down instead of draining
/// the rest of the queue.
pub(crate) fn worker_thread(
    _worker_id: usize,
    receiver: Receiver<WorkItem>,
    store: Arc<AggregateStore>,
    separator: char,
    on_error: ErrorStrategy,
    token: CancelToken,
) -> Result<WorkerTally, PipelineError> {
    let mut tally = WorkerTally::default();

    while let Ok(item) = receiver.recv() {
        if token.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        match parse_record(&item.text, separator) {
            Ok(record) => {
                store.fold(record.key, record.reading);
                tally.records_folded += 1;
            }
            Err(reason) => match on_error {
                ErrorStrategy::Abort => {
                    token.cancel();
                    return Err(PipelineError::Malformed {
                        line: item.line_num,
                        reason,
                    });
                }
                ErrorStrategy::Skip => {
                    tally.malformed_skipped += 1;
                }
            },
        }
    }

    Ok(tally)
}
