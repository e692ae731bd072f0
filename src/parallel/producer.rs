//! Producer thread: feeds raw lines from the line source into the bounded
//! work queue.

use crossbeam_channel::Sender;
use std::io::BufRead;

use crate::error::PipelineError;

use super::types::{CancelToken, WorkItem};

/// Read lines from `reader` and enqueue them until EOF, cancellation, or a
/// read error. `send` on the bounded channel blocks when the queue is full,
/// which is the backpressure that keeps the producer from outrunning the
/// workers by more than the queue capacity.
///
/// Returns the number of lines read. Empty lines are counted but not
/// enqueued.
pub(crate) fn producer_thread<R: BufRead>(
    mut reader: R,
    sender: Sender<WorkItem>,
    token: CancelToken,
) -> Result<usize, PipelineError> {
    let mut line_num = 0usize;
    let mut line_buffer = String::new();

    loop {
        if token.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        line_buffer.clear();
        match reader.read_line(&mut line_buffer) {
            Ok(0) => break, // EOF
            Ok(_) => {
                line_num += 1;
                let line = line_buffer.trim_end_matches(['\r', '\n']);
                if line.is_empty() {
                    continue;
                }

                let item = WorkItem {
                    line_num,
                    text: line.to_string(),
                };
                // Send fails only when every worker has exited; a fatal
                // worker error is surfaced by the controller, so stop
                // quietly here.
                if sender.send(item).is_err() {
                    break;
                }
            }
            Err(e) => return Err(PipelineError::SourceRead { source: e }),
        }
    }

    Ok(line_num)
}
