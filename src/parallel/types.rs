//! Type definitions for the parallel pipeline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Configuration for parallel processing
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    pub num_workers: usize,
    pub queue_capacity: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_workers: num_cpus::get(),
            queue_capacity: 100,
        }
    }
}

/// One unit of work: a raw line plus its position in the input, carried for
/// error context. Each item is delivered to exactly one worker.
#[derive(Debug)]
pub struct WorkItem {
    pub line_num: usize,
    pub text: String,
}

/// Cooperative cancellation flag owned by one pipeline run.
///
/// Setting it stops the producer from enqueueing further lines; the channel
/// then closes and unblocks every waiting worker. Workers also check it
/// between receives so a cancelled run winds down without draining the
/// whole queue.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
