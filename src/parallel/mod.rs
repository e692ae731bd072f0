//! Parallel aggregation pipeline.
//!
//! One producer thread feeds raw lines into a bounded channel; a fixed pool
//! of workers drains it, parsing records and folding them into the shared
//! store. The controller joins every worker (the completion barrier) before
//! the store is handed to the finalizer.
//!
//! # Module Structure
//!
//! - `types`: work items, pipeline configuration, cancellation token
//! - `producer`: line source to work queue
//! - `worker`: the parse-and-fold worker loop
//! - `processor`: orchestration and the completion barrier

mod processor;
mod producer;
mod types;
mod worker;

pub use processor::{Pipeline, PipelineOutput};
pub use types::{CancelToken, ParallelConfig};
