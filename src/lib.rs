// Core library for the rollup aggregation tool

pub mod cli;
pub mod config;
pub mod error;
pub mod parallel;
pub mod platform;
pub mod readers;
pub mod record;
pub mod report;
pub mod stats;
pub mod store;

use anyhow::Result;
use std::io::{BufRead, Write};

use config::RollupConfig;
use parallel::{CancelToken, ParallelConfig, Pipeline};
use readers::{ChannelStdinReader, MultiFileReader};
use report::{create_formatter, finalize};
use stats::RunStats;

/// Result of a completed pipeline run.
#[derive(Debug)]
pub struct PipelineResult {
    pub stats: RunStats,
}

fn create_input_reader(config: &RollupConfig) -> Result<Box<dyn BufRead + Send>> {
    if config.input.files.is_empty() {
        Ok(Box::new(ChannelStdinReader::new()?))
    } else {
        Ok(Box::new(MultiFileReader::new(config.input.files.clone())?))
    }
}

/// Run the whole aggregation: line source, worker pool, finalizer.
///
/// The report is written to `output` only after the pipeline has completed
/// successfully; a failed or cancelled run writes nothing (partial
/// statistics would be indistinguishable from complete ones).
pub fn run_pipeline<W: Write>(
    config: &RollupConfig,
    token: CancelToken,
    output: &mut W,
) -> Result<PipelineResult> {
    let reader = create_input_reader(config)?;

    let pipeline = Pipeline::new(
        ParallelConfig {
            num_workers: config.effective_workers(),
            queue_capacity: config.effective_queue_size(),
        },
        config.input.separator,
        config.processing.on_error,
        token,
    );

    let pipeline_output = pipeline.run(reader)?;
    let stats = pipeline_output.stats.clone();

    let rows = finalize(pipeline_output.entries, config.output.sort);
    let formatter = create_formatter(config.output.format);
    formatter.write_report(&rows, output)?;
    output.flush()?;

    Ok(PipelineResult { stats })
}
