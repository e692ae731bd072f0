use clap::Parser;
use std::io;

use rollup::cli::Cli;
use rollup::config::RollupConfig;
use rollup::error::PipelineError;
use rollup::parallel::CancelToken;
use rollup::platform::{is_broken_pipe, signal_exit_code, ExitCode, SignalHandler};
use rollup::run_pipeline;

fn main() {
    let cli = Cli::parse();
    let config = RollupConfig::from_cli(&cli);

    let token = CancelToken::new();
    let _signals = match SignalHandler::new(token.clone()) {
        Ok(handler) => handler,
        Err(e) => {
            eprintln!("rollup: failed to install signal handler: {}", e);
            ExitCode::GeneralError.exit();
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match run_pipeline(&config, token, &mut out) {
        Ok(result) => {
            if config.output.stats {
                eprintln!("{}", result.stats.format_stats());
            }
            ExitCode::Success.exit();
        }
        Err(e) => {
            if matches!(
                e.downcast_ref::<PipelineError>(),
                Some(PipelineError::Cancelled)
            ) {
                eprintln!("rollup: cancelled");
                signal_exit_code().exit();
            }
            if is_broken_pipe(&e) {
                // The reader closed the pipe; exit quietly like any
                // well-behaved Unix filter.
                ExitCode::SignalPipe.exit();
            }
            eprintln!("rollup: {:#}", e);
            ExitCode::GeneralError.exit();
        }
    }
}
