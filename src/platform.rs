use anyhow::Result;
use std::io;
use std::process;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use crate::parallel::CancelToken;

#[cfg(unix)]
use signal_hook::{consts::SIGINT, consts::SIGPIPE, consts::SIGTERM, iterator::Signals};

#[cfg(windows)]
use signal_hook::{consts::SIGINT, iterator::Signals};

/// Standard Unix exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    SignalInt = 130,  // 128 + SIGINT (2)
    SignalPipe = 141, // 128 + SIGPIPE (13)
    SignalTerm = 143, // 128 + SIGTERM (15)
}

impl ExitCode {
    pub fn exit(self) -> ! {
        process::exit(self as i32)
    }
}

/// Which signal (if any) requested termination. Signal disposition is
/// process-wide, so this is the one piece of state not owned by a run.
static TERMINATING_SIGNAL: AtomicUsize = AtomicUsize::new(0);

/// Exit code matching the signal that cancelled the run, if one did.
pub fn signal_exit_code() -> ExitCode {
    match TERMINATING_SIGNAL.load(Ordering::Relaxed) as i32 {
        SIGINT => ExitCode::SignalInt,
        #[cfg(unix)]
        SIGPIPE => ExitCode::SignalPipe,
        #[cfg(unix)]
        SIGTERM => ExitCode::SignalTerm,
        _ => ExitCode::GeneralError,
    }
}

/// True if this error bottoms out in a broken pipe: the reader went away,
/// which on Unix is a normal way for a consumer to stop a producer.
pub fn is_broken_pipe(error: &anyhow::Error) -> bool {
    error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<io::Error>())
        .any(|io_err| io_err.kind() == io::ErrorKind::BrokenPipe)
}

/// Signal handler for graceful shutdown: sets the run's cancel token and
/// lets the pipeline unwind. A second grace period guards against a run
/// that never observes the token.
pub struct SignalHandler {
    _handle: thread::JoinHandle<()>,
}

impl SignalHandler {
    pub fn new(token: CancelToken) -> Result<Self> {
        #[cfg(unix)]
        let signals_to_handle = vec![SIGINT, SIGPIPE, SIGTERM];

        #[cfg(windows)]
        let signals_to_handle = vec![SIGINT]; // Windows only supports SIGINT reliably

        let mut signals = Signals::new(signals_to_handle)?;

        let handle = thread::spawn(move || {
            for sig in signals.forever() {
                TERMINATING_SIGNAL.store(sig as usize, Ordering::Relaxed);
                token.cancel();

                #[cfg(unix)]
                if sig == SIGPIPE {
                    // Broken pipe - exit quietly (normal for Unix pipes)
                    ExitCode::SignalPipe.exit();
                }

                // Give the pipeline a moment to wind down through the
                // token; hard-exit if it does not.
                thread::sleep(std::time::Duration::from_secs(2));
                signal_exit_code().exit();
            }
        });

        Ok(SignalHandler { _handle: handle })
    }
}
