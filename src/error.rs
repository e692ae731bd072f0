use std::io;
use thiserror::Error;

/// Errors that can abort a pipeline run.
///
/// Everything here is fatal under the default `abort` policy. Under the
/// `skip` policy, `Malformed` is counted and dropped instead of propagated;
/// the other kinds always terminate the run with no output.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input stream failed before reaching end-of-stream.
    #[error("input read failed: {source}")]
    SourceRead {
        #[source]
        source: io::Error,
    },

    /// A line did not parse into a (key, reading) pair.
    #[error("malformed record on line {line}: {reason}")]
    Malformed { line: usize, reason: MalformedKind },

    /// External cancellation (signal) before completion.
    #[error("cancelled before completion")]
    Cancelled,
}

/// Why a record failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedKind {
    #[error("missing field separator")]
    MissingSeparator,
    #[error("expected exactly two fields")]
    WrongArity,
    #[error("empty key")]
    EmptyKey,
    #[error("reading is not a valid number")]
    BadReading,
}
