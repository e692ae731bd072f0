use clap::Parser;

/// What to do when a line fails to parse.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorStrategy {
    /// Abort the whole run, discard all accumulated state (default).
    Abort,
    /// Drop the record, count it, continue.
    Skip,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One `KEY=MIN/MEAN/MAX` record per line.
    #[default]
    Default,
    /// The historical trailing-comma blob, no line breaks.
    Legacy,
    /// One JSON object per key.
    Jsonl,
    /// CSV with a header row.
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "rollup")]
#[command(about = "Per-key min/mean/max rollups over delimited text streams")]
#[command(
    long_about = "Per-key min/mean/max rollups over delimited text streams\n\nEach input line must be <key><sep><reading>. Lines are distributed over a\nbounded worker pool; the report is emitted once every worker has drained\nthe queue."
)]
#[command(version)]
pub struct Cli {
    /// Input files; '-' or none means stdin
    pub files: Vec<String>,

    #[arg(
        short = 'd',
        long = "sep",
        default_value = ";",
        help = "Single-character field separator",
        help_heading = "Input Options"
    )]
    pub separator: char,

    #[arg(
        long = "on-error",
        value_enum,
        default_value = "abort",
        help = "Policy for malformed records",
        help_heading = "Processing Options"
    )]
    pub on_error: ErrorStrategy,

    #[arg(
        short = 'F',
        long = "output-format",
        value_enum,
        default_value = "default",
        help_heading = "Output Options"
    )]
    pub output_format: OutputFormat,

    #[arg(
        long = "sort",
        help = "Emit keys in lexicographic order instead of map order",
        help_heading = "Output Options"
    )]
    pub sort: bool,

    #[arg(
        short = 'w',
        long = "workers",
        default_value_t = 0,
        help = "Worker threads (0 = number of CPUs)",
        help_heading = "Performance Options"
    )]
    pub workers: usize,

    #[arg(
        long = "queue-size",
        default_value_t = 100,
        help = "Work queue capacity (in-flight lines)",
        help_heading = "Performance Options"
    )]
    pub queue_size: usize,

    #[arg(
        short = 's',
        long = "stats",
        help = "Print run counters to stderr after the report",
        help_heading = "Display Options"
    )]
    pub stats: bool,
}
