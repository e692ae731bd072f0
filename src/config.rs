use crate::cli::{Cli, ErrorStrategy, OutputFormat};

/// Main configuration struct for rollup.
///
/// One instance per pipeline invocation; nothing here is process-global, so
/// multiple runs can coexist in one process (the library entry point takes
/// the config by reference).
#[derive(Debug, Clone)]
pub struct RollupConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub processing: ProcessingConfig,
    pub performance: PerformanceConfig,
}

#[derive(Debug, Clone)]
pub struct InputConfig {
    pub files: Vec<String>,
    pub separator: char,
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub sort: bool,
    pub stats: bool,
}

#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    pub on_error: ErrorStrategy,
}

#[derive(Debug, Clone)]
pub struct PerformanceConfig {
    pub workers: usize,
    pub queue_size: usize,
}

impl RollupConfig {
    /// Create configuration from CLI arguments
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            input: InputConfig {
                files: cli.files.clone(),
                separator: cli.separator,
            },
            output: OutputConfig {
                format: cli.output_format,
                sort: cli.sort,
                stats: cli.stats,
            },
            processing: ProcessingConfig {
                on_error: cli.on_error,
            },
            performance: PerformanceConfig {
                workers: cli.workers,
                queue_size: cli.queue_size,
            },
        }
    }

    /// Get effective worker count with defaults (0 = available parallelism)
    pub fn effective_workers(&self) -> usize {
        if self.performance.workers == 0 {
            num_cpus::get()
        } else {
            self.performance.workers
        }
    }

    /// Get effective queue capacity; a zero-capacity channel would deadlock
    /// a lone producer, so clamp to at least 1.
    pub fn effective_queue_size(&self) -> usize {
        self.performance.queue_size.max(1)
    }
}

impl Default for RollupConfig {
    fn default() -> Self {
        Self {
            input: InputConfig {
                files: Vec::new(),
                separator: ';',
            },
            output: OutputConfig {
                format: OutputFormat::Default,
                sort: false,
                stats: false,
            },
            processing: ProcessingConfig {
                on_error: ErrorStrategy::Abort,
            },
            performance: PerformanceConfig {
                workers: 0,
                queue_size: 100,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_workers_auto() {
        let config = RollupConfig::default();
        assert_eq!(config.effective_workers(), num_cpus::get());
    }

    #[test]
    fn test_effective_workers_explicit() {
        let mut config = RollupConfig::default();
        config.performance.workers = 3;
        assert_eq!(config.effective_workers(), 3);
    }

    #[test]
    fn test_queue_size_clamped() {
        let mut config = RollupConfig::default();
        config.performance.queue_size = 0;
        assert_eq!(config.effective_queue_size(), 1);
    }
}
