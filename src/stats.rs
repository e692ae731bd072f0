use std::time::Duration;

/// Counters accumulated by one worker and merged into the run totals at the
/// completion barrier.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerTally {
    pub records_folded: usize,
    pub malformed_skipped: usize,
}

impl WorkerTally {
    pub fn merge(&mut self, other: &WorkerTally) {
        self.records_folded += other.records_folded;
        self.malformed_skipped += other.malformed_skipped;
    }
}

/// Statistics for a completed run, printed to stderr with --stats.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub lines_read: usize,
    pub records_folded: usize,
    pub malformed_skipped: usize,
    pub distinct_keys: usize,
    pub workers: usize,
    pub processing_time: Duration,
}

impl RunStats {
    pub fn format_stats(&self) -> String {
        let mut output = format!(
            "Lines read: {}, records folded: {}, distinct keys: {}",
            self.lines_read, self.records_folded, self.distinct_keys
        );

        if self.malformed_skipped > 0 {
            output.push_str(&format!(", {} malformed skipped", self.malformed_skipped));
        }

        let processing_time_ms = self.processing_time.as_millis();
        output.push_str(&format!(
            " in {}ms on {} workers",
            processing_time_ms, self.workers
        ));

        if processing_time_ms > 0 && self.lines_read > 0 {
            let lines_per_sec = (self.lines_read as f64 * 1000.0) / processing_time_ms as f64;
            output.push_str(&format!(" ({:.0} lines/s)", lines_per_sec));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_merge() {
        let mut a = WorkerTally {
            records_folded: 10,
            malformed_skipped: 1,
        };
        let b = WorkerTally {
            records_folded: 5,
            malformed_skipped: 2,
        };
        a.merge(&b);
        assert_eq!(a.records_folded, 15);
        assert_eq!(a.malformed_skipped, 3);
    }

    #[test]
    fn test_format_stats_basic() {
        let stats = RunStats {
            lines_read: 100,
            records_folded: 98,
            malformed_skipped: 2,
            distinct_keys: 7,
            workers: 4,
            processing_time: Duration::from_millis(50),
        };
        let s = stats.format_stats();
        assert!(s.contains("Lines read: 100"));
        assert!(s.contains("distinct keys: 7"));
        assert!(s.contains("2 malformed skipped"));
        assert!(s.contains("4 workers"));
    }

    #[test]
    fn test_format_stats_omits_zero_skips() {
        let stats = RunStats::default();
        assert!(!stats.format_stats().contains("malformed"));
    }
}
