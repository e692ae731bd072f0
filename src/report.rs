use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use crate::cli::OutputFormat;
use crate::store::RunningStat;

/// One finalized report row. Values are already rounded to two decimals.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SummaryRow {
    pub key: String,
    pub min: f64,
    pub mean: f64,
    pub max: f64,
    pub count: u64,
}

/// Round to two decimal places, half away from zero (`f64::round`
/// semantics; matches Go's `math.Round`, which the historical output used).
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Turn accumulated stats into report rows. Order is map order unless
/// `sort` asks for deterministic lexicographic output.
pub fn finalize(entries: Vec<(String, RunningStat)>, sort: bool) -> Vec<SummaryRow> {
    let mut rows: Vec<SummaryRow> = entries
        .into_iter()
        .map(|(key, stat)| SummaryRow {
            key,
            min: round2(stat.min),
            mean: round2(stat.mean()),
            max: round2(stat.max),
            count: stat.count,
        })
        .collect();

    if sort {
        rows.sort_by(|a, b| a.key.cmp(&b.key));
    }
    rows
}

pub trait ReportFormatter {
    fn write_report(&self, rows: &[SummaryRow], out: &mut dyn Write) -> Result<()>;
}

/// One `KEY=MIN/MEAN/MAX` record per line.
pub struct DefaultFormatter;

impl ReportFormatter for DefaultFormatter {
    fn write_report(&self, rows: &[SummaryRow], out: &mut dyn Write) -> Result<()> {
        for row in rows {
            writeln!(out, "{}={:.2}/{:.2}/{:.2}", row.key, row.min, row.mean, row.max)?;
        }
        Ok(())
    }
}

/// The historical concatenated form: `KEY=MIN/MEAN/MAX,` per entry, no line
/// breaks. Same data content as the default format.
pub struct LegacyFormatter;

impl ReportFormatter for LegacyFormatter {
    fn write_report(&self, rows: &[SummaryRow], out: &mut dyn Write) -> Result<()> {
        for row in rows {
            write!(out, "{}={:.2}/{:.2}/{:.2},", row.key, row.min, row.mean, row.max)?;
        }
        Ok(())
    }
}

/// One JSON object per key.
pub struct JsonlFormatter;

impl ReportFormatter for JsonlFormatter {
    fn write_report(&self, rows: &[SummaryRow], out: &mut dyn Write) -> Result<()> {
        for row in rows {
            writeln!(out, "{}", serde_json::to_string(row)?)?;
        }
        Ok(())
    }
}

/// CSV with a `key,min,mean,max,count` header.
pub struct CsvFormatter;

impl ReportFormatter for CsvFormatter {
    fn write_report(&self, rows: &[SummaryRow], out: &mut dyn Write) -> Result<()> {
        let mut writer = csv::Writer::from_writer(out);
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

pub fn create_formatter(format: OutputFormat) -> Box<dyn ReportFormatter> {
    match format {
        OutputFormat::Default => Box::new(DefaultFormatter),
        OutputFormat::Legacy => Box::new(LegacyFormatter),
        OutputFormat::Jsonl => Box::new(JsonlFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_rows() -> Vec<SummaryRow> {
        let entries = vec![
            (
                "Paris".to_string(),
                RunningStat {
                    min: 10.5,
                    max: 20.0,
                    count: 2,
                    sum: 30.5,
                },
            ),
            (
                "Oslo".to_string(),
                RunningStat {
                    min: -3.2,
                    max: -3.2,
                    count: 1,
                    sum: -3.2,
                },
            ),
        ];
        finalize(entries, true)
    }

    #[test]
    fn test_round2_half_away_from_zero() {
        // 0.125 and 12.5 are exact in binary, so the tie is real.
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
        assert_eq!(round2(15.254), 15.25);
        assert_eq!(round2(2.0 / 3.0), 0.67);
    }

    #[test]
    fn test_finalize_computes_mean_from_count() {
        let rows = example_rows();
        let paris = rows.iter().find(|r| r.key == "Paris").unwrap();
        assert_eq!(paris.mean, 15.25);
        assert_eq!(paris.count, 2);
    }

    #[test]
    fn test_finalize_sorted_order() {
        let rows = example_rows();
        assert_eq!(rows[0].key, "Oslo");
        assert_eq!(rows[1].key, "Paris");
    }

    #[test]
    fn test_default_format() {
        let mut out = Vec::new();
        DefaultFormatter.write_report(&example_rows(), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Oslo=-3.20/-3.20/-3.20\nParis=10.50/15.25/20.00\n"
        );
    }

    #[test]
    fn test_legacy_format() {
        let mut out = Vec::new();
        LegacyFormatter.write_report(&example_rows(), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Oslo=-3.20/-3.20/-3.20,Paris=10.50/15.25/20.00,"
        );
    }

    #[test]
    fn test_jsonl_format() {
        let mut out = Vec::new();
        JsonlFormatter.write_report(&example_rows(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let first: serde_json::Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();
        assert_eq!(first["key"], "Oslo");
        assert_eq!(first["count"], 1);
        assert_eq!(first["mean"], -3.2);
    }

    #[test]
    fn test_csv_format_has_header() {
        let mut out = Vec::new();
        CsvFormatter.write_report(&example_rows(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), "key,min,mean,max,count");
        assert_eq!(lines.next().unwrap(), "Oslo,-3.2,-3.2,-3.2,1");
    }

    #[test]
    fn test_empty_report_is_empty() {
        let mut out = Vec::new();
        DefaultFormatter.write_report(&finalize(Vec::new(), false), &mut out).unwrap();
        assert!(out.is_empty());
    }
}
