use super::{Formatter, iso8601_timestamp};
use crate::buffer::StatusReport;

/// One row per channel
pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, report: &StatusReport) -> String {
        let ts = iso8601_timestamp();
        report
            .channels
            .iter()
            .map(|c| {
                format!(
                    "{},{},{},{:.3},{},{},{},{}",
                    ts,
                    c.channel,
                    c.available_samples,
                    c.latency_ms,
                    c.write_cursor,
                    c.read_cursor,
                    report.underruns,
                    report.overruns
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn header(&self) -> Option<&'static str> {
        Some("timestamp,channel,available,latency_ms,write_cursor,read_cursor,underruns,overruns")
    }
}
