use super::Formatter;
use crate::buffer::StatusReport;

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, report: &StatusReport) -> String {
        let mut out = format!(
            "Latency: {:>7.2} ms  fill: {:>5.1}%  overruns: {}  underruns: {}",
            report.max_latency_ms(),
            report.max_fill_ratio() * 100.0,
            report.overruns,
            report.underruns
        );
        if self.verbose {
            for c in &report.channels {
                out.push_str(&format!(
                    "\n  ch{:<2} avail {:>6}  {:>7.2} ms  w {:>6}  r {:>6}",
                    c.channel, c.available_samples, c.latency_ms, c.write_cursor, c.read_cursor
                ));
            }
        }
        out
    }
}
