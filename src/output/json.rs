use serde::Serialize;

use super::{Formatter, iso8601_timestamp};
use crate::buffer::StatusReport;

pub struct JsonFormatter;

#[derive(Serialize)]
struct Line<'a> {
    ts: String,
    #[serde(flatten)]
    report: &'a StatusReport,
}

impl Formatter for JsonFormatter {
    fn format(&self, report: &StatusReport) -> String {
        let line = Line {
            ts: iso8601_timestamp(),
            report,
        };
        serde_json::to_string(&line).unwrap_or_else(|e| format!(r#"{{"error":"{}"}}"#, e))
    }
}
