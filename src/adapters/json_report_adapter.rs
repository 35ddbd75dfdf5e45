//! JSON report rendering via serde.

use crate::domain::error::AnalyticsError;
use crate::ports::report_port::{Report, ReportPort};

pub struct JsonReportAdapter {
    pub pretty: bool,
}

impl ReportPort for JsonReportAdapter {
    fn render(&self, report: &Report<'_>) -> Result<String, AnalyticsError> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        };
        rendered.map_err(|e| AnalyticsError::Report {
            reason: format!("JSON encoding failed: {e}"),
        })
    }
}
