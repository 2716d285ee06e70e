use anyhow::Context;

use crate::application::dto::ScanReport;
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;

/// JsonFormatter adapter for machine-readable report output
///
/// Serializes the whole report envelope (scan id, timestamp, analyses)
/// as pretty-printed JSON.
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &ScanReport) -> Result<String> {
        serde_json::to_string_pretty(report).context("Failed to serialize scan report as JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::domain::{Ecosystem, PackageAnalysis, PackageIdentifier};

    fn sample_report() -> ScanReport {
        let identifier = PackageIdentifier::new(
            "lodash".to_string(),
            "4.17.20".to_string(),
            Ecosystem::Npm,
        )
        .unwrap();
        ScanReport::new(vec![PackageAnalysis::degraded(identifier)])
    }

    #[test]
    fn test_format_produces_valid_json() {
        let output = JsonFormatter::new().format(&sample_report()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(parsed["scan_id"].is_string());
        assert_eq!(parsed["analyses"].as_array().unwrap().len(), 1);
        assert_eq!(parsed["analyses"][0]["trust_score"], 0);
    }

    #[test]
    fn test_format_includes_identifier_fields() {
        let output = JsonFormatter::new().format(&sample_report()).unwrap();
        assert!(output.contains("\"lodash\""));
        assert!(output.contains("\"npm\""));
    }
}
