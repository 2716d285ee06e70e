use crate::application::dto::ScanReport;
use crate::shared::Result;

/// ReportFormatter port for serializing a scan report
///
/// Implementations turn the in-memory report into a displayable string
/// (machine-readable JSON, human-readable table).
pub trait ReportFormatter {
    /// Formats a scan report
    ///
    /// # Arguments
    /// * `report` - The completed scan report
    ///
    /// # Returns
    /// The formatted output, or an error if serialization fails
    fn format(&self, report: &ScanReport) -> Result<String>;
}
