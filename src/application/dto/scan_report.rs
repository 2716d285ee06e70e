use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::domain::PackageAnalysis;

/// Completed scan envelope handed to formatters and presenters.
///
/// The scan id and timestamp are the explicitly time-varying fields; they
/// are stamped here at the presentation boundary, outside the deterministic
/// scoring core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub scan_id: Uuid,
    pub generated_at: DateTime<Utc>,
    /// Per-package analyses in input order.
    pub analyses: Vec<PackageAnalysis>,
}

impl ScanReport {
    pub fn new(analyses: Vec<PackageAnalysis>) -> Self {
        Self {
            scan_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            analyses,
        }
    }

    /// Lowest trust score in the report, if any packages were analyzed.
    pub fn lowest_score(&self) -> Option<u8> {
        self.analyses
            .iter()
            .map(|analysis| analysis.trust_score)
            .min()
    }
}
