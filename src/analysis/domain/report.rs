use serde::{Deserialize, Serialize};

use super::metadata::PackageMetadata;
use super::package::PackageIdentifier;
use super::stats::{DownloadStats, RepositoryStats};
use super::vulnerability::Vulnerability;

/// Summary text attached to analyses that failed mid-pipeline.
pub const DEGRADED_SUMMARY: &str = "Analysis failed for this package";

/// Per-dimension percentages shown alongside the composite trust score.
///
/// Each field is the raw sub-score normalized to its own 0-100 scale and
/// rounded independently. The fields are per-dimension percentages, not
/// proportional contributions: they do NOT sum to the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustScoreBreakdown {
    pub security: u8,
    pub maintenance: u8,
    pub popularity: u8,
    pub dependencies: u8,
}

impl TrustScoreBreakdown {
    /// Breakdown of an all-zero (degraded) analysis.
    pub fn zeroed() -> Self {
        Self {
            security: 0,
            maintenance: 0,
            popularity: 0,
            dependencies: 0,
        }
    }
}

/// Composite trust score with its explainability breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustScore {
    /// Weighted composite, clamped to [0, 100].
    pub score: u8,
    pub breakdown: TrustScoreBreakdown,
}

impl TrustScore {
    pub fn zeroed() -> Self {
        Self {
            score: 0,
            breakdown: TrustScoreBreakdown::zeroed(),
        }
    }
}

/// Terminal aggregate for one scanned package.
///
/// Built once by the scan orchestrator and immutable afterwards. Degraded
/// analyses (a package whose pipeline failed unexpectedly) carry a zeroed
/// score, an empty vulnerability list and [`DEGRADED_SUMMARY`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageAnalysis {
    pub identifier: PackageIdentifier,
    pub vulnerabilities: Vec<Vulnerability>,
    pub trust_score: u8,
    pub breakdown: TrustScoreBreakdown,
    pub metadata: PackageMetadata,
    pub repository_stats: Option<RepositoryStats>,
    pub download_stats: Option<DownloadStats>,
    /// Natural-language summary from the description generator, or its
    /// deterministic fallback.
    pub summary: Option<String>,
}

impl PackageAnalysis {
    /// Degraded placeholder for a package whose pipeline failed.
    ///
    /// One package's failure never affects its siblings: the orchestrator
    /// emits this and moves on to the next package.
    pub fn degraded(identifier: PackageIdentifier) -> Self {
        let metadata = PackageMetadata::named(identifier.name().to_string());
        Self {
            identifier,
            vulnerabilities: Vec::new(),
            trust_score: 0,
            breakdown: TrustScoreBreakdown::zeroed(),
            metadata,
            repository_stats: None,
            download_stats: None,
            summary: Some(DEGRADED_SUMMARY.to_string()),
        }
    }

    /// True when this analysis is the degraded placeholder.
    pub fn is_degraded(&self) -> bool {
        self.summary.as_deref() == Some(DEGRADED_SUMMARY)
    }
}
