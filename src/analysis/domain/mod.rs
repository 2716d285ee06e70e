pub mod metadata;
pub mod package;
pub mod report;
pub mod stats;
pub mod vulnerability;

pub use metadata::{BundleSize, PackageMetadata};
pub use package::{Ecosystem, PackageIdentifier, LATEST_VERSION};
pub use report::{PackageAnalysis, TrustScore, TrustScoreBreakdown, DEGRADED_SUMMARY};
pub use stats::{DownloadStats, RepositoryStats};
pub use vulnerability::{Severity, SeverityCounts, Vulnerability};
