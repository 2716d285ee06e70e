use crate::analysis::domain::{PackageIdentifier, Vulnerability};
use async_trait::async_trait;

/// VulnerabilityAggregator port consumed by the scan orchestrator
///
/// Behind this port sits the two-source aggregation pipeline (advisory
/// graph, point-query database, offline fallback table); the orchestrator
/// only sees the merged, deduplicated result.
///
/// # Contract
/// Never errors. An empty list means "none found", which is intentionally
/// indistinguishable from "all sources unavailable" at this boundary.
#[async_trait]
pub trait VulnerabilityAggregator: Send + Sync {
    /// Fetches the merged advisory list for a package
    ///
    /// # Arguments
    /// * `identifier` - Package name, version and ecosystem
    ///
    /// # Returns
    /// Deduplicated advisories, first-seen source winning on id collisions.
    async fn fetch_vulnerabilities(&self, identifier: &PackageIdentifier) -> Vec<Vulnerability>;
}
