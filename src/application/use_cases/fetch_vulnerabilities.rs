use async_trait::async_trait;

use crate::analysis::domain::{PackageIdentifier, Vulnerability};
use crate::analysis::services::{fallback_advisories, merge_advisories};
use crate::ports::outbound::{AdvisorySource, VulnerabilityAggregator};
use crate::shared::Fetched;

/// FetchVulnerabilitiesUseCase - Aggregates advisories from two sources
///
/// Queries source A (advisory graph) and source B (point-query database),
/// merges A-first with first-seen-wins dedup on advisory id, and consults
/// the static offline fallback table when the merged list is empty. An
/// empty merged list is intentionally indistinguishable from "both sources
/// unavailable": both fall through to the fallback.
///
/// # Type Parameters
/// * `A` - Primary advisory source (wins metadata on id collisions)
/// * `B` - Secondary advisory source
pub struct FetchVulnerabilitiesUseCase<A, B> {
    source_a: A,
    source_b: B,
}

impl<A, B> FetchVulnerabilitiesUseCase<A, B>
where
    A: AdvisorySource,
    B: AdvisorySource,
{
    /// Creates the aggregator over two injected advisory sources
    pub fn new(source_a: A, source_b: B) -> Self {
        Self { source_a, source_b }
    }

    /// Fetches, merges and deduplicates advisories for one package
    ///
    /// Never errors: a source that is uncovered, unconfigured or
    /// unreachable simply contributes nothing.
    ///
    /// # Arguments
    /// * `identifier` - Package name, version and ecosystem
    ///
    /// # Returns
    /// Deduplicated advisories; empty when nothing was found anywhere.
    pub async fn fetch(&self, identifier: &PackageIdentifier) -> Vec<Vulnerability> {
        let mut source_lists = Vec::new();

        if self.source_a.covers(identifier.ecosystem()) {
            source_lists.push(self.query(&self.source_a, "advisory graph", identifier).await);
        }
        if self.source_b.covers(identifier.ecosystem()) {
            source_lists.push(
                self.query(&self.source_b, "vulnerability database", identifier)
                    .await,
            );
        }

        let merged = merge_advisories(source_lists);
        if !merged.is_empty() {
            return merged;
        }

        fallback_advisories(identifier.name())
    }

    async fn query(
        &self,
        source: &impl AdvisorySource,
        label: &str,
        identifier: &PackageIdentifier,
    ) -> Vec<Vulnerability> {
        match source.fetch_advisories(identifier).await {
            Fetched::Available(advisories) => {
                tracing::debug!(
                    package = %identifier,
                    source = label,
                    count = advisories.len(),
                    "advisory source answered"
                );
                advisories
            }
            Fetched::Unavailable => {
                tracing::warn!(package = %identifier, source = label, "advisory source unavailable");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl<A, B> VulnerabilityAggregator for FetchVulnerabilitiesUseCase<A, B>
where
    A: AdvisorySource,
    B: AdvisorySource,
{
    async fn fetch_vulnerabilities(&self, identifier: &PackageIdentifier) -> Vec<Vulnerability> {
        self.fetch(identifier).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::domain::{Ecosystem, Severity};

    struct MockSource {
        covers: bool,
        result: Fetched<Vec<Vulnerability>>,
    }

    impl MockSource {
        fn with(vulns: Vec<Vulnerability>) -> Self {
            Self {
                covers: true,
                result: Fetched::Available(vulns),
            }
        }

        fn unavailable() -> Self {
            Self {
                covers: true,
                result: Fetched::Unavailable,
            }
        }

        fn uncovered() -> Self {
            Self {
                covers: false,
                result: Fetched::Unavailable,
            }
        }
    }

    #[async_trait]
    impl AdvisorySource for MockSource {
        fn covers(&self, _ecosystem: Ecosystem) -> bool {
            self.covers
        }

        async fn fetch_advisories(
            &self,
            _identifier: &PackageIdentifier,
        ) -> Fetched<Vec<Vulnerability>> {
            self.result.clone()
        }
    }

    fn vuln(id: &str, title: &str) -> Vulnerability {
        Vulnerability::new(
            id.to_string(),
            Severity::High,
            title.to_string(),
            String::new(),
        )
    }

    fn npm_id(name: &str) -> PackageIdentifier {
        PackageIdentifier::new(name.to_string(), "1.0.0".to_string(), Ecosystem::Npm).unwrap()
    }

    #[tokio::test]
    async fn test_merges_both_sources_source_a_first() {
        let use_case = FetchVulnerabilitiesUseCase::new(
            MockSource::with(vec![vuln("GHSA-1", "from a")]),
            MockSource::with(vec![vuln("OSV-2", "from b")]),
        );
        let result = use_case.fetch(&npm_id("some-pkg")).await;
        let ids: Vec<&str> = result.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["GHSA-1", "OSV-2"]);
    }

    #[tokio::test]
    async fn test_collision_source_a_wins() {
        let use_case = FetchVulnerabilitiesUseCase::new(
            MockSource::with(vec![vuln("CVE-1", "title from a")]),
            MockSource::with(vec![vuln("CVE-1", "title from b"), vuln("CVE-2", "b only")]),
        );
        let result = use_case.fetch(&npm_id("some-pkg")).await;
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].title, "title from a");
    }

    #[tokio::test]
    async fn test_uncovered_source_is_skipped() {
        let use_case = FetchVulnerabilitiesUseCase::new(
            MockSource::uncovered(),
            MockSource::with(vec![vuln("OSV-1", "from b")]),
        );
        let result = use_case.fetch(&npm_id("some-pkg")).await;
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "OSV-1");
    }

    #[tokio::test]
    async fn test_fallback_when_both_sources_empty() {
        let use_case =
            FetchVulnerabilitiesUseCase::new(MockSource::with(vec![]), MockSource::with(vec![]));
        let result = use_case.fetch(&npm_id("lodash")).await;
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "CVE-2019-10744");
    }

    #[tokio::test]
    async fn test_fallback_when_both_sources_unavailable() {
        let use_case =
            FetchVulnerabilitiesUseCase::new(MockSource::unavailable(), MockSource::unavailable());
        let result = use_case.fetch(&npm_id("lodash")).await;
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "CVE-2019-10744");
    }

    #[tokio::test]
    async fn test_unknown_package_with_no_live_results_is_empty() {
        let use_case =
            FetchVulnerabilitiesUseCase::new(MockSource::with(vec![]), MockSource::unavailable());
        let result = use_case.fetch(&npm_id("totally-unknown-pkg")).await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_live_results_bypass_fallback() {
        // lodash is in the fallback table, but live results take priority.
        let use_case = FetchVulnerabilitiesUseCase::new(
            MockSource::with(vec![vuln("GHSA-live", "live advisory")]),
            MockSource::with(vec![]),
        );
        let result = use_case.fetch(&npm_id("lodash")).await;
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "GHSA-live");
    }
}
