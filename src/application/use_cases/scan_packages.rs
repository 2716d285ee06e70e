use chrono::{DateTime, Utc};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;

use crate::analysis::domain::{PackageAnalysis, PackageIdentifier};
use crate::analysis::services::calculate_trust_score;
use crate::application::dto::{ScanReport, ScanRequest};
use crate::ports::outbound::{
    DescriptionGenerator, DownloadStatsRepository, MetadataRepository, ProgressReporter,
    RepositoryStatsRepository, VulnerabilityAggregator,
};
use crate::shared::{Fetched, Result};

/// ScanPackagesUseCase - Core use case orchestrating package analysis
///
/// Processes packages sequentially in input order; within one package,
/// repository stats, download stats and vulnerabilities are fetched
/// concurrently once metadata has resolved. Any unexpected failure in one
/// package's pipeline degrades that package to a zeroed analysis and
/// processing continues: the output list always matches the input list in
/// length and order, and `scan` itself never errors.
///
/// # Type Parameters
/// * `M` - MetadataRepository implementation
/// * `R` - RepositoryStatsRepository implementation
/// * `D` - DownloadStatsRepository implementation
/// * `V` - VulnerabilityAggregator implementation
/// * `G` - DescriptionGenerator implementation
/// * `P` - ProgressReporter implementation
pub struct ScanPackagesUseCase<M, R, D, V, G, P> {
    metadata_repository: M,
    repository_stats: R,
    download_stats: D,
    vulnerability_aggregator: V,
    description_generator: G,
    progress_reporter: P,
    /// Fixed scoring clock; `None` stamps each scan at its start time.
    as_of: Option<DateTime<Utc>>,
}

impl<M, R, D, V, G, P> ScanPackagesUseCase<M, R, D, V, G, P>
where
    M: MetadataRepository,
    R: RepositoryStatsRepository,
    D: DownloadStatsRepository,
    V: VulnerabilityAggregator,
    G: DescriptionGenerator,
    P: ProgressReporter,
{
    /// Creates a new ScanPackagesUseCase with injected dependencies
    pub fn new(
        metadata_repository: M,
        repository_stats: R,
        download_stats: D,
        vulnerability_aggregator: V,
        description_generator: G,
        progress_reporter: P,
    ) -> Self {
        Self {
            metadata_repository,
            repository_stats,
            download_stats,
            vulnerability_aggregator,
            description_generator,
            progress_reporter,
            as_of: None,
        }
    }

    /// Pins the scoring clock, making repeated scans byte-identical given
    /// deterministic collaborators.
    pub fn with_as_of(mut self, as_of: DateTime<Utc>) -> Self {
        self.as_of = Some(as_of);
        self
    }

    /// Executes a scan request and wraps the analyses in a report envelope
    pub async fn execute(&self, request: ScanRequest) -> ScanReport {
        ScanReport::new(self.scan(request.identifiers).await)
    }

    /// Analyzes each package and returns analyses in input order
    ///
    /// The sole orchestrator entry point: never errors, individual
    /// failures degrade to zeroed records.
    ///
    /// # Arguments
    /// * `identifiers` - Packages to analyze
    ///
    /// # Returns
    /// One analysis per input package, input order preserved.
    pub async fn scan(&self, identifiers: Vec<PackageIdentifier>) -> Vec<PackageAnalysis> {
        let as_of = self.as_of.unwrap_or_else(Utc::now);
        let total = identifiers.len();

        self.progress_reporter
            .report(&format!("🔍 Analyzing {} package(s)...", total));

        let mut analyses = Vec::with_capacity(total);
        for (index, identifier) in identifiers.into_iter().enumerate() {
            self.progress_reporter.report_progress(
                index + 1,
                total,
                Some(&identifier.to_string()),
            );

            // One package's failure never affects its siblings: panics and
            // errors both collapse to the degraded placeholder.
            let outcome = AssertUnwindSafe(self.analyze_package(&identifier, as_of))
                .catch_unwind()
                .await;

            let analysis = match outcome {
                Ok(Ok(analysis)) => analysis,
                Ok(Err(error)) => {
                    tracing::warn!(package = %identifier, %error, "package analysis failed");
                    self.progress_reporter
                        .report_error(&format!("⚠️  Analysis failed for {}", identifier));
                    PackageAnalysis::degraded(identifier)
                }
                Err(_) => {
                    tracing::error!(package = %identifier, "package analysis panicked");
                    self.progress_reporter
                        .report_error(&format!("⚠️  Analysis failed for {}", identifier));
                    PackageAnalysis::degraded(identifier)
                }
            };

            analyses.push(analysis);
        }

        self.progress_reporter
            .report_completion(&format!("✅ Analyzed {} package(s)", analyses.len()));

        analyses
    }

    /// Runs one package through the pipeline:
    /// metadata, then stats and vulnerabilities concurrently, then scoring.
    async fn analyze_package(
        &self,
        identifier: &PackageIdentifier,
        as_of: DateTime<Utc>,
    ) -> Result<PackageAnalysis> {
        // A registry that cannot describe the package at all degrades the
        // whole package (there is nothing meaningful to score); partially
        // populated metadata stays best-effort.
        let metadata = match self.metadata_repository.fetch_metadata(identifier).await {
            Fetched::Available(metadata) => metadata,
            Fetched::Unavailable => {
                anyhow::bail!("registry metadata unavailable for {}", identifier)
            }
        };

        let repository_url = metadata.repository_url.clone();
        let (repository_stats, download_stats, vulnerabilities) = tokio::join!(
            async {
                match repository_url.as_deref() {
                    Some(url) => self.repository_stats.fetch_stats(url).await,
                    None => None,
                }
            },
            self.download_stats.fetch_downloads(identifier),
            self.vulnerability_aggregator.fetch_vulnerabilities(identifier),
        );
        let download_stats = download_stats.available();

        let trust = calculate_trust_score(
            &vulnerabilities,
            &metadata,
            metadata.dependency_count(),
            repository_stats.as_ref(),
            download_stats.as_ref(),
            as_of,
        );

        let summary = self
            .description_generator
            .describe(identifier, &metadata, repository_stats.as_ref())
            .await;

        Ok(PackageAnalysis {
            identifier: identifier.clone(),
            vulnerabilities,
            trust_score: trust.score,
            breakdown: trust.breakdown,
            metadata,
            repository_stats,
            download_stats,
            summary: Some(summary),
        })
    }
}
