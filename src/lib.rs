//! pkgtrust - Package trust scoring for npm, PyPI and Docker Hub
//!
//! This library aggregates metadata and known-vulnerability records for
//! software packages from multiple registries and advisory databases, then
//! derives a composite 0-100 "trust score" per package, following hexagonal
//! architecture and Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`analysis`): Entities and pure services (trust
//!   calculator, advisory merge, offline fallback table)
//! - **Application Layer** (`application`): Use cases and DTOs
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Manifest** (`manifest`): Package manifest parsing
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use pkgtrust::prelude::*;
//!
//! # async fn run() -> Result<()> {
//! // Create adapters around one shared HTTP client
//! let http = ResilientClient::new()?;
//! let metadata = EcosystemMetadataRouter::new(http.clone());
//! let repo_stats = GitHubStatsClient::new(http.clone(), None);
//! let downloads = RegistryDownloadsClient::new(http.clone());
//! let advisories = FetchVulnerabilitiesUseCase::new(
//!     GhsaAdvisoryClient::new(http.clone(), None),
//!     OsvAdvisoryClient::new(http),
//! );
//!
//! // Create the orchestrator
//! let use_case = ScanPackagesUseCase::new(
//!     metadata,
//!     repo_stats,
//!     downloads,
//!     advisories,
//!     TemplateDescriptionGenerator::new(),
//!     StderrProgressReporter::new(),
//! );
//!
//! // Parse a manifest and scan
//! let identifiers = manifest::parse("FROM nginx:1.21", ManifestFormat::Dockerfile)?;
//! let analyses = use_case.scan(identifiers).await;
//! println!("{} package(s) analyzed", analyses.len());
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod analysis;
pub mod application;
pub mod cli;
pub mod config;
pub mod manifest;
pub mod ports;
pub mod shared;

// The pure scoring entry point, re-exported at the crate root so
// collaborators holding partial data can re-score without re-fetching.
pub use analysis::services::calculate_trust_score;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemReader, FileSystemWriter, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::{JsonFormatter, TableFormatter};
    pub use crate::adapters::outbound::network::{
        DockerHubClient, EcosystemMetadataRouter, GhsaAdvisoryClient, GitHubStatsClient,
        NpmRegistryClient, OsvAdvisoryClient, PyPiRegistryClient, RegistryDownloadsClient,
        ResilientClient, RetryPolicy,
    };
    pub use crate::adapters::outbound::text::TemplateDescriptionGenerator;
    pub use crate::analysis::domain::{
        DownloadStats, Ecosystem, PackageAnalysis, PackageIdentifier, PackageMetadata,
        RepositoryStats, Severity, TrustScore, TrustScoreBreakdown, Vulnerability,
    };
    pub use crate::analysis::services::calculate_trust_score;
    pub use crate::application::dto::{ScanReport, ScanRequest};
    pub use crate::application::use_cases::{FetchVulnerabilitiesUseCase, ScanPackagesUseCase};
    pub use crate::manifest::{self, ManifestFormat};
    pub use crate::ports::outbound::{
        AdvisorySource, DescriptionGenerator, DownloadStatsRepository, MetadataRepository,
        OutputPresenter, ProgressReporter, ReportFormatter, RepositoryStatsRepository,
        VulnerabilityAggregator,
    };
    pub use crate::shared::{Fetched, Result};
}
