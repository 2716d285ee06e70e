use crate::analysis::domain::{Ecosystem, PackageIdentifier, Vulnerability};
use crate::shared::Fetched;
use async_trait::async_trait;

/// AdvisorySource port for querying one vulnerability database
///
/// Two independent sources are aggregated per scan (see
/// `FetchVulnerabilitiesUseCase`): an advisory-graph query and a
/// point-query vulnerability database. Each source normalizes its own
/// severity representation into the domain [`Severity`] before returning.
///
/// # Contract
/// Implementations never error. `Fetched::Available(vec![])` means the
/// source answered with no advisories; `Fetched::Unavailable` means the
/// source could not be queried (unreachable, missing credential, decode
/// failure). Callers treat both as "nothing from this source".
///
/// [`Severity`]: crate::analysis::domain::Severity
#[async_trait]
pub trait AdvisorySource: Send + Sync {
    /// True when this source has coverage for the ecosystem.
    ///
    /// Sources without coverage (or without a required credential) are
    /// skipped, not treated as failed.
    fn covers(&self, ecosystem: Ecosystem) -> bool;

    /// Queries advisories for an exact package
    ///
    /// # Arguments
    /// * `identifier` - Package name, version and ecosystem
    ///
    /// # Returns
    /// Normalized advisories in source order, or `Unavailable`.
    async fn fetch_advisories(&self, identifier: &PackageIdentifier)
        -> Fetched<Vec<Vulnerability>>;
}
