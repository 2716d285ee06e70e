use crate::analysis::domain::{DownloadStats, PackageIdentifier};
use crate::shared::Fetched;
use async_trait::async_trait;

/// DownloadStatsRepository port for fetching recent download counts
///
/// # Contract
/// Implementations never error. Ecosystems without windowed download stats
/// (container images, whose cumulative pull count lives in metadata)
/// return `Unavailable`. Within an available record, `None` windows mean
/// "the source did not provide this window", distinct from zero.
#[async_trait]
pub trait DownloadStatsRepository: Send + Sync {
    /// Fetches download counts for a package
    ///
    /// # Arguments
    /// * `identifier` - Package name, version and ecosystem
    ///
    /// # Returns
    /// Download windows, or `Unavailable`.
    async fn fetch_downloads(&self, identifier: &PackageIdentifier) -> Fetched<DownloadStats>;
}
