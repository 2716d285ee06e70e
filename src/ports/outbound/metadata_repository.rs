use crate::analysis::domain::{PackageIdentifier, PackageMetadata};
use crate::shared::Fetched;
use async_trait::async_trait;

/// MetadataRepository port for fetching registry metadata
///
/// This port abstracts the ecosystem's canonical registry (npm registry,
/// PyPI JSON API, Docker Hub) used to retrieve descriptive package fields.
///
/// # Contract
/// Implementations never error: transport failures return
/// `Fetched::Unavailable`, and partially failing field lookups leave the
/// affected fields absent. The caller treats `Unavailable` as a metadata
/// record carrying only the package name.
///
/// # Async Support
/// All methods are async; implementations must be `Send + Sync` to support
/// concurrent access.
#[async_trait]
pub trait MetadataRepository: Send + Sync {
    /// Fetches best-effort metadata for a package version
    ///
    /// # Arguments
    /// * `identifier` - Package name, version and ecosystem
    ///
    /// # Returns
    /// The metadata record, or `Unavailable` when the registry could not be
    /// reached at all.
    async fn fetch_metadata(&self, identifier: &PackageIdentifier) -> Fetched<PackageMetadata>;
}
