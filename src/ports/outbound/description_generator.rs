use crate::analysis::domain::{PackageIdentifier, PackageMetadata, RepositoryStats};
use async_trait::async_trait;

/// DescriptionGenerator port for the optional natural-language summary
///
/// The generator is an enrichment collaborator: a remote text-generation
/// service may implement it, but every implementation must degrade
/// deterministically (the registry description verbatim, or a constant
/// placeholder) when generation is unavailable or errors. The scan never
/// fails because of this port.
#[async_trait]
pub trait DescriptionGenerator: Send + Sync {
    /// Produces a one-paragraph summary for a package
    ///
    /// # Arguments
    /// * `identifier` - Package name, version and ecosystem
    /// * `metadata` - Registry metadata gathered for the package
    /// * `repository_stats` - Repository activity, when available
    ///
    /// # Returns
    /// A summary string; never an error.
    async fn describe(
        &self,
        identifier: &PackageIdentifier,
        metadata: &PackageMetadata,
        repository_stats: Option<&RepositoryStats>,
    ) -> String;
}
