use async_trait::async_trait;

use crate::analysis::domain::{PackageIdentifier, PackageMetadata, RepositoryStats};
use crate::ports::outbound::DescriptionGenerator;

/// Placeholder used when neither the registry nor the repository offers
/// anything to say about a package.
const PLACEHOLDER: &str = "No description available";

/// TemplateDescriptionGenerator - the deterministic description fallback
///
/// Stands in for a remote text-generation collaborator: composes a short
/// summary from the registry description and repository activity with no
/// I/O and no randomness, so repeated scans describe a package identically.
pub struct TemplateDescriptionGenerator;

impl TemplateDescriptionGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TemplateDescriptionGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DescriptionGenerator for TemplateDescriptionGenerator {
    async fn describe(
        &self,
        identifier: &PackageIdentifier,
        metadata: &PackageMetadata,
        repository_stats: Option<&RepositoryStats>,
    ) -> String {
        let base = metadata
            .description
            .as_deref()
            .filter(|description| !description.is_empty())
            .unwrap_or(PLACEHOLDER);

        match repository_stats {
            Some(stats) if stats.stars > 0 => format!(
                "{} ({} package, {} stars)",
                base,
                identifier.ecosystem(),
                stats.stars
            ),
            _ => format!("{} ({} package)", base, identifier.ecosystem()),
        }
    }
}
