use async_trait::async_trait;

use super::docker_client::DockerHubClient;
use super::http::ResilientClient;
use super::npm_client::NpmRegistryClient;
use super::pypi_client::PyPiRegistryClient;
use crate::analysis::domain::{Ecosystem, PackageIdentifier, PackageMetadata};
use crate::ports::outbound::MetadataRepository;
use crate::shared::Fetched;

/// Routes metadata fetches to the ecosystem's registry client.
///
/// One fetcher per ecosystem sits behind this; the orchestrator only sees
/// the single [`MetadataRepository`] port.
pub struct EcosystemMetadataRouter {
    npm: NpmRegistryClient,
    pypi: PyPiRegistryClient,
    docker: DockerHubClient,
}

impl EcosystemMetadataRouter {
    pub fn new(http: ResilientClient) -> Self {
        Self {
            npm: NpmRegistryClient::new(http.clone()),
            pypi: PyPiRegistryClient::new(http.clone()),
            docker: DockerHubClient::new(http),
        }
    }
}

#[async_trait]
impl MetadataRepository for EcosystemMetadataRouter {
    async fn fetch_metadata(&self, identifier: &PackageIdentifier) -> Fetched<PackageMetadata> {
        match identifier.ecosystem() {
            Ecosystem::Npm => self.npm.fetch_metadata(identifier).await,
            Ecosystem::Python => self.pypi.fetch_metadata(identifier).await,
            Ecosystem::Docker => self.docker.fetch_metadata(identifier).await,
        }
    }
}
