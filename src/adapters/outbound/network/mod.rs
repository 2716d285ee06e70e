/// Network adapters for upstream registries, advisory databases and
/// statistics services. Every adapter funnels its transport through
/// [`http::ResilientClient`] and degrades to absent values on failure.
pub mod docker_client;
pub mod downloads_client;
pub mod ghsa_client;
pub mod github_client;
pub mod http;
pub mod npm_client;
pub mod osv_client;
pub mod pypi_client;
pub mod registry_router;

pub use docker_client::DockerHubClient;
pub use downloads_client::RegistryDownloadsClient;
pub use ghsa_client::GhsaAdvisoryClient;
pub use github_client::GitHubStatsClient;
pub use http::{ResilientClient, RetryPolicy};
pub use npm_client::NpmRegistryClient;
pub use osv_client::OsvAdvisoryClient;
pub use pypi_client::PyPiRegistryClient;
pub use registry_router::EcosystemMetadataRouter;
