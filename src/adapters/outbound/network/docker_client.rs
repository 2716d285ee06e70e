use async_trait::async_trait;
use serde::Deserialize;

use super::http::{validate_url_component, ResilientClient};
use crate::analysis::domain::{PackageIdentifier, PackageMetadata};
use crate::ports::outbound::MetadataRepository;
use crate::shared::Fetched;

const DOCKER_HUB_URL: &str = "https://hub.docker.com/v2/repositories";

#[derive(Debug, Deserialize)]
struct DockerHubRepository {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    pull_count: Option<u64>,
    #[serde(default)]
    last_updated: Option<String>,
    #[serde(default)]
    date_registered: Option<String>,
}

/// DockerHubClient adapter for fetching container image metadata
///
/// Unqualified image names (no `/`) are official images and are prefixed
/// with the `library/` namespace before querying. The dependency concept
/// does not apply to images, so the dependency map is always empty; Docker
/// Hub's cumulative pull count is folded into the metadata record rather
/// than windowed download stats.
pub struct DockerHubClient {
    http: ResilientClient,
}

impl DockerHubClient {
    pub fn new(http: ResilientClient) -> Self {
        Self { http }
    }
}

/// Qualifies an image name with the official-image namespace when needed.
pub fn qualified_repository(name: &str) -> String {
    if name.contains('/') {
        name.to_string()
    } else {
        format!("library/{}", name)
    }
}

#[async_trait]
impl MetadataRepository for DockerHubClient {
    async fn fetch_metadata(&self, identifier: &PackageIdentifier) -> Fetched<PackageMetadata> {
        if validate_url_component(identifier.name(), "Image name").is_err() {
            return Fetched::Unavailable;
        }

        let repository = qualified_repository(identifier.name());
        let url = format!("{}/{}", DOCKER_HUB_URL, repository);

        self.http
            .get_json::<DockerHubRepository>(&url)
            .await
            .map(|document| assemble_metadata(document, identifier))
    }
}

fn assemble_metadata(
    document: DockerHubRepository,
    identifier: &PackageIdentifier,
) -> PackageMetadata {
    let name = match (document.namespace.as_deref(), document.name.as_deref()) {
        (Some(namespace), Some(name)) if namespace != "library" => {
            format!("{}/{}", namespace, name)
        }
        (_, Some(name)) => name.to_string(),
        _ => identifier.name().to_string(),
    };

    PackageMetadata {
        name,
        description: document.description.filter(|d| !d.is_empty()),
        current_version: Some(identifier.version().to_string()),
        last_publish: document.last_updated.and_then(|raw| raw.parse().ok()),
        created: document.date_registered.and_then(|raw| raw.parse().ok()),
        total_downloads: document.pull_count,
        ..PackageMetadata::named(identifier.name().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::domain::Ecosystem;

    fn docker_id(name: &str, version: &str) -> PackageIdentifier {
        PackageIdentifier::new(name.to_string(), version.to_string(), Ecosystem::Docker).unwrap()
    }

    fn sample_repository() -> DockerHubRepository {
        serde_json::from_str(
            r#"{
                "name": "nginx",
                "namespace": "library",
                "description": "Official build of Nginx.",
                "star_count": 10500,
                "pull_count": 1000000000,
                "last_updated": "2023-06-01T10:00:00.000000Z",
                "date_registered": "2014-06-05T19:14:34.000000Z"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_qualified_repository_prefixes_official_images() {
        assert_eq!(qualified_repository("nginx"), "library/nginx");
        assert_eq!(qualified_repository("grafana/grafana"), "grafana/grafana");
    }

    #[test]
    fn test_assemble_official_image() {
        let metadata = assemble_metadata(sample_repository(), &docker_id("nginx", "1.21"));
        assert_eq!(metadata.name, "nginx");
        assert_eq!(
            metadata.description.as_deref(),
            Some("Official build of Nginx.")
        );
        assert_eq!(metadata.total_downloads, Some(1_000_000_000));
        assert_eq!(metadata.current_version.as_deref(), Some("1.21"));
        assert!(metadata.last_publish.is_some());
        assert!(metadata.created.is_some());
    }

    #[test]
    fn test_dependency_map_always_empty() {
        let metadata = assemble_metadata(sample_repository(), &docker_id("nginx", "latest"));
        assert!(metadata.dependencies.is_empty());
    }

    #[test]
    fn test_namespaced_image_keeps_namespace() {
        let document: DockerHubRepository = serde_json::from_str(
            r#"{ "name": "grafana", "namespace": "grafana", "pull_count": 5 }"#,
        )
        .unwrap();
        let metadata = assemble_metadata(document, &docker_id("grafana/grafana", "latest"));
        assert_eq!(metadata.name, "grafana/grafana");
    }

    #[test]
    fn test_minimal_document_does_not_crash() {
        let document: DockerHubRepository = serde_json::from_str("{}").unwrap();
        let metadata = assemble_metadata(document, &docker_id("mystery", "latest"));
        assert_eq!(metadata.name, "mystery");
        assert!(metadata.total_downloads.is_none());
        assert!(metadata.last_publish.is_none());
    }
}
