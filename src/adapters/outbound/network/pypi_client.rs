use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::http::{validate_url_component, ResilientClient};
use super::npm_client::normalize_repository_url;
use crate::analysis::domain::{PackageIdentifier, PackageMetadata};
use crate::ports::outbound::MetadataRepository;
use crate::shared::Fetched;

const PYPI_URL: &str = "https://pypi.org/pypi";

#[derive(Debug, Deserialize)]
struct PyPiDocument {
    info: PyPiInfo,
    #[serde(default)]
    urls: Vec<PyPiFile>,
    #[serde(default)]
    releases: HashMap<String, Vec<PyPiFile>>,
}

#[derive(Debug, Deserialize)]
struct PyPiInfo {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    license: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    maintainer: Option<String>,
    #[serde(default)]
    home_page: Option<String>,
    #[serde(default)]
    project_urls: Option<HashMap<String, Option<String>>>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    requires_dist: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct PyPiFile {
    #[serde(default)]
    upload_time_iso_8601: Option<String>,
}

/// PyPiRegistryClient adapter for fetching PyPI package metadata
///
/// Uses the project JSON endpoint, which publishes a single "info" version:
/// the current version always equals the latest version here. That is a
/// known asymmetry versus the npm fetcher and is deliberately preserved
/// (the endpoint cannot describe arbitrary historical versions).
pub struct PyPiRegistryClient {
    http: ResilientClient,
}

impl PyPiRegistryClient {
    pub fn new(http: ResilientClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl MetadataRepository for PyPiRegistryClient {
    async fn fetch_metadata(&self, identifier: &PackageIdentifier) -> Fetched<PackageMetadata> {
        if validate_url_component(identifier.name(), "Package name").is_err() {
            return Fetched::Unavailable;
        }

        let normalized = identifier.name().to_lowercase().replace('_', "-");
        let url = format!("{}/{}/json", PYPI_URL, urlencoding::encode(&normalized));

        self.http
            .get_json::<PyPiDocument>(&url)
            .await
            .map(|document| assemble_metadata(document, identifier))
    }
}

fn assemble_metadata(document: PyPiDocument, identifier: &PackageIdentifier) -> PackageMetadata {
    let info = document.info;

    // One info version only: current and latest are the same value.
    let version = info.version.clone();

    let dependencies = info
        .requires_dist
        .as_deref()
        .map(parse_requires_dist)
        .unwrap_or_default();

    let repository_url = info
        .project_urls
        .as_ref()
        .and_then(find_repository_url)
        .map(|url| normalize_repository_url(&url));

    let last_publish = document.urls.iter().filter_map(parse_upload_time).max();

    // Earliest upload across all releases approximates the first publish.
    let created = document
        .releases
        .values()
        .flatten()
        .filter_map(parse_upload_time)
        .min();

    let author = info.author.filter(|author| !author.is_empty());
    let maintainer = info.maintainer.filter(|maintainer| !maintainer.is_empty());
    let maintainer_count = {
        let mut names: Vec<&str> = Vec::new();
        if let Some(a) = author.as_deref() {
            names.push(a);
        }
        if let Some(m) = maintainer.as_deref() {
            if !names.contains(&m) {
                names.push(m);
            }
        }
        if names.is_empty() {
            None
        } else {
            Some(names.len() as u32)
        }
    };

    PackageMetadata {
        name: info.name.unwrap_or_else(|| identifier.name().to_string()),
        description: info.summary.filter(|summary| !summary.is_empty()),
        license: info.license.filter(|license| !license.is_empty()),
        author,
        homepage: info.home_page.filter(|homepage| !homepage.is_empty()),
        repository_url,
        dependencies,
        current_version: version.clone(),
        latest_version: version,
        last_publish,
        created,
        deprecated: false,
        maintainer_count,
        has_tests: None,
        has_security_policy: None,
        bundle_size: None,
        total_downloads: None,
    }
}

fn parse_upload_time(file: &PyPiFile) -> Option<DateTime<Utc>> {
    file.upload_time_iso_8601
        .as_deref()
        .and_then(|raw| raw.parse().ok())
}

/// Extracts a dependency map from PEP 508 requirement strings.
///
/// Entries guarded by an `extra ==` marker are optional extras, not runtime
/// dependencies, and are skipped.
fn parse_requires_dist(requires: &[String]) -> BTreeMap<String, String> {
    let mut dependencies = BTreeMap::new();

    for requirement in requires {
        if requirement.contains("extra ==") {
            continue;
        }
        let spec = requirement.split(';').next().unwrap_or("").trim();
        if spec.is_empty() {
            continue;
        }

        let name_end = spec
            .find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_' || c == '.'))
            .unwrap_or(spec.len());
        let (name, constraint) = spec.split_at(name_end);
        if name.is_empty() {
            continue;
        }

        let constraint = constraint
            .trim()
            .trim_start_matches('(')
            .trim_end_matches(')')
            .trim();
        let constraint = if constraint.is_empty() {
            "*".to_string()
        } else {
            constraint.to_string()
        };

        dependencies.entry(name.to_string()).or_insert(constraint);
    }

    dependencies
}

/// Looks for a source-repository link among the project URLs.
fn find_repository_url(project_urls: &HashMap<String, Option<String>>) -> Option<String> {
    const PREFERRED_KEYS: [&str; 5] = ["Source", "Source Code", "Repository", "GitHub", "Homepage"];

    for key in PREFERRED_KEYS {
        if let Some(Some(url)) = project_urls.get(key) {
            if url.contains("github.com") {
                return Some(url.clone());
            }
        }
    }

    project_urls
        .values()
        .flatten()
        .find(|url| url.contains("github.com"))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::domain::Ecosystem;

    fn pypi_id(name: &str, version: &str) -> PackageIdentifier {
        PackageIdentifier::new(name.to_string(), version.to_string(), Ecosystem::Python).unwrap()
    }

    fn sample_document() -> PyPiDocument {
        serde_json::from_str(
            r#"{
                "info": {
                    "name": "requests",
                    "summary": "Python HTTP for Humans.",
                    "license": "Apache 2.0",
                    "author": "Kenneth Reitz",
                    "maintainer": "",
                    "home_page": "https://requests.readthedocs.io",
                    "project_urls": {
                        "Source": "https://github.com/psf/requests",
                        "Documentation": "https://requests.readthedocs.io"
                    },
                    "version": "2.31.0",
                    "requires_dist": [
                        "charset-normalizer (<4,>=2)",
                        "idna (<4,>=2.5)",
                        "urllib3 (<3,>=1.21.1)",
                        "PySocks (!=1.5.7,>=1.5.6) ; extra == 'socks'"
                    ]
                },
                "urls": [
                    { "upload_time_iso_8601": "2023-05-22T15:12:44.175000Z" }
                ],
                "releases": {
                    "0.2.0": [ { "upload_time_iso_8601": "2011-02-14T00:00:00Z" } ],
                    "2.31.0": [ { "upload_time_iso_8601": "2023-05-22T15:12:44.175000Z" } ]
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_current_equals_latest() {
        // The PyPI JSON endpoint publishes one info version; both fields
        // carry it. A requested historical version does not change that.
        let metadata = assemble_metadata(sample_document(), &pypi_id("requests", "2.19.0"));
        assert_eq!(metadata.current_version.as_deref(), Some("2.31.0"));
        assert_eq!(metadata.latest_version.as_deref(), Some("2.31.0"));
        assert_eq!(metadata.current_version, metadata.latest_version);
    }

    #[test]
    fn test_extras_excluded_from_dependencies() {
        let metadata = assemble_metadata(sample_document(), &pypi_id("requests", "latest"));
        assert_eq!(metadata.dependencies.len(), 3);
        assert!(!metadata.dependencies.contains_key("PySocks"));
        assert_eq!(
            metadata.dependencies.get("urllib3").map(String::as_str),
            Some("<3,>=1.21.1")
        );
    }

    #[test]
    fn test_repository_url_from_project_urls() {
        let metadata = assemble_metadata(sample_document(), &pypi_id("requests", "latest"));
        assert_eq!(
            metadata.repository_url.as_deref(),
            Some("https://github.com/psf/requests")
        );
    }

    #[test]
    fn test_publish_dates() {
        let metadata = assemble_metadata(sample_document(), &pypi_id("requests", "latest"));
        assert!(metadata.last_publish.is_some());
        assert!(metadata.created.is_some());
        assert!(metadata.created < metadata.last_publish);
    }

    #[test]
    fn test_maintainer_count_skips_empty_maintainer() {
        let metadata = assemble_metadata(sample_document(), &pypi_id("requests", "latest"));
        assert_eq!(metadata.maintainer_count, Some(1));
    }

    #[test]
    fn test_minimal_document_does_not_crash() {
        let document: PyPiDocument = serde_json::from_str(r#"{ "info": {} }"#).unwrap();
        let metadata = assemble_metadata(document, &pypi_id("ghost", "latest"));
        assert_eq!(metadata.name, "ghost");
        assert!(metadata.current_version.is_none());
        assert!(metadata.dependencies.is_empty());
        assert!(metadata.last_publish.is_none());
        assert!(metadata.maintainer_count.is_none());
    }

    #[test]
    fn test_parse_requires_dist_without_parentheses() {
        let deps = parse_requires_dist(&["certifi>=2017.4.17".to_string()]);
        assert_eq!(deps.get("certifi").map(String::as_str), Some(">=2017.4.17"));
    }

    #[test]
    fn test_parse_requires_dist_bare_name() {
        let deps = parse_requires_dist(&["six".to_string()]);
        assert_eq!(deps.get("six").map(String::as_str), Some("*"));
    }
}
