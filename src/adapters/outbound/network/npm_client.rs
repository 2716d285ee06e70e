use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde::Deserialize;

use super::http::{validate_url_component, ResilientClient, RetryPolicy};
use crate::analysis::domain::{BundleSize, PackageIdentifier, PackageMetadata};
use crate::ports::outbound::MetadataRepository;
use crate::shared::Fetched;

const REGISTRY_URL: &str = "https://registry.npmjs.org";
const BUNDLE_SIZE_URL: &str = "https://bundlephobia.com/api/size";

/// npm registry packument (the full package document).
#[derive(Debug, Deserialize)]
struct NpmPackument {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    homepage: Option<String>,
    #[serde(default)]
    license: Option<NpmLicense>,
    #[serde(default)]
    author: Option<NpmPerson>,
    #[serde(default)]
    repository: Option<NpmRepository>,
    #[serde(rename = "dist-tags", default)]
    dist_tags: HashMap<String, String>,
    #[serde(default)]
    versions: HashMap<String, NpmVersionRecord>,
    /// Publish timestamps keyed by version, plus "created" and "modified".
    /// Kept as strings so one malformed date does not fail the decode.
    #[serde(default)]
    time: HashMap<String, String>,
    #[serde(default)]
    maintainers: Vec<NpmPerson>,
}

#[derive(Debug, Deserialize)]
struct NpmVersionRecord {
    #[serde(default)]
    license: Option<NpmLicense>,
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
    #[serde(default)]
    deprecated: Option<String>,
    #[serde(default)]
    scripts: BTreeMap<String, String>,
}

/// npm init's placeholder test script, which declares the absence of tests.
const NO_TEST_PLACEHOLDER: &str = "no test specified";

/// The registry publishes licenses both as a bare string and as
/// `{ "type": ..., "url": ... }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NpmLicense {
    Spdx(String),
    Object { r#type: Option<String> },
}

impl NpmLicense {
    fn into_string(self) -> Option<String> {
        match self {
            NpmLicense::Spdx(s) => Some(s),
            NpmLicense::Object { r#type } => r#type,
        }
    }
}

/// Authors and maintainers appear both as strings and as objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NpmPerson {
    Name(String),
    Object { name: Option<String> },
}

impl NpmPerson {
    fn into_name(self) -> Option<String> {
        match self {
            NpmPerson::Name(s) => Some(s),
            NpmPerson::Object { name } => name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct NpmRepository {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BundlephobiaResponse {
    size: u64,
    gzip: u64,
}

/// NpmRegistryClient adapter for fetching npm package metadata
///
/// Queries the public npm registry for the packument and optionally
/// enriches the record with a bundle-size lookup. The enrichment call uses
/// its own one-retry short-timeout policy; its failure leaves
/// `bundle_size` absent without affecting the rest of the record.
pub struct NpmRegistryClient {
    http: ResilientClient,
    enrichment: ResilientClient,
}

impl NpmRegistryClient {
    pub fn new(http: ResilientClient) -> Self {
        let enrichment = http.with_policy(RetryPolicy::enrichment());
        Self { http, enrichment }
    }

    async fn fetch_packument(&self, name: &str) -> Fetched<NpmPackument> {
        if validate_url_component(name, "Package name").is_err() {
            return Fetched::Unavailable;
        }
        let url = format!("{}/{}", REGISTRY_URL, urlencoding::encode(name));
        self.http.get_json(&url).await
    }

    async fn fetch_bundle_size(&self, name: &str, version: &str) -> Option<BundleSize> {
        let url = format!(
            "{}?package={}@{}",
            BUNDLE_SIZE_URL,
            urlencoding::encode(name),
            urlencoding::encode(version)
        );
        self.enrichment
            .get_json::<BundlephobiaResponse>(&url)
            .await
            .available()
            .map(|response| BundleSize {
                size: response.size,
                gzip: response.gzip,
            })
    }
}

#[async_trait]
impl MetadataRepository for NpmRegistryClient {
    async fn fetch_metadata(&self, identifier: &PackageIdentifier) -> Fetched<PackageMetadata> {
        let packument = match self.fetch_packument(identifier.name()).await {
            Fetched::Available(packument) => packument,
            Fetched::Unavailable => return Fetched::Unavailable,
        };

        let mut metadata = assemble_metadata(packument, identifier);

        if let Some(version) = metadata.current_version.clone() {
            metadata.bundle_size = self.fetch_bundle_size(identifier.name(), &version).await;
        }

        Fetched::Available(metadata)
    }
}

/// Builds the metadata record from a packument. Pure, so the resolution
/// rules are testable without a registry.
fn assemble_metadata(packument: NpmPackument, identifier: &PackageIdentifier) -> PackageMetadata {
    let latest_version = packument.dist_tags.get("latest").cloned();

    // Resolve the requested version; "latest" follows the dist-tag.
    let requested = if identifier.is_latest() {
        latest_version.clone()
    } else {
        Some(identifier.version().to_string())
    };

    // If the exact requested version has no sub-record, fall back to the
    // latest version's sub-record for license/dependencies/deprecation.
    let current_version = requested
        .as_deref()
        .filter(|v| packument.versions.contains_key(*v))
        .map(str::to_string)
        .or_else(|| latest_version.clone());

    let version_record = current_version
        .as_deref()
        .and_then(|v| packument.versions.get(v));

    let license = version_record
        .and_then(|record| record.license.as_ref())
        .and_then(|license| match license {
            NpmLicense::Spdx(s) => Some(s.clone()),
            NpmLicense::Object { r#type } => r#type.clone(),
        })
        .or_else(|| packument.license.and_then(NpmLicense::into_string));

    let dependencies = version_record
        .map(|record| record.dependencies.clone())
        .unwrap_or_default();

    let deprecated = version_record
        .map(|record| record.deprecated.is_some())
        .unwrap_or(false);

    let has_tests = version_record.map(|record| {
        record
            .scripts
            .get("test")
            .is_some_and(|script| !script.contains(NO_TEST_PLACEHOLDER))
    });

    let last_publish = current_version
        .as_deref()
        .and_then(|v| packument.time.get(v))
        .or_else(|| packument.time.get("modified"))
        .and_then(|raw| raw.parse().ok());

    let created = packument
        .time
        .get("created")
        .and_then(|raw| raw.parse().ok());

    let maintainer_count = if packument.maintainers.is_empty() {
        None
    } else {
        Some(packument.maintainers.len() as u32)
    };

    PackageMetadata {
        name: packument
            .name
            .unwrap_or_else(|| identifier.name().to_string()),
        description: packument.description,
        license,
        author: packument.author.and_then(NpmPerson::into_name),
        homepage: packument.homepage,
        repository_url: packument
            .repository
            .and_then(|repo| repo.url)
            .map(|url| normalize_repository_url(&url)),
        dependencies,
        current_version,
        latest_version,
        last_publish,
        created,
        deprecated,
        maintainer_count,
        has_tests,
        has_security_policy: None,
        bundle_size: None,
        total_downloads: None,
    }
}

/// Normalizes a repository URL to plain https form.
///
/// Strips the `git+` VCS scheme prefix and the trailing `.git` suffix, and
/// rewrites `git://` to `https://`, so downstream URL matching (GitHub
/// stats) works uniformly regardless of how the publisher formatted the
/// field.
pub fn normalize_repository_url(url: &str) -> String {
    let url = url.strip_prefix("git+").unwrap_or(url);
    let url = url.strip_suffix(".git").unwrap_or(url);
    if let Some(rest) = url.strip_prefix("git://") {
        return format!("https://{}", rest);
    }
    url.to_string()
}
