use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bundle size of an npm package as reported by the size-analysis service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleSize {
    /// Minified size in bytes.
    pub size: u64,
    /// Minified and gzipped size in bytes.
    pub gzip: u64,
}

/// Registry-sourced descriptive fields for one package.
///
/// Every field except the name is best-effort: which fields are populated
/// depends on the ecosystem and on which upstream calls succeeded. Absence
/// is a neutral signal; downstream consumers (the trust calculator, the
/// formatters) treat `None` as "no information", never as an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageMetadata {
    pub name: String,
    pub description: Option<String>,
    pub license: Option<String>,
    pub author: Option<String>,
    pub homepage: Option<String>,
    /// Normalized repository URL (VCS scheme prefix and `.git` suffix
    /// stripped) so GitHub stats matching works regardless of source
    /// formatting.
    pub repository_url: Option<String>,
    /// Direct runtime dependencies: name -> version requirement.
    /// Always empty for docker images (the concept does not apply).
    pub dependencies: BTreeMap<String, String>,
    /// The version this scan resolved to.
    pub current_version: Option<String>,
    /// The registry's newest published version.
    pub latest_version: Option<String>,
    /// Timestamp of the most recent publish to the registry.
    pub last_publish: Option<DateTime<Utc>>,
    /// Timestamp of the first publish, where the registry exposes it.
    pub created: Option<DateTime<Utc>>,
    pub deprecated: bool,
    pub maintainer_count: Option<u32>,
    /// Whether the package declares a test entry point. Only the npm
    /// registry exposes this; absent elsewhere.
    pub has_tests: Option<bool>,
    /// Whether a security policy is published for the package. No
    /// registry endpoint exposes this; the slot exists for collaborators
    /// that re-score with richer data.
    pub has_security_policy: Option<bool>,
    /// npm only, from the optional bundle-size enrichment call.
    pub bundle_size: Option<BundleSize>,
    /// Cumulative download / pull count where the registry publishes a
    /// single total instead of windowed stats (Docker Hub pull count).
    pub total_downloads: Option<u64>,
}

impl PackageMetadata {
    /// A metadata record carrying nothing but the package name, used when
    /// every registry call failed.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn dependency_count(&self) -> usize {
        self.dependencies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_is_otherwise_empty() {
        let meta = PackageMetadata::named("left-pad");
        assert_eq!(meta.name, "left-pad");
        assert!(meta.description.is_none());
        assert!(meta.dependencies.is_empty());
        assert!(!meta.deprecated);
        assert_eq!(meta.dependency_count(), 0);
    }

    #[test]
    fn test_dependency_count() {
        let mut meta = PackageMetadata::named("express");
        meta.dependencies
            .insert("accepts".to_string(), "~1.3.8".to_string());
        meta.dependencies
            .insert("body-parser".to_string(), "1.20.1".to_string());
        assert_eq!(meta.dependency_count(), 2);
    }
}
