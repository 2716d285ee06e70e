use crate::shared::Result;
use serde::{Deserialize, Serialize};

/// Maximum length for package names (security limit)
const MAX_PACKAGE_NAME_LENGTH: usize = 255;

/// Maximum length for package versions (security limit)
const MAX_VERSION_LENGTH: usize = 100;

/// Version sentinel meaning "resolve to the current published version".
pub const LATEST_VERSION: &str = "latest";

/// The three supported package distribution ecosystems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    Npm,
    Python,
    Docker,
}

impl Ecosystem {
    /// Canonical lowercase name used in reports and URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Ecosystem::Npm => "npm",
            Ecosystem::Python => "python",
            Ecosystem::Docker => "docker",
        }
    }

    /// Ecosystem label understood by the OSV vulnerability database.
    pub fn osv_name(&self) -> &'static str {
        match self {
            Ecosystem::Npm => "npm",
            Ecosystem::Python => "PyPI",
            Ecosystem::Docker => "Docker",
        }
    }

    /// Ecosystem label understood by the GitHub advisory GraphQL API,
    /// or `None` where that source has no coverage (container images).
    pub fn ghsa_name(&self) -> Option<&'static str> {
        match self {
            Ecosystem::Npm => Some("NPM"),
            Ecosystem::Python => Some("PIP"),
            Ecosystem::Docker => None,
        }
    }
}

impl std::fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Ecosystem {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "npm" => Ok(Ecosystem::Npm),
            "python" | "pypi" => Ok(Ecosystem::Python),
            "docker" => Ok(Ecosystem::Docker),
            _ => Err(format!(
                "Invalid ecosystem: {}. Please specify 'npm', 'python' or 'docker'",
                s
            )),
        }
    }
}

/// Identifies one package to analyze: name, version and ecosystem.
///
/// Produced by the manifest parser, consumed by every downstream fetcher.
/// Immutable after construction. The version may be the sentinel
/// [`LATEST_VERSION`], meaning the registry's current version should be used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageIdentifier {
    name: String,
    version: String,
    ecosystem: Ecosystem,
}

impl PackageIdentifier {
    pub fn new(name: String, version: String, ecosystem: Ecosystem) -> Result<Self> {
        if name.is_empty() {
            anyhow::bail!("Package name cannot be empty");
        }

        // Security: Length limit to prevent DoS
        if name.len() > MAX_PACKAGE_NAME_LENGTH {
            anyhow::bail!(
                "Package name is too long ({} bytes). Maximum allowed: {} bytes",
                name.len(),
                MAX_PACKAGE_NAME_LENGTH
            );
        }

        // Security: restrict to the characters the three registries accept.
        // '@' and '/' appear in scoped npm names and docker repositories.
        if !name.chars().all(|c| {
            c.is_alphanumeric() || c == '-' || c == '_' || c == '.' || c == '@' || c == '/'
        }) {
            anyhow::bail!(
                "Package name contains invalid characters: {}. Only alphanumeric, hyphens, underscores, dots, '@' and '/' are allowed.",
                name
            );
        }

        let version = if version.is_empty() {
            LATEST_VERSION.to_string()
        } else {
            version
        };

        if version.len() > MAX_VERSION_LENGTH {
            anyhow::bail!(
                "Package version is too long ({} bytes). Maximum allowed: {} bytes",
                version.len(),
                MAX_VERSION_LENGTH
            );
        }

        Ok(Self {
            name,
            version,
            ecosystem,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn ecosystem(&self) -> Ecosystem {
        self.ecosystem
    }

    /// True when the version is the "resolve to current" sentinel.
    pub fn is_latest(&self) -> bool {
        self.version == LATEST_VERSION
    }
}

impl std::fmt::Display for PackageIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{} ({})", self.name, self.version, self.ecosystem)
    }
}
