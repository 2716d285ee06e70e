//! Manifest parsing for the three supported ecosystems.
//!
//! Extracts `(name, version, ecosystem)` triples from `package.json`,
//! `requirements.txt` and `Dockerfile` inputs. This is the one component
//! whose failure surfaces as a typed error to the caller: a structurally
//! invalid package.json is a [`TrustError::ManifestParse`], while the
//! line-oriented formats tolerate and skip lines they cannot interpret.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::analysis::domain::{Ecosystem, PackageIdentifier, LATEST_VERSION};
use crate::shared::{Result, TrustError};

/// The three supported textual manifest formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    PackageJson,
    RequirementsTxt,
    Dockerfile,
}

impl ManifestFormat {
    /// Detects the format from a file name.
    pub fn detect(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        match file_name {
            "package.json" => Some(ManifestFormat::PackageJson),
            "requirements.txt" => Some(ManifestFormat::RequirementsTxt),
            name if name == "Dockerfile" || name.starts_with("Dockerfile.") => {
                Some(ManifestFormat::Dockerfile)
            }
            name if name.ends_with(".dockerfile") => Some(ManifestFormat::Dockerfile),
            _ => None,
        }
    }

    pub fn ecosystem(&self) -> Ecosystem {
        match self {
            ManifestFormat::PackageJson => Ecosystem::Npm,
            ManifestFormat::RequirementsTxt => Ecosystem::Python,
            ManifestFormat::Dockerfile => Ecosystem::Docker,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ManifestFormat::PackageJson => "npm",
            ManifestFormat::RequirementsTxt => "python",
            ManifestFormat::Dockerfile => "docker",
        }
    }
}

impl std::str::FromStr for ManifestFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "npm" | "package.json" => Ok(ManifestFormat::PackageJson),
            "python" | "requirements.txt" => Ok(ManifestFormat::RequirementsTxt),
            "docker" | "dockerfile" => Ok(ManifestFormat::Dockerfile),
            _ => Err(format!(
                "Invalid manifest format: {}. Please specify 'npm', 'python' or 'docker'",
                s
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PackageJsonManifest {
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
    #[serde(rename = "devDependencies", default)]
    dev_dependencies: BTreeMap<String, String>,
}

/// Parses a manifest into package identifiers.
///
/// # Arguments
/// * `raw` - The manifest file contents
/// * `format` - Which of the three formats to interpret the text as
///
/// # Errors
/// Returns [`TrustError::ManifestParse`] when a package.json is not valid
/// JSON. The line-oriented formats never error; uninterpretable lines are
/// skipped.
pub fn parse(raw: &str, format: ManifestFormat) -> Result<Vec<PackageIdentifier>> {
    match format {
        ManifestFormat::PackageJson => parse_package_json(raw),
        ManifestFormat::RequirementsTxt => Ok(parse_requirements(raw)),
        ManifestFormat::Dockerfile => Ok(parse_dockerfile(raw)),
    }
}

fn parse_package_json(raw: &str) -> Result<Vec<PackageIdentifier>> {
    let manifest: PackageJsonManifest =
        serde_json::from_str(raw).map_err(|e| TrustError::ManifestParse {
            path: Path::new("package.json").to_path_buf(),
            format: "npm".to_string(),
            details: e.to_string(),
        })?;

    let mut identifiers = Vec::new();
    for (name, requirement) in manifest
        .dependencies
        .into_iter()
        .chain(manifest.dev_dependencies)
    {
        let version = clean_npm_requirement(&requirement);
        if let Ok(identifier) = PackageIdentifier::new(name, version, Ecosystem::Npm) {
            if !identifiers.contains(&identifier) {
                identifiers.push(identifier);
            }
        }
    }

    Ok(identifiers)
}

/// Reduces an npm version requirement to a concrete version where possible.
///
/// `^4.18.2` and `~4.18.2` pin the base version; ranges, wildcards, tags
/// and URL requirements fall back to the "latest" sentinel.
fn clean_npm_requirement(requirement: &str) -> String {
    let trimmed = requirement.trim();

    if trimmed.starts_with("http")
        || trimmed.starts_with("git")
        || trimmed.starts_with("file:")
        || trimmed.starts_with("workspace:")
        || trimmed.starts_with("npm:")
    {
        return LATEST_VERSION.to_string();
    }

    let cleaned = trimmed.trim_start_matches(['^', '~', '>', '<', '=', 'v', ' ']);

    let is_concrete = !cleaned.is_empty()
        && cleaned
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c == '-' || c.is_ascii_alphanumeric())
        && cleaned.chars().next().is_some_and(|c| c.is_ascii_digit());

    if is_concrete {
        cleaned.to_string()
    } else {
        LATEST_VERSION.to_string()
    }
}

fn parse_requirements(raw: &str) -> Vec<PackageIdentifier> {
    let mut identifiers = Vec::new();

    for line in raw.lines() {
        // Strip inline comments, then whole-line noise.
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() || line.starts_with('-') {
            continue;
        }

        // Environment markers are irrelevant to identity.
        let spec = line.split(';').next().unwrap_or("").trim();

        let (name_part, version) = if let Some((name, version)) = spec.split_once("==") {
            (name.trim(), version.trim().to_string())
        } else {
            // Non-exact specifiers (>=, ~=, !=, <) do not pin a version.
            let name_end = spec
                .find(['>', '<', '~', '!', '='])
                .unwrap_or(spec.len());
            (spec[..name_end].trim(), LATEST_VERSION.to_string())
        };

        // Drop extras: "requests[socks]" identifies requests.
        let name = name_part.split('[').next().unwrap_or("").trim();
        if name.is_empty() {
            continue;
        }

        if let Ok(identifier) =
            PackageIdentifier::new(name.to_string(), version, Ecosystem::Python)
        {
            if !identifiers.contains(&identifier) {
                identifiers.push(identifier);
            }
        }
    }

    identifiers
}

fn parse_dockerfile(raw: &str) -> Vec<PackageIdentifier> {
    let mut identifiers = Vec::new();
    let mut stage_aliases: Vec<String> = Vec::new();

    for line in raw.lines() {
        let line = line.trim();
        if !line.to_uppercase().starts_with("FROM ") {
            continue;
        }

        let mut tokens = line
            .split_whitespace()
            .skip(1)
            .filter(|token| !token.starts_with("--"));

        let image = match tokens.next() {
            Some(image) => image,
            None => continue,
        };

        // Track stage aliases so later FROMs referencing a build stage are
        // not treated as registry images.
        let mut rest = tokens;
        if rest.next().is_some_and(|token| token.eq_ignore_ascii_case("as")) {
            if let Some(alias) = rest.next() {
                stage_aliases.push(alias.to_lowercase());
            }
        }

        if image.eq_ignore_ascii_case("scratch") || stage_aliases.contains(&image.to_lowercase())
        {
            continue;
        }

        // Split off a digest, then the tag.
        let image = image.split('@').next().unwrap_or("");
        let (name, version) = match image.rsplit_once(':') {
            // A colon before the last '/' is a registry port, not a tag.
            Some((name, tag)) if !tag.contains('/') => (name, tag.to_string()),
            _ => (image, LATEST_VERSION.to_string()),
        };

        if name.is_empty() {
            continue;
        }

        if let Ok(identifier) =
            PackageIdentifier::new(name.to_string(), version, Ecosystem::Docker)
        {
            if !identifiers.contains(&identifier) {
                identifiers.push(identifier);
            }
        }
    }

    identifiers
}
