use std::collections::HashMap;

use async_trait::async_trait;
use pkgtrust::prelude::*;

/// Mock AdvisorySource for testing
///
/// Configured per package name; unknown packages answer with an empty list.
pub struct MockAdvisorySource {
    advisories: HashMap<String, Vec<Vulnerability>>,
    covers_docker: bool,
    unavailable: bool,
}

impl MockAdvisorySource {
    pub fn new() -> Self {
        Self {
            advisories: HashMap::new(),
            covers_docker: true,
            unavailable: false,
        }
    }

    pub fn with_advisories(mut self, package: &str, advisories: Vec<Vulnerability>) -> Self {
        self.advisories.insert(package.to_string(), advisories);
        self
    }

    /// Mirrors the advisory-graph source, which has no container coverage.
    pub fn without_docker_coverage(mut self) -> Self {
        self.covers_docker = false;
        self
    }

    pub fn unavailable() -> Self {
        Self {
            advisories: HashMap::new(),
            covers_docker: true,
            unavailable: true,
        }
    }
}

impl Default for MockAdvisorySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AdvisorySource for MockAdvisorySource {
    fn covers(&self, ecosystem: Ecosystem) -> bool {
        self.covers_docker || ecosystem != Ecosystem::Docker
    }

    async fn fetch_advisories(
        &self,
        identifier: &PackageIdentifier,
    ) -> Fetched<Vec<Vulnerability>> {
        if self.unavailable {
            return Fetched::Unavailable;
        }
        Fetched::Available(
            self.advisories
                .get(identifier.name())
                .cloned()
                .unwrap_or_default(),
        )
    }
}
