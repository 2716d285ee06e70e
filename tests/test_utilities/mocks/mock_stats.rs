use std::collections::HashMap;

use async_trait::async_trait;
use pkgtrust::prelude::*;

/// Mock RepositoryStatsRepository for testing
///
/// Keyed by repository URL; unknown URLs yield `None` like a URL that does
/// not match any supported host.
pub struct MockRepositoryStats {
    stats: HashMap<String, RepositoryStats>,
}

impl MockRepositoryStats {
    pub fn new() -> Self {
        Self {
            stats: HashMap::new(),
        }
    }

    pub fn with_stats(mut self, repository_url: &str, stats: RepositoryStats) -> Self {
        self.stats.insert(repository_url.to_string(), stats);
        self
    }
}

impl Default for MockRepositoryStats {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RepositoryStatsRepository for MockRepositoryStats {
    async fn fetch_stats(&self, repository_url: &str) -> Option<RepositoryStats> {
        self.stats.get(repository_url).cloned()
    }
}

/// Mock DownloadStatsRepository for testing
pub struct MockDownloadStats {
    stats: HashMap<String, DownloadStats>,
}

impl MockDownloadStats {
    pub fn new() -> Self {
        Self {
            stats: HashMap::new(),
        }
    }

    pub fn with_stats(mut self, package: &str, stats: DownloadStats) -> Self {
        self.stats.insert(package.to_string(), stats);
        self
    }
}

impl Default for MockDownloadStats {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DownloadStatsRepository for MockDownloadStats {
    async fn fetch_downloads(&self, identifier: &PackageIdentifier) -> Fetched<DownloadStats> {
        match self.stats.get(identifier.name()) {
            Some(stats) => Fetched::Available(*stats),
            None => Fetched::Unavailable,
        }
    }
}

/// DownloadStatsRepository that panics for one configured package,
/// exercising the orchestrator's per-package failure isolation.
pub struct PanickingDownloadStats {
    panic_for: String,
}

impl PanickingDownloadStats {
    pub fn new(panic_for: &str) -> Self {
        Self {
            panic_for: panic_for.to_string(),
        }
    }
}

#[async_trait]
impl DownloadStatsRepository for PanickingDownloadStats {
    async fn fetch_downloads(&self, identifier: &PackageIdentifier) -> Fetched<DownloadStats> {
        if identifier.name() == self.panic_for {
            panic!("injected failure for {}", identifier);
        }
        Fetched::Unavailable
    }
}
