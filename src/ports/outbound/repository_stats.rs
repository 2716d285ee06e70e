use crate::analysis::domain::RepositoryStats;
use async_trait::async_trait;

/// RepositoryStatsRepository port for fetching source-repository activity
///
/// # Contract
/// `None` is a normal outcome, not an error: it covers URLs that do not
/// match a supported hosting provider as well as unreachable hosts. Each
/// auxiliary count inside the snapshot (contributors, pull requests) is
/// independently best-effort; a failed count is zero without failing the
/// whole snapshot.
#[async_trait]
pub trait RepositoryStatsRepository: Send + Sync {
    /// Fetches an activity snapshot for a repository URL
    ///
    /// # Arguments
    /// * `repository_url` - Repository URL in arbitrary source formatting
    ///
    /// # Returns
    /// The stats snapshot, or `None` when no stats are available.
    async fn fetch_stats(&self, repository_url: &str) -> Option<RepositoryStats>;
}
