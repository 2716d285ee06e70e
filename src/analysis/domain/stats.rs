use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Activity snapshot of a source repository.
///
/// Derived once per package per scan and never cached across scans. The
/// contributor and pull-request counts come from pagination metadata and
/// undercount when the hosting API omits the last-page header; see
/// `GitHubStatsClient` for the documented approximation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositoryStats {
    pub stars: u64,
    pub forks: u64,
    pub watchers: u64,
    pub open_issues: u64,
    pub contributors: u64,
    pub pull_requests: u64,
    pub last_commit: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub default_branch: Option<String>,
    pub language: Option<String>,
    pub topics: Vec<String>,
}

/// Recent download counts per window.
///
/// All fields are optional: `None` means the source did not provide that
/// window, which is distinct from an explicit zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadStats {
    pub last_day: Option<u64>,
    pub last_week: Option<u64>,
    pub last_month: Option<u64>,
    pub total: Option<u64>,
}

impl DownloadStats {
    /// True when no window carries a value at all.
    pub fn is_empty(&self) -> bool {
        self.last_day.is_none()
            && self.last_week.is_none()
            && self.last_month.is_none()
            && self.total.is_none()
    }
}
