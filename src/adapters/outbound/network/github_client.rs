use async_trait::async_trait;
use serde::Deserialize;

use super::http::{decode_json, ResilientClient};
use crate::analysis::domain::RepositoryStats;
use crate::ports::outbound::RepositoryStatsRepository;
use crate::shared::Fetched;

const GITHUB_API_URL: &str = "https://api.github.com";

#[derive(Debug, Deserialize)]
struct GitHubRepo {
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    subscribers_count: u64,
    #[serde(default)]
    open_issues_count: u64,
    #[serde(default)]
    default_branch: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    pushed_at: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

/// GitHubStatsClient adapter for fetching repository activity snapshots
///
/// The repository URL may be in arbitrary source formatting; anything that
/// does not match a github.com owner/repo shape yields `None`, which is a
/// normal "no stats available" outcome. An API token is optional and only
/// raises the rate limit.
pub struct GitHubStatsClient {
    http: ResilientClient,
    token: Option<String>,
}

impl GitHubStatsClient {
    pub fn new(http: ResilientClient, token: Option<String>) -> Self {
        Self { http, token }
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .http
            .inner()
            .get(url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn fetch_repo(&self, owner: &str, repo: &str) -> Fetched<GitHubRepo> {
        let url = format!("{}/repos/{}/{}", GITHUB_API_URL, owner, repo);
        let response = self.http.execute_with_retry(|| self.request(&url)).await;
        decode_json(response).await
    }

    /// Counts a paginated collection without walking it: ask for one item
    /// per page and read the last page index from the `Link` header.
    ///
    /// When the header is absent the count falls back to the length of the
    /// single returned page. This undercounts whenever more than one page
    /// exists; a documented approximation, kept as-is.
    async fn count_via_last_page(&self, url: &str) -> u64 {
        let response = match self.http.execute_with_retry(|| self.request(url)).await {
            Some(response) => response,
            None => return 0,
        };

        let link_header = response
            .headers()
            .get("link")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        if let Some(pages) = link_header.as_deref().and_then(last_page_from_link) {
            return pages;
        }

        match response.json::<Vec<serde_json::Value>>().await {
            Ok(items) => items.len() as u64,
            Err(_) => 0,
        }
    }
}

#[async_trait]
impl RepositoryStatsRepository for GitHubStatsClient {
    async fn fetch_stats(&self, repository_url: &str) -> Option<RepositoryStats> {
        let (owner, repo) = parse_github_url(repository_url)?;

        let summary = match self.fetch_repo(&owner, &repo).await {
            Fetched::Available(summary) => summary,
            Fetched::Unavailable => return None,
        };

        // Auxiliary counts are independently best-effort: one failing count
        // zeroes itself without failing the snapshot.
        let contributors_url = format!(
            "{}/repos/{}/{}/contributors?per_page=1&anon=true",
            GITHUB_API_URL, owner, repo
        );
        let pulls_url = format!(
            "{}/repos/{}/{}/pulls?per_page=1&state=all",
            GITHUB_API_URL, owner, repo
        );
        let (contributors, pull_requests) = tokio::join!(
            self.count_via_last_page(&contributors_url),
            self.count_via_last_page(&pulls_url),
        );

        Some(RepositoryStats {
            stars: summary.stargazers_count,
            forks: summary.forks_count,
            watchers: summary.subscribers_count,
            open_issues: summary.open_issues_count,
            contributors,
            pull_requests,
            last_commit: summary.pushed_at.and_then(|raw| raw.parse().ok()),
            created_at: summary.created_at.and_then(|raw| raw.parse().ok()),
            default_branch: summary.default_branch,
            language: summary.language,
            topics: summary.topics,
        })
    }
}

/// Extracts `(owner, repo)` from a github.com URL in any common formatting.
pub fn parse_github_url(url: &str) -> Option<(String, String)> {
    let rest = url.split("github.com").nth(1)?;
    let rest = rest.trim_start_matches([':', '/']);

    let mut segments = rest.split('/').filter(|segment| !segment.is_empty());
    let owner = segments.next()?;
    let repo = segments.next()?;

    let repo = repo
        .trim_end_matches(".git")
        .split(['#', '?'])
        .next()
        .unwrap_or("");

    if owner.is_empty() || repo.is_empty() {
        return None;
    }

    Some((owner.to_string(), repo.to_string()))
}

/// Reads the last-page index out of a GitHub `Link` pagination header.
fn last_page_from_link(link: &str) -> Option<u64> {
    for part in link.split(',') {
        let part = part.trim();
        if !part.ends_with(r#"rel="last""#) {
            continue;
        }
        let url = part.split(['<', '>']).nth(1)?;
        for parameter in url.split(['?', '&']) {
            if let Some(value) = parameter.strip_prefix("page=") {
                return value.parse().ok();
            }
        }
    }
    None
}
