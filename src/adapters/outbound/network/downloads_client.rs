use async_trait::async_trait;
use serde::Deserialize;

use super::http::{validate_url_component, ResilientClient};
use crate::analysis::domain::{DownloadStats, Ecosystem, PackageIdentifier};
use crate::ports::outbound::DownloadStatsRepository;
use crate::shared::Fetched;

const NPM_DOWNLOADS_URL: &str = "https://api.npmjs.org/downloads/point";
const PYPISTATS_URL: &str = "https://pypistats.org/api/packages";

#[derive(Debug, Deserialize)]
struct NpmDownloadPoint {
    #[serde(default)]
    downloads: u64,
}

#[derive(Debug, Deserialize)]
struct PyPiStatsRecent {
    data: PyPiStatsWindows,
}

#[derive(Debug, Deserialize)]
struct PyPiStatsWindows {
    #[serde(default)]
    last_day: Option<u64>,
    #[serde(default)]
    last_week: Option<u64>,
    #[serde(default)]
    last_month: Option<u64>,
}

/// RegistryDownloadsClient adapter for fetching recent download counts
///
/// Strategies per ecosystem:
/// - npm: three point queries (day/week/month) issued concurrently; a
///   failing window yields 0 without blocking the other two.
/// - python: one aggregate "recent" payload carrying all three windows; a
///   failure yields `Unavailable` (windows absent, not zero).
/// - docker: no windowed stats exist; always `Unavailable` (the cumulative
///   pull count lives in metadata).
pub struct RegistryDownloadsClient {
    http: ResilientClient,
}

impl RegistryDownloadsClient {
    pub fn new(http: ResilientClient) -> Self {
        Self { http }
    }

    async fn npm_window(&self, period: &str, name: &str) -> u64 {
        let url = format!(
            "{}/{}/{}",
            NPM_DOWNLOADS_URL,
            period,
            urlencoding::encode(name)
        );
        self.http
            .get_json::<NpmDownloadPoint>(&url)
            .await
            .map(|point| point.downloads)
            .unwrap_or(0)
    }

    async fn npm_downloads(&self, name: &str) -> DownloadStats {
        let (last_day, last_week, last_month) = tokio::join!(
            self.npm_window("last-day", name),
            self.npm_window("last-week", name),
            self.npm_window("last-month", name),
        );

        DownloadStats {
            last_day: Some(last_day),
            last_week: Some(last_week),
            last_month: Some(last_month),
            total: None,
        }
    }

    async fn pypi_downloads(&self, name: &str) -> Fetched<DownloadStats> {
        let normalized = name.to_lowercase().replace('_', "-");
        let url = format!("{}/{}/recent", PYPISTATS_URL, urlencoding::encode(&normalized));

        self.http
            .get_json::<PyPiStatsRecent>(&url)
            .await
            .map(|recent| DownloadStats {
                last_day: recent.data.last_day,
                last_week: recent.data.last_week,
                last_month: recent.data.last_month,
                total: None,
            })
    }
}

#[async_trait]
impl DownloadStatsRepository for RegistryDownloadsClient {
    async fn fetch_downloads(&self, identifier: &PackageIdentifier) -> Fetched<DownloadStats> {
        if validate_url_component(identifier.name(), "Package name").is_err() {
            return Fetched::Unavailable;
        }

        match identifier.ecosystem() {
            Ecosystem::Npm => Fetched::Available(self.npm_downloads(identifier.name()).await),
            Ecosystem::Python => self.pypi_downloads(identifier.name()).await,
            Ecosystem::Docker => Fetched::Unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_docker_has_no_windowed_stats() {
        let client = RegistryDownloadsClient::new(ResilientClient::new().unwrap());
        let identifier = PackageIdentifier::new(
            "nginx".to_string(),
            "latest".to_string(),
            Ecosystem::Docker,
        )
        .unwrap();
        let stats = client.fetch_downloads(&identifier).await;
        assert!(stats.is_unavailable());
    }

    #[test]
    fn test_npm_point_deserialize() {
        let point: NpmDownloadPoint =
            serde_json::from_str(r#"{ "downloads": 12345, "package": "express" }"#).unwrap();
        assert_eq!(point.downloads, 12345);
    }

    #[test]
    fn test_pypistats_deserialize() {
        let recent: PyPiStatsRecent = serde_json::from_str(
            r#"{ "data": { "last_day": 100, "last_week": 700, "last_month": 3000 }, "type": "recent_downloads" }"#,
        )
        .unwrap();
        assert_eq!(recent.data.last_day, Some(100));
        assert_eq!(recent.data.last_month, Some(3000));
    }

    #[test]
    fn test_pypistats_missing_window_is_absent() {
        let recent: PyPiStatsRecent =
            serde_json::from_str(r#"{ "data": { "last_month": 3000 } }"#).unwrap();
        assert_eq!(recent.data.last_day, None);
        assert_eq!(recent.data.last_month, Some(3000));
    }
}
