use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::http::{decode_json, ResilientClient};
use crate::analysis::domain::{Ecosystem, PackageIdentifier, Severity, Vulnerability};
use crate::ports::outbound::AdvisorySource;
use crate::shared::Fetched;

const OSV_QUERY_URL: &str = "https://api.osv.dev/v1/query";

// OSV API request/response structures

#[derive(Debug, Serialize)]
struct OsvQuery {
    package: OsvPackage,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

#[derive(Debug, Serialize)]
struct OsvPackage {
    name: String,
    ecosystem: String,
}

#[derive(Debug, Deserialize)]
struct OsvQueryResponse {
    #[serde(default)]
    vulns: Vec<OsvVulnerability>,
}

#[derive(Debug, Deserialize)]
struct OsvVulnerability {
    id: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    severity: Option<Vec<OsvSeverity>>,
    #[serde(default)]
    database_specific: Option<DatabaseSpecific>,
    #[serde(default)]
    affected: Option<Vec<OsvAffected>>,
    #[serde(default)]
    references: Vec<OsvReference>,
}

#[derive(Debug, Deserialize)]
struct OsvSeverity {
    #[serde(rename = "type")]
    severity_type: String, // "CVSS_V3"
    score: String, // e.g., "CVSS:3.1/AV:N/AC:L/..."
}

#[derive(Debug, Deserialize)]
struct DatabaseSpecific {
    #[serde(default)]
    severity: Option<String>, // "CRITICAL", "HIGH", "MODERATE", "MEDIUM", "LOW"
    #[serde(default)]
    cwe_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct OsvAffected {
    #[serde(default)]
    ranges: Option<Vec<OsvRange>>,
}

#[derive(Debug, Deserialize)]
struct OsvRange {
    events: Vec<OsvEvent>,
}

#[derive(Debug, Deserialize)]
struct OsvEvent {
    #[serde(default)]
    fixed: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OsvReference {
    url: String,
}

/// OsvAdvisoryClient: advisory source B, the OSV.dev vulnerability database
///
/// Point query by exact package + ecosystem + version; the one source with
/// coverage for all three ecosystems. The "latest" sentinel queries without
/// a version, returning advisories across all versions of the package.
pub struct OsvAdvisoryClient {
    http: ResilientClient,
}

impl OsvAdvisoryClient {
    pub fn new(http: ResilientClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl AdvisorySource for OsvAdvisoryClient {
    fn covers(&self, _ecosystem: Ecosystem) -> bool {
        true
    }

    async fn fetch_advisories(
        &self,
        identifier: &PackageIdentifier,
    ) -> Fetched<Vec<Vulnerability>> {
        let query = OsvQuery {
            package: OsvPackage {
                name: identifier.name().to_string(),
                ecosystem: identifier.ecosystem().osv_name().to_string(),
            },
            version: if identifier.is_latest() {
                None
            } else {
                Some(identifier.version().to_string())
            },
        };

        let response = self
            .http
            .execute_with_retry(|| self.http.inner().post(OSV_QUERY_URL).json(&query))
            .await;

        decode_json::<OsvQueryResponse>(response)
            .await
            .map(|payload| payload.vulns.into_iter().map(convert_vulnerability).collect())
    }
}

/// Converts one OSV record into the domain model.
///
/// Severity normalization: an explicit severity tag wins; otherwise the
/// numeric score derived from the CVSS vector is bucketed through the
/// standard thresholds; failing both, the advisory is low severity.
fn convert_vulnerability(osv: OsvVulnerability) -> Vulnerability {
    let cvss = osv
        .severity
        .as_ref()
        .and_then(|severities| {
            severities
                .iter()
                .find(|s| s.severity_type == "CVSS_V3")
                .or_else(|| severities.iter().find(|s| s.severity_type == "CVSS_V4"))
        })
        .and_then(|s| parse_cvss_score(&s.score));

    let severity = osv
        .database_specific
        .as_ref()
        .and_then(|db| db.severity.as_deref())
        .and_then(Severity::parse)
        .or_else(|| cvss.map(Severity::from_score))
        .unwrap_or(Severity::Low);

    let cwe: BTreeSet<String> = osv
        .database_specific
        .as_ref()
        .map(|db| db.cwe_ids.iter().cloned().collect())
        .unwrap_or_default();

    let fixed_in = osv.affected.as_ref().and_then(|affected| {
        affected.iter().find_map(|a| {
            a.ranges
                .as_ref()?
                .iter()
                .find_map(|r| r.events.iter().find_map(|e| e.fixed.clone()))
        })
    });

    let title = osv
        .summary
        .clone()
        .filter(|summary| !summary.is_empty())
        .unwrap_or_else(|| osv.id.clone());

    Vulnerability {
        id: osv.id,
        severity,
        title,
        description: osv.details.or(osv.summary).unwrap_or_default(),
        cvss,
        cwe,
        references: osv.references.into_iter().map(|r| r.url).collect(),
        fixed_in,
    }
}

/// Extracts a numeric base score from a CVSS v3 vector string.
///
/// Example: "CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H" -> Some(9.8)
///
/// Simplified base-score computation from the vector metrics; OSV records
/// publish the vector, not the number.
fn parse_cvss_score(cvss_vector: &str) -> Option<f64> {
    let metrics: std::collections::HashMap<&str, &str> = cvss_vector
        .split('/')
        .skip(1) // Skip "CVSS:3.1" or "CVSS:3.0"
        .filter_map(|part| {
            let mut split = part.split(':');
            Some((split.next()?, split.next()?))
        })
        .collect();

    let av = metrics.get("AV")?;
    let ac = metrics.get("AC")?;
    let pr = metrics.get("PR")?;
    let ui = metrics.get("UI")?;
    let s = metrics.get("S")?;
    let c = metrics.get("C")?;
    let i = metrics.get("I")?;
    let a = metrics.get("A")?;

    let av_score = match *av {
        "N" => 0.85, // Network
        "A" => 0.62, // Adjacent
        "L" => 0.55, // Local
        "P" => 0.2,  // Physical
        _ => return None,
    };

    let ac_score = match *ac {
        "L" => 0.77, // Low
        "H" => 0.44, // High
        _ => return None,
    };

    let pr_score = match (*pr, *s) {
        ("N", _) => 0.85,   // None
        ("L", "U") => 0.62, // Low, Unchanged
        ("L", "C") => 0.68, // Low, Changed
        ("H", "U") => 0.27, // High, Unchanged
        ("H", "C") => 0.5,  // High, Changed
        _ => return None,
    };

    let ui_score = match *ui {
        "N" => 0.85, // None
        "R" => 0.62, // Required
        _ => return None,
    };

    let c_score = match *c {
        "N" => 0.0,  // None
        "L" => 0.22, // Low
        "H" => 0.56, // High
        _ => return None,
    };

    let i_score = match *i {
        "N" => 0.0,
        "L" => 0.22,
        "H" => 0.56,
        _ => return None,
    };

    let a_score = match *a {
        "N" => 0.0,
        "L" => 0.22,
        "H" => 0.56,
        _ => return None,
    };

    // Impact sub-score
    let iss = 1.0_f64 - ((1.0 - c_score) * (1.0 - i_score) * (1.0 - a_score));

    let impact = if *s == "U" {
        6.42 * iss
    } else {
        7.52 * (iss - 0.029) - 3.25 * (iss - 0.02_f64).powi(15)
    };

    let exploitability = 8.22 * av_score * ac_score * pr_score * ui_score;

    let base_score = if impact <= 0.0 {
        0.0
    } else if *s == "U" {
        f64::min(impact + exploitability, 10.0)
    } else {
        f64::min(1.08 * (impact + exploitability), 10.0)
    };

    // Round up to one decimal place, per the CVSS specification
    Some((base_score * 10.0).ceil() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_osv_client_covers_all_ecosystems() {
        let client = OsvAdvisoryClient::new(ResilientClient::new().unwrap());
        assert!(client.covers(Ecosystem::Npm));
        assert!(client.covers(Ecosystem::Python));
        assert!(client.covers(Ecosystem::Docker));
    }

    #[test]
    fn test_parse_cvss_score_critical() {
        let vector = "CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H";
        let score = parse_cvss_score(vector).unwrap();
        assert!((9.0..=10.0).contains(&score));
    }

    #[test]
    fn test_parse_cvss_score_high() {
        let vector = "CVSS:3.1/AV:N/AC:L/PR:L/UI:N/S:U/C:H/I:H/A:H";
        let score = parse_cvss_score(vector).unwrap();
        assert!((7.0..9.0).contains(&score));
    }

    #[test]
    fn test_parse_cvss_score_medium() {
        let vector = "CVSS:3.1/AV:N/AC:L/PR:L/UI:R/S:U/C:L/I:L/A:L";
        let score = parse_cvss_score(vector).unwrap();
        assert!((4.0..7.0).contains(&score));
    }

    #[test]
    fn test_parse_cvss_score_no_impact() {
        let vector = "CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:N/I:N/A:N";
        assert_eq!(parse_cvss_score(vector), Some(0.0));
    }

    #[test]
    fn test_parse_cvss_score_invalid() {
        assert_eq!(parse_cvss_score("invalid vector"), None);
    }

    #[test]
    fn test_convert_prefers_severity_tag_over_score() {
        // Tag says HIGH even though the vector computes critical: the
        // explicit tag wins.
        let osv: OsvVulnerability = serde_json::from_str(
            r#"{
                "id": "GHSA-2xpw-w6gg-jr37",
                "summary": "Test vulnerability",
                "severity": [
                    { "type": "CVSS_V3", "score": "CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H" }
                ],
                "database_specific": { "severity": "HIGH" }
            }"#,
        )
        .unwrap();
        let vulnerability = convert_vulnerability(osv);
        assert_eq!(vulnerability.severity, Severity::High);
        assert!(vulnerability.cvss.unwrap() >= 9.0);
    }

    #[test]
    fn test_convert_derives_severity_from_score() {
        let osv: OsvVulnerability = serde_json::from_str(
            r#"{
                "id": "CVE-2024-1234",
                "summary": "Test vulnerability",
                "severity": [
                    { "type": "CVSS_V3", "score": "CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H" }
                ]
            }"#,
        )
        .unwrap();
        let vulnerability = convert_vulnerability(osv);
        assert_eq!(vulnerability.severity, Severity::Critical);
    }

    #[test]
    fn test_convert_without_any_severity_signal_is_low() {
        let osv: OsvVulnerability =
            serde_json::from_str(r#"{ "id": "CVE-2024-0000" }"#).unwrap();
        let vulnerability = convert_vulnerability(osv);
        assert_eq!(vulnerability.severity, Severity::Low);
        assert_eq!(vulnerability.title, "CVE-2024-0000");
        assert!(vulnerability.cvss.is_none());
    }

    #[test]
    fn test_convert_extracts_fixed_version() {
        let osv: OsvVulnerability = serde_json::from_str(
            r#"{
                "id": "CVE-2024-1234",
                "summary": "Test",
                "affected": [
                    {
                        "ranges": [
                            {
                                "type": "ECOSYSTEM",
                                "events": [ { "introduced": "0" }, { "fixed": "2.0.0" } ]
                            }
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();
        let vulnerability = convert_vulnerability(osv);
        assert_eq!(vulnerability.fixed_in.as_deref(), Some("2.0.0"));
    }

    #[test]
    fn test_convert_collects_cwes_and_references() {
        let osv: OsvVulnerability = serde_json::from_str(
            r#"{
                "id": "GHSA-aaaa-bbbb-cccc",
                "summary": "Test",
                "database_specific": { "severity": "LOW", "cwe_ids": ["CWE-79", "CWE-79", "CWE-89"] },
                "references": [
                    { "type": "ADVISORY", "url": "https://example.com/advisory" },
                    { "type": "WEB", "url": "https://example.com/writeup" }
                ]
            }"#,
        )
        .unwrap();
        let vulnerability = convert_vulnerability(osv);
        assert_eq!(vulnerability.cwe.len(), 2);
        assert_eq!(vulnerability.references.len(), 2);
    }

    #[test]
    fn test_query_serializes_latest_without_version() {
        let query = OsvQuery {
            package: OsvPackage {
                name: "nginx".to_string(),
                ecosystem: "Docker".to_string(),
            },
            version: None,
        };
        let json = serde_json::to_string(&query).unwrap();
        assert!(!json.contains("version"));
        assert!(json.contains("Docker"));
    }

    #[test]
    fn test_empty_response_deserializes() {
        let response: OsvQueryResponse = serde_json::from_str("{}").unwrap();
        assert!(response.vulns.is_empty());
    }
}
