use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::http::{decode_json, ResilientClient};
use crate::analysis::domain::{Ecosystem, PackageIdentifier, Severity, Vulnerability};
use crate::ports::outbound::AdvisorySource;
use crate::shared::Fetched;

const GRAPHQL_URL: &str = "https://api.github.com/graphql";
const MAX_ADVISORIES: u32 = 10;

const ADVISORY_QUERY: &str = r#"
query($ecosystem: SecurityAdvisoryEcosystem!, $package: String!, $first: Int!) {
  securityVulnerabilities(first: $first, ecosystem: $ecosystem, package: $package) {
    nodes {
      advisory {
        ghsaId
        summary
        description
        severity
        cvss { score }
        cwes(first: 10) { nodes { cweId } }
        references { url }
      }
      firstPatchedVersion { identifier }
    }
  }
}
"#;

#[derive(Debug, Serialize)]
struct GraphQLRequest {
    query: String,
    variables: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GraphQLResponse {
    #[serde(default)]
    data: Option<QueryData>,
}

#[derive(Debug, Deserialize)]
struct QueryData {
    #[serde(rename = "securityVulnerabilities")]
    security_vulnerabilities: VulnerabilityConnection,
}

#[derive(Debug, Deserialize)]
struct VulnerabilityConnection {
    #[serde(default)]
    nodes: Vec<VulnerabilityNode>,
}

#[derive(Debug, Deserialize)]
struct VulnerabilityNode {
    advisory: Advisory,
    #[serde(rename = "firstPatchedVersion", default)]
    first_patched_version: Option<FirstPatchedVersion>,
}

#[derive(Debug, Deserialize)]
struct Advisory {
    #[serde(rename = "ghsaId")]
    ghsa_id: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    severity: Option<String>,
    #[serde(default)]
    cvss: Option<Cvss>,
    #[serde(default)]
    cwes: Option<CweConnection>,
    #[serde(default)]
    references: Vec<Reference>,
}

#[derive(Debug, Deserialize)]
struct Cvss {
    #[serde(default)]
    score: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CweConnection {
    #[serde(default)]
    nodes: Vec<Cwe>,
}

#[derive(Debug, Deserialize)]
struct Cwe {
    #[serde(rename = "cweId")]
    cwe_id: String,
}

#[derive(Debug, Deserialize)]
struct Reference {
    url: String,
}

#[derive(Debug, Deserialize)]
struct FirstPatchedVersion {
    identifier: String,
}

/// GhsaAdvisoryClient: advisory source A, the GitHub Security Advisories
/// GraphQL API
///
/// Queries the advisory graph scoped to the package's ecosystem, top
/// [`MAX_ADVISORIES`] results. Requires an API token: without one the
/// source reports no coverage and is skipped, which is not an error.
/// Container images are outside this source's coverage entirely.
pub struct GhsaAdvisoryClient {
    http: ResilientClient,
    token: Option<String>,
}

impl GhsaAdvisoryClient {
    pub fn new(http: ResilientClient, token: Option<String>) -> Self {
        Self { http, token }
    }
}

#[async_trait]
impl AdvisorySource for GhsaAdvisoryClient {
    fn covers(&self, ecosystem: Ecosystem) -> bool {
        self.token.is_some() && ecosystem.ghsa_name().is_some()
    }

    async fn fetch_advisories(
        &self,
        identifier: &PackageIdentifier,
    ) -> Fetched<Vec<Vulnerability>> {
        let (token, ecosystem) = match (&self.token, identifier.ecosystem().ghsa_name()) {
            (Some(token), Some(ecosystem)) => (token, ecosystem),
            _ => return Fetched::Unavailable,
        };

        let request = GraphQLRequest {
            query: ADVISORY_QUERY.to_string(),
            variables: serde_json::json!({
                "ecosystem": ecosystem,
                "package": identifier.name(),
                "first": MAX_ADVISORIES,
            }),
        };

        let response = self
            .http
            .execute_with_retry(|| {
                self.http
                    .inner()
                    .post(GRAPHQL_URL)
                    .bearer_auth(token)
                    .json(&request)
            })
            .await;

        // A response without a data section is a query failure (bad
        // credentials, schema error), not an empty advisory list.
        match decode_json::<GraphQLResponse>(response).await {
            Fetched::Available(GraphQLResponse { data: Some(data) }) => Fetched::Available(
                data.security_vulnerabilities
                    .nodes
                    .into_iter()
                    .map(convert_node)
                    .collect(),
            ),
            _ => Fetched::Unavailable,
        }
    }
}

fn convert_node(node: VulnerabilityNode) -> Vulnerability {
    let advisory = node.advisory;

    let cvss = advisory
        .cvss
        .and_then(|cvss| cvss.score)
        .filter(|score| *score > 0.0);

    let severity = advisory
        .severity
        .as_deref()
        .and_then(Severity::parse)
        .or_else(|| cvss.map(Severity::from_score))
        .unwrap_or(Severity::Low);

    let cwe: BTreeSet<String> = advisory
        .cwes
        .map(|connection| {
            connection
                .nodes
                .into_iter()
                .map(|cwe| cwe.cwe_id)
                .collect()
        })
        .unwrap_or_default();

    Vulnerability {
        id: advisory.ghsa_id,
        severity,
        title: advisory.summary,
        description: advisory.description,
        cvss,
        cwe,
        references: advisory
            .references
            .into_iter()
            .map(|reference| reference.url)
            .collect(),
        fixed_in: node
            .first_patched_version
            .map(|version| version.identifier),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_token() -> GhsaAdvisoryClient {
        GhsaAdvisoryClient::new(ResilientClient::new().unwrap(), Some("token".to_string()))
    }

    fn client_without_token() -> GhsaAdvisoryClient {
        GhsaAdvisoryClient::new(ResilientClient::new().unwrap(), None)
    }

    #[test]
    fn test_coverage_requires_token() {
        assert!(client_with_token().covers(Ecosystem::Npm));
        assert!(client_with_token().covers(Ecosystem::Python));
        assert!(!client_without_token().covers(Ecosystem::Npm));
    }

    #[test]
    fn test_docker_is_never_covered() {
        assert!(!client_with_token().covers(Ecosystem::Docker));
    }

    #[tokio::test]
    async fn test_fetch_without_token_is_unavailable() {
        let identifier = PackageIdentifier::new(
            "lodash".to_string(),
            "4.17.20".to_string(),
            Ecosystem::Npm,
        )
        .unwrap();
        let result = client_without_token().fetch_advisories(&identifier).await;
        assert!(result.is_unavailable());
    }

    #[test]
    fn test_convert_node() {
        let node: VulnerabilityNode = serde_json::from_str(
            r#"{
                "advisory": {
                    "ghsaId": "GHSA-jf85-cpcp-j695",
                    "summary": "Prototype Pollution in lodash",
                    "description": "Versions of lodash prior to 4.17.12 are vulnerable.",
                    "severity": "CRITICAL",
                    "cvss": { "score": 9.1 },
                    "cwes": { "nodes": [ { "cweId": "CWE-1321" } ] },
                    "references": [ { "url": "https://github.com/advisories/GHSA-jf85-cpcp-j695" } ]
                },
                "firstPatchedVersion": { "identifier": "4.17.12" }
            }"#,
        )
        .unwrap();

        let vulnerability = convert_node(node);
        assert_eq!(vulnerability.id, "GHSA-jf85-cpcp-j695");
        assert_eq!(vulnerability.severity, Severity::Critical);
        assert_eq!(vulnerability.cvss, Some(9.1));
        assert!(vulnerability.cwe.contains("CWE-1321"));
        assert_eq!(vulnerability.references.len(), 1);
        assert_eq!(vulnerability.fixed_in.as_deref(), Some("4.17.12"));
    }

    #[test]
    fn test_convert_node_severity_falls_back_to_score() {
        let node: VulnerabilityNode = serde_json::from_str(
            r#"{
                "advisory": {
                    "ghsaId": "GHSA-xxxx-yyyy-zzzz",
                    "summary": "Something",
                    "description": "",
                    "cvss": { "score": 7.5 }
                }
            }"#,
        )
        .unwrap();
        let vulnerability = convert_node(node);
        assert_eq!(vulnerability.severity, Severity::High);
    }

    #[test]
    fn test_convert_node_zero_score_is_no_score() {
        let node: VulnerabilityNode = serde_json::from_str(
            r#"{
                "advisory": {
                    "ghsaId": "GHSA-aaaa-bbbb-cccc",
                    "summary": "Something",
                    "description": "",
                    "severity": "LOW",
                    "cvss": { "score": 0.0 }
                }
            }"#,
        )
        .unwrap();
        let vulnerability = convert_node(node);
        assert_eq!(vulnerability.cvss, None);
        assert_eq!(vulnerability.severity, Severity::Low);
    }

    #[test]
    fn test_graphql_response_with_missing_data() {
        let response: GraphQLResponse =
            serde_json::from_str(r#"{ "errors": [ { "message": "bad credentials" } ] }"#).unwrap();
        assert!(response.data.is_none());
    }
}
