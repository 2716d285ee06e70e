use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Advisory severity levels, ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Derives a severity from a numeric CVSS-style score.
    ///
    /// Threshold table: `>= 9.0` critical, `>= 7.0` high, `>= 4.0` medium,
    /// everything else low. Advisory sources that carry only a score and no
    /// severity tag are normalized through this.
    pub fn from_score(score: f64) -> Self {
        if score >= 9.0 {
            Severity::Critical
        } else if score >= 7.0 {
            Severity::High
        } else if score >= 4.0 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    /// Parses a severity tag as published by advisory databases.
    ///
    /// GitHub uses `MODERATE` where others use `MEDIUM`; both map to
    /// [`Severity::Medium`]. Unknown tags return `None` so the caller can
    /// fall back to score-based derivation.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.to_uppercase().as_str() {
            "CRITICAL" => Some(Severity::Critical),
            "HIGH" => Some(Severity::High),
            "MODERATE" | "MEDIUM" => Some(Severity::Medium),
            "LOW" => Some(Severity::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A normalized vulnerability advisory.
///
/// Identity is the advisory `id` (GHSA / CVE / OSV identifier), globally
/// unique across sources. When two sources report the same id, the
/// first-seen record wins and later duplicates are discarded (see
/// `analysis::services::merge_advisories`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vulnerability {
    pub id: String,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    /// Numeric CVSS score where the source published one.
    pub cvss: Option<f64>,
    /// CWE identifiers, deduplicated and ordered.
    pub cwe: BTreeSet<String>,
    /// Reference URLs in source order.
    pub references: Vec<String>,
    /// First version that fixes the advisory, if known.
    pub fixed_in: Option<String>,
}

impl Vulnerability {
    pub fn new(id: String, severity: Severity, title: String, description: String) -> Self {
        Self {
            id,
            severity,
            title,
            description,
            cvss: None,
            cwe: BTreeSet::new(),
            references: Vec::new(),
            fixed_in: None,
        }
    }

    pub fn with_cvss(mut self, cvss: f64) -> Self {
        self.cvss = Some(cvss);
        self
    }

    pub fn with_fixed_in(mut self, version: impl Into<String>) -> Self {
        self.fixed_in = Some(version.into());
        self
    }
}

/// Counts advisories per severity level; the calculator's security input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    pub fn tally(vulnerabilities: &[Vulnerability]) -> Self {
        let mut counts = Self::default();
        for vuln in vulnerabilities {
            match vuln.severity {
                Severity::Critical => counts.critical += 1,
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low
    }
}
