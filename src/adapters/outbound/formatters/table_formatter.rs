use owo_colors::OwoColorize;

use crate::analysis::domain::{PackageAnalysis, Severity, SeverityCounts};
use crate::application::dto::ScanReport;
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;

/// TableFormatter adapter for human-readable console output
///
/// Renders one block per package: identifier, colored trust score, the
/// four-way breakdown, advisory counts and the generated summary.
pub struct TableFormatter {
    /// Disables ANSI colors (for file output or tests).
    plain: bool,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self { plain: false }
    }

    /// A formatter that never emits ANSI escapes.
    pub fn plain() -> Self {
        Self { plain: true }
    }

    fn colored_score(&self, score: u8) -> String {
        let text = format!("{}/100", score);
        if self.plain {
            return text;
        }
        match score {
            80..=100 => text.green().to_string(),
            50..=79 => text.yellow().to_string(),
            _ => text.red().to_string(),
        }
    }

    fn colored_severity(&self, severity: Severity) -> String {
        let text = severity.to_string().to_uppercase();
        if self.plain {
            return text;
        }
        match severity {
            Severity::Critical => text.red().bold().to_string(),
            Severity::High => text.red().to_string(),
            Severity::Medium => text.yellow().to_string(),
            Severity::Low => text.dimmed().to_string(),
        }
    }

    fn render_package(&self, output: &mut String, analysis: &PackageAnalysis) {
        output.push_str(&format!(
            "📦 {}  {}\n",
            analysis.identifier,
            self.colored_score(analysis.trust_score)
        ));

        output.push_str(&format!(
            "   security {:>3}  maintenance {:>3}  popularity {:>3}  dependencies {:>3}\n",
            analysis.breakdown.security,
            analysis.breakdown.maintenance,
            analysis.breakdown.popularity,
            analysis.breakdown.dependencies,
        ));

        if let Some(license) = &analysis.metadata.license {
            output.push_str(&format!("   license: {}\n", license));
        }
        if analysis.metadata.deprecated {
            output.push_str("   ⚠️  deprecated on the registry\n");
        }

        let counts = SeverityCounts::tally(&analysis.vulnerabilities);
        if counts.total() > 0 {
            output.push_str(&format!(
                "   vulnerabilities: {} ({} critical, {} high, {} medium, {} low)\n",
                counts.total(),
                counts.critical,
                counts.high,
                counts.medium,
                counts.low,
            ));
            for vulnerability in &analysis.vulnerabilities {
                output.push_str(&format!(
                    "     - {} [{}] {}\n",
                    vulnerability.id,
                    self.colored_severity(vulnerability.severity),
                    vulnerability.title,
                ));
            }
        } else {
            output.push_str("   vulnerabilities: none known\n");
        }

        if let Some(summary) = &analysis.summary {
            output.push_str(&format!("   {}\n", summary));
        }
        output.push('\n');
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for TableFormatter {
    fn format(&self, report: &ScanReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!(
            "Trust report {} — {} package(s), generated {}\n\n",
            report.scan_id,
            report.analyses.len(),
            report.generated_at.format("%Y-%m-%d %H:%M UTC"),
        ));

        for analysis in &report.analyses {
            self.render_package(&mut output, analysis);
        }

        Ok(output)
    }
}
