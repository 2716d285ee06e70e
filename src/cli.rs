use clap::Parser;

use crate::adapters::outbound::formatters::{JsonFormatter, TableFormatter};
use crate::manifest::ManifestFormat;
use crate::ports::outbound::ReportFormatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "table" | "text" => Ok(OutputFormat::Table),
            _ => Err(format!(
                "Invalid format: {}. Please specify 'json' or 'table'",
                s
            )),
        }
    }
}

impl OutputFormat {
    /// Creates a formatter instance for the specified output format
    ///
    /// # Arguments
    /// * `colored` - Whether the table formatter may emit ANSI colors
    ///
    /// # Returns
    /// A boxed ReportFormatter trait object appropriate for this format
    pub fn create_formatter(&self, colored: bool) -> Box<dyn ReportFormatter> {
        match self {
            OutputFormat::Json => Box::new(JsonFormatter::new()),
            OutputFormat::Table if colored => Box::new(TableFormatter::new()),
            OutputFormat::Table => Box::new(TableFormatter::plain()),
        }
    }

    /// Returns the progress message for the specified output format
    pub fn progress_message(&self) -> &'static str {
        match self {
            OutputFormat::Json => "📝 Generating JSON report...",
            OutputFormat::Table => "📝 Generating trust report...",
        }
    }
}

/// Score package trust from a dependency manifest
#[derive(Parser, Debug)]
#[command(name = "pkgtrust")]
#[command(version)]
#[command(
    about = "Aggregate registry metadata and vulnerability advisories into a per-package trust score",
    long_about = None
)]
pub struct Args {
    /// Path to the manifest file (package.json, requirements.txt or Dockerfile)
    pub manifest: String,

    /// Manifest format: npm, python or docker (auto-detected from the file name if omitted)
    #[arg(short = 'm', long = "manifest-format")]
    pub manifest_format: Option<ManifestFormat>,

    /// Output format: json or table (defaults to the config file's choice, then table)
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to a pkgtrust.config.yml (auto-discovered in the current directory if omitted)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Exit with code 1 when any package scores below this threshold
    #[arg(long, value_name = "SCORE")]
    pub min_score: Option<u8>,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
