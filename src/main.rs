use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;

use tracing_subscriber::EnvFilter;

use pkgtrust::adapters::outbound::console::StderrProgressReporter;
use pkgtrust::adapters::outbound::filesystem::{
    FileSystemReader, FileSystemWriter, StdoutPresenter,
};
use pkgtrust::adapters::outbound::network::{
    EcosystemMetadataRouter, GhsaAdvisoryClient, GitHubStatsClient, OsvAdvisoryClient,
    RegistryDownloadsClient, ResilientClient,
};
use pkgtrust::adapters::outbound::text::TemplateDescriptionGenerator;
use pkgtrust::application::dto::ScanRequest;
use pkgtrust::application::use_cases::{FetchVulnerabilitiesUseCase, ScanPackagesUseCase};
use pkgtrust::cli::{Args, OutputFormat};
use pkgtrust::config;
use pkgtrust::manifest::{self, ManifestFormat};
use pkgtrust::ports::outbound::{OutputPresenter, ProgressReporter};
use pkgtrust::shared::{ExitCode, Result, TrustError};

#[tokio::main]
async fn main() {
    init_tracing();

    let args = Args::parse_args();

    match run(args).await {
        Ok(exit_code) => process::exit(exit_code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

/// Route log records to stderr, filtered by RUST_LOG (errors only by
/// default, so adapter-level warnings do not drown the progress output).
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> Result<ExitCode> {
    // Load configuration: explicit path, or auto-discovery next to the cwd
    let config = match args.config.as_deref() {
        Some(path) => config::load_config_from_path(Path::new(path))?,
        None => config::discover_config(Path::new("."))?.unwrap_or_default(),
    };

    // Resolve the manifest format before touching the network
    let manifest_path = PathBuf::from(&args.manifest);
    let format = args
        .manifest_format
        .or_else(|| ManifestFormat::detect(&manifest_path))
        .ok_or_else(|| TrustError::UnknownManifestFormat {
            path: manifest_path.clone(),
        })?;

    let raw = FileSystemReader::new().read_manifest(&manifest_path)?;
    let identifiers = manifest::parse(&raw, format)?;

    let progress_reporter = StderrProgressReporter::new();
    progress_reporter.report(&format!(
        "📖 Parsed {} package(s) from {} ({})",
        identifiers.len(),
        manifest_path.display(),
        format.as_str()
    ));

    // Build adapters around one shared connection pool (Dependency Injection)
    let http = ResilientClient::new()?.with_policy(config.retry_policy());
    let github_token = config.github_token();

    let use_case = ScanPackagesUseCase::new(
        EcosystemMetadataRouter::new(http.clone()),
        GitHubStatsClient::new(http.clone(), github_token.clone()),
        RegistryDownloadsClient::new(http.clone()),
        FetchVulnerabilitiesUseCase::new(
            GhsaAdvisoryClient::new(http.clone(), github_token),
            OsvAdvisoryClient::new(http),
        ),
        TemplateDescriptionGenerator::new(),
        progress_reporter,
    );

    // Execute the scan
    let report = use_case.execute(ScanRequest::new(identifiers)).await;

    // Format: CLI flag wins, then config file, then the table default
    let output_format = args
        .format
        .or_else(|| config.format.as_deref().and_then(|f| f.parse().ok()))
        .unwrap_or(OutputFormat::Table);

    eprintln!("{}", output_format.progress_message());

    let to_file = args.output.is_some();
    let colored = !to_file && std::io::stdout().is_terminal();
    let formatter = output_format.create_formatter(colored);
    let formatted_output = formatter.format(&report)?;

    // Present output
    let presenter: Box<dyn OutputPresenter> = if let Some(output_path) = args.output {
        Box::new(FileSystemWriter::new(PathBuf::from(output_path)))
    } else {
        Box::new(StdoutPresenter::new())
    };
    presenter.present(&formatted_output)?;

    // Trust gate: CLI flag wins over config
    let min_score = args.min_score.or(config.min_score);
    Ok(evaluate_threshold(min_score, report.lowest_score()))
}

/// Maps the lowest observed trust score against the configured gate.
fn evaluate_threshold(min_score: Option<u8>, lowest: Option<u8>) -> ExitCode {
    match (min_score, lowest) {
        (Some(threshold), Some(lowest)) if lowest < threshold => ExitCode::LowTrustDetected,
        _ => ExitCode::Success,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_not_configured_is_success() {
        assert_eq!(evaluate_threshold(None, Some(0)), ExitCode::Success);
    }

    #[test]
    fn test_threshold_breached() {
        assert_eq!(
            evaluate_threshold(Some(50), Some(42)),
            ExitCode::LowTrustDetected
        );
    }

    #[test]
    fn test_threshold_met_exactly() {
        assert_eq!(evaluate_threshold(Some(50), Some(50)), ExitCode::Success);
    }

    #[test]
    fn test_threshold_with_empty_scan() {
        assert_eq!(evaluate_threshold(Some(50), None), ExitCode::Success);
    }
}
