/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (registries, advisory databases,
/// console, file system).
pub mod advisory_source;
pub mod description_generator;
pub mod download_stats;
pub mod metadata_repository;
pub mod output_presenter;
pub mod progress_reporter;
pub mod report_formatter;
pub mod repository_stats;
pub mod vulnerability_aggregator;

pub use advisory_source::AdvisorySource;
pub use description_generator::DescriptionGenerator;
pub use download_stats::DownloadStatsRepository;
pub use metadata_repository::MetadataRepository;
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
pub use report_formatter::ReportFormatter;
pub use repository_stats::RepositoryStatsRepository;
pub use vulnerability_aggregator::VulnerabilityAggregator;
