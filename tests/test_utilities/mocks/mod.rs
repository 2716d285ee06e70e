mod mock_advisory_source;
mod mock_metadata_repository;
mod mock_progress_reporter;
mod mock_stats;

pub use mock_advisory_source::MockAdvisorySource;
pub use mock_metadata_repository::MockMetadataRepository;
pub use mock_progress_reporter::MockProgressReporter;
pub use mock_stats::{MockDownloadStats, MockRepositoryStats, PanickingDownloadStats};
