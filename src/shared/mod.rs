/// Shared utilities and error types used across all layers.
pub mod error;
pub mod fetched;
pub mod result;
pub mod security;

pub use error::{ExitCode, TrustError};
pub use fetched::Fetched;
pub use result::Result;
