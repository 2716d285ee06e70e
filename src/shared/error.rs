use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between different
/// types of failures and successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - all packages scored at or above the configured minimum
    Success = 0,
    /// At least one package scored below the configured minimum trust score
    LowTrustDetected = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (manifest parse error, file I/O error, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::LowTrustDetected => write!(f, "Low Trust Detected (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors for trust scanning.
///
/// Uses thiserror to derive Display and Error traits automatically,
/// reducing boilerplate while maintaining user-friendly error messages.
///
/// Transport failures never appear here: fetch adapters degrade to
/// `Fetched::Unavailable` at the boundary instead of raising.
#[derive(Debug, Error)]
pub enum TrustError {
    #[error("Manifest file not found: {path}\n\n💡 Hint: {suggestion}")]
    ManifestNotFound { path: PathBuf, suggestion: String },

    #[error("Failed to parse {format} manifest: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file is a well-formed {format} manifest")]
    ManifestParse {
        path: PathBuf,
        format: String,
        details: String,
    },

    #[error("Could not detect a manifest format for: {path}\n\n💡 Hint: Pass --manifest-format npm|python|docker to select one explicitly")]
    UnknownManifestFormat { path: PathBuf },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },

    /// Validation error for configuration values
    #[error("Validation error: {message}")]
    Validation { message: String },
}
