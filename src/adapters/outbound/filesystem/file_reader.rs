use std::fs;
use std::path::Path;

use crate::shared::security::validate_regular_file;
use crate::shared::{Result, TrustError};

/// FileSystemReader adapter for reading manifest files
///
/// Validates the target is a regular, reasonably-sized file before reading
/// (no symlinks, no directories) and maps I/O failures to [`TrustError`].
pub struct FileSystemReader;

impl FileSystemReader {
    pub fn new() -> Self {
        Self
    }

    /// Reads a manifest file to a string
    ///
    /// # Arguments
    /// * `path` - Path to the manifest file
    ///
    /// # Errors
    /// Returns an error if the file is missing, not a regular file, or
    /// unreadable.
    pub fn read_manifest(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(TrustError::ManifestNotFound {
                path: path.to_path_buf(),
                suggestion: "Pass the path to a package.json, requirements.txt or Dockerfile"
                    .to_string(),
            }
            .into());
        }

        validate_regular_file(path, "manifest")?;

        fs::read_to_string(path).map_err(|e| {
            TrustError::FileReadError {
                path: path.to_path_buf(),
                details: e.to_string(),
            }
            .into()
        })
    }
}

impl Default for FileSystemReader {
    fn default() -> Self {
        Self::new()
    }
}
