use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Maximum manifest file size (10 MB)
/// This prevents DoS attacks via excessively large files
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Validates that a path exists and is a regular file (not a directory or symlink)
///
/// # Security
/// Uses `symlink_metadata()` instead of `metadata()` so the symlink itself
/// is checked, not the target it points to.
///
/// # Arguments
/// * `path` - The path to validate
/// * `file_description` - Description of the file (e.g., "package.json") for error messages
///
/// # Errors
/// Returns an error if:
/// - The path doesn't exist
/// - The path is a symbolic link
/// - The path is not a regular file
/// - The file exceeds `MAX_FILE_SIZE`
pub fn validate_regular_file(path: &Path, file_description: &str) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to read {} metadata for {}: {}",
            file_description,
            path.display(),
            e
        )
    })?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} is a symbolic link. For security reasons, reading symbolic links is not allowed.",
            path.display()
        );
    }

    if !metadata.is_file() {
        anyhow::bail!(
            "{} is not a regular file: {}",
            file_description,
            path.display()
        );
    }

    if metadata.len() > MAX_FILE_SIZE {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed: {} bytes",
            path.display(),
            metadata.len(),
            MAX_FILE_SIZE
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_regular_file_passes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package.json");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(f, "{{}}").unwrap();

        assert!(validate_regular_file(&path, "package.json").is_ok());
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.txt");
        assert!(validate_regular_file(&path, "requirements.txt").is_err());
    }

    #[test]
    fn test_directory_fails() {
        let dir = TempDir::new().unwrap();
        let result = validate_regular_file(dir.path(), "manifest");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("not a regular file"));
    }
}
