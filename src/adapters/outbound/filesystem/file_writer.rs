use std::fs;
use std::path::PathBuf;

use crate::ports::outbound::OutputPresenter;
use crate::shared::{Result, TrustError};

/// FileSystemWriter adapter for writing the report to a file
pub struct FileSystemWriter {
    path: PathBuf,
}

impl FileSystemWriter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl OutputPresenter for FileSystemWriter {
    fn present(&self, content: &str) -> Result<()> {
        fs::write(&self.path, content).map_err(|e| {
            TrustError::FileWriteError {
                path: self.path.clone(),
                details: e.to_string(),
            }
            .into()
        })
    }
}

/// StdoutPresenter adapter for writing the report to standard output
pub struct StdoutPresenter;

impl StdoutPresenter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdoutPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputPresenter for StdoutPresenter {
    fn present(&self, content: &str) -> Result<()> {
        println!("{}", content);
        Ok(())
    }
}
