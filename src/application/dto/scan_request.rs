use crate::analysis::domain::PackageIdentifier;

/// Request DTO for a scan invocation.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    /// Packages to analyze, in the order results should be returned.
    pub identifiers: Vec<PackageIdentifier>,
}

impl ScanRequest {
    pub fn new(identifiers: Vec<PackageIdentifier>) -> Self {
        Self { identifiers }
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }
}
