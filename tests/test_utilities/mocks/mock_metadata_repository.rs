use std::collections::HashMap;

use async_trait::async_trait;
use pkgtrust::prelude::*;

/// Mock MetadataRepository for testing
pub struct MockMetadataRepository {
    records: HashMap<String, PackageMetadata>,
    unavailable: bool,
}

impl MockMetadataRepository {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            unavailable: false,
        }
    }

    pub fn with_metadata(mut self, name: &str, metadata: PackageMetadata) -> Self {
        self.records.insert(name.to_string(), metadata);
        self
    }

    /// A repository where every registry is unreachable.
    pub fn unavailable() -> Self {
        Self {
            records: HashMap::new(),
            unavailable: true,
        }
    }
}

impl Default for MockMetadataRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataRepository for MockMetadataRepository {
    async fn fetch_metadata(&self, identifier: &PackageIdentifier) -> Fetched<PackageMetadata> {
        if self.unavailable {
            return Fetched::Unavailable;
        }
        match self.records.get(identifier.name()) {
            Some(metadata) => Fetched::Available(metadata.clone()),
            None => Fetched::Available(PackageMetadata::named(identifier.name().to_string())),
        }
    }
}
