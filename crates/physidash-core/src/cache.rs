//! Fallback cache
//!
//! A single JSON file holding the last successfully fetched copy of the
//! backing document. The refresh pipeline writes through on every successful
//! fetch and reads back only when the primary retrieval fails with a
//! transport error.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

use crate::config::Config;
use crate::models::DatasetRecord;

/// Errors that can occur when writing the cache
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to create the cache directory
    #[error("Failed to create cache directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write the cache file
    #[error("Failed to write cache file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to serialize records
    #[error("Failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The local persistent slot for the last good document copy
#[derive(Debug, Clone)]
pub struct FallbackCache {
    path: PathBuf,
}

impl FallbackCache {
    /// Cache for the configured data directory
    pub fn new(config: &Config) -> Self {
        Self {
            path: config.cache_path(),
        }
    }

    /// Cache at an explicit path (for tests)
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the cache file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached copy, if one exists and parses
    ///
    /// A missing file is the normal first-run state. A corrupt file is
    /// tolerated (logged, treated as absent) so a bad write can never wedge
    /// the dashboard.
    pub fn load(&self) -> Option<Vec<DatasetRecord>> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(records) => Some(records),
            Err(e) => {
                warn!("Ignoring corrupt cache file {:?}: {}", self.path, e);
                None
            }
        }
    }

    /// Store a fresh copy of the document
    pub fn store(&self, records: &[DatasetRecord]) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| CacheError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(records)?;
        std::fs::write(&self.path, content).map_err(|source| CacheError::Write {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FallbackCache::at_path(dir.path().join("physionet_curated.json"));
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_store_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FallbackCache::at_path(dir.path().join("physionet_curated.json"));

        let records = vec![
            DatasetRecord::new(1, "MIT-BIH Arrhythmia Database"),
            DatasetRecord::new(2, "PTB-XL"),
        ];
        cache.store(&records).unwrap();

        let loaded = cache.load().unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_store_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FallbackCache::at_path(dir.path().join("nested").join("cache.json"));

        cache.store(&[DatasetRecord::new(1, "Test")]).unwrap();
        assert!(cache.load().is_some());
    }

    #[test]
    fn test_corrupt_cache_treated_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("physionet_curated.json");
        std::fs::write(&path, "{ not json").unwrap();

        let cache = FallbackCache::at_path(&path);
        assert!(cache.load().is_none());
    }
}
