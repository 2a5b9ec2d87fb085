//! Memoization of normalized rosters and CSV extracts, keyed by content hash.

use crate::data::export::{ExportError, InstructorCsv};
use crate::data::{ProcessorError, RosterProcessor};
use crate::stats::InstructorAggregate;
use parking_lot::Mutex;
use polars::prelude::DataFrame;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// SHA-256 of `bytes` as lowercase hex.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Normalized rosters keyed by the digest of their raw source bytes.
#[derive(Default)]
pub struct NormalizeCache {
    entries: Mutex<HashMap<String, Arc<DataFrame>>>,
}

impl NormalizeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached normalized table for `digest`, normalizing `raw` on
    /// a miss.
    pub fn get_or_normalize(
        &self,
        digest: &str,
        raw: &DataFrame,
    ) -> Result<Arc<DataFrame>, ProcessorError> {
        if let Some(hit) = self.entries.lock().get(digest) {
            debug!(%digest, "normalize cache hit");
            return Ok(Arc::clone(hit));
        }

        // Normalize outside the lock; the two terms run in parallel.
        let normalized = Arc::new(RosterProcessor::normalize(raw)?);
        let entry = self
            .entries
            .lock()
            .entry(digest.to_string())
            .or_insert(normalized)
            .clone();
        Ok(entry)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Encoded CSV extracts keyed by the digest of the rows they encode.
#[derive(Default)]
pub struct CsvCache {
    entries: Mutex<HashMap<String, Arc<Vec<u8>>>>,
}

impl CsvCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_encode(&self, rows: &[InstructorAggregate]) -> Result<Arc<Vec<u8>>, ExportError> {
        let digest = content_hash(&serde_json::to_vec(rows)?);

        let mut entries = self.entries.lock();
        if let Some(hit) = entries.get(&digest) {
            debug!(%digest, "csv cache hit");
            return Ok(Arc::clone(hit));
        }

        let encoded = Arc::new(InstructorCsv::encode(rows)?);
        entries.insert(digest, Arc::clone(&encoded));
        Ok(encoded)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }
}
