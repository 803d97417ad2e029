//! Source identifiers and the cache keys derived from them

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Identifies the input of an analysis request: `file:<filename>` or
/// `url:<url>`.
///
/// Requests with equal identifiers are treated as identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceId(String);

impl SourceId {
    pub fn file(filename: &str) -> Self {
        Self(format!("file:{filename}"))
    }

    pub fn url(url: &str) -> Self {
        Self(format!("url:{url}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Cache key for this source.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::for_source(self)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lowercase hex SHA-256 of a [`SourceId`]; names the cache record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn for_source(source: &SourceId) -> Self {
        Self(hex::encode(Sha256::digest(source.as_str().as_bytes())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the cache record.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
