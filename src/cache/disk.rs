//! Content-addressed on-disk result cache.
//!
//! One JSON file per source: `<dir>/<sha256(source)>.json`. Records are
//! created on the first successful model call and read afterwards. Nothing
//! here expires or deletes them.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use crate::telemetry;
use crate::types::{ModelResult, SourceId};
use crate::{Result, ScannerError};

/// Default cache directory, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = "cache";

/// Disk-backed map from [`SourceId`] to [`ModelResult`].
#[derive(Debug, Clone)]
pub struct ResultCache {
    dir: PathBuf,
}

impl ResultCache {
    /// Open a cache rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            ScannerError::Configuration(format!("failed to create cache dir {dir:?}: {e}"))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record for `source`, whether or not it exists.
    pub fn record_path(&self, source: &SourceId) -> PathBuf {
        self.dir.join(source.cache_key().file_name())
    }

    /// Look up the record for `source`.
    ///
    /// Missing, empty and unparseable records are all misses; a corrupt
    /// record is never an error.
    pub async fn lookup(&self, source: &SourceId) -> Option<ModelResult> {
        let found = self.peek(source).await;

        if found.is_some() {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
            debug!(%source, "cache hit");
        } else {
            metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
            debug!(%source, "cache miss");
        }
        found
    }

    /// [`lookup`](Self::lookup) without hit/miss accounting.
    pub(crate) async fn peek(&self, source: &SourceId) -> Option<ModelResult> {
        read_record(&self.record_path(source)).await
    }

    /// Write (or overwrite) the record for `source`.
    pub async fn store(&self, source: &SourceId, result: &ModelResult) -> Result<()> {
        let path = self.record_path(source);
        let body = serde_json::to_vec(result)?;

        tokio::fs::create_dir_all(&self.dir).await?;

        // Readers never see a partial record: write aside, then rename.
        let staging = staging_path(&path);
        if let Err(e) = write_then_rename(&staging, &path, &body).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(e.into());
        }
        debug!(%source, path = %path.display(), "cache record written");
        Ok(())
    }
}

/// Unique sibling of `path` in the same directory.
fn staging_path(path: &Path) -> PathBuf {
    let seq = STAGING_SEQ.fetch_add(1, Ordering::Relaxed);
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{}.{seq}.tmp", std::process::id()));
    path.with_file_name(name)
}

static STAGING_SEQ: AtomicU64 = AtomicU64::new(0);

async fn write_then_rename(staging: &Path, path: &Path, body: &[u8]) -> std::io::Result<()> {
    tokio::fs::write(staging, body).await?;
    tokio::fs::rename(staging, path).await
}

async fn read_record(path: &Path) -> Option<ModelResult> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unreadable cache record, treating as miss");
            return None;
        }
    };

    if bytes.is_empty() {
        return None;
    }

    match serde_json::from_slice(&bytes) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt cache record, treating as miss");
            None
        }
    }
}
