//! # Document Sink
//!
//! Where finished PDFs are written. This is the only blocking step of the
//! pipeline, so it is async and lives behind a trait.
//!
//! ```text
//! QuotationEngine ──► DocumentSink::write("Quotation_1042.pdf", bytes)
//!                         │
//!                         ├── FsDocumentSink      <cache_dir>/Quotation_1042.pdf
//!                         └── MemoryDocumentSink  in-memory map (tests, previews)
//! ```
//!
//! Writing a name that already exists replaces the old file.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::fs;
use tracing::debug;

use crate::error::{SinkError, SinkResult};

/// File name for a quotation number: `Quotation_<number>.pdf`.
///
/// Anything other than ASCII letters, digits, `-` and `.` in the number is
/// replaced by `_`, so a number can never name a path outside the sink.
pub fn file_name_for(quotation_number: &str) -> String {
    let safe: String = quotation_number
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    // A bare ".." would survive the filter above.
    let safe = safe.replace("..", "__");
    format!("Quotation_{}.pdf", safe)
}

/// Destination for finished documents.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Stores `bytes` under `file_name`, replacing any previous document of
    /// that name, and returns where it went.
    async fn write(&self, file_name: &str, bytes: &[u8]) -> SinkResult<PathBuf>;
}

fn check_name(file_name: &str) -> SinkResult<()> {
    let plain = Path::new(file_name)
        .file_name()
        .map(|n| n == file_name)
        .unwrap_or(false);
    if file_name.is_empty() || !plain {
        return Err(SinkError::InvalidName(file_name.to_string()));
    }
    Ok(())
}

// =============================================================================
// File System Sink
// =============================================================================

/// Writes documents into one directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct FsDocumentSink {
    dir: PathBuf,
}

impl FsDocumentSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FsDocumentSink { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DocumentSink for FsDocumentSink {
    async fn write(&self, file_name: &str, bytes: &[u8]) -> SinkResult<PathBuf> {
        check_name(file_name)?;

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| SinkError::CreateDir {
                path: self.dir.clone(),
                source,
            })?;

        let path = self.dir.join(file_name);
        fs::write(&path, bytes)
            .await
            .map_err(|source| SinkError::Write {
                path: path.clone(),
                source,
            })?;

        debug!(?path, bytes = bytes.len(), "Document written");
        Ok(path)
    }
}

// =============================================================================
// In-Memory Sink
// =============================================================================

/// Keeps documents in memory. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentSink {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryDocumentSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes stored under `file_name`.
    pub fn get(&self, file_name: &str) -> Option<Vec<u8>> {
        self.lock().get(file_name).cloned()
    }

    /// Stored file names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        // A panic while holding the lock cannot leave the map half-updated.
        self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl DocumentSink for MemoryDocumentSink {
    async fn write(&self, file_name: &str, bytes: &[u8]) -> SinkResult<PathBuf> {
        check_name(file_name)?;
        self.lock().insert(file_name.to_string(), bytes.to_vec());
        Ok(PathBuf::from(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_for() {
        assert_eq!(file_name_for("1042"), "Quotation_1042.pdf");
        assert_eq!(file_name_for("QT/2024/07"), "Quotation_QT_2024_07.pdf");
        assert_eq!(file_name_for("../etc"), "Quotation____etc.pdf");
        assert_eq!(file_name_for("Q 1:2"), "Quotation_Q_1_2.pdf");
    }

    #[tokio::test]
    async fn test_fs_sink_creates_dir_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FsDocumentSink::new(dir.path().join("cache"));

        let path = sink.write("Quotation_1042.pdf", b"first").await.unwrap();
        assert_eq!(path, dir.path().join("cache").join("Quotation_1042.pdf"));

        let again = sink.write("Quotation_1042.pdf", b"second").await.unwrap();
        assert_eq!(again, path);
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_rejects_path_names() {
        let sink = MemoryDocumentSink::new();
        for bad in ["", "../x.pdf", "a/b.pdf"] {
            assert!(matches!(
                sink.write(bad, b"%PDF").await,
                Err(SinkError::InvalidName(_))
            ));
        }
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_memory_sink_shares_storage() {
        let sink = MemoryDocumentSink::new();
        let clone = sink.clone();
        clone.write("Quotation_1.pdf", b"%PDF-1.4").await.unwrap();

        assert_eq!(sink.len(), 1);
        assert_eq!(sink.names(), vec!["Quotation_1.pdf".to_string()]);
        assert_eq!(sink.get("Quotation_1.pdf").unwrap(), b"%PDF-1.4");
    }
}
