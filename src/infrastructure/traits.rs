//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations and the YAML document
//! model, allowing services to be tested with substitute implementations.

use std::io::{self, Write};
use std::path::Path;

use crate::application::ApplicationResult;
use crate::domain::Document;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents as raw bytes.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Write content to file, replacing it if present.
    fn write(&self, path: &Path, content: &[u8]) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Document model adapter: raw bytes <-> document tree.
pub trait DocumentCodec: Send + Sync {
    /// Parse a single document. Fails on malformed input or when the stream
    /// does not hold exactly one document.
    fn parse(&self, raw: &[u8]) -> ApplicationResult<Document>;

    /// Render a document back to bytes.
    fn render(&self, doc: &Document) -> ApplicationResult<Vec<u8>>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    /// Existing files are replaced atomically via a sibling temp file and
    /// keep their permissions.
    fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> {
        let metadata = match std::fs::metadata(path) {
            Ok(m) => m,
            Err(_) => return std::fs::write(path, content),
        };
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(content)?;
        tmp.as_file().set_permissions(metadata.permissions())?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
