//! Sort service
//!
//! Parses raw bytes into a document, runs the tree sorter and renders the
//! result. File-level helpers add reading and writing on top.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{SortOptions, TreeSorter};
use crate::infrastructure::traits::{DocumentCodec, FileSystem};

/// Where sorted output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Caller prints the returned bytes.
    Stdout,
    /// Overwrite the input file.
    InPlace,
    File(PathBuf),
}

/// Service for sorting YAML documents.
pub struct SortService {
    fs: Arc<dyn FileSystem>,
    codec: Arc<dyn DocumentCodec>,
}

impl SortService {
    /// Create a new sort service.
    pub fn new(fs: Arc<dyn FileSystem>, codec: Arc<dyn DocumentCodec>) -> Self {
        Self { fs, codec }
    }

    /// Sort one raw document. Nothing is returned on failure.
    #[instrument(level = "debug", skip_all, fields(bytes = raw.len(), fixed_root = options.fixed_root_order))]
    pub fn sort_bytes(&self, raw: &[u8], options: &SortOptions) -> ApplicationResult<Vec<u8>> {
        let mut doc = self.codec.parse(raw)?;
        TreeSorter::new(options).sort_document(&mut doc);
        let rendered = self.codec.render(&doc)?;
        debug!("sort_bytes: rendered {} bytes", rendered.len());
        Ok(rendered)
    }

    /// Sort the file at `input` and deliver the result to `destination`.
    ///
    /// Returns the sorted bytes in every mode; only `InPlace` and `File`
    /// touch the filesystem.
    #[instrument(level = "debug", skip(self, options))]
    pub fn sort_file(
        &self,
        input: &Path,
        destination: &Destination,
        options: &SortOptions,
    ) -> ApplicationResult<Vec<u8>> {
        if !self.fs.exists(input) {
            return Err(ApplicationError::FileNotFound(input.to_path_buf()));
        }
        let raw = self.fs.read(input).with_path_context("read input file", input)?;
        let sorted = self.sort_bytes(&raw, options)?;

        match destination {
            Destination::Stdout => {}
            Destination::InPlace => {
                self.fs
                    .write(input, &sorted)
                    .with_path_context("write file", input)?;
            }
            Destination::File(output) => {
                self.fs
                    .write(output, &sorted)
                    .with_path_context("write output file", output)?;
            }
        }
        Ok(sorted)
    }
}
