//! Normalize the key order of YAML documents.
//!
//! Mapping keys are sorted alphabetically at every depth. Optionally the root
//! mapping follows a fixed key order (Kubernetes manifests), and lists at
//! configured paths are ordered by a field of their elements.
//!
//! ```ignore
//! let sorted = yaml_sort::sort_yaml(b"c: 3\na: 1\nb: 2\n")?;
//! assert_eq!(sorted, b"a: 1\nb: 2\nc: 3\n");
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

use std::sync::Arc;

pub use application::{ApplicationError, ApplicationResult};
pub use domain::SortOptions;

use application::services::SortService;
use infrastructure::traits::RealFileSystem;
use infrastructure::yaml::YamlCodec;

fn service() -> SortService {
    SortService::new(Arc::new(RealFileSystem), Arc::new(YamlCodec))
}

/// Parse `raw`, sort it according to `options` and render it again.
pub fn sort_document(raw: &[u8], options: &SortOptions) -> ApplicationResult<Vec<u8>> {
    service().sort_bytes(raw, options)
}

/// Sort all mapping keys alphabetically.
pub fn sort_yaml(raw: &[u8]) -> ApplicationResult<Vec<u8>> {
    sort_document(raw, &SortOptions::default())
}

/// Like [`sort_yaml`], but root keys follow the Kubernetes order
/// (apiVersion, kind, metadata, spec, data, status).
pub fn sort_yaml_k8s(raw: &[u8]) -> ApplicationResult<Vec<u8>> {
    sort_document(raw, &SortOptions::k8s())
}
