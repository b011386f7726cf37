//! Domain layer: document tree and the sorting rules applied to it
//!
//! This layer is independent of external concerns (no I/O, no YAML library, no CLI).

pub mod error;
pub mod node;
pub mod order;
pub mod path;
pub mod sorter;

pub use error::DomainError;
pub use node::{write_double_quoted, Document, Entry, Node, Scalar, ScalarStyle};
pub use order::{KeyOrdering, RootKeyOrder, K8S_ROOT_KEY_ORDER};
pub use path::NodePath;
pub use sorter::{field_value, SortOptions, TreeSorter};
