//! Position of a node below the document root

use std::fmt;

/// Mapping-key segments from the document root down to a node.
///
/// Paths are values: `child` returns a new path and leaves `self` untouched,
/// so sibling subtrees never observe each other's suffixes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath {
    segments: Vec<String>,
}

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(segment.into());
        Self { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Dot-joined form used to look up list sort rules, e.g. `spec.egress`.
    pub fn joined(&self) -> String {
        self.segments.join(".")
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}
