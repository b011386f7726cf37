//! Path-aware recursive tree sorter
//!
//! Mapping keys are ordered lexically, except the root mapping which may follow
//! a fixed priority list. Sequences keep their order unless a list sort rule
//! names their path; then elements are ordered by one field of each element.

use std::borrow::Cow;
use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::domain::order::{KeyOrdering, RootKeyOrder};
use crate::domain::path::NodePath;
use crate::domain::{Document, Entry, Node};

/// Options for one sort run. Read-only while sorting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortOptions {
    /// Order root keys by `root_key_order` instead of lexically.
    pub fixed_root_order: bool,
    pub root_key_order: RootKeyOrder,
    /// Dot-joined path -> field name to order that sequence's elements by.
    pub list_sort_keys: BTreeMap<String, String>,
}

impl SortOptions {
    /// Kubernetes manifest mode with the default root key order.
    pub fn k8s() -> Self {
        Self {
            fixed_root_order: true,
            ..Self::default()
        }
    }

    pub fn with_list_sort_key(mut self, path: impl Into<String>, key: impl Into<String>) -> Self {
        self.list_sort_keys.insert(path.into(), key.into());
        self
    }

    pub fn with_root_key_order(mut self, order: RootKeyOrder) -> Self {
        self.root_key_order = order;
        self
    }
}

/// Sorts a document tree in place according to [`SortOptions`].
#[derive(Debug, Clone, Copy)]
pub struct TreeSorter<'a> {
    options: &'a SortOptions,
}

impl<'a> TreeSorter<'a> {
    pub fn new(options: &'a SortOptions) -> Self {
        Self { options }
    }

    pub fn sort_document(&self, doc: &mut Document) {
        self.sort(&mut doc.root);
    }

    /// Sort `node` as if it were the document root.
    pub fn sort(&self, node: &mut Node) {
        self.visit(node, &NodePath::root());
    }

    fn visit(&self, node: &mut Node, path: &NodePath) {
        match node {
            Node::Scalar(_) => {}
            Node::Tagged { value, .. } => self.visit(value, path),
            Node::Sequence(items) => self.sort_sequence(items, path),
            Node::Mapping(entries) => self.sort_mapping(entries, path),
        }
    }

    fn sort_sequence(&self, items: &mut [Node], path: &NodePath) {
        let joined = path.joined();
        if let Some(field) = self.options.list_sort_keys.get(&joined) {
            debug!(path = %joined, field = %field, len = items.len(), "sorting list by field");
            items.sort_by_cached_key(|item| field_value(item, field).into_owned());
        }
        for item in items.iter_mut() {
            self.visit(item, path);
        }
    }

    fn sort_mapping(&self, entries: &mut [Entry], path: &NodePath) {
        trace!(path = %path, len = entries.len(), "sorting mapping");
        for entry in entries.iter_mut() {
            normalize_complex_key(&mut entry.key);
            let child = path.child(entry.key.key_text());
            self.visit(&mut entry.value, &child);
        }

        let ordering = if path.is_root() && self.options.fixed_root_order {
            KeyOrdering::Fixed(&self.options.root_key_order)
        } else {
            KeyOrdering::Lexical
        };
        entries.sort_by(|a, b| ordering.compare(&a.key.key_text(), &b.key.key_text()));
    }
}

/// Complex keys are compared by their flow rendering, so their own content is
/// put into lexical order first. List rules never apply inside a key.
fn normalize_complex_key(key: &mut Node) {
    if key.as_scalar().is_some() {
        return;
    }
    let plain = SortOptions::default();
    TreeSorter::new(&plain).visit(key, &NodePath::root().child(""));
}

/// Lexical value of `field` in a mapping element, or `""` when the element is
/// not a mapping, lacks the field, or holds a non-scalar there.
pub fn field_value<'n>(node: &'n Node, field: &str) -> Cow<'n, str> {
    match node.get(field).and_then(Node::as_scalar) {
        Some(scalar) => Cow::Borrowed(scalar.text()),
        None => Cow::Borrowed(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Scalar, ScalarStyle};

    fn s(v: &str) -> Node {
        Node::string(v)
    }

    fn keys(node: &Node) -> Vec<String> {
        node.as_mapping()
            .expect("mapping")
            .iter()
            .map(|e| e.key.key_text().into_owned())
            .collect()
    }

    #[test]
    fn given_unsorted_mapping_when_sorting_then_keys_lexical() {
        let mut node = Node::mapping([("c", s("3")), ("a", s("1")), ("b", s("2"))]);
        TreeSorter::new(&SortOptions::default()).sort(&mut node);
        assert_eq!(keys(&node), ["a", "b", "c"]);
    }

    #[test]
    fn given_nested_mapping_in_sequence_when_sorting_then_sequence_order_kept() {
        let mut node = Node::mapping([(
            "items",
            Node::Sequence(vec![
                Node::mapping([("z", s("1")), ("y", s("2"))]),
                Node::mapping([("b", s("1")), ("a", s("2"))]),
            ]),
        )]);
        TreeSorter::new(&SortOptions::default()).sort(&mut node);

        let Node::Sequence(items) = node.get("items").unwrap() else {
            panic!("expected sequence");
        };
        assert_eq!(keys(&items[0]), ["y", "z"]);
        assert_eq!(keys(&items[1]), ["a", "b"]);
    }

    #[test]
    fn given_fixed_root_order_when_sorting_then_only_root_uses_priority() {
        let mut node = Node::mapping([
            ("spec", Node::mapping([("kind", s("x")), ("apiVersion", s("y"))])),
            ("kind", s("Pod")),
            ("apiVersion", s("v1")),
        ]);
        TreeSorter::new(&SortOptions::k8s()).sort(&mut node);

        assert_eq!(keys(&node), ["apiVersion", "kind", "spec"]);
        assert_eq!(keys(node.get("spec").unwrap()), ["apiVersion", "kind"]);
    }

    #[test]
    fn given_list_rule_when_sorting_then_elements_ordered_by_field() {
        let mut node = Node::mapping([(
            "rules",
            Node::Sequence(vec![
                Node::mapping([("name", s("b"))]),
                Node::mapping([("other", s("x"))]),
                Node::mapping([("name", s("a"))]),
            ]),
        )]);
        let options = SortOptions::default().with_list_sort_key("rules", "name");
        TreeSorter::new(&options).sort(&mut node);

        let Node::Sequence(items) = node.get("rules").unwrap() else {
            panic!("expected sequence");
        };
        let names: Vec<_> = items.iter().map(|i| field_value(i, "name")).collect();
        assert_eq!(names, ["", "a", "b"]);
    }

    #[test]
    fn given_equal_field_values_when_sorting_list_then_original_order_kept() {
        let element = |name: &str, id: &str| Node::mapping([("name", s(name)), ("id", s(id))]);
        let mut node = Node::Sequence(vec![
            element("same", "1"),
            element("same", "2"),
            element("first", "3"),
            element("same", "4"),
        ]);
        let options = SortOptions::default().with_list_sort_key("", "name");
        TreeSorter::new(&options).sort(&mut node);

        let Node::Sequence(items) = &node else {
            panic!("expected sequence");
        };
        let ids: Vec<_> = items.iter().map(|i| field_value(i, "id")).collect();
        assert_eq!(ids, ["3", "1", "2", "4"]);
    }

    #[test]
    fn given_sequence_elements_when_sorting_then_path_not_extended() {
        // spec.ports is a list nested inside a list element under spec.containers
        let container = |name: &str| {
            Node::mapping([
                ("name", s(name)),
                (
                    "ports",
                    Node::Sequence(vec![
                        Node::mapping([("port", s("9090"))]),
                        Node::mapping([("port", s("8080"))]),
                    ]),
                ),
            ])
        };
        let mut node = Node::mapping([(
            "spec",
            Node::mapping([("containers", Node::Sequence(vec![container("b"), container("a")]))]),
        )]);
        let options = SortOptions::default()
            .with_list_sort_key("spec.containers", "name")
            .with_list_sort_key("spec.containers.ports", "port");
        TreeSorter::new(&options).sort(&mut node);

        let containers = node.get("spec").and_then(|n| n.get("containers")).unwrap();
        let Node::Sequence(items) = containers else {
            panic!("expected sequence");
        };
        assert_eq!(field_value(&items[0], "name"), "a");
        let Node::Sequence(ports) = items[0].get("ports").unwrap() else {
            panic!("expected sequence");
        };
        assert_eq!(field_value(&ports[0], "port"), "8080");
    }

    #[test]
    fn given_non_mapping_or_nested_field_when_extracting_then_empty() {
        assert_eq!(field_value(&s("plain"), "name"), "");
        let nested = Node::mapping([("name", Node::mapping([("first", s("x"))]))]);
        assert_eq!(field_value(&nested, "name"), "");
    }

    #[test]
    fn given_quoted_field_when_extracting_then_text_without_quotes() {
        let node = Node::Mapping(vec![Entry::new(
            s("priority"),
            Node::Scalar(Scalar::new(ScalarStyle::SingleQuoted, "10")),
        )]);
        assert_eq!(field_value(&node, "priority"), "10");
    }

    #[test]
    fn given_duplicate_keys_when_sorting_then_both_kept_in_source_order() {
        let mut node = Node::mapping([("b", s("1")), ("a", s("2")), ("b", s("3"))]);
        TreeSorter::new(&SortOptions::default()).sort(&mut node);

        let values: Vec<_> = node
            .as_mapping()
            .unwrap()
            .iter()
            .map(|e| format!("{}={}", e.key, e.value))
            .collect();
        assert_eq!(values, ["a=2", "b=1", "b=3"]);
    }

    #[test]
    fn given_complex_keys_when_sorting_then_keys_normalized_and_ordered() {
        let mut node = Node::Mapping(vec![
            Entry::new(Node::mapping([("b", s("1")), ("a", s("2"))]), s("x")),
            Entry::new(Node::Sequence(vec![s("1")]), s("y")),
        ]);
        TreeSorter::new(&SortOptions::default()).sort(&mut node);

        assert_eq!(keys(&node), ["[1]", "{a: 2, b: 1}"]);
    }

    #[test]
    fn given_tagged_mapping_when_sorting_then_sorted_through_tag() {
        let mut node = Node::Tagged {
            tag: "!Custom".into(),
            value: Box::new(Node::mapping([("b", s("1")), ("a", s("2"))])),
        };
        TreeSorter::new(&SortOptions::default()).sort(&mut node);
        assert_eq!(keys(&node), ["a", "b"]);
    }

    #[test]
    fn given_sorted_tree_when_sorting_again_then_unchanged() {
        let mut node = Node::mapping([
            ("status", s("ok")),
            ("metadata", Node::mapping([("name", s("x")), ("labels", s("y"))])),
            ("kind", s("Service")),
        ]);
        let options = SortOptions::k8s();
        let sorter = TreeSorter::new(&options);
        sorter.sort(&mut node);
        let once = node.clone();
        sorter.sort(&mut node);
        assert_eq!(node, once);
    }
}
