//! Key comparators: plain lexical order and fixed root-key priority

use std::cmp::Ordering;

/// Root keys of a Kubernetes manifest, in their conventional order.
pub const K8S_ROOT_KEY_ORDER: [&str; 6] = ["apiVersion", "kind", "metadata", "spec", "data", "status"];

/// Priority list for the keys of the root mapping.
///
/// Listed keys come first, in list order; all other keys follow in lexical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootKeyOrder {
    keys: Vec<String>,
}

impl Default for RootKeyOrder {
    fn default() -> Self {
        Self::new(K8S_ROOT_KEY_ORDER)
    }
}

impl RootKeyOrder {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match (self.position(a), self.position(b)) {
            (Some(ia), Some(ib)) => ia.cmp(&ib),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.cmp(b),
        }
    }
}

/// Ordering policy selected for one mapping.
#[derive(Debug, Clone, Copy)]
pub enum KeyOrdering<'a> {
    Lexical,
    Fixed(&'a RootKeyOrder),
}

impl KeyOrdering<'_> {
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match self {
            KeyOrdering::Lexical => a.cmp(b),
            KeyOrdering::Fixed(order) => order.compare(a, b),
        }
    }
}
