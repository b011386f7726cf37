//! Document tree: a closed set of node kinds with order-preserving mappings

use std::borrow::Cow;
use std::fmt;
use std::fmt::Write as _;

use crate::domain::DomainError;

/// How a scalar was written in the source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScalarStyle {
    #[default]
    Plain,
    SingleQuoted,
    DoubleQuoted,
    /// `|` block
    Literal,
    /// `>` block
    Folded,
}

/// Scalar leaf: the text as written (quotes and escapes resolved) plus its style.
///
/// The text is the sort comparand. No type resolution happens, so `~`, `0x9`
/// and `1.10` compare and render exactly as they appear in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scalar {
    style: ScalarStyle,
    text: String,
}

impl Scalar {
    pub fn new(style: ScalarStyle, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(ScalarStyle::Plain, text)
    }

    pub fn style(&self) -> ScalarStyle {
        self.style
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Plain scalar with no content, as in `key:` or a bare `-`.
    pub fn is_empty_plain(&self) -> bool {
        self.style == ScalarStyle::Plain && self.text.is_empty()
    }
}

/// One key/value pair of a mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: Node,
    pub value: Node,
}

impl Entry {
    pub fn new(key: Node, value: Node) -> Self {
        Self { key, value }
    }
}

/// A node of the parsed document tree.
///
/// Mappings hold typed pairs, so a mapping can never carry an odd number of
/// child slots. Duplicate keys are kept as separate entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Scalar(Scalar),
    Mapping(Vec<Entry>),
    Sequence(Vec<Node>),
    /// Explicitly tagged node (`!Ref foo`). Transparent for sorting.
    Tagged { tag: String, value: Box<Node> },
}

impl Node {
    /// Plain scalar node.
    pub fn string(s: impl Into<String>) -> Self {
        Node::Scalar(Scalar::plain(s))
    }

    /// Build a mapping from string keys, keeping the given order.
    pub fn mapping<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Node)>,
    {
        Node::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| Entry::new(Node::string(k), v))
                .collect(),
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Node::Scalar(_) => "scalar",
            Node::Mapping(_) => "mapping",
            Node::Sequence(_) => "sequence",
            Node::Tagged { .. } => "tagged",
        }
    }

    /// Look through any tags to the underlying node.
    pub fn untagged(&self) -> &Node {
        match self {
            Node::Tagged { value, .. } => value.untagged(),
            other => other,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self.untagged() {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&[Entry]> {
        match self.untagged() {
            Node::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// First value whose key string form equals `field`.
    pub fn get(&self, field: &str) -> Option<&Node> {
        self.as_mapping()?
            .iter()
            .find(|e| e.key.key_text() == field)
            .map(|e| &e.value)
    }

    /// String form of this node when used as a mapping key or path segment.
    ///
    /// Scalars (tagged or not) yield their source text. Complex keys yield
    /// their compact flow rendering, see the `Display` impl.
    pub fn key_text(&self) -> Cow<'_, str> {
        match self.untagged() {
            Node::Scalar(s) => Cow::Borrowed(s.text()),
            complex => Cow::Owned(complex.to_string()),
        }
    }
}

/// Compact flow rendering: `{a: 1, b: [x, y]}`.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Scalar(s) => write_flow_scalar(f, s),
            Node::Mapping(entries) => {
                f.write_str("{")?;
                for (i, e) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", e.key, e.value)?;
                }
                f.write_str("}")
            }
            Node::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Node::Tagged { tag, value } => write!(f, "{} {}", tag, value),
        }
    }
}

/// Flow context forbids block scalars and plain text holding flow indicators.
fn write_flow_scalar(f: &mut fmt::Formatter<'_>, s: &Scalar) -> fmt::Result {
    let text = s.text();
    match s.style() {
        ScalarStyle::Plain if text.is_empty() => f.write_str("~"),
        ScalarStyle::Plain if !text.contains(['\n', ',', '[', ']', '{', '}']) => f.write_str(text),
        ScalarStyle::SingleQuoted if !text.contains('\n') => {
            write!(f, "'{}'", text.replace('\'', "''"))
        }
        _ => write_double_quoted(f, text),
    }
}

/// Double-quoted form with JSON-style escapes.
pub fn write_double_quoted(out: &mut impl fmt::Write, text: &str) -> fmt::Result {
    out.write_char('"')?;
    for c in text.chars() {
        match c {
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            '\n' => out.write_str("\\n")?,
            '\t' => out.write_str("\\t")?,
            '\r' => out.write_str("\\r")?,
            c if c.is_control() => write!(out, "\\u{:04x}", c as u32)?,
            c => out.write_char(c)?,
        }
    }
    out.write_char('"')
}

/// A single YAML document: exactly one root node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub root: Node,
}

impl Document {
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    /// Build a document from the roots found in a stream.
    ///
    /// Exactly one root is accepted: an empty stream has nothing to sort and a
    /// multi-document stream cannot be rewritten as one document.
    pub fn from_roots(mut roots: Vec<Node>) -> Result<Self, DomainError> {
        match roots.len() {
            0 => Err(DomainError::EmptyDocument),
            1 => Ok(Self::new(roots.remove(0))),
            n => Err(DomainError::MultipleDocuments(n)),
        }
    }
}
