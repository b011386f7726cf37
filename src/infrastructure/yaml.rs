//! Document model adapter over the `yaml-rust2` event parser
//!
//! Nodes are built directly from parser events, so each scalar keeps the text
//! and style it was written with and mappings keep duplicate keys in source
//! order. Nothing is type-resolved: `~` stays `~` and `0x9` stays `0x9`.
//! Rendering is block style with two-space indentation, written from that text.

use std::collections::HashMap;
use std::fmt::{self, Write as _};

use tracing::debug;
use yaml_rust2::parser::{Event, Parser, Tag};
use yaml_rust2::scanner::{Marker, ScanError, TScalarStyle};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{write_double_quoted, Document, Entry, Node, Scalar, ScalarStyle};
use crate::infrastructure::traits::DocumentCodec;

const INDENT: usize = 2;

/// [`DocumentCodec`] for YAML text.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlCodec;

impl DocumentCodec for YamlCodec {
    fn parse(&self, raw: &[u8]) -> ApplicationResult<Document> {
        let source = std::str::from_utf8(raw).map_err(|e| ApplicationError::Parse {
            message: e.to_string(),
        })?;
        let roots = TreeBuilder::new(source)
            .build()
            .map_err(|e| ApplicationError::Parse {
                message: e.to_string(),
            })?;
        debug!("parse: {} document(s)", roots.len());
        Ok(Document::from_roots(roots)?)
    }

    fn render(&self, doc: &Document) -> ApplicationResult<Vec<u8>> {
        let mut out = String::new();
        Emitter::new(&mut out)
            .document(&doc.root)
            .map_err(|e| ApplicationError::Serialize {
                message: e.to_string(),
            })?;
        Ok(out.into_bytes())
    }
}

/// Collection still receiving children.
enum Frame {
    Sequence {
        anchor: usize,
        tag: Option<String>,
        items: Vec<Node>,
    },
    Mapping {
        anchor: usize,
        tag: Option<String>,
        entries: Vec<Entry>,
        key: Option<Node>,
    },
}

/// Turns the parser's event stream into one [`Node`] per document.
struct TreeBuilder<'s> {
    source: &'s str,
    // markers count chars, not bytes
    chars: Vec<char>,
    stack: Vec<Frame>,
    anchors: HashMap<usize, Node>,
    roots: Vec<Node>,
}

impl<'s> TreeBuilder<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            stack: Vec::new(),
            anchors: HashMap::new(),
            roots: Vec::new(),
        }
    }

    fn build(mut self) -> Result<Vec<Node>, ScanError> {
        let mut parser = Parser::new_from_str(self.source);
        loop {
            let (event, mark) = parser.next_token()?;
            match event {
                Event::StreamEnd => break,
                Event::Nothing | Event::StreamStart | Event::DocumentStart | Event::DocumentEnd => {}
                Event::Scalar(text, style, anchor, tag) => {
                    let scalar = self.scalar(text, style, mark);
                    self.complete(Node::Scalar(scalar), anchor, tag.map(tag_text));
                }
                Event::SequenceStart(anchor, tag) => self.stack.push(Frame::Sequence {
                    anchor,
                    tag: tag.map(tag_text),
                    items: Vec::new(),
                }),
                Event::MappingStart(anchor, tag) => self.stack.push(Frame::Mapping {
                    anchor,
                    tag: tag.map(tag_text),
                    entries: Vec::new(),
                    key: None,
                }),
                Event::SequenceEnd | Event::MappingEnd => match self.stack.pop() {
                    Some(Frame::Sequence { anchor, tag, items }) => {
                        self.complete(Node::Sequence(items), anchor, tag)
                    }
                    Some(Frame::Mapping {
                        anchor,
                        tag,
                        entries,
                        ..
                    }) => self.complete(Node::Mapping(entries), anchor, tag),
                    None => return Err(ScanError::new(mark, "unbalanced collection end")),
                },
                // aliases are expanded; anchor names are not carried
                Event::Alias(id) => {
                    let node = self.anchors.get(&id).cloned().ok_or_else(|| {
                        ScanError::new(mark, "alias refers to an unfinished or unknown anchor")
                    })?;
                    self.insert(node);
                }
            }
        }
        Ok(self.roots)
    }

    fn scalar(&self, text: String, style: TScalarStyle, mark: Marker) -> Scalar {
        let style = match style {
            TScalarStyle::Plain => ScalarStyle::Plain,
            TScalarStyle::SingleQuoted => ScalarStyle::SingleQuoted,
            TScalarStyle::DoubleQuoted => ScalarStyle::DoubleQuoted,
            TScalarStyle::Literal => ScalarStyle::Literal,
            TScalarStyle::Folded => ScalarStyle::Folded,
        };
        // An omitted value (`key:`) arrives as a plain `~` marked at the next token.
        let omitted = style == ScalarStyle::Plain
            && text == "~"
            && !self.stack.is_empty()
            && self.chars.get(mark.index()) != Some(&'~');
        if omitted {
            Scalar::plain("")
        } else {
            Scalar::new(style, text)
        }
    }

    fn complete(&mut self, node: Node, anchor: usize, tag: Option<String>) {
        let node = match tag {
            Some(tag) => Node::Tagged {
                tag,
                value: Box::new(node),
            },
            None => node,
        };
        if anchor > 0 {
            self.anchors.insert(anchor, node.clone());
        }
        self.insert(node);
    }

    fn insert(&mut self, node: Node) {
        match self.stack.last_mut() {
            None => self.roots.push(node),
            Some(Frame::Sequence { items, .. }) => items.push(node),
            Some(Frame::Mapping { entries, key, .. }) => match key.take() {
                None => *key = Some(node),
                Some(k) => entries.push(Entry::new(k, node)),
            },
        }
    }
}

/// Shorthand form of a resolved tag.
fn tag_text(tag: Tag) -> String {
    match tag.handle.as_str() {
        "tag:yaml.org,2002:" => format!("!!{}", tag.suffix),
        "!" => format!("!{}", tag.suffix),
        "" if tag.suffix == "!" => "!".to_string(),
        handle => format!("!<{}{}>", handle, tag.suffix),
    }
}

fn is_empty_plain(node: &Node) -> bool {
    matches!(node, Node::Scalar(s) if s.is_empty_plain())
}

fn split_tag(node: &Node) -> (Option<&str>, &Node) {
    match node {
        Node::Tagged { tag, value } => (Some(tag.as_str()), value.as_ref()),
        other => (None, other),
    }
}

/// Literal block style holds the text exactly and re-parses to it.
fn fits_literal(text: &str) -> bool {
    let body = text.trim_end_matches('\n');
    let first_line = body.split('\n').find(|line| !line.is_empty());
    match first_line {
        None => false,
        Some(line) => {
            !line.starts_with([' ', '\t'])
                && !body.chars().any(|c| c.is_control() && c != '\n' && c != '\t')
        }
    }
}

/// Block-style writer. Every call leaves the output at the start of a line.
struct Emitter<'a> {
    out: &'a mut String,
}

impl<'a> Emitter<'a> {
    fn new(out: &'a mut String) -> Self {
        Self { out }
    }

    fn document(&mut self, root: &Node) -> fmt::Result {
        let (tag, inner) = split_tag(root);
        match inner {
            Node::Mapping(entries) if !entries.is_empty() => {
                if let Some(tag) = tag {
                    writeln!(self.out, "{tag}")?;
                }
                self.mapping(entries, 0, false)
            }
            Node::Sequence(items) if !items.is_empty() => {
                if let Some(tag) = tag {
                    writeln!(self.out, "{tag}")?;
                }
                self.sequence(items, 0, false)
            }
            _ => {
                self.inline(root, 0)?;
                self.out.push('\n');
                Ok(())
            }
        }
    }

    fn pad(&mut self, indent: usize) {
        self.out.extend(std::iter::repeat(' ').take(indent));
    }

    /// Entries at `indent`; with `inline_first` the first one continues the current line.
    fn mapping(&mut self, entries: &[Entry], indent: usize, inline_first: bool) -> fmt::Result {
        for (i, entry) in entries.iter().enumerate() {
            if i > 0 || !inline_first {
                self.pad(indent);
            }
            if entry.key.as_scalar().is_some() {
                self.key(&entry.key)?;
                self.out.push(':');
                self.value(&entry.value, indent, indent)?;
            } else {
                writeln!(self.out, "? {}", entry.key)?;
                self.pad(indent);
                self.out.push(':');
                self.value(&entry.value, indent, indent + INDENT)?;
            }
        }
        Ok(())
    }

    fn sequence(&mut self, items: &[Node], indent: usize, inline_first: bool) -> fmt::Result {
        for (i, item) in items.iter().enumerate() {
            if i > 0 || !inline_first {
                self.pad(indent);
            }
            self.out.push('-');
            let (tag, inner) = split_tag(item);
            match (tag, inner) {
                (None, Node::Mapping(entries)) if !entries.is_empty() => {
                    self.out.push(' ');
                    self.mapping(entries, indent + INDENT, true)?;
                }
                (None, Node::Sequence(nested)) if !nested.is_empty() => {
                    self.out.push(' ');
                    self.sequence(nested, indent + INDENT, true)?;
                }
                (Some(tag), Node::Mapping(entries)) if !entries.is_empty() => {
                    writeln!(self.out, " {tag}")?;
                    self.mapping(entries, indent + INDENT, false)?;
                }
                (Some(tag), Node::Sequence(nested)) if !nested.is_empty() => {
                    writeln!(self.out, " {tag}")?;
                    self.sequence(nested, indent + INDENT, false)?;
                }
                _ => {
                    if !is_empty_plain(item) {
                        self.out.push(' ');
                        self.inline(item, indent)?;
                    }
                    self.out.push('\n');
                }
            }
        }
        Ok(())
    }

    /// Value after `key:`. Block mappings nest one level deeper, block
    /// sequences start at `seq_indent`.
    fn value(&mut self, node: &Node, indent: usize, seq_indent: usize) -> fmt::Result {
        let (tag, inner) = split_tag(node);
        let tag_suffix = |out: &mut String| match tag {
            Some(tag) => write!(out, " {tag}"),
            None => Ok(()),
        };
        match inner {
            Node::Mapping(entries) if !entries.is_empty() => {
                tag_suffix(self.out)?;
                self.out.push('\n');
                self.mapping(entries, indent + INDENT, false)
            }
            Node::Sequence(items) if !items.is_empty() => {
                tag_suffix(self.out)?;
                self.out.push('\n');
                self.sequence(items, seq_indent, false)
            }
            _ => {
                if !is_empty_plain(node) {
                    self.out.push(' ');
                    self.inline(node, indent)?;
                }
                self.out.push('\n');
                Ok(())
            }
        }
    }

    /// Node that starts on the current line: scalars, empty or flow collections.
    fn inline(&mut self, node: &Node, indent: usize) -> fmt::Result {
        match node {
            Node::Scalar(s) => self.scalar(s, indent),
            Node::Tagged { tag, value } => {
                self.out.push_str(tag);
                if !is_empty_plain(value) {
                    self.out.push(' ');
                    self.inline(value, indent)?;
                }
                Ok(())
            }
            collection => write!(self.out, "{collection}"),
        }
    }

    fn key(&mut self, key: &Node) -> fmt::Result {
        match key {
            Node::Tagged { tag, value } => {
                write!(self.out, "{tag} ")?;
                self.key(value)
            }
            Node::Scalar(s) => match s.style() {
                ScalarStyle::Plain if !s.text().contains('\n') => {
                    self.out.push_str(s.text());
                    Ok(())
                }
                ScalarStyle::SingleQuoted if !s.text().contains('\n') => single_quoted(self.out, s.text()),
                _ => write_double_quoted(self.out, s.text()),
            },
            complex => write!(self.out, "{complex}"),
        }
    }

    /// Scalar in block context; block scalars indent their content below `indent`.
    fn scalar(&mut self, s: &Scalar, indent: usize) -> fmt::Result {
        let text = s.text();
        match s.style() {
            ScalarStyle::Plain if !text.contains('\n') => {
                self.out.push_str(text);
                Ok(())
            }
            ScalarStyle::SingleQuoted if !text.contains('\n') => single_quoted(self.out, text),
            // folding already happened while parsing, the literal form holds the same text
            ScalarStyle::Literal | ScalarStyle::Folded if fits_literal(text) => {
                self.literal(text, indent + INDENT)
            }
            _ => write_double_quoted(self.out, text),
        }
    }

    fn literal(&mut self, text: &str, content_indent: usize) -> fmt::Result {
        let body = text.trim_end_matches('\n');
        let trailing = text.len() - body.len();
        let chomp = match trailing {
            0 => "-",
            1 => "",
            _ => "+",
        };
        write!(self.out, "|{chomp}")?;
        for line in body.split('\n') {
            self.out.push('\n');
            if !line.is_empty() {
                self.pad(content_indent);
                self.out.push_str(line);
            }
        }
        for _ in 1..trailing {
            self.out.push('\n');
        }
        Ok(())
    }
}

fn single_quoted(out: &mut String, text: &str) -> fmt::Result {
    write!(out, "'{}'", text.replace('\'', "''"))
}
