//! Block-style YAML emitter over [`Value`] trees.
//!
//! Objects are resolved to `(tag, mapping)` through the registry first, so
//! emission proper never fails; all fallible work happens in the lowering
//! pass. Scalars carry their quoting with them: a quoted scalar stays
//! quoted, so `1` and `"1"` survive a round trip as distinct nodes.

use crate::error::Error;
use crate::options::DumpOptions;
use crate::quoting::{
    is_plain_key_safe, is_plain_value_safe, is_type_lookalike, push_double_quoted,
};
use crate::registry::TagRegistry;
use crate::value::{Scalar, Value};

/// A value with objects already represented, ready to print.
enum Node {
    Scalar(Scalar),
    Sequence(Vec<Node>),
    Mapping {
        /// Full tag to emit before the mapping, when it came from an object.
        tag: Option<String>,
        pairs: Vec<(Node, Node)>,
    },
}

impl Node {
    /// True when the node fits after `key: ` or `- ` on the same line.
    fn is_inline(&self) -> bool {
        match self {
            Node::Scalar(_) => true,
            Node::Sequence(items) => items.is_empty(),
            Node::Mapping { pairs, .. } => pairs.is_empty(),
        }
    }
}

/// Render one document, with a trailing newline.
pub(crate) fn emit_document(
    registry: &TagRegistry,
    value: &Value,
    options: &DumpOptions,
) -> Result<String, Error> {
    if options.indent_step == 0 {
        return Err(Error::InvalidOptions {
            msg: "indent_step must be at least 1".to_owned(),
        });
    }
    let node = lower(registry, value, options)?;
    let mut emitter = Emitter {
        out: String::new(),
        step: options.indent_step,
        quote_all: options.quote_all,
        empty_as_braces: options.empty_as_braces,
    };
    emitter.emit_root(&node);
    Ok(emitter.out)
}

/// Replace every object with its tag and mapping representation.
fn lower(registry: &TagRegistry, value: &Value, options: &DumpOptions) -> Result<Node, Error> {
    Ok(match value {
        Value::Scalar(s) => Node::Scalar(s.clone()),
        Value::Sequence(items) => Node::Sequence(
            items
                .iter()
                .map(|item| lower(registry, item, options))
                .collect::<Result<_, _>>()?,
        ),
        Value::Mapping(mapping) => Node::Mapping {
            tag: None,
            pairs: lower_pairs(registry, mapping.iter(), options)?,
        },
        Value::Object(object) => {
            let (tag, mapping) = registry.represent(object.as_dyn())?;
            Node::Mapping {
                tag: (!options.omit_tags).then_some(tag),
                pairs: lower_pairs(registry, mapping.iter(), options)?,
            }
        }
    })
}

fn lower_pairs<'a>(
    registry: &TagRegistry,
    pairs: impl Iterator<Item = &'a (Value, Value)>,
    options: &DumpOptions,
) -> Result<Vec<(Node, Node)>, Error> {
    pairs
        .map(|(k, v)| Ok((lower(registry, k, options)?, lower(registry, v, options)?)))
        .collect()
}

struct Emitter {
    out: String,
    step: usize,
    quote_all: bool,
    empty_as_braces: bool,
}

impl Emitter {
    fn emit_root(&mut self, node: &Node) {
        match node {
            Node::Scalar(s) => {
                self.scalar_value(s);
                self.out.push('\n');
            }
            // An empty root keeps its braces so the document stays non-empty.
            Node::Sequence(items) if items.is_empty() => self.out.push_str("[]\n"),
            Node::Sequence(items) => self.sequence_items(items, 0, false),
            Node::Mapping { tag, pairs } => {
                if let Some(tag) = tag {
                    self.out.push_str(tag);
                    if pairs.is_empty() {
                        self.out.push_str(" {}");
                    }
                    self.out.push('\n');
                    self.mapping_entries(pairs, 0, false);
                } else if pairs.is_empty() {
                    self.out.push_str("{}\n");
                } else {
                    self.mapping_entries(pairs, 0, false);
                }
            }
        }
    }

    /// Emit mapping entries at `indent`. With `cursor_placed`, the first
    /// entry starts at the current position (after `- `).
    fn mapping_entries(&mut self, pairs: &[(Node, Node)], indent: usize, mut cursor_placed: bool) {
        for (key, value) in pairs {
            if cursor_placed {
                cursor_placed = false;
            } else {
                self.indent(indent);
            }
            match key {
                Node::Scalar(s) => {
                    self.scalar_key(s);
                    self.out.push(':');
                    self.value_after_colon(value, indent);
                }
                _ => {
                    // Complex key: explicit "? key" / ": value" form.
                    self.out.push_str("?\n");
                    self.block(key, indent + self.step);
                    self.indent(indent);
                    self.out.push(':');
                    self.value_after_colon(value, indent);
                }
            }
        }
    }

    /// Emit a value; the cursor sits right after the `:` of its key.
    fn value_after_colon(&mut self, value: &Node, indent: usize) {
        match value {
            _ if value.is_inline() => {
                if let Some(text) = self.inline_text(value) {
                    self.out.push(' ');
                    self.out.push_str(&text);
                }
                self.out.push('\n');
            }
            Node::Sequence(items) => {
                self.out.push('\n');
                self.sequence_items(items, indent + self.step, false);
            }
            Node::Mapping { tag, pairs } => {
                if let Some(tag) = tag {
                    self.out.push(' ');
                    self.out.push_str(tag);
                }
                self.out.push('\n');
                self.mapping_entries(pairs, indent + self.step, false);
            }
            Node::Scalar(_) => unreachable!("scalars are inline"),
        }
    }

    /// Emit sequence items at `indent`. With `cursor_placed`, the first
    /// item starts at the current position.
    fn sequence_items(&mut self, items: &[Node], indent: usize, mut cursor_placed: bool) {
        for item in items {
            if cursor_placed {
                cursor_placed = false;
            } else {
                self.indent(indent);
            }
            self.out.push('-');
            match item {
                _ if item.is_inline() => {
                    if let Some(text) = self.inline_text(item) {
                        self.out.push(' ');
                        self.out.push_str(&text);
                    }
                    self.out.push('\n');
                }
                // Compact form: first child shares the dash line. Children
                // continue at indent + 2, the column right after "- ".
                Node::Sequence(nested) => {
                    self.out.push(' ');
                    self.sequence_items(nested, indent + 2, true);
                }
                Node::Mapping { tag, pairs } => {
                    if let Some(tag) = tag {
                        self.out.push(' ');
                        self.out.push_str(tag);
                        self.out.push('\n');
                        self.mapping_entries(pairs, indent + 2, false);
                    } else {
                        self.out.push(' ');
                        self.mapping_entries(pairs, indent + 2, true);
                    }
                }
                Node::Scalar(_) => unreachable!("scalars are inline"),
            }
        }
    }

    /// Emit a node on its own line(s) at `indent` (used for complex keys).
    fn block(&mut self, node: &Node, indent: usize) {
        if node.is_inline() {
            self.indent(indent);
            if let Some(text) = self.inline_text(node) {
                self.out.push_str(&text);
            }
            self.out.push('\n');
            return;
        }
        match node {
            Node::Sequence(items) => self.sequence_items(items, indent, false),
            Node::Mapping { tag, pairs } => {
                if let Some(tag) = tag {
                    self.indent(indent);
                    self.out.push_str(tag);
                    self.out.push('\n');
                }
                self.mapping_entries(pairs, indent, false);
            }
            Node::Scalar(_) => unreachable!("scalars are inline"),
        }
    }

    /// The single-line rendition of an inline node, or `None` to emit
    /// nothing at all (empty container with `empty_as_braces` off).
    fn inline_text(&mut self, node: &Node) -> Option<String> {
        match node {
            // A plain empty scalar renders as nothing, so `key:` loads back
            // as the same plain empty scalar.
            Node::Scalar(s) if s.value.is_empty() && !s.quoted && !self.quote_all => None,
            Node::Scalar(s) => {
                let mut text = String::new();
                self.scalar_into(&mut text, s, false);
                Some(text)
            }
            Node::Sequence(_) => self.empty_as_braces.then(|| "[]".to_owned()),
            Node::Mapping { tag: Some(tag), .. } => Some(format!("{tag} {{}}")),
            Node::Mapping { tag: None, .. } => self.empty_as_braces.then(|| "{}".to_owned()),
        }
    }

    fn scalar_key(&mut self, s: &Scalar) {
        let mut text = String::new();
        self.scalar_into(&mut text, s, true);
        self.out.push_str(&text);
    }

    fn scalar_value(&mut self, s: &Scalar) {
        let mut text = String::new();
        self.scalar_into(&mut text, s, false);
        self.out.push_str(&text);
    }

    fn scalar_into(&self, out: &mut String, s: &Scalar, key_position: bool) {
        let structurally_ok = if key_position {
            is_plain_key_safe(&s.value)
        } else {
            is_plain_value_safe(&s.value)
        };
        // A quoted scalar may drop its quotes only when the bare text
        // still reads back as a string.
        let keeps_quotes = s.quoted && is_type_lookalike(&s.value);
        if self.quote_all || keeps_quotes || !structurally_ok {
            push_double_quoted(out, &s.value);
        } else {
            out.push_str(&s.value);
        }
    }

    fn indent(&mut self, n: usize) {
        for _ in 0..n {
            self.out.push(' ');
        }
    }
}
