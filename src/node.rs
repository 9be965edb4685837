//! Raw tagged node trees built from the parser's event stream.
//!
//! Responsibilities
//! - Assemble whole documents into [`RawNode`] trees, keeping every tag.
//! - Track source locations for diagnostics.
//! - Record anchors and resolve aliases by cloning the recorded subtree,
//!   charging replayed nodes against the budget.
//! - Reset anchor state on document boundaries; skip empty documents.
//!
//! Handlers need complete nodes (a mapping is handed over as a whole), so
//! unlike a streaming deserializer this layer materializes the tree before
//! any dispatch happens.

use std::borrow::Cow;

use ahash::AHashMap;
use saphyr_parser::{Event, Parser, ScalarStyle};

use crate::budget::{Budget, BudgetEnforcer};
use crate::error::{Error, Location, location_from_span};

/// A parsed node with its tag still unresolved.
#[derive(Clone, Debug)]
pub(crate) struct RawNode {
    /// Full tag string as reported by the parser, e.g. `!tagged/com.x.Foo`
    /// or `tag:yaml.org,2002:str`.
    pub tag: Option<String>,
    pub kind: RawKind,
    pub location: Location,
}

#[derive(Clone, Debug)]
pub(crate) enum RawKind {
    Scalar { value: String, quoted: bool },
    Sequence(Vec<RawNode>),
    Mapping(Vec<(RawNode, RawNode)>),
}

impl RawNode {
    /// Number of nodes in this subtree, for alias replay accounting.
    fn count(&self) -> usize {
        match &self.kind {
            RawKind::Scalar { .. } => 1,
            RawKind::Sequence(items) => 1 + items.iter().map(RawNode::count).sum::<usize>(),
            RawKind::Mapping(pairs) => {
                1 + pairs
                    .iter()
                    .map(|(k, v)| k.count() + v.count())
                    .sum::<usize>()
            }
        }
    }
}

/// An open container being assembled.
enum Frame {
    Sequence {
        tag: Option<String>,
        location: Location,
        anchor: usize,
        items: Vec<RawNode>,
    },
    Mapping {
        tag: Option<String>,
        location: Location,
        anchor: usize,
        pairs: Vec<(RawNode, RawNode)>,
        pending_key: Option<RawNode>,
    },
}

/// Parse `input` into one node tree per non-empty document.
pub(crate) fn build_documents(
    input: &str,
    budget: Option<Budget>,
) -> Result<Vec<RawNode>, Error> {
    let mut parser = Parser::new_from_str(input);
    let mut enforcer = budget.map(BudgetEnforcer::new);
    let mut anchors: AHashMap<usize, RawNode> = AHashMap::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut roots: Vec<RawNode> = Vec::new();
    let mut last_location = Location::UNKNOWN;

    while let Some(item) = parser.next() {
        let (event, span) = item.map_err(Error::from_scan_error)?;
        let location = location_from_span(&span);
        last_location = location;

        if let Some(ref mut enforcer) = enforcer {
            enforcer
                .observe(&event)
                .map_err(|breach| Error::Budget { breach, location })?;
        }

        match event {
            Event::StreamStart | Event::StreamEnd | Event::Nothing => {}

            Event::DocumentStart(_) | Event::DocumentEnd => {
                // Anchors do not cross document boundaries.
                anchors.clear();
                if !stack.is_empty() {
                    return Err(Error::msg("document boundary inside an open container")
                        .with_location(location));
                }
            }

            Event::Scalar(value, style, anchor_id, tag) => {
                let value = match value {
                    Cow::Borrowed(v) => v.to_owned(),
                    Cow::Owned(v) => v,
                };
                let node = RawNode {
                    tag: tag.map(|t| t.to_string()),
                    kind: RawKind::Scalar {
                        value,
                        quoted: !matches!(style, ScalarStyle::Plain),
                    },
                    location,
                };
                if anchor_id != 0 {
                    anchors.insert(anchor_id, node.clone());
                }
                attach(&mut stack, &mut roots, node)?;
            }

            Event::SequenceStart(anchor_id, tag) => {
                stack.push(Frame::Sequence {
                    tag: tag.map(|t| t.to_string()),
                    location,
                    anchor: anchor_id,
                    items: Vec::new(),
                });
            }
            Event::SequenceEnd => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| Error::msg("sequence end with no start").with_location(location))?;
                let Frame::Sequence {
                    tag,
                    location: start,
                    anchor,
                    items,
                } = frame
                else {
                    return Err(Error::msg("sequence end closing a mapping").with_location(location));
                };
                let node = RawNode {
                    tag,
                    kind: RawKind::Sequence(items),
                    location: start,
                };
                if anchor != 0 {
                    anchors.insert(anchor, node.clone());
                }
                attach(&mut stack, &mut roots, node)?;
            }

            Event::MappingStart(anchor_id, tag) => {
                stack.push(Frame::Mapping {
                    tag: tag.map(|t| t.to_string()),
                    location,
                    anchor: anchor_id,
                    pairs: Vec::new(),
                    pending_key: None,
                });
            }
            Event::MappingEnd => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| Error::msg("mapping end with no start").with_location(location))?;
                let Frame::Mapping {
                    tag,
                    location: start,
                    anchor,
                    pairs,
                    pending_key,
                } = frame
                else {
                    return Err(Error::msg("mapping end closing a sequence").with_location(location));
                };
                if pending_key.is_some() {
                    return Err(Error::msg("mapping ends after a key with no value")
                        .with_location(location));
                }
                let node = RawNode {
                    tag,
                    kind: RawKind::Mapping(pairs),
                    location: start,
                };
                if anchor != 0 {
                    anchors.insert(anchor, node.clone());
                }
                attach(&mut stack, &mut roots, node)?;
            }

            Event::Alias(anchor_id) => {
                let node = anchors
                    .get(&anchor_id)
                    .cloned()
                    .ok_or(Error::UnknownAnchor {
                        id: anchor_id,
                        location,
                    })?;
                if let Some(ref mut enforcer) = enforcer {
                    enforcer
                        .observe_replay(node.count())
                        .map_err(|breach| Error::Budget { breach, location })?;
                }
                attach(&mut stack, &mut roots, node)?;
            }
        }
    }

    if !stack.is_empty() {
        return Err(Error::eof().with_location(last_location));
    }
    Ok(roots)
}

/// Parse `input` as exactly one document.
pub(crate) fn build_document(input: &str, budget: Option<Budget>) -> Result<RawNode, Error> {
    let mut documents = build_documents(input, budget)?;
    match documents.len() {
        1 => Ok(documents.remove(0)),
        0 => Err(Error::msg("no YAML document found in the input")),
        n => Err(Error::msg(format!(
            "expected a single YAML document, found {n}; use load_multi_str for streams"
        ))),
    }
}

/// Place a completed node: as a sequence item, a mapping key/value, or a
/// document root.
fn attach(stack: &mut [Frame], roots: &mut Vec<RawNode>, node: RawNode) -> Result<(), Error> {
    match stack.last_mut() {
        None => {
            roots.push(node);
            Ok(())
        }
        Some(Frame::Sequence { items, .. }) => {
            items.push(node);
            Ok(())
        }
        Some(Frame::Mapping {
            pairs, pending_key, ..
        }) => {
            match pending_key.take() {
                None => *pending_key = Some(node),
                Some(key) => pairs.push((key, node)),
            }
            Ok(())
        }
    }
}
