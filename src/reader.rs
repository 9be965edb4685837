//! Node reader: turns raw parsed nodes into [`Value`] trees, dispatching
//! tagged nodes through the registry.
//!
//! Construction is "deep": children are fully resolved before the parent's
//! handler runs, so a handler always sees finished values (nested tagged
//! objects included). Scalars stay raw strings throughout; nothing here
//! guesses types.

use crate::error::Error;
use crate::node::{RawKind, RawNode, build_document, build_documents};
use crate::options::LoadOptions;
use crate::registry::TagRegistry;
use crate::tags::is_core_schema_tag;
use crate::value::{Mapping, PlainNode, Scalar, Value};

/// Load exactly one document from `input`.
pub(crate) fn load_document(
    registry: &TagRegistry,
    input: &str,
    options: &LoadOptions,
) -> Result<Value, Error> {
    let root = build_document(input, options.budget.clone())?;
    resolve_node(registry, root, options)
}

/// Load every non-empty document from `input`.
pub(crate) fn load_stream(
    registry: &TagRegistry,
    input: &str,
    options: &LoadOptions,
) -> Result<Vec<Value>, Error> {
    build_documents(input, options.budget.clone())?
        .into_iter()
        .map(|root| resolve_node(registry, root, options))
        .collect()
}

/// Resolve one raw node into a value, children first.
fn resolve_node(
    registry: &TagRegistry,
    raw: RawNode,
    options: &LoadOptions,
) -> Result<Value, Error> {
    let location = raw.location;
    let tag = raw.tag;

    let plain = match raw.kind {
        RawKind::Scalar { value, quoted } => {
            // Core-schema tags (and untagged scalars) stay raw text: the
            // literal `0` is the string "0" here, by contract.
            if tag.is_none() || tag.as_deref().is_some_and(is_core_schema_tag) {
                return Ok(Value::Scalar(Scalar { value, quoted }));
            }
            PlainNode::Scalar(value)
        }
        RawKind::Sequence(items) => {
            let resolved = items
                .into_iter()
                .map(|item| resolve_node(registry, item, options))
                .collect::<Result<Vec<Value>, Error>>()?;
            match tag {
                None => return Ok(Value::Sequence(resolved)),
                Some(ref t) if is_core_schema_tag(t) => return Ok(Value::Sequence(resolved)),
                Some(_) => PlainNode::Sequence(resolved),
            }
        }
        RawKind::Mapping(pairs) => {
            let mut mapping = Mapping::with_capacity(pairs.len());
            for (key, value) in pairs {
                let key = resolve_node(registry, key, options)?;
                let value = resolve_node(registry, value, options)?;
                mapping.insert(key, value);
            }
            match tag {
                None => return Ok(Value::Mapping(mapping)),
                Some(ref t) if is_core_schema_tag(t) => return Ok(Value::Mapping(mapping)),
                Some(_) => PlainNode::Mapping(mapping),
            }
        }
    };

    // A custom tag is present: dispatch it. Only unsafe mode needs the
    // node back after a failed lookup, so only it keeps a copy.
    let tag = tag.unwrap_or_default();
    let fallback = (!options.safe).then(|| plain.clone());
    match registry.construct(&tag, plain)? {
        Some(object) => Ok(Value::Object(object)),
        None => match fallback {
            // Unsafe mode: tolerate foreign tags, keep the plain node.
            Some(PlainNode::Mapping(m)) => Ok(Value::Mapping(m)),
            Some(PlainNode::Sequence(seq)) => Ok(Value::Sequence(seq)),
            Some(PlainNode::Scalar(s)) => Ok(Value::Scalar(Scalar::plain(s))),
            None => Err(Error::UnknownTag { tag, location }),
        },
    }
}
