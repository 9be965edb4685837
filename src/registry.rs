//! The tag registry: explicit registration of self-describing types and
//! codecs, plus decode/encode dispatch.
//!
//! The registry is an ordinary value, passed explicitly to the load/dump
//! entry points. Populate it once at startup; it performs no interior
//! mutation afterwards. There is no automatic type discovery: a type is
//! known exactly when `register` (or `register_codec` with the type among
//! the known types) has been called for it.

use std::any::TypeId;
use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;

use crate::codec::TagCodec;
use crate::error::{Candidate, Error};
use crate::object::TaggedObject;
use crate::tags::{TAGGED_PREFIX, normalize_codec_prefix, validate_suffix};
use crate::value::{AnyObject, Mapping, Object, PlainNode};

type ConstructFn = Box<dyn Fn(PlainNode, &str) -> Result<Object, Error>>;
type SupportsFn = fn(&str) -> Result<bool, Error>;
type RepresentFn = Box<dyn Fn(&dyn AnyObject) -> Result<Mapping, Error>>;

/// One registered self-describing type.
struct ObjectEntry {
    suffix: String,
    type_name: &'static str,
    supports: SupportsFn,
    construct: ConstructFn,
}

/// Encode hook of a self-describing type.
struct ObjectRepr {
    suffix: String,
    represent: RepresentFn,
}

/// Encode hook installed by a codec for one of its known types.
struct CodecRepr {
    prefix: String,
    codec: Rc<dyn TagCodec>,
}

/// Registry resolving tags to handlers (decode) and runtime types to tags
/// (encode).
#[derive(Default)]
pub struct TagRegistry {
    /// Self-describing types in registration order; `by_suffix` indexes it.
    objects: Vec<ObjectEntry>,
    by_suffix: AHashMap<String, usize>,
    representers: AHashMap<TypeId, ObjectRepr>,
    /// Codec decode hooks keyed by normalized prefix (last registration wins).
    codecs: AHashMap<String, Rc<dyn TagCodec>>,
    codec_representers: AHashMap<TypeId, CodecRepr>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a self-describing type under its declared suffix.
    ///
    /// Fails with:
    /// - [`Error::UnclaimedTag`] when the type never declared a suffix,
    /// - [`Error::Declaration`] when the suffix is malformed,
    /// - [`Error::DuplicateTag`] when another type already claimed it.
    ///   Tag collisions are a configuration error caught here, never an
    ///   ambiguity resolved at dispatch time.
    pub fn register<T>(&mut self) -> Result<(), Error>
    where
        T: TaggedObject + Clone + PartialEq,
    {
        let type_name = std::any::type_name::<T>();
        let suffix = T::tag_suffix()
            .ok_or_else(|| Error::unclaimed_tag(type_name))?
            .into_owned();
        validate_suffix(&suffix, type_name)?;
        if let Some(&at) = self.by_suffix.get(&suffix) {
            return Err(Error::DuplicateTag {
                suffix,
                existing: self.objects[at].type_name.to_owned(),
                offered: type_name.to_owned(),
            });
        }

        let construct: ConstructFn = Box::new(|node, suffix| {
            let object = match node {
                PlainNode::Mapping(m) => T::from_yaml_mapping(m, suffix)?,
                PlainNode::Sequence(seq) => T::from_yaml_sequence(seq, suffix)?,
                PlainNode::Scalar(s) => T::from_yaml_scalar(s, suffix)?,
            };
            Ok(Object::new(object))
        });
        let represent: RepresentFn = Box::new(|obj| {
            let concrete = obj.as_any().downcast_ref::<T>().ok_or_else(|| {
                Error::msg(format!(
                    "representer for `{}` received `{}`",
                    std::any::type_name::<T>(),
                    obj.type_name()
                ))
            })?;
            concrete.to_yaml()
        });

        self.by_suffix.insert(suffix.clone(), self.objects.len());
        self.objects.push(ObjectEntry {
            suffix: suffix.clone(),
            type_name,
            supports: T::is_tag_supported,
            construct,
        });
        self.representers
            .insert(TypeId::of::<T>(), ObjectRepr { suffix, represent });
        Ok(())
    }

    /// Register a codec: its decode hook under the normalized prefix, and
    /// its encode hook under every known type.
    ///
    /// Re-registering a codec overwrites prior bindings for the same prefix
    /// and the same known types (last registration wins).
    pub fn register_codec<C: TagCodec>(&mut self, codec: C) -> Result<(), Error> {
        let prefix = normalize_codec_prefix(&codec.tag_prefix())?;
        let codec: Rc<dyn TagCodec> = Rc::new(codec);
        for known in codec.known_types() {
            self.codec_representers.insert(
                known.id,
                CodecRepr {
                    prefix: prefix.clone(),
                    codec: codec.clone(),
                },
            );
        }
        self.codecs.insert(prefix, codec);
        Ok(())
    }

    /// Decode dispatch: resolve `tag` to a handler and run it on `node`.
    ///
    /// Returns `Ok(None)` when the tag belongs to no registered namespace
    /// (the caller decides whether that is an error), `Ok(Some(object))` on
    /// success, and [`Error::NoHandler`] when a namespace matched but no
    /// handler claimed the suffix.
    pub(crate) fn construct(&self, tag: &str, node: PlainNode) -> Result<Option<Object>, Error> {
        if let Some(suffix) = tag.strip_prefix(TAGGED_PREFIX) {
            return self.construct_object(tag, suffix, node).map(Some);
        }
        if let Some((prefix, codec)) = self.codec_for(tag) {
            let suffix = &tag[prefix.len()..];
            if !codec.is_tag_supported(suffix) {
                return Err(Error::NoHandler {
                    tag: tag.to_owned(),
                    candidates: vec![Candidate {
                        name: format!("codec for prefix `{prefix}`"),
                        error: None,
                    }],
                });
            }
            let object = match node {
                PlainNode::Mapping(m) => codec.from_yaml_mapping(suffix, m)?,
                PlainNode::Sequence(seq) => codec.from_yaml_sequence(suffix, seq)?,
                PlainNode::Scalar(s) => codec.from_yaml_scalar(suffix, s)?,
            };
            return Ok(Some(object));
        }
        Ok(None)
    }

    /// Dispatch within the self-describing namespace.
    ///
    /// Fast path: exact suffix lookup. Slow path: a deterministic,
    /// registration-ordered pass over every candidate's `is_tag_supported`,
    /// honoring overridden predicates. Errors raised by a candidate's check
    /// are captured and reported together, never propagated individually,
    /// so one broken candidate cannot hide a later match.
    fn construct_object(&self, tag: &str, suffix: &str, node: PlainNode) -> Result<Object, Error> {
        if let Some(&at) = self.by_suffix.get(suffix) {
            let entry = &self.objects[at];
            return (entry.construct)(node, suffix);
        }

        let mut candidates = Vec::with_capacity(self.objects.len());
        for entry in &self.objects {
            match (entry.supports)(suffix) {
                Ok(true) => return (entry.construct)(node, suffix),
                Ok(false) => candidates.push(Candidate {
                    name: entry.type_name.to_owned(),
                    error: None,
                }),
                Err(err) => candidates.push(Candidate {
                    name: entry.type_name.to_owned(),
                    error: Some(err.to_string()),
                }),
            }
        }
        Err(Error::NoHandler {
            tag: tag.to_owned(),
            candidates,
        })
    }

    /// Encode dispatch: resolve the exact runtime type of `obj` to its full
    /// tag and mapping representation.
    pub(crate) fn represent(&self, obj: &dyn AnyObject) -> Result<(String, Mapping), Error> {
        let type_id = obj.as_any().type_id();
        if let Some(repr) = self.representers.get(&type_id) {
            let mapping = (repr.represent)(obj)?;
            return Ok((format!("{TAGGED_PREFIX}{}", repr.suffix), mapping));
        }
        if let Some(repr) = self.codec_representers.get(&type_id) {
            let (suffix, mapping) = repr.codec.represent(obj)?;
            if !repr.codec.is_tag_supported(&suffix) {
                return Err(Error::MalformedCodecOutput {
                    codec: format!("codec for prefix `{}`", repr.prefix),
                    detail: format!(
                        "returned suffix `{suffix}` which its own is_tag_supported rejects"
                    ),
                });
            }
            return Ok((format!("{}{suffix}", repr.prefix), mapping));
        }
        Err(Error::NoRepresenter {
            type_name: obj.type_name().to_owned(),
        })
    }

    /// True when an encode hook exists for this runtime type.
    pub fn can_represent(&self, type_id: TypeId) -> bool {
        self.representers.contains_key(&type_id) || self.codec_representers.contains_key(&type_id)
    }

    /// Suffixes of the registered self-describing types, registration order.
    pub fn suffixes(&self) -> impl Iterator<Item = &str> {
        self.objects.iter().map(|e| e.suffix.as_str())
    }

    /// Normalized prefixes of the registered codecs (unordered).
    pub fn codec_prefixes(&self) -> impl Iterator<Item = &str> {
        self.codecs.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.codecs.is_empty()
    }

    /// The longest registered codec prefix matching `tag`, if any.
    fn codec_for(&self, tag: &str) -> Option<(&str, &Rc<dyn TagCodec>)> {
        self.codecs
            .iter()
            .filter(|(prefix, _)| tag.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(prefix, codec)| (prefix.as_str(), codec))
    }
}

impl fmt::Debug for TagRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagRegistry")
            .field("suffixes", &self.objects.iter().map(|e| &e.suffix).collect::<Vec<_>>())
            .field("codec_prefixes", &self.codecs.keys().collect::<Vec<_>>())
            .finish()
    }
}
