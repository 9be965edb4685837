//! Multi-type codecs: one handler fronting a closed set of foreign types
//! under a shared tag prefix.
//!
//! Use a codec when the types themselves cannot (or should not) implement
//! [`TaggedObject`](crate::TaggedObject) — e.g. types from another crate.
//! The codec owns the prefix, decides which suffixes it supports, and maps
//! suffixes to concrete types both ways.

use std::any::{Any, TypeId};

use crate::error::{Error, NodeShape};
use crate::value::{AnyObject, Mapping, Object, Sequence};

/// A type a codec can encode, captured with its name for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KnownType {
    pub(crate) id: TypeId,
    pub(crate) name: &'static str,
}

impl KnownType {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }
}

/// A codec able to encode and decode several object types under one tag
/// prefix, each type under its own suffix.
///
/// Decoding: implement [`tag_prefix`](Self::tag_prefix),
/// [`is_tag_supported`](Self::is_tag_supported) and
/// [`from_yaml_mapping`](Self::from_yaml_mapping); the sequence and scalar
/// hooks default to a "not supported" error.
///
/// Encoding: implement [`known_types`](Self::known_types) and
/// [`represent`](Self::represent). The returned suffix must satisfy
/// `is_tag_supported`; the registry verifies this and reports
/// [`Error::MalformedCodecOutput`] otherwise.
pub trait TagCodec: 'static {
    /// The tag prefix associated with this codec. Normalized by the
    /// registry to start with `!` and end with `/`.
    fn tag_prefix(&self) -> std::borrow::Cow<'static, str>;

    /// The types this codec can encode; an encode hook is installed for
    /// each when the codec is registered.
    fn known_types(&self) -> Vec<KnownType>;

    /// True iff this codec decodes documents tagged `prefix` + `suffix`.
    fn is_tag_supported(&self, suffix: &str) -> bool;

    /// Encode `obj` as `(suffix, mapping)`.
    ///
    /// Called only for instances of the [`known_types`](Self::known_types);
    /// downcast through [`AnyObject::as_any`] to recover the concrete type.
    fn represent(&self, obj: &dyn AnyObject) -> Result<(String, Mapping), Error>;

    /// Reconstruct an object from a mapping node decoded under `suffix`.
    fn from_yaml_mapping(&self, suffix: &str, mapping: Mapping) -> Result<Object, Error>;

    /// Reconstruct an object from a sequence node decoded under `suffix`.
    fn from_yaml_sequence(&self, suffix: &str, seq: Sequence) -> Result<Object, Error> {
        let _ = (suffix, seq);
        Err(Error::unsupported_shape(
            NodeShape::Sequence,
            std::any::type_name::<Self>(),
        ))
    }

    /// Reconstruct an object from a scalar node decoded under `suffix`.
    /// The scalar is the raw document text, never type-resolved.
    fn from_yaml_scalar(&self, suffix: &str, scalar: String) -> Result<Object, Error> {
        let _ = (suffix, scalar);
        Err(Error::unsupported_shape(
            NodeShape::Scalar,
            std::any::type_name::<Self>(),
        ))
    }
}
