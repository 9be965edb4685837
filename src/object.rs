//! Self-describing tagged types.
//!
//! A type that owns its tag suffix implements [`TaggedObject`] (usually via
//! the [`tag_info!`](crate::tag_info) macro) and is installed into a
//! [`TagRegistry`](crate::TagRegistry) with an explicit
//! [`register`](crate::TagRegistry::register) call. The full document tag is
//! [`TAGGED_PREFIX`](crate::TAGGED_PREFIX) + suffix.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;

use crate::error::{Error, NodeShape};
use crate::value::{Mapping, Sequence};

/// A type that can dump itself under a tag and load itself back.
///
/// Only `to_yaml` and `from_yaml_mapping` are required. The sequence and
/// scalar construction hooks default to a descriptive "not supported" error;
/// override them to accept those node shapes.
///
/// A type may leave `tag_suffix` at its `None` default to act as an
/// abstract base for manual impls that share code: such a type cannot be
/// registered or encoded, and any operation requiring the tag fails with
/// [`Error::UnclaimedTag`] at that point, not at type-definition time.
pub trait TaggedObject: Any + fmt::Debug {
    /// The tag suffix this type claims, if any.
    ///
    /// Declare it directly, or with `tag_info!(Type, suffix = "...")`, or
    /// derive it from a namespace with `tag_info!(Type, namespace = "...")`
    /// (yielding `namespace.TypeName`).
    fn tag_suffix() -> Option<Cow<'static, str>>
    where
        Self: Sized,
    {
        None
    }

    /// True iff this type decodes documents tagged with `suffix`.
    ///
    /// The default compares against [`tag_suffix`](Self::tag_suffix) and
    /// errs when no suffix was ever declared; a type may override this to
    /// claim several suffixes at once.
    fn is_tag_supported(suffix: &str) -> Result<bool, Error>
    where
        Self: Sized,
    {
        match Self::tag_suffix() {
            Some(own) => Ok(own == suffix),
            None => Err(Error::unclaimed_tag(std::any::type_name::<Self>())),
        }
    }

    /// Encode this instance as a key/value mapping.
    ///
    /// For plain data types, `crate::to_mapping(self)` (serde) is the usual
    /// body; implement by hand to omit internal-only fields or rename keys.
    fn to_yaml(&self) -> Result<Mapping, Error>;

    /// Reconstruct an instance from a mapping node. Keys and values are
    /// fully resolved; nested tagged objects arrive as
    /// [`Value::Object`](crate::Value::Object).
    fn from_yaml_mapping(mapping: Mapping, suffix: &str) -> Result<Self, Error>
    where
        Self: Sized;

    /// Reconstruct an instance from a sequence node (positional form).
    fn from_yaml_sequence(seq: Sequence, suffix: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let _ = (seq, suffix);
        Err(Error::unsupported_shape(
            NodeShape::Sequence,
            std::any::type_name::<Self>(),
        ))
    }

    /// Reconstruct an instance from a scalar node.
    ///
    /// The scalar arrives as the raw document text, never type-resolved:
    /// the YAML literal `1` is the string `"1"` here.
    fn from_yaml_scalar(scalar: String, suffix: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let _ = (scalar, suffix);
        Err(Error::unsupported_shape(
            NodeShape::Scalar,
            std::any::type_name::<Self>(),
        ))
    }
}
