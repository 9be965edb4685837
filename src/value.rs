//! Plain decoded document tree: scalars, sequences, ordered mappings and
//! already-reconstructed tagged objects.
//!
//! Scalars are deliberately **not** type-resolved: the YAML literal `0`
//! loads as the string `"0"`. Callers (and the serde bridge) decide what a
//! scalar means. The only style information kept is whether the scalar was
//! quoted, so that `1` and `"1"` stay distinct across a round trip.

use std::any::Any;
use std::fmt;

use crate::error::{Error, NodeShape};

/// A scalar value: raw text plus the quoted/plain distinction.
#[derive(Clone, Debug, PartialEq)]
pub struct Scalar {
    /// Raw scalar text, never type-resolved.
    pub value: String,
    /// True when the scalar was quoted in the document (or represents a
    /// string that must not be re-read as a number/boolean/null).
    pub quoted: bool,
}

impl Scalar {
    /// A plain (unquoted) scalar: numbers, booleans, nulls, bare words.
    pub fn plain<S: Into<String>>(value: S) -> Self {
        Self {
            value: value.into(),
            quoted: false,
        }
    }

    /// A quoted scalar: definitely a string.
    pub fn quoted<S: Into<String>>(value: S) -> Self {
        Self {
            value: value.into(),
            quoted: true,
        }
    }

    /// True for plain null spellings (`~`, `null`, empty).
    pub fn is_null(&self) -> bool {
        !self.quoted && crate::scalars::is_null_literal(&self.value)
    }
}

/// Ordered sequence of values.
pub type Sequence = Vec<Value>;

/// Insertion-ordered mapping with arbitrary decoded keys.
///
/// Lookup by string key is linear; documents dispatched through handlers are
/// small by construction, and order preservation matters more than lookup
/// speed here.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mapping {
    pairs: Vec<(Value, Value)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pairs: Vec::with_capacity(capacity),
        }
    }

    /// Append a key/value pair, keeping insertion order.
    pub fn insert<K: Into<Value>, V: Into<Value>>(&mut self, key: K, value: V) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Look up a value by string key (linear scan over scalar keys).
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.pairs
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    /// Remove and return the value under a string key.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let at = self.pairs.iter().position(|(k, _)| k.as_str() == Some(key))?;
        Some(self.pairs.remove(at).1)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (Value, Value)> {
        self.pairs.iter()
    }
}

impl From<Vec<(Value, Value)>> for Mapping {
    fn from(pairs: Vec<(Value, Value)>) -> Self {
        Self { pairs }
    }
}

impl FromIterator<(Value, Value)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Mapping {
    type Item = (Value, Value);
    type IntoIter = std::vec::IntoIter<(Value, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = &'a (Value, Value);
    type IntoIter = std::slice::Iter<'a, (Value, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

/// Object-safe view of a reconstructed domain object.
///
/// Blanket-implemented for every `T: Any + Debug + Clone + PartialEq`, so
/// plain data types qualify without extra work. The methods exist to give
/// `Value` its `Clone`/`PartialEq`/`Debug` behavior through the trait
/// object.
pub trait AnyObject: Any + fmt::Debug {
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
    fn dyn_clone(&self) -> Box<dyn AnyObject>;
    fn dyn_eq(&self, other: &dyn AnyObject) -> bool;
    fn type_name(&self) -> &'static str;
}

impl<T> AnyObject for T
where
    T: Any + fmt::Debug + Clone + PartialEq,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn dyn_clone(&self) -> Box<dyn AnyObject> {
        Box::new(self.clone())
    }

    fn dyn_eq(&self, other: &dyn AnyObject) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// A reconstructed tagged object stored inside a [`Value`] tree.
pub struct Object {
    inner: Box<dyn AnyObject>,
}

impl Object {
    pub fn new<T: AnyObject>(value: T) -> Self {
        Self {
            inner: Box::new(value),
        }
    }

    pub(crate) fn from_boxed(inner: Box<dyn AnyObject>) -> Self {
        Self { inner }
    }

    /// Rust type name of the wrapped object.
    pub fn type_name(&self) -> &'static str {
        self.inner.type_name()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.inner.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.as_any().downcast_ref::<T>()
    }

    /// Take the object out, failing with a type-mismatch error otherwise.
    pub fn downcast<T: Any>(self) -> Result<T, Error> {
        let actual = self.type_name();
        self.inner
            .into_any()
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| Error::ResultTypeMismatch {
                expected: std::any::type_name::<T>(),
                actual: format!("`{actual}`"),
            })
    }

    pub(crate) fn as_dyn(&self) -> &dyn AnyObject {
        self.inner.as_ref()
    }
}

impl Clone for Object {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.dyn_clone(),
        }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.inner.dyn_eq(other.inner.as_ref())
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object({:?})", self.inner)
    }
}

/// A decoded YAML value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Sequence(Sequence),
    Mapping(Mapping),
    Object(Object),
}

impl Value {
    /// A plain (unquoted) scalar value.
    pub fn scalar<S: Into<String>>(value: S) -> Self {
        Value::Scalar(Scalar::plain(value))
    }

    /// A quoted string scalar value.
    pub fn string<S: Into<String>>(value: S) -> Self {
        Value::Scalar(Scalar::quoted(value))
    }

    /// The plain null scalar.
    pub fn null() -> Self {
        Value::Scalar(Scalar::plain("null"))
    }

    /// Scalar text, if this is a scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(&s.value),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Value::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// True for an unquoted null scalar.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Scalar(s) if s.is_null())
    }

    /// Extract the decoded object as a `T`.
    ///
    /// Fails with [`Error::ResultTypeMismatch`] when the value is not an
    /// object, or is an object of a different type.
    pub fn into_object<T: Any>(self) -> Result<T, Error> {
        match self {
            Value::Object(obj) => obj.downcast::<T>(),
            other => Err(Error::ResultTypeMismatch {
                expected: std::any::type_name::<T>(),
                actual: format!("a plain {} node", other.shape()),
            }),
        }
    }

    /// Shape of this value, counting objects as mappings for diagnostics.
    pub(crate) fn shape(&self) -> NodeShape {
        match self {
            Value::Scalar(_) => NodeShape::Scalar,
            Value::Sequence(_) => NodeShape::Sequence,
            Value::Mapping(_) | Value::Object(_) => NodeShape::Mapping,
        }
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::scalar(if b { "true" } else { "false" })
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::scalar(v.to_string())
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::scalar(v.to_string())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        let mut s = String::new();
        // Formatting an f64 into a string cannot fail.
        let _ = crate::float_format::push_float_string(&mut s, v);
        Value::scalar(s)
    }
}

impl From<Sequence> for Value {
    fn from(seq: Sequence) -> Self {
        Value::Sequence(seq)
    }
}

impl From<Mapping> for Value {
    fn from(m: Mapping) -> Self {
        Value::Mapping(m)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj)
    }
}

/// The three-shape view of a node handed to a handler's construction
/// methods. Children are already fully resolved [`Value`]s; the scalar form
/// is the raw text only.
#[derive(Clone, Debug, PartialEq)]
pub enum PlainNode {
    Mapping(Mapping),
    Sequence(Sequence),
    Scalar(String),
}

impl PlainNode {
    pub fn shape(&self) -> NodeShape {
        match self {
            PlainNode::Mapping(_) => NodeShape::Mapping,
            PlainNode::Sequence(_) => NodeShape::Sequence,
            PlainNode::Scalar(_) => NodeShape::Scalar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_preserves_insertion_order() {
        let mut m = Mapping::new();
        m.insert("b", 1i64);
        m.insert("a", 2i64);
        let keys: Vec<_> = m.iter().map(|(k, _)| k.as_str().unwrap().to_owned()).collect();
        assert_eq!(keys, ["b", "a"]);
        assert_eq!(m.get("a").unwrap().as_str(), Some("2"));
    }

    #[test]
    fn object_equality_is_structural() {
        #[derive(Clone, Debug, PartialEq)]
        struct P {
            x: i32,
        }
        let a = Value::Object(Object::new(P { x: 1 }));
        let b = Value::Object(Object::new(P { x: 1 }));
        let c = Value::Object(Object::new(P { x: 2 }));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn object_downcast_mismatch_names_types() {
        #[derive(Clone, Debug, PartialEq)]
        struct P;
        let err = Value::Object(Object::new(P)).into_object::<String>().unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("not an instance"), "unexpected error: {msg}");
    }

    #[test]
    fn quoted_and_plain_scalars_differ() {
        assert_ne!(Value::scalar("1"), Value::string("1"));
        assert!(Value::null().is_null());
        assert!(!Value::string("null").is_null());
    }
}
