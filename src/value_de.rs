//! Serde bridge, decode direction: turn a [`Value`] tree into any
//! `Deserialize` type.
//!
//! Scalar text is interpreted lazily, against the requested target type.
//! Quoted scalars are strings and refuse to become numbers, booleans or
//! nulls; plain scalars parse on demand. Structs accept both a mapping
//! (by field name) and a sequence (positional) representation.

use serde::de::{self, DeserializeOwned, Deserializer, IntoDeserializer, Visitor};

use crate::error::Error;
use crate::scalars::{parse_float, parse_signed, parse_unsigned, parse_yaml11_bool};
use crate::value::{Scalar, Value};

/// Deserialize a `T` out of a [`Value`] tree.
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    T::deserialize(ValueDeserializer { value })
}

struct ValueDeserializer {
    value: Value,
}

/// Shape-mismatch diagnostic; reconstructed objects get a pointer to the
/// downcast API instead of a misleading "mapping node" message.
fn mismatch(expected: &str, value: &Value) -> Error {
    match value {
        Value::Object(obj) => Error::msg(format!(
            "cannot deserialize a reconstructed `{}` object through serde; \
             extract it with into_object or downcast instead",
            obj.type_name()
        )),
        other => Error::msg(format!(
            "expected {expected}, found a {} node",
            other.shape()
        )),
    }
}

impl ValueDeserializer {
    fn scalar(self, expected: &str) -> Result<Scalar, Error> {
        match self.value {
            Value::Scalar(s) => Ok(s),
            other => Err(mismatch(expected, &other)),
        }
    }

    /// A scalar allowed to parse as a non-string type: plain only.
    fn plain_scalar(self, expected: &str) -> Result<String, Error> {
        let s = self.scalar(expected)?;
        if s.quoted {
            return Err(Error::msg(format!(
                "expected {expected}, found the quoted string `{}`",
                s.value
            )));
        }
        Ok(s.value)
    }
}

macro_rules! deserialize_signed {
    ($method:ident, $visit:ident, $ty:ty) => {
        fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
            let text = self.plain_scalar("an integer")?;
            let wide = parse_signed(&text)
                .ok_or_else(|| Error::msg(format!("invalid integer: `{text}`")))?;
            let value = <$ty>::try_from(wide)
                .map_err(|_| Error::msg(format!("integer out of range: `{text}`")))?;
            visitor.$visit(value)
        }
    };
}

macro_rules! deserialize_unsigned {
    ($method:ident, $visit:ident, $ty:ty) => {
        fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
            let text = self.plain_scalar("an unsigned integer")?;
            let wide = parse_unsigned(&text)
                .ok_or_else(|| Error::msg(format!("invalid unsigned integer: `{text}`")))?;
            let value = <$ty>::try_from(wide)
                .map_err(|_| Error::msg(format!("integer out of range: `{text}`")))?;
            visitor.$visit(value)
        }
    };
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.value {
            Value::Scalar(s) if s.is_null() => visitor.visit_unit(),
            Value::Scalar(s) => visitor.visit_string(s.value),
            Value::Sequence(items) => visitor.visit_seq(SeqAccess {
                iter: items.into_iter(),
            }),
            Value::Mapping(mapping) => visitor.visit_map(MapAccess {
                iter: mapping.into_iter(),
                pending: None,
            }),
            other @ Value::Object(_) => Err(mismatch("a value", &other)),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        let text = self.plain_scalar("a boolean")?;
        visitor.visit_bool(parse_yaml11_bool(&text).map_err(Error::msg)?)
    }

    deserialize_signed!(deserialize_i8, visit_i8, i8);
    deserialize_signed!(deserialize_i16, visit_i16, i16);
    deserialize_signed!(deserialize_i32, visit_i32, i32);
    deserialize_signed!(deserialize_i64, visit_i64, i64);
    deserialize_signed!(deserialize_i128, visit_i128, i128);

    deserialize_unsigned!(deserialize_u8, visit_u8, u8);
    deserialize_unsigned!(deserialize_u16, visit_u16, u16);
    deserialize_unsigned!(deserialize_u32, visit_u32, u32);
    deserialize_unsigned!(deserialize_u64, visit_u64, u64);
    deserialize_unsigned!(deserialize_u128, visit_u128, u128);

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        let text = self.plain_scalar("a float")?;
        let value =
            parse_float(&text).ok_or_else(|| Error::msg(format!("invalid float: `{text}`")))?;
        visitor.visit_f32(value as f32)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        let text = self.plain_scalar("a float")?;
        let value =
            parse_float(&text).ok_or_else(|| Error::msg(format!("invalid float: `{text}`")))?;
        visitor.visit_f64(value)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        let s = self.scalar("a character")?;
        let mut chars = s.value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(Error::msg(format!(
                "expected a single character, found `{}`",
                s.value
            ))),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        let s = self.scalar("a string")?;
        visitor.visit_string(s.value)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, Error> {
        Err(Error::msg("byte strings are not supported"))
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        if self.value.is_null() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        if self.value.is_null() {
            visitor.visit_unit()
        } else {
            Err(mismatch("null", &self.value))
        }
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.value {
            Value::Sequence(items) => visitor.visit_seq(SeqAccess {
                iter: items.into_iter(),
            }),
            other => Err(mismatch("a sequence", &other)),
        }
    }

    fn deserialize_tuple<V: Visitor<'de>>(
        self,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, Error> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, Error> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.value {
            Value::Mapping(mapping) => visitor.visit_map(MapAccess {
                iter: mapping.into_iter(),
                pending: None,
            }),
            other => Err(mismatch("a mapping", &other)),
        }
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        match self.value {
            Value::Mapping(mapping) => visitor.visit_map(MapAccess {
                iter: mapping.into_iter(),
                pending: None,
            }),
            // Positional form: fields in declaration order.
            Value::Sequence(items) => visitor.visit_seq(SeqAccess {
                iter: items.into_iter(),
            }),
            other => Err(mismatch("a mapping or sequence", &other)),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        match self.value {
            Value::Scalar(s) => visitor.visit_enum(EnumAccess {
                variant: s.value,
                value: None,
            }),
            Value::Mapping(mapping) => {
                let mut iter = mapping.into_iter();
                let (key, value) = iter.next().ok_or_else(|| {
                    Error::msg("expected a mapping with a single variant key, found an empty one")
                })?;
                if iter.next().is_some() {
                    return Err(Error::msg(
                        "expected a mapping with a single variant key, found several",
                    ));
                }
                let Value::Scalar(variant) = key else {
                    return Err(Error::msg("enum variant key must be a scalar"));
                };
                visitor.visit_enum(EnumAccess {
                    variant: variant.value,
                    value: Some(value),
                })
            }
            other => Err(mismatch("an enum", &other)),
        }
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_unit()
    }
}

struct SeqAccess {
    iter: std::vec::IntoIter<Value>,
}

impl<'de> de::SeqAccess<'de> for SeqAccess {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, Error>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer { value }).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct MapAccess {
    iter: std::vec::IntoIter<(Value, Value)>,
    pending: Option<Value>,
}

impl<'de> de::MapAccess<'de> for MapAccess {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Error>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.pending = Some(value);
                seed.deserialize(ValueDeserializer { value: key }).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Error>
    where
        V: de::DeserializeSeed<'de>,
    {
        let value = self
            .pending
            .take()
            .ok_or_else(|| Error::msg("next_value_seed called before next_key_seed"))?;
        seed.deserialize(ValueDeserializer { value })
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct EnumAccess {
    variant: String,
    value: Option<Value>,
}

impl<'de> de::EnumAccess<'de> for EnumAccess {
    type Error = Error;
    type Variant = VariantAccess;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, VariantAccess), Error>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant_de: de::value::StringDeserializer<Error> = self.variant.into_deserializer();
        let variant = seed.deserialize(variant_de)?;
        Ok((variant, VariantAccess { value: self.value }))
    }
}

struct VariantAccess {
    value: Option<Value>,
}

impl<'de> de::VariantAccess<'de> for VariantAccess {
    type Error = Error;

    fn unit_variant(self) -> Result<(), Error> {
        match self.value {
            None => Ok(()),
            Some(_) => Err(Error::msg("unexpected payload for a unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value, Error>
    where
        T: de::DeserializeSeed<'de>,
    {
        let value = self
            .value
            .ok_or_else(|| Error::msg("expected a payload for a newtype variant"))?;
        seed.deserialize(ValueDeserializer { value })
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value, Error> {
        let value = self
            .value
            .ok_or_else(|| Error::msg("expected a sequence payload for a tuple variant"))?;
        ValueDeserializer { value }.deserialize_seq(visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        let value = self
            .value
            .ok_or_else(|| Error::msg("expected a mapping payload for a struct variant"))?;
        ValueDeserializer { value }.deserialize_map(visitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Mapping;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Point {
        x: i32,
        label: String,
    }

    fn point_mapping() -> Value {
        let mut m = Mapping::new();
        m.insert("x", Value::scalar("3"));
        m.insert("label", "origin");
        Value::Mapping(m)
    }

    #[test]
    fn struct_from_mapping() {
        let p: Point = from_value(point_mapping()).unwrap();
        assert_eq!(
            p,
            Point {
                x: 3,
                label: "origin".into()
            }
        );
    }

    #[test]
    fn struct_from_sequence_is_positional() {
        let v = Value::Sequence(vec![Value::scalar("3"), Value::string("origin")]);
        let p: Point = from_value(v).unwrap();
        assert_eq!(p.x, 3);
    }

    #[test]
    fn quoted_scalars_refuse_numeric_targets() {
        let err = from_value::<i32>(Value::string("3")).unwrap_err();
        assert!(format!("{err}").contains("quoted string"));
        let ok: String = from_value(Value::string("3")).unwrap();
        assert_eq!(ok, "3");
    }

    #[test]
    fn plain_scalars_parse_on_demand() {
        assert_eq!(from_value::<i32>(Value::scalar("0x1F")).unwrap(), 31);
        assert!(from_value::<bool>(Value::scalar("yes")).unwrap());
        assert_eq!(from_value::<String>(Value::scalar("0")).unwrap(), "0");
    }

    #[test]
    fn nulls_and_options() {
        assert_eq!(from_value::<Option<i32>>(Value::null()).unwrap(), None);
        assert_eq!(
            from_value::<Option<i32>>(Value::scalar("5")).unwrap(),
            Some(5)
        );
        // A quoted "null" is the string, not a null.
        assert_eq!(
            from_value::<Option<String>>(Value::string("null")).unwrap(),
            Some("null".into())
        );
    }

    #[test]
    fn enum_variants_of_every_payload_kind() {
        #[derive(Debug, Deserialize, PartialEq)]
        enum Shape {
            Dot,
            Pair(i32, i32),
            Rect { w: i32, h: i32 },
        }

        assert_eq!(from_value::<Shape>(Value::string("Dot")).unwrap(), Shape::Dot);

        let mut m = Mapping::new();
        m.insert("Pair", Value::Sequence(vec![Value::scalar("1"), Value::scalar("2")]));
        assert_eq!(
            from_value::<Shape>(Value::Mapping(m)).unwrap(),
            Shape::Pair(1, 2)
        );

        let mut inner = Mapping::new();
        inner.insert("w", Value::scalar("3"));
        inner.insert("h", Value::scalar("4"));
        let mut m = Mapping::new();
        m.insert("Rect", Value::Mapping(inner));
        assert_eq!(
            from_value::<Shape>(Value::Mapping(m)).unwrap(),
            Shape::Rect { w: 3, h: 4 }
        );
    }

    #[test]
    fn objects_do_not_pass_through_serde() {
        #[derive(Clone, Debug, PartialEq)]
        struct Opaque;
        let v = Value::Object(crate::value::Object::new(Opaque));
        let err = from_value::<String>(v).unwrap_err();
        assert!(format!("{err}").contains("into_object"));
    }
}
