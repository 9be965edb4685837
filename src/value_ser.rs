//! Serde bridge, encode direction: turn any `Serialize` type into a
//! [`Value`] tree.
//!
//! Numbers, booleans and nulls become plain scalars; strings become quoted
//! scalars so they never read back as something else. Enums use the
//! externally tagged layout.

use serde::Serialize;
use serde::ser;

use crate::error::Error;
use crate::float_format::push_float_string;
use crate::value::{Mapping, Scalar, Value};

/// Serialize `value` into a [`Value`] tree.
pub fn to_value<T>(value: &T) -> Result<Value, Error>
where
    T: Serialize + ?Sized,
{
    value.serialize(ValueSerializer)
}

/// Serialize `value` and require the result to be a mapping.
///
/// This is the standard body of a type's `to_yaml`: structs serialize to
/// mappings naturally.
pub fn to_mapping<T>(value: &T) -> Result<Mapping, Error>
where
    T: Serialize + ?Sized,
{
    match to_value(value)? {
        Value::Mapping(mapping) => Ok(mapping),
        other => Err(Error::msg(format!(
            "expected the serialized form to be a mapping, got a {} node",
            other.shape()
        ))),
    }
}

struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SeqSerializer;
    type SerializeTuple = SeqSerializer;
    type SerializeTupleStruct = SeqSerializer;
    type SerializeTupleVariant = VariantSeqSerializer;
    type SerializeMap = MapSerializer;
    type SerializeStruct = MapSerializer;
    type SerializeStructVariant = VariantMapSerializer;

    fn serialize_bool(self, v: bool) -> Result<Value, Error> {
        Ok(Value::from(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, Error> {
        self.serialize_i64(v.into())
    }

    fn serialize_i16(self, v: i16) -> Result<Value, Error> {
        self.serialize_i64(v.into())
    }

    fn serialize_i32(self, v: i32) -> Result<Value, Error> {
        self.serialize_i64(v.into())
    }

    fn serialize_i64(self, v: i64) -> Result<Value, Error> {
        Ok(Value::scalar(v.to_string()))
    }

    fn serialize_i128(self, v: i128) -> Result<Value, Error> {
        Ok(Value::scalar(v.to_string()))
    }

    fn serialize_u8(self, v: u8) -> Result<Value, Error> {
        self.serialize_u64(v.into())
    }

    fn serialize_u16(self, v: u16) -> Result<Value, Error> {
        self.serialize_u64(v.into())
    }

    fn serialize_u32(self, v: u32) -> Result<Value, Error> {
        self.serialize_u64(v.into())
    }

    fn serialize_u64(self, v: u64) -> Result<Value, Error> {
        Ok(Value::scalar(v.to_string()))
    }

    fn serialize_u128(self, v: u128) -> Result<Value, Error> {
        Ok(Value::scalar(v.to_string()))
    }

    fn serialize_f32(self, v: f32) -> Result<Value, Error> {
        let mut s = String::new();
        push_float_string(&mut s, v)?;
        Ok(Value::scalar(s))
    }

    fn serialize_f64(self, v: f64) -> Result<Value, Error> {
        let mut s = String::new();
        push_float_string(&mut s, v)?;
        Ok(Value::scalar(s))
    }

    fn serialize_char(self, v: char) -> Result<Value, Error> {
        Ok(Value::string(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value, Error> {
        Ok(Value::string(v))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Value, Error> {
        Err(Error::msg(
            "byte strings are not supported; serialize them as a sequence or an encoded string",
        ))
    }

    fn serialize_none(self) -> Result<Value, Error> {
        Ok(Value::Scalar(Scalar::plain("")))
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value, Error>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value, Error> {
        Ok(Value::Scalar(Scalar::plain("")))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value, Error> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value, Error> {
        Ok(Value::string(variant))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value, Error>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, Error>
    where
        T: Serialize + ?Sized,
    {
        let mut mapping = Mapping::with_capacity(1);
        mapping.insert(Value::string(variant), value.serialize(ValueSerializer)?);
        Ok(Value::Mapping(mapping))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqSerializer, Error> {
        Ok(SeqSerializer {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqSerializer, Error> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SeqSerializer, Error> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantSeqSerializer, Error> {
        Ok(VariantSeqSerializer {
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapSerializer, Error> {
        Ok(MapSerializer {
            mapping: Mapping::with_capacity(len.unwrap_or(0)),
            pending_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<MapSerializer, Error> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantMapSerializer, Error> {
        Ok(VariantMapSerializer {
            variant,
            mapping: Mapping::with_capacity(len),
        })
    }
}

struct SeqSerializer {
    items: Vec<Value>,
}

impl ser::SerializeSeq for SeqSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), Error>
    where
        T: Serialize + ?Sized,
    {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, Error> {
        Ok(Value::Sequence(self.items))
    }
}

impl ser::SerializeTuple for SeqSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), Error>
    where
        T: Serialize + ?Sized,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, Error> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SeqSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), Error>
    where
        T: Serialize + ?Sized,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, Error> {
        ser::SerializeSeq::end(self)
    }
}

struct VariantSeqSerializer {
    variant: &'static str,
    items: Vec<Value>,
}

impl ser::SerializeTupleVariant for VariantSeqSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), Error>
    where
        T: Serialize + ?Sized,
    {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, Error> {
        let mut mapping = Mapping::with_capacity(1);
        mapping.insert(Value::string(self.variant), Value::Sequence(self.items));
        Ok(Value::Mapping(mapping))
    }
}

struct MapSerializer {
    mapping: Mapping,
    pending_key: Option<Value>,
}

impl ser::SerializeMap for MapSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), Error>
    where
        T: Serialize + ?Sized,
    {
        self.pending_key = Some(key.serialize(ValueSerializer)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), Error>
    where
        T: Serialize + ?Sized,
    {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| Error::msg("serialize_value called before serialize_key"))?;
        self.mapping.insert(key, value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, Error> {
        Ok(Value::Mapping(self.mapping))
    }
}

impl ser::SerializeStruct for MapSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), Error>
    where
        T: Serialize + ?Sized,
    {
        self.mapping
            .insert(Value::string(key), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, Error> {
        Ok(Value::Mapping(self.mapping))
    }
}

struct VariantMapSerializer {
    variant: &'static str,
    mapping: Mapping,
}

impl ser::SerializeStructVariant for VariantMapSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), Error>
    where
        T: Serialize + ?Sized,
    {
        self.mapping
            .insert(Value::string(key), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, Error> {
        let mut outer = Mapping::with_capacity(1);
        outer.insert(Value::string(self.variant), Value::Mapping(self.mapping));
        Ok(Value::Mapping(outer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Point {
        x: i32,
        label: String,
    }

    #[test]
    fn struct_serializes_to_mapping() {
        let mapping = to_mapping(&Point {
            x: 3,
            label: "origin".into(),
        })
        .unwrap();
        assert_eq!(mapping.get("x"), Some(&Value::scalar("3")));
        assert_eq!(mapping.get("label"), Some(&Value::string("origin")));
    }

    #[test]
    fn numbers_and_strings_stay_distinct() {
        assert_eq!(to_value(&7i64).unwrap(), Value::scalar("7"));
        assert_eq!(to_value("7").unwrap(), Value::string("7"));
        assert_ne!(to_value(&7i64).unwrap(), to_value("7").unwrap());
    }

    #[test]
    fn scalar_root_is_not_a_mapping() {
        let err = to_mapping(&5i32).unwrap_err();
        assert!(format!("{err}").contains("expected the serialized form to be a mapping"));
    }

    #[test]
    fn floats_keep_a_decimal_point() {
        assert_eq!(to_value(&1f64).unwrap(), Value::scalar("1.0"));
        assert_eq!(to_value(&f64::INFINITY).unwrap(), Value::scalar(".inf"));
    }

    #[test]
    fn externally_tagged_enums() {
        #[derive(Serialize)]
        enum Shape {
            Dot,
            Circle { r: f32 },
        }
        assert_eq!(to_value(&Shape::Dot).unwrap(), Value::string("Dot"));
        let circle = to_value(&Shape::Circle { r: 2.0 }).unwrap();
        let mapping = circle.as_mapping().unwrap();
        assert!(mapping.get("Circle").is_some());
    }
}
