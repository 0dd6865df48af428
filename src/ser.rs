//! Serialize any `T: Serialize` into a [`TaggedValue`] tree.
//!
//! Strings become [`TaggedValue::JsonString`] and integers that fit an `i32`
//! become [`TaggedValue::Int`] (wider ones become [`TaggedValue::Double`]), which
//! matches what the JSON reader produces for the same data. Enum variants with
//! content are wrapped in a one-member object named after the variant.

use crate::{Error, JsonObject, Result, TaggedValue};
use serde::ser::{self, Serialize};

/// Serializer producing [`TaggedValue`]s.
pub struct ValueSerializer;

pub struct SerializeVec {
    items: Vec<TaggedValue>,
    variant: Option<&'static str>,
}

pub struct SerializeMap {
    object: JsonObject,
    current_key: Option<String>,
    variant: Option<&'static str>,
}

fn integer(v: i64) -> TaggedValue {
    i32::try_from(v).map_or(TaggedValue::Double(v as f64), TaggedValue::Int)
}

fn wrap_variant(variant: Option<&'static str>, value: TaggedValue) -> TaggedValue {
    match variant {
        Some(name) => {
            let mut object = JsonObject::with_capacity(1);
            object.push(name, value);
            TaggedValue::Object(object)
        }
        None => value,
    }
}

impl ser::Serializer for ValueSerializer {
    type Ok = TaggedValue;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<TaggedValue> {
        Ok(TaggedValue::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<TaggedValue> {
        Ok(TaggedValue::Int(i32::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<TaggedValue> {
        Ok(TaggedValue::Int(i32::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<TaggedValue> {
        Ok(TaggedValue::Int(v))
    }

    fn serialize_i64(self, v: i64) -> Result<TaggedValue> {
        Ok(integer(v))
    }

    fn serialize_u8(self, v: u8) -> Result<TaggedValue> {
        Ok(TaggedValue::Int(i32::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<TaggedValue> {
        Ok(TaggedValue::Int(i32::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<TaggedValue> {
        Ok(integer(i64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<TaggedValue> {
        Ok(i32::try_from(v).map_or(TaggedValue::Double(v as f64), TaggedValue::Int))
    }

    fn serialize_f32(self, v: f32) -> Result<TaggedValue> {
        Ok(TaggedValue::Float(v))
    }

    fn serialize_f64(self, v: f64) -> Result<TaggedValue> {
        Ok(TaggedValue::Double(v))
    }

    fn serialize_char(self, v: char) -> Result<TaggedValue> {
        Ok(TaggedValue::Char(v))
    }

    fn serialize_str(self, v: &str) -> Result<TaggedValue> {
        Ok(TaggedValue::json_string(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<TaggedValue> {
        Ok(TaggedValue::Array(
            v.iter().map(|&b| TaggedValue::Int(i32::from(b))).collect(),
        ))
    }

    fn serialize_none(self) -> Result<TaggedValue> {
        Ok(TaggedValue::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<TaggedValue>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<TaggedValue> {
        Ok(TaggedValue::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<TaggedValue> {
        Ok(TaggedValue::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<TaggedValue> {
        Ok(TaggedValue::json_string(variant))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<TaggedValue>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<TaggedValue>
    where
        T: ?Sized + Serialize,
    {
        Ok(wrap_variant(Some(variant), to_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0), None))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, Some(variant)))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len.unwrap_or(0), None))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len, None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len, Some(variant)))
    }
}

impl SerializeVec {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeVec {
            items: Vec::with_capacity(capacity),
            variant,
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn finish(self) -> TaggedValue {
        wrap_variant(self.variant, TaggedValue::Array(self.items))
    }
}

impl SerializeMap {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeMap {
            object: JsonObject::with_capacity(capacity),
            current_key: None,
            variant,
        }
    }

    fn finish(self) -> TaggedValue {
        wrap_variant(self.variant, TaggedValue::Object(self.object))
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = TaggedValue;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<TaggedValue> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = TaggedValue;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<TaggedValue> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = TaggedValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<TaggedValue> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = TaggedValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<TaggedValue> {
        Ok(self.finish())
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = TaggedValue;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = match to_value(key)? {
            TaggedValue::String(s) | TaggedValue::JsonString(s) => s,
            TaggedValue::Char(c) => c.to_string(),
            TaggedValue::Int(i) => i.to_string(),
            TaggedValue::Bool(b) => b.to_string(),
            other => return Err(Error::type_mismatch("a string map key", other.kind())),
        };
        self.current_key = Some(key);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.object.push(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<TaggedValue> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = TaggedValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.object.push(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<TaggedValue> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = TaggedValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.object.push(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<TaggedValue> {
        Ok(self.finish())
    }
}

pub(crate) fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<TaggedValue> {
    value.serialize(ValueSerializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    enum Shape {
        Empty,
        Circle(f64),
        Rect { w: u8, h: u8 },
        Line(i32, i32),
    }

    #[test]
    fn test_integers_narrow_to_int() {
        assert_eq!(to_value(&7u64).unwrap(), TaggedValue::Int(7));
        assert_eq!(to_value(&-7i64).unwrap(), TaggedValue::Int(-7));
        assert_eq!(to_value(&u32::MAX).unwrap(), TaggedValue::Double(4_294_967_295.0));
    }

    #[test]
    fn test_enum_variants() {
        assert_eq!(to_value(&Shape::Empty).unwrap(), TaggedValue::json_string("Empty"));
        assert_eq!(to_value(&Shape::Circle(1.5)).unwrap().to_string(), r#"{ "Circle" : 1.5 }"#);
        assert_eq!(
            to_value(&Shape::Rect { w: 2, h: 3 }).unwrap().to_string(),
            r#"{ "Rect" : { "w" : 2, "h" : 3 } }"#
        );
        assert_eq!(
            to_value(&Shape::Line(1, 2)).unwrap().to_string(),
            r#"{ "Line" : [ 1, 2 ] }"#
        );
    }

    #[test]
    fn test_map_keys() {
        let mut map = BTreeMap::new();
        map.insert(1, "one");
        map.insert(2, "two");
        let value = to_value(&map).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.names().collect::<Vec<_>>(), vec!["1", "2"]);

        let mut bad = BTreeMap::new();
        bad.insert(vec![1], 1);
        assert!(matches!(to_value(&bad), Err(Error::TypeMismatch { .. })));
    }
}
