//! Tagged value representation shared by the INI and JSON readers.
//!
//! This module provides the [`TaggedValue`] enum, a closed set of value kinds that
//! every document in this crate is built from.
//!
//! ## Core Types
//!
//! - [`TaggedValue`]: One value; scalar (string, char, int, float, double, bool, JSON
//!   string, null) or composite (object, array)
//! - [`ValueKind`]: The tag of a value without its payload
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use tagconf::{tagged, TaggedValue};
//!
//! let number = TaggedValue::from(42);
//! let text = TaggedValue::from("hello");
//! let quoted = TaggedValue::json_string("hello");
//!
//! let object = tagged!({ "width": 800, "title": "main" });
//! assert!(object.is_object());
//! ```
//!
//! ### Typed Access
//!
//! ```rust
//! use tagconf::{Error, TaggedValue};
//!
//! let value = TaggedValue::from(42);
//! assert_eq!(value.get::<i32>().unwrap(), 42);
//! assert!(matches!(value.get::<bool>(), Err(Error::TypeMismatch { .. })));
//! ```
//!
//! ### Rendering
//!
//! ```rust
//! use tagconf::{tagged, FormatOptions};
//!
//! let value = tagged!({ "ratio": 1.5f64, "on": true });
//! assert_eq!(value.to_string(), r#"{ "ratio" : 1.5, "on" : true }"#);
//!
//! let dutch = FormatOptions::for_culture("nl-NL");
//! assert_eq!(value.to_display_string(&dutch), r#"{ "ratio" : 1,5, "on" : true }"#);
//! ```

use crate::object::{read_members, JsonMember};
use crate::{Error, FormatOptions, JsonObject, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A value with a fixed type tag.
///
/// The variant is chosen when the value is constructed; [`set`](Self::set) only
/// replaces the payload. `String` holds raw text such as an INI value, while
/// `JsonString` holds text that was quoted in JSON and renders with quotes.
///
/// # Examples
///
/// ```rust
/// use tagconf::{TaggedValue, ValueKind};
///
/// let mut value = TaggedValue::from(1.5f32);
/// assert_eq!(value.kind(), ValueKind::Float);
///
/// value.set(2.5f32).unwrap();
/// assert_eq!(value.as_f32(), Some(2.5));
/// assert!(value.set(7).is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum TaggedValue {
    String(String),
    Char(char),
    Int(i32),
    Float(f32),
    Double(f64),
    Bool(bool),
    JsonString(String),
    Object(JsonObject),
    Array(Vec<TaggedValue>),
    #[default]
    Null,
}

/// The tag of a [`TaggedValue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Char,
    Int,
    Float,
    Double,
    Bool,
    JsonString,
    Object,
    Array,
    Null,
}

impl ValueKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Char => "char",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Double => "double",
            ValueKind::Bool => "bool",
            ValueKind::JsonString => "json string",
            ValueKind::Object => "object",
            ValueKind::Array => "array",
            ValueKind::Null => "null",
        }
    }

    /// `true` for every kind the INI writer emits.
    #[must_use]
    pub const fn is_scalar(self) -> bool {
        !matches!(self, ValueKind::Object | ValueKind::Array | ValueKind::Null)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TaggedValue {
    /// Creates a `JsonString` value.
    #[must_use]
    pub fn json_string(text: impl Into<String>) -> Self {
        TaggedValue::JsonString(text.into())
    }

    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            TaggedValue::String(_) => ValueKind::String,
            TaggedValue::Char(_) => ValueKind::Char,
            TaggedValue::Int(_) => ValueKind::Int,
            TaggedValue::Float(_) => ValueKind::Float,
            TaggedValue::Double(_) => ValueKind::Double,
            TaggedValue::Bool(_) => ValueKind::Bool,
            TaggedValue::JsonString(_) => ValueKind::JsonString,
            TaggedValue::Object(_) => ValueKind::Object,
            TaggedValue::Array(_) => ValueKind::Array,
            TaggedValue::Null => ValueKind::Null,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, TaggedValue::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, TaggedValue::Bool(_))
    }

    /// Returns `true` for both `String` and `JsonString`.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, TaggedValue::String(_) | TaggedValue::JsonString(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(
            self,
            TaggedValue::Int(_) | TaggedValue::Float(_) | TaggedValue::Double(_)
        )
    }

    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, TaggedValue::Object(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, TaggedValue::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        self.kind().is_scalar()
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TaggedValue::String(s) | TaggedValue::JsonString(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_char(&self) -> Option<char> {
        match self {
            TaggedValue::Char(c) => Some(*c),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            TaggedValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            TaggedValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TaggedValue::Double(d) => Some(*d),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TaggedValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&JsonObject> {
        match self {
            TaggedValue::Object(object) => Some(object),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object_mut(&mut self) -> Option<&mut JsonObject> {
        match self {
            TaggedValue::Object(object) => Some(object),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<TaggedValue>> {
        match self {
            TaggedValue::Array(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<TaggedValue>> {
        match self {
            TaggedValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Extracts the payload as `T`.
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] when the variant does not carry a `T`.
    pub fn get<T>(&self) -> Result<T>
    where
        T: for<'a> TryFrom<&'a TaggedValue, Error = Error>,
    {
        T::try_from(self)
    }

    /// Replaces the payload, keeping the variant.
    ///
    /// `String` and `JsonString` accept each other's text; every other variant only
    /// accepts a value of its own kind.
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] when the kinds differ; `self` is left untouched.
    pub fn set(&mut self, value: impl Into<TaggedValue>) -> Result<()> {
        let value = value.into();
        match (&mut *self, value) {
            (TaggedValue::String(slot), TaggedValue::String(text) | TaggedValue::JsonString(text))
            | (
                TaggedValue::JsonString(slot),
                TaggedValue::String(text) | TaggedValue::JsonString(text),
            ) => {
                *slot = text;
                Ok(())
            }
            (slot, value) if slot.kind() == value.kind() => {
                *slot = value;
                Ok(())
            }
            (slot, value) => Err(Error::type_mismatch(slot.kind(), value.kind())),
        }
    }

    /// Parses the value as an `i32` through `format`.
    ///
    /// Text variants are parsed; an `Int` is returned as is.
    pub fn parse_i32(&self, format: &FormatOptions) -> Result<i32> {
        match self {
            TaggedValue::Int(i) => Ok(*i),
            TaggedValue::String(s) | TaggedValue::JsonString(s) => format.parse_i32(s),
            other => Err(Error::type_mismatch(ValueKind::Int, other.kind())),
        }
    }

    pub fn parse_f32(&self, format: &FormatOptions) -> Result<f32> {
        match self {
            TaggedValue::Float(f) => Ok(*f),
            TaggedValue::String(s) | TaggedValue::JsonString(s) => format.parse_f32(s),
            other => Err(Error::type_mismatch(ValueKind::Float, other.kind())),
        }
    }

    pub fn parse_f64(&self, format: &FormatOptions) -> Result<f64> {
        match self {
            TaggedValue::Double(d) => Ok(*d),
            TaggedValue::String(s) | TaggedValue::JsonString(s) => format.parse_f64(s),
            other => Err(Error::type_mismatch(ValueKind::Double, other.kind())),
        }
    }

    pub fn parse_bool(&self, format: &FormatOptions) -> Result<bool> {
        match self {
            TaggedValue::Bool(b) => Ok(*b),
            TaggedValue::String(s) | TaggedValue::JsonString(s) => format.parse_bool(s),
            other => Err(Error::type_mismatch(ValueKind::Bool, other.kind())),
        }
    }

    /// Renders the value as text using `format` for numbers and booleans.
    ///
    /// Composite values use the loose display layout: `{ "name" : value, ... }` for
    /// objects and `[ a, b ]` for arrays.
    #[must_use]
    pub fn to_display_string(&self, format: &FormatOptions) -> String {
        match self {
            TaggedValue::String(s) => s.clone(),
            TaggedValue::Char(c) => c.to_string(),
            TaggedValue::Int(i) => format.format_i32(*i),
            TaggedValue::Float(f) => format.format_f32(*f),
            TaggedValue::Double(d) => format.format_f64(*d),
            TaggedValue::Bool(b) => format.format_bool(*b).to_string(),
            TaggedValue::JsonString(s) => quote(s),
            TaggedValue::Object(object) => Self::render_object(object, format),
            TaggedValue::Array(items) => {
                let parts: Vec<String> = items
                    .iter()
                    .map(|item| item.to_display_string(format))
                    .collect();
                if parts.is_empty() {
                    return "[]".to_string();
                }
                format!("[ {} ]", parts.join(", "))
            }
            TaggedValue::Null => "null".to_string(),
        }
    }

    pub(crate) fn render_object(object: &JsonObject, format: &FormatOptions) -> String {
        let parts: Vec<String> = object
            .members()
            .map(|member| match member {
                JsonMember::Pair { name, value } => {
                    format!("{} : {}", quote(name), value.to_display_string(format))
                }
                JsonMember::Separator => "null".to_string(),
            })
            .collect();
        if parts.is_empty() {
            return "{}".to_string();
        }
        format!("{{ {} }}", parts.join(", "))
    }
}

fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

impl fmt::Display for TaggedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string(&FormatOptions::default()))
    }
}

impl Serialize for TaggedValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            TaggedValue::String(s) | TaggedValue::JsonString(s) => serializer.serialize_str(s),
            TaggedValue::Char(c) => serializer.serialize_char(*c),
            TaggedValue::Int(i) => serializer.serialize_i32(*i),
            TaggedValue::Float(f) => serializer.serialize_f32(*f),
            TaggedValue::Double(d) => serializer.serialize_f64(*d),
            TaggedValue::Bool(b) => serializer.serialize_bool(*b),
            TaggedValue::Object(object) => object.serialize(serializer),
            TaggedValue::Array(items) => items.serialize(serializer),
            TaggedValue::Null => serializer.serialize_unit(),
        }
    }
}

impl<'de> Deserialize<'de> for TaggedValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct TaggedValueVisitor;

        impl<'de> Visitor<'de> for TaggedValueVisitor {
            type Value = TaggedValue;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any tagged value")
            }

            fn visit_bool<E>(self, value: bool) -> std::result::Result<Self::Value, E> {
                Ok(TaggedValue::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> std::result::Result<Self::Value, E> {
                Ok(i32::try_from(value)
                    .map(TaggedValue::Int)
                    .unwrap_or(TaggedValue::Double(value as f64)))
            }

            fn visit_u64<E>(self, value: u64) -> std::result::Result<Self::Value, E> {
                Ok(i32::try_from(value)
                    .map(TaggedValue::Int)
                    .unwrap_or(TaggedValue::Double(value as f64)))
            }

            fn visit_f64<E>(self, value: f64) -> std::result::Result<Self::Value, E> {
                Ok(TaggedValue::Double(value))
            }

            fn visit_char<E>(self, value: char) -> std::result::Result<Self::Value, E> {
                Ok(TaggedValue::Char(value))
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E> {
                Ok(TaggedValue::JsonString(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> std::result::Result<Self::Value, E> {
                Ok(TaggedValue::JsonString(value))
            }

            fn visit_unit<E>(self) -> std::result::Result<Self::Value, E> {
                Ok(TaggedValue::Null)
            }

            fn visit_none<E>(self) -> std::result::Result<Self::Value, E> {
                Ok(TaggedValue::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(item) = seq.next_element()? {
                    items.push(item);
                }
                Ok(TaggedValue::Array(items))
            }

            fn visit_map<A>(self, map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                read_members(map).map(TaggedValue::Object)
            }
        }

        deserializer.deserialize_any(TaggedValueVisitor)
    }
}

macro_rules! scalar_conversions {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for TaggedValue {
                fn from(value: $ty) -> Self {
                    TaggedValue::$variant(value)
                }
            }

            impl TryFrom<&TaggedValue> for $ty {
                type Error = Error;

                fn try_from(value: &TaggedValue) -> Result<Self> {
                    match value {
                        TaggedValue::$variant(v) => Ok(*v),
                        other => Err(Error::type_mismatch(ValueKind::$variant, other.kind())),
                    }
                }
            }

            impl TryFrom<TaggedValue> for $ty {
                type Error = Error;

                fn try_from(value: TaggedValue) -> Result<Self> {
                    <$ty>::try_from(&value)
                }
            }
        )*
    };
}

scalar_conversions! {
    char => Char,
    i32 => Int,
    f32 => Float,
    f64 => Double,
    bool => Bool,
}

// Narrow integers widen into Int
impl From<i8> for TaggedValue {
    fn from(value: i8) -> Self {
        TaggedValue::Int(i32::from(value))
    }
}

impl From<i16> for TaggedValue {
    fn from(value: i16) -> Self {
        TaggedValue::Int(i32::from(value))
    }
}

impl From<u8> for TaggedValue {
    fn from(value: u8) -> Self {
        TaggedValue::Int(i32::from(value))
    }
}

impl From<u16> for TaggedValue {
    fn from(value: u16) -> Self {
        TaggedValue::Int(i32::from(value))
    }
}

impl From<&str> for TaggedValue {
    fn from(value: &str) -> Self {
        TaggedValue::String(value.to_string())
    }
}

impl From<String> for TaggedValue {
    fn from(value: String) -> Self {
        TaggedValue::String(value)
    }
}

impl From<JsonObject> for TaggedValue {
    fn from(value: JsonObject) -> Self {
        TaggedValue::Object(value)
    }
}

impl From<Vec<TaggedValue>> for TaggedValue {
    fn from(value: Vec<TaggedValue>) -> Self {
        TaggedValue::Array(value)
    }
}

impl<T: Into<TaggedValue>> From<Option<T>> for TaggedValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(TaggedValue::Null, Into::into)
    }
}

impl TryFrom<&TaggedValue> for String {
    type Error = Error;

    fn try_from(value: &TaggedValue) -> Result<Self> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::type_mismatch(ValueKind::String, value.kind()))
    }
}

impl TryFrom<TaggedValue> for String {
    type Error = Error;

    fn try_from(value: TaggedValue) -> Result<Self> {
        match value {
            TaggedValue::String(s) | TaggedValue::JsonString(s) => Ok(s),
            other => Err(Error::type_mismatch(ValueKind::String, other.kind())),
        }
    }
}

impl TryFrom<&TaggedValue> for JsonObject {
    type Error = Error;

    fn try_from(value: &TaggedValue) -> Result<Self> {
        value
            .as_object()
            .cloned()
            .ok_or_else(|| Error::type_mismatch(ValueKind::Object, value.kind()))
    }
}

impl TryFrom<TaggedValue> for JsonObject {
    type Error = Error;

    fn try_from(value: TaggedValue) -> Result<Self> {
        match value {
            TaggedValue::Object(object) => Ok(object),
            other => Err(Error::type_mismatch(ValueKind::Object, other.kind())),
        }
    }
}

impl TryFrom<&TaggedValue> for Vec<TaggedValue> {
    type Error = Error;

    fn try_from(value: &TaggedValue) -> Result<Self> {
        value
            .as_array()
            .cloned()
            .ok_or_else(|| Error::type_mismatch(ValueKind::Array, value.kind()))
    }
}

impl TryFrom<TaggedValue> for Vec<TaggedValue> {
    type Error = Error;

    fn try_from(value: TaggedValue) -> Result<Self> {
        match value {
            TaggedValue::Array(items) => Ok(items),
            other => Err(Error::type_mismatch(ValueKind::Array, other.kind())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_is_fixed_at_construction() {
        let mut value = TaggedValue::from(3);
        assert_eq!(value.kind(), ValueKind::Int);
        assert!(value.set(4).is_ok());
        assert_eq!(value, TaggedValue::Int(4));
        assert_eq!(
            value.set("four"),
            Err(Error::type_mismatch("int", "string"))
        );
        assert_eq!(value, TaggedValue::Int(4));
    }

    #[test]
    fn test_set_string_family_keeps_variant() {
        let mut quoted = TaggedValue::json_string("a");
        quoted.set("b").unwrap();
        assert_eq!(quoted, TaggedValue::JsonString("b".to_string()));

        let mut raw = TaggedValue::from("a");
        raw.set(TaggedValue::json_string("c")).unwrap();
        assert_eq!(raw, TaggedValue::String("c".to_string()));
    }

    #[test]
    fn test_get_typed() {
        assert_eq!(TaggedValue::Char('x').get::<char>().unwrap(), 'x');
        assert_eq!(TaggedValue::Double(2.5).get::<f64>().unwrap(), 2.5);
        assert_eq!(
            TaggedValue::json_string("s").get::<String>().unwrap(),
            "s"
        );
        assert!(TaggedValue::Float(1.0).get::<f64>().is_err());
        assert!(TaggedValue::Null.get::<JsonObject>().is_err());
        assert_eq!(
            TaggedValue::Array(vec![TaggedValue::Null])
                .get::<Vec<TaggedValue>>()
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_display_scalars() {
        assert_eq!(TaggedValue::from("raw").to_string(), "raw");
        assert_eq!(
            TaggedValue::json_string("say \"hi\"").to_string(),
            r#""say \"hi\"""#
        );
        assert_eq!(TaggedValue::Bool(true).to_string(), "true");
        assert_eq!(TaggedValue::Float(0.5).to_string(), "0.5");
        assert_eq!(TaggedValue::Null.to_string(), "null");
        assert_eq!(TaggedValue::Char('c').to_string(), "c");
    }

    #[test]
    fn test_display_composites() {
        let mut object = JsonObject::new();
        object.push("a", TaggedValue::Int(1));
        object.push_separator();
        object.push(
            "b",
            TaggedValue::Array(vec![TaggedValue::Int(1), TaggedValue::json_string("x")]),
        );
        assert_eq!(
            TaggedValue::Object(object).to_string(),
            r#"{ "a" : 1, null, "b" : [ 1, "x" ] }"#
        );
    }

    #[test]
    fn test_culture_aware_parse() {
        let german = FormatOptions::for_culture("de-DE");
        let value = TaggedValue::from("1,25");
        assert_eq!(value.parse_f64(&german).unwrap(), 1.25);
        assert!(value.parse_f64(&FormatOptions::invariant()).is_err());
        assert_eq!(TaggedValue::from("17").parse_i32(&german).unwrap(), 17);
        assert!(TaggedValue::from(" TRUE ").parse_bool(&german).unwrap());
        assert!(TaggedValue::Null.parse_i32(&german).is_err());
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(TaggedValue::from(None::<i32>), TaggedValue::Null);
        assert_eq!(TaggedValue::from(Some(2u8)), TaggedValue::Int(2));
    }
}
