//! Ordered member list for JSON objects.
//!
//! A [`JsonObject`] keeps its members exactly as they were read: duplicate names are
//! allowed, order is preserved, and a bare `null` inside braces survives as a
//! [`JsonMember::Separator`] placeholder instead of being dropped.
//!
//! ## Examples
//!
//! ```rust
//! use tagconf::{JsonObject, TaggedValue};
//!
//! let mut object = JsonObject::new();
//! object.push("name", TaggedValue::json_string("demo"));
//! object.push("tag", TaggedValue::from(1));
//! object.push("tag", TaggedValue::from(2));
//!
//! assert_eq!(object.len(), 3);
//! assert_eq!(object.get("tag"), Some(&TaggedValue::Int(1)));
//! assert_eq!(object.get_all("tag").count(), 2);
//! ```

use crate::TaggedValue;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One member of a [`JsonObject`].
#[derive(Clone, Debug, PartialEq)]
pub enum JsonMember {
    /// `"name" : value`
    Pair { name: String, value: TaggedValue },
    /// A bare `null` between members. Renders as `null`; carries no name.
    Separator,
}

impl JsonMember {
    #[inline]
    #[must_use]
    pub const fn is_separator(&self) -> bool {
        matches!(self, JsonMember::Separator)
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            JsonMember::Pair { name, .. } => Some(name),
            JsonMember::Separator => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<&TaggedValue> {
        match self {
            JsonMember::Pair { value, .. } => Some(value),
            JsonMember::Separator => None,
        }
    }
}

/// An ordered list of JSON object members.
///
/// Lookups by name return the first matching pair. Separators are counted by
/// [`len`](Self::len) but skipped by [`pairs`](Self::pairs).
#[derive(Clone, Debug, PartialEq, Default)]
pub struct JsonObject(Vec<JsonMember>);

impl JsonObject {
    #[must_use]
    pub fn new() -> Self {
        JsonObject(Vec::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        JsonObject(Vec::with_capacity(capacity))
    }

    /// Appends a named pair. Existing pairs with the same name are kept.
    pub fn push(&mut self, name: impl Into<String>, value: TaggedValue) {
        self.0.push(JsonMember::Pair {
            name: name.into(),
            value,
        });
    }

    pub fn push_separator(&mut self) {
        self.0.push(JsonMember::Separator);
    }

    pub fn push_member(&mut self, member: JsonMember) {
        self.0.push(member);
    }

    /// Number of members, separators included.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.pairs().count()
    }

    /// Returns the value of the first pair named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TaggedValue> {
        self.pairs()
            .find(|(n, _)| *n == name)
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut TaggedValue> {
        self.0.iter_mut().find_map(|member| match member {
            JsonMember::Pair { name: n, value } if n == name => Some(value),
            _ => None,
        })
    }

    /// Values of every pair named `name`, in member order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a TaggedValue> + 'a {
        self.pairs()
            .filter(move |(n, _)| *n == name)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Removes the first pair named `name` and returns its value.
    pub fn remove(&mut self, name: &str) -> Option<TaggedValue> {
        let index = self
            .0
            .iter()
            .position(|member| member.name() == Some(name))?;
        match self.0.remove(index) {
            JsonMember::Pair { value, .. } => Some(value),
            JsonMember::Separator => None,
        }
    }

    pub fn members(&self) -> std::slice::Iter<'_, JsonMember> {
        self.0.iter()
    }

    /// Named pairs in member order, skipping separators.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &TaggedValue)> + '_ {
        self.0.iter().filter_map(|member| match member {
            JsonMember::Pair { name, value } => Some((name.as_str(), value)),
            JsonMember::Separator => None,
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.pairs().map(|(name, _)| name)
    }

    /// Depth-first search for the first pair named `name`, at any nesting level.
    ///
    /// A pair is matched before its own value is searched, and a member's subtree
    /// is searched before the next member.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tagconf::json;
    ///
    /// let doc = json::from_str(r#"{"outer": {"id": 1}, "id": 2}"#).unwrap();
    /// let root = doc.root().as_object().unwrap();
    /// assert_eq!(root.find("id").and_then(|v| v.as_i32()), Some(1));
    /// ```
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&TaggedValue> {
        self.pairs().find_map(|(n, value)| {
            if n == name {
                Some(value)
            } else {
                find_in_value(value, name)
            }
        })
    }

    /// Collects every pair named `name` in the same order [`find`](Self::find) visits them.
    #[must_use]
    pub fn find_all(&self, name: &str) -> Vec<&TaggedValue> {
        let mut found = Vec::new();
        collect_in_object(self, name, &mut found);
        found
    }
}

pub(crate) fn find_in_value<'a>(value: &'a TaggedValue, name: &str) -> Option<&'a TaggedValue> {
    match value {
        TaggedValue::Object(object) => object.find(name),
        TaggedValue::Array(items) => items.iter().find_map(|item| find_in_value(item, name)),
        _ => None,
    }
}

fn collect_in_object<'a>(object: &'a JsonObject, name: &str, found: &mut Vec<&'a TaggedValue>) {
    for (n, value) in object.pairs() {
        if n == name {
            found.push(value);
        }
        collect_in_value(value, name, found);
    }
}

pub(crate) fn collect_in_value<'a>(value: &'a TaggedValue, name: &str, found: &mut Vec<&'a TaggedValue>) {
    match value {
        TaggedValue::Object(object) => collect_in_object(object, name, found),
        TaggedValue::Array(items) => {
            for item in items {
                collect_in_value(item, name, found);
            }
        }
        _ => {}
    }
}

impl<'a> IntoIterator for &'a JsonObject {
    type Item = &'a JsonMember;
    type IntoIter = std::slice::Iter<'a, JsonMember>;

    fn into_iter(self) -> Self::IntoIter {
        self.members()
    }
}

impl IntoIterator for JsonObject {
    type Item = JsonMember;
    type IntoIter = std::vec::IntoIter<JsonMember>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<K: Into<String>> FromIterator<(K, TaggedValue)> for JsonObject {
    fn from_iter<T: IntoIterator<Item = (K, TaggedValue)>>(iter: T) -> Self {
        JsonObject(
            iter.into_iter()
                .map(|(name, value)| JsonMember::Pair {
                    name: name.into(),
                    value,
                })
                .collect(),
        )
    }
}

impl From<Vec<JsonMember>> for JsonObject {
    fn from(members: Vec<JsonMember>) -> Self {
        JsonObject(members)
    }
}

impl fmt::Display for JsonObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&TaggedValue::render_object(self, &crate::FormatOptions::default()))
    }
}

impl Serialize for JsonObject {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.pair_count()))?;
        for (name, value) in self.pairs() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for JsonObject {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct JsonObjectVisitor;

        impl<'de> Visitor<'de> for JsonObjectVisitor {
            type Value = JsonObject;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a JSON object")
            }

            fn visit_map<A>(self, access: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                read_members(access)
            }
        }

        deserializer.deserialize_map(JsonObjectVisitor)
    }
}

pub(crate) fn read_members<'de, A>(mut access: A) -> std::result::Result<JsonObject, A::Error>
where
    A: MapAccess<'de>,
{
    let mut object = JsonObject::with_capacity(access.size_hint().unwrap_or(0));
    while let Some((name, value)) = access.next_entry::<String, TaggedValue>()? {
        object.push(name, value);
    }
    Ok(object)
}
