/// Builds a [`TaggedValue`](crate::TaggedValue) from JSON-like syntax.
///
/// Objects become [`TaggedValue::Object`](crate::TaggedValue::Object) with members in
/// the written order (duplicate names are kept), arrays become
/// [`TaggedValue::Array`](crate::TaggedValue::Array), and any other expression goes
/// through `TaggedValue::from`.
///
/// ```rust
/// use tagconf::{tagged, TaggedValue};
///
/// let value = tagged!({ "size": [1, 2], "scale": 2.0f64, "name": "demo" });
/// let object = value.as_object().unwrap();
/// assert_eq!(object.get("scale"), Some(&TaggedValue::Double(2.0)));
/// assert_eq!(object.get("name").and_then(TaggedValue::as_str), Some("demo"));
/// ```
#[macro_export]
macro_rules! tagged {
    (null) => {
        $crate::TaggedValue::Null
    };

    (true) => {
        $crate::TaggedValue::Bool(true)
    };

    (false) => {
        $crate::TaggedValue::Bool(false)
    };

    ([]) => {
        $crate::TaggedValue::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::TaggedValue::Array(vec![$($crate::tagged!($elem)),*])
    };

    ({}) => {
        $crate::TaggedValue::Object($crate::JsonObject::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::JsonObject::new();
        $(
            object.push($key, $crate::tagged!($value));
        )*
        $crate::TaggedValue::Object(object)
    }};

    ($other:expr) => {
        $crate::TaggedValue::from($other)
    };
}

#[cfg(test)]
mod tests {
    use crate::{JsonObject, TaggedValue};

    #[test]
    fn test_tagged_macro_primitives() {
        assert_eq!(tagged!(null), TaggedValue::Null);
        assert_eq!(tagged!(true), TaggedValue::Bool(true));
        assert_eq!(tagged!(false), TaggedValue::Bool(false));
        assert_eq!(tagged!(42), TaggedValue::Int(42));
        assert_eq!(tagged!(3.5f32), TaggedValue::Float(3.5));
        assert_eq!(tagged!(3.5), TaggedValue::Double(3.5));
        assert_eq!(tagged!('x'), TaggedValue::Char('x'));
        assert_eq!(tagged!("hello"), TaggedValue::String("hello".to_string()));
    }

    #[test]
    fn test_tagged_macro_nesting() {
        assert_eq!(tagged!({}), TaggedValue::Object(JsonObject::new()));
        assert_eq!(tagged!([]), TaggedValue::Array(vec![]));

        let value = tagged!({
            "tag": 1,
            "tag": 2,
            "list": [true, null, { "inner": "x" }],
        });
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 3);
        assert_eq!(object.get_all("tag").count(), 2);
        assert_eq!(object.find("inner").and_then(TaggedValue::as_str), Some("x"));
    }
}
