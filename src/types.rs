use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

/// Values that can be stored in a database row or used as query parameters.
///
/// `JSON` holding an object or an array is the only composite value; everything else is a
/// scalar the driver binds directly:
/// ```rust
/// use sqlite_wrapper::prelude::*;
///
/// let params = vec![
///     RowValues::Int(1),
///     RowValues::Text("alice".into()),
///     RowValues::from(serde_json::json!({"a": 1})),
/// ];
/// assert!(params[2].is_composite());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Objects and arrays are composite; they are stored as JSON text.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::JSON(JsonValue::Object(_) | JsonValue::Array(_)))
    }

    /// Text and timestamps are rendered as quoted literals when inlined.
    #[must_use]
    pub fn is_string_like(&self) -> bool {
        matches!(self, Self::Text(_) | Self::Timestamp(_))
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<&bool> {
        if let RowValues::Bool(value) = self {
            return Some(value);
        } else if let Some(i) = self.as_int() {
            if *i == 1 {
                return Some(&true);
            } else if *i == 0 {
                return Some(&false);
            }
        }
        None
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let RowValues::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let RowValues::Timestamp(value) = self {
            return Some(*value);
        } else if let Some(s) = self.as_text() {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(dt);
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
                return Some(dt);
            }
        }
        None
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let RowValues::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }

    /// Map a value onto something the driver can bind.
    ///
    /// Composite JSON (objects, arrays) is serialized to its JSON text; every other value,
    /// including `Null`, timestamps and JSON scalars, is returned unchanged.
    #[must_use]
    pub fn into_bindable(self) -> RowValues {
        match self {
            RowValues::JSON(json @ (JsonValue::Object(_) | JsonValue::Array(_))) => {
                RowValues::Text(json.to_string())
            }
            other => other,
        }
    }

    /// Render the value as a JSON value (used when printing result sets).
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            RowValues::Int(i) => JsonValue::from(*i),
            RowValues::Float(f) => JsonValue::from(*f),
            RowValues::Text(s) => JsonValue::from(s.as_str()),
            RowValues::Bool(b) => JsonValue::from(*b),
            RowValues::Timestamp(dt) => JsonValue::from(dt.format("%F %T%.f").to_string()),
            RowValues::Null => JsonValue::Null,
            RowValues::JSON(json) => json.clone(),
            RowValues::Blob(bytes) => JsonValue::from(bytes.clone()),
        }
    }
}

impl From<i64> for RowValues {
    fn from(value: i64) -> Self {
        RowValues::Int(value)
    }
}

impl From<i32> for RowValues {
    fn from(value: i32) -> Self {
        RowValues::Int(i64::from(value))
    }
}

impl From<f64> for RowValues {
    fn from(value: f64) -> Self {
        RowValues::Float(value)
    }
}

impl From<bool> for RowValues {
    fn from(value: bool) -> Self {
        RowValues::Bool(value)
    }
}

impl From<&str> for RowValues {
    fn from(value: &str) -> Self {
        RowValues::Text(value.to_owned())
    }
}

impl From<String> for RowValues {
    fn from(value: String) -> Self {
        RowValues::Text(value)
    }
}

impl From<NaiveDateTime> for RowValues {
    fn from(value: NaiveDateTime) -> Self {
        RowValues::Timestamp(value)
    }
}

impl From<Vec<u8>> for RowValues {
    fn from(value: Vec<u8>) -> Self {
        RowValues::Blob(value)
    }
}

impl<T: Into<RowValues>> From<Option<T>> for RowValues {
    fn from(value: Option<T>) -> Self {
        value.map_or(RowValues::Null, Into::into)
    }
}

/// JSON scalars become the matching scalar variant; objects and arrays stay composite.
impl From<JsonValue> for RowValues {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => RowValues::Null,
            JsonValue::Bool(b) => RowValues::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => RowValues::Int(i),
                None => RowValues::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => RowValues::Text(s),
            composite => RowValues::JSON(composite),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn composite_values_serialize_to_json_text() {
        let value = RowValues::from(json!({"a": 1}));
        assert!(value.is_composite());
        assert_eq!(value.into_bindable(), RowValues::Text("{\"a\":1}".into()));

        let list = RowValues::from(json!([1, "two"]));
        assert_eq!(list.into_bindable(), RowValues::Text("[1,\"two\"]".into()));
    }

    #[test]
    fn scalars_pass_through_unchanged() {
        let ts = NaiveDateTime::parse_from_str("2024-01-01 08:00:01", "%Y-%m-%d %H:%M:%S").unwrap();
        for value in [
            RowValues::Int(7),
            RowValues::Float(1.5),
            RowValues::Text("x".into()),
            RowValues::Bool(false),
            RowValues::Null,
            RowValues::Timestamp(ts),
            RowValues::Blob(vec![1, 2]),
            RowValues::JSON(json!("scalar")),
        ] {
            assert_eq!(value.clone().into_bindable(), value);
        }
    }

    #[test]
    fn json_scalars_map_to_scalar_variants() {
        assert_eq!(RowValues::from(json!(3)), RowValues::Int(3));
        assert_eq!(RowValues::from(json!(2.5)), RowValues::Float(2.5));
        assert_eq!(RowValues::from(json!("a")), RowValues::Text("a".into()));
        assert_eq!(RowValues::from(json!(null)), RowValues::Null);
        assert_eq!(RowValues::from(json!(true)), RowValues::Bool(true));
        assert_eq!(RowValues::from(None::<i64>), RowValues::Null);
    }
}
