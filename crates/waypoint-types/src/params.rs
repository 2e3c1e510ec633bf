//! Route parameter values.
//!
//! Parameters are plain data in the normal case: null, booleans, numbers,
//! strings, and lists or maps composed recursively of those. Callers may
//! also pass an [`OpaqueValue`] (a callback, a handle to a live resource),
//! which navigation accepts but which cannot be persisted. The router warns
//! about such values in development mode; serializing one fails.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

/// Parameters of a route, keyed by name.
pub type Params = BTreeMap<String, ParamValue>;

/// A non-serializable value carried through route parameters.
///
/// Equality is pointer identity: two opaque values are equal only when
/// they wrap the same allocation.
#[derive(Clone)]
pub struct OpaqueValue {
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

impl OpaqueValue {
    /// Wrap an arbitrary value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            value: Arc::new(value),
        }
    }

    /// Borrow the wrapped value if it has type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Rust type name of the wrapped value, for diagnostics.
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl PartialEq for OpaqueValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl core::fmt::Debug for OpaqueValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Opaque({})", self.type_name)
    }
}

/// A single route parameter value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ParamValue {
    /// Absent / null value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value (integer or finite float).
    Number(Number),
    /// String value.
    String(String),
    /// Ordered list of values.
    List(Vec<Self>),
    /// Nested mapping of values.
    Map(BTreeMap<String, Self>),
    /// Non-serializable value; see [`OpaqueValue`].
    Opaque(OpaqueValue),
}

impl ParamValue {
    /// Wrap a non-serializable value.
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Self::Opaque(OpaqueValue::new(value))
    }

    /// Whether this value (recursively) contains only plain data.
    pub fn is_serializable(&self) -> bool {
        match self {
            Self::Null | Self::Bool(_) | Self::Number(_) | Self::String(_) => true,
            Self::List(items) => items.iter().all(Self::is_serializable),
            Self::Map(entries) => entries.values().all(Self::is_serializable),
            Self::Opaque(_) => false,
        }
    }

    /// Convert to a JSON value, or `None` if an opaque value is reachable.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            Self::Null => Some(Value::Null),
            Self::Bool(b) => Some(Value::Bool(*b)),
            Self::Number(n) => Some(Value::Number(n.clone())),
            Self::String(s) => Some(Value::String(s.clone())),
            Self::List(items) => items
                .iter()
                .map(Self::to_json)
                .collect::<Option<Vec<_>>>()
                .map(Value::Array),
            Self::Map(entries) => entries
                .iter()
                .map(|(k, v)| v.to_json().map(|v| (k.clone(), v)))
                .collect::<Option<serde_json::Map<_, _>>>()
                .map(Value::Object),
            Self::Opaque(_) => None,
        }
    }

    /// Borrow the string content, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Read an integer value, if this is an integral number.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// Read a boolean value.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Look up a key in a nested map.
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Map(entries) => entries.get(key),
            _ => None,
        }
    }

    fn unserializable_path(&self, path: &str) -> Option<String> {
        match self {
            Self::Opaque(_) => Some(path.to_owned()),
            Self::List(items) => items
                .iter()
                .enumerate()
                .find_map(|(i, v)| v.unserializable_path(&format!("{path}.{i}"))),
            Self::Map(entries) => entries
                .iter()
                .find_map(|(k, v)| v.unserializable_path(&format!("{path}.{k}"))),
            Self::Null | Self::Bool(_) | Self::Number(_) | Self::String(_) => None,
        }
    }
}

/// Return the dotted path of the first non-serializable value in `params`,
/// or `None` when every reachable value is plain data.
///
/// List elements are addressed by index (`tags.2`).
pub fn find_unserializable(params: &Params) -> Option<String> {
    params
        .iter()
        .find_map(|(key, value)| value.unserializable_path(key))
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::List(items) => items.serialize(serializer),
            Self::Map(entries) => entries.serialize(serializer),
            Self::Opaque(value) => Err(serde::ser::Error::custom(format_args!(
                "opaque route parameter of type {} cannot be serialized",
                value.type_name()
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for ParamValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(entries) => {
                Self::Map(entries.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<f64> for ParamValue {
    /// Non-finite floats have no JSON representation and become `Null`.
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(Self::Null, Self::Number)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<Self>> for ParamValue {
    fn from(items: Vec<Self>) -> Self {
        Self::List(items)
    }
}

impl From<BTreeMap<String, Self>> for ParamValue {
    fn from(entries: BTreeMap<String, Self>) -> Self {
        Self::Map(entries)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_params() -> Params {
        let mut nested = BTreeMap::new();
        nested.insert(String::from("depth"), ParamValue::from(2));
        let mut params = Params::new();
        params.insert(String::from("id"), ParamValue::from(42));
        params.insert(String::from("name"), ParamValue::from("inbox"));
        params.insert(String::from("pinned"), ParamValue::from(true));
        params.insert(String::from("filter"), ParamValue::Map(nested));
        params.insert(
            String::from("tags"),
            ParamValue::List(vec![ParamValue::from("a"), ParamValue::Null]),
        );
        params
    }

    #[test]
    fn plain_data_is_serializable() {
        let params = sample_params();
        assert!(params.values().all(ParamValue::is_serializable));
        assert_eq!(find_unserializable(&params), None);
    }

    #[test]
    fn opaque_value_is_reported_with_its_path() {
        let mut params = sample_params();
        params.insert(String::from("on_done"), ParamValue::opaque(|| {}));
        assert_eq!(find_unserializable(&params).as_deref(), Some("on_done"));

        let mut params = sample_params();
        params.insert(
            String::from("tags"),
            ParamValue::List(vec![ParamValue::from("a"), ParamValue::opaque(7_u8)]),
        );
        assert_eq!(find_unserializable(&params).as_deref(), Some("tags.1"));
    }

    #[test]
    fn json_round_trip_preserves_plain_params() {
        let params = sample_params();
        let json = serde_json::to_string(&params).unwrap();
        let restored: Params = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, params);
    }

    #[test]
    fn serializing_opaque_value_fails() {
        let mut params = Params::new();
        params.insert(String::from("socket"), ParamValue::opaque(String::from("live")));
        assert!(serde_json::to_string(&params).is_err());
        assert!(params.get("socket").and_then(ParamValue::to_json).is_none());
    }

    #[test]
    fn opaque_equality_is_identity() {
        let a = ParamValue::opaque(5_u32);
        let b = ParamValue::opaque(5_u32);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        if let ParamValue::Opaque(inner) = &a {
            assert_eq!(inner.downcast_ref::<u32>(), Some(&5));
        }
    }

    #[test]
    fn non_finite_float_becomes_null() {
        assert_eq!(ParamValue::from(f64::NAN), ParamValue::Null);
        assert_eq!(ParamValue::from(1.5).to_json(), Some(serde_json::json!(1.5)));
    }
}
