//! Structured property values and the ordered property bag
//!
//! This module provides:
//! - `PropertyValue`: a string, integer, or nested map
//! - `Properties`: an insertion-ordered key/value set with add-if-absent merging

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// Value type for structured event properties
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    Int(i64),
    Map(Properties),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(s) => write!(f, "{}", s),
            PropertyValue::Int(i) => write!(f, "{}", i),
            PropertyValue::Map(map) => {
                write!(f, "{{")?;
                for (idx, (key, value)) in map.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}={}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl PropertyValue {
    /// Convert to serde_json::Value for JSON rendering
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            PropertyValue::String(s) => serde_json::Value::String(s.clone()),
            PropertyValue::Int(i) => serde_json::Value::Number((*i).into()),
            PropertyValue::Map(map) => map.to_json_value(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<&String> for PropertyValue {
    fn from(s: &String) -> Self {
        PropertyValue::String(s.clone())
    }
}

impl From<Properties> for PropertyValue {
    fn from(map: Properties) -> Self {
        PropertyValue::Map(map)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for PropertyValue {
                fn from(i: $ty) -> Self {
                    PropertyValue::Int(i as i64)
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32, isize);

impl From<u64> for PropertyValue {
    fn from(i: u64) -> Self {
        match i64::try_from(i) {
            Ok(v) => PropertyValue::Int(v),
            Err(_) => PropertyValue::String(i.to_string()),
        }
    }
}

impl From<usize> for PropertyValue {
    fn from(i: usize) -> Self {
        PropertyValue::from(i as u64)
    }
}

/// Ordered set of properties with unique keys
///
/// Events carry few properties, so lookups are a linear scan over a `Vec`,
/// which also keeps rendering in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: Vec<(String, PropertyValue)>,
}

impl Properties {
    /// Create a new empty property set
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Add a property, replacing any existing value for the key
    pub fn with_property<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<PropertyValue>,
    {
        self.insert(key, value);
        self
    }

    /// Insert a property, replacing any existing value in place
    pub fn insert<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<PropertyValue>,
    {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Insert a property only if the key is not present yet
    ///
    /// Returns `true` if the property was added.
    pub fn add_if_absent<K, V>(&mut self, key: K, value: V) -> bool
    where
        K: Into<String>,
        V: Into<PropertyValue>,
    {
        let key = key.into();
        if self.contains_key(&key) {
            return false;
        }
        self.entries.push((key, value.into()));
        true
    }

    /// Merge every property of `other` whose key is absent here
    ///
    /// Existing properties take priority.
    pub fn merge_absent(&mut self, other: &Properties) {
        for (key, value) in other.iter() {
            if !self.contains_key(key) {
                self.entries.push((key.to_string(), value.clone()));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Format properties as key=value pairs
    pub fn format_fields(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Convert to a JSON object, preserving key order
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        let mut object = serde_json::Map::new();
        for (key, value) in self.iter() {
            object.insert(key.to_string(), value.to_json_value());
        }
        serde_json::Value::Object(object)
    }
}

impl fmt::Display for Properties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_fields())
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<K, V> FromIterator<(K, V)> for Properties
where
    K: Into<String>,
    V: Into<PropertyValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut properties = Properties::new();
        for (key, value) in iter {
            properties.insert(key, value);
        }
        properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_properties_creation() {
        let props = Properties::new();
        assert!(props.is_empty());
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut props = Properties::new()
            .with_property("a", 1)
            .with_property("b", "two");
        props.insert("a", 10);

        let keys: Vec<_> = props.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(props.get("a"), Some(&PropertyValue::Int(10)));
    }

    #[test]
    fn test_add_if_absent_keeps_existing() {
        let mut props = Properties::new().with_property("ThreadId", 7);

        assert!(!props.add_if_absent("ThreadId", 99));
        assert_eq!(props.get("ThreadId"), Some(&PropertyValue::Int(7)));

        assert!(props.add_if_absent("Application", "demo"));
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn test_merge_absent_priority() {
        let defaults = Properties::new()
            .with_property("service", "api")
            .with_property("key", "default_value");

        let mut props = Properties::new().with_property("key", "entry_value");
        props.merge_absent(&defaults);

        assert_eq!(props.len(), 2);
        match props.get("key") {
            Some(PropertyValue::String(s)) => assert_eq!(s, "entry_value"),
            _ => panic!("Expected string value"),
        }
    }

    #[test]
    fn test_format_fields_in_insertion_order() {
        let props = Properties::new()
            .with_property("z", "last")
            .with_property("a", 1);
        assert_eq!(props.format_fields(), "z=last a=1");
    }

    #[test]
    fn test_nested_map_display_and_json() {
        let user = Properties::new()
            .with_property("id", 42)
            .with_property("name", "beth");
        let props = Properties::new().with_property("User", user);

        assert_eq!(props.format_fields(), "User={id=42, name=beth}");
        assert_eq!(
            serde_json::to_string(&props).unwrap(),
            r#"{"User":{"id":42,"name":"beth"}}"#
        );
        assert_eq!(props.to_json_value()["User"]["id"], 42);
    }

    #[test]
    fn test_large_unsigned_falls_back_to_string() {
        assert_eq!(
            PropertyValue::from(u64::MAX),
            PropertyValue::String(u64::MAX.to_string())
        );
        assert_eq!(PropertyValue::from(5u64), PropertyValue::Int(5));
    }
}
