//! The frozen property store behind every typed model object.

use crate::value::{FromValue, PropertyMap, Value, serialize_properties};
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// An immutable, ordered set of named properties.
///
/// Objects are produced once by a builder and never change afterwards.
/// Cloning is cheap and clones share the same store, so an `Object` can be
/// handed to any number of threads without synchronization.
///
/// Two objects are equal when they hold the same keys mapped to equal
/// values, regardless of the order the keys were staged in.
///
/// # Examples
///
/// ```
/// use geostreams_types::{Object, PropertyMap, Value};
///
/// let mut props = PropertyMap::new();
/// props.insert("type".into(), Value::from("Point"));
/// let object = Object::freeze(props);
///
/// assert_eq!(object.get_as::<String>("type").as_deref(), Some("Point"));
/// assert_eq!(object.get_or_default::<String>("name"), "");
/// ```
#[derive(Clone, Default, PartialEq)]
pub struct Object {
    props: Arc<PropertyMap>,
}

impl Object {
    /// Freeze a staged property map into an object.
    pub fn freeze(props: PropertyMap) -> Self {
        Self {
            props: Arc::new(props),
        }
    }

    /// Stored value for `key`, if any.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    /// Stored value for `key`, or `default` when absent.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value {
        self.props.get(key).unwrap_or(default)
    }

    /// Stored value for `key` converted to `T`.
    ///
    /// `None` when the key is absent or holds a value of another shape.
    pub fn get_as<T: FromValue>(&self, key: &str) -> Option<T> {
        self.props.get(key).and_then(T::from_value)
    }

    pub fn get_as_or<T: FromValue>(&self, key: &str, default: T) -> T {
        self.get_as(key).unwrap_or(default)
    }

    /// Stored value for `key` converted to `T`, or `T`'s empty value.
    pub fn get_or_default<T: FromValue + Default>(&self, key: &str) -> T {
        self.get_as(key).unwrap_or_default()
    }

    /// String value of the discriminator stored under `key`.
    pub fn discriminator(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.props.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.props.keys().map(String::as_str)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.props.iter()
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// Borrow the frozen store.
    pub fn properties(&self) -> &PropertyMap {
        &self.props
    }

    /// Owned copy of the store, used to seed a new builder.
    pub fn to_properties(&self) -> PropertyMap {
        PropertyMap::clone(&self.props)
    }

    /// Flat representation: nested objects are recursively replaced by
    /// their own flat maps, key order is preserved.
    pub fn decompose(&self) -> PropertyMap {
        self.props
            .iter()
            .map(|(k, v)| (k.clone(), v.decompose()))
            .collect()
    }

    /// Whether both handles point at the same frozen store.
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.props, &other.props)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.props.iter()).finish()
    }
}

impl Serialize for Object {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_properties(&self.props, serializer)
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.props.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, Value)]) -> PropertyMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let a = Object::freeze(props(&[("type", "Point".into()), ("id", 7.into())]));
        let b = Object::freeze(props(&[("id", 7.into()), ("type", "Point".into())]));
        assert_eq!(a, b);

        let c = Object::freeze(props(&[("type", "Point".into()), ("id", 8.into())]));
        assert_ne!(a, c);
    }

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        let object = Object::freeze(props(&[("name", "x".into())]));
        let fallback = Value::from("fallback");

        assert_eq!(object.get("missing"), None);
        assert_eq!(object.get_or("missing", &fallback), &fallback);
        assert_eq!(object.get_as_or("missing", 5i64), 5);
        assert_eq!(object.get_or_default::<Vec<f64>>("missing"), Vec::<f64>::new());
        // present but of another shape
        assert_eq!(object.get_as::<i64>("name"), None);
    }

    #[test]
    fn test_decompose_flattens_nested_objects() {
        let inner = Object::freeze(props(&[("type", "Point".into())]));
        let outer = Object::freeze(props(&[
            ("type", "GeometryCollection".into()),
            ("geometries", Value::Array(vec![Value::Object(inner)])),
        ]));

        let flat = outer.decompose();
        let geometries = flat["geometries"].as_array().unwrap();
        assert_eq!(
            geometries[0],
            Value::Map(props(&[("type", "Point".into())]))
        );
    }

    #[test]
    fn test_clones_share_store() {
        let a = Object::freeze(props(&[("k", Value::Null)]));
        let b = a.clone();
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn test_object_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Object>();
    }

    #[test]
    fn test_serialize_preserves_order() {
        let object = Object::freeze(props(&[("b", 1.into()), ("a", 2.into())]));
        assert_eq!(serde_json::to_string(&object).unwrap(), r#"{"b":1,"a":2}"#);
    }
}
