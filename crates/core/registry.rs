//! Discriminator-keyed reconstruction of typed objects from flat maps.
//!
//! A [`Registry`] maps discriminator values (`"Point"`, `"event"`, ...) to
//! factories. Each value of a flat map is first offered, raw, to the
//! per-type hook of the object being rebuilt. Values the hook passes on are
//! revived bottom-up: every nested map that carries the discriminator is
//! turned back into a typed [`Object`] before it is staged.

use crate::builder::{Handle, Model, ObjectBuilder};
use crate::config::{Config, UnknownTypePolicy};
use geostreams_types::{ModelError, Object, PropertyMap, Value};
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

/// Builds one object of a registered type from its flat map.
pub type Factory = for<'r> fn(Context<'r>, PropertyMap) -> Result<Object, ModelError>;

static GEOJSON: Lazy<Registry> = Lazy::new(Registry::geojson);
static ACTIVITY_STREAMS: Lazy<Registry> = Lazy::new(Registry::activity_streams);

/// Shared GeoJSON registry with the default configuration.
pub fn geojson_registry() -> &'static Registry {
    &GEOJSON
}

/// Shared Activity Streams registry with the default configuration.
pub fn activity_registry() -> &'static Registry {
    &ACTIVITY_STREAMS
}

pub struct Registry {
    discriminator: &'static str,
    factories: FxHashMap<String, Factory>,
    fallback: Option<Factory>,
    config: Config,
}

impl Registry {
    /// Empty registry dispatching on the `discriminator` property.
    pub fn new(discriminator: &'static str) -> Self {
        Self {
            discriminator,
            factories: FxHashMap::default(),
            fallback: None,
            config: Config::default(),
        }
    }

    /// Registry for every GeoJSON object type, keyed by `type`.
    pub fn geojson() -> Self {
        let mut registry = Self::new("type");
        crate::geojson::register(&mut registry);
        registry
    }

    /// Registry for the Activity Streams object types, keyed by `objectType`.
    ///
    /// Unknown object types are reconstructed as generic objects.
    pub fn activity_streams() -> Self {
        let mut registry = Self::new("objectType");
        crate::activity::register(&mut registry);
        registry
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn register(&mut self, type_name: impl Into<String>, factory: Factory) -> &mut Self {
        self.factories.insert(type_name.into(), factory);
        self
    }

    /// Factory used for discriminator values without a registration.
    pub fn set_fallback(&mut self, factory: Factory) -> &mut Self {
        self.fallback = Some(factory);
        self
    }

    pub fn discriminator(&self) -> &'static str {
        self.discriminator
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    fn factory(&self, type_name: &str) -> Option<Factory> {
        self.factories.get(type_name).copied().or(self.fallback)
    }

    /// Rebuild a typed object from its flat representation.
    ///
    /// The map must carry the discriminator, and its value must resolve to a
    /// factory (directly or through the fallback).
    pub fn reconstruct(&self, map: PropertyMap) -> Result<Object, ModelError> {
        self.reconstruct_at(map, 0)
    }

    /// Reconstruction context for a top-level object.
    pub fn context(&self) -> Context<'_> {
        Context {
            registry: self,
            depth: 0,
        }
    }

    /// Rebuild an object and view it as `T`.
    pub fn reconstruct_as<T: Model>(&self, map: PropertyMap) -> Result<T, ModelError> {
        T::try_from_object(self.reconstruct(map)?)
    }

    /// Turn every nested map carrying the discriminator into a typed object.
    ///
    /// Maps without a discriminator stay untyped; their values are still
    /// revived.
    pub fn revive(&self, value: Value) -> Result<Value, ModelError> {
        self.revive_at(value, 0)
    }

    fn reconstruct_at(&self, map: PropertyMap, depth: usize) -> Result<Object, ModelError> {
        let type_name = map
            .get(self.discriminator)
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| ModelError::MissingRequiredField(self.discriminator.to_string()))?;

        let factory = self
            .factory(&type_name)
            .ok_or(ModelError::UnknownType(type_name))?;
        factory(
            Context {
                registry: self,
                depth,
            },
            map,
        )
    }

    fn revive_at(&self, value: Value, depth: usize) -> Result<Value, ModelError> {
        if depth > self.config.max_depth {
            return Err(ModelError::NestingTooDeep(self.config.max_depth));
        }

        match value {
            Value::Map(map) => {
                let type_name = map
                    .get(self.discriminator)
                    .and_then(Value::as_str)
                    .map(str::to_owned);

                match type_name {
                    Some(name) if self.factory(&name).is_some() => {
                        Ok(Value::Object(self.reconstruct_at(map, depth)?))
                    }
                    Some(name) if self.config.unknown_types == UnknownTypePolicy::Reject => {
                        Err(ModelError::UnknownType(name))
                    }
                    Some(name) => {
                        log::debug!("Keeping untyped map for unknown type `{}`", name);
                        self.revive_entries(map, depth).map(Value::Map)
                    }
                    None => self.revive_entries(map, depth).map(Value::Map),
                }
            }
            Value::Array(items) => items
                .into_iter()
                .map(|item| self.revive_at(item, depth + 1))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => Ok(other),
        }
    }

    fn revive_entries(&self, map: PropertyMap, depth: usize) -> Result<PropertyMap, ModelError> {
        map.into_iter()
            .map(|(key, value)| Ok((key, self.revive_at(value, depth + 1)?)))
            .collect()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        types.sort_unstable();
        f.debug_struct("Registry")
            .field("discriminator", &self.discriminator)
            .field("types", &types)
            .field("fallback", &self.fallback.is_some())
            .field("config", &self.config)
            .finish()
    }
}

/// Reconstruction state handed to a [`Factory`].
#[derive(Clone, Copy)]
pub struct Context<'r> {
    registry: &'r Registry,
    depth: usize,
}

impl<'r> Context<'r> {
    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Feed a flat map into `builder` and finalize it.
    ///
    /// Each raw value is offered to the builder's
    /// [`handle`](ObjectBuilder::handle) hook first; values the hook passes
    /// on are revived and staged.
    pub fn reconstruct<B: ObjectBuilder>(
        self,
        mut builder: B,
        map: PropertyMap,
    ) -> Result<B::Output, ModelError> {
        for (key, value) in map {
            match builder.handle(self, &key, value)? {
                Handle::Consumed => {}
                Handle::Pass(value) => builder.stage(key, self.revive(value)?),
            }
        }
        builder.finish()
    }

    /// Revive a value held by the object being rebuilt.
    pub fn revive(&self, value: Value) -> Result<Value, ModelError> {
        self.registry.revive_at(value, self.depth + 1)
    }

    /// Revive the values of a nested map while keeping the map itself
    /// untyped, even if it carries a registered discriminator.
    pub fn revive_entries(&self, map: PropertyMap) -> Result<PropertyMap, ModelError> {
        let depth = self.depth + 1;
        if depth > self.registry.config.max_depth {
            return Err(ModelError::NestingTooDeep(self.registry.config.max_depth));
        }
        self.registry.revive_entries(map, depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;

    #[derive(Debug, Clone, PartialEq)]
    struct Tag(Object);

    impl Model for Tag {
        const DISCRIMINATOR: &'static str = "kind";

        fn accepts(type_name: &str) -> bool {
            type_name == "tag"
        }

        fn from_object(object: Object) -> Self {
            Self(object)
        }

        fn object(&self) -> &Object {
            &self.0
        }

        fn into_object(self) -> Object {
            self.0
        }

        fn handle(
            builder: &mut Builder<Self>,
            cx: Context<'_>,
            key: &str,
            value: Value,
        ) -> Result<Handle, ModelError> {
            if key == "meta" {
                if let Value::Map(map) = value {
                    builder.insert("meta", cx.revive_entries(map)?);
                    return Ok(Handle::Consumed);
                }
                return Ok(Handle::Pass(value));
            }
            if key == "label" {
                let upper = value.as_str().unwrap_or_default().to_uppercase();
                builder.insert("label", upper);
                return Ok(Handle::Consumed);
            }
            Ok(Handle::Pass(value))
        }
    }

    fn registry() -> Registry {
        let mut registry = Registry::new("kind");
        registry.register("tag", |cx, map| {
            cx.reconstruct(Builder::<Tag>::new(), map).map(Model::into_object)
        });
        registry
    }

    fn flat(pairs: &[(&str, Value)]) -> PropertyMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_reconstruct_routes_through_handle() {
        let tag: Tag = registry()
            .reconstruct_as(flat(&[("kind", "tag".into()), ("label", "rust".into())]))
            .unwrap();
        assert_eq!(tag.object().get_as::<String>("label").unwrap(), "RUST");
    }

    #[test]
    fn test_handle_sees_raw_values() {
        let tagged = Value::Map(flat(&[("kind", "tag".into()), ("label", "inner".into())]));
        let tag: Tag = registry()
            .reconstruct_as(flat(&[
                ("kind", "tag".into()),
                ("meta", tagged.clone()),
                ("child", tagged),
            ]))
            .unwrap();

        // the hook kept `meta` untyped, `child` went through revival
        let meta = tag.object().get("meta").unwrap().as_map().unwrap();
        assert_eq!(meta["label"], Value::from("inner"));
        let child = tag.object().get("child").unwrap().as_object().unwrap();
        assert_eq!(child.get_as::<String>("label").unwrap(), "INNER");
    }

    #[test]
    fn test_unhandled_keys_fall_through() {
        let tag: Tag = registry()
            .reconstruct_as(flat(&[("kind", "tag".into()), ("extra", 42.into())]))
            .unwrap();
        assert_eq!(tag.object().get("extra"), Some(&Value::Int(42)));
    }

    #[test]
    fn test_reconstruct_requires_known_discriminator() {
        let registry = registry();
        assert_eq!(
            registry.reconstruct(flat(&[("label", "x".into())])),
            Err(ModelError::MissingRequiredField("kind".into()))
        );
        assert_eq!(
            registry.reconstruct(flat(&[("kind", "other".into())])),
            Err(ModelError::UnknownType("other".into()))
        );
    }

    #[test]
    fn test_revive_nested_maps() {
        let nested = Value::Map(flat(&[
            ("kind", "tag".into()),
            ("label", "a".into()),
        ]));
        let outer = Value::Map(flat(&[("items", Value::Array(vec![nested]))]));

        let revived = registry().revive(outer).unwrap();
        let items = revived.as_map().unwrap()["items"].as_array().unwrap();
        let object = items[0].as_object().unwrap();
        assert_eq!(object.get_as::<String>("label").unwrap(), "A");
    }

    #[test]
    fn test_unknown_type_policy() {
        let unknown = Value::Map(flat(&[("kind", "mystery".into())]));

        let preserved = registry().revive(unknown.clone()).unwrap();
        assert_eq!(preserved, unknown);

        let strict = registry()
            .with_config(Config::default().with_unknown_types(UnknownTypePolicy::Reject));
        assert_eq!(
            strict.revive(unknown),
            Err(ModelError::UnknownType("mystery".into()))
        );
    }

    #[test]
    fn test_fallback_factory() {
        let mut registry = registry();
        registry.set_fallback(|cx, map| {
            cx.reconstruct(Builder::<Tag>::new(), map).map(Model::into_object)
        });
        let object = registry
            .reconstruct(flat(&[("kind", "anything".into())]))
            .unwrap();
        assert_eq!(object.discriminator("kind"), Some("anything"));
    }

    #[test]
    fn test_max_depth() {
        let mut value = Value::Null;
        for _ in 0..10 {
            value = Value::Array(vec![value]);
        }
        let registry = registry().with_config(Config::default().with_max_depth(5));
        assert_eq!(registry.revive(value), Err(ModelError::NestingTooDeep(5)));
    }
}
