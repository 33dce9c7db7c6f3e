//! Generic builder protocol shared by every typed model.
//!
//! A typed model is a thin wrapper around a frozen [`Object`]. It is staged
//! in a [`Builder`], which owns a mutable working copy of the properties and
//! is consumed by [`Builder::build`], so a builder can only ever produce one
//! instance.

use crate::registry::Context;
use geostreams_types::{ModelError, Object, PropertyMap, Value};
use indexmap::map::Entry;
use std::fmt;
use std::marker::PhantomData;

/// A typed view over a frozen [`Object`].
pub trait Model: Sized {
    /// Name of the property holding the discriminator.
    const DISCRIMINATOR: &'static str;

    /// Whether this model can represent objects with the given discriminator value.
    fn accepts(type_name: &str) -> bool;

    /// Wrap an object without checking its discriminator.
    fn from_object(object: Object) -> Self;

    fn object(&self) -> &Object;

    fn into_object(self) -> Object;

    /// Per-type reconstruction hook.
    ///
    /// Called with the raw value of every key of a flat representation,
    /// before any nested map is revived. Return [`Handle::Pass`] to let the
    /// value be revived and staged generically.
    fn handle(
        _builder: &mut Builder<Self>,
        _cx: Context<'_>,
        _key: &str,
        value: Value,
    ) -> Result<Handle, ModelError> {
        Ok(Handle::Pass(value))
    }

    /// Adjust the staged properties just before they are frozen.
    fn normalize(_props: &mut PropertyMap) {}

    /// Wrap an object after checking its discriminator.
    fn try_from_object(object: Object) -> Result<Self, ModelError> {
        let found = object
            .discriminator(Self::DISCRIMINATOR)
            .ok_or_else(|| ModelError::MissingRequiredField(Self::DISCRIMINATOR.to_string()))?;
        if !Self::accepts(found) {
            return Err(ModelError::TypeMismatch {
                expected: std::any::type_name::<Self>()
                    .rsplit("::")
                    .next()
                    .unwrap_or_default()
                    .to_string(),
                found: found.to_string(),
            });
        }
        Ok(Self::from_object(object))
    }

    /// Value of the discriminator.
    fn type_name(&self) -> &str {
        self.object()
            .discriminator(Self::DISCRIMINATOR)
            .unwrap_or_default()
    }

    /// Flat representation of this instance.
    fn decompose(&self) -> PropertyMap {
        self.object().decompose()
    }
}

/// Outcome of a per-type reconstruction hook.
#[derive(Debug)]
pub enum Handle {
    /// The hook staged the value itself.
    Consumed,
    /// The value is revived and staged generically.
    Pass(Value),
}

/// Builders that can be fed from a flat property map.
pub trait ObjectBuilder {
    type Output: Model;

    /// Generic staging of a value under `key`.
    fn stage(&mut self, key: String, value: Value);

    /// Per-type hook consulted before [`stage`](ObjectBuilder::stage).
    fn handle(&mut self, _cx: Context<'_>, _key: &str, value: Value) -> Result<Handle, ModelError> {
        Ok(Handle::Pass(value))
    }

    fn finish(self) -> Result<Self::Output, ModelError>;
}

/// Single-use staging area for a model of type `T`.
///
/// # Examples
///
/// ```
/// use geostreams::geojson::Point;
/// use geostreams::{Model, Position};
///
/// let point = Point::builder()
///     .coordinates(Position::new(-74.0060, 40.7128))
///     .set("title", "NYC")
///     .build()?;
/// assert_eq!(point.type_name(), "Point");
/// # Ok::<(), geostreams::ModelError>(())
/// ```
pub struct Builder<T> {
    props: PropertyMap,
    _model: PhantomData<fn() -> T>,
}

impl<T: Model> Builder<T> {
    /// Empty builder. The discriminator must be staged before building.
    pub fn new() -> Self {
        Self {
            props: PropertyMap::new(),
            _model: PhantomData,
        }
    }

    /// Builder with the discriminator already staged.
    pub fn typed(type_name: &str) -> Self {
        Self::new().set(T::DISCRIMINATOR, type_name)
    }

    /// Seed the staging area with every property of `existing`.
    ///
    /// Later calls to [`set`](Self::set) override the copied values.
    pub fn from_existing(mut self, existing: &T) -> Self {
        for (key, value) in existing.object() {
            self.props.insert(key.clone(), value.clone());
        }
        self
    }

    /// Stage `value` under `key`, replacing any earlier value.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Remove a staged value.
    pub fn unset(mut self, key: &str) -> Self {
        self.props.shift_remove(key);
        self
    }

    /// In-place variant of [`set`](Self::set).
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.props.insert(key.into(), value.into());
    }

    /// Append `value` to the array staged under `key`.
    ///
    /// Anything other than an array under `key` is replaced.
    pub fn push(&mut self, key: &str, value: impl Into<Value>) {
        match self.entry(key) {
            Entry::Occupied(mut slot) => match slot.get_mut() {
                Value::Array(items) => items.push(value.into()),
                other => *other = Value::Array(vec![value.into()]),
            },
            Entry::Vacant(slot) => {
                slot.insert(Value::Array(vec![value.into()]));
            }
        }
    }

    pub fn entry(&mut self, key: &str) -> Entry<'_, String, Value> {
        self.props.entry(key.to_string())
    }

    pub fn staged(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    /// Finalize the builder into one immutable instance.
    ///
    /// Fails with [`ModelError::MissingRequiredField`] if the discriminator
    /// was never staged (or was staged as null).
    pub fn build(self) -> Result<T, ModelError> {
        let mut props = self.props;
        if matches!(props.get(T::DISCRIMINATOR), None | Some(Value::Null)) {
            return Err(ModelError::MissingRequiredField(
                T::DISCRIMINATOR.to_string(),
            ));
        }
        T::normalize(&mut props);
        Ok(T::from_object(Object::freeze(props)))
    }
}

impl<T: Model> Default for Builder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Builder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("model", &std::any::type_name::<T>())
            .field("props", &self.props)
            .finish()
    }
}

impl<T: Model> ObjectBuilder for Builder<T> {
    type Output = T;

    fn stage(&mut self, key: String, value: Value) {
        self.props.insert(key, value);
    }

    fn handle(&mut self, cx: Context<'_>, key: &str, value: Value) -> Result<Handle, ModelError> {
        T::handle(self, cx, key, value)
    }

    fn finish(self) -> Result<T, ModelError> {
        self.build()
    }
}
