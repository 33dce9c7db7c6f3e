use super::activity_model;
use crate::builder::{Builder, Model};
use geostreams_types::{ModelError, Object};

/// Generic Activity Streams object of any `objectType`.
///
/// # Examples
///
/// ```
/// use geostreams::activity::{ASObject, ActivityObject};
///
/// let note = ASObject::builder("note")
///     .id("urn:example:note:1")
///     .content("Hello")
///     .build()?;
/// assert_eq!(note.content().as_deref(), Some("Hello"));
/// # Ok::<(), geostreams::ModelError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ASObject(Object);

activity_model!(ASObject, |_type_name| true);

impl ASObject {
    pub fn builder(object_type: &str) -> Builder<Self> {
        Builder::typed(object_type)
    }

    pub fn to_builder(&self) -> Builder<Self> {
        Builder::new().from_existing(self)
    }

    /// View this object as a more specific model.
    pub fn downcast<T: Model>(self) -> Result<T, ModelError> {
        T::try_from_object(self.0)
    }
}
