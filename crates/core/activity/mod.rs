//! Activity Streams 1.0 object models.
//!
//! Objects are keyed by `objectType`. Any object type can be read as a
//! generic [`ASObject`]; [`Collection`] and [`Event`] add typed accessors
//! for their own properties.

mod collection;
mod event;
mod object;

pub use collection::Collection;
pub use event::{Event, Relation};
pub use object::ASObject;

use crate::builder::{Builder, Model};
use crate::registry::Registry;

/// Properties common to every Activity Streams object.
///
/// Accessors return `None` when a property is unset or holds a value of the
/// wrong shape.
pub trait ActivityObject: Model {
    fn id(&self) -> Option<String> {
        self.object().get_as("id")
    }

    fn display_name(&self) -> Option<String> {
        self.object().get_as("displayName")
    }

    fn summary(&self) -> Option<String> {
        self.object().get_as("summary")
    }

    fn content(&self) -> Option<String> {
        self.object().get_as("content")
    }

    fn url(&self) -> Option<String> {
        self.object().get_as("url")
    }

    /// Publication timestamp as stored, typically RFC 3339.
    fn published(&self) -> Option<String> {
        self.object().get_as("published")
    }
}

macro_rules! activity_model {
    ($name:ident, |$type_name:ident| $accepts:expr $(, handle = $handle:path)?) => {
        impl $crate::builder::Model for $name {
            const DISCRIMINATOR: &'static str = "objectType";

            fn accepts($type_name: &str) -> bool {
                $accepts
            }

            fn from_object(object: geostreams_types::Object) -> Self {
                Self(object)
            }

            fn object(&self) -> &geostreams_types::Object {
                &self.0
            }

            fn into_object(self) -> geostreams_types::Object {
                self.0
            }

            $(
                fn handle(
                    builder: &mut $crate::builder::Builder<Self>,
                    cx: $crate::registry::Context<'_>,
                    key: &str,
                    value: geostreams_types::Value,
                ) -> Result<$crate::builder::Handle, geostreams_types::ModelError> {
                    $handle(builder, cx, key, value)
                }
            )?
        }

        impl $crate::activity::ActivityObject for $name {}

        impl $crate::builder::Builder<$name> {
            pub fn object_type(self, object_type: &str) -> Self {
                self.set("objectType", object_type)
            }

            pub fn id(self, id: impl Into<String>) -> Self {
                self.set("id", geostreams_types::Value::String(id.into()))
            }

            pub fn display_name(self, display_name: impl Into<String>) -> Self {
                self.set("displayName", geostreams_types::Value::String(display_name.into()))
            }

            pub fn summary(self, summary: impl Into<String>) -> Self {
                self.set("summary", geostreams_types::Value::String(summary.into()))
            }

            pub fn content(self, content: impl Into<String>) -> Self {
                self.set("content", geostreams_types::Value::String(content.into()))
            }

            pub fn url(self, url: impl Into<String>) -> Self {
                self.set("url", geostreams_types::Value::String(url.into()))
            }

            pub fn published(self, published: impl Into<String>) -> Self {
                self.set("published", geostreams_types::Value::String(published.into()))
            }
        }

        impl geostreams_types::FromValue for $name {
            fn from_value(value: &geostreams_types::Value) -> Option<Self> {
                <Self as $crate::builder::Model>::try_from_object(value.as_object()?.clone()).ok()
            }
        }

        impl From<$name> for geostreams_types::Value {
            fn from(model: $name) -> Self {
                geostreams_types::Value::Object(model.0)
            }
        }
    };
}

pub(crate) use activity_model;

/// Register the typed Activity Streams models; every other object type falls
/// back to [`ASObject`].
pub(crate) fn register(registry: &mut Registry) {
    registry
        .register("collection", |cx, map| {
            cx.reconstruct(Builder::<Collection>::new(), map)
                .map(Model::into_object)
        })
        .register("event", |cx, map| {
            cx.reconstruct(Builder::<Event>::new(), map)
                .map(Model::into_object)
        })
        .set_fallback(|cx, map| {
            cx.reconstruct(Builder::<ASObject>::new(), map)
                .map(Model::into_object)
        });
}
