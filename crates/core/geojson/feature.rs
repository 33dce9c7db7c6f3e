use super::{Bounded, Extent, GeoType, Geometry, geo_model};
use crate::builder::{Builder, Handle, Model};
use crate::registry::Context;
use geostreams_types::{ModelError, Object, PropertyMap, Value};

/// A GeoJSON Feature: an optional geometry plus free-form properties.
///
/// # Examples
///
/// ```
/// use geostreams::geojson::{Feature, Point};
/// use geostreams::Position;
///
/// let feature = Feature::builder()
///     .geometry(Point::new(Position::new(2.3522, 48.8566))?)
///     .property("name", "Paris")
///     .id("paris")
///     .build()?;
///
/// assert_eq!(feature.properties()["name"].as_str(), Some("Paris"));
/// # Ok::<(), geostreams::ModelError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Feature(Object);

geo_model!(Feature, handle = handle_properties);

impl Feature {
    pub fn builder() -> Builder<Self> {
        Builder::typed(GeoType::Feature.as_str())
    }

    pub fn to_builder(&self) -> Builder<Self> {
        Builder::new().from_existing(self)
    }

    /// The feature's geometry, `None` when unset, null or not a geometry.
    pub fn geometry(&self) -> Option<Geometry> {
        match self.0.get("geometry")? {
            Value::Null => None,
            Value::Object(object) => Geometry::from_object(object.clone()).ok(),
            other => {
                log::warn!("Ignoring {} stored as feature geometry", other.kind());
                None
            }
        }
    }

    /// Free-form properties; empty when unset.
    pub fn properties(&self) -> PropertyMap {
        self.0.get_as_or("properties", PropertyMap::new())
    }

    pub fn id(&self) -> Option<&Value> {
        self.0.get("id").filter(|id| !id.is_null())
    }
}

impl Builder<Feature> {
    pub fn geometry(self, geometry: impl Into<Geometry>) -> Self {
        let geometry: Geometry = geometry.into();
        self.set("geometry", geometry)
    }

    /// Replace every property at once.
    pub fn properties(self, properties: PropertyMap) -> Self {
        self.set("properties", properties)
    }

    /// Stage a single property, keeping the others.
    pub fn property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let slot = self
            .entry("properties")
            .or_insert_with(|| Value::Map(PropertyMap::new()));
        match slot {
            Value::Map(properties) => {
                properties.insert(key.into(), value.into());
            }
            other => {
                let mut properties = PropertyMap::new();
                properties.insert(key.into(), value.into());
                *other = Value::Map(properties);
            }
        }
        self
    }

    pub fn id(self, id: impl Into<Value>) -> Self {
        self.set("id", id)
    }
}

/// `properties` is free-form: it stays a plain map even when it carries a
/// registered `type`. Its values are revived as usual.
fn handle_properties(
    builder: &mut Builder<Feature>,
    cx: Context<'_>,
    key: &str,
    value: Value,
) -> Result<Handle, ModelError> {
    match value {
        Value::Map(map) if key == "properties" => {
            builder.insert(key, cx.revive_entries(map)?);
            Ok(Handle::Consumed)
        }
        other => Ok(Handle::Pass(other)),
    }
}

impl Bounded for Feature {
    fn geo_type(&self) -> GeoType {
        GeoType::Feature
    }

    fn extent(&self) -> Extent {
        Extent::Members(self.geometry().into_iter().collect())
    }
}

/// A GeoJSON FeatureCollection.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCollection(Object);

geo_model!(FeatureCollection);

impl FeatureCollection {
    pub fn builder() -> Builder<Self> {
        Builder::typed(GeoType::FeatureCollection.as_str()).set("features", Vec::<Value>::new())
    }

    pub fn to_builder(&self) -> Builder<Self> {
        Builder::new().from_existing(self)
    }

    /// Member features in insertion order.
    pub fn features(&self) -> Vec<Feature> {
        let Some(items) = self.0.get("features").and_then(Value::as_array) else {
            return Vec::new();
        };

        items
            .iter()
            .filter_map(|item| {
                let feature = item
                    .as_object()
                    .and_then(|object| Feature::try_from_object(object.clone()).ok());
                if feature.is_none() {
                    log::warn!("Skipping {} entry in features", item.kind());
                }
                feature
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0
            .get("features")
            .and_then(Value::as_array)
            .map_or(0, |items| {
                items
                    .iter()
                    .filter_map(Value::as_object)
                    .filter(|object| {
                        object.discriminator("type") == Some(GeoType::Feature.as_str())
                    })
                    .count()
            })
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Builder<FeatureCollection> {
    pub fn add(mut self, feature: Feature) -> Self {
        self.push("features", feature);
        self
    }

    pub fn add_all(mut self, features: impl IntoIterator<Item = Feature>) -> Self {
        for feature in features {
            self.push("features", feature);
        }
        self
    }
}

impl Bounded for FeatureCollection {
    fn geo_type(&self) -> GeoType {
        GeoType::FeatureCollection
    }

    fn extent(&self) -> Extent {
        Extent::Members(
            self.features()
                .iter()
                .filter_map(Feature::geometry)
                .collect(),
        )
    }
}
