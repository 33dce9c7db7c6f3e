//! GeoJSON object models.
//!
//! Every GeoJSON object is a thin wrapper around a frozen property store
//! keyed by `type`. Geometries implement [`Bounded`], which is all the
//! bounding-box calculator needs to know about them.

mod collection;
mod feature;
mod geometry;

pub use collection::{GeometryCollection, GeometryCollectionBuilder};
pub use feature::{Feature, FeatureCollection};
pub use geometry::{LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};

use crate::builder::{Builder, Model};
use crate::compute::bbox::calculate_bounding_box;
use crate::registry::Registry;
use geostreams_types::{BoundingBox, FromValue, ModelError, Object, Position, PropertyMap, Value};
use std::fmt;
use std::str::FromStr;

/// Discriminator values of the GeoJSON object types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeoType {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
    GeometryCollection,
    Feature,
    FeatureCollection,
}

impl GeoType {
    pub const ALL: [GeoType; 9] = [
        GeoType::Point,
        GeoType::MultiPoint,
        GeoType::LineString,
        GeoType::MultiLineString,
        GeoType::Polygon,
        GeoType::MultiPolygon,
        GeoType::GeometryCollection,
        GeoType::Feature,
        GeoType::FeatureCollection,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GeoType::Point => "Point",
            GeoType::MultiPoint => "MultiPoint",
            GeoType::LineString => "LineString",
            GeoType::MultiLineString => "MultiLineString",
            GeoType::Polygon => "Polygon",
            GeoType::MultiPolygon => "MultiPolygon",
            GeoType::GeometryCollection => "GeometryCollection",
            GeoType::Feature => "Feature",
            GeoType::FeatureCollection => "FeatureCollection",
        }
    }

    pub fn is_geometry(&self) -> bool {
        !matches!(self, GeoType::Feature | GeoType::FeatureCollection)
    }
}

impl FromStr for GeoType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GeoType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ModelError::UnknownType(s.to_string()))
    }
}

impl fmt::Display for GeoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a value contributes to a bounding box.
#[derive(Debug, Clone, PartialEq)]
pub enum Extent {
    /// Coordinates held directly by a leaf geometry.
    Positions(Vec<Position>),
    /// Nested members whose extents have to be flattened.
    Members(Vec<Geometry>),
}

/// Anything that can report its GeoJSON type and coordinate extent.
pub trait Bounded {
    fn geo_type(&self) -> GeoType;

    fn extent(&self) -> Extent;
}

impl<T: Bounded + ?Sized> Bounded for &T {
    fn geo_type(&self) -> GeoType {
        (**self).geo_type()
    }

    fn extent(&self) -> Extent {
        (**self).extent()
    }
}

/// Accessors shared by every GeoJSON object.
pub trait GeoObject: Model + Bounded {
    /// The stored `bbox`, if one was attached.
    fn bounding_box(&self) -> Option<BoundingBox> {
        self.object().get_as("bbox")
    }

    /// Bounding box over all coordinates of this object.
    fn compute_bounding_box(&self) -> Result<BoundingBox, ModelError> {
        calculate_bounding_box([self])
    }

    /// Derive a copy of this object with the computed `bbox` attached.
    fn with_bounding_box(&self) -> Result<Self, ModelError> {
        let bbox = self.compute_bounding_box()?;
        Builder::new()
            .from_existing(self)
            .bounding_box(bbox)
            .build()
    }
}

impl<T: GeoObject> Builder<T> {
    pub fn bounding_box(self, bbox: BoundingBox) -> Self {
        self.set("bbox", bbox)
    }
}

/// JSON text does not keep `1` and `1.0` apart, so coordinate data is
/// always frozen as floats.
pub(crate) fn normalize_coordinates(props: &mut PropertyMap) {
    for key in ["coordinates", "bbox"] {
        if let Some(value) = props.get_mut(key) {
            *value = value.to_floats();
        }
    }
}

macro_rules! geo_model {
    ($name:ident $(, handle = $handle:path)?) => {
        impl $crate::builder::Model for $name {
            const DISCRIMINATOR: &'static str = "type";

            fn accepts(type_name: &str) -> bool {
                type_name == $crate::geojson::GeoType::$name.as_str()
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

            fn normalize(props: &mut geostreams_types::PropertyMap) {
                $crate::geojson::normalize_coordinates(props)
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

        impl $crate::geojson::GeoObject for $name {}

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

pub(crate) use geo_model;

/// Any GeoJSON geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    MultiPoint(MultiPoint),
    LineString(LineString),
    MultiLineString(MultiLineString),
    Polygon(Polygon),
    MultiPolygon(MultiPolygon),
    GeometryCollection(GeometryCollection),
}

impl Geometry {
    /// View an object as a geometry, dispatching on its `type`.
    pub fn from_object(object: Object) -> Result<Self, ModelError> {
        let type_name = object
            .discriminator("type")
            .ok_or_else(|| ModelError::MissingRequiredField("type".into()))?;

        Ok(match type_name.parse::<GeoType>()? {
            GeoType::Point => Geometry::Point(Point::from_object(object)),
            GeoType::MultiPoint => Geometry::MultiPoint(MultiPoint::from_object(object)),
            GeoType::LineString => Geometry::LineString(LineString::from_object(object)),
            GeoType::MultiLineString => {
                Geometry::MultiLineString(MultiLineString::from_object(object))
            }
            GeoType::Polygon => Geometry::Polygon(Polygon::from_object(object)),
            GeoType::MultiPolygon => Geometry::MultiPolygon(MultiPolygon::from_object(object)),
            GeoType::GeometryCollection => {
                Geometry::GeometryCollection(GeometryCollection::from_object(object))
            }
            other => {
                return Err(ModelError::TypeMismatch {
                    expected: "Geometry".into(),
                    found: other.to_string(),
                });
            }
        })
    }

    pub fn object(&self) -> &Object {
        match self {
            Geometry::Point(g) => g.object(),
            Geometry::MultiPoint(g) => g.object(),
            Geometry::LineString(g) => g.object(),
            Geometry::MultiLineString(g) => g.object(),
            Geometry::Polygon(g) => g.object(),
            Geometry::MultiPolygon(g) => g.object(),
            Geometry::GeometryCollection(g) => g.object(),
        }
    }

    pub fn into_object(self) -> Object {
        match self {
            Geometry::Point(g) => g.into_object(),
            Geometry::MultiPoint(g) => g.into_object(),
            Geometry::LineString(g) => g.into_object(),
            Geometry::MultiLineString(g) => g.into_object(),
            Geometry::Polygon(g) => g.into_object(),
            Geometry::MultiPolygon(g) => g.into_object(),
            Geometry::GeometryCollection(g) => g.into_object(),
        }
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.object().get_as("bbox")
    }

    /// Derive a copy of this geometry with the computed `bbox` attached.
    pub fn with_bounding_box(&self) -> Result<Self, ModelError> {
        Ok(match self {
            Geometry::Point(g) => g.with_bounding_box()?.into(),
            Geometry::MultiPoint(g) => g.with_bounding_box()?.into(),
            Geometry::LineString(g) => g.with_bounding_box()?.into(),
            Geometry::MultiLineString(g) => g.with_bounding_box()?.into(),
            Geometry::Polygon(g) => g.with_bounding_box()?.into(),
            Geometry::MultiPolygon(g) => g.with_bounding_box()?.into(),
            Geometry::GeometryCollection(g) => g.with_bounding_box()?.into(),
        })
    }
}

impl Bounded for Geometry {
    fn geo_type(&self) -> GeoType {
        match self {
            Geometry::Point(g) => g.geo_type(),
            Geometry::MultiPoint(g) => g.geo_type(),
            Geometry::LineString(g) => g.geo_type(),
            Geometry::MultiLineString(g) => g.geo_type(),
            Geometry::Polygon(g) => g.geo_type(),
            Geometry::MultiPolygon(g) => g.geo_type(),
            Geometry::GeometryCollection(g) => g.geo_type(),
        }
    }

    fn extent(&self) -> Extent {
        match self {
            Geometry::Point(g) => g.extent(),
            Geometry::MultiPoint(g) => g.extent(),
            Geometry::LineString(g) => g.extent(),
            Geometry::MultiLineString(g) => g.extent(),
            Geometry::Polygon(g) => g.extent(),
            Geometry::MultiPolygon(g) => g.extent(),
            Geometry::GeometryCollection(g) => g.extent(),
        }
    }
}

impl FromValue for Geometry {
    fn from_value(value: &Value) -> Option<Self> {
        Geometry::from_object(value.as_object()?.clone()).ok()
    }
}

impl From<Geometry> for Value {
    fn from(geometry: Geometry) -> Self {
        Value::Object(geometry.into_object())
    }
}

impl TryFrom<Object> for Geometry {
    type Error = ModelError;

    fn try_from(object: Object) -> Result<Self, Self::Error> {
        Geometry::from_object(object)
    }
}

/// Register factories for all GeoJSON types.
pub(crate) fn register(registry: &mut Registry) {
    registry
        .register("Point", |cx, map| {
            cx.reconstruct(Point::builder(), map).map(Model::into_object)
        })
        .register("MultiPoint", |cx, map| {
            cx.reconstruct(MultiPoint::builder(), map)
                .map(Model::into_object)
        })
        .register("LineString", |cx, map| {
            cx.reconstruct(LineString::builder(), map)
                .map(Model::into_object)
        })
        .register("MultiLineString", |cx, map| {
            cx.reconstruct(MultiLineString::builder(), map)
                .map(Model::into_object)
        })
        .register("Polygon", |cx, map| {
            cx.reconstruct(Polygon::builder(), map).map(Model::into_object)
        })
        .register("MultiPolygon", |cx, map| {
            cx.reconstruct(MultiPolygon::builder(), map)
                .map(Model::into_object)
        })
        .register("GeometryCollection", |cx, map| {
            cx.reconstruct(GeometryCollectionBuilder::unseeded(), map)
                .map(Model::into_object)
        })
        .register("Feature", |cx, map| {
            cx.reconstruct(Feature::builder(), map).map(Model::into_object)
        })
        .register("FeatureCollection", |cx, map| {
            cx.reconstruct(FeatureCollection::builder(), map)
                .map(Model::into_object)
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_type_names() {
        for t in GeoType::ALL {
            assert_eq!(t.as_str().parse::<GeoType>().unwrap(), t);
            assert_eq!(t.to_string(), t.as_str());
        }
        assert!("Circle".parse::<GeoType>().is_err());
        assert!(GeoType::Polygon.is_geometry());
        assert!(!GeoType::Feature.is_geometry());
    }

    #[test]
    fn test_geometry_dispatch() {
        let point = Point::new(Position::new(1.0, 2.0)).unwrap();
        let geometry = Geometry::from_object(point.object().clone()).unwrap();
        assert_eq!(geometry, Geometry::Point(point));
        assert_eq!(geometry.geo_type(), GeoType::Point);

        let feature = Feature::builder().build().unwrap();
        assert!(matches!(
            Geometry::from_object(feature.into_object()),
            Err(ModelError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_normalize_coordinates() {
        let ints = Value::Array(vec![Value::Int(1), Value::Int(2)]);
        let mut props = PropertyMap::new();
        props.insert("coordinates".into(), ints.clone());
        props.insert("title".into(), ints.clone());

        normalize_coordinates(&mut props);
        assert_eq!(
            props["coordinates"],
            Value::Array(vec![Value::Float(1.0), Value::Float(2.0)])
        );
        assert_eq!(props["title"], ints);
    }

    #[test]
    fn test_integer_coordinates_frozen_as_floats() {
        let point = Point::builder()
            .set("coordinates", vec![1, 2])
            .set("bbox", vec![1, 2, 1, 2])
            .build()
            .unwrap();
        let expected = Point::new(Position::new(1.0, 2.0))
            .unwrap()
            .to_builder()
            .set("bbox", vec![1.0, 2.0, 1.0, 2.0])
            .build()
            .unwrap();

        assert_eq!(point, expected);
        assert_eq!(point.position(), Some(Position::new(1.0, 2.0)));
    }
}
