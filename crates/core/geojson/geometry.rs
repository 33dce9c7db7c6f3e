//! Leaf geometries: types that hold coordinate arrays directly.

use super::{Bounded, Extent, GeoType, Geometry, geo_model};
use crate::builder::Builder;
use geostreams_types::{FromValue, ModelError, Object, Position, Value};

macro_rules! leaf_geometry {
    ($(#[$meta:meta])* $name:ident, $coords:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name(Object);

        impl $name {
            pub fn builder() -> Builder<Self> {
                Builder::typed(GeoType::$name.as_str())
            }

            pub fn new(coordinates: $coords) -> Result<Self, ModelError> {
                Self::builder().coordinates(coordinates).build()
            }

            /// Builder seeded with every property of this geometry.
            pub fn to_builder(&self) -> Builder<Self> {
                Builder::new().from_existing(self)
            }

            /// The stored coordinates, `None` if unset or malformed.
            pub fn coordinates(&self) -> Option<$coords> {
                self.0.get_as("coordinates")
            }
        }

        impl Builder<$name> {
            pub fn coordinates(self, coordinates: $coords) -> Self {
                self.set("coordinates", coordinates)
            }
        }

        impl Bounded for $name {
            fn geo_type(&self) -> GeoType {
                GeoType::$name
            }

            fn extent(&self) -> Extent {
                let mut positions = Vec::new();
                if let Some(coordinates) = self.0.get("coordinates") {
                    collect_positions(coordinates, &mut positions);
                }
                Extent::Positions(positions)
            }
        }

        impl From<$name> for Geometry {
            fn from(geometry: $name) -> Self {
                Geometry::$name(geometry)
            }
        }

        geo_model!($name);
    };
}

leaf_geometry!(
    /// A single position.
    ///
    /// # Examples
    ///
    /// ```
    /// use geostreams::geojson::Point;
    /// use geostreams::Position;
    ///
    /// let nyc = Point::new(Position::new(-74.0060, 40.7128))?;
    /// assert_eq!(nyc.position().unwrap().x(), -74.0060);
    /// # Ok::<(), geostreams::ModelError>(())
    /// ```
    Point,
    Position
);

leaf_geometry!(
    /// An unconnected set of positions.
    MultiPoint,
    Vec<Position>
);

leaf_geometry!(
    /// A path through two or more positions.
    LineString,
    Vec<Position>
);

leaf_geometry!(MultiLineString, Vec<Vec<Position>>);

leaf_geometry!(
    /// An exterior ring followed by optional interior rings (holes).
    Polygon,
    Vec<Vec<Position>>
);

leaf_geometry!(MultiPolygon, Vec<Vec<Vec<Position>>>);

impl Point {
    pub fn position(&self) -> Option<Position> {
        self.coordinates()
    }
}

impl MultiPoint {
    pub fn positions(&self) -> Vec<Position> {
        self.coordinates().unwrap_or_default()
    }
}

impl LineString {
    pub fn positions(&self) -> Vec<Position> {
        self.coordinates().unwrap_or_default()
    }
}

impl MultiLineString {
    pub fn lines(&self) -> Vec<Vec<Position>> {
        self.coordinates().unwrap_or_default()
    }
}

impl Polygon {
    pub fn rings(&self) -> Vec<Vec<Position>> {
        self.coordinates().unwrap_or_default()
    }

    pub fn exterior(&self) -> Vec<Position> {
        self.rings().into_iter().next().unwrap_or_default()
    }

    pub fn interiors(&self) -> Vec<Vec<Position>> {
        self.rings().into_iter().skip(1).collect()
    }
}

impl MultiPolygon {
    pub fn polygons(&self) -> Vec<Vec<Vec<Position>>> {
        self.coordinates().unwrap_or_default()
    }
}

/// Walk a coordinate array of any nesting depth and collect its positions.
///
/// An array made only of numbers is a position. Tuples with fewer than two
/// ordinates are skipped.
fn collect_positions(value: &Value, out: &mut Vec<Position>) {
    let Some(items) = value.as_array() else {
        return;
    };

    if !items.is_empty() && items.iter().all(|v| v.as_f64().is_some()) {
        match Position::from_value(value) {
            Some(position) => out.push(position),
            None => log::warn!("Skipping coordinate tuple with {} ordinate(s)", items.len()),
        }
        return;
    }

    for item in items {
        collect_positions(item, out);
    }
}
