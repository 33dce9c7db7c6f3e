//! Immutable, builder-constructed GeoJSON and Activity Streams object models.
//!
//! ## Features
//! - **Immutable objects**: every model wraps a frozen, shareable property store
//! - **Builders**: single-use staging areas with typed setters and `from_existing` copies
//! - **Round-trip**: flat maps and JSON text reconstruct equal objects through a [`Registry`]
//! - **Bounding boxes**: n-dimensional extents over arbitrarily nested geometry collections
//!
//! ## Reconstruction
//! A flat representation is rebuilt bottom-up. Each raw value is offered to
//! the per-type hook of the object being rebuilt; whatever the hook passes
//! on is revived, so nested maps carrying the registry's discriminator
//! become typed objects before they are staged. Free-form maps such as a
//! Feature's `properties` are kept untyped by their hook.
//!
//! ```rust
//! use geostreams::geojson::{GeoObject, GeometryCollection, Point};
//! use geostreams::{Position, geojson_registry, json};
//!
//! let collection = GeometryCollection::builder()
//!     .add(Point::new(Position::new(0.0, 0.0))?)
//!     .add(Point::new(Position::new(10.0, 5.0))?)
//!     .build()?
//!     .with_bounding_box()?;
//!
//! let text = json::to_string(&collection)?;
//! let parsed: GeometryCollection = json::from_str(geojson_registry(), &text)?;
//! assert_eq!(parsed, collection);
//! assert_eq!(parsed.bounding_box().unwrap().to_flat(), vec![0.0, 0.0, 10.0, 5.0]);
//! # Ok::<(), geostreams::GeostreamsError>(())
//! ```

pub mod activity;
pub mod builder;
pub mod compute;
pub mod config;
pub mod error;
pub mod geojson;
pub mod json;
pub mod registry;

pub use builder::{Builder, Handle, Model, ObjectBuilder};
pub use config::{Config, UnknownTypePolicy};
pub use error::{GeostreamsError, ModelError, Result};
pub use registry::{Context, Factory, Registry, activity_registry, geojson_registry};

pub use compute::bbox::calculate_bounding_box;
pub use compute::geojson::{from_geo, from_geojson, to_geojson};

pub use geostreams_types::{BoundingBox, FromValue, Object, Position, PropertyMap, Value};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod prelude {

    pub use crate::{BoundingBox, Object, Position, PropertyMap, Value};
    pub use crate::{Builder, Model};
    pub use crate::{Config, GeostreamsError, ModelError, Registry, Result};

    pub use crate::geojson::{
        Bounded, Feature, FeatureCollection, GeoObject, GeoType, Geometry, GeometryCollection,
        LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
    };

    pub use crate::activity::{ASObject, ActivityObject, Collection, Event, Relation};

    pub use crate::{activity_registry, calculate_bounding_box, geojson_registry};
}
