//! JSON text in and out of the object models.
//!
//! Writing goes through the flat representation, so the output of
//! [`to_string`] can be fed straight back into [`parse`] with the registry
//! that knows the model's discriminator values.

use crate::builder::Model;
use crate::config::Config;
use crate::error::Result;
use crate::registry::Registry;
use geostreams_types::{ModelError, Object, Value};

/// Flat JSON representation of `model`.
pub fn to_value<T: Model>(model: &T) -> serde_json::Value {
    serde_json::Value::from(&Value::Object(model.object().clone()))
}

pub fn to_string<T: Model>(model: &T) -> Result<String> {
    Ok(serde_json::to_string(model.object())?)
}

pub fn to_string_pretty<T: Model>(model: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(model.object())?)
}

/// Compact or pretty JSON, as selected by [`Config::pretty_json`].
pub fn to_string_with<T: Model>(model: &T, config: &Config) -> Result<String> {
    if config.pretty_json {
        to_string_pretty(model)
    } else {
        to_string(model)
    }
}

/// Parse JSON text into a typed object.
///
/// The root must be a JSON object carrying the registry's discriminator.
pub fn parse(registry: &Registry, json: &str) -> Result<Object> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    from_json_value(registry, value)
}

pub fn from_json_value(registry: &Registry, value: serde_json::Value) -> Result<Object> {
    match Value::from(value) {
        Value::Map(map) => Ok(registry.reconstruct(map)?),
        other => Err(ModelError::invalid_value(
            "$",
            format!("expected a JSON object, found {}", other.kind()),
        )
        .into()),
    }
}

/// Parse JSON text and view the result as `T`.
///
/// # Examples
///
/// ```
/// use geostreams::geojson::Point;
/// use geostreams::{Position, geojson_registry, json};
///
/// let point: Point = json::from_str(geojson_registry(), r#"{"type":"Point","coordinates":[1,2]}"#)?;
/// assert_eq!(point.position(), Some(Position::new(1.0, 2.0)));
/// # Ok::<(), geostreams::GeostreamsError>(())
/// ```
pub fn from_str<T: Model>(registry: &Registry, json: &str) -> Result<T> {
    Ok(T::try_from_object(parse(registry, json)?)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeostreamsError;
    use crate::geojson::{Geometry, GeometryCollection, Point};
    use crate::registry::geojson_registry;
    use geostreams_types::Position;

    #[test]
    fn test_to_string_keeps_key_order() {
        let point = Point::builder()
            .set("title", "origin")
            .coordinates(Position::new(0.0, 0.0))
            .build()
            .unwrap();

        assert_eq!(
            to_string(&point).unwrap(),
            r#"{"type":"Point","title":"origin","coordinates":[0.0,0.0]}"#
        );
    }

    #[test]
    fn test_pretty_output_by_config() {
        let point = Point::new(Position::new(1.0, 2.0)).unwrap();
        let compact = to_string_with(&point, &Config::default()).unwrap();
        let pretty = to_string_with(&point, &Config::default().with_pretty_json(true)).unwrap();

        assert!(!compact.contains('\n'));
        assert!(pretty.contains('\n'));
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&compact).unwrap(),
            serde_json::from_str::<serde_json::Value>(&pretty).unwrap()
        );
    }

    #[test]
    fn test_parse_nested_collection() {
        let json = r#"{
            "type": "GeometryCollection",
            "geometries": [
                {"type": "Point", "coordinates": [0, 0]},
                {"type": "LineString", "coordinates": [[1, 1], [10, 5]]}
            ]
        }"#;

        let collection: GeometryCollection = from_str(geojson_registry(), json).unwrap();
        let members = collection.geometries();
        assert_eq!(members.len(), 2);
        assert!(matches!(members[1], Geometry::LineString(_)));
    }

    #[test]
    fn test_parse_rejects_non_objects() {
        assert!(matches!(
            parse(geojson_registry(), "[1, 2]"),
            Err(GeostreamsError::Model(ModelError::InvalidValue { .. }))
        ));
        assert!(matches!(
            parse(geojson_registry(), "{"),
            Err(GeostreamsError::Json(_))
        ));
    }

    #[test]
    fn test_from_str_checks_type() {
        let json = r#"{"type":"Point","coordinates":[1,2]}"#;
        assert!(matches!(
            from_str::<GeometryCollection>(geojson_registry(), json),
            Err(GeostreamsError::Model(ModelError::TypeMismatch { .. }))
        ));
    }

    #[test]
    fn test_to_value_decomposes() {
        let point = Point::new(Position::new(1.5, 2.5)).unwrap();
        let collection = GeometryCollection::builder().add(point).build().unwrap();
        let value = to_value(&collection);
        assert_eq!(value["geometries"][0]["coordinates"][1], 2.5);
    }
}
