//! Conversions between the GeoJSON models and the `geojson` / `geo` crates.

use crate::error::{GeostreamsError, Result};
use crate::geojson::{
    Feature, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Point, Polygon,
};
use geojson::Value as GeoJsonValue;
use geojson::feature::Id;
use geostreams_types::{BoundingBox, Position, PropertyMap, Value};

fn positions(coords: &[Vec<f64>]) -> Result<Vec<Position>> {
    coords
        .iter()
        .map(|c| Position::from_slice(c).map_err(GeostreamsError::from))
        .collect()
}

fn rings(rings: &[Vec<Vec<f64>>]) -> Result<Vec<Vec<Position>>> {
    rings.iter().map(|ring| positions(ring)).collect()
}

fn ordinates(positions: &[Position]) -> Vec<Vec<f64>> {
    positions.iter().map(|p| p.as_slice().to_vec()).collect()
}

fn ring_ordinates(rings: &[Vec<Position>]) -> Vec<Vec<Vec<f64>>> {
    rings.iter().map(|ring| ordinates(ring)).collect()
}

/// Converts a geometry into a `geojson::Geometry`, keeping any stored `bbox`.
pub fn to_geojson(geometry: &Geometry) -> Result<geojson::Geometry> {
    let value = match geometry {
        Geometry::Point(g) => {
            let position = g
                .position()
                .ok_or_else(|| GeostreamsError::GeoJson("Point has no coordinates".into()))?;
            GeoJsonValue::Point(position.as_slice().to_vec())
        }
        Geometry::MultiPoint(g) => GeoJsonValue::MultiPoint(ordinates(&g.positions())),
        Geometry::LineString(g) => GeoJsonValue::LineString(ordinates(&g.positions())),
        Geometry::MultiLineString(g) => GeoJsonValue::MultiLineString(ring_ordinates(&g.lines())),
        Geometry::Polygon(g) => GeoJsonValue::Polygon(ring_ordinates(&g.rings())),
        Geometry::MultiPolygon(g) => GeoJsonValue::MultiPolygon(
            g.polygons()
                .iter()
                .map(|polygon| ring_ordinates(polygon))
                .collect(),
        ),
        Geometry::GeometryCollection(g) => GeoJsonValue::GeometryCollection(
            g.geometries()
                .iter()
                .map(to_geojson)
                .collect::<Result<Vec<_>>>()?,
        ),
    };

    let mut out = geojson::Geometry::new(value);
    out.bbox = geometry.bounding_box().map(|bbox| bbox.to_flat());
    Ok(out)
}

/// Parses a `geojson::Geometry` into a geometry model.
pub fn from_geojson(geometry: &geojson::Geometry) -> Result<Geometry> {
    let converted: Geometry = match &geometry.value {
        GeoJsonValue::Point(coords) => Point::new(Position::from_slice(coords)?)?.into(),
        GeoJsonValue::MultiPoint(coords) => MultiPoint::new(positions(coords)?)?.into(),
        GeoJsonValue::LineString(coords) => LineString::new(positions(coords)?)?.into(),
        GeoJsonValue::MultiLineString(lines) => MultiLineString::new(rings(lines)?)?.into(),
        GeoJsonValue::Polygon(polygon) => Polygon::new(rings(polygon)?)?.into(),
        GeoJsonValue::MultiPolygon(polygons) => MultiPolygon::new(
            polygons
                .iter()
                .map(|polygon| rings(polygon))
                .collect::<Result<Vec<_>>>()?,
        )?
        .into(),
        GeoJsonValue::GeometryCollection(members) => GeometryCollection::builder()
            .add_all(members.iter().map(from_geojson).collect::<Result<Vec<_>>>()?)
            .build()?
            .into(),
    };

    match &geometry.bbox {
        Some(flat) => with_bbox(converted, BoundingBox::from_flat(flat)?),
        None => Ok(converted),
    }
}

fn with_bbox(geometry: Geometry, bbox: BoundingBox) -> Result<Geometry> {
    Ok(match geometry {
        Geometry::Point(g) => g.to_builder().bounding_box(bbox).build()?.into(),
        Geometry::MultiPoint(g) => g.to_builder().bounding_box(bbox).build()?.into(),
        Geometry::LineString(g) => g.to_builder().bounding_box(bbox).build()?.into(),
        Geometry::MultiLineString(g) => g.to_builder().bounding_box(bbox).build()?.into(),
        Geometry::Polygon(g) => g.to_builder().bounding_box(bbox).build()?.into(),
        Geometry::MultiPolygon(g) => g.to_builder().bounding_box(bbox).build()?.into(),
        Geometry::GeometryCollection(g) => g.to_builder().bounding_box(bbox).build()?.into(),
    })
}

/// Converts a feature into a `geojson::Feature`.
///
/// Properties keep their order; string and numeric ids are carried over,
/// other id shapes are dropped.
pub fn feature_to_geojson(feature: &Feature) -> Result<geojson::Feature> {
    let geometry = feature.geometry().as_ref().map(to_geojson).transpose()?;

    let properties: serde_json::Map<String, serde_json::Value> = feature
        .properties()
        .iter()
        .map(|(key, value)| (key.clone(), serde_json::Value::from(value)))
        .collect();

    let id = match feature.id() {
        Some(Value::String(id)) => Some(Id::String(id.clone())),
        Some(Value::Int(id)) => Some(Id::Number((*id).into())),
        Some(Value::Float(id)) => serde_json::Number::from_f64(*id).map(Id::Number),
        Some(other) => {
            log::warn!("Dropping {} feature id", other.kind());
            None
        }
        None => None,
    };

    let bbox = crate::geojson::GeoObject::bounding_box(feature).map(|bbox| bbox.to_flat());

    Ok(geojson::Feature {
        bbox,
        geometry,
        id,
        properties: Some(properties),
        foreign_members: None,
    })
}

/// Parses a `geojson::Feature` into a feature model.
pub fn feature_from_geojson(feature: &geojson::Feature) -> Result<Feature> {
    let mut builder = Feature::builder();

    if let Some(geometry) = &feature.geometry {
        builder = builder.geometry(from_geojson(geometry)?);
    }

    if let Some(properties) = &feature.properties {
        let properties: PropertyMap = properties
            .iter()
            .map(|(key, value)| (key.clone(), Value::from(value.clone())))
            .collect();
        builder = builder.properties(properties);
    }

    match &feature.id {
        Some(Id::String(id)) => builder = builder.id(id.as_str()),
        Some(Id::Number(n)) => {
            builder = builder.id(Value::from(serde_json::Value::Number(n.clone())));
        }
        None => {}
    }

    if let Some(flat) = &feature.bbox {
        builder = builder.bounding_box(BoundingBox::from_flat(flat)?);
    }

    Ok(builder.build()?)
}

/// Converts a `geo` geometry into a geometry model.
///
/// `Line`, `Rect` and `Triangle` have no GeoJSON counterpart and become a
/// LineString or Polygon.
pub fn from_geo(geometry: &geo::Geometry<f64>) -> Result<Geometry> {
    fn line(line: &geo::LineString<f64>) -> Vec<Position> {
        line.coords().map(|c| Position::from(*c)).collect()
    }

    fn polygon(polygon: &geo::Polygon<f64>) -> Vec<Vec<Position>> {
        std::iter::once(line(polygon.exterior()))
            .chain(polygon.interiors().iter().map(line))
            .collect()
    }

    let converted: Geometry = match geometry {
        geo::Geometry::Point(p) => Point::new(Position::from(*p))?.into(),
        geo::Geometry::Line(l) => {
            LineString::new(vec![Position::from(l.start), Position::from(l.end)])?.into()
        }
        geo::Geometry::LineString(l) => LineString::new(line(l))?.into(),
        geo::Geometry::Polygon(p) => Polygon::new(polygon(p))?.into(),
        geo::Geometry::MultiPoint(mp) => {
            MultiPoint::new(mp.iter().map(|p| Position::from(*p)).collect())?.into()
        }
        geo::Geometry::MultiLineString(ml) => {
            MultiLineString::new(ml.iter().map(line).collect())?.into()
        }
        geo::Geometry::MultiPolygon(mp) => {
            MultiPolygon::new(mp.iter().map(polygon).collect())?.into()
        }
        geo::Geometry::GeometryCollection(gc) => GeometryCollection::builder()
            .add_all(gc.iter().map(from_geo).collect::<Result<Vec<_>>>()?)
            .build()?
            .into(),
        geo::Geometry::Rect(r) => Polygon::new(polygon(&r.to_polygon()))?.into(),
        geo::Geometry::Triangle(t) => Polygon::new(polygon(&t.to_polygon()))?.into(),
    };
    Ok(converted)
}
