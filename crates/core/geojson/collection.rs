use super::{Bounded, Extent, GeoType, Geometry, geo_model};
use crate::builder::{Builder, Handle, Model, ObjectBuilder};
use crate::compute::bbox::calculate_bounding_box;
use crate::registry::Context;
use geostreams_types::{BoundingBox, ModelError, Object, Value};

/// A GeoJSON GeometryCollection: zero or more nested geometries, in order.
///
/// # Examples
///
/// ```
/// use geostreams::geojson::{GeoObject, GeometryCollection, Point};
/// use geostreams::Position;
///
/// let collection = GeometryCollection::builder()
///     .add(Point::new(Position::new(0.0, 0.0))?)
///     .add(Point::new(Position::new(10.0, 5.0))?)
///     .build()?
///     .with_bounding_box()?;
///
/// let bbox = collection.bounding_box().unwrap();
/// assert_eq!(bbox.to_flat(), vec![0.0, 0.0, 10.0, 5.0]);
/// # Ok::<(), geostreams::ModelError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryCollection(Object);

geo_model!(GeometryCollection);

impl GeometryCollection {
    pub fn builder() -> GeometryCollectionBuilder {
        GeometryCollectionBuilder::new()
    }

    /// Builder seeded with this collection's properties and members.
    pub fn to_builder(&self) -> GeometryCollectionBuilder {
        GeometryCollectionBuilder::new().from_existing(self)
    }

    /// Member geometries in insertion order; empty when unset.
    pub fn geometries(&self) -> Vec<Geometry> {
        self.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.entries().iter().filter(|item| is_geometry(item)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Geometry> {
        self.iter().nth(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = Geometry> + '_ {
        self.entries().iter().filter_map(|item| match item {
            Value::Object(object) => Geometry::from_object(object.clone()).ok(),
            other => {
                log::warn!("Skipping {} entry in geometries", other.kind());
                None
            }
        })
    }

    fn entries(&self) -> &[Value] {
        self.0
            .get("geometries")
            .and_then(Value::as_array)
            .unwrap_or_default()
    }
}

fn is_geometry(item: &Value) -> bool {
    item.as_object()
        .and_then(|object| object.discriminator("type"))
        .and_then(|name| name.parse::<GeoType>().ok())
        .is_some_and(|geo_type| geo_type.is_geometry())
}

impl Bounded for GeometryCollection {
    fn geo_type(&self) -> GeoType {
        GeoType::GeometryCollection
    }

    fn extent(&self) -> Extent {
        Extent::Members(self.geometries())
    }
}

impl From<GeometryCollection> for Geometry {
    fn from(collection: GeometryCollection) -> Self {
        Geometry::GeometryCollection(collection)
    }
}

/// Builder for [`GeometryCollection`].
///
/// Members are staged in their own list and written to `geometries` when
/// the builder is finalized, so a `geometries` value staged through
/// [`set`](Self::set) is replaced.
#[derive(Debug)]
pub struct GeometryCollectionBuilder {
    base: Builder<GeometryCollection>,
    geometries: Option<Vec<Geometry>>,
}

impl GeometryCollectionBuilder {
    /// Builder that always writes `geometries`, empty if nothing is added.
    pub fn new() -> Self {
        Self {
            base: Builder::typed(GeoType::GeometryCollection.as_str()),
            geometries: Some(Vec::new()),
        }
    }

    /// Builder that writes `geometries` only once a member is staged.
    pub(crate) fn unseeded() -> Self {
        Self {
            base: Builder::new(),
            geometries: None,
        }
    }

    /// Seed properties and members from an existing collection.
    pub fn from_existing(mut self, existing: &GeometryCollection) -> Self {
        self.base = self.base.from_existing(existing);
        self.geometries = existing
            .object()
            .contains_key("geometries")
            .then(|| existing.geometries());
        self
    }

    /// Append one geometry.
    pub fn add(mut self, geometry: impl Into<Geometry>) -> Self {
        self.members().push(geometry.into());
        self
    }

    /// Append every geometry of `geometries`, in order.
    pub fn add_all<I, G>(mut self, geometries: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: Into<Geometry>,
    {
        self.members()
            .extend(geometries.into_iter().map(Into::into));
        self
    }

    fn members(&mut self) -> &mut Vec<Geometry> {
        self.geometries.get_or_insert_with(Vec::new)
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.base.insert(key, value);
        self
    }

    pub fn bounding_box(mut self, bbox: BoundingBox) -> Self {
        self.base = self.base.bounding_box(bbox);
        self
    }

    /// Stage the bounding box of the members added so far.
    pub fn compute_bounding_box(self) -> Result<Self, ModelError> {
        let bbox = calculate_bounding_box(self.geometries.iter().flatten())?;
        Ok(self.bounding_box(bbox))
    }

    /// Number of staged members.
    pub fn len(&self) -> usize {
        self.geometries.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn build(self) -> Result<GeometryCollection, ModelError> {
        let Self { base, geometries } = self;
        match geometries {
            Some(geometries) => base.set("geometries", geometries).build(),
            None => base.build(),
        }
    }
}

impl Default for GeometryCollectionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectBuilder for GeometryCollectionBuilder {
    type Output = GeometryCollection;

    fn stage(&mut self, key: String, value: Value) {
        self.base.insert(key, value);
    }

    fn handle(&mut self, cx: Context<'_>, key: &str, value: Value) -> Result<Handle, ModelError> {
        if key != "geometries" {
            return Ok(Handle::Pass(value));
        }

        let members = self.members();
        let items = match cx.revive(value)? {
            Value::Array(items) => items,
            found => {
                return Err(ModelError::invalid_value(
                    key,
                    format!("expected an array, found {}", found.kind()),
                ));
            }
        };
        for item in items {
            let Value::Object(object) = item else {
                return Err(ModelError::invalid_value(
                    key,
                    format!("expected a geometry, found {}", item.kind()),
                ));
            };
            members.push(Geometry::from_object(object)?);
        }
        Ok(Handle::Consumed)
    }

    fn finish(self) -> Result<GeometryCollection, ModelError> {
        self.build()
    }
}
