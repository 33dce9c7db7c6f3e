//! Bounding-box calculation over arbitrarily nested geometries.

use crate::geojson::{Bounded, Extent};
use geostreams_types::{BoundingBox, ModelError, Position};

/// Smallest box enclosing every coordinate reachable from `geometries`.
///
/// Geometry collections (and features) are flattened in order, so nesting
/// depth never changes the result. The first coordinate fixes the number of
/// dimensions; a later tuple with a different count fails with
/// [`ModelError::DimensionalityMismatch`]. An input without any coordinate
/// fails with [`ModelError::EmptyGeometrySet`].
///
/// # Examples
///
/// ```
/// use geostreams::calculate_bounding_box;
/// use geostreams::geojson::{Geometry, LineString, Point};
/// use geostreams::Position;
///
/// let shapes: Vec<Geometry> = vec![
///     Point::new(Position::new(0.0, 0.0))?.into(),
///     LineString::new(vec![Position::new(3.0, -1.0), Position::new(10.0, 5.0)])?.into(),
/// ];
/// let bbox = calculate_bounding_box(&shapes)?;
/// assert_eq!(bbox.to_flat(), vec![0.0, -1.0, 10.0, 5.0]);
/// # Ok::<(), geostreams::ModelError>(())
/// ```
pub fn calculate_bounding_box<'a, B>(
    geometries: impl IntoIterator<Item = &'a B>,
) -> Result<BoundingBox, ModelError>
where
    B: Bounded + ?Sized + 'a,
{
    let mut stack: Vec<Extent> = geometries.into_iter().map(|g| g.extent()).collect();
    stack.reverse();

    let mut extent = Accumulator::default();
    while let Some(next) = stack.pop() {
        match next {
            Extent::Positions(positions) => {
                for position in &positions {
                    extent.include(position)?;
                }
            }
            Extent::Members(members) => {
                log::trace!("Flattening {} nested geometries", members.len());
                stack.extend(members.iter().rev().map(|member| member.extent()));
            }
        }
    }

    extent.finish()
}

/// Running per-dimension minimum and maximum.
#[derive(Debug, Default)]
struct Accumulator {
    min: Vec<f64>,
    max: Vec<f64>,
}

impl Accumulator {
    fn include(&mut self, position: &Position) -> Result<(), ModelError> {
        if self.min.is_empty() {
            self.min = position.as_slice().to_vec();
            self.max = self.min.clone();
            return Ok(());
        }

        if position.dims() != self.min.len() {
            return Err(ModelError::DimensionalityMismatch {
                expected: self.min.len(),
                found: position.dims(),
            });
        }

        for (i, v) in position.iter().enumerate() {
            self.min[i] = self.min[i].min(v);
            self.max[i] = self.max[i].max(v);
        }
        Ok(())
    }

    fn finish(self) -> Result<BoundingBox, ModelError> {
        if self.min.is_empty() {
            return Err(ModelError::EmptyGeometrySet);
        }
        BoundingBox::new(
            Position::from_slice(&self.min)?,
            Position::from_slice(&self.max)?,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geojson::{
        Feature, FeatureCollection, Geometry, GeometryCollection, LineString, MultiPoint, Point,
        Polygon,
    };

    fn point(x: f64, y: f64) -> Point {
        Point::new(Position::new(x, y)).unwrap()
    }

    #[test]
    fn test_single_point_is_degenerate() {
        let bbox = calculate_bounding_box([&point(3.0, 4.0)]).unwrap();
        assert_eq!(bbox.min(), &Position::new(3.0, 4.0));
        assert_eq!(bbox.max(), &Position::new(3.0, 4.0));
        assert!(bbox.is_degenerate());
    }

    #[test]
    fn test_collection_of_points() {
        let collection = GeometryCollection::builder()
            .add(point(0.0, 0.0))
            .add(point(10.0, 5.0))
            .build()
            .unwrap();

        let bbox = calculate_bounding_box([&collection]).unwrap();
        assert_eq!(bbox.min(), &Position::new(0.0, 0.0));
        assert_eq!(bbox.max(), &Position::new(10.0, 5.0));
    }

    #[test]
    fn test_nesting_does_not_change_result() {
        let flat: Vec<Geometry> = vec![
            point(1.0, 1.0).into(),
            point(-2.0, 7.0).into(),
            LineString::new(vec![Position::new(4.0, 0.0), Position::new(5.0, 3.0)])
                .unwrap()
                .into(),
        ];

        let inner = GeometryCollection::builder()
            .add(flat[1].clone())
            .add(flat[2].clone())
            .build()
            .unwrap();
        let nested = GeometryCollection::builder()
            .add(flat[0].clone())
            .add(
                GeometryCollection::builder()
                    .add(inner)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        assert_eq!(
            calculate_bounding_box(&flat).unwrap(),
            calculate_bounding_box([&nested]).unwrap()
        );
    }

    #[test]
    fn test_adding_geometry_only_grows_box() {
        let base = vec![point(0.0, 0.0), point(2.0, 2.0)];
        let before = calculate_bounding_box(&base).unwrap();

        let mut grown = base.clone();
        grown.push(point(1.0, -3.0));
        let after = calculate_bounding_box(&grown).unwrap();

        for i in 0..2 {
            assert!(after.min().as_slice()[i] <= before.min().as_slice()[i]);
            assert!(after.max().as_slice()[i] >= before.max().as_slice()[i]);
        }
        assert_eq!(after.min_y(), -3.0);
    }

    #[test]
    fn test_three_dimensional() {
        let multi = MultiPoint::new(vec![
            Position::new_3d(0.0, 0.0, 10.0),
            Position::new_3d(1.0, -1.0, 250.0),
        ])
        .unwrap();
        let bbox = calculate_bounding_box([&multi]).unwrap();
        assert_eq!(bbox.to_flat(), vec![0.0, -1.0, 10.0, 1.0, 0.0, 250.0]);
    }

    #[test]
    fn test_mixed_dimensions_fail() {
        let shapes = vec![
            Point::new(Position::new(0.0, 0.0)).unwrap(),
            Point::new(Position::new_3d(1.0, 1.0, 1.0)).unwrap(),
        ];
        assert_eq!(
            calculate_bounding_box(&shapes),
            Err(ModelError::DimensionalityMismatch {
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn test_empty_inputs_fail() {
        let none: Vec<Point> = Vec::new();
        assert_eq!(calculate_bounding_box(&none), Err(ModelError::EmptyGeometrySet));

        let empty = GeometryCollection::builder().build().unwrap();
        assert_eq!(
            calculate_bounding_box([&empty]),
            Err(ModelError::EmptyGeometrySet)
        );

        let unset = Polygon::builder().build().unwrap();
        assert_eq!(
            calculate_bounding_box([&unset]),
            Err(ModelError::EmptyGeometrySet)
        );
    }

    #[test]
    fn test_features_delegate_to_geometry() {
        let collection = FeatureCollection::builder()
            .add(Feature::builder().geometry(point(-5.0, 2.0)).build().unwrap())
            .add(Feature::builder().build().unwrap())
            .add(Feature::builder().geometry(point(3.0, 9.0)).build().unwrap())
            .build()
            .unwrap();

        let bbox = calculate_bounding_box([&collection]).unwrap();
        assert_eq!(bbox.to_flat(), vec![-5.0, 2.0, 3.0, 9.0]);
    }
}
