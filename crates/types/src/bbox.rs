//! Axis-aligned bounding boxes.

use crate::error::ModelError;
use crate::position::Position;
use crate::value::{FromValue, Value};
use geo::Rect;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box of any dimensionality.
///
/// Holds a minimum and a maximum corner with the same number of ordinates.
/// Boxes are normally computed from geometries rather than built by hand.
///
/// In GeoJSON form a box is the flat array of all minimum ordinates followed
/// by all maximum ordinates, e.g. `[min_x, min_y, max_x, max_y]`. Serde
/// reads and writes that form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct BoundingBox {
    min: Position,
    max: Position,
}

impl BoundingBox {
    /// Create a bounding box from its two corners.
    ///
    /// # Examples
    ///
    /// ```
    /// use geostreams_types::{BoundingBox, Position};
    ///
    /// let bbox = BoundingBox::new(Position::new(-74.0, 40.7), Position::new(-73.9, 40.8)).unwrap();
    /// assert_eq!(bbox.dims(), 2);
    /// ```
    pub fn new(min: Position, max: Position) -> Result<Self, ModelError> {
        if min.dims() != max.dims() {
            return Err(ModelError::DimensionalityMismatch {
                expected: min.dims(),
                found: max.dims(),
            });
        }
        if let Some((lo, hi)) = min.iter().zip(max.iter()).find(|(lo, hi)| lo > hi) {
            return Err(ModelError::invalid_value(
                "bbox",
                format!("minimum ({}) must be <= maximum ({})", lo, hi),
            ));
        }
        Ok(Self { min, max })
    }

    /// Degenerate box covering exactly one position.
    pub fn from_position(position: Position) -> Self {
        Self {
            min: position.clone(),
            max: position,
        }
    }

    /// Parse the GeoJSON flat form `[min.., max..]`.
    pub fn from_flat(ordinates: &[f64]) -> Result<Self, ModelError> {
        if ordinates.len() < 4 || ordinates.len() % 2 != 0 {
            return Err(ModelError::invalid_value(
                "bbox",
                format!(
                    "expected an even number of at least 4 ordinates, got {}",
                    ordinates.len()
                ),
            ));
        }
        let (min, max) = ordinates.split_at(ordinates.len() / 2);
        Self::new(Position::from_slice(min)?, Position::from_slice(max)?)
    }

    /// The GeoJSON flat form `[min.., max..]`.
    pub fn to_flat(&self) -> Vec<f64> {
        self.min.iter().chain(self.max.iter()).collect()
    }

    #[inline]
    pub fn dims(&self) -> usize {
        self.min.dims()
    }

    #[inline]
    pub fn min(&self) -> &Position {
        &self.min
    }

    #[inline]
    pub fn max(&self) -> &Position {
        &self.max
    }

    pub fn min_x(&self) -> f64 {
        self.min.x()
    }

    pub fn min_y(&self) -> f64 {
        self.min.y()
    }

    pub fn max_x(&self) -> f64 {
        self.max.x()
    }

    pub fn max_y(&self) -> f64 {
        self.max.y()
    }

    /// Minimum altitude, for boxes with a third dimension.
    pub fn min_z(&self) -> Option<f64> {
        self.min.z()
    }

    pub fn max_z(&self) -> Option<f64> {
        self.max.z()
    }

    pub fn width(&self) -> f64 {
        self.max_x() - self.min_x()
    }

    pub fn height(&self) -> f64 {
        self.max_y() - self.min_y()
    }

    pub fn depth(&self) -> Option<f64> {
        Some(self.max_z()? - self.min_z()?)
    }

    /// Whether min and max coincide in every dimension.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    /// Center of the box in every dimension.
    pub fn center(&self) -> Position {
        let mid: Vec<f64> = self
            .min
            .iter()
            .zip(self.max.iter())
            .map(|(lo, hi)| (lo + hi) / 2.0)
            .collect();
        // min has at least two ordinates, so mid does too
        Position::from_slice(&mid).unwrap_or_else(|_| self.min.clone())
    }

    /// Check if a position lies within the box (boundary included).
    ///
    /// Positions of another dimensionality are never contained.
    pub fn contains(&self, position: &Position) -> bool {
        position.dims() == self.dims()
            && self
                .min
                .iter()
                .zip(self.max.iter())
                .zip(position.iter())
                .all(|((lo, hi), v)| v >= lo && v <= hi)
    }

    /// Check if this box overlaps another box of the same dimensionality.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.dims() == other.dims()
            && (0..self.dims()).all(|d| {
                !(self.max.as_slice()[d] < other.min.as_slice()[d]
                    || self.min.as_slice()[d] > other.max.as_slice()[d])
            })
    }

    /// Smallest box enclosing both boxes.
    pub fn union(&self, other: &BoundingBox) -> Result<Self, ModelError> {
        if self.dims() != other.dims() {
            return Err(ModelError::DimensionalityMismatch {
                expected: self.dims(),
                found: other.dims(),
            });
        }
        let mut grown = self.clone();
        grown.include(&other.min)?;
        grown.include(&other.max)?;
        Ok(grown)
    }

    /// Grow the box in place so that it covers `position`.
    pub fn include(&mut self, position: &Position) -> Result<(), ModelError> {
        if position.dims() != self.dims() {
            return Err(ModelError::DimensionalityMismatch {
                expected: self.dims(),
                found: position.dims(),
            });
        }
        let min: Vec<f64> = self
            .min
            .iter()
            .zip(position.iter())
            .map(|(a, b)| a.min(b))
            .collect();
        let max: Vec<f64> = self
            .max
            .iter()
            .zip(position.iter())
            .map(|(a, b)| a.max(b))
            .collect();
        self.min = Position::from_slice(&min)?;
        self.max = Position::from_slice(&max)?;
        Ok(())
    }

    /// Expand the box by a given amount in all directions.
    pub fn expand(&self, amount: f64) -> Self {
        let grow = |p: &Position, by: f64| {
            let ordinates: Vec<f64> = p.iter().map(|v| v + by).collect();
            Position::from_slice(&ordinates).unwrap_or_else(|_| p.clone())
        };
        Self {
            min: grow(&self.min, -amount),
            max: grow(&self.max, amount),
        }
    }

    /// Project onto the first two dimensions.
    pub fn to_2d(&self) -> Self {
        Self {
            min: Position::new(self.min_x(), self.min_y()),
            max: Position::new(self.max_x(), self.max_y()),
        }
    }

    /// The 2D footprint as a `geo::Rect`.
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            geo::coord! { x: self.min_x(), y: self.min_y() },
            geo::coord! { x: self.max_x(), y: self.max_y() },
        )
    }
}

impl From<Rect> for BoundingBox {
    fn from(rect: Rect) -> Self {
        Self {
            min: rect.min().into(),
            max: rect.max().into(),
        }
    }
}

impl TryFrom<Vec<f64>> for BoundingBox {
    type Error = ModelError;

    fn try_from(ordinates: Vec<f64>) -> Result<Self, Self::Error> {
        Self::from_flat(&ordinates)
    }
}

impl From<BoundingBox> for Vec<f64> {
    fn from(bbox: BoundingBox) -> Self {
        bbox.to_flat()
    }
}

impl FromValue for BoundingBox {
    fn from_value(value: &Value) -> Option<Self> {
        let ordinates = Vec::<f64>::from_value(value)?;
        Self::from_flat(&ordinates).ok()
    }
}

impl From<BoundingBox> for Value {
    fn from(bbox: BoundingBox) -> Self {
        Value::Array(bbox.to_flat().into_iter().map(Value::Float).collect())
    }
}

impl From<&BoundingBox> for Value {
    fn from(bbox: &BoundingBox) -> Self {
        Value::Array(bbox.to_flat().into_iter().map(Value::Float).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox2(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> BoundingBox {
        BoundingBox::new(Position::new(min_x, min_y), Position::new(max_x, max_y)).unwrap()
    }

    #[test]
    fn test_bbox_creation() {
        let bbox = bbox2(-74.0, 40.7, -73.9, 40.8);
        assert_eq!(bbox.min_x(), -74.0);
        assert_eq!(bbox.min_y(), 40.7);
        assert_eq!(bbox.max_x(), -73.9);
        assert_eq!(bbox.max_y(), 40.8);
        assert_eq!(bbox.min_z(), None);
    }

    #[test]
    fn test_bbox_rejects_inverted_or_mixed_corners() {
        assert!(BoundingBox::new(Position::new(1.0, 0.0), Position::new(0.0, 0.0)).is_err());
        assert!(matches!(
            BoundingBox::new(Position::new(0.0, 0.0), Position::new_3d(1.0, 1.0, 1.0)),
            Err(ModelError::DimensionalityMismatch {
                expected: 2,
                found: 3
            })
        ));
    }

    #[test]
    fn test_bbox_dimensions() {
        let bbox = bbox2(0.0, 0.0, 10.0, 5.0);
        assert_eq!(bbox.width(), 10.0);
        assert_eq!(bbox.height(), 5.0);
        assert_eq!(bbox.depth(), None);

        let cube = BoundingBox::new(
            Position::new_3d(0.0, 0.0, 0.0),
            Position::new_3d(10.0, 5.0, 3.0),
        )
        .unwrap();
        assert_eq!(cube.depth(), Some(3.0));
    }

    #[test]
    fn test_bbox_center() {
        let bbox = bbox2(0.0, 0.0, 10.0, 10.0);
        assert_eq!(bbox.center(), Position::new(5.0, 5.0));
    }

    #[test]
    fn test_bbox_contains() {
        let bbox = bbox2(0.0, 0.0, 10.0, 10.0);
        assert!(bbox.contains(&Position::new(5.0, 5.0)));
        assert!(bbox.contains(&Position::new(0.0, 0.0)));
        assert!(bbox.contains(&Position::new(10.0, 10.0)));
        assert!(!bbox.contains(&Position::new(-1.0, 5.0)));
        assert!(!bbox.contains(&Position::new(11.0, 5.0)));
        assert!(!bbox.contains(&Position::new_3d(5.0, 5.0, 0.0)));
    }

    #[test]
    fn test_bbox_intersects() {
        let bbox1 = bbox2(0.0, 0.0, 10.0, 10.0);
        let bbox2_ = bbox2(5.0, 5.0, 15.0, 15.0);
        let bbox3 = bbox2(20.0, 20.0, 30.0, 30.0);

        assert!(bbox1.intersects(&bbox2_));
        assert!(bbox2_.intersects(&bbox1));
        assert!(!bbox1.intersects(&bbox3));
        assert!(!bbox3.intersects(&bbox1));
    }

    #[test]
    fn test_bbox_include_and_union() {
        let mut bbox = BoundingBox::from_position(Position::new(1.0, 1.0));
        assert!(bbox.is_degenerate());

        bbox.include(&Position::new(-1.0, 3.0)).unwrap();
        assert_eq!(bbox, bbox2(-1.0, 1.0, 1.0, 3.0));

        let merged = bbox.union(&bbox2(0.0, -5.0, 0.5, 0.0)).unwrap();
        assert_eq!(merged, bbox2(-1.0, -5.0, 1.0, 3.0));

        assert!(bbox.include(&Position::new_3d(0.0, 0.0, 0.0)).is_err());
    }

    #[test]
    fn test_bbox_expand() {
        let expanded = bbox2(0.0, 0.0, 10.0, 10.0).expand(5.0);
        assert_eq!(expanded, bbox2(-5.0, -5.0, 15.0, 15.0));
    }

    #[test]
    fn test_flat_form() {
        let cube = BoundingBox::from_flat(&[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]).unwrap();
        assert_eq!(cube.dims(), 3);
        assert_eq!(cube.min(), &Position::new_3d(0.0, 1.0, 2.0));
        assert_eq!(cube.to_flat(), vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        assert_eq!(cube.to_2d(), bbox2(0.0, 1.0, 10.0, 11.0));

        assert!(BoundingBox::from_flat(&[0.0, 1.0, 2.0]).is_err());
        assert!(BoundingBox::from_flat(&[0.0, 1.0]).is_err());
    }

    #[test]
    fn test_value_conversion() {
        let bbox = bbox2(0.0, 0.0, 10.0, 5.0);
        let value = Value::from(&bbox);
        assert_eq!(BoundingBox::from_value(&value), Some(bbox));
        assert_eq!(BoundingBox::from_value(&Value::from("x")), None);
    }

    #[test]
    fn test_serde_validates_flat_form() {
        let bbox: BoundingBox = serde_json::from_str("[0.0, 0.0, 10.0, 5.0]").unwrap();
        assert_eq!(bbox, bbox2(0.0, 0.0, 10.0, 5.0));
        assert_eq!(serde_json::to_string(&bbox).unwrap(), "[0.0,0.0,10.0,5.0]");

        assert!(serde_json::from_str::<BoundingBox>("[1.0, 0.0, 0.0, 0.0]").is_err());
        assert!(serde_json::from_str::<BoundingBox>("[0.0, 0.0, 1.0]").is_err());
        assert!(serde_json::from_str::<BoundingBox>(r#"{"min":[0.0],"max":[1.0]}"#).is_err());
    }

    #[test]
    fn test_rect_conversion() {
        let bbox = bbox2(-74.0, 40.7, -73.9, 40.8);
        let rect = bbox.to_rect();
        assert_eq!(rect.min().x, -74.0);
        assert_eq!(rect.max().y, 40.8);
        assert_eq!(BoundingBox::from(rect), bbox);
    }
}
