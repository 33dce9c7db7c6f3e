//! Coordinate tuples.

use crate::error::ModelError;
use crate::value::{FromValue, Value};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A single coordinate tuple: x (longitude), y (latitude) and optional
/// further ordinates such as altitude.
///
/// Positions always hold at least two ordinates.
///
/// # Examples
///
/// ```
/// use geostreams_types::Position;
///
/// let drone = Position::new_3d(-74.0060, 40.7128, 100.0);
/// assert_eq!(drone.dims(), 3);
/// assert_eq!(drone.z(), Some(100.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Position(SmallVec<[f64; 3]>);

impl Position {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self(smallvec::smallvec![x, y])
    }

    #[inline]
    pub fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Self(smallvec::smallvec![x, y, z])
    }

    /// Build a position from any number (at least two) of ordinates.
    pub fn from_slice(ordinates: &[f64]) -> Result<Self, ModelError> {
        if ordinates.len() < 2 {
            return Err(ModelError::InvalidPosition(format!(
                "expected at least 2 ordinates, got {}",
                ordinates.len()
            )));
        }
        Ok(Self(SmallVec::from_slice(ordinates)))
    }

    #[inline]
    pub fn dims(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.0[0]
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.0[1]
    }

    #[inline]
    pub fn z(&self) -> Option<f64> {
        self.0.get(2).copied()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }
}

impl FromValue for Position {
    fn from_value(value: &Value) -> Option<Self> {
        let ordinates: SmallVec<[f64; 3]> = value
            .as_array()?
            .iter()
            .map(Value::as_f64)
            .collect::<Option<_>>()?;
        (ordinates.len() >= 2).then_some(Self(ordinates))
    }
}

impl From<Position> for Value {
    fn from(position: Position) -> Self {
        Value::Array(position.0.into_iter().map(Value::Float).collect())
    }
}

impl From<&Position> for Value {
    fn from(position: &Position) -> Self {
        Value::Array(position.iter().map(Value::Float).collect())
    }
}

impl TryFrom<Vec<f64>> for Position {
    type Error = ModelError;

    fn try_from(ordinates: Vec<f64>) -> Result<Self, Self::Error> {
        Self::from_slice(&ordinates)
    }
}

impl From<Position> for Vec<f64> {
    fn from(position: Position) -> Self {
        position.0.into_vec()
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<(f64, f64, f64)> for Position {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::new_3d(x, y, z)
    }
}

impl From<[f64; 2]> for Position {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<[f64; 3]> for Position {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new_3d(x, y, z)
    }
}

impl From<geo::Coord<f64>> for Position {
    fn from(coord: geo::Coord<f64>) -> Self {
        Self::new(coord.x, coord.y)
    }
}

impl From<geo::Point<f64>> for Position {
    fn from(point: geo::Point<f64>) -> Self {
        Self::new(point.x(), point.y())
    }
}

impl From<&Position> for geo::Coord<f64> {
    fn from(position: &Position) -> Self {
        geo::coord! { x: position.x(), y: position.y() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice_rejects_short_tuples() {
        assert!(Position::from_slice(&[1.0]).is_err());
        assert!(Position::from_slice(&[]).is_err());
        let p = Position::from_slice(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(p.dims(), 4);
    }

    #[test]
    fn test_value_conversion() {
        let value = Value::Array(vec![Value::Int(1), Value::Float(2.5)]);
        let position = Position::from_value(&value).unwrap();
        assert_eq!(position, Position::new(1.0, 2.5));
        assert_eq!(position.z(), None);

        assert_eq!(
            Value::from(Position::new(1.0, 2.5)),
            Value::Array(vec![Value::Float(1.0), Value::Float(2.5)])
        );
    }

    #[test]
    fn test_value_conversion_rejects_bad_shapes() {
        assert_eq!(Position::from_value(&Value::Array(vec![Value::Int(1)])), None);
        assert_eq!(
            Position::from_value(&Value::Array(vec![Value::Int(1), Value::from("a")])),
            None
        );
        assert_eq!(Position::from_value(&Value::Null), None);
    }

    #[test]
    fn test_serde_requires_two_ordinates() {
        assert!(serde_json::from_str::<Position>("[1.0]").is_err());
        assert!(serde_json::from_str::<Position>("[]").is_err());

        let position: Position = serde_json::from_str("[1.0, 2.0, 3.0]").unwrap();
        assert_eq!(position, Position::new_3d(1.0, 2.0, 3.0));
        assert_eq!(serde_json::to_string(&position).unwrap(), "[1.0,2.0,3.0]");
    }

    #[test]
    fn test_geo_conversion() {
        let position = Position::from(geo::Point::new(-74.0, 40.7));
        assert_eq!(position.x(), -74.0);
        assert_eq!(position.y(), 40.7);

        let coord: geo::Coord<f64> = (&position).into();
        assert_eq!(coord.x, -74.0);
    }
}
