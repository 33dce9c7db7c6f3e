//! # geostreams-types
//!
//! Plain data values shared by the geostreams object models:
//!
//! - **Values**: [`Value`], the ordered [`PropertyMap`] and the [`FromValue`] extraction trait
//! - **Objects**: [`Object`], the frozen property store every typed model wraps
//! - **Coordinates**: [`Position`] and the n-dimensional [`BoundingBox`]
//! - **Errors**: [`ModelError`]
//!
//! ## Examples
//!
//! ```rust
//! use geostreams_types::{BoundingBox, Position};
//!
//! let mut bbox = BoundingBox::from_position(Position::new(0.0, 0.0));
//! bbox.include(&Position::new(10.0, 5.0)).unwrap();
//! assert_eq!(bbox.to_flat(), vec![0.0, 0.0, 10.0, 5.0]);
//! ```

pub mod bbox;
pub mod error;
pub mod object;
pub mod position;
pub mod value;

pub use bbox::BoundingBox;
pub use error::ModelError;
pub use object::Object;
pub use position::Position;
pub use value::{FromValue, PropertyMap, Value};
