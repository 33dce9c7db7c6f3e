//! Computations over the GeoJSON models and conversions to other geometry crates.

pub mod bbox;
pub mod geojson;

pub use bbox::calculate_bounding_box;
