//! Point entity

use super::EntityCommon;
use crate::types::Vector3;

/// A single point in space
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub common: EntityCommon,
    pub location: Vector3,
    /// Thickness (extrusion in Z direction)
    pub thickness: f64,
}

impl Point {
    pub fn new(location: Vector3) -> Self {
        Point {
            common: EntityCommon::new(),
            location,
            thickness: 0.0,
        }
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(Vector3::ZERO)
    }
}

super::impl_entity!(Point, "POINT");
