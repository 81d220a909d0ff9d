//! Line entity

use super::EntityCommon;
use crate::types::Vector3;

/// A line entity defined by two endpoints
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub common: EntityCommon,
    pub start: Vector3,
    pub end: Vector3,
    /// Thickness (extrusion in Z direction)
    pub thickness: f64,
}

impl Line {
    /// Create a new line from origin to origin
    pub fn new() -> Self {
        Line {
            common: EntityCommon::new(),
            start: Vector3::ZERO,
            end: Vector3::ZERO,
            thickness: 0.0,
        }
    }

    /// Create a new line between two points
    pub fn from_points(start: Vector3, end: Vector3) -> Self {
        Line {
            start,
            end,
            ..Self::new()
        }
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::new()
    }
}

super::impl_entity!(Line, "LINE");
