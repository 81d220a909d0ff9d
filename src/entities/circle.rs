//! Circle entity

use super::EntityCommon;
use crate::types::Vector3;

#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub common: EntityCommon,
    pub center: Vector3,
    pub radius: f64,
    pub thickness: f64,
}

impl Circle {
    pub fn new(center: Vector3, radius: f64) -> Self {
        Circle {
            common: EntityCommon::new(),
            center,
            radius,
            thickness: 0.0,
        }
    }
}

impl Default for Circle {
    fn default() -> Self {
        Self::new(Vector3::ZERO, 1.0)
    }
}

super::impl_entity!(Circle, "CIRCLE");
