//! Single-line text entity

use super::EntityCommon;
use crate::types::Vector3;

/// Single-line text
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub common: EntityCommon,
    /// Text content (group code 1)
    pub value: String,
    pub insertion_point: Vector3,
    pub height: f64,
    /// Rotation angle in degrees
    pub rotation: f64,
    /// Text style name (group code 7)
    pub style: String,
}

impl Text {
    pub fn new(value: impl Into<String>, insertion_point: Vector3, height: f64) -> Self {
        Text {
            common: EntityCommon::new(),
            value: value.into(),
            insertion_point,
            height,
            rotation: 0.0,
            style: "Standard".to_string(),
        }
    }
}

impl Default for Text {
    fn default() -> Self {
        Self::new("", Vector3::ZERO, 1.0)
    }
}

super::impl_entity!(Text, "TEXT");
