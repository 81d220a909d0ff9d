//! Viewport entity

use super::EntityCommon;
use crate::types::{Vector2, Vector3};

/// A window onto model space placed on a paper space layout.
///
/// Block records keep viewports in their own collection, apart from the
/// other entities they own.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub common: EntityCommon,
    /// Center point in paper space
    pub center: Vector3,
    pub width: f64,
    pub height: f64,
    /// Viewport id (group code 69); 1 is the paper space overall viewport
    pub id: i16,
    /// View center in model space
    pub view_center: Vector2,
    pub view_height: f64,
}

impl Viewport {
    pub fn new() -> Self {
        Viewport {
            common: EntityCommon::new(),
            center: Vector3::ZERO,
            width: 297.0,
            height: 210.0,
            id: 1,
            view_center: Vector2::ZERO,
            view_height: 210.0,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

super::impl_entity!(Viewport, "VIEWPORT");
