//! Layout object - a named sheet tied to a block record

use super::{PlotFlags, PlotSettings};
use crate::cad_object::ObjectCommon;
use crate::types::{Handle, Vector2, Vector3};

/// A model or paper space layout.
///
/// `block_record` and `viewport` are reference edges; the layout itself is
/// owned by the `ACAD_LAYOUT` dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub common: ObjectCommon,
    pub name: String,
    pub plot_settings: PlotSettings,
    pub flags: i16,
    pub tab_order: i16,
    pub min_limits: Vector2,
    pub max_limits: Vector2,
    pub insertion_base: Vector3,
    pub min_extents: Vector3,
    pub max_extents: Vector3,
    /// UCS origin (13)
    pub origin: Vector3,
    /// UCS X axis (16)
    pub x_axis: Vector3,
    /// UCS Y axis (17)
    pub y_axis: Vector3,
    /// 146
    pub elevation: f64,
    /// Block record drawn on this layout
    pub block_record: Option<Handle>,
    /// Last active viewport
    pub viewport: Option<Handle>,
}

impl Layout {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            common: ObjectCommon::new(),
            name: name.into(),
            plot_settings: PlotSettings::default(),
            flags: 0,
            tab_order: 0,
            min_limits: Vector2::ZERO,
            max_limits: Vector2::new(12.0, 9.0),
            insertion_base: Vector3::ZERO,
            min_extents: Vector3::ZERO,
            max_extents: Vector3::new(12.0, 9.0, 0.0),
            origin: Vector3::ZERO,
            x_axis: Vector3::new(1.0, 0.0, 0.0),
            y_axis: Vector3::new(0.0, 1.0, 0.0),
            elevation: 0.0,
            block_record: None,
            viewport: None,
        }
    }

    /// The model layout, always first in tab order
    pub fn model() -> Self {
        let mut layout = Self::new("Model");
        layout.flags = 1;
        layout.plot_settings.flags = PlotFlags::MODEL_TYPE;
        layout
    }
}
