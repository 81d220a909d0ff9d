//! Layer table entry

use bitflags::bitflags;

use super::TableEntry;
use crate::cad_object::ObjectCommon;
use crate::types::Color;

bitflags! {
    /// Standard flags (group code 70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LayerFlags: i16 {
        const FROZEN = 1;
        const FROZEN_IN_NEW_VIEWPORTS = 2;
        const LOCKED = 4;
    }
}

/// A layer table entry
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub common: ObjectCommon,
    pub name: String,
    pub flags: LayerFlags,
    pub color: Color,
    /// Layer is off; written as a negative color index
    pub off: bool,
    /// Linetype name
    pub line_type: String,
    pub is_plottable: bool,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Layer {
            common: ObjectCommon::new(),
            name: name.into(),
            flags: LayerFlags::empty(),
            color: Color::Index(7),
            off: false,
            line_type: "Continuous".to_string(),
            is_plottable: true,
        }
    }

    /// The default layer "0"
    pub fn layer_0() -> Self {
        Self::new("0")
    }
}

impl TableEntry for Layer {
    fn common(&self) -> &ObjectCommon {
        &self.common
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn table_name() -> &'static str {
        "LAYER"
    }
}
