//! Scale object - named annotation scale

use crate::cad_object::ObjectCommon;

/// Entry of the `ACAD_SCALELIST` dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    pub common: ObjectCommon,
    /// Scale name (group code 300)
    pub name: String,
    /// Paper units (group code 140)
    pub paper_units: f64,
    /// Drawing units (group code 141)
    pub drawing_units: f64,
    /// Is unit scale (group code 290)
    pub is_unit_scale: bool,
}

impl Scale {
    pub fn new(name: impl Into<String>, paper_units: f64, drawing_units: f64) -> Self {
        Self {
            common: ObjectCommon::new(),
            name: name.into(),
            paper_units,
            drawing_units,
            is_unit_scale: paper_units == drawing_units,
        }
    }
}
